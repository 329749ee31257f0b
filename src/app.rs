//! Wiring shared by every command: config, local store, data source, session.

use crate::config::{Config, SourceKind};
use anyhow::{Context, Result};
use colored::Colorize;
use countrydex::data_source::{CountryDataSource, FileDataSource, HttpDataSource};
use countrydex::local_store::LocalStore;
use countrydex::session::StoredSession;
use countrydex::sqlite_store::SqliteStore;
use countrydex::view_state::{Notice, ViewKind, ViewStateAdapter};
use std::rc::Rc;
use std::time::Duration;

pub struct App {
    store: Rc<SqliteStore>,
    source: Box<dyn CountryDataSource>,
}

impl App {
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        if !config.display.colors {
            colored::control::set_override(false);
        }

        let store_path = config.store_path();
        let store = SqliteStore::open(&store_path, config.store.quota_bytes)?;
        tracing::debug!(path = %store.path().display(), "opened local store");

        let source: Box<dyn CountryDataSource> = match config.source.kind {
            SourceKind::Http => Box::new(
                HttpDataSource::new(
                    &config.source.base_url,
                    Duration::from_secs(config.source.timeout_secs.max(1)),
                )
                .context("Failed to build HTTP client")?,
            ),
            SourceKind::File => {
                let path = config
                    .source
                    .file
                    .as_deref()
                    .context("source.kind = \"file\" requires source.file")?;
                Box::new(FileDataSource::load(path).context("Failed to load countries")?)
            }
        };

        Ok(Self {
            store: Rc::new(store),
            source,
        })
    }

    pub fn store(&self) -> Rc<dyn LocalStore> {
        self.store.clone()
    }

    pub fn session(&self) -> StoredSession {
        StoredSession::new(self.store())
    }

    pub fn source(&self) -> &dyn CountryDataSource {
        self.source.as_ref()
    }

    /// Build and mount a view bound to `session`.
    pub fn mount<'a>(&'a self, kind: ViewKind, session: &'a StoredSession) -> ViewStateAdapter<'a> {
        let mut view = ViewStateAdapter::new(kind, self.store(), session, self.source());
        view.mount();
        view
    }
}

/// Soft notifications go to stderr; the command itself still succeeds.
pub fn print_notice(notice: Option<&Notice>) {
    if let Some(notice) = notice {
        eprintln!("{} {}", "!".yellow().bold(), notice.message.yellow());
    }
}
