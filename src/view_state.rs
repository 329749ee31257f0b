//! Per-view binding between render state and the user's collections.
//!
//! Each mounted view owns one adapter. The adapter re-derives its stores when the
//! signed-in identity changes and replaces render state wholesale; it never merges
//! two identities' data. Actions first re-check the identity, then read the store
//! strictly (a failed read aborts the action), mutate it, re-read it, and only then
//! update render state. Views are not notified of each other's writes: a view sees them
//! on its next mount or its own next action.

use crate::country::Country;
use crate::data_source::CountryDataSource;
use crate::local_store::{LocalStore, StoreError};
use crate::membership::MembershipStore;
use crate::recency::RecencyStore;
use crate::resolver::{resolve_from, EntityResolver};
use crate::session::Session;
use crate::settings;
use std::rc::Rc;

pub const DASHBOARD_RECENT_LIMIT: usize = 5;
pub const SAVE_FAILED: &str = "Could not save changes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    List,
    Detail,
    Favorites,
    Dashboard,
    /// Account settings; works on codes only.
    Settings,
}

impl ViewKind {
    fn shows_favorite_records(self) -> bool {
        matches!(self, ViewKind::Favorites | ViewKind::Dashboard)
    }

    fn shows_recent_records(self) -> bool {
        matches!(self, ViewKind::Dashboard)
    }

    fn recent_limit(self) -> Option<usize> {
        match self {
            ViewKind::Dashboard => Some(DASHBOARD_RECENT_LIMIT),
            _ => None,
        }
    }
}

/// Dismissible soft notification (e.g. a failed save).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub user: Option<String>,
    pub favorite_codes: Vec<String>,
    pub recent_codes: Vec<String>,
    pub favorites: Vec<Country>,
    pub recently_viewed: Vec<Country>,
}

/// Resolved records produced for one refresh.
#[derive(Debug, Default)]
pub struct Resolved {
    favorites: Option<Vec<Country>>,
    recently_viewed: Option<Vec<Country>>,
}

/// Identifies the view state a resolution was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
}

pub struct ViewStateAdapter<'a> {
    kind: ViewKind,
    store: Rc<dyn LocalStore>,
    session: &'a dyn Session,
    source: &'a dyn CountryDataSource,
    catalog: Option<&'a [Country]>,
    favorites: MembershipStore,
    recent: RecencyStore,
    /// `None` until the first sync.
    observed_user: Option<Option<String>>,
    state: RenderState,
    notice: Option<Notice>,
    mounted: bool,
    generation: u64,
}

impl<'a> ViewStateAdapter<'a> {
    pub fn new(
        kind: ViewKind,
        store: Rc<dyn LocalStore>,
        session: &'a dyn Session,
        source: &'a dyn CountryDataSource,
    ) -> Self {
        Self {
            kind,
            favorites: MembershipStore::favorites(store.clone(), None),
            recent: RecencyStore::open(store.clone(), None),
            store,
            session,
            source,
            catalog: None,
            observed_user: None,
            state: RenderState::default(),
            notice: None,
            mounted: false,
            generation: 0,
        }
    }

    /// Resolve records from an already-loaded catalog instead of per-code fetches.
    pub fn with_catalog(mut self, catalog: &'a [Country]) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn mount(&mut self) {
        self.mounted = true;
        self.observed_user = None;
        self.sync();
    }

    /// Drop liveness; any resolution still in flight is discarded on arrival.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Re-derive everything if the session identity changed since the last sync.
    /// Returns whether a re-derivation happened.
    pub fn sync(&mut self) -> bool {
        let user = self.session.current_user_id();
        if self.observed_user.as_ref() == Some(&user) {
            return false;
        }
        tracing::debug!(view = ?self.kind, user = ?user, "identity changed, rebuilding view state");
        self.generation += 1;
        self.favorites = MembershipStore::favorites(self.store.clone(), user.as_deref());
        self.recent = RecencyStore::open(self.store.clone(), user.as_deref());
        self.state = RenderState {
            user: user.clone(),
            favorite_codes: self.favorites.list().to_vec(),
            recent_codes: self.visible_recent_codes(),
            ..RenderState::default()
        };
        self.notice = None;
        self.observed_user = Some(user);
        self.refresh(true, true);
        true
    }

    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket {
            generation: self.generation,
        }
    }

    /// Resolve the records this view displays for its current codes.
    pub fn resolve(&self, favorites: bool, recent: bool) -> Resolved {
        let lookup = |codes: &[String]| match self.catalog {
            Some(catalog) => resolve_from(codes, catalog),
            None => EntityResolver::new(self.source).resolve(codes),
        };
        Resolved {
            favorites: (favorites && self.kind.shows_favorite_records())
                .then(|| lookup(&self.state.favorite_codes)),
            recently_viewed: (recent && self.kind.shows_recent_records())
                .then(|| lookup(&self.state.recent_codes)),
        }
    }

    /// Install resolved records unless the view went away or changed identity
    /// since `ticket` was issued. Returns whether the result was applied.
    pub fn apply(&mut self, ticket: RefreshTicket, resolved: Resolved) -> bool {
        if !self.mounted || ticket.generation != self.generation {
            tracing::debug!(view = ?self.kind, "discarding stale resolution");
            return false;
        }
        if let Some(favorites) = resolved.favorites {
            self.state.favorites = favorites;
        }
        if let Some(recent) = resolved.recently_viewed {
            self.state.recently_viewed = recent;
        }
        true
    }

    fn refresh(&mut self, favorites: bool, recent: bool) {
        let ticket = self.begin_refresh();
        let resolved = self.resolve(favorites, recent);
        self.apply(ticket, resolved);
    }

    fn visible_recent_codes(&self) -> Vec<String> {
        let codes = self.recent.list();
        let limit = self.kind.recent_limit().unwrap_or(codes.len());
        codes.iter().take(limit).cloned().collect()
    }

    // ── Read side ────────────────────────────────────────────

    pub fn user(&self) -> Option<&str> {
        self.state.user.as_deref()
    }

    pub fn is_favorite(&self, code: &str) -> bool {
        self.state.favorite_codes.iter().any(|c| c == code)
    }

    pub fn favorite_codes(&self) -> &[String] {
        &self.state.favorite_codes
    }

    pub fn favorites(&self) -> &[Country] {
        &self.state.favorites
    }

    pub fn recent_codes(&self) -> &[String] {
        &self.state.recent_codes
    }

    pub fn recently_viewed(&self) -> &[Country] {
        &self.state.recently_viewed
    }

    pub fn render_state(&self) -> &RenderState {
        &self.state
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ── Actions ──────────────────────────────────────────────

    /// Toggle `code` against a fresh read of the store and return the membership
    /// the store actually holds afterwards. A failed read aborts before any write.
    pub fn toggle_favorite(&mut self, code: &str) -> Result<bool, StoreError> {
        self.sync();
        let outcome = self
            .favorites
            .try_reload()
            .and_then(|()| self.favorites.toggle(code));
        self.reread_favorites();
        self.after_action(&outcome);
        self.refresh(true, false);
        outcome.map(|_| self.favorites.is_member(code))
    }

    pub fn record_view(&mut self, code: &str) -> Result<(), StoreError> {
        self.sync();
        let outcome = self
            .recent
            .try_reload()
            .and_then(|()| self.recent.record_view(code));
        self.reread_recent();
        self.after_action(&outcome);
        self.refresh(false, true);
        outcome
    }

    /// Remove both collections for the current user. Not atomic across the two keys.
    pub fn clear_data(&mut self) -> Result<(), StoreError> {
        self.sync();
        let outcome = settings::clear_user_data(&mut self.favorites, &mut self.recent);
        self.reread_favorites();
        self.reread_recent();
        self.after_action(&outcome);
        self.refresh(true, true);
        outcome
    }

    // A failed re-read keeps the cache, which holds the last committed list.
    fn reread_favorites(&mut self) {
        let _ = self.favorites.try_reload();
        self.state.favorite_codes = self.favorites.list().to_vec();
    }

    fn reread_recent(&mut self) {
        let _ = self.recent.try_reload();
        self.state.recent_codes = self.visible_recent_codes();
    }

    fn after_action<T>(&mut self, outcome: &Result<T, StoreError>) {
        if let Err(err) = outcome {
            tracing::warn!(view = ?self.kind, error = %err, "action not saved");
            self.notice = Some(Notice {
                message: SAVE_FAILED.to_string(),
            });
        }
    }
}
