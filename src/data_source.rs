//! Country dataset providers: the REST Countries API or a JSON dump on disk.

use crate::country::Country;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";

/// `/all` rejects unfiltered requests; ask only for what the catalog reads.
const ALL_FIELDS: &str = "cca3,name,region,subregion,population,capital,flags";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Remote dataset seam. `Sync` because lookups fan out across worker threads.
pub trait CountryDataSource: Sync {
    fn fetch_all(&self) -> Result<Vec<Country>, FetchError>;
    /// `Ok(None)` means the source answered but has no such country.
    fn fetch_by_code(&self, code: &str) -> Result<Option<Country>, FetchError>;
}

fn is_plausible_code(code: &str) -> bool {
    !code.is_empty() && code.len() <= 8 && code.chars().all(|c| c.is_ascii_alphanumeric())
}

// ── HTTP ────────────────────────────────────────────────────

pub struct HttpDataSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpDataSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("countrydex/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_json(&self, url: &str) -> Result<Option<serde_json::Value>, FetchError> {
        tracing::debug!(url, "GET");
        let response = self.client.get(url).send()?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(Some(response.json()?))
    }
}

impl CountryDataSource for HttpDataSource {
    fn fetch_all(&self) -> Result<Vec<Country>, FetchError> {
        let url = format!("{}/all?fields={ALL_FIELDS}", self.base_url);
        match self.get_json(&url)? {
            Some(value @ serde_json::Value::Array(_)) => Ok(Country::many_from_value(value)),
            Some(_) => Err(FetchError::Decode("expected a JSON array".to_string())),
            None => Err(FetchError::Status { status: 404, url }),
        }
    }

    fn fetch_by_code(&self, code: &str) -> Result<Option<Country>, FetchError> {
        if !is_plausible_code(code) {
            return Ok(None);
        }
        let url = format!("{}/alpha/{code}", self.base_url);
        let Some(value) = self.get_json(&url)? else {
            return Ok(None);
        };
        // The alpha endpoint answers with a one-element array.
        Ok(Country::many_from_value(value).into_iter().next())
    }
}

// ── File ────────────────────────────────────────────────────

/// Dataset loaded once from a JSON dump of `/all` (offline mode).
pub struct FileDataSource {
    countries: Vec<Country>,
    by_code: HashMap<String, usize>,
}

impl FileDataSource {
    pub fn load(path: &Path) -> Result<Self, FetchError> {
        let raw = fs::read_to_string(path).map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| FetchError::Decode(format!("{}: {e}", path.display())))?;
        if !value.is_array() {
            return Err(FetchError::Decode(format!(
                "{}: expected a JSON array of countries",
                path.display()
            )));
        }
        Ok(Self::from_countries(Country::many_from_value(value)))
    }

    pub fn from_countries(countries: Vec<Country>) -> Self {
        let by_code = countries
            .iter()
            .enumerate()
            .map(|(i, c)| (c.code.to_ascii_uppercase(), i))
            .collect();
        Self { countries, by_code }
    }
}

impl CountryDataSource for FileDataSource {
    fn fetch_all(&self) -> Result<Vec<Country>, FetchError> {
        Ok(self.countries.clone())
    }

    fn fetch_by_code(&self, code: &str) -> Result<Option<Country>, FetchError> {
        Ok(self
            .by_code
            .get(&code.to_ascii_uppercase())
            .map(|&i| self.countries[i].clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn file_source_looks_up_case_insensitively() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"[{{"cca3":"USA","name":{{"common":"United States"}},"region":"Americas"}},
               {{"cca3":"FRA","name":{{"common":"France"}},"region":"Europe"}}]"#
        )?;
        let source = FileDataSource::load(file.path())?;
        assert_eq!(source.fetch_all()?.len(), 2);
        assert_eq!(source.fetch_by_code("fra")?.map(|c| c.name).as_deref(), Some("France"));
        assert!(source.fetch_by_code("ZZZ")?.is_none());
        Ok(())
    }

    #[test]
    fn file_source_rejects_non_array() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, r#"{{"cca3":"USA"}}"#)?;
        let err = FileDataSource::load(file.path()).err().expect("should fail");
        assert!(matches!(err, FetchError::Decode(_)));
        Ok(())
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FileDataSource::load(Path::new("/definitely/not/here.json"))
            .err()
            .expect("should fail");
        assert!(matches!(err, FetchError::Io { .. }));
    }

    #[test]
    fn implausible_codes_are_not_requested() -> anyhow::Result<()> {
        // Unroutable base URL: any real request would error instead of returning None.
        let source = HttpDataSource::new("http://127.0.0.1:9", Duration::from_millis(50))?;
        assert!(source.fetch_by_code("../all")?.is_none());
        assert!(source.fetch_by_code("")?.is_none());
        Ok(())
    }
}
