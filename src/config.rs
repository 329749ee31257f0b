use anyhow::{Context, Result};
use countrydex::data_source::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_CONFIG: &str = "COUNTRYDEX_CONFIG";
pub const ENV_DB_PATH: &str = "COUNTRYDEX_DB_PATH";
pub const ENV_SOURCE_FILE: &str = "COUNTRYDEX_SOURCE_FILE";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Byte budget for everything in the local store; 0 disables the limit.
    #[serde(default = "StoreConfig::default_quota_bytes")]
    pub quota_bytes: u64,
}

impl StoreConfig {
    fn default_quota_bytes() -> u64 {
        5 * 1024 * 1024 // browsers typically give localStorage ~5 MiB per origin
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            quota_bytes: Self::default_quota_bytes(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Http,
    File,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    #[serde(default = "SourceConfig::default_base_url")]
    pub base_url: String,
    /// JSON dump of `/all`, used when `kind = "file"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(default = "SourceConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SourceConfig {
    fn default_base_url() -> String {
        DEFAULT_BASE_URL.to_string()
    }
    fn default_timeout_secs() -> u64 {
        15
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Http,
            base_url: Self::default_base_url(),
            file: None,
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "DisplayConfig::default_colors")]
    pub colors: bool,
}

impl DisplayConfig {
    fn default_colors() -> bool {
        true
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { colors: true }
    }
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = get_config_path()?;

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        } else {
            Config::default()
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Some(p) = std::env::var_os(ENV_DB_PATH) {
            self.store.path = Some(PathBuf::from(p));
        }
        if let Some(p) = std::env::var_os(ENV_SOURCE_FILE) {
            self.source.kind = SourceKind::File;
            self.source.file = Some(PathBuf::from(p));
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.store.path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("countrydex")
                .join("local.db")
        })
    }

    pub fn save(&self) -> Result<()> {
        let path = get_config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    pub fn create_default() -> Result<PathBuf> {
        let config = Config::default();
        config.save()?;
        get_config_path()
    }
}

fn get_config_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(ENV_CONFIG) {
        return Ok(PathBuf::from(p));
    }
    let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(config_dir.join("countrydex").join("config.toml"))
}

pub fn show_config(create: bool) -> Result<()> {
    if create {
        let path = Config::create_default()?;
        println!("Created {}", path.display());
        return Ok(());
    }

    let path = get_config_path()?;
    println!("Config: {}", path.display());
    println!();

    if path.exists() {
        let config = Config::load()?;
        println!("{}", toml::to_string_pretty(&config)?);
    } else {
        println!("(default config, file not created)");
        println!();
        let config = Config::default();
        println!("{}", toml::to_string_pretty(&config)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_http_source_and_quota() {
        let cfg = Config::default();
        assert_eq!(cfg.source.kind, SourceKind::Http);
        assert_eq!(cfg.source.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.store.quota_bytes, 5 * 1024 * 1024);
        assert!(cfg.display.colors);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [source]
            kind = "file"
            file = "/tmp/countries.json"

            [store]
            quota_bytes = 0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.source.kind, SourceKind::File);
        assert_eq!(cfg.source.timeout_secs, 15);
        assert_eq!(cfg.store.quota_bytes, 0);
        assert_eq!(cfg.store.path, None);
    }

    #[test]
    fn empty_display_section_keeps_colors_on() {
        let cfg: Config = toml::from_str("[display]\n").unwrap();
        assert!(cfg.display.colors);

        let cfg: Config = toml::from_str("[display]\ncolors = false\n").unwrap();
        assert!(!cfg.display.colors);
    }

    #[test]
    fn explicit_store_path_wins() {
        let mut cfg = Config::default();
        cfg.store.path = Some(PathBuf::from("/tmp/x.db"));
        assert_eq!(cfg.store_path(), PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn serialises_round_trip() {
        let cfg = Config::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.source.base_url, cfg.source.base_url);
    }
}
