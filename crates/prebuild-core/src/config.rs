use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::checksum_table::ChecksumTable;
use crate::url_model::{DEFAULT_ARCHIVE_EXTENSION, DEFAULT_BASE_URL};

/// HTTP transfer parameters (optional `[http]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Seconds allowed for establishing the connection.
    pub connect_timeout_secs: u64,
    /// Upper bound for the whole transfer in seconds (0 = no limit).
    pub timeout_secs: u64,
    /// Abort when the rate stays below this many bytes/sec for `low_speed_time_secs`.
    pub low_speed_limit_bytes: u32,
    pub low_speed_time_secs: u64,
    pub max_redirections: u32,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 3600,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            max_redirections: 10,
            user_agent: concat!("fetch-artifact/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Configuration loaded from `~/.config/fetch-artifact/config.toml` or `--config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Prefix for platform-mode prebuild URLs.
    pub base_url: String,
    /// Archive extension for platform-mode prebuild URLs.
    pub archive_extension: String,
    pub http: HttpConfig,
    /// Extra or replacement `platform = "sha256"` entries for the built-in table.
    pub checksums: BTreeMap<String, String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            archive_extension: DEFAULT_ARCHIVE_EXTENSION.to_string(),
            http: HttpConfig::default(),
            checksums: BTreeMap::new(),
        }
    }
}

impl FetchConfig {
    /// Built-in checksum table with this config's `[checksums]` merged over it.
    pub fn checksum_table(&self) -> crate::Result<ChecksumTable> {
        ChecksumTable::default().with_overrides(&self.checksums)
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fetch-artifact")?;
    Ok(xdg_dirs.get_config_file("config.toml"))
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, the XDG location is tried and
/// built-in defaults are used when no file is there; nothing is written.
pub fn load(path: Option<&Path>) -> Result<FetchConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Ok(p) if p.is_file() => p,
            _ => return Ok(FetchConfig::default()),
        },
    };
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<FetchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: FetchConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}
