use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::models::ScopeKind;

pub const DEFAULT_PAGE_SIZE: u32 = 25;
/// Zotero serves at most this many items per request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Root configuration, loaded from `~/.config/romeotag/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub zotero: ZoteroConfig,
    pub romeo: RomeoConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoteroConfig {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub default_scope: ScopeKind,
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RomeoConfig {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Minimum pause between two requests to the same service.
    pub min_interval_ms: u64,
    pub user_agent: String,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for ZoteroConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.zotero.org".to_string(),
            api_key: None,
            default_scope: ScopeKind::User,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Default for RomeoConfig {
    fn default() -> Self {
        Self {
            base_url: "http://www.sherpa.ac.uk/romeo/api29.php".to_string(),
            api_key: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 100,
            user_agent: concat!("romeotag/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

// ─── Load ──────────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/romeotag/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("ROMEOTAG_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("romeotag")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.zotero.page_size) {
            return Err(CoreError::ConfigError(format!(
                "zotero.page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if self.zotero.base_url.trim().is_empty() || self.romeo.base_url.trim().is_empty() {
            return Err(CoreError::ConfigError("base_url must not be empty".to_string()));
        }
        Ok(())
    }
}
