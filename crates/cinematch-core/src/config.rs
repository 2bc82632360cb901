use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::overrides::Overrides;
use crate::rules::MetadataRules;
use crate::scoring::ScoringConfig;

/// Root application configuration, loaded from `~/.config/cinematch/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub tmdb: TmdbConfig,
    pub matching: ScoringConfig,
    pub overrides: Overrides,
    pub rules: MetadataRules,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TmdbConfig {
    pub api_base_url: String,
    pub web_base_url: String,
    pub image_base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Fixed pause between consecutive API calls.
    pub request_delay_ms: u64,
    pub max_retries: u32,
    pub user_agent: String,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.themoviedb.org/3".to_string(),
            web_base_url: "https://www.themoviedb.org".to_string(),
            image_base_url: "https://image.tmdb.org/t/p".to_string(),
            api_key_env: "TMDB_API_KEY".to_string(),
            request_delay_ms: 100,
            max_retries: 2,
            user_agent: "cinematch/0.1".to_string(),
        }
    }
}

impl TmdbConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/cinematch/config.toml`
    pub fn config_path() -> PathBuf {
        // Allow override via env var
        if let Ok(path) = std::env::var("CINEMATCH_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("cinematch")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        Self::load_from(&path)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
