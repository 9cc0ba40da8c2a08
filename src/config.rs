//! Configuration system for xv.
//!
//! Layered configuration from multiple sources:
//!
//! 1. **Compiled defaults**
//! 2. **User config file** - `~/.config/xv/config.toml`
//! 3. **Environment variables** - `XV_*` prefix
//! 4. **CLI arguments** - highest priority, always wins
//!
//! Components receive the pieces they need explicitly at construction;
//! there is no process-wide mutable state.
//!
//! # Example Configuration File
//!
//! ```toml
//! data_root = "/srv/twitter-backup"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 5000
//!
//! [ingest]
//! delay_ms = 100
//! http_timeout_secs = 30
//!
//! [translation]
//! model = "gpt-3.5-turbo"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory names under the data root, fixed by the export layout.
pub const META_DIR: &str = "twitter-meta";
pub const MEDIA_DIR: &str = "img";
pub const AVATAR_DIR: &str = "avatar";
pub const DB_FILE: &str = "twitter_data.db";

/// Main configuration structure for xv.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base directory holding `twitter-meta/`, `img/`, `avatar/` and the
    /// database file.
    pub data_root: Option<PathBuf>,
    /// Web server configuration.
    pub server: ServerConfig,
    /// Ingestion behavior configuration.
    pub ingest: IngestConfig,
    /// Page rendering configuration.
    pub view: ViewConfig,
    /// Translation vendor configuration.
    pub translation: TranslationConfig,
}

/// Web server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address. Environment variable: `XV_HOST`
    pub host: String,
    /// Listen port. Environment variable: `XV_PORT`
    pub port: u16,
}

/// Ingestion behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Fixed delay between documents, throttling outbound downloads.
    pub delay_ms: u64,
    /// Per-request HTTP timeout for avatar/banner downloads.
    pub http_timeout_secs: u64,
}

/// Page rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Tweets per timeline/profile page.
    pub per_page: u32,
    /// Maximum rows returned by a search.
    pub search_limit: u32,
    /// Maximum related tweets shown on a detail page.
    pub related_limit: u32,
}

/// Translation vendor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// API key. Environment variable: `OPENAI_API_KEY` (or `XV_TRANSLATE_KEY`).
    /// Absent key disables translation with structured failures, not errors.
    pub api_key: Option<String>,
    /// Chat-completions model name.
    pub model: String,
    /// Vendor endpoint override (custom gateways, compatible servers).
    pub endpoint: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            delay_ms: 100,
            http_timeout_secs: 30,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            per_page: 20,
            search_limit: 50,
            related_limit: 20,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Priority (highest to lowest): environment variables, user config
    /// file, compiled defaults.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(user_config) = Self::load_user_config() {
            config.merge(user_config);
        }

        config.apply_env_overrides();

        debug!("Configuration loaded: {:?}", config);
        config
    }

    /// Load configuration from a specific file.
    #[must_use]
    pub fn load_from_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            debug!("Config file not found: {}", path.display());
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    info!("Loaded config from: {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse config file {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read config file {}: {}", path.display(), e);
                None
            }
        }
    }

    fn load_user_config() -> Option<Self> {
        let config_path = Self::user_config_path()?;
        Self::load_from_file(&config_path)
    }

    /// Get the path to the user configuration file.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("xv").join("config.toml"))
    }

    /// Apply `XV_*` (and `OPENAI_API_KEY`) environment overrides on top
    /// of whatever was loaded from a file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(root) = std::env::var("XV_DATA_ROOT") {
            self.data_root = Some(PathBuf::from(root));
        }
        if let Ok(host) = std::env::var("XV_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("XV_PORT") {
            if let Ok(n) = port.parse() {
                self.server.port = n;
            }
        }
        if let Ok(delay) = std::env::var("XV_DELAY_MS") {
            if let Ok(n) = delay.parse() {
                self.ingest.delay_ms = n;
            }
        }
        if let Ok(key) = std::env::var("XV_TRANSLATE_KEY") {
            self.translation.api_key = Some(key);
        } else if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.translation.api_key = Some(key);
        }
        if let Ok(model) = std::env::var("XV_TRANSLATE_MODEL") {
            self.translation.model = model;
        }
    }

    /// Merge another config into this one (other takes precedence).
    fn merge(&mut self, other: Self) {
        if other.data_root.is_some() {
            self.data_root = other.data_root;
        }
        self.server = other.server;
        self.ingest = other.ingest;
        self.view = other.view;
        if other.translation.api_key.is_some() {
            self.translation.api_key = other.translation.api_key;
        }
        self.translation.model = other.translation.model;
        self.translation.endpoint = other.translation.endpoint;
    }
}

/// Concrete filesystem layout derived from one data root.
///
/// Handed to every component that touches disk so path derivation lives
/// in exactly one place.
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of per-tweet JSON export documents.
    #[must_use]
    pub fn meta_dir(&self) -> PathBuf {
        self.root.join(META_DIR)
    }

    /// Directory of ingested tweet media, named `{tweet_id}_*`.
    #[must_use]
    pub fn media_dir(&self) -> PathBuf {
        self.root.join(MEDIA_DIR)
    }

    /// Directory of cached avatars/banners plus the download ledger.
    #[must_use]
    pub fn avatar_dir(&self) -> PathBuf {
        self.root.join(AVATAR_DIR)
    }

    /// SQLite database file.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.root.join(DB_FILE)
    }
}
