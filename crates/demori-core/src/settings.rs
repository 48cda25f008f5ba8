//! Engine settings for Demori.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. The orchestrator takes a settings
//! snapshot at construction and only picks up changes on explicit update
//! notifications; nothing in the engine polls this file.

use crate::error::{ConfigError, ConfigResult};
use crate::types::SourceId;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Main engine configuration.
///
/// This is loaded from `~/.config/demori/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Search behavior settings
    pub search: SearchSettings,
    /// Result cache settings
    pub cache: CacheSettings,
    /// Remote store sync settings
    pub sync: SyncSettings,
    /// Per-source enable flags
    pub sources: SourceToggles,
    /// Remote contact store connection (absent = no remote store)
    pub remote: Option<RemoteSettings>,
}

impl EngineSettings {
    /// Load settings from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading settings from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let settings = toml::from_str(&contents)?;
            Ok(settings)
        } else {
            tracing::debug!("Settings file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load settings with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `DEMORI_SEARCH_TIMEOUT_SECS`: Override the per-search timeout
    /// - `DEMORI_CACHE_DURATION_SECS`: Override the cache TTL
    /// - `DEMORI_REMOTE_URL`: Override the remote store base URL
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut settings = Self::load()?;

        if let Ok(val) = std::env::var("DEMORI_SEARCH_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                settings.search.timeout_secs = secs;
                tracing::debug!("Override search.timeout_secs from env: {}", secs);
            }
        }

        if let Ok(val) = std::env::var("DEMORI_CACHE_DURATION_SECS") {
            if let Ok(secs) = val.parse() {
                settings.cache.duration_secs = secs;
                tracing::debug!("Override cache.duration_secs from env: {}", secs);
            }
        }

        if let Ok(url) = std::env::var("DEMORI_REMOTE_URL") {
            if let Some(remote) = settings.remote.as_mut() {
                remote.base_url = url;
            }
        }

        Ok(settings)
    }

    /// Save settings to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving settings to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the settings file.
    ///
    /// Uses XDG base directories: `~/.config/demori/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("app", "demori", "demori").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path (database location).
    ///
    /// Uses XDG base directories: `~/.local/share/demori`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("app", "demori", "demori").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Per-search timeout as a `Duration`.
    #[must_use]
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search.timeout_secs)
    }

    /// Cache TTL as a `Duration`.
    #[must_use]
    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache.duration_secs)
    }

    /// Confidence threshold mapped from the stored 0-100 scale to [0,1].
    #[must_use]
    pub fn confidence_threshold(&self) -> f64 {
        f64::from(self.search.confidence_threshold.min(100)) / 100.0
    }
}

/// Search behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchSettings {
    /// How many pattern variants each adapter should try (1-3)
    pub search_depth: u8,
    /// Minimum confidence to accept from the remote store, 0-100
    pub confidence_threshold: u8,
    /// Per-search wall-clock timeout in seconds
    pub timeout_secs: u64,
    /// Maximum adapters queried concurrently within one search
    pub concurrent_searches: usize,
    /// Maximum results requested from the remote store
    pub max_results: u32,
    /// Whether the email verification adapter should mark addresses verified
    pub email_verification: bool,
    /// Whether the phone validation adapter should run region checks
    pub phone_validation: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            search_depth: 2,
            confidence_threshold: 50,
            timeout_secs: 30,
            concurrent_searches: 3,
            max_results: 10,
            email_verification: true,
            phone_validation: true,
        }
    }
}

/// Result cache settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheSettings {
    /// How long a cached profile stays valid, in seconds
    pub duration_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            duration_secs: 3600,
        }
    }
}

/// When queued writes are pushed to the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Sync immediately after every search
    Realtime,
    /// Sync on an hourly schedule (driven by the surrounding app)
    Hourly,
    /// Sync on a daily schedule (driven by the surrounding app)
    Daily,
    /// Sync only when explicitly requested
    Manual,
}

/// Remote store sync settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncSettings {
    /// Sync trigger mode
    pub mode: SyncMode,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            mode: SyncMode::Manual,
        }
    }
}

/// Per-source enable flags.
///
/// The registry consults these at call time, so flipping a flag and
/// notifying the orchestrator is enough to add or drop a source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SourceToggles {
    /// Company website pattern guessing
    pub company_websites: bool,
    /// Professional directory lookups
    pub professional_directories: bool,
    /// Social platform handle guessing
    pub social_platforms: bool,
    /// Email verification
    pub email_verification: bool,
    /// Phone format validation
    pub phone_validation: bool,
}

impl Default for SourceToggles {
    fn default() -> Self {
        Self {
            company_websites: true,
            professional_directories: true,
            social_platforms: true,
            email_verification: true,
            phone_validation: true,
        }
    }
}

impl SourceToggles {
    /// All sources disabled.
    #[must_use]
    pub fn none() -> Self {
        Self {
            company_websites: false,
            professional_directories: false,
            social_platforms: false,
            email_verification: false,
            phone_validation: false,
        }
    }

    /// Whether the source with the given ID is enabled.
    ///
    /// Unrecognized IDs are disabled.
    #[must_use]
    pub fn is_enabled(&self, id: &SourceId) -> bool {
        match id.as_str() {
            "company-website" => self.company_websites,
            "professional-directory" => self.professional_directories,
            "social-platforms" => self.social_platforms,
            "email-verification" => self.email_verification,
            "phone-validation" => self.phone_validation,
            _ => false,
        }
    }

    /// Whether no source is enabled.
    #[must_use]
    pub fn all_disabled(&self) -> bool {
        !(self.company_websites
            || self.professional_directories
            || self.social_platforms
            || self.email_verification
            || self.phone_validation)
    }
}

/// Remote contact store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteSettings {
    /// Base URL of the remote store API
    pub base_url: String,
    /// Bearer API key
    pub api_key: String,
    /// Stable user identifier attached to every request
    pub user_id: String,
}
