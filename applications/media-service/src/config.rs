/// Service configuration
use crate::error::{Result, ServiceError};
use ahoy_catalog::{CatalogConfig, DEFAULT_BASE_URL};
use ahoy_playback::{PlaybackConfig, DEFAULT_ALBUM_LABEL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "ahoy.toml";

/// Prefix of environment overrides (`AHOY_CATALOG__BASE_URL`, ...)
pub const ENV_PREFIX: &str = "AHOY";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default = "default_catalog")]
    pub catalog: CatalogSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// 0 refreshes once at startup only
    #[serde(default)]
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_restart_threshold_ms")]
    pub restart_threshold_ms: u64,

    #[serde(default = "default_album_label")]
    pub album_label: String,

    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl ServiceConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; without one, `ahoy.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ServiceError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (AHOY_<SECTION>__<KEY>)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base_url = self.catalog.base_url.trim();
        if base_url.is_empty() {
            return Err(ServiceError::Config(
                "Catalog base URL is required (set AHOY_CATALOG__BASE_URL)".to_string(),
            ));
        }

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ServiceError::Config(format!(
                "Catalog base URL must be http(s): {}",
                base_url
            )));
        }

        if self.catalog.request_timeout_secs == 0 {
            return Err(ServiceError::Config(
                "Catalog request timeout must be at least one second".to_string(),
            ));
        }

        if self.playback.event_capacity == 0 {
            return Err(ServiceError::Config(
                "Playback event capacity must be positive".to_string(),
            ));
        }

        Ok(())
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.catalog.base_url.trim().to_string(),
            connect_timeout: Duration::from_secs(self.catalog.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.catalog.request_timeout_secs),
        }
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            restart_threshold_ms: self.playback.restart_threshold_ms,
            album_label: self.playback.album_label.clone(),
            event_capacity: self.playback.event_capacity,
        }
    }

    /// Periodic refresh interval, if any
    pub fn refresh_interval(&self) -> Option<Duration> {
        match self.catalog.refresh_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

// Default values
fn default_catalog() -> CatalogSettings {
    CatalogSettings {
        base_url: default_base_url(),
        connect_timeout_secs: default_timeout_secs(),
        request_timeout_secs: default_timeout_secs(),
        refresh_interval_secs: 0,
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        restart_threshold_ms: default_restart_threshold_ms(),
        album_label: default_album_label(),
        event_capacity: default_event_capacity(),
    }
}

fn default_restart_threshold_ms() -> u64 {
    3000
}

fn default_album_label() -> String {
    DEFAULT_ALBUM_LABEL.to_string()
}

fn default_event_capacity() -> usize {
    64
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            playback: default_playback(),
        }
    }
}
