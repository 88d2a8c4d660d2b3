//! # gs-config
//!
//! Layered configuration loading for group sync using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`GSYNC_*` prefix, `__` as separator)
//! 2. Project-level `.gsync/config.toml`
//! 3. User-level `~/.config/gsync/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `GSYNC_DATABASE__PATH` -> `database.path`,
//! `GSYNC_SYNC__ENABLED` -> `sync.enabled`, etc.
//!
//! ```no_run
//! use gs_config::GsConfig;
//!
//! let config = GsConfig::load_with_dotenv().expect("config");
//! if config.sync.enabled {
//!     println!("store: {}", config.database.path);
//! }
//! ```

mod database;
mod error;
mod sync;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use sync::SyncConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GsConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl GsConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".gsync/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("GSYNC_").split("__"))
    }

    /// Reject values that would make the engine misbehave.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.sync.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sync.max_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gsync").join("config.toml"))
    }
}
