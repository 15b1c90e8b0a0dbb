//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (LINKVAULT_*)
//! 2. TOML config file (if LINKVAULT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (LINKVAULT_*)
/// 2. TOML config file (if LINKVAULT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Secret used to sign and verify JWTs.
    ///
    /// Set via LINKVAULT_JWT_SECRET environment variable.
    /// Required only when the API server boots.
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Path to the SQLite database.
    ///
    /// Set via LINKVAULT_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Address the API server binds to.
    ///
    /// Set via LINKVAULT_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// User-Agent string for metadata fetches.
    ///
    /// Set via LINKVAULT_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to read per metadata fetch.
    ///
    /// Set via LINKVAULT_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Metadata fetch timeout in milliseconds.
    ///
    /// Set via LINKVAULT_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects to follow during a metadata fetch.
    ///
    /// Set via LINKVAULT_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Whether to accept invalid TLS certificates during metadata fetches.
    ///
    /// Bookmarked sites frequently ship broken TLS; the fetch is read-only
    /// and non-sensitive, so content wins over transport authentication.
    /// Set via LINKVAULT_ACCEPT_INVALID_CERTS environment variable.
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./linkvault.sqlite")
}

fn default_bind_addr() -> String {
    "127.0.0.1:8008".into()
}

fn default_user_agent() -> String {
    "linkvault/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            db_path: default_db_path(),
            bind_addr: default_bind_addr(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            accept_invalid_certs: true,
        }
    }
}

impl AppConfig {
    /// Fetch timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `LINKVAULT_`
    /// 2. TOML file from `LINKVAULT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("LINKVAULT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("LINKVAULT_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check that the JWT signing secret is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the secret is not set.
    pub fn require_jwt_secret(&self) -> Result<&str, ConfigError> {
        self.jwt_secret.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "jwt_secret".into(),
            hint: "Set LINKVAULT_JWT_SECRET environment variable".into(),
        })
    }
}
