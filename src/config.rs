//! Environment-driven configuration.
//!
//! Values are read from the process environment after loading an optional
//! `.env` file.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_DOWNLOAD_DIR: &str = "./downloads";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Connection settings for the admin API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api: ApiConfig,
    /// Second session marker alongside the API token.
    pub admin_user: Option<String>,
    pub download_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let base_url =
            non_empty("ADMIN_API_BASE_URL").ok_or(ConfigError::Missing("ADMIN_API_BASE_URL"))?;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "ADMIN_API_BASE_URL",
                value: base_url,
                reason: "expected an http:// or https:// URL".to_string(),
            });
        }

        let timeout_secs = match non_empty("ADMIN_API_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "ADMIN_API_TIMEOUT_SECS",
                        value: raw,
                        reason: "expected a positive number of seconds".to_string(),
                    })
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        let token = non_empty("ADMIN_API_TOKEN");
        if token.is_none() {
            log::warn!("ADMIN_API_TOKEN not set, requests will be sent without authorization");
        }

        Ok(Self {
            api: ApiConfig {
                base_url,
                token,
                timeout: Duration::from_secs(timeout_secs),
            },
            admin_user: non_empty("ADMIN_USER"),
            download_dir: non_empty("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_DIR)),
        })
    }
}
