//! Client configuration following 12-factor app principles
//!
//! All configuration is loaded from environment variables (optionally via a
//! `.env` file) so the same binary can point at any Freehub API deployment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_ASSET_URL: &str = "http://localhost:5000";
const DEFAULT_PROVIDER: &str = "http";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the marketplace REST API
    pub api_url: String,

    /// Base URL used to resolve relative image paths
    pub asset_url: String,

    /// Directory holding client-local state (cart, session)
    pub data_dir: PathBuf,

    /// API provider (http, mock)
    pub provider: String,

    /// Per-request timeout; `None` keeps the transport default
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let data_dir = match env::var("FREEHUB_DATA_DIR") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => default_data_dir(),
        };

        let request_timeout = match env::var("FREEHUB_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    Error::Configuration(format!(
                        "FREEHUB_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        let config = Self {
            api_url: env::var("FREEHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            asset_url: env::var("FREEHUB_ASSET_URL")
                .unwrap_or_else(|_| DEFAULT_ASSET_URL.to_string()),
            data_dir,
            provider: env::var("FREEHUB_API_PROVIDER")
                .unwrap_or_else(|_| DEFAULT_PROVIDER.to_string()),
            request_timeout,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a working client
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [("FREEHUB_API_URL", &self.api_url), ("FREEHUB_ASSET_URL", &self.asset_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::Configuration(format!(
                    "{name} must be an http(s) URL, got {url:?}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            asset_url: DEFAULT_ASSET_URL.to_string(),
            data_dir: default_data_dir(),
            provider: DEFAULT_PROVIDER.to_string(),
            request_timeout: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("freehub"))
        .unwrap_or_else(|| PathBuf::from(".freehub"))
}
