//! Gateway configuration loaded from environment variables.
//!
//! | variable | default |
//! |---|---|
//! | `PORT` | `3000` |
//! | `CLIENT_URL` | unset (no CORS origin allowed) |
//! | `DATABASE_URL` | unset (in-memory repository) |
//! | `UPLOAD_DIR` | `uploads` |
//! | `PUBLIC_BASE_URL` | `http://localhost:{PORT}` |
//! | `MAX_UPLOAD_BYTES` | `10485760` |
//! | `PRODUCT_LIST_ORDER` | `newest` |

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
}

/// Order in which `GET /products` returns the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl core::str::FromStr for ListOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" | "desc" => Ok(Self::NewestFirst),
            "oldest" | "asc" => Ok(Self::OldestFirst),
            other => Err(format!("expected newest or oldest, got {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub port: u16,
    /// Browser origin allowed to call the API with credentials.
    pub client_origin: Option<String>,
    pub database_url: Option<String>,
    pub upload_dir: PathBuf,
    /// Prefix for image URLs handed back to clients (no trailing slash).
    pub public_base_url: String,
    pub max_upload_bytes: usize,
    pub list_order: ListOrder,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            client_origin: None,
            database_url: None,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            public_base_url: format!("http://localhost:{DEFAULT_PORT}"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            list_order: ListOrder::default(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidEnvVar("PORT", e.to_string()))?,
            None => DEFAULT_PORT,
        };

        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidEnvVar("MAX_UPLOAD_BYTES", e.to_string()))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let list_order = match get("PRODUCT_LIST_ORDER") {
            Some(v) => v
                .parse::<ListOrder>()
                .map_err(|e| ConfigError::InvalidEnvVar("PRODUCT_LIST_ORDER", e))?,
            None => ListOrder::default(),
        };

        let public_base_url = get("PUBLIC_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{port}"));

        Ok(Self {
            port,
            client_origin: get("CLIENT_URL").map(|v| v.trim().trim_end_matches('/').to_string()),
            database_url: get("DATABASE_URL"),
            upload_dir: get("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            public_base_url,
            max_upload_bytes,
            list_order,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
