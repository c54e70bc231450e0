//! Configuration module for the tank backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderValue;

/// Default caller origin allowed through CORS.
pub const DEFAULT_CORS_ORIGIN: &str = "https://ecse3038-lab3-tester.netlify.app";

/// Which persistence backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Mongo,
    Memory,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreKind::Mongo),
            "memory" => Ok(StoreKind::Memory),
            other => Err(ConfigError::UnknownStore(other.to_string())),
        }
    }
}

/// Reasons the environment cannot produce a usable configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownStore(String),
    InvalidBindAddr(String),
    MissingMongoUrl,
    InvalidCorsOrigin(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownStore(kind) => {
                write!(f, "unknown TANKS_STORE '{}' (expected mongo or memory)", kind)
            }
            ConfigError::InvalidBindAddr(addr) => {
                write!(f, "invalid TANKS_BIND_ADDR format: {}", addr)
            }
            ConfigError::MissingMongoUrl => {
                write!(f, "TANKS_MONGODB_URL is required when TANKS_STORE=mongo")
            }
            ConfigError::InvalidCorsOrigin(origin) => {
                write!(f, "invalid TANKS_CORS_ORIGIN: {}", origin)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Persistence backend
    pub store: StoreKind,
    /// Document store connection string
    pub mongodb_url: Option<String>,
    /// Database holding the tanks collection
    pub tank_database: String,
    /// Database holding the profile collection
    pub profile_database: String,
    /// Collection holding the profile document
    pub profile_collection: String,
    /// The single origin allowed to call the API from a browser
    pub cors_origin: HeaderValue,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let store = env::var("TANKS_STORE")
            .unwrap_or_else(|_| "mongo".to_string())
            .parse()?;

        let mongodb_url = env::var("TANKS_MONGODB_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        if store == StoreKind::Mongo && mongodb_url.is_none() {
            return Err(ConfigError::MissingMongoUrl);
        }

        let tank_database =
            env::var("TANKS_TANK_DATABASE").unwrap_or_else(|_| "watertanks".to_string());

        let profile_database =
            env::var("TANKS_PROFILE_DATABASE").unwrap_or_else(|_| "info".to_string());

        let profile_collection =
            env::var("TANKS_PROFILE_COLLECTION").unwrap_or_else(|_| "Files".to_string());

        let raw_origin =
            env::var("TANKS_CORS_ORIGIN").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());
        let cors_origin = HeaderValue::from_str(&raw_origin)
            .map_err(|_| ConfigError::InvalidCorsOrigin(raw_origin))?;

        let raw_addr = env::var("TANKS_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(raw_addr))?;

        let log_level = env::var("TANKS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = env::var("TANKS_LOG_FORMAT")
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            store,
            mongodb_url,
            tank_database,
            profile_database,
            profile_collection,
            cors_origin,
            bind_addr,
            log_level,
            log_json,
        })
    }

    /// Configuration for an in-process memory store.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            store: StoreKind::Memory,
            mongodb_url: None,
            tank_database: "watertanks".to_string(),
            profile_database: "info".to_string(),
            profile_collection: "Files".to_string(),
            cors_origin: HeaderValue::from_static(DEFAULT_CORS_ORIGIN),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            log_level: "warn".to_string(),
            log_json: false,
        }
    }
}
