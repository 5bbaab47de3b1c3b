use std::env;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_PENDING_ACTION_TIMEOUT_SECS: u64 = 120;

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// `None` disables auto-resolution of parked turns.
    pub pending_action_timeout: Option<Duration>,
    /// When set, finished matches are written to Postgres.
    pub database_url: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var("BACKEND_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var("BACKEND_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::config(format!("BACKEND_PORT must be a valid port number, got '{raw}'"))
            })?,
            None => DEFAULT_PORT,
        };
        let jwt_secret = var("BACKEND_JWT_SECRET").ok_or_else(|| {
            AppError::config("Required environment variable 'BACKEND_JWT_SECRET' is not set".to_string())
        })?;
        let timeout_secs = match var("PENDING_ACTION_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::config(format!(
                    "PENDING_ACTION_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ))
            })?,
            None => DEFAULT_PENDING_ACTION_TIMEOUT_SECS,
        };

        Ok(Self {
            host,
            port,
            jwt_secret,
            pending_action_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            database_url: var("DATABASE_URL"),
        })
    }
}
