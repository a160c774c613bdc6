//! Configuration model loaded from external sources.

use serde::Deserialize;
use thiserror::Error;

use crate::db::DEFAULT_POOL_SIZE;

/// Shortest secret accepted for signing cookies.
pub const MIN_SECRET_LEN: usize = 64;

/// Configuration values the server refuses to start with.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the secret must be at least {MIN_SECRET_LEN} bytes long")]
    ShortSecret,
    #[error("page_size must be greater than zero")]
    ZeroPageSize,
}

fn default_page_size() -> usize {
    10
}

fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    pub templates_dir: String,
    pub secret: String,
    /// Where unauthenticated users are sent to sign in.
    pub auth_service_url: String,
    /// Rows per page on every list screen.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl ServerConfig {
    /// Checks values that would otherwise only fail once requests arrive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::ShortSecret);
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }
}
