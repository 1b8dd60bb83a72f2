pub mod auth;
pub mod database;
pub mod fees;
pub mod server;
pub mod smtp;
pub mod storage;

use once_cell::sync::Lazy;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server: server::ServerConfig,
    pub database: database::DatabaseConfig,
    pub auth: auth::AuthConfig,
    pub fees: fees::FeeConfig,
    pub smtp: smtp::SmtpConfig,
    pub storage: storage::StorageConfig,

    // Build info
    pub version: String,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server: server::ServerConfig::from_env(),
            database: database::DatabaseConfig::from_env(),
            auth: auth::AuthConfig::from_env(),
            fees: fees::FeeConfig::from_env(),
            smtp: smtp::SmtpConfig::from_env(),
            storage: storage::StorageConfig::from_env(),

            version: env!("CARGO_PKG_VERSION").to_string(),

            log_level: env::var("REGISTRAR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
