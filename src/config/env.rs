// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use crate::services::DEFAULT_FRESHNESS_MINUTES;
use dotenv::dotenv;
use std::env;
use std::str::FromStr;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection string
    /// Format: sqlite://path/to/file.db?mode=rwc
    pub database_url: String,

    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 5000)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Maximum connections in database pool
    pub db_max_connections: u32,

    /// Connection timeout in seconds
    pub db_connection_timeout: u64,

    /// Minutes a refresh batch is served before it is regenerated
    pub freshness_window_minutes: i64,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        dotenv().ok();

        Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://atm_finder.db?mode=rwc".to_string()),

            server_address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),

            server_port: parse_or("SERVER_PORT", 5000),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 5),

            db_connection_timeout: parse_or("DB_CONNECTION_TIMEOUT", 30),

            freshness_window_minutes: parse_or("FRESHNESS_WINDOW_MINUTES", DEFAULT_FRESHNESS_MINUTES),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.database_url.is_empty() {
            return Err("DATABASE_URL is required".to_string());
        }

        if self.freshness_window_minutes <= 0 {
            return Err("FRESHNESS_WINDOW_MINUTES must be positive".to_string());
        }

        if self.db_max_connections == 0 {
            log::warn!("DB_MAX_CONNECTIONS is 0 - pool will use 1 connection");
        }

        Ok(())
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            server_address: "127.0.0.1".to_string(),
            server_port: 5000,
            environment: "test".to_string(),
            log_level: "debug".to_string(),
            db_max_connections: 1,
            db_connection_timeout: 5,
            freshness_window_minutes: 15,
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_database_url() {
        let config = Config {
            database_url: String::new(),
            ..sample()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let config = Config {
            freshness_window_minutes: 0,
            ..sample()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_or_falls_back_on_missing_key() {
        let port: u16 = parse_or("ATM_FINDER_TEST_UNSET_PORT", 5000);
        assert_eq!(port, 5000);
    }
}
