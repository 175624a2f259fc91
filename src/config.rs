//! Configuration management for PDF Share Server

use serde::Deserialize;
use std::env;
use std::str::FromStr;

use crate::upload::MAX_FILE_SIZE;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted file, in bytes of actual content
    pub max_file_size: usize,
}

/// Raised when an environment variable holds an unparseable value
#[derive(Debug, thiserror::Error)]
#[error("invalid value for {key}: {value:?}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite:./pdf_share.db".to_string(),
                max_connections: 5,
            },
            upload: UploadConfig {
                max_file_size: MAX_FILE_SIZE,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port)?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections: parse_var(
                    "DATABASE_MAX_CONNECTIONS",
                    defaults.database.max_connections,
                )?,
            },
            upload: UploadConfig {
                max_file_size: parse_var("MAX_UPLOAD_BYTES", defaults.upload.max_file_size)?,
            },
        })
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError { key, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_upload_limit_is_ten_mib() {
        let config = Config::default();
        assert_eq!(config.upload.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("PDF_SHARE_TEST_PORT", "not-a-port");
        let result: Result<u16, _> = parse_var("PDF_SHARE_TEST_PORT", 1);
        env::remove_var("PDF_SHARE_TEST_PORT");

        let err = result.unwrap_err();
        assert_eq!(err.key, "PDF_SHARE_TEST_PORT");
        assert_eq!(err.value, "not-a-port");
    }

    #[test]
    fn test_parse_var_falls_back_when_unset() {
        let port: u16 = parse_var("PDF_SHARE_TEST_UNSET_VAR", 4242).unwrap();
        assert_eq!(port, 4242);
    }
}
