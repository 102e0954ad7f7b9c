use std::env;
use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
pub const DEFAULT_LOG_FILTER: &str = "todo_backend=debug,tower_http=debug";
pub const DEFAULT_CLI_LOG_FILTER: &str = "todo_backend=warn";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
}

impl Config {
    /// Reads the server settings from the environment. Call
    /// `dotenvy::dotenv()` first to pick up a local `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: parse_var("HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: parse_var("PORT", DEFAULT_PORT)?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

pub fn api_url_from_env() -> String {
    env::var("TODO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

pub fn log_filter_from_env() -> String {
    log_filter_or(DEFAULT_LOG_FILTER)
}

/// The CLI prints to the terminal, so it only logs warnings unless told otherwise.
pub fn cli_log_filter_from_env() -> String {
    log_filter_or(DEFAULT_CLI_LOG_FILTER)
}

fn log_filter_or(default: &str) -> String {
    env::var("RUST_LOG").unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_falls_back_to_default() {
        let port: u16 = parse_var("TODO_BACKEND_TEST_UNSET_PORT", 3000).unwrap();
        assert_eq!(port, 3000);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        // SAFETY: the variable name is unique to this test.
        unsafe { env::set_var("TODO_BACKEND_TEST_GARBAGE_PORT", "abc") };

        let err = parse_var::<u16>("TODO_BACKEND_TEST_GARBAGE_PORT", 3000).unwrap_err();
        let ConfigError::Invalid { name, value } = err;
        assert_eq!(name, "TODO_BACKEND_TEST_GARBAGE_PORT");
        assert_eq!(value, "abc");
    }

    #[test]
    fn test_parse_var_trims_whitespace() {
        // SAFETY: the variable name is unique to this test.
        unsafe { env::set_var("TODO_BACKEND_TEST_PADDED_PORT", " 8080 ") };

        let port: u16 = parse_var("TODO_BACKEND_TEST_PADDED_PORT", 3000).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_log_filters_share_rust_log() {
        match env::var("RUST_LOG") {
            Ok(filter) => {
                assert_eq!(log_filter_from_env(), filter);
                assert_eq!(cli_log_filter_from_env(), filter);
            }
            Err(_) => {
                assert_eq!(log_filter_from_env(), DEFAULT_LOG_FILTER);
                assert_eq!(cli_log_filter_from_env(), DEFAULT_CLI_LOG_FILTER);
            }
        }
    }

    #[test]
    fn test_addr_joins_host_and_port() {
        let config = Config {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
        };
        assert_eq!(config.addr().to_string(), "0.0.0.0:8080");
    }
}
