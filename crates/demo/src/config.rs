//! Process configuration from the environment.
//!
//! | variable         | default     |
//! |------------------|-------------|
//! | `HOST`           | `localhost` |
//! | `PORT`           | `8080`      |
//! | `MAX_BODY_BYTES` | `1048576`   |
//!
//! Log verbosity is read separately by the subscriber from `RUST_LOG`.

use std::env;

use routekit_http::codec::DEFAULT_MAX_BODY_SIZE;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {name}")]
    InvalidValue { name: &'static str, value: String },
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`; unset and empty variables take their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let host = read("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = match read("PORT") {
            Some(value) => parse("PORT", value)?,
            None => DEFAULT_PORT,
        };
        let max_body_size = match read("MAX_BODY_BYTES") {
            Some(value) => parse("MAX_BODY_BYTES", value)?,
            None => DEFAULT_MAX_BODY_SIZE,
        };

        Ok(Self { host, port, max_body_size })
    }

    /// `host:port`, ready for the server to bind.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_owned(), port: DEFAULT_PORT, max_body_size: DEFAULT_MAX_BODY_SIZE }
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_e| ConfigError::InvalidValue { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.address(), "localhost:8080");
        assert_eq!(config.max_body_size, 1024 * 1024);
    }

    #[test]
    fn reads_host_and_port() {
        let config = config(&[("HOST", "0.0.0.0"), ("PORT", "9000"), ("MAX_BODY_BYTES", "2048")]).unwrap();

        assert_eq!(config.address(), "0.0.0.0:9000");
        assert_eq!(config.max_body_size, 2048);
    }

    #[test]
    fn empty_values_fall_back() {
        assert_eq!(config(&[("HOST", ""), ("PORT", " ")]).unwrap().address(), "localhost:8080");
    }

    #[test]
    fn invalid_port() {
        assert_eq!(
            config(&[("PORT", "eighty")]).unwrap_err(),
            ConfigError::InvalidValue { name: "PORT", value: "eighty".into() }
        );
        assert!(config(&[("PORT", "70000")]).is_err());
    }
}
