use std::{net::SocketAddr, time::Duration};

use ::config::Environment;
use serde::Deserialize;

/// Process configuration, loaded once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("config error: {0}")]
    Load(#[from] ::config::ConfigError),
}

/// Flat view of the environment. Keys are the lowercased variable names.
#[derive(Debug, Deserialize)]
struct EnvSettings {
    database_url: Option<String>,
    database_max_connections: u32,
    database_connect_timeout_secs: u64,
    server_host: String,
    server_port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                key: "SERVER_HOST",
                value: self.host.clone(),
            })
    }
}

/// Loads the configuration from the process environment.
pub fn load() -> Result<Config, ConfigError> {
    Config::from_environment(Environment::default())
}

impl Config {
    /// Builds the configuration from an environment source. Tests pass an
    /// explicit map through `Environment::source`.
    pub fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        let settings: EnvSettings = ::config::Config::builder()
            .set_default("database_max_connections", 10_i64)?
            .set_default("database_connect_timeout_secs", 5_i64)?
            .set_default("server_host", "0.0.0.0")?
            .set_default("server_port", 3000_i64)?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;

        let url = settings
            .database_url
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        if settings.database_max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value: settings.database_max_connections.to_string(),
            });
        }

        Ok(Self {
            server: ServerConfig {
                host: settings.server_host,
                port: settings.server_port,
            },
            database: DatabaseConfig {
                url,
                max_connections: settings.database_max_connections,
                connect_timeout: Duration::from_secs(settings.database_connect_timeout_secs),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use ::config::Map;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        let map: Map<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::default().source(Some(map))
    }

    #[test]
    fn defaults_apply_when_only_url_is_set() {
        let config =
            Config::from_environment(env(&[("DATABASE_URL", "postgres://localhost/hospital")]))
                .unwrap();

        assert_eq!(config.database.url, "postgres://localhost/hospital");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(
            config.server.address().unwrap(),
            "0.0.0.0:3000".parse().unwrap()
        );
    }

    #[test]
    fn missing_url_is_an_error() {
        let err = Config::from_environment(env(&[("SERVER_PORT", "8080")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")), "got {err:?}");

        let err = Config::from_environment(env(&[("DATABASE_URL", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")), "got {err:?}");
    }

    #[test]
    fn invalid_number_is_rejected() {
        let err = Config::from_environment(env(&[
            ("DATABASE_URL", "postgres://localhost/hospital"),
            ("SERVER_PORT", "eighty"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Load(_)), "got {err:?}");
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let err = Config::from_environment(env(&[
            ("DATABASE_URL", "postgres://localhost/hospital"),
            ("DATABASE_MAX_CONNECTIONS", "0"),
        ]))
        .unwrap_err();

        match err {
            ConfigError::Invalid { key, value } => {
                assert_eq!(key, "DATABASE_MAX_CONNECTIONS");
                assert_eq!(value, "0");
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_environment(env(&[
            ("DATABASE_URL", "postgres://db/hospital"),
            ("DATABASE_MAX_CONNECTIONS", "25"),
            ("DATABASE_CONNECT_TIMEOUT_SECS", "2"),
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.database.max_connections, 25);
        assert_eq!(config.database.connect_timeout, Duration::from_secs(2));
        assert_eq!(
            config.server.address().unwrap(),
            "127.0.0.1:8080".parse().unwrap()
        );
    }
}
