//! Process configuration, read once at startup from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::ConfigError;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: usize = 16;

/// Runtime configuration for the gateway process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string (`DATABASE_URL`).
    pub database_url: String,
    /// Listen port (`PORT`, default 8080).
    pub port: u16,
    /// Maximum connections held by the pool (`CLIENTDESK_DB_POOL_SIZE`).
    pub pool_size: usize,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// `DATABASE_URL` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required_env("DATABASE_URL")?;
        let port = parse_env("PORT", DEFAULT_PORT)?;
        let pool_size = parse_env("CLIENTDESK_DB_POOL_SIZE", DEFAULT_POOL_SIZE)?;

        if pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "CLIENTDESK_DB_POOL_SIZE".to_string(),
                message: "pool size must be at least 1".to_string(),
            });
        }

        Ok(Self {
            database_url,
            port,
            pool_size,
        })
    }

    /// Address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }
}

fn required_env(key: &str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingValue {
            key: key.to_string(),
        }),
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{e}"),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_env_falls_back_to_default() {
        assert_eq!(parse_env("CLIENTDESK_TEST_UNSET", 8080u16).unwrap(), 8080);
    }

    #[test]
    fn parse_env_rejects_garbage() {
        // Env mutation is process-global, so use a key no other test touches.
        unsafe { std::env::set_var("CLIENTDESK_TEST_BAD_PORT", "not-a-port") };
        let err = parse_env("CLIENTDESK_TEST_BAD_PORT", 8080u16).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn missing_database_url_is_an_error() {
        unsafe { std::env::remove_var("DATABASE_URL") };
        let err = required_env("DATABASE_URL").unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue { .. }));
    }
}
