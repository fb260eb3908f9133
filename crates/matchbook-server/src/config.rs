//! Configuration for the matchbook TCP host.
//!
//! Intentionally simple: defaults, overridable via a few environment
//! variables:
//!
//! - `MATCHBOOK_BIND_ADDR`           (default: "0.0.0.0")
//! - `MATCHBOOK_PORT`                (default: "9000")
//! - `MATCHBOOK_MAX_CLIENTS`         (default: "1024")
//! - `MATCHBOOK_SNAPSHOT_TIMEOUT_MS` (default: "1000")

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously connected clients.
    pub max_clients: usize,

    /// How long a client task waits for the engine to answer a
    /// snapshot query before replying with an error.
    pub snapshot_timeout: Duration,
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to reasonable defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            env::var("MATCHBOOK_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = read_env_or_default("MATCHBOOK_PORT", 9000u16)?;
        let max_clients = read_env_or_default("MATCHBOOK_MAX_CLIENTS", 1024usize)?;
        let snapshot_timeout_ms = read_env_or_default("MATCHBOOK_SNAPSHOT_TIMEOUT_MS", 1000u64)?;

        Ok(Config {
            bind_addr,
            port,
            max_clients,
            snapshot_timeout: Duration::from_millis(snapshot_timeout_ms),
        })
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn read_env_or_default<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_addr_joins_addr_and_port() {
        let config = Config {
            bind_addr: "127.0.0.1".to_string(),
            port: 9000,
            max_clients: 1024,
            snapshot_timeout: Duration::from_millis(1000),
        };

        assert_eq!(config.socket_addr_string(), "127.0.0.1:9000");
    }

    #[test]
    fn parse_falls_back_to_default_when_unset() {
        assert_eq!(
            read_env_or_default("MATCHBOOK_TEST_UNSET_KEY", 42usize).unwrap(),
            42
        );
    }
}
