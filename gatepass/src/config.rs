//! Application configuration loaded from environment variables.

use serde::Deserialize;
use std::env;

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Access ledger settings
    pub ledger: LedgerConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout_secs: u64,
}

/// Access ledger settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Window in seconds within which an identical scan for the same guest
    /// is treated as a duplicate of the previous one. Zero disables
    /// deduplication.
    pub scan_dedup_window_secs: u64,
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but fails to parse.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env::var("GATEPASS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("GATEPASS_PORT", 8080)?,
                log_level: env::var("GATEPASS_LOG_LEVEL")
                    .unwrap_or_else(|_| "gatepass=debug,tower_http=debug,info".to_string()),
                shutdown_timeout_secs: parse_var("GATEPASS_SHUTDOWN_TIMEOUT_SECS", 30)?,
            },
            ledger: LedgerConfig {
                scan_dedup_window_secs: parse_var("GATEPASS_SCAN_DEDUP_WINDOW_SECS", 0)?,
            },
        })
    }

    /// Address string for binding the listener
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                log_level: "gatepass=debug,info".to_string(),
                shutdown_timeout_secs: 30,
            },
            ledger: LedgerConfig {
                scan_dedup_window_secs: 0,
            },
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {name}: {e}")),
        Err(_) => Ok(default),
    }
}
