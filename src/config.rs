//! Process configuration, read from the environment at startup.
//!
//! Only the webhook secret is mandatory. Serving webhooks without signature
//! verification would leave an open write surface, so its absence is fatal
//! before the socket is ever bound. The GitHub token is optional: without it
//! the handlers run in observe-only mode.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the webhook shared secret.
pub const ENV_WEBHOOK_SECRET: &str = "WEBHOOK_SECRET";
/// Environment variable holding the optional GitHub API token.
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
/// Environment variable overriding the bind address.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
/// Environment variable overriding the per-delivery handler budget.
pub const ENV_HANDLER_TIMEOUT_SECS: &str = "HANDLER_TIMEOUT_SECS";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_HANDLER_TIMEOUT_SECS: u64 = 30;

/// Errors that prevent the process from starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The shared secret is absent or empty.
    #[error("{ENV_WEBHOOK_SECRET} must be set; refusing to serve unauthenticated webhooks")]
    MissingSecret,

    /// The bind address did not parse.
    #[error("{ENV_BIND_ADDR} is not a valid socket address: {0}")]
    InvalidBindAddr(String),

    /// The handler timeout did not parse as a positive integer.
    #[error("{ENV_HANDLER_TIMEOUT_SECS} is not a positive integer: {0}")]
    InvalidTimeout(String),
}

/// Validated startup configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret for webhook signature verification.
    pub webhook_secret: Vec<u8>,

    /// Optional GitHub API token; `None` degrades handlers to no-op mode
    /// for API-dependent steps.
    pub github_token: Option<String>,

    /// Address the HTTP server binds.
    pub bind_addr: SocketAddr,

    /// Per-delivery handler budget enforced by the dispatch supervisor.
    pub handler_timeout: Duration,
}

impl Config {
    /// Reads and validates configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through an injectable lookup, for tests.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let webhook_secret = match lookup(ENV_WEBHOOK_SECRET) {
            Some(secret) if !secret.is_empty() => secret.into_bytes(),
            _ => return Err(ConfigError::MissingSecret),
        };

        let github_token = lookup(ENV_GITHUB_TOKEN).filter(|t| !t.is_empty());

        let bind_addr = lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_addr))?;

        let handler_timeout = match lookup(ENV_HANDLER_TIMEOUT_SECS) {
            None => Duration::from_secs(DEFAULT_HANDLER_TIMEOUT_SECS),
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
        };

        Ok(Config {
            webhook_secret,
            github_token,
            bind_addr,
            handler_timeout,
        })
    }
}
