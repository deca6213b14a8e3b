use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use types::errors::ConfigError;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// Service configuration, read from the environment
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Endpoint returning a JSON record batch; refresh is disabled without it
    pub upstream_url: Option<String>,
    /// JSON file overriding the normalizer's field configuration
    pub fields_config: Option<PathBuf>,
    /// JSON file overriding the export layout
    pub export_config: Option<PathBuf>,
    pub fetch_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            upstream_url: None,
            fields_config: None,
            export_config: None,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Read `DASHBOARD_BIND_ADDR`, `DASHBOARD_UPSTREAM_URL`,
    /// `DASHBOARD_FIELDS_CONFIG`, `DASHBOARD_EXPORT_CONFIG` and
    /// `DASHBOARD_FETCH_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = non_empty("DASHBOARD_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("DASHBOARD_BIND_ADDR", format!("{e}")))?;

        let fetch_timeout = match non_empty("DASHBOARD_FETCH_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::invalid("DASHBOARD_FETCH_TIMEOUT_SECS", format!("{e}"))
            })?),
            None => Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        };

        Ok(Self {
            bind_addr,
            upstream_url: non_empty("DASHBOARD_UPSTREAM_URL"),
            fields_config: non_empty("DASHBOARD_FIELDS_CONFIG").map(PathBuf::from),
            export_config: non_empty("DASHBOARD_EXPORT_CONFIG").map(PathBuf::from),
            fetch_timeout,
        })
    }
}
