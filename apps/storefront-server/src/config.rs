//! Storefront server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//! Shell settings (backend URL, channels, session secret) live in the
//! storefront TOML file whose path is given here.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use url::Url;

/// Storefront server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port
    pub port: u16,

    /// Interface to bind to
    pub bind_addr: String,

    /// Path of the storefront TOML file (default location when unset)
    pub storefront_config: Option<PathBuf>,

    /// Host header -> shop API URL for multi-tenant deployments
    pub tenants: HashMap<String, Url>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(ServerConfig {
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),

            storefront_config: lookup("STOREFRONT_CONFIG").map(PathBuf::from),

            tenants: match lookup("STOREFRONT_TENANTS") {
                Some(raw) => parse_tenants(&raw)?,
                None => HashMap::new(),
            },
        })
    }

    /// Socket address string for the listener.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// Parses `host=url,host=url` into a tenant map. Hosts are lowercased.
pub fn parse_tenants(raw: &str) -> Result<HashMap<String, Url>, ConfigError> {
    let mut tenants = HashMap::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (host, api_url) = entry
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidTenant(entry.to_string()))?;

        let host = host.trim().to_ascii_lowercase();
        if host.is_empty() {
            return Err(ConfigError::InvalidTenant(entry.to_string()));
        }

        let api_url =
            Url::parse(api_url.trim()).map_err(|_| ConfigError::InvalidTenant(entry.to_string()))?;
        tenants.insert(host, api_url);
    }

    Ok(tenants)
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Invalid tenant entry '{0}', expected host=url")]
    InvalidTenant(String),
}
