//! # Storefront Configuration
//!
//! Configuration for the shell: where the shop API lives, which channel is
//! the default, how the session cookie is signed, and the geolocation
//! service used for first-visit channel defaults.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_API_URL / VENDURE_API_URL                               │
//! │     STOREFRONT_DEFAULT_CHANNEL                                         │
//! │     STOREFRONT_SESSION_SECRET                                          │
//! │     STOREFRONT_GEOLOCATION_URL, STOREFRONT_GEOLOCATION_ENABLED         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:3000/shop-api, __default_channel__                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [backend]
//! api_url = "https://shop.example/shop-api"
//! timeout_secs = 10
//!
//! [channel]
//! default_token = "__default_channel__"
//! eu_token = "eu"
//!
//! [session]
//! cookie_name = "__session"
//! secret = "change-me"
//! max_age_secs = 2592000
//! secure = true
//!
//! [geolocation]
//! enabled = true
//! url = "https://ipapi.co/json/"
//! timeout_ms = 3000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ShellError, ShellResult};
use storefront_backend::BackendConfig;
use storefront_core::{DEFAULT_CHANNEL_TOKEN, EU_CHANNEL_TOKEN};

/// Secret used when none is configured. Fine for local development only.
pub const DEV_SESSION_SECRET: &str = "storefront-dev-secret";

/// Upper bound for the session cookie lifetime (400 days, the browser cap).
pub const MAX_SESSION_AGE_SECS: i64 = 400 * 24 * 60 * 60;

// =============================================================================
// Backend Settings
// =============================================================================

/// Where and how to reach the shop API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Default GraphQL endpoint. A per-tenant override may replace it per
    /// request.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-call timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:3000/shop-api".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Channel Settings
// =============================================================================

/// Channel tokens the shell knows by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSettings {
    /// Sent as `vendure-token` when the session has no explicit channel.
    #[serde(default = "default_channel_token")]
    pub default_token: String,

    /// Channel chosen for visitors geolocated in the EU.
    #[serde(default = "default_eu_token")]
    pub eu_token: String,
}

fn default_channel_token() -> String {
    DEFAULT_CHANNEL_TOKEN.to_string()
}

fn default_eu_token() -> String {
    EU_CHANNEL_TOKEN.to_string()
}

impl Default for ChannelSettings {
    fn default() -> Self {
        ChannelSettings {
            default_token: default_channel_token(),
            eu_token: default_eu_token(),
        }
    }
}

// =============================================================================
// Session Settings
// =============================================================================

/// Cookie session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// HMAC secret for the session cookie.
    #[serde(default = "default_secret")]
    pub secret: String,

    /// Cookie lifetime (seconds).
    #[serde(default = "default_max_age")]
    pub max_age_secs: i64,

    /// Adds the `Secure` attribute to the cookie.
    #[serde(default)]
    pub secure: bool,
}

fn default_cookie_name() -> String {
    "__session".to_string()
}

fn default_secret() -> String {
    DEV_SESSION_SECRET.to_string()
}

fn default_max_age() -> i64 {
    60 * 60 * 24 * 30
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            cookie_name: default_cookie_name(),
            secret: default_secret(),
            max_age_secs: default_max_age(),
            secure: false,
        }
    }
}

// =============================================================================
// Geolocation Settings
// =============================================================================

/// First-visit geolocation lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_geolocation_url")]
    pub url: String,

    /// Lookup timeout (milliseconds). There is no retry.
    #[serde(default = "default_geolocation_timeout")]
    pub timeout_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_geolocation_url() -> String {
    "https://ipapi.co/json/".to_string()
}

fn default_geolocation_timeout() -> u64 {
    3000
}

impl Default for GeolocationSettings {
    fn default() -> Self {
        GeolocationSettings {
            enabled: true,
            url: default_geolocation_url(),
            timeout_ms: default_geolocation_timeout(),
        }
    }
}

// =============================================================================
// Main Storefront Configuration
// =============================================================================

/// Complete storefront shell configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub channel: ChannelSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub geolocation: GeolocationSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ShellResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        if config.session.secret == DEV_SESSION_SECRET {
            warn!("Using the development session secret; set STOREFRONT_SESSION_SECRET");
        }

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ShellResult<()> {
        self.api_url()?;

        if self.backend.timeout_secs == 0 {
            return Err(ShellError::InvalidConfig(
                "backend.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.channel.default_token.trim().is_empty() {
            return Err(ShellError::InvalidConfig(
                "channel.default_token must not be empty".into(),
            ));
        }

        if self.session.secret.is_empty() {
            return Err(ShellError::InvalidConfig(
                "session.secret must not be empty".into(),
            ));
        }

        if !(1..=MAX_SESSION_AGE_SECS).contains(&self.session.max_age_secs) {
            return Err(ShellError::InvalidConfig(format!(
                "session.max_age_secs must be between 1 and {}",
                MAX_SESSION_AGE_SECS
            )));
        }

        if self.geolocation.enabled {
            Url::parse(&self.geolocation.url)?;
            if self.geolocation.timeout_ms == 0 {
                return Err(ShellError::InvalidConfig(
                    "geolocation.timeout_ms must be greater than 0".into(),
                ));
            }
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // STOREFRONT_API_URL wins over the backend's own variable name
        if let Some(url) = lookup("STOREFRONT_API_URL").or_else(|| lookup("VENDURE_API_URL")) {
            debug!(url = %url, "Overriding shop API URL from environment");
            self.backend.api_url = url;
        }

        if let Some(token) = lookup("STOREFRONT_DEFAULT_CHANNEL") {
            debug!(token = %token, "Overriding default channel from environment");
            self.channel.default_token = token;
        }

        if let Some(secret) = lookup("STOREFRONT_SESSION_SECRET") {
            self.session.secret = secret;
        }

        if let Some(url) = lookup("STOREFRONT_GEOLOCATION_URL") {
            self.geolocation.url = url;
        }

        if let Some(enabled) = lookup("STOREFRONT_GEOLOCATION_ENABLED") {
            match enabled.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.geolocation.enabled = true,
                "0" | "false" | "no" | "off" => self.geolocation.enabled = false,
                _ => warn!(value = %enabled, "Unknown STOREFRONT_GEOLOCATION_ENABLED value"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "shell")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Parsed default shop API endpoint.
    pub fn api_url(&self) -> ShellResult<Url> {
        Url::parse(&self.backend.api_url).map_err(|e| {
            ShellError::InvalidUrl(format!("backend.api_url '{}': {}", self.backend.api_url, e))
        })
    }

    /// HTTP settings for the GraphQL client.
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            timeout: Duration::from_secs(self.backend.timeout_secs),
            ..BackendConfig::default()
        }
    }

    pub fn default_channel_token(&self) -> &str {
        &self.channel.default_token
    }

    pub fn eu_channel_token(&self) -> &str {
        &self.channel.eu_token
    }
}
