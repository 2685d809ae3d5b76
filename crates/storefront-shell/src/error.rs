//! # Shell Error Types
//!
//! Error types for Session Context composition and the client shell.
//!
//! ## Error Handling Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Shell Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Composition   │  │   Background tasks      │ │
//! │  │                 │  │  (fatal to the  │  │  (logged, swallowed)    │ │
//! │  │  InvalidConfig  │  │   page request) │  │                         │ │
//! │  │  ConfigLoad     │  │                 │  │  Geolocation            │ │
//! │  │  InvalidUrl     │  │  Backend        │  │  Remote (order refresh) │ │
//! │  └─────────────────┘  │  Session        │  └─────────────────────────┘ │
//! │                       │  Core           │                              │
//! │                       └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use storefront_backend::BackendError;
use storefront_core::{CoreError, ValidationError};

/// Result type alias for shell operations.
pub type ShellResult<T> = Result<T, ShellError>;

/// Shell error type.
#[derive(Debug, Error)]
pub enum ShellError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid storefront configuration.
    #[error("Invalid storefront configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// A configured or requested URL does not parse.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // =========================================================================
    // Composition Errors
    // =========================================================================
    /// A shop API call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Domain rule or input validation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The session cookie could not be signed.
    #[error("Session error: {0}")]
    Session(String),

    // =========================================================================
    // Client Shell Errors
    // =========================================================================
    /// The geolocation lookup failed.
    #[error("Geolocation failed: {0}")]
    Geolocation(String),

    /// A call from the client shell to the storefront server failed.
    #[error("Request to {endpoint} failed: {message}")]
    Remote { endpoint: String, message: String },
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for ShellError {
    fn from(err: ValidationError) -> Self {
        ShellError::Core(CoreError::Validation(err))
    }
}

impl From<url::ParseError> for ShellError {
    fn from(err: url::ParseError) -> Self {
        ShellError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ShellError {
    fn from(err: std::io::Error) -> Self {
        ShellError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ShellError {
    fn from(err: toml::de::Error) -> Self {
        ShellError::ConfigLoadFailed(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ShellError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ShellError::Session(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ShellError {
    /// Returns true if the shop API was the cause.
    pub fn is_backend_failure(&self) -> bool {
        matches!(self, ShellError::Backend(_))
    }

    /// Returns true if the caller sent bad input.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, ShellError::Core(CoreError::Validation(_)))
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ShellError::InvalidConfig(_) | ShellError::ConfigLoadFailed(_) | ShellError::InvalidUrl(_)
        )
    }

    /// Returns true if a later attempt might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ShellError::Backend(err) => err.is_retryable(),
            ShellError::Geolocation(_) | ShellError::Remote { .. } => true,
            _ => false,
        }
    }
}
