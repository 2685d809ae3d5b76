//! # Backend Error Types
//!
//! Error types for shop API calls.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  reqwest::Error / HTTP status / GraphQL `errors`                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BackendError (this module) ← Adds operation name and categorization   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ShellError (storefront-shell) ← Composition fails as a whole          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServerError (storefront-server) ← 502 JSON body                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Shop API operation errors.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The shop API could not be reached.
    ///
    /// ## When This Occurs
    /// - Connection refused / DNS failure
    /// - Request timed out
    #[error("Shop API unreachable during {operation}: {message}")]
    Unreachable { operation: String, message: String },

    /// The shop API answered with a non-success HTTP status.
    #[error("Shop API returned HTTP {status} for {operation}")]
    Http { operation: String, status: u16 },

    /// The GraphQL response carried an `errors` array.
    #[error("GraphQL error in {operation}: {}", messages.join("; "))]
    Graphql {
        operation: String,
        messages: Vec<String>,
    },

    /// The response had neither `errors` nor `data`.
    #[error("Shop API returned no data for {operation}")]
    MissingData { operation: String },

    /// The response body did not match the expected shape.
    #[error("Failed to decode {operation} response: {message}")]
    Decode { operation: String, message: String },

    /// The HTTP client could not be built.
    #[error("Invalid backend client configuration: {0}")]
    Config(String),
}

impl BackendError {
    /// Maps a transport-level reqwest error for `operation`.
    pub fn transport(operation: &str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode {
                operation: operation.to_string(),
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            BackendError::Http {
                operation: operation.to_string(),
                status: status.as_u16(),
            }
        } else {
            BackendError::Unreachable {
                operation: operation.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// True if the shop API could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, BackendError::Unreachable { .. })
    }

    /// Returns true if a later attempt might succeed.
    ///
    /// Nothing in this crate retries; callers decide.
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Unreachable { .. } => true,
            BackendError::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Name of the GraphQL operation that failed, if any.
    pub fn operation(&self) -> Option<&str> {
        match self {
            BackendError::Unreachable { operation, .. }
            | BackendError::Http { operation, .. }
            | BackendError::Graphql { operation, .. }
            | BackendError::MissingData { operation }
            | BackendError::Decode { operation, .. } => Some(operation),
            BackendError::Config(_) => None,
        }
    }
}

/// Result type for shop API operations.
pub type BackendResult<T> = Result<T, BackendError>;
