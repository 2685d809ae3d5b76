//! # Validation Module
//!
//! Input validation for values arriving from the rendering tree.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Rendering tree (TypeScript)                                  │
//! │  └── Channel switcher only offers known tokens                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Storefront server (Rust)                                     │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: format checks before writing the session             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Shop API                                                     │
//! │  └── Rejects tokens of channels that don't exist                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a channel token.
pub const MAX_CHANNEL_TOKEN_LEN: usize = 64;

/// Validates a channel token before it is stored in the session.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Only letters, digits, hyphens and underscores
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_channel_token;
///
/// assert!(validate_channel_token("eu").is_ok());
/// assert!(validate_channel_token("__default_channel__").is_ok());
/// assert!(validate_channel_token("").is_err());
/// assert!(validate_channel_token("eu; Path=/").is_err());
/// ```
pub fn validate_channel_token(token: &str) -> ValidationResult<()> {
    let token = token.trim();

    if token.is_empty() {
        return Err(ValidationError::Required {
            field: "token".to_string(),
        });
    }

    if token.len() > MAX_CHANNEL_TOKEN_LEN {
        return Err(ValidationError::TooLong {
            field: "token".to_string(),
            max: MAX_CHANNEL_TOKEN_LEN,
        });
    }

    if !token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "token".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}
