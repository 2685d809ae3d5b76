//! # Cookie Session Store
//!
//! Per-visitor key-value session kept entirely in a signed cookie.
//!
//! ## Cookie Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cookie: __session=<JWT>                                               │
//! │                                                                         │
//! │  JWT (HS256, signed with session.secret)                               │
//! │  ├── channel     Option<String>  explicit channel choice               │
//! │  ├── auth_token  Option<String>  shop API bearer token                 │
//! │  ├── iat         issued at (unix seconds)                              │
//! │  └── exp         expiry    (iat + max_age_secs)                        │
//! │                                                                         │
//! │  Set-Cookie: __session=<JWT>; Path=/; HttpOnly; SameSite=Lax;          │
//! │              Max-Age=<max_age_secs>[; Secure]                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reading never fails: a missing, malformed, expired or tampered cookie is
//! an empty session.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SessionSettings;
use crate::error::{ShellError, ShellResult};

// =============================================================================
// Session Data
// =============================================================================

/// The values a session can hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Channel token chosen explicitly by the visitor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    /// Auth token issued by the shop API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    #[serde(flatten)]
    data: SessionData,
    iat: i64,
    exp: i64,
}

/// A session read from a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    data: SessionData,
}

impl Session {
    pub fn new(data: SessionData) -> Self {
        Session { data }
    }

    /// The `channel` key, if the visitor ever chose one.
    pub fn channel(&self) -> Option<&str> {
        self.data.channel.as_deref()
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.data.auth_token.as_deref()
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data == SessionData::default()
    }
}

// =============================================================================
// Session Store
// =============================================================================

/// Reads and writes the session cookie.
#[derive(Clone)]
pub struct SessionStore {
    cookie_name: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    max_age_secs: i64,
    secure: bool,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("cookie_name", &self.cookie_name)
            .field("max_age_secs", &self.max_age_secs)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(settings: &SessionSettings) -> Self {
        let secret = settings.secret.as_bytes();
        SessionStore {
            cookie_name: settings.cookie_name.clone(),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            max_age_secs: settings.max_age_secs,
            secure: settings.secure,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Reads the session from a raw `Cookie` request header.
    pub fn read(&self, cookie_header: Option<&str>) -> Session {
        let Some(value) = cookie_header.and_then(|header| self.find_cookie(header)) else {
            return Session::default();
        };

        match decode::<SessionClaims>(value, &self.decoding_key, &self.validation) {
            Ok(token) => Session::new(token.claims.data),
            Err(e) => {
                debug!(error = %e, "Ignoring invalid session cookie");
                Session::default()
            }
        }
    }

    /// Signs `data` and returns the `Set-Cookie` header value.
    pub fn commit(&self, data: &SessionData) -> ShellResult<String> {
        let now = Utc::now().timestamp();
        let exp = now
            .checked_add(self.max_age_secs)
            .ok_or_else(|| ShellError::Session(format!("max_age_secs {} overflows", self.max_age_secs)))?;
        let claims = SessionClaims {
            data: data.clone(),
            iat: now,
            exp,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
            self.cookie_name,
            token,
            self.max_age_secs,
            if self.secure { "; Secure" } else { "" }
        ))
    }

    fn find_cookie<'a>(&self, header: &'a str) -> Option<&'a str> {
        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value.trim_matches('"'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::new(&SessionSettings {
            secret: "test-secret".into(),
            ..SessionSettings::default()
        })
    }

    /// Extracts `name=value` from a Set-Cookie header for use as a Cookie header.
    fn as_cookie(set_cookie: &str) -> String {
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[test]
    fn test_commit_then_read() {
        let store = store();
        let data = SessionData {
            channel: Some("eu".into()),
            auth_token: Some("abc".into()),
        };

        let set_cookie = store.commit(&data).unwrap();
        assert!(set_cookie.starts_with("__session="));
        assert!(set_cookie.contains("; Path=/; HttpOnly; SameSite=Lax; Max-Age=2592000"));
        assert!(!set_cookie.contains("Secure"));

        let header = format!("theme=dark; {}", as_cookie(&set_cookie));
        let session = store.read(Some(&header));
        assert_eq!(session.channel(), Some("eu"));
        assert_eq!(session.auth_token(), Some("abc"));
    }

    #[test]
    fn test_missing_cookie_is_empty_session() {
        assert!(store().read(None).is_empty());
        assert!(store().read(Some("theme=dark")).is_empty());
    }

    #[test]
    fn test_garbage_cookie_is_empty_session() {
        assert!(store().read(Some("__session=not-a-jwt")).is_empty());
    }

    #[test]
    fn test_cookie_signed_with_other_secret_is_rejected() {
        let other = SessionStore::new(&SessionSettings {
            secret: "other-secret".into(),
            ..SessionSettings::default()
        });
        let set_cookie = other
            .commit(&SessionData {
                channel: Some("eu".into()),
                auth_token: None,
            })
            .unwrap();

        assert!(store().read(Some(&as_cookie(&set_cookie))).is_empty());
    }

    #[test]
    fn test_expired_cookie_is_empty_session() {
        let expired = SessionStore::new(&SessionSettings {
            secret: "test-secret".into(),
            // Beyond the default validation leeway
            max_age_secs: -3600,
            ..SessionSettings::default()
        });
        let set_cookie = expired
            .commit(&SessionData {
                channel: Some("eu".into()),
                auth_token: None,
            })
            .unwrap();

        assert!(store().read(Some(&as_cookie(&set_cookie))).is_empty());
    }

    #[test]
    fn test_secure_flag_and_custom_name() {
        let store = SessionStore::new(&SessionSettings {
            cookie_name: "sf".into(),
            secret: "test-secret".into(),
            max_age_secs: 60,
            secure: true,
        });
        let set_cookie = store.commit(&SessionData::default()).unwrap();
        assert!(set_cookie.starts_with("sf="));
        assert!(set_cookie.ends_with("Max-Age=60; Secure"));
    }

    #[test]
    fn test_overflowing_max_age_fails_commit() {
        let store = SessionStore::new(&SessionSettings {
            secret: "test-secret".into(),
            max_age_secs: i64::MAX,
            ..SessionSettings::default()
        });

        let err = store.commit(&SessionData::default()).unwrap_err();
        assert!(matches!(err, ShellError::Session(_)));
    }
}
