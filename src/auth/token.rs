//! Defines the opaque session token handed to clients at log-in.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque token that identifies a logged in user's session.
///
/// Serializes as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Create a new random token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing token string.
    pub fn new(token: &str) -> Self {
        Self(token.to_owned())
    }

    /// The token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the value of an `Authorization` header.
    ///
    /// Accepts the raw token or the token prefixed with "Bearer ". Returns
    /// `None` for an empty value.
    pub fn from_authorization_header(value: &str) -> Option<Self> {
        let value = value.trim_start();
        let token = match value.get(..7) {
            Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => &value[7..],
            _ => value,
        }
        .trim();

        if token.is_empty() {
            None
        } else {
            Some(Self::new(token))
        }
    }
}

/// Read the session token from the `Authorization` header, if there is one.
pub fn token_from_headers(headers: &HeaderMap) -> Option<SessionToken> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(SessionToken::from_authorization_header)
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};

    use super::{SessionToken, token_from_headers};

    #[test]
    fn generated_tokens_are_unique() {
        assert_ne!(SessionToken::generate(), SessionToken::generate());
    }

    #[test]
    fn parses_raw_token() {
        assert_eq!(
            SessionToken::from_authorization_header("abc-123"),
            Some(SessionToken::new("abc-123"))
        );
    }

    #[test]
    fn strips_bearer_prefix_ignoring_case() {
        for header in ["Bearer abc-123", "bearer abc-123", "BEARER   abc-123 "] {
            assert_eq!(
                SessionToken::from_authorization_header(header),
                Some(SessionToken::new("abc-123")),
                "could not parse {header:?}"
            );
        }
    }

    #[test]
    fn empty_header_has_no_token() {
        assert_eq!(SessionToken::from_authorization_header("  "), None);
        assert_eq!(SessionToken::from_authorization_header("Bearer "), None);
    }

    #[test]
    fn reads_token_from_header_map() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));

        assert_eq!(token_from_headers(&headers), Some(SessionToken::new("xyz")));
    }

    #[test]
    fn serializes_as_plain_string() {
        let token = SessionToken::new("xyz");

        assert_eq!(serde_json::to_string(&token).unwrap(), "\"xyz\"");
    }
}
