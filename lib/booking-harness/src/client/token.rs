use http::header::{AUTHORIZATION, COOKIE, HeaderName, HeaderValue};

use super::{ApiClientError, SecureString};

/// Default name of the session cookie.
pub const TOKEN_COOKIE: &str = "token";

/// How the session token travels to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenTransport {
    /// `Cookie: <name>=<token>`.
    Cookie(String),
    /// `Authorization: Bearer <token>`.
    Bearer,
}

impl Default for TokenTransport {
    fn default() -> Self {
        Self::Cookie(TOKEN_COOKIE.to_string())
    }
}

impl TokenTransport {
    pub(super) fn to_header(
        &self,
        token: &SecureString,
    ) -> Result<(HeaderName, HeaderValue), ApiClientError> {
        let (name, value) = match self {
            Self::Cookie(cookie) => (COOKIE, format!("{cookie}={}", token.as_str())),
            Self::Bearer => (AUTHORIZATION, format!("Bearer {}", token.as_str())),
        };
        let mut value = HeaderValue::from_str(&value)?;
        value.set_sensitive(true);
        Ok((name, value))
    }
}
