use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string holding a credential, wiped from memory when dropped.
///
/// Debug output is redacted and display output is masked, so tokens and
/// passwords never end up verbatim in logs.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecureString(String);

impl SecureString {
    /// Wraps a credential.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// The credential in clear, for the wire only.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares with a clear value without handing the secret out.
    pub fn equals_str(&self, other: &str) -> bool {
        self.0 == other
    }
}

// Short secrets are fully hidden, longer ones keep 4 chars on each side.
impl fmt::Display for SecureString {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        const VISIBLE: usize = 4;

        let count = self.0.chars().count();
        if count <= 2 * VISIBLE {
            return formatter.write_str("***");
        }
        let head = self.0.chars().take(VISIBLE).collect::<String>();
        let tail = self.0.chars().skip(count - VISIBLE).collect::<String>();
        write!(formatter, "{head}...{tail}")
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<&SecureString> for SecureString {
    fn from(value: &SecureString) -> Self {
        value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_redact_debug_output() {
        let token = SecureString::from("abc123def456");

        insta::assert_debug_snapshot!(token, @r#"
        SecureString {
            value: "[REDACTED]",
        }
        "#);
    }

    #[test]
    fn should_mask_display_output() {
        insta::assert_snapshot!(SecureString::from("abc123def456"), @"abc1...f456");
        insta::assert_snapshot!(SecureString::from("short"), @"***");
    }

    #[test]
    fn should_compare_without_exposing() {
        let token = SecureString::from("abc123def456");

        assert!(token.equals_str("abc123def456"));
        assert!(!token.equals_str("other"));
    }

    #[test]
    fn should_mask_multibyte_secrets_by_chars() {
        insta::assert_snapshot!(SecureString::from("密码密码-secret"), @"密码密码...cret");
    }

    #[test]
    fn should_travel_as_a_plain_json_string() {
        let token: SecureString = serde_json::from_str(r#""abc123""#).expect("a string");

        assert!(token.equals_str("abc123"));
        assert_eq!(serde_json::to_string(&token).ok().as_deref(), Some(r#""abc123""#));
    }
}
