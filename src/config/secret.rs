//! The API key wrapper.

use std::fmt;

/// Characters of the key shown by [`SecretString::hint`].
const HINT_CHARS: usize = 4;

/// Keys shorter than this get no hint at all.
const MIN_HINTED_LEN: usize = 16;

/// Holds the API key; prints as `<REDACTED>` through both `Debug` and
/// `Display`, so a `Config` can be logged whole.
///
/// ```
/// use mcp_brain::config::SecretString;
///
/// let key = SecretString::new("sk-ant-api03-abcdefgh1234");
/// assert_eq!(format!("{key:?}"), "<REDACTED>");
/// assert_eq!(key.hint(), "...1234");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Wrap a key. Surrounding whitespace from `.env` files is dropped.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.len() == value.len() {
            Self(value)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// The raw key, for the request header only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True when no key was given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last few characters, enough to tell two keys apart in logs.
    #[must_use]
    pub fn hint(&self) -> String {
        let chars = self.0.chars().count();
        if chars < MIN_HINTED_LEN {
            return "...".to_string();
        }
        let tail: String = self.0.chars().skip(chars - HINT_CHARS).collect();
        format!("...{tail}")
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<REDACTED>")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_printed() {
        let secret = SecretString::new("sk-ant-super-secret-key");
        assert_eq!(format!("{secret:?}"), "<REDACTED>");
        assert_eq!(format!("{secret}"), "<REDACTED>");
        assert_eq!(secret.expose(), "sk-ant-super-secret-key");
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let secret = SecretString::new("  sk-ant-key\n");
        assert_eq!(secret.expose(), "sk-ant-key");
        assert!(SecretString::new("   ").is_empty());
    }

    #[test]
    fn test_hint_hides_short_keys() {
        assert_eq!(SecretString::new("short").hint(), "...");
        assert_eq!(SecretString::new("sk-ant-0123456789wxyz").hint(), "...wxyz");
    }
}
