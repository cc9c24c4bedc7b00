//! Secret string with automatic memory zeroization
//!
//! Wraps a signing secret so that it is wiped on drop and never shows up in
//! `Debug`/`Display` output. The type deliberately implements neither
//! `Serialize` nor `Hash`.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret string that zeroes memory on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureString {
    inner: String,
}

impl SecureString {
    pub fn new(s: impl Into<String>) -> Self {
        Self { inner: s.into() }
    }

    /// Expose the inner value.
    ///
    /// The exposed value must not be stored or logged.
    pub fn expose(&self) -> &str {
        &self.inner
    }

    pub fn expose_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Compare with another secure string in constant time
    pub fn constant_time_eq(&self, other: &SecureString) -> bool {
        constant_time_eq(self.expose_bytes(), other.expose_bytes())
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureString(***)")
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_value_on_request() {
        let s = SecureString::new("s3cr3t");
        assert_eq!(s.len(), 6);
        assert_eq!(s.expose(), "s3cr3t");
        assert_eq!(s.expose_bytes(), b"s3cr3t");
    }

    #[test]
    fn never_prints_the_secret() {
        let s = SecureString::new("s3cr3t");
        assert_eq!(format!("{s:?}"), "SecureString(***)");
        assert_eq!(format!("{s}"), "***");
    }

    #[test]
    fn constant_time_comparison() {
        let a = SecureString::new("same");
        let b = SecureString::new("same");
        let c = SecureString::new("different");

        assert!(a.constant_time_eq(&b));
        assert!(!a.constant_time_eq(&c));
        assert!(!constant_time_eq(b"short", b"longer"));
    }

    #[test]
    fn empty_secret_is_detectable() {
        assert!(SecureString::new(String::new()).is_empty());
    }
}
