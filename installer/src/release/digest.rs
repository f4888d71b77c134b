//! Hex-encoded content digest newtype.
//!
//! Checksum manifests publish digests as hexadecimal strings. This wrapper
//! validates the alphabet and normalises to lowercase so that comparisons
//! against a computed SHA-256 digest are exact string equality.

use std::fmt;

/// Reasons a digest string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DigestError {
    /// The digest string was empty.
    #[error("digest is empty")]
    Empty,

    /// The digest contained a character outside `[0-9a-fA-F]`.
    #[error("non-hex character '{0}' in digest")]
    NonHex(char),
}

/// A validated, lowercase, hex-encoded digest.
///
/// # Examples
///
/// ```
/// use gitflow_toolkit_installer::release::digest::HexDigest;
///
/// let digest = HexDigest::try_from("ABC123").expect("valid hex");
/// assert_eq!(digest.as_str(), "abc123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexDigest(String);

impl HexDigest {
    /// Return the digest as a lowercase hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Wrap a digest produced by a hasher, which is always lowercase hex.
    pub(crate) fn from_computed(hex: String) -> Self {
        Self(hex)
    }
}

impl TryFrom<&str> for HexDigest {
    type Error = DigestError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        validate_hex(value)?;
        Ok(Self(value.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for HexDigest {
    type Error = DigestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl AsRef<str> for HexDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_hex(value: &str) -> Result<(), DigestError> {
    if value.is_empty() {
        return Err(DigestError::Empty);
    }
    match value.chars().find(|c| !c.is_ascii_hexdigit()) {
        Some(bad) => Err(DigestError::NonHex(bad)),
        None => Ok(()),
    }
}
