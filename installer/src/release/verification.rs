//! SHA-256 verification of downloaded artifacts.
//!
//! A downloaded binary is only installable once its digest exactly matches
//! the checksum manifest entry for its filename.

use super::digest::HexDigest;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Errors arising from artifact verification.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// The checksum manifest has no entry for the selected artifact.
    #[error("checksum manifest has no entry for {filename}")]
    MissingChecksum {
        /// The artifact filename that was looked up.
        filename: String,
    },

    /// The computed digest differs from the manifest.
    #[error("checksum mismatch for {filename}: manifest={expected}, actual={actual}")]
    Mismatch {
        /// The artifact filename.
        filename: String,
        /// Digest recorded in the manifest.
        expected: HexDigest,
        /// Digest of the downloaded payload.
        actual: HexDigest,
    },

    /// The downloaded file could not be read.
    #[error("failed to read {filename} for hashing: {source}")]
    Io {
        /// The artifact filename.
        filename: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Compute the SHA-256 digest of a file, streaming it in fixed-size blocks.
///
/// # Errors
///
/// Returns any I/O error raised while opening or reading the file.
pub fn compute_sha256(path: &Path) -> std::io::Result<HexDigest> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }
    Ok(HexDigest::from_computed(format!("{:x}", hasher.finalize())))
}

/// Compute the SHA-256 digest of an in-memory payload.
#[must_use]
pub fn sha256_bytes(bytes: &[u8]) -> HexDigest {
    HexDigest::from_computed(format!("{:x}", Sha256::digest(bytes)))
}

/// Verify that the file at `path` hashes to `expected`.
///
/// Returns the computed digest on success.
///
/// # Errors
///
/// Returns [`VerificationError::Mismatch`] when the digests differ and
/// [`VerificationError::Io`] when the file cannot be read.
pub fn verify_artifact(
    path: &Path,
    filename: &str,
    expected: &HexDigest,
) -> Result<HexDigest, VerificationError> {
    let actual = compute_sha256(path).map_err(|source| VerificationError::Io {
        filename: filename.to_owned(),
        source,
    })?;
    if actual != *expected {
        return Err(VerificationError::Mismatch {
            filename: filename.to_owned(),
            expected: expected.clone(),
            actual,
        });
    }
    Ok(actual)
}
