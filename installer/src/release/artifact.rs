//! Artifact naming and download descriptors.
//!
//! Release binaries are named `gitflow-toolkit-<suffix>`; the descriptor
//! pairs that name with its download URL and the digest the checksum
//! manifest records for it.

use super::checksums::ChecksumManifest;
use super::digest::HexDigest;
use super::endpoints::ReleaseEndpoints;
use super::platform::ArtifactSuffix;
use super::verification::VerificationError;
use super::version::ReleaseVersion;
use std::fmt;

/// The fixed prefix of every release binary.
const ARTIFACT_PREFIX: &str = "gitflow-toolkit";

/// The release filename of a platform binary.
///
/// # Examples
///
/// ```
/// use gitflow_toolkit_installer::release::artifact::ArtifactName;
/// use gitflow_toolkit_installer::release::platform::ArtifactSuffix;
///
/// let name = ArtifactName::new(ArtifactSuffix::LinuxAmd64);
/// assert_eq!(name.to_string(), "gitflow-toolkit-linux-amd64");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactName {
    suffix: ArtifactSuffix,
}

impl ArtifactName {
    /// Name the artifact published for `suffix`.
    #[must_use]
    pub const fn new(suffix: ArtifactSuffix) -> Self {
        Self { suffix }
    }

    /// Return the filename as an owned string.
    #[must_use]
    pub fn filename(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ARTIFACT_PREFIX}-{}", self.suffix)
    }
}

/// Everything needed to fetch and verify one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    filename: String,
    url: String,
    expected_digest: HexDigest,
}

impl ArtifactDescriptor {
    /// Resolve the descriptor for `suffix` at `version`.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationError::MissingChecksum`] when the manifest has
    /// no entry for the artifact, since it could never be verified.
    pub fn resolve(
        endpoints: &ReleaseEndpoints,
        version: &ReleaseVersion,
        suffix: ArtifactSuffix,
        manifest: &ChecksumManifest,
    ) -> Result<Self, VerificationError> {
        let filename = ArtifactName::new(suffix).filename();
        let expected_digest = manifest
            .digest_for(&filename)
            .cloned()
            .ok_or_else(|| VerificationError::MissingChecksum {
                filename: filename.clone(),
            })?;
        let url = endpoints.asset_url(version, &filename);
        Ok(Self {
            filename,
            url,
            expected_digest,
        })
    }

    /// Return the release filename.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Return the download URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Return the digest recorded in the checksum manifest.
    #[must_use]
    pub fn expected_digest(&self) -> &HexDigest {
        &self.expected_digest
    }
}
