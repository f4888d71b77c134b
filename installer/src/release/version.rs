//! Release version resolution.
//!
//! The release index endpoint returns JSON release metadata. The only field
//! the installer reads is `tag_name`, which is stripped of its leading `v`
//! and validated as a semantic version.

use serde::Deserialize;
use std::fmt;

/// Errors arising while turning release metadata into a [`ReleaseVersion`].
#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    /// The release index body was not valid JSON of the expected shape.
    #[error("release index is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The release index has no `tag_name` field.
    #[error("release index has no tag_name field")]
    MissingTag,

    /// The tag was empty once the `v` prefix was removed.
    #[error("release tag \"{tag}\" is empty")]
    EmptyTag {
        /// The raw tag as published.
        tag: String,
    },

    /// The tag is not a semantic version.
    #[error("release tag \"{tag}\" is not a semantic version: {reason}")]
    InvalidVersion {
        /// The raw tag as published.
        tag: String,
        /// Description of the parse failure.
        reason: String,
    },
}

/// The subset of release metadata the installer consumes.
#[derive(Debug, Deserialize)]
struct ReleaseIndex {
    tag_name: Option<String>,
}

/// A published release version without its tag prefix.
///
/// # Examples
///
/// ```
/// use gitflow_toolkit_installer::release::version::ReleaseVersion;
///
/// let version = ReleaseVersion::from_tag("v1.4.0").expect("valid tag");
/// assert_eq!(version.to_string(), "1.4.0");
/// assert_eq!(version.tag(), "v1.4.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion(semver::Version);

impl ReleaseVersion {
    /// Parse a release tag such as `v1.4.0` or `1.4.0`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::EmptyTag`] when nothing remains after the
    /// prefix is stripped, or [`VersionError::InvalidVersion`] when the
    /// remainder is not a semantic version.
    pub fn from_tag(tag: &str) -> Result<Self, VersionError> {
        let trimmed = tag.trim();
        let bare = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
        if bare.is_empty() {
            return Err(VersionError::EmptyTag {
                tag: tag.to_owned(),
            });
        }
        semver::Version::parse(bare)
            .map(Self)
            .map_err(|e| VersionError::InvalidVersion {
                tag: tag.to_owned(),
                reason: e.to_string(),
            })
    }

    /// Return the tag form used in release download paths (`v1.4.0`).
    #[must_use]
    pub fn tag(&self) -> String {
        format!("v{}", self.0)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extract the latest version from a release index JSON body.
///
/// # Errors
///
/// Returns a [`VersionError`] if the body is not JSON, lacks a string
/// `tag_name`, or the tag is not a semantic version.
///
/// # Examples
///
/// ```
/// use gitflow_toolkit_installer::release::version::parse_release_index;
///
/// let version = parse_release_index(r#"{"tag_name":"v2.1.3","draft":false}"#)
///     .expect("valid index");
/// assert_eq!(version.to_string(), "2.1.3");
/// ```
pub fn parse_release_index(json: &str) -> Result<ReleaseVersion, VersionError> {
    let index: ReleaseIndex = serde_json::from_str(json)?;
    let tag = index.tag_name.ok_or(VersionError::MissingTag)?;
    ReleaseVersion::from_tag(&tag)
}
