//! Release endpoint URL construction.
//!
//! All three endpoints (release index, checksum manifest, artifact) are
//! templated from a repository slug and two base URLs. The defaults point
//! at GitHub; tests and mirrors substitute their own bases.

use super::version::ReleaseVersion;

/// The repository that publishes gitflow-toolkit releases.
pub const DEFAULT_REPO: &str = "mritd/gitflow-toolkit";

/// Base URL of the release metadata API.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Base URL that release assets are served from.
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://github.com";

/// The filename of the checksum manifest published with each release.
pub const CHECKSUMS_FILENAME: &str = "checksums.txt";

/// Endpoint configuration for one release repository.
///
/// # Examples
///
/// ```
/// use gitflow_toolkit_installer::release::endpoints::ReleaseEndpoints;
/// use gitflow_toolkit_installer::release::version::ReleaseVersion;
///
/// let endpoints = ReleaseEndpoints::default();
/// let version = ReleaseVersion::from_tag("v1.4.0").expect("valid tag");
/// assert_eq!(
///     endpoints.checksums_url(&version),
///     "https://github.com/mritd/gitflow-toolkit/releases/download/v1.4.0/checksums.txt"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEndpoints {
    repo: String,
    api_base: String,
    download_base: String,
}

impl ReleaseEndpoints {
    /// Endpoints for `repo` on the default hosts.
    #[must_use]
    pub fn new(repo: &str) -> Self {
        Self::with_bases(repo, DEFAULT_API_BASE, DEFAULT_DOWNLOAD_BASE)
    }

    /// Endpoints for `repo` on custom hosts. Trailing slashes are ignored.
    #[must_use]
    pub fn with_bases(repo: &str, api_base: &str, download_base: &str) -> Self {
        Self {
            repo: repo.to_owned(),
            api_base: api_base.trim_end_matches('/').to_owned(),
            download_base: download_base.trim_end_matches('/').to_owned(),
        }
    }

    /// Return the `owner/name` repository slug.
    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// URL of the latest-release metadata.
    #[must_use]
    pub fn release_index_url(&self) -> String {
        format!("{}/repos/{}/releases/latest", self.api_base, self.repo)
    }

    /// URL of the checksum manifest for `version`.
    #[must_use]
    pub fn checksums_url(&self, version: &ReleaseVersion) -> String {
        self.asset_url(version, CHECKSUMS_FILENAME)
    }

    /// URL of a release asset for `version`.
    #[must_use]
    pub fn asset_url(&self, version: &ReleaseVersion, filename: &str) -> String {
        format!(
            "{}/{}/releases/download/{}/{filename}",
            self.download_base,
            self.repo,
            version.tag()
        )
    }
}

impl Default for ReleaseEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_REPO)
    }
}

/// Validate an `owner/name` repository slug.
///
/// Used as a `clap` value parser.
///
/// # Errors
///
/// Returns a message when the slug does not have exactly two non-empty,
/// whitespace-free components.
pub fn parse_repo_slug(value: &str) -> Result<String, String> {
    let valid = value
        .split_once('/')
        .is_some_and(|(owner, name)| is_slug_component(owner) && is_slug_component(name));
    if valid {
        Ok(value.to_owned())
    } else {
        Err(format!("expected OWNER/NAME, got \"{value}\""))
    }
}

fn is_slug_component(part: &str) -> bool {
    !part.is_empty() && !part.contains(['/', ' ', '\t'])
}
