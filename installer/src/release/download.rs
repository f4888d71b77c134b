//! Release downloads over HTTP.
//!
//! Provides a trait-based abstraction over the three release endpoints so
//! the pipeline can be driven by mocks in tests and by `ureq` in
//! production.

use super::endpoints::ReleaseEndpoints;
use super::version::ReleaseVersion;
use log::debug;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// Network timeout applied to every request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Media type requested from the release metadata API.
const RELEASE_INDEX_ACCEPT: &str = "application/vnd.github+json";

/// Trait for fetching release metadata and assets.
///
/// # Examples
///
/// ```
/// use gitflow_toolkit_installer::release::download::HttpDownloader;
/// use gitflow_toolkit_installer::release::endpoints::ReleaseEndpoints;
///
/// let downloader = HttpDownloader::new(ReleaseEndpoints::default());
/// // Use downloader.fetch_release_index() in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ReleaseDownloader {
    /// Fetch the latest-release metadata body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the endpoint is missing.
    fn fetch_release_index(&self) -> Result<String, DownloadError>;

    /// Fetch the checksum manifest text for `version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the asset is missing.
    fn fetch_checksums(&self, version: &ReleaseVersion) -> Result<String, DownloadError>;

    /// Download the release asset `filename` for `version` into `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the file write fails.
    fn download_artifact(
        &self,
        version: &ReleaseVersion,
        filename: &str,
        dest: &Path,
    ) -> Result<(), DownloadError>;
}

/// Errors arising from release downloads.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested resource was not found (HTTP 404).
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP-based downloader using `ureq`.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    endpoints: ReleaseEndpoints,
}

impl HttpDownloader {
    /// Create a downloader for the given endpoints.
    #[must_use]
    pub fn new(endpoints: ReleaseEndpoints) -> Self {
        Self { endpoints }
    }
}

impl ReleaseDownloader for HttpDownloader {
    fn fetch_release_index(&self) -> Result<String, DownloadError> {
        let url = self.endpoints.release_index_url();
        download_text(&url, Some(RELEASE_INDEX_ACCEPT))
    }

    fn fetch_checksums(&self, version: &ReleaseVersion) -> Result<String, DownloadError> {
        let url = self.endpoints.checksums_url(version);
        download_text(&url, None)
    }

    fn download_artifact(
        &self,
        version: &ReleaseVersion,
        filename: &str,
        dest: &Path,
    ) -> Result<(), DownloadError> {
        let url = self.endpoints.asset_url(version, filename);
        download_to_file(&url, dest)
    }
}

/// Download a URL and return the body as a string.
fn download_text(url: &str, accept: Option<&str>) -> Result<String, DownloadError> {
    debug!("GET {url}");
    let mut request = http_agent().get(url);
    if let Some(media_type) = accept {
        request = request.header("Accept", media_type);
    }
    let response = request.call().map_err(|e| map_ureq_error(url, &e))?;
    response
        .into_body()
        .read_to_string()
        .map_err(|e| DownloadError::HttpError {
            url: url.to_owned(),
            reason: e.to_string(),
        })
}

/// Download a URL and write the body to a file.
fn download_to_file(url: &str, dest: &Path) -> Result<(), DownloadError> {
    debug!("GET {url} -> {}", dest.display());
    let response = http_agent()
        .get(url)
        .call()
        .map_err(|e| map_ureq_error(url, &e))?;
    let mut file = std::fs::File::create(dest)?;
    let written = std::io::copy(&mut response.into_body().as_reader(), &mut file)?;
    debug!("wrote {written} bytes to {}", dest.display());
    Ok(())
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
