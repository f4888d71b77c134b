//! Shared test utilities for the installer crate.

use crate::release::download::{DownloadError, ReleaseDownloader};
use crate::release::verification::sha256_bytes;
use crate::release::version::ReleaseVersion;
use std::path::Path;
use std::sync::Mutex;

/// Return the lowercase hex SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    sha256_bytes(data).into_inner()
}

/// Build a release index body with the given `tag_name`.
pub fn release_index_json(tag: &str) -> String {
    serde_json::json!({
        "tag_name": tag,
        "name": tag,
        "draft": false,
        "prerelease": false,
    })
    .to_string()
}

/// Build a checksum manifest from `(filename, payload)` pairs.
pub fn checksums_text(entries: &[(&str, &[u8])]) -> String {
    entries
        .iter()
        .map(|(filename, payload)| format!("{}  {filename}\n", sha256_hex(payload)))
        .collect()
}

/// A call recorded by [`StubDownloader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    /// `fetch_release_index` was called.
    ReleaseIndex,
    /// `fetch_checksums` was called for the version.
    Checksums(String),
    /// `download_artifact` was called for the version and filename.
    Artifact(String, String),
}

/// A canned response for one endpoint.
#[derive(Debug, Clone)]
pub enum Response<T> {
    /// Succeed with the value.
    Ok(T),
    /// Fail as if the host were unreachable.
    Unreachable,
    /// Fail with HTTP 404.
    NotFound,
}

impl<T: Clone> Response<T> {
    fn resolve(&self, url: &str) -> Result<T, DownloadError> {
        match self {
            Self::Ok(value) => Ok(value.clone()),
            Self::Unreachable => Err(DownloadError::HttpError {
                url: url.to_owned(),
                reason: "connection refused".to_owned(),
            }),
            Self::NotFound => Err(DownloadError::NotFound {
                url: url.to_owned(),
            }),
        }
    }
}

/// A [`ReleaseDownloader`] serving canned responses and recording calls.
#[derive(Debug)]
pub struct StubDownloader {
    release_index: Response<String>,
    checksums: Response<String>,
    artifact: Response<Vec<u8>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubDownloader {
    /// Serve `tag` as the latest release, with `payload` as every artifact
    /// and a manifest listing `filename` with `payload`'s digest.
    pub fn serving(tag: &str, filename: &str, payload: &[u8]) -> Self {
        Self {
            release_index: Response::Ok(release_index_json(tag)),
            checksums: Response::Ok(checksums_text(&[(filename, payload)])),
            artifact: Response::Ok(payload.to_vec()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replace the release index response.
    #[must_use]
    pub fn with_release_index(mut self, response: Response<String>) -> Self {
        self.release_index = response;
        self
    }

    /// Replace the checksum manifest response.
    #[must_use]
    pub fn with_checksums(mut self, response: Response<String>) -> Self {
        self.checksums = response;
        self
    }

    /// Replace the artifact response.
    #[must_use]
    pub fn with_artifact(mut self, response: Response<Vec<u8>>) -> Self {
        self.artifact = response;
        self
    }

    /// Return the calls made so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the call log mutex is poisoned.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("call log lock").clone()
    }

    /// Return true if any artifact download was attempted.
    pub fn downloaded_artifact(&self) -> bool {
        self.calls()
            .iter()
            .any(|call| matches!(call, RecordedCall::Artifact(..)))
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().expect("call log lock").push(call);
    }
}

impl ReleaseDownloader for StubDownloader {
    fn fetch_release_index(&self) -> Result<String, DownloadError> {
        self.record(RecordedCall::ReleaseIndex);
        self.release_index.resolve("stub://releases/latest")
    }

    fn fetch_checksums(&self, version: &ReleaseVersion) -> Result<String, DownloadError> {
        self.record(RecordedCall::Checksums(version.to_string()));
        self.checksums
            .resolve(&format!("stub://download/{}/checksums.txt", version.tag()))
    }

    fn download_artifact(
        &self,
        version: &ReleaseVersion,
        filename: &str,
        dest: &Path,
    ) -> Result<(), DownloadError> {
        self.record(RecordedCall::Artifact(version.to_string(), filename.to_owned()));
        let payload = self
            .artifact
            .resolve(&format!("stub://download/{}/{filename}", version.tag()))?;
        std::fs::write(dest, payload)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksums_text_uses_two_space_separator() {
        let text = checksums_text(&[("gitflow-toolkit-linux-amd64", b"x".as_slice())]);
        assert_eq!(text, format!("{}  gitflow-toolkit-linux-amd64\n", sha256_hex(b"x")));
    }

    #[test]
    fn stub_records_calls_in_order() {
        let stub = StubDownloader::serving("v1.4.0", "gitflow-toolkit-linux-amd64", b"x")
            .with_checksums(Response::NotFound);
        let version = ReleaseVersion::from_tag("v1.4.0").expect("valid tag");

        assert!(stub.fetch_release_index().is_ok());
        assert!(matches!(
            stub.fetch_checksums(&version),
            Err(DownloadError::NotFound { .. })
        ));
        assert_eq!(
            stub.calls(),
            vec![
                RecordedCall::ReleaseIndex,
                RecordedCall::Checksums("1.4.0".to_owned())
            ]
        );
        assert!(!stub.downloaded_artifact());
    }
}
