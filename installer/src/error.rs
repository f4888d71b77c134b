//! Error types for the gitflow-toolkit installer.
//!
//! Every failure aborts the run. Each variant records the pipeline
//! [`Stage`] it came from so the final message names what failed.

use crate::release::download::DownloadError;
use crate::release::platform::PlatformError;
use crate::release::verification::VerificationError;
use crate::smoke::SmokeTestError;
use camino::Utf8PathBuf;
use std::fmt;
use thiserror::Error;

/// The stages of an installer run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Work out where to install.
    Configure,
    /// Query the release index for the latest version.
    Resolve,
    /// Download and parse the checksum manifest.
    FetchManifest,
    /// Map the host platform to a release artifact.
    SelectPlatform,
    /// Download the artifact.
    Download,
    /// Compare the artifact digest with the manifest.
    Verify,
    /// Copy the binary into the install directory.
    Install,
    /// Create the alias symlinks.
    LinkAliases,
    /// Run the installed binary's version check.
    SmokeTest,
    /// Remove an existing installation.
    Uninstall,
}

impl Stage {
    /// Return a short human-readable stage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Resolve => "resolve version",
            Self::FetchManifest => "fetch checksum manifest",
            Self::SelectPlatform => "select platform",
            Self::Download => "download",
            Self::Verify => "verify",
            Self::Install => "install",
            Self::LinkAliases => "link aliases",
            Self::SmokeTest => "smoke test",
            Self::Uninstall => "uninstall",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during an installer run.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// An endpoint was unreachable or a transfer failed.
    #[error("{stage} failed: {source}")]
    Network {
        /// The stage that issued the request.
        stage: Stage,
        /// The underlying download failure.
        #[source]
        source: DownloadError,
    },

    /// A release index or checksum manifest was malformed.
    #[error("{stage} failed: {reason}")]
    Parse {
        /// The stage that parsed the response.
        stage: Stage,
        /// Description of the parse failure.
        reason: String,
    },

    /// No artifact is published for the host platform.
    #[error("{stage} failed: {0}", stage = Stage::SelectPlatform)]
    Platform(#[from] PlatformError),

    /// The downloaded artifact does not match the manifest.
    #[error("{stage} failed: {0}", stage = Stage::Verify)]
    Verification(#[from] VerificationError),

    /// A filesystem operation on the install directory failed.
    #[error("{stage} failed: {action} {path}: {source}")]
    Install {
        /// The stage performing the operation.
        stage: Stage,
        /// What was being attempted (e.g. "create symlink").
        action: &'static str,
        /// The path being operated on.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The installed binary failed its version check.
    #[error("{stage} failed: {0}", stage = Stage::SmokeTest)]
    SmokeTest(#[from] SmokeTestError),

    /// The install directory could not be determined.
    #[error("{stage} failed: {reason}", stage = Stage::Configure)]
    Config {
        /// Description of the configuration problem.
        reason: String,
    },
}

impl InstallerError {
    /// Return the stage that failed.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Network { stage, .. }
            | Self::Parse { stage, .. }
            | Self::Install { stage, .. } => *stage,
            Self::Platform(_) => Stage::SelectPlatform,
            Self::Verification(_) => Stage::Verify,
            Self::SmokeTest(_) => Stage::SmokeTest,
            Self::Config { .. } => Stage::Configure,
        }
    }

    /// Build a network error for `stage`.
    pub(crate) fn network(stage: Stage, source: DownloadError) -> Self {
        Self::Network { stage, source }
    }

    /// Build a parse error for `stage`.
    pub(crate) fn parse(stage: Stage, reason: impl fmt::Display) -> Self {
        Self::Parse {
            stage,
            reason: reason.to_string(),
        }
    }

    /// Build a filesystem error for `stage`.
    pub(crate) fn install(
        stage: Stage,
        action: &'static str,
        path: impl Into<Utf8PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Install {
            stage,
            action,
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
