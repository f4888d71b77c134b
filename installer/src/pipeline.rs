//! The release install pipeline.
//!
//! Stages run strictly in order:
//!
//! ```text
//! Resolve -> FetchManifest -> SelectPlatform -> Download -> Verify
//!         -> Install -> LinkAliases -> SmokeTest
//! ```
//!
//! The first failure stops the run. Nothing is written to the install
//! directory until the downloaded artifact has been verified.

use crate::error::{InstallerError, Result, Stage};
use crate::installer::Installer;
use crate::output::{
    DryRunInfo, is_directory_in_path, path_instructions, post_install_notes, success_message,
    uninstall_message, write_stderr_line,
};
use crate::release::artifact::ArtifactDescriptor;
use crate::release::checksums::ChecksumManifest;
use crate::release::digest::HexDigest;
use crate::release::download::{HttpDownloader, ReleaseDownloader};
use crate::release::endpoints::ReleaseEndpoints;
use crate::release::platform::{ArtifactSuffix, PlatformTarget};
use crate::release::verification::verify_artifact;
use crate::release::version::{ReleaseVersion, parse_release_index};
use crate::smoke::smoke_test;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

/// Where the target platform comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformSource {
    /// Detect the host platform.
    #[default]
    Detect,
    /// Use a fixed platform instead of the host's.
    Fixed(PlatformTarget),
}

impl PlatformSource {
    /// Return the platform to install for.
    ///
    /// # Errors
    ///
    /// Returns an error when the host cannot be mapped to a platform.
    pub fn resolve(self) -> Result<PlatformTarget> {
        match self {
            Self::Detect => Ok(PlatformTarget::detect()?),
            Self::Fixed(target) => Ok(target),
        }
    }
}

/// Settings for one install run.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    /// Release repository and base URLs.
    pub endpoints: ReleaseEndpoints,
    /// Directory receiving the binary and aliases.
    pub install_dir: Utf8PathBuf,
    /// A version to install instead of the latest release.
    pub pinned_version: Option<ReleaseVersion>,
    /// How the target platform is chosen.
    pub platform: PlatformSource,
    /// Whether to run the installed binary's version check.
    pub smoke_test: bool,
    /// Suppress progress output.
    pub quiet: bool,
}

impl InstallConfig {
    /// Create a configuration with defaults for everything but the directory.
    #[must_use]
    pub fn new(install_dir: Utf8PathBuf) -> Self {
        Self {
            endpoints: ReleaseEndpoints::default(),
            install_dir,
            pinned_version: None,
            platform: PlatformSource::Detect,
            smoke_test: true,
            quiet: false,
        }
    }
}

/// Everything resolved before the artifact is downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    /// The version to install.
    pub version: ReleaseVersion,
    /// The platform the artifact was selected for.
    pub platform: PlatformTarget,
    /// The artifact suffix for that platform.
    pub suffix: ArtifactSuffix,
    /// The artifact to download and its expected digest.
    pub artifact: ArtifactDescriptor,
}

/// The outcome of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// The installed version.
    pub version: ReleaseVersion,
    /// Path of the canonical binary.
    pub binary: Utf8PathBuf,
    /// Alias symlink paths, in table order.
    pub aliases: Vec<Utf8PathBuf>,
    /// The verified SHA-256 digest of the binary.
    pub digest: HexDigest,
}

/// Install the latest (or pinned) release over HTTP.
///
/// # Errors
///
/// Returns the first stage failure.
pub fn install(config: &InstallConfig, stderr: &mut dyn Write) -> Result<InstallReport> {
    let downloader = HttpDownloader::new(config.endpoints.clone());
    install_with(config, &downloader, stderr)
}

/// Install using the provided downloader.
///
/// This function is public to allow integration tests to inject a stub
/// downloader.
///
/// # Errors
///
/// Returns the first stage failure.
pub fn install_with(
    config: &InstallConfig,
    downloader: &dyn ReleaseDownloader,
    stderr: &mut dyn Write,
) -> Result<InstallReport> {
    let plan = plan_with(config, downloader, stderr)?;
    let report = execute_plan(config, &plan, downloader, stderr)?;

    if !config.quiet {
        write_stderr_line(stderr, "");
        write_stderr_line(stderr, success_message(&report.version, &report.binary));
        write_stderr_line(stderr, "");
        write_stderr_line(stderr, post_install_notes());
        if !is_directory_in_path(&config.install_dir) {
            write_stderr_line(stderr, "");
            write_stderr_line(stderr, path_instructions(&config.install_dir));
        }
    }
    Ok(report)
}

/// Resolve the version, manifest, platform and artifact without
/// downloading the binary.
///
/// # Errors
///
/// Returns the first stage failure.
pub fn plan_with(
    config: &InstallConfig,
    downloader: &dyn ReleaseDownloader,
    stderr: &mut dyn Write,
) -> Result<InstallPlan> {
    let version = resolve_version(config, downloader, stderr)?;
    let manifest = fetch_manifest(&version, downloader, config.quiet, stderr)?;
    let (platform, suffix) = select_platform(config.platform)?;
    let artifact = ArtifactDescriptor::resolve(&config.endpoints, &version, suffix, &manifest)?;
    debug!("selected {} for {platform}", artifact.filename());

    Ok(InstallPlan {
        version,
        platform,
        suffix,
        artifact,
    })
}

/// Print what an install would do without touching the filesystem.
///
/// # Errors
///
/// Returns the first failure among the planning stages.
pub fn dry_run_with(
    config: &InstallConfig,
    downloader: &dyn ReleaseDownloader,
    stderr: &mut dyn Write,
) -> Result<InstallPlan> {
    let quiet_config = InstallConfig {
        quiet: true,
        ..config.clone()
    };
    let plan = plan_with(&quiet_config, downloader, stderr)?;

    let version = plan.version.to_string();
    let platform = plan.platform.to_string();
    let info = DryRunInfo {
        version: &version,
        platform: &platform,
        artifact: plan.artifact.filename(),
        url: plan.artifact.url(),
        expected_digest: plan.artifact.expected_digest().as_str(),
        install_dir: &config.install_dir,
        smoke_test: config.smoke_test,
    };
    write_stderr_line(stderr, info.display_text());
    Ok(plan)
}

/// [`dry_run_with`] over HTTP.
///
/// # Errors
///
/// Returns the first failure among the planning stages.
pub fn dry_run(config: &InstallConfig, stderr: &mut dyn Write) -> Result<InstallPlan> {
    let downloader = HttpDownloader::new(config.endpoints.clone());
    dry_run_with(config, &downloader, stderr)
}

/// Remove the binary and its aliases from `install_dir`.
///
/// # Errors
///
/// Returns an error if an existing entry cannot be removed.
pub fn uninstall(
    install_dir: &Utf8Path,
    quiet: bool,
    stderr: &mut dyn Write,
) -> Result<Vec<Utf8PathBuf>> {
    let removed = Installer::new(install_dir.to_owned()).uninstall()?;
    if !quiet {
        write_stderr_line(stderr, uninstall_message(removed.len(), install_dir));
    }
    Ok(removed)
}

fn resolve_version(
    config: &InstallConfig,
    downloader: &dyn ReleaseDownloader,
    stderr: &mut dyn Write,
) -> Result<ReleaseVersion> {
    if let Some(version) = &config.pinned_version {
        info!("using pinned version {version}");
        return Ok(version.clone());
    }

    if !config.quiet {
        write_stderr_line(
            stderr,
            format!(
                "Looking up the latest {} release...",
                config.endpoints.repo()
            ),
        );
    }
    let body = downloader
        .fetch_release_index()
        .map_err(|e| InstallerError::network(Stage::Resolve, e))?;
    let version = parse_release_index(&body).map_err(|e| InstallerError::parse(Stage::Resolve, e))?;
    info!("latest release is {version}");
    Ok(version)
}

fn fetch_manifest(
    version: &ReleaseVersion,
    downloader: &dyn ReleaseDownloader,
    quiet: bool,
    stderr: &mut dyn Write,
) -> Result<ChecksumManifest> {
    if !quiet {
        write_stderr_line(stderr, format!("Fetching checksums for {}...", version.tag()));
    }
    let text = downloader
        .fetch_checksums(version)
        .map_err(|e| InstallerError::network(Stage::FetchManifest, e))?;
    let manifest = ChecksumManifest::parse(&text)
        .map_err(|e| InstallerError::parse(Stage::FetchManifest, e))?;
    debug!(
        "checksum manifest lists: {}",
        manifest.filenames().collect::<Vec<_>>().join(", ")
    );
    Ok(manifest)
}

fn select_platform(source: PlatformSource) -> Result<(PlatformTarget, ArtifactSuffix)> {
    let platform = source.resolve()?;
    let suffix = platform.artifact_suffix()?;
    Ok((platform, suffix))
}

fn execute_plan(
    config: &InstallConfig,
    plan: &InstallPlan,
    downloader: &dyn ReleaseDownloader,
    stderr: &mut dyn Write,
) -> Result<InstallReport> {
    let artifact = &plan.artifact;

    // Download into a scratch directory that is removed on every exit path.
    let scratch = scratch_dir_in(&std::env::temp_dir())?;
    let download_path = scratch.path().join(artifact.filename());
    if !config.quiet {
        write_stderr_line(stderr, format!("Downloading {}...", artifact.url()));
    }
    downloader
        .download_artifact(&plan.version, artifact.filename(), &download_path)
        .map_err(|e| InstallerError::network(Stage::Download, e))?;

    let digest = verify_artifact(&download_path, artifact.filename(), artifact.expected_digest())?;
    debug!("verified {} sha256={digest}", artifact.filename());

    let installer = Installer::new(config.install_dir.clone());
    if !config.quiet {
        write_stderr_line(stderr, format!("Installing to {}...", installer.install_dir()));
    }
    installer.prepare()?;
    let binary = installer.install_binary(&download_path)?;
    let aliases = installer.link_aliases()?;

    if config.smoke_test {
        smoke_test(&binary, &plan.version)?;
    } else {
        debug!("smoke test skipped");
    }

    Ok(InstallReport {
        version: plan.version.clone(),
        binary,
        aliases,
        digest,
    })
}

fn scratch_dir_in(parent: &Path) -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix("gitflow-toolkit-download-")
        .tempdir_in(parent)
        .map_err(|e| {
            InstallerError::install(
                Stage::Download,
                "create scratch directory in",
                parent.to_string_lossy().into_owned(),
                e,
            )
        })
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
