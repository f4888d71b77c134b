//! Unit tests for the install pipeline.

use super::*;
use crate::aliases::ALIASES;
use crate::release::download::{DownloadError, MockReleaseDownloader};
use crate::release::platform::{Architecture, BitWidth, OperatingSystem, PlatformError};
use crate::release::verification::{VerificationError, sha256_bytes};
use crate::smoke::SmokeTestError;
use rstest::{fixture, rstest};
use tempfile::TempDir;

const PAYLOAD: &[u8] = b"#!/bin/sh\necho \"gitflow-toolkit v1.4.0\"\n";
const RELEASE_INDEX: &str = r#"{"tag_name": "v1.4.0", "name": "v1.4.0"}"#;

struct Harness {
    _temp_dir: TempDir,
    config: InstallConfig,
}

#[fixture]
fn harness() -> Harness {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).expect("UTF-8 path");
    let config = InstallConfig {
        platform: PlatformSource::Fixed(ArtifactSuffix::LinuxAmd64.platform()),
        smoke_test: false,
        quiet: true,
        ..InstallConfig::new(root.join("bin"))
    };
    Harness {
        _temp_dir: temp_dir,
        config,
    }
}

fn manifest_for(payload: &[u8]) -> String {
    format!(
        "{}  gitflow-toolkit-darwin-arm64\n{}  gitflow-toolkit-linux-amd64\n",
        sha256_bytes(b"other"),
        sha256_bytes(payload)
    )
}

fn downloader_serving(manifest: String, payload: &'static [u8]) -> MockReleaseDownloader {
    let mut downloader = MockReleaseDownloader::new();
    downloader
        .expect_fetch_release_index()
        .times(1)
        .returning(|| Ok(RELEASE_INDEX.to_owned()));
    downloader
        .expect_fetch_checksums()
        .times(1)
        .returning(move |_| Ok(manifest.clone()));
    downloader
        .expect_download_artifact()
        .times(1)
        .returning(move |_, _, dest: &Path| std::fs::write(dest, payload).map_err(DownloadError::Io));
    downloader
}

#[rstest]
fn installs_binary_and_every_alias(harness: Harness) {
    let downloader = downloader_serving(manifest_for(PAYLOAD), PAYLOAD);
    let mut stderr = Vec::new();

    let report = install_with(&harness.config, &downloader, &mut stderr).expect("install");

    assert_eq!(report.version.to_string(), "1.4.0");
    assert_eq!(report.binary, harness.config.install_dir.join("gitflow-toolkit"));
    assert_eq!(report.aliases.len(), ALIASES.len());
    assert_eq!(report.digest, sha256_bytes(PAYLOAD));
    assert_eq!(std::fs::read(&report.binary).expect("read binary"), PAYLOAD);
    assert!(stderr.is_empty(), "quiet run wrote output");
}

#[rstest]
fn requests_artifact_for_resolved_version(harness: Harness) {
    let mut downloader = MockReleaseDownloader::new();
    downloader
        .expect_fetch_release_index()
        .returning(|| Ok(RELEASE_INDEX.to_owned()));
    downloader
        .expect_fetch_checksums()
        .withf(|version| version.tag() == "v1.4.0")
        .returning(|_| Ok(manifest_for(PAYLOAD)));
    downloader
        .expect_download_artifact()
        .withf(|version, filename, _| {
            version.to_string() == "1.4.0" && filename == "gitflow-toolkit-linux-amd64"
        })
        .times(1)
        .returning(|_, _, dest| std::fs::write(dest, PAYLOAD).map_err(DownloadError::Io));

    install_with(&harness.config, &downloader, &mut Vec::new()).expect("install");
}

#[rstest]
fn pinned_version_skips_release_index(harness: Harness) {
    let config = InstallConfig {
        pinned_version: Some(ReleaseVersion::from_tag("1.3.2").expect("valid")),
        ..harness.config.clone()
    };
    let mut downloader = MockReleaseDownloader::new();
    downloader.expect_fetch_release_index().never();
    downloader
        .expect_fetch_checksums()
        .withf(|version| version.tag() == "v1.3.2")
        .returning(|_| Ok(manifest_for(PAYLOAD)));

    let plan = plan_with(&config, &downloader, &mut Vec::new()).expect("plan");
    assert_eq!(plan.version.to_string(), "1.3.2");
}

#[rstest]
fn unsupported_platform_downloads_nothing(harness: Harness) {
    let config = InstallConfig {
        platform: PlatformSource::Fixed(PlatformTarget::new(
            OperatingSystem::MacOs,
            Architecture::Intel,
            BitWidth::Bits32,
        )),
        ..harness.config.clone()
    };
    let mut downloader = MockReleaseDownloader::new();
    downloader
        .expect_fetch_release_index()
        .returning(|| Ok(RELEASE_INDEX.to_owned()));
    downloader
        .expect_fetch_checksums()
        .returning(|_| Ok(manifest_for(PAYLOAD)));
    downloader.expect_download_artifact().never();

    let err = install_with(&config, &downloader, &mut Vec::new()).expect_err("unsupported");
    assert_eq!(err.stage(), Stage::SelectPlatform);
    assert!(matches!(
        err,
        InstallerError::Platform(PlatformError::NoArtifact { .. })
    ));
    assert!(!config.install_dir.exists());
}

#[rstest]
fn checksum_mismatch_installs_nothing(harness: Harness) {
    let downloader = downloader_serving(manifest_for(b"the real binary"), PAYLOAD);

    let err = install_with(&harness.config, &downloader, &mut Vec::new()).expect_err("mismatch");
    assert_eq!(err.stage(), Stage::Verify);
    assert!(matches!(
        err,
        InstallerError::Verification(VerificationError::Mismatch { .. })
    ));
    assert!(!harness.config.install_dir.exists());
}

#[rstest]
fn artifact_missing_from_manifest_is_not_downloaded(harness: Harness) {
    let mut downloader = MockReleaseDownloader::new();
    downloader
        .expect_fetch_release_index()
        .returning(|| Ok(RELEASE_INDEX.to_owned()));
    downloader
        .expect_fetch_checksums()
        .returning(|_| Ok(format!("{}  gitflow-toolkit-linux-arm64\n", sha256_bytes(PAYLOAD))));
    downloader.expect_download_artifact().never();

    let err = install_with(&harness.config, &downloader, &mut Vec::new()).expect_err("missing");
    assert!(matches!(
        err,
        InstallerError::Verification(VerificationError::MissingChecksum { .. })
    ));
}

#[rstest]
#[case::unreachable(
    DownloadError::HttpError {
        url: "https://api.github.com/repos/mritd/gitflow-toolkit/releases/latest".to_owned(),
        reason: "connection refused".to_owned(),
    }
)]
#[case::not_found(
    DownloadError::NotFound {
        url: "https://api.github.com/repos/mritd/gitflow-toolkit/releases/latest".to_owned(),
    }
)]
fn release_index_failure_is_a_resolve_network_error(
    harness: Harness,
    #[case] failure: DownloadError,
) {
    let mut downloader = MockReleaseDownloader::new();
    downloader
        .expect_fetch_release_index()
        .return_once(move || Err(failure));
    downloader.expect_fetch_checksums().never();

    let err = install_with(&harness.config, &downloader, &mut Vec::new()).expect_err("network");
    assert_eq!(err.stage(), Stage::Resolve);
    assert!(matches!(err, InstallerError::Network { .. }));
}

#[rstest]
#[case::missing_tag(r#"{"name": "latest"}"#)]
#[case::not_json("<html>rate limited</html>")]
fn bad_release_index_is_a_resolve_parse_error(harness: Harness, #[case] body: &'static str) {
    let mut downloader = MockReleaseDownloader::new();
    downloader
        .expect_fetch_release_index()
        .returning(move || Ok(body.to_owned()));
    downloader.expect_fetch_checksums().never();

    let err = install_with(&harness.config, &downloader, &mut Vec::new()).expect_err("parse");
    assert_eq!(err.stage(), Stage::Resolve);
    assert!(matches!(err, InstallerError::Parse { .. }));
}

#[rstest]
fn malformed_manifest_is_a_manifest_parse_error(harness: Harness) {
    let mut downloader = MockReleaseDownloader::new();
    downloader
        .expect_fetch_release_index()
        .returning(|| Ok(RELEASE_INDEX.to_owned()));
    downloader
        .expect_fetch_checksums()
        .returning(|_| Ok("abc123 gitflow-toolkit-linux-amd64\n".to_owned()));
    downloader.expect_download_artifact().never();

    let err = install_with(&harness.config, &downloader, &mut Vec::new()).expect_err("parse");
    assert_eq!(err.stage(), Stage::FetchManifest);
    assert!(matches!(err, InstallerError::Parse { .. }));
}

#[rstest]
fn artifact_download_failure_is_a_download_error(harness: Harness) {
    let mut downloader = MockReleaseDownloader::new();
    downloader
        .expect_fetch_release_index()
        .returning(|| Ok(RELEASE_INDEX.to_owned()));
    downloader
        .expect_fetch_checksums()
        .returning(|_| Ok(manifest_for(PAYLOAD)));
    downloader.expect_download_artifact().returning(|_, filename, _| {
        Err(DownloadError::NotFound {
            url: format!("https://github.com/mritd/gitflow-toolkit/releases/download/v1.4.0/{filename}"),
        })
    });

    let err = install_with(&harness.config, &downloader, &mut Vec::new()).expect_err("404");
    assert_eq!(err.stage(), Stage::Download);
    assert!(err.to_string().contains("gitflow-toolkit-linux-amd64"));
}

#[cfg(unix)]
#[rstest]
fn smoke_test_runs_installed_binary(harness: Harness) {
    let config = InstallConfig {
        smoke_test: true,
        ..harness.config.clone()
    };
    let downloader = downloader_serving(manifest_for(PAYLOAD), PAYLOAD);

    install_with(&config, &downloader, &mut Vec::new()).expect("smoke test passes");
}

#[cfg(unix)]
#[rstest]
fn smoke_test_rejects_wrong_version(harness: Harness) {
    const OLD: &[u8] = b"#!/bin/sh\necho 1.3.9\n";
    let config = InstallConfig {
        smoke_test: true,
        ..harness.config.clone()
    };
    let downloader = downloader_serving(manifest_for(OLD), OLD);

    let err = install_with(&config, &downloader, &mut Vec::new()).expect_err("wrong version");
    assert_eq!(err.stage(), Stage::SmokeTest);
    assert!(matches!(
        err,
        InstallerError::SmokeTest(SmokeTestError::VersionMissing { .. })
    ));
}

#[rstest]
fn progress_is_written_when_not_quiet(harness: Harness) {
    let config = InstallConfig {
        quiet: false,
        ..harness.config.clone()
    };
    let downloader = downloader_serving(manifest_for(PAYLOAD), PAYLOAD);
    let mut stderr = Vec::new();

    install_with(&config, &downloader, &mut stderr).expect("install");

    let text = String::from_utf8(stderr).expect("UTF-8");
    assert!(text.contains("Looking up the latest mritd/gitflow-toolkit release"));
    assert!(text.contains("Fetching checksums for v1.4.0"));
    assert!(text.contains("Successfully installed gitflow-toolkit 1.4.0"));
    assert!(text.contains("git hotfix"));
    assert!(text.contains("gitflow.llm-api-key"));
}

#[rstest]
fn dry_run_prints_plan_and_touches_nothing(harness: Harness) {
    let mut downloader = MockReleaseDownloader::new();
    downloader
        .expect_fetch_release_index()
        .returning(|| Ok(RELEASE_INDEX.to_owned()));
    downloader
        .expect_fetch_checksums()
        .returning(|_| Ok(manifest_for(PAYLOAD)));
    downloader.expect_download_artifact().never();
    let mut stderr = Vec::new();

    let plan = dry_run_with(&harness.config, &downloader, &mut stderr).expect("dry run");

    assert_eq!(plan.suffix, ArtifactSuffix::LinuxAmd64);
    let text = String::from_utf8(stderr).expect("UTF-8");
    assert!(text.starts_with("Dry run"));
    assert!(text.contains(
        "https://github.com/mritd/gitflow-toolkit/releases/download/v1.4.0/gitflow-toolkit-linux-amd64"
    ));
    assert!(!harness.config.install_dir.exists());
}

#[cfg(unix)]
#[rstest]
fn install_then_uninstall_leaves_directory_empty(harness: Harness) {
    let downloader = downloader_serving(manifest_for(PAYLOAD), PAYLOAD);
    install_with(&harness.config, &downloader, &mut Vec::new()).expect("install");

    let mut stderr = Vec::new();
    let removed = uninstall(&harness.config.install_dir, false, &mut stderr).expect("uninstall");

    assert_eq!(removed.len(), ALIASES.len() + 1);
    let text = String::from_utf8(stderr).expect("UTF-8");
    assert!(text.contains("Removed 12 files"));
}

#[test]
fn scratch_dir_failure_is_a_local_install_error() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let missing = temp_dir.path().join("no-such-dir");

    let err = scratch_dir_in(&missing).expect_err("parent does not exist");

    assert_eq!(err.stage(), Stage::Download);
    assert!(
        matches!(err, InstallerError::Install { action: "create scratch directory in", .. }),
        "unexpected error: {err:?}"
    );
    assert!(err.to_string().contains("no-such-dir"), "message: {err}");
}

#[test]
fn scratch_dir_is_created_under_parent() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let scratch = scratch_dir_in(temp_dir.path()).expect("scratch dir");
    assert_eq!(scratch.path().parent(), Some(temp_dir.path()));
}
