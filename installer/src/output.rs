//! Output formatting for the installer CLI.
//!
//! Progress and result text is written to an injected `&mut dyn Write` so
//! callers (and tests) decide where it goes.

use crate::aliases::{ALIASES, CANONICAL_NAME};
use crate::release::version::ReleaseVersion;
use camino::Utf8Path;
use std::io::Write;

/// The `git config` line that sets the optional LLM API key.
pub const LLM_API_KEY_HINT: &str = "git config --global gitflow.llm-api-key \"your-api-key\"";

/// Write `message` followed by a newline, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Format a success message after installation.
#[must_use]
pub fn success_message(version: &ReleaseVersion, binary: &Utf8Path) -> String {
    format!("Successfully installed {CANONICAL_NAME} {version} to {binary}")
}

/// Format the notes printed after a successful install.
///
/// Lists every alias with the git subcommand it provides, then the
/// configuration hint for AI-assisted commit messages.
///
/// # Example
///
/// ```
/// use gitflow_toolkit_installer::output::post_install_notes;
///
/// let notes = post_install_notes();
/// assert!(notes.contains("git ci"));
/// assert!(notes.contains("gitflow.llm-api-key"));
/// ```
#[must_use]
pub fn post_install_notes() -> String {
    let width = ALIASES
        .iter()
        .map(|alias| alias.subcommand().len())
        .max()
        .unwrap_or_default();

    let mut lines = vec!["Installed git subcommands:".to_owned()];
    lines.extend(ALIASES.iter().map(|alias| {
        format!(
            "  git {:<width$}  {}",
            alias.subcommand(),
            alias.description()
        )
    }));
    lines.push(String::new());
    lines.push("To enable AI-generated commit messages, configure an API key:".to_owned());
    lines.push(format!("  {LLM_API_KEY_HINT}"));
    lines.join("\n")
}

/// Format a message after uninstalling.
#[must_use]
pub fn uninstall_message(removed: usize, install_dir: &Utf8Path) -> String {
    match removed {
        0 => format!("Nothing to remove in {install_dir}"),
        1 => format!("Removed 1 file from {install_dir}"),
        n => format!("Removed {n} files from {install_dir}"),
    }
}

/// Check whether `dir` appears in the `PATH` environment variable.
#[must_use]
pub fn is_directory_in_path(dir: &Utf8Path) -> bool {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).any(|p| p == dir.as_std_path()))
        .unwrap_or(false)
}

/// Returns instructions for adding a directory to `PATH`.
#[must_use]
pub fn path_instructions(bin_dir: &Utf8Path) -> String {
    #[cfg(unix)]
    {
        format!(
            concat!(
                "{} is not on your PATH. Add the following to your shell profile ",
                "(~/.bashrc or ~/.zshrc):\n",
                "  export PATH=\"{}:$PATH\""
            ),
            bin_dir, bin_dir
        )
    }
    #[cfg(not(unix))]
    {
        format!("Add {bin_dir} to your PATH")
    }
}

/// What an install would do, for `--dry-run`.
///
/// # Example
///
/// ```
/// use camino::Utf8PathBuf;
/// use gitflow_toolkit_installer::output::DryRunInfo;
///
/// let install_dir = Utf8PathBuf::from("/home/user/.local/bin");
/// let info = DryRunInfo {
///     version: "1.4.0",
///     platform: "linux/intel/64-bit",
///     artifact: "gitflow-toolkit-linux-amd64",
///     url: "https://github.com/mritd/gitflow-toolkit/releases/download/v1.4.0/gitflow-toolkit-linux-amd64",
///     expected_digest: "abc123",
///     install_dir: &install_dir,
///     smoke_test: true,
/// };
///
/// let output = info.display_text();
/// assert!(output.contains("Dry run"));
/// assert!(output.contains("git-hotfix"));
/// ```
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// The resolved release version.
    pub version: &'a str,
    /// The selected platform.
    pub platform: &'a str,
    /// The artifact filename.
    pub artifact: &'a str,
    /// The artifact download URL.
    pub url: &'a str,
    /// The digest the artifact must match.
    pub expected_digest: &'a str,
    /// Where the binary would be installed.
    pub install_dir: &'a Utf8Path,
    /// Whether the smoke test would run.
    pub smoke_test: bool,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let mut lines = vec![
            "Dry run - no files will be modified".to_owned(),
            String::new(),
            format!("Version: {}", self.version),
            format!("Platform: {}", self.platform),
            format!("Artifact: {}", self.artifact),
            format!("Download URL: {}", self.url),
            format!("Expected SHA-256: {}", self.expected_digest),
            format!("Install directory: {}", self.install_dir),
            format!("Smoke test: {}", self.smoke_test),
            String::new(),
            "Files to install:".to_owned(),
            format!("  - {CANONICAL_NAME}"),
        ];
        lines.extend(
            ALIASES
                .iter()
                .map(|alias| format!("  - {} -> {CANONICAL_NAME}", alias.name())),
        );
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};

    #[fixture]
    fn install_dir() -> Utf8PathBuf {
        Utf8PathBuf::from("/home/user/.local/bin")
    }

    #[test]
    fn write_stderr_line_appends_newline() {
        let mut buf = Vec::new();
        write_stderr_line(&mut buf, "hello");
        assert_eq!(buf, b"hello\n");
    }

    #[rstest]
    fn success_message_names_version_and_path(install_dir: Utf8PathBuf) {
        let version = ReleaseVersion::from_tag("v1.4.0").expect("valid tag");
        let msg = success_message(&version, &install_dir.join(CANONICAL_NAME));
        assert_eq!(
            msg,
            "Successfully installed gitflow-toolkit 1.4.0 to /home/user/.local/bin/gitflow-toolkit"
        );
    }

    #[test]
    fn notes_list_every_alias_in_order() {
        let notes = post_install_notes();
        let positions: Vec<_> = ALIASES
            .iter()
            .map(|alias| {
                notes
                    .find(&format!("git {} ", alias.subcommand()))
                    .unwrap_or_else(|| panic!("missing {}", alias.name()))
            })
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn notes_end_with_api_key_hint() {
        let notes = post_install_notes();
        assert!(notes.trim_end().ends_with(LLM_API_KEY_HINT));
    }

    #[rstest]
    #[case::none(0, "Nothing to remove")]
    #[case::singular(1, "Removed 1 file from")]
    #[case::plural(12, "Removed 12 files from")]
    fn uninstall_message_pluralises_correctly(
        #[case] removed: usize,
        #[case] expected: &str,
        install_dir: Utf8PathBuf,
    ) {
        assert!(uninstall_message(removed, &install_dir).contains(expected));
    }

    #[test]
    fn random_directory_is_not_in_path() {
        let temp = tempfile::tempdir().expect("temp dir");
        let dir = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8");
        assert!(!is_directory_in_path(&dir));
    }

    #[rstest]
    fn path_instructions_contain_directory(install_dir: Utf8PathBuf) {
        assert!(path_instructions(&install_dir).contains("/home/user/.local/bin"));
    }

    #[rstest]
    fn dry_run_lists_all_files(install_dir: Utf8PathBuf) {
        let info = DryRunInfo {
            version: "1.4.0",
            platform: "darwin/arm/64-bit",
            artifact: "gitflow-toolkit-darwin-arm64",
            url: "https://example.test/gitflow-toolkit-darwin-arm64",
            expected_digest: "abc123",
            install_dir: &install_dir,
            smoke_test: false,
        };
        let text = info.display_text();
        assert!(text.starts_with("Dry run"));
        assert!(text.contains("Artifact: gitflow-toolkit-darwin-arm64"));
        assert!(text.contains("Smoke test: false"));
        assert_eq!(text.matches(" -> gitflow-toolkit").count(), ALIASES.len());
    }
}
