//! CLI argument definitions for the gitflow-toolkit installer.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::pipeline::{InstallConfig, PlatformSource};
use crate::release::endpoints::{DEFAULT_REPO, ReleaseEndpoints, parse_repo_slug};
use crate::release::platform::ArtifactSuffix;
use crate::release::version::ReleaseVersion;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use log::LevelFilter;

/// Install the prebuilt gitflow-toolkit binary and its git aliases.
#[derive(Parser, Debug)]
#[command(name = "gitflow-toolkit-installer")]
#[command(version, about)]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = concat!(
    "Install the prebuilt gitflow-toolkit binary and its git aliases.\n\n",
    "The installer looks up the latest release, downloads the checksum ",
    "manifest and the binary for this platform, verifies its SHA-256 digest, ",
    "and installs it as `gitflow-toolkit` together with eleven `git-*` ",
    "symlinks so that `git ci`, `git ps`, `git feat` and friends work.\n\n",
    "Nothing is written to the install directory unless the download ",
    "verifies.",
))]
#[command(after_help = concat!(
    "INSTALL DIRECTORY:\n",
    "  --dir, then $GITFLOW_TOOLKIT_INSTALL_DIR, then the platform executable\n",
    "  directory (~/.local/bin on Linux), then $HOME/.local/bin.\n\n",
    "EXAMPLES:\n",
    "  Install the latest release:\n",
    "    $ gitflow-toolkit-installer\n\n",
    "  Install a specific version system-wide:\n",
    "    $ sudo gitflow-toolkit-installer -d /usr/local/bin --release-version 1.4.0\n\n",
    "  Stage the Linux ARM build from another machine:\n",
    "    $ gitflow-toolkit-installer --target linux-arm64 -d ./stage --skip-smoke-test\n\n",
    "  Preview without downloading the binary:\n",
    "    $ gitflow-toolkit-installer --dry-run\n\n",
    "  Remove the binary and aliases:\n",
    "    $ gitflow-toolkit-installer uninstall\n\n",
    "For more information, see: https://github.com/mritd/gitflow-toolkit",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Install arguments (used when no subcommand is given).
    ///
    /// These are rejected when a subcommand follows them.
    #[command(flatten)]
    pub install: InstallArgs,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Install the binary and aliases (default when no subcommand given).
    Install(InstallArgs),

    /// Remove the binary and aliases.
    Uninstall(UninstallArgs),
}

/// Arguments for the install command.
#[derive(Parser, Debug, Clone)]
pub struct InstallArgs {
    /// Install directory [default: platform-specific].
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<Utf8PathBuf>,

    /// Install this version instead of the latest release.
    #[arg(long, value_name = "VERSION", value_parser = ReleaseVersion::from_tag)]
    pub release_version: Option<ReleaseVersion>,

    /// Install the build for this platform instead of the host's.
    #[arg(long, value_name = "OS-ARCH")]
    pub target: Option<ArtifactSuffix>,

    /// Release repository as OWNER/NAME.
    #[arg(long, value_name = "OWNER/NAME", default_value = DEFAULT_REPO, value_parser = parse_repo_slug)]
    pub repo: String,

    /// Do not run `gitflow-toolkit -v` after installing.
    #[arg(long)]
    pub skip_smoke_test: bool,

    /// Show what would be installed and exit without downloading the binary.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        alias = "verbosity",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Arguments for the uninstall command.
#[derive(Parser, Debug, Clone)]
pub struct UninstallArgs {
    /// Directory to remove from [default: platform-specific].
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<Utf8PathBuf>,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl InstallArgs {
    /// Build the pipeline configuration for `install_dir`.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use gitflow_toolkit_installer::cli::InstallArgs;
    ///
    /// let args = InstallArgs {
    ///     skip_smoke_test: true,
    ///     ..InstallArgs::default()
    /// };
    /// let config = args.install_config(Utf8PathBuf::from("/opt/bin"));
    /// assert!(!config.smoke_test);
    /// assert_eq!(config.endpoints.repo(), "mritd/gitflow-toolkit");
    /// ```
    #[must_use]
    pub fn install_config(&self, install_dir: Utf8PathBuf) -> InstallConfig {
        InstallConfig {
            endpoints: ReleaseEndpoints::new(&self.repo),
            install_dir,
            pinned_version: self.release_version.clone(),
            platform: self
                .target
                .map_or(PlatformSource::Detect, |suffix| {
                    PlatformSource::Fixed(suffix.platform())
                }),
            smoke_test: !self.skip_smoke_test,
            quiet: self.quiet,
        }
    }
}

impl Default for InstallArgs {
    /// Creates an `InstallArgs` instance matching a bare invocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitflow_toolkit_installer::cli::InstallArgs;
    ///
    /// let args = InstallArgs::default();
    /// assert!(args.dir.is_none());
    /// assert_eq!(args.repo, "mritd/gitflow-toolkit");
    /// assert!(!args.dry_run);
    /// ```
    fn default() -> Self {
        Self {
            dir: None,
            release_version: None,
            target: None,
            repo: DEFAULT_REPO.to_owned(),
            skip_smoke_test: false,
            dry_run: false,
            verbosity: 0,
            quiet: false,
        }
    }
}

impl Default for UninstallArgs {
    fn default() -> Self {
        Self {
            dir: None,
            verbosity: 0,
            quiet: false,
        }
    }
}

impl Cli {
    /// Returns the effective install arguments.
    ///
    /// If an `Install` subcommand was provided, returns those arguments.
    /// Otherwise returns the flattened install arguments.
    #[must_use]
    pub fn install_args(&self) -> &InstallArgs {
        match &self.command {
            Some(Command::Install(args)) => args,
            Some(Command::Uninstall(_)) | None => &self.install,
        }
    }

    /// Return the log level requested on the command line.
    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        match &self.command {
            Some(Command::Uninstall(args)) => log_level_filter(args.verbosity, args.quiet),
            Some(Command::Install(args)) => log_level_filter(args.verbosity, args.quiet),
            None => log_level_filter(self.install.verbosity, self.install.quiet),
        }
    }
}

/// Map `-v` count and `--quiet` to a log level.
///
/// Warnings are shown by default; each `-v` enables the next level.
#[must_use]
pub fn log_level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
