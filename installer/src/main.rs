//! gitflow-toolkit installer CLI entrypoint.
//!
//! This binary downloads, verifies and installs the prebuilt
//! `gitflow-toolkit` binary, then links its `git-*` aliases.

use clap::Parser;
use gitflow_toolkit_installer::cli::{Cli, Command, InstallArgs, UninstallArgs};
use gitflow_toolkit_installer::config::resolve_install_dir;
use gitflow_toolkit_installer::dirs::{BaseDirs, SystemBaseDirs};
use gitflow_toolkit_installer::error::Result;
use gitflow_toolkit_installer::output::write_stderr_line;
use gitflow_toolkit_installer::pipeline::{dry_run, install, uninstall};
use log::LevelFilter;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level());
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Initialises `env_logger`; `RUST_LOG` takes precedence over `level`.
fn init_logging(level: LevelFilter) {
    let env = env_logger::Env::default().default_filter_or(level.as_str());
    if env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init()
        .is_err()
    {
        // A logger is already installed.
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let dirs = SystemBaseDirs::new();
    match &cli.command {
        Some(Command::Uninstall(args)) => run_uninstall(args, &dirs, stderr),
        Some(Command::Install(_)) | None => run_install(cli.install_args(), &dirs, stderr),
    }
}

fn run_install(args: &InstallArgs, dirs: &dyn BaseDirs, stderr: &mut dyn Write) -> Result<()> {
    let install_dir = resolve_install_dir(args.dir.as_deref(), dirs)?;
    let config = args.install_config(install_dir);

    // Dry-run mode: show what would be done without side effects
    if args.dry_run {
        dry_run(&config, stderr)?;
        return Ok(());
    }

    install(&config, stderr)?;
    Ok(())
}

fn run_uninstall(args: &UninstallArgs, dirs: &dyn BaseDirs, stderr: &mut dyn Write) -> Result<()> {
    let install_dir = resolve_install_dir(args.dir.as_deref(), dirs)?;
    uninstall(&install_dir, args.quiet, stderr)?;
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}
