//! Install directory resolution.
//!
//! The directory is taken from, in order: the `--dir` flag, the
//! `GITFLOW_TOOLKIT_INSTALL_DIR` environment variable, the platform
//! executable directory, and finally `$HOME/.local/bin`.

use crate::dirs::BaseDirs;
use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::path::PathBuf;

/// Environment variable overriding the default install directory.
pub const INSTALL_DIR_ENV: &str = "GITFLOW_TOOLKIT_INSTALL_DIR";

/// Resolve the directory the binary and its aliases are installed into.
///
/// An empty environment variable is treated as unset.
///
/// # Errors
///
/// Returns [`InstallerError::Config`] when no candidate is available or the
/// chosen directory is not valid UTF-8.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use gitflow_toolkit_installer::config::resolve_install_dir;
/// use gitflow_toolkit_installer::dirs::SystemBaseDirs;
///
/// let dir = resolve_install_dir(Some(Utf8Path::new("/opt/bin")), &SystemBaseDirs::new())?;
/// assert_eq!(dir, "/opt/bin");
/// # Ok::<(), gitflow_toolkit_installer::error::InstallerError>(())
/// ```
pub fn resolve_install_dir(cli_dir: Option<&Utf8Path>, dirs: &dyn BaseDirs) -> Result<Utf8PathBuf> {
    if let Some(dir) = cli_dir {
        debug!("install directory from --dir: {dir}");
        return Ok(dir.to_owned());
    }

    if let Some(dir) = std::env::var_os(INSTALL_DIR_ENV).filter(|value| !value.is_empty()) {
        debug!("install directory from {INSTALL_DIR_ENV}");
        return into_utf8(PathBuf::from(dir));
    }

    if let Some(dir) = dirs.executable_dir() {
        debug!("install directory from platform executable dir");
        return into_utf8(dir);
    }

    let home = dirs.home_dir().ok_or_else(|| InstallerError::Config {
        reason: format!("could not determine a home directory; pass --dir or set {INSTALL_DIR_ENV}"),
    })?;
    into_utf8(home.join(".local").join("bin"))
}

fn into_utf8(path: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).map_err(|path| InstallerError::Config {
        reason: format!("install directory is not valid UTF-8: {}", path.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dirs::MockBaseDirs;
    use rstest::{fixture, rstest};

    #[fixture]
    fn linux_dirs() -> MockBaseDirs {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_executable_dir()
            .returning(|| Some(PathBuf::from("/home/dev/.local/bin")));
        dirs.expect_home_dir()
            .returning(|| Some(PathBuf::from("/home/dev")));
        dirs
    }

    #[rstest]
    fn cli_flag_wins_over_everything(linux_dirs: MockBaseDirs) {
        temp_env::with_var(INSTALL_DIR_ENV, Some("/from/env"), || {
            let dir = resolve_install_dir(Some(Utf8Path::new("/from/flag")), &linux_dirs)
                .expect("resolves");
            assert_eq!(dir, "/from/flag");
        });
    }

    #[rstest]
    fn environment_wins_over_platform_dirs(linux_dirs: MockBaseDirs) {
        temp_env::with_var(INSTALL_DIR_ENV, Some("/from/env"), || {
            let dir = resolve_install_dir(None, &linux_dirs).expect("resolves");
            assert_eq!(dir, "/from/env");
        });
    }

    #[rstest]
    fn empty_environment_value_is_ignored(linux_dirs: MockBaseDirs) {
        temp_env::with_var(INSTALL_DIR_ENV, Some(""), || {
            let dir = resolve_install_dir(None, &linux_dirs).expect("resolves");
            assert_eq!(dir, "/home/dev/.local/bin");
        });
    }

    #[test]
    fn falls_back_to_home_local_bin() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_executable_dir().returning(|| None);
        dirs.expect_home_dir()
            .returning(|| Some(PathBuf::from("/Users/dev")));

        temp_env::with_var_unset(INSTALL_DIR_ENV, || {
            let dir = resolve_install_dir(None, &dirs).expect("resolves");
            assert_eq!(dir, "/Users/dev/.local/bin");
        });
    }

    #[test]
    fn no_candidates_is_a_config_error() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_executable_dir().returning(|| None);
        dirs.expect_home_dir().returning(|| None);

        temp_env::with_var_unset(INSTALL_DIR_ENV, || {
            let err = resolve_install_dir(None, &dirs).expect_err("no directory");
            assert!(
                matches!(err, InstallerError::Config { ref reason } if reason.contains("--dir")),
                "unexpected error: {err}"
            );
        });
    }

    #[cfg(unix)]
    #[test]
    fn rejects_non_utf8_platform_dir() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let mut dirs = MockBaseDirs::new();
        dirs.expect_executable_dir().return_once(|| {
            Some(PathBuf::from(OsString::from_vec(vec![
                b'/', b't', b'm', b'p', b'/', 0xff,
            ])))
        });

        temp_env::with_var_unset(INSTALL_DIR_ENV, || {
            let err = resolve_install_dir(None, &dirs).expect_err("non-UTF-8 path");
            assert!(
                matches!(err, InstallerError::Config { ref reason } if reason.contains("not valid UTF-8")),
                "unexpected error: {err}"
            );
        });
    }
}
