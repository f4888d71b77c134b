//! Directory resolution abstraction for platform-specific paths.
//!
//! Install-directory lookup goes through [`BaseDirs`] so tests can supply
//! fixed locations instead of the real user profile.

use std::path::PathBuf;

/// Platform directory lookups used by the installer.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// Return the user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Return the per-user executable directory, when the platform has one.
    ///
    /// This is `~/.local/bin` on Linux (honouring `XDG_BIN_HOME`) and
    /// `None` on macOS.
    fn executable_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by `directories-next`.
#[derive(Debug, Clone)]
pub struct SystemBaseDirs {
    inner: Option<directories_next::BaseDirs>,
}

impl SystemBaseDirs {
    /// Query the platform for the current user's directories.
    ///
    /// Lookups return `None` when no home directory can be found.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: directories_next::BaseDirs::new(),
        }
    }
}

impl Default for SystemBaseDirs {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseDirs for SystemBaseDirs {
    fn home_dir(&self) -> Option<PathBuf> {
        self.inner.as_ref().map(|dirs| dirs.home_dir().to_path_buf())
    }

    fn executable_dir(&self) -> Option<PathBuf> {
        self.inner
            .as_ref()
            .and_then(|dirs| dirs.executable_dir())
            .map(std::path::Path::to_path_buf)
    }
}
