//! Placing the verified binary and its aliases in the install directory.
//!
//! The binary is copied into a temporary file alongside its final path and
//! renamed into place, so an interrupted install never leaves a truncated
//! `gitflow-toolkit` behind. Aliases are relative symlinks to the canonical
//! name and are replaced on every run.

use crate::aliases::{ALIASES, CANONICAL_NAME};
use crate::error::{InstallerError, Result, Stage};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, trace, warn};
use std::fs;
use std::io;
use std::path::Path;

/// Installs and removes the binary and its alias symlinks.
#[derive(Debug, Clone)]
pub struct Installer {
    install_dir: Utf8PathBuf,
}

impl Installer {
    /// Create an installer targeting `install_dir`.
    #[must_use]
    pub fn new(install_dir: Utf8PathBuf) -> Self {
        Self { install_dir }
    }

    /// Return the install directory.
    #[must_use]
    pub fn install_dir(&self) -> &Utf8Path {
        &self.install_dir
    }

    /// Return the path of the canonical binary.
    #[must_use]
    pub fn canonical_path(&self) -> Utf8PathBuf {
        self.install_dir.join(CANONICAL_NAME)
    }

    /// Return the path of the alias symlink `name`.
    #[must_use]
    pub fn alias_path(&self, name: &str) -> Utf8PathBuf {
        self.install_dir.join(name)
    }

    /// Return every alias path, in table order.
    #[must_use]
    pub fn alias_paths(&self) -> Vec<Utf8PathBuf> {
        ALIASES
            .iter()
            .map(|alias| self.alias_path(alias.name()))
            .collect()
    }

    /// Ensure the install directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.install_dir).map_err(|e| {
            InstallerError::install(Stage::Install, "create directory", &self.install_dir, e)
        })
    }

    /// Install the binary at `source` as the canonical executable.
    ///
    /// Any existing binary is replaced atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy, permission change, or rename fails.
    pub fn install_binary(&self, source: &Path) -> Result<Utf8PathBuf> {
        let dest = self.canonical_path();
        let fail = |action, e| InstallerError::install(Stage::Install, action, &dest, e);

        let mut staged = tempfile::Builder::new()
            .prefix(".gitflow-toolkit-")
            .tempfile_in(&self.install_dir)
            .map_err(|e| fail("create temporary file for", e))?;
        let mut reader = fs::File::open(source).map_err(|e| fail("read download for", e))?;
        let copied = io::copy(&mut reader, staged.as_file_mut()).map_err(|e| fail("copy", e))?;
        trace!("staged {copied} bytes for {dest}");

        set_executable(staged.path()).map_err(|e| fail("set permissions on", e))?;
        staged
            .persist(&dest)
            .map_err(|e| fail("rename into place", e.error))?;

        debug!("installed {dest}");
        Ok(dest)
    }

    /// Create every alias symlink, replacing whatever is already there.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing entry is a directory or a link
    /// cannot be created.
    pub fn link_aliases(&self) -> Result<Vec<Utf8PathBuf>> {
        self.alias_paths()
            .into_iter()
            .map(|path| {
                remove_entry(&path, Stage::LinkAliases)?;
                create_symlink(Utf8Path::new(CANONICAL_NAME), &path).map_err(|e| {
                    InstallerError::install(Stage::LinkAliases, "create symlink", &path, e)
                })?;
                trace!("linked {path} -> {CANONICAL_NAME}");
                Ok(path)
            })
            .collect()
    }

    /// Remove every alias and the canonical binary.
    ///
    /// Returns the paths that were actually removed; absent entries are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry exists but cannot be removed.
    pub fn uninstall(&self) -> Result<Vec<Utf8PathBuf>> {
        let mut removed = Vec::new();
        for path in self
            .alias_paths()
            .into_iter()
            .chain(std::iter::once(self.canonical_path()))
        {
            if remove_entry(&path, Stage::Uninstall)? {
                debug!("removed {path}");
                removed.push(path);
            }
        }
        Ok(removed)
    }
}

/// Remove a file or symlink at `path`. Returns whether anything was removed.
fn remove_entry(path: &Utf8Path, stage: Stage) -> Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(InstallerError::install(stage, "inspect", path, e)),
    };

    if metadata.is_dir() {
        return Err(InstallerError::install(
            stage,
            "remove",
            path,
            io::Error::other("path is a directory"),
        ));
    }

    if stage == Stage::LinkAliases && !metadata.file_type().is_symlink() {
        warn!("replacing regular file {path} with an alias symlink");
    }

    fs::remove_file(path).map_err(|e| InstallerError::install(stage, "remove", path, e))?;
    Ok(true)
}

#[cfg(unix)]
fn set_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn create_symlink(target: &Utf8Path, link: &Utf8Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Utf8Path, link: &Utf8Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(not(any(unix, windows)))]
fn create_symlink(_target: &Utf8Path, _link: &Utf8Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}
