//! Post-install smoke test.
//!
//! Runs `gitflow-toolkit -v` from the install directory and checks that it
//! reports the version that was just installed. The child is killed if it
//! does not finish within the timeout.

use crate::release::version::ReleaseVersion;
use camino::Utf8Path;
use log::debug;
use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;
use wait_timeout::ChildExt;

/// How long the installed binary may take to print its version.
pub const SMOKE_TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised by the smoke test.
#[derive(Debug, Error)]
pub enum SmokeTestError {
    /// The binary could not be started or its output could not be read.
    #[error("failed to run {binary}: {source}")]
    Spawn {
        /// Path of the binary that was run.
        binary: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The binary did not exit in time.
    #[error("{binary} -v did not exit within {secs} seconds")]
    TimedOut {
        /// Path of the binary that was run.
        binary: String,
        /// The timeout that elapsed.
        secs: u64,
    },

    /// The binary exited unsuccessfully.
    #[error("{binary} -v exited with {status}: {stderr}")]
    Failed {
        /// Path of the binary that was run.
        binary: String,
        /// The exit status.
        status: ExitStatus,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// The version output did not mention the installed version.
    #[error("{binary} -v printed {stdout:?}, expected it to contain {expected}")]
    VersionMissing {
        /// Path of the binary that was run.
        binary: String,
        /// The version that was installed.
        expected: String,
        /// Trimmed standard output.
        stdout: String,
    },
}

/// Run `binary -v` and check that it reports `version`.
///
/// # Errors
///
/// Returns a [`SmokeTestError`] describing how the check failed.
pub fn smoke_test(binary: &Utf8Path, version: &ReleaseVersion) -> Result<(), SmokeTestError> {
    smoke_test_with_timeout(binary, version, SMOKE_TEST_TIMEOUT)
}

/// [`smoke_test`] with an explicit timeout.
///
/// # Errors
///
/// Returns a [`SmokeTestError`] describing how the check failed.
pub fn smoke_test_with_timeout(
    binary: &Utf8Path,
    version: &ReleaseVersion,
    timeout: Duration,
) -> Result<(), SmokeTestError> {
    debug!("running {binary} -v");
    let spawn_error = |source| SmokeTestError::Spawn {
        binary: binary.to_string(),
        source,
    };

    let mut child = Command::new(binary.as_std_path())
        .arg("-v")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_error)?;

    // Drain both pipes while waiting so a chatty binary cannot block on a
    // full pipe buffer.
    let stdout_reader = drain(child.stdout.take());
    let stderr_reader = drain(child.stderr.take());

    let Some(status) = child.wait_timeout(timeout).map_err(spawn_error)? else {
        let _ = child.kill();
        let _ = child.wait();
        return Err(SmokeTestError::TimedOut {
            binary: binary.to_string(),
            secs: timeout.as_secs(),
        });
    };

    let stdout = collect(stdout_reader).map_err(spawn_error)?;
    let stderr = collect(stderr_reader).map_err(spawn_error)?;

    if !status.success() {
        return Err(SmokeTestError::Failed {
            binary: binary.to_string(),
            status,
            stderr: stderr.trim().to_owned(),
        });
    }

    let expected = version.to_string();
    if !stdout.contains(&expected) {
        return Err(SmokeTestError::VersionMissing {
            binary: binary.to_string(),
            expected,
            stdout: stdout.trim().to_owned(),
        });
    }

    debug!("smoke test passed: {}", stdout.trim());
    Ok(())
}

/// Read `pipe` to the end on a background thread.
fn drain<R>(pipe: Option<R>) -> Option<JoinHandle<io::Result<String>>>
where
    R: Read + Send + 'static,
{
    pipe.map(|pipe| thread::spawn(move || io::read_to_string(pipe)))
}

fn collect(reader: Option<JoinHandle<io::Result<String>>>) -> io::Result<String> {
    match reader {
        Some(handle) => handle
            .join()
            .map_err(|_| io::Error::other("output reader thread panicked"))?,
        None => Ok(String::new()),
    }
}
