//! Host platform detection and artifact selection.
//!
//! Releases ship one binary per supported platform. The mapping from a
//! `(os, architecture, bit-width)` tuple to an artifact suffix is a single
//! exhaustive table on [`ArtifactSuffix`]; anything not listed is
//! unsupported.

use std::fmt;
use std::str::FromStr;

/// Operating systems the installer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingSystem {
    /// Apple macOS (Darwin).
    MacOs,
    /// Linux.
    Linux,
}

/// CPU architecture families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    /// x86 family (`x86`, `x86_64`).
    Intel,
    /// ARM family (`arm`, `aarch64`).
    Arm,
}

/// Native pointer width of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitWidth {
    /// 32-bit.
    Bits32,
    /// 64-bit.
    Bits64,
}

/// Errors arising from platform detection and artifact selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// The host OS or CPU is outside the supported families.
    #[error("unsupported host platform: os={os}, arch={arch}")]
    UnsupportedHost {
        /// Raw OS identifier (e.g. `windows`).
        os: String,
        /// Raw architecture identifier (e.g. `riscv64`).
        arch: String,
    },

    /// The platform tuple is known but no artifact is published for it.
    #[error("no gitflow-toolkit release artifact for {target}")]
    NoArtifact {
        /// The unsupported tuple.
        target: PlatformTarget,
    },

    /// A `--target` override is not a published artifact suffix.
    #[error("unknown artifact target \"{value}\"; expected one of: {expected}")]
    UnknownSuffix {
        /// The rejected suffix.
        value: String,
        /// Comma-separated list of accepted suffixes.
        expected: String,
    },
}

/// The published artifact suffixes, one per supported platform.
///
/// Together with [`ArtifactSuffix::platform`] this is the platform table:
/// each suffix names exactly one tuple, and a tuple without a suffix has no
/// release artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactSuffix {
    /// `darwin-amd64`.
    DarwinAmd64,
    /// `darwin-arm64`.
    DarwinArm64,
    /// `linux-amd64`.
    LinuxAmd64,
    /// `linux-arm64`.
    LinuxArm64,
    /// `linux-386`, the 32-bit Intel fallback.
    Linux386,
    /// `linux-armv7`, the 32-bit ARM fallback.
    LinuxArmv7,
}

/// A host platform tuple.
///
/// # Examples
///
/// ```
/// use gitflow_toolkit_installer::release::platform::{
///     Architecture, ArtifactSuffix, BitWidth, OperatingSystem, PlatformTarget,
/// };
///
/// let target = PlatformTarget::new(OperatingSystem::Linux, Architecture::Arm, BitWidth::Bits32);
/// assert_eq!(target.artifact_suffix(), Ok(ArtifactSuffix::LinuxArmv7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformTarget {
    os: OperatingSystem,
    arch: Architecture,
    bits: BitWidth,
}

impl PlatformTarget {
    /// Build a platform tuple.
    #[must_use]
    pub const fn new(os: OperatingSystem, arch: Architecture, bits: BitWidth) -> Self {
        Self { os, arch, bits }
    }

    /// Detect the platform this installer is running on.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::UnsupportedHost`] for hosts outside the
    /// macOS/Linux and Intel/ARM families.
    pub fn detect() -> Result<Self, PlatformError> {
        Self::from_host_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Build a tuple from raw `std::env::consts` style identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::UnsupportedHost`] when either identifier is
    /// not recognised.
    pub fn from_host_parts(os: &str, arch: &str) -> Result<Self, PlatformError> {
        let unsupported = || PlatformError::UnsupportedHost {
            os: os.to_owned(),
            arch: arch.to_owned(),
        };
        let os_kind = match os {
            "macos" => OperatingSystem::MacOs,
            "linux" => OperatingSystem::Linux,
            _ => return Err(unsupported()),
        };
        let (arch_kind, bits) = match arch {
            "x86_64" => (Architecture::Intel, BitWidth::Bits64),
            "x86" => (Architecture::Intel, BitWidth::Bits32),
            "aarch64" => (Architecture::Arm, BitWidth::Bits64),
            "arm" => (Architecture::Arm, BitWidth::Bits32),
            _ => return Err(unsupported()),
        };
        Ok(Self::new(os_kind, arch_kind, bits))
    }

    /// Select the artifact published for this platform.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NoArtifact`] when the table has no row for
    /// this tuple (for example 32-bit macOS).
    pub fn artifact_suffix(&self) -> Result<ArtifactSuffix, PlatformError> {
        ArtifactSuffix::ALL
            .into_iter()
            .find(|suffix| suffix.platform() == *self)
            .ok_or(PlatformError::NoArtifact { target: *self })
    }
}

impl fmt::Display for PlatformTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let os = match self.os {
            OperatingSystem::MacOs => "macos",
            OperatingSystem::Linux => "linux",
        };
        let arch = match self.arch {
            Architecture::Intel => "intel",
            Architecture::Arm => "arm",
        };
        let bits = match self.bits {
            BitWidth::Bits32 => "32-bit",
            BitWidth::Bits64 => "64-bit",
        };
        write!(f, "{os}/{arch}/{bits}")
    }
}

impl ArtifactSuffix {
    /// Every published suffix, in release asset order.
    pub const ALL: [Self; 6] = [
        Self::DarwinAmd64,
        Self::DarwinArm64,
        Self::LinuxAmd64,
        Self::LinuxArm64,
        Self::Linux386,
        Self::LinuxArmv7,
    ];

    /// Return the suffix as it appears in artifact filenames.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DarwinAmd64 => "darwin-amd64",
            Self::DarwinArm64 => "darwin-arm64",
            Self::LinuxAmd64 => "linux-amd64",
            Self::LinuxArm64 => "linux-arm64",
            Self::Linux386 => "linux-386",
            Self::LinuxArmv7 => "linux-armv7",
        }
    }

    /// Return the platform tuple this suffix is published for.
    #[must_use]
    pub const fn platform(self) -> PlatformTarget {
        use Architecture::{Arm, Intel};
        use BitWidth::{Bits32, Bits64};
        use OperatingSystem::{Linux, MacOs};

        match self {
            Self::DarwinAmd64 => PlatformTarget::new(MacOs, Intel, Bits64),
            Self::DarwinArm64 => PlatformTarget::new(MacOs, Arm, Bits64),
            Self::LinuxAmd64 => PlatformTarget::new(Linux, Intel, Bits64),
            Self::LinuxArm64 => PlatformTarget::new(Linux, Arm, Bits64),
            Self::Linux386 => PlatformTarget::new(Linux, Intel, Bits32),
            Self::LinuxArmv7 => PlatformTarget::new(Linux, Arm, Bits32),
        }
    }
}

impl fmt::Display for ArtifactSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactSuffix {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|suffix| suffix.as_str() == s)
            .ok_or_else(|| PlatformError::UnknownSuffix {
                value: s.to_owned(),
                expected: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}
