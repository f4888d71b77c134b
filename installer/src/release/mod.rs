//! Release resolution, manifest parsing, platform selection, and
//! verification.
//!
//! # Sub-modules
//!
//! - [`artifact`] - Artifact filenames and download descriptors.
//! - [`checksums`] - Checksum manifest parsing (`ChecksumManifest`).
//! - [`digest`] - Hex digest newtype (`HexDigest`).
//! - [`download`] - Downloader trait and `ureq` implementation.
//! - [`endpoints`] - Release endpoint URL templates.
//! - [`platform`] - Host detection and the platform-to-artifact table.
//! - [`verification`] - SHA-256 computation and digest comparison.
//! - [`version`] - Release index parsing (`ReleaseVersion`).

pub mod artifact;
pub mod checksums;
pub mod digest;
pub mod download;
pub mod endpoints;
pub mod platform;
pub mod verification;
pub mod version;
