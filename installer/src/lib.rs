//! gitflow-toolkit installer library.
//!
//! This crate provides the core functionality for resolving, verifying and
//! installing prebuilt `gitflow-toolkit` releases. It is used by the
//! `gitflow-toolkit-installer` CLI binary and can be consumed
//! programmatically for testing or custom installation workflows.
//!
//! # Modules
//!
//! - [`aliases`] - The canonical binary name and `git-*` alias table
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Install directory resolution
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - Stage-tagged error types
//! - [`installer`] - Atomic binary install and alias linking
//! - [`output`] - Progress, post-install and dry-run text
//! - [`pipeline`] - Install pipeline orchestration
//! - [`release`] - Release lookup, checksum manifests, platform selection
//!   and verification
//! - [`smoke`] - Post-install version check

pub mod aliases;
pub mod cli;
pub mod config;
pub mod dirs;
pub mod error;
pub mod installer;
pub mod output;
pub mod pipeline;
pub mod release;
pub mod smoke;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
