//! Checksum manifest parsing.
//!
//! Releases publish a `checksums.txt` listing one `<digest>  <filename>`
//! pair per line, separated by exactly two spaces. Parsing is strict: any
//! other whitespace inside a line, a missing field, a non-hex digest, or a
//! repeated filename rejects the whole manifest.

use super::digest::{DigestError, HexDigest};
use std::collections::BTreeMap;
use std::str::FromStr;

/// The separator between digest and filename.
const FIELD_SEPARATOR: &str = "  ";

/// Errors arising from checksum manifest parsing and lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChecksumError {
    /// A line does not match `<digest>  <filename>`.
    #[error("checksum manifest line {line}: {reason}")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// Description of the problem.
        reason: String,
    },

    /// A line carries a digest that is not hexadecimal.
    #[error("checksum manifest line {line}: {source}")]
    InvalidDigest {
        /// 1-based line number.
        line: usize,
        /// The digest validation failure.
        #[source]
        source: DigestError,
    },

    /// The same filename appears on more than one line.
    #[error("checksum manifest line {line}: duplicate entry for {filename}")]
    DuplicateEntry {
        /// 1-based line number of the repeated entry.
        line: usize,
        /// The repeated filename.
        filename: String,
    },

    /// The manifest contains no entries.
    #[error("checksum manifest is empty")]
    Empty,
}

/// A read-only mapping from artifact filename to expected digest.
///
/// # Examples
///
/// ```
/// use gitflow_toolkit_installer::release::checksums::ChecksumManifest;
///
/// let manifest: ChecksumManifest = "abc123  gitflow-toolkit-linux-amd64\n"
///     .parse()
///     .expect("valid manifest");
/// let digest = manifest
///     .digest_for("gitflow-toolkit-linux-amd64")
///     .expect("entry present");
/// assert_eq!(digest.as_str(), "abc123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumManifest {
    entries: BTreeMap<String, HexDigest>,
}

impl ChecksumManifest {
    /// Parse manifest text.
    ///
    /// Empty lines are skipped and `\r\n` line endings are accepted.
    ///
    /// # Errors
    ///
    /// Returns a [`ChecksumError`] describing the first offending line, or
    /// [`ChecksumError::Empty`] when no entries are present.
    pub fn parse(text: &str) -> Result<Self, ChecksumError> {
        let mut entries = BTreeMap::new();
        for (index, raw_line) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            if line.is_empty() {
                continue;
            }
            let (digest, filename) = parse_line(line, line_number)?;
            if entries.contains_key(filename) {
                return Err(ChecksumError::DuplicateEntry {
                    line: line_number,
                    filename: filename.to_owned(),
                });
            }
            entries.insert(filename.to_owned(), digest);
        }

        if entries.is_empty() {
            return Err(ChecksumError::Empty);
        }
        Ok(Self { entries })
    }

    /// Look up the expected digest for `filename`.
    #[must_use]
    pub fn digest_for(&self, filename: &str) -> Option<&HexDigest> {
        self.entries.get(filename)
    }

    /// Iterate over listed filenames in sorted order.
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromStr for ChecksumManifest {
    type Err = ChecksumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split one non-empty line into its validated digest and filename.
fn parse_line(line: &str, line_number: usize) -> Result<(HexDigest, &str), ChecksumError> {
    let malformed = |reason: &str| ChecksumError::MalformedLine {
        line: line_number,
        reason: reason.to_owned(),
    };

    let (digest, filename) = line
        .split_once(FIELD_SEPARATOR)
        .ok_or_else(|| malformed("expected `<digest>  <filename>`"))?;

    if digest.is_empty() {
        return Err(malformed("missing digest"));
    }
    if filename.is_empty() {
        return Err(malformed("missing filename"));
    }
    if digest.contains(char::is_whitespace) || filename.contains(char::is_whitespace) {
        return Err(malformed(
            "unexpected whitespace; fields must be separated by exactly two spaces",
        ));
    }

    let digest = HexDigest::try_from(digest).map_err(|source| ChecksumError::InvalidDigest {
        line: line_number,
        source,
    })?;
    Ok((digest, filename))
}
