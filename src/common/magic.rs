//! File type detection via magic signatures
//!
//! Matches the probe window of a file against an ordered collection of
//! signature records. Database order is the matching policy: the first record
//! whose pattern sits at its declared offset wins, so more specific signatures
//! are expected to precede generic ones.

use serde::Serialize;
use tracing::trace;

use crate::common::hex::format_hex_string;

// =============================================================================
// Signature Structures
// =============================================================================

/// A single validated entry of the signature database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRecord {
    /// Decoded pattern bytes
    pub pattern: Vec<u8>,
    /// Byte position from the start of the file where `pattern` begins
    pub offset: usize,
    /// Human-readable description
    pub description: String,
    /// Extension(s) as stored in the database (e.g. "ZIP|JAR")
    pub extension: String,
}

impl SignatureRecord {
    pub fn new(pattern: Vec<u8>, offset: usize, description: &str, extension: &str) -> Self {
        Self {
            pattern,
            offset,
            description: description.to_string(),
            extension: extension.to_string(),
        }
    }

    /// Byte range `[offset, offset + len)` this record inspects, if it fits in
    /// `sample_len` bytes
    fn window(&self, sample_len: usize) -> Option<std::ops::Range<usize>> {
        let end = self.offset.checked_add(self.pattern.len())?;
        (end <= sample_len).then_some(self.offset..end)
    }

    /// Exact byte comparison at the declared offset.
    ///
    /// Empty patterns and out-of-bounds ranges never match.
    pub fn matches(&self, sample: &[u8]) -> bool {
        if self.pattern.is_empty() {
            return false;
        }
        match self.window(sample.len()) {
            Some(range) => sample[range] == self.pattern[..],
            None => false,
        }
    }

    fn to_match(&self) -> FileMatch {
        FileMatch {
            description: self.description.clone(),
            extension: self.extension.clone(),
            signature: format_hex_string(&self.pattern, false),
            offset: self.offset,
        }
    }
}

/// Identity reported for a matched file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMatch {
    pub description: String,
    pub extension: String,
    /// Lowercase hex of the pattern that matched
    pub signature: String,
    /// Offset at which `signature` matched
    pub offset: usize,
}

/// Outcome of scanning a sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchResult {
    NoMatch,
    Match(FileMatch),
}

impl MatchResult {
    pub fn as_match(&self) -> Option<&FileMatch> {
        match self {
            MatchResult::Match(m) => Some(m),
            MatchResult::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Match(_))
    }
}

// =============================================================================
// Magic Detection
// =============================================================================

/// Find the first record in `signatures` that matches `sample`
///
/// Linear scan in database order. Records that do not fit inside the sample
/// are skipped without affecting the rest of the scan.
pub fn find_match(sample: &[u8], signatures: &[SignatureRecord]) -> MatchResult {
    let hit = signatures
        .iter()
        .enumerate()
        .find(|(_, record)| record.matches(sample));

    match hit {
        Some((index, record)) => {
            trace!(
                index,
                offset = record.offset,
                pattern = %format_hex_string(&record.pattern, true),
                "Signature matched"
            );
            MatchResult::Match(record.to_match())
        }
        None => {
            trace!(scanned = signatures.len(), "No signature matched");
            MatchResult::NoMatch
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
