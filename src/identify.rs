//! File identification pipeline
//!
//! ```text
//! Start -> ProbeWindowCaptured -> MatcherScanning -> Matched | NoMatch
//! Matched (ZIP-family) -> ContainerRefining -> Done
//! Matched (other) / NoMatch -> Done
//! ```
//!
//! Capture failures abort the run. Refinement never does.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::archive::{self, Fallback, Refinement};
use crate::common::magic::{find_match, MatchResult, SignatureRecord};
use crate::common::probe::{read_probe_window, ProbeWindow};
use crate::error::Result;

/// Terminal output of one identification run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identification {
    pub path: PathBuf,
    /// Raw probe window, reported when nothing matched
    pub probe: ProbeWindow,
    pub result: MatchResult,
    /// True when container refinement replaced the outer match
    pub refined: bool,
    /// Why refinement kept the outer match, when it ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Fallback>,
}

/// Identify a single file against an ordered signature collection
#[instrument(skip_all, fields(path = %path.display(), signatures = signatures.len()))]
pub fn identify(path: &Path, signatures: &[SignatureRecord]) -> Result<Identification> {
    let probe = read_probe_window(path)?;

    let mut identification = Identification {
        path: path.to_path_buf(),
        probe,
        result: find_match(probe.as_bytes(), signatures),
        refined: false,
        fallback: None,
    };

    let candidate = identification
        .result
        .as_match()
        .filter(|m| archive::is_zip_family(&m.extension))
        .cloned();
    let Some(candidate) = candidate else {
        debug!(matched = identification.result.is_match(), "Identification complete");
        return Ok(identification);
    };

    match archive::refine(path, candidate) {
        Refinement::Reclassified(m) => {
            identification.result = MatchResult::Match(m);
            identification.refined = true;
        }
        Refinement::Unchanged { reason, .. } => {
            identification.fallback = Some(reason);
        }
    }

    debug!(refined = identification.refined, "Identification complete");
    Ok(identification)
}

/// Identify many files in parallel
///
/// Each file runs the sequential single-file pipeline; results keep the order
/// of `paths`.
pub fn identify_batch(
    paths: &[PathBuf],
    signatures: &[SignatureRecord],
) -> Vec<(PathBuf, Result<Identification>)> {
    paths
        .par_iter()
        .map(|path| (path.clone(), identify(path, signatures)))
        .collect()
}
