//! ZIP container refinement
//!
//! A `PK\x03\x04` header only says "ZIP". OOXML documents, JARs and friends
//! share that header and differ only by the entries they carry, so a ZIP-family
//! match is re-examined here by listing the central directory.
//!
//! ## Rule Order
//! | # | Entry condition (case-insensitive)               | Result |
//! |---|--------------------------------------------------|--------|
//! | 1 | name starts with `xl/`                           | XLSX   |
//! | 2 | name starts with `ppt/`                          | PPTX   |
//! | 3 | name is `[Content_Types].xml` or starts `word/`  | DOCX   |
//! | 4 | name is `META-INF/MANIFEST.MF`                   | JAR    |
//!
//! The first rule satisfied by any entry wins. Rules 1, 2 and 4 extend the
//! DOCX-only check: a package carrying `[Content_Types].xml` together with
//! `xl/` or `ppt/` parts reports XLSX or PPTX instead of DOCX.

use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::common::magic::FileMatch;

/// Substring that marks an extension as ZIP-family (case-sensitive)
pub const ZIP_FAMILY_MARKER: &str = "ZIP";

pub const CONTENT_TYPES_ENTRY: &str = "[Content_Types].xml";
pub const JAR_MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

// =============================================================================
// Rules
// =============================================================================

/// One entry-name rule of the refinement table
pub struct ContainerRule {
    pub description: &'static str,
    pub extension: &'static str,
    matches: fn(&str) -> bool,
}

impl ContainerRule {
    pub fn matches(&self, entry_name: &str) -> bool {
        (self.matches)(entry_name)
    }

    fn to_match(&self, outer: &FileMatch) -> FileMatch {
        FileMatch {
            description: self.description.to_string(),
            extension: self.extension.to_string(),
            signature: outer.signature.clone(),
            offset: outer.offset,
        }
    }
}

/// ASCII case-insensitive `starts_with`
fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.len() >= prefix.len()
        && name.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

fn is_spreadsheet_entry(name: &str) -> bool {
    starts_with_ignore_case(name, "xl/")
}

fn is_presentation_entry(name: &str) -> bool {
    starts_with_ignore_case(name, "ppt/")
}

fn is_document_entry(name: &str) -> bool {
    name.eq_ignore_ascii_case(CONTENT_TYPES_ENTRY) || starts_with_ignore_case(name, "word/")
}

fn is_jar_entry(name: &str) -> bool {
    name.eq_ignore_ascii_case(JAR_MANIFEST_ENTRY)
}

/// Refinement rules in evaluation order
///
/// Spreadsheet and presentation rules sit ahead of the document rule on
/// purpose, so `[Content_Types].xml` alone no longer forces DOCX for them.
pub static CONTAINER_RULES: &[ContainerRule] = &[
    ContainerRule {
        description: "Microsoft Office Open XML Format Spreadsheet",
        extension: "XLSX",
        matches: is_spreadsheet_entry,
    },
    ContainerRule {
        description: "Microsoft Office Open XML Format Presentation",
        extension: "PPTX",
        matches: is_presentation_entry,
    },
    ContainerRule {
        description: "Microsoft Office Open XML Format Document",
        extension: "DOCX",
        matches: is_document_entry,
    },
    ContainerRule {
        description: "Java Archive",
        extension: "JAR",
        matches: is_jar_entry,
    },
];

/// Check if a matched extension belongs to the ZIP family
pub fn is_zip_family(extension: &str) -> bool {
    extension.contains(ZIP_FAMILY_MARKER)
}

/// Pick the first rule satisfied by any of `entry_names`
pub fn classify_entries<S: AsRef<str>>(entry_names: &[S]) -> Option<&'static ContainerRule> {
    CONTAINER_RULES
        .iter()
        .find(|rule| entry_names.iter().any(|name| rule.matches(name.as_ref())))
}

// =============================================================================
// Refinement
// =============================================================================

/// Why a candidate was kept as-is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// Extension is not ZIP-family, nothing to inspect
    NotZipFamily,
    /// Archive listed fine but no rule applied
    NoRuleMatched,
    /// File could not be opened or read as an archive
    ArchiveUnreadable(String),
}

/// Result of container refinement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refinement {
    Reclassified(FileMatch),
    Unchanged { candidate: FileMatch, reason: Fallback },
}

impl Refinement {
    pub fn is_reclassified(&self) -> bool {
        matches!(self, Refinement::Reclassified(_))
    }

    pub fn into_match(self) -> FileMatch {
        match self {
            Refinement::Reclassified(m) => m,
            Refinement::Unchanged { candidate, .. } => candidate,
        }
    }
}

/// List entry names from the central directory
pub fn list_entries<R: Read + Seek>(reader: R) -> Result<Vec<String>, ::zip::result::ZipError> {
    let archive = ::zip::ZipArchive::new(reader)?;
    Ok(archive.file_names().map(str::to_string).collect())
}

/// Refine a ZIP-family match from any seekable source
pub fn refine_reader<R: Read + Seek>(reader: R, candidate: FileMatch) -> Refinement {
    if !is_zip_family(&candidate.extension) {
        return Refinement::Unchanged { candidate, reason: Fallback::NotZipFamily };
    }

    let names = match list_entries(reader) {
        Ok(names) => names,
        Err(e) => {
            debug!(error = %e, "Not readable as ZIP, keeping outer match");
            return Refinement::Unchanged {
                candidate,
                reason: Fallback::ArchiveUnreadable(e.to_string()),
            };
        }
    };

    match classify_entries(&names) {
        Some(rule) => {
            debug!(
                entries = names.len(),
                from = %candidate.extension,
                to = rule.extension,
                "Container reclassified"
            );
            Refinement::Reclassified(rule.to_match(&candidate))
        }
        None => Refinement::Unchanged { candidate, reason: Fallback::NoRuleMatched },
    }
}

/// Refine a ZIP-family match by opening `path` as an archive
///
/// Never fails: open errors fall back to the outer match.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn refine(path: &Path, candidate: FileMatch) -> Refinement {
    if !is_zip_family(&candidate.extension) {
        return Refinement::Unchanged { candidate, reason: Fallback::NotZipFamily };
    }

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            if e.kind() == io::ErrorKind::PermissionDenied {
                warn!(error = %e, "Access denied opening archive, keeping outer match");
            } else {
                debug!(error = %e, "Failed to open archive, keeping outer match");
            }
            return Refinement::Unchanged {
                candidate,
                reason: Fallback::ArchiveUnreadable(format!("Failed to open ZIP: {e}")),
            };
        }
    };

    refine_reader(file, candidate)
}
