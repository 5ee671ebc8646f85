//! Console report formatting
//!
//! Renders an `Identification` either as the human-readable result line(s)
//! or as a JSON document.

use crate::common::magic::MatchResult;
use crate::error::Result;
use crate::identify::Identification;

pub const NO_MATCH_LINE: &str = "No matching file signature found.";

/// Human-readable result
///
/// One line for a match; for no match, the notice followed by the hex of the
/// whole probe window.
pub fn render_text(identification: &Identification) -> String {
    match &identification.result {
        MatchResult::Match(m) => format!(
            "The file signature {} matches the file {} with description '{}' and extension '{}'",
            m.signature,
            identification.path.display(),
            m.description,
            m.extension
        ),
        MatchResult::NoMatch => format!(
            "{}\nFile signature: {}",
            NO_MATCH_LINE,
            identification.probe.to_hex()
        ),
    }
}

/// Pretty-printed JSON result
pub fn render_json(identification: &Identification) -> Result<String> {
    Ok(serde_json::to_string_pretty(identification)?)
}
