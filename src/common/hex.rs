//! Hex formatting and parsing helpers
//!
//! Signature patterns are stored as hex text in the database and the probe
//! window is reported as hex when nothing matches.

/// Format bytes as continuous hex string (no spaces)
pub fn format_hex_string(data: &[u8], uppercase: bool) -> String {
    if uppercase {
        hex::encode_upper(data)
    } else {
        hex::encode(data)
    }
}

/// Parse a hex pattern back to bytes
///
/// Whitespace anywhere in the text is ignored and digits may be in either
/// case, so `"50 4b 03 04"` and `"504B0304"` decode to the same bytes.
pub fn parse_hex_string(text: &str) -> Result<Vec<u8>, String> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();

    if compact.len() % 2 != 0 {
        return Err(format!("Hex string must have even length, got {}", compact.len()));
    }

    hex::decode(&compact).map_err(|e| format!("Invalid hex '{}': {}", compact, e))
}
