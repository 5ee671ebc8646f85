//! Signature database loading
//!
//! Reads the JSON signature list (`{"filesigs": [...]}`) and turns it into
//! validated, ordered `SignatureRecord`s. Each entry carries:
//! - `Header (hex)`: pattern, spaces optional, any case
//! - `Header offset`: byte offset as a string (numbers accepted too)
//! - `File description`
//! - `File extension`
//!
//! Bad entries are dropped one at a time; they never fail the whole load.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, trace, warn};

use crate::common::hex::parse_hex_string;
use crate::common::magic::SignatureRecord;
use crate::error::{Result, WtError};

/// Environment variable naming a signature database file
pub const SIGNATURES_ENV: &str = "WTFILE_SIGNATURES";

/// File name looked up under the user config directory
pub const DATABASE_FILE_NAME: &str = "file_sigs.json";

/// Application directory under the user config directory
pub const APP_DIR_NAME: &str = "wtfile";

static EMBEDDED_DATABASE: &str = include_str!("../resources/file_sigs.json");

// ============================================================================
// Raw Entries
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawDatabase {
    filesigs: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawSignature {
    #[serde(rename = "Header (hex)")]
    header: Option<String>,
    #[serde(rename = "Header offset")]
    offset: Option<RawOffset>,
    #[serde(rename = "File description")]
    description: Option<String>,
    #[serde(rename = "File extension")]
    extension: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOffset {
    Number(u64),
    Text(String),
    Other(IgnoredAny),
}

impl RawOffset {
    fn parse(&self) -> Option<usize> {
        match self {
            RawOffset::Number(n) => usize::try_from(*n).ok(),
            RawOffset::Text(s) => s.trim().parse().ok(),
            RawOffset::Other(_) => None,
        }
    }
}

/// Resolve an offset field; missing or unparsable values become 0
fn offset_or_zero(index: usize, raw: Option<&RawOffset>) -> usize {
    match raw.map(|r| (r, r.parse())) {
        Some((_, Some(offset))) => offset,
        Some((r, None)) => {
            debug!(index, raw = ?r, "Unparsable header offset, using 0");
            0
        }
        None => 0,
    }
}

fn validate(index: usize, value: Value) -> std::result::Result<SignatureRecord, String> {
    let raw: RawSignature =
        serde_json::from_value(value).map_err(|e| format!("unexpected field type: {e}"))?;

    let header = raw.header.ok_or("missing header")?;
    let description = raw.description.ok_or("missing description")?;
    let extension = raw.extension.ok_or("missing extension")?;

    let pattern = parse_hex_string(&header)?;
    if pattern.is_empty() {
        return Err("empty header".to_string());
    }

    Ok(SignatureRecord {
        pattern,
        offset: offset_or_zero(index, raw.offset.as_ref()),
        description,
        extension,
    })
}

// ============================================================================
// Database
// ============================================================================

/// Ordered, validated signature collection
#[derive(Debug, Clone, Default)]
pub struct SignatureDatabase {
    records: Vec<SignatureRecord>,
    skipped: usize,
}

impl SignatureDatabase {
    /// Parse a JSON document, keeping database order
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawDatabase = serde_json::from_str(json)?;

        let mut records = Vec::with_capacity(raw.filesigs.len());
        let mut skipped = 0;
        for (index, value) in raw.filesigs.into_iter().enumerate() {
            match validate(index, value) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    trace!(index, reason = %reason, "Skipping signature entry");
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, loaded = records.len(), "Skipped malformed signature entries");
        }

        Ok(Self { records, skipped })
    }

    /// Load a database file from disk
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| WtError::Database {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let db = Self::from_json_str(&json)?;
        info!(records = db.len(), "Signature database loaded");
        Ok(db)
    }

    /// Database compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_DATABASE)
    }

    /// Load from a resolved source
    pub fn open(source: &SignatureSource) -> Result<Self> {
        match source {
            SignatureSource::File(path) => Self::load(path),
            SignatureSource::Embedded => Self::embedded(),
        }
    }

    pub fn records(&self) -> &[SignatureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of entries dropped during validation
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

// ============================================================================
// Location
// ============================================================================

/// Where the signature database comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureSource {
    File(PathBuf),
    Embedded,
}

impl SignatureSource {
    /// Resolve using the process environment and the user config directory
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        let from_env = env::var_os(SIGNATURES_ENV).map(PathBuf::from);
        Self::resolve_with(explicit, from_env, dirs::config_dir())
    }

    /// Precedence: explicit path, then environment, then
    /// `<config_dir>/wtfile/file_sigs.json` if it exists, then embedded.
    pub fn resolve_with(
        explicit: Option<PathBuf>,
        from_env: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> Self {
        let non_empty = |p: &PathBuf| !p.as_os_str().is_empty();

        if let Some(path) = explicit.filter(non_empty) {
            return SignatureSource::File(path);
        }
        if let Some(path) = from_env.filter(non_empty) {
            return SignatureSource::File(path);
        }
        if let Some(path) = config_dir
            .map(|dir| dir.join(APP_DIR_NAME).join(DATABASE_FILE_NAME))
            .filter(|p| p.is_file())
        {
            return SignatureSource::File(path);
        }
        SignatureSource::Embedded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::magic::find_match;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_entry() {
        let db = SignatureDatabase::from_json_str(
            r#"{"filesigs":[{"Header (hex)":"25 50 44 46","Header offset":"0","File description":"PDF document","File extension":"PDF"}]}"#,
        )
        .unwrap();
        assert_eq!(db.len(), 1);
        let rec = &db.records()[0];
        assert_eq!(rec.pattern, vec![0x25, 0x50, 0x44, 0x46]);
        assert_eq!(rec.offset, 0);
        assert_eq!(rec.description, "PDF document");
        assert_eq!(rec.extension, "PDF");
    }

    #[test]
    fn test_pattern_case_and_spacing_normalised() {
        let db = SignatureDatabase::from_json_str(
            r#"{"filesigs":[
                {"Header (hex)":"504b0304","Header offset":"0","File description":"a","File extension":"ZIP"},
                {"Header (hex)":"50 4B 03 04","Header offset":"0","File description":"b","File extension":"ZIP"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(db.records()[0].pattern, db.records()[1].pattern);
    }

    #[test]
    fn test_offset_forms() {
        let db = SignatureDatabase::from_json_str(
            r#"{"filesigs":[
                {"Header (hex)":"AA","Header offset":" 8 ","File description":"text","File extension":"X"},
                {"Header (hex)":"AA","Header offset":4,"File description":"number","File extension":"X"},
                {"Header (hex)":"AA","Header offset":"n/a","File description":"garbage","File extension":"X"},
                {"Header (hex)":"AA","Header offset":"-3","File description":"negative","File extension":"X"},
                {"Header (hex)":"AA","File description":"missing","File extension":"X"},
                {"Header (hex)":"AA","Header offset":null,"File description":"null","File extension":"X"},
                {"Header (hex)":"AA","Header offset":-3,"File description":"negative number","File extension":"X"},
                {"Header (hex)":"AA","Header offset":[1, 2],"File description":"array","File extension":"X"}
            ]}"#,
        )
        .unwrap();
        let offsets: Vec<_> = db.records().iter().map(|r| r.offset).collect();
        assert_eq!(offsets, vec![8, 4, 0, 0, 0, 0, 0, 0]);
        assert_eq!(db.skipped(), 0);
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let db = SignatureDatabase::from_json_str(
            r#"{"filesigs":[
                {"Header offset":"0","File description":"no header","File extension":"X"},
                {"Header (hex)":"","Header offset":"0","File description":"empty","File extension":"X"},
                {"Header (hex)":"ABC","Header offset":"0","File description":"odd","File extension":"X"},
                {"Header (hex)":"ZZ","Header offset":"0","File description":"not hex","File extension":"X"},
                {"Header (hex)":"AB","Header offset":"0","File extension":"X"},
                {"Header (hex)":"AB","Header offset":"0","File description":"no ext"},
                {"Header (hex)":12,"Header offset":"0","File description":"wrong type","File extension":"X"},
                "not an object",
                {"Header (hex)":"25504446","Header offset":"0","File description":"PDF document","File extension":"PDF"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(db.len(), 1);
        assert_eq!(db.skipped(), 8);
        assert_eq!(db.records()[0].extension, "PDF");
    }

    #[test]
    fn test_missing_root_is_error() {
        assert!(matches!(
            SignatureDatabase::from_json_str(r#"{"signatures":[]}"#),
            Err(WtError::Json(_))
        ));
        assert!(SignatureDatabase::from_json_str("not json").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            br#"{"filesigs":[{"Header (hex)":"7F 45 4C 46","Header offset":"0","File description":"ELF","File extension":"ELF"}]}"#,
        )
        .unwrap();
        let db = SignatureDatabase::load(temp.path()).unwrap();
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none.json");
        match SignatureDatabase::load(&missing) {
            Err(err @ WtError::Database { .. }) => {
                assert!(err.to_string().starts_with("Failed to load signature database"));
                assert!(err.to_string().contains("none.json"));
            }
            other => panic!("expected Database error, got {other:?}"),
        }
    }

    #[test]
    fn test_embedded_database_is_clean() {
        let db = SignatureDatabase::embedded().unwrap();
        assert!(db.len() > 30);
        assert_eq!(db.skipped(), 0);
    }

    #[test]
    fn test_embedded_round_trip() {
        // A sample carrying exactly one record's pattern must resolve to that record
        let db = SignatureDatabase::embedded().unwrap();
        let mut checked = 0;
        for record in db.records() {
            let end = record.offset + record.pattern.len();
            if end > 64 {
                continue;
            }
            let mut sample = [0xAAu8; 64];
            sample[record.offset..end].copy_from_slice(&record.pattern);

            let found = find_match(&sample, db.records());
            let m = found.as_match().unwrap_or_else(|| panic!("no match for {}", record.description));
            assert_eq!(m.description, record.description);
            assert_eq!(m.extension, record.extension);
            checked += 1;
        }
        assert!(checked > 30);
    }

    #[test]
    fn test_resolve_precedence() {
        let explicit = PathBuf::from("/explicit.json");
        let env_path = PathBuf::from("/env.json");

        assert_eq!(
            SignatureSource::resolve_with(Some(explicit.clone()), Some(env_path.clone()), None),
            SignatureSource::File(explicit)
        );
        assert_eq!(
            SignatureSource::resolve_with(None, Some(env_path.clone()), None),
            SignatureSource::File(env_path)
        );
        assert_eq!(
            SignatureSource::resolve_with(Some(PathBuf::new()), None, None),
            SignatureSource::Embedded
        );
    }

    #[test]
    fn test_resolve_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            SignatureSource::resolve_with(None, None, Some(dir.path().to_path_buf())),
            SignatureSource::Embedded
        );

        let app_dir = dir.path().join(APP_DIR_NAME);
        fs::create_dir_all(&app_dir).unwrap();
        fs::write(app_dir.join(DATABASE_FILE_NAME), r#"{"filesigs":[]}"#).unwrap();
        assert_eq!(
            SignatureSource::resolve_with(None, None, Some(dir.path().to_path_buf())),
            SignatureSource::File(app_dir.join(DATABASE_FILE_NAME))
        );
    }
}
