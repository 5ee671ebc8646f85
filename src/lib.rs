//! wtfile - identify files by their magic signatures
//!
//! The leading 64 bytes of a file are matched against an ordered signature
//! database (first match wins). ZIP-family matches are then refined by
//! looking at archive entry names, which separates OOXML documents and JARs
//! from plain ZIP files.

pub mod archive;
pub mod cli;
pub mod common;
pub mod database;
pub mod error;
pub mod identify;
pub mod logging;
pub mod report;

pub use common::{find_match, FileMatch, MatchResult, ProbeWindow, SignatureRecord, PROBE_WINDOW_LEN};
pub use database::{SignatureDatabase, SignatureSource};
pub use error::{Result, WtError};
pub use identify::{identify, identify_batch, Identification};
