// Common utilities shared by the matcher and the pipeline

pub mod hex;
pub mod magic;
pub mod probe;

// Re-exports for convenience
pub use magic::{find_match, FileMatch, MatchResult, SignatureRecord};
pub use probe::{read_probe_window, ProbeWindow, PROBE_WINDOW_LEN};
