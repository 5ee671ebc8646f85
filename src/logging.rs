//! Logging and tracing configuration for wtfile
//!
//! Structured logging through the `tracing` crate. Logs go to stderr so the
//! result line on stdout stays machine-readable.
//!
//! # Log Levels
//!
//! - `warn`  - Skipped database entries, access problems during refinement
//! - `info`  - Database loaded
//! - `debug` - Pipeline decisions (refinement fallbacks, reclassification)
//! - `trace` - Per-record matching and validation detail
//!
//! # Environment Variable Control
//!
//! ```bash
//! RUST_LOG=debug wtfile report.docx
//! RUST_LOG=wtfile::database=trace wtfile report.docx
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging/tracing system
///
/// Call this once at startup (in main.rs)
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Default: debug in debug builds, quiet in release
        if cfg!(debug_assertions) {
            EnvFilter::new("wtfile=debug")
        } else {
            EnvFilter::new("wtfile=warn")
        }
    });

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact(),
    );

    // Ignore error if already set
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Initialize logging with verbose output (file:line, thread IDs)
pub fn init_verbose() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .pretty(),
    );

    let _ = tracing::subscriber::set_global_default(subscriber);
}
