//! Container disambiguation
//!
//! Several real formats share a generic outer signature. This module holds
//! the second-stage checks that look inside such containers.
//!
//! ## Module Structure
//! ```text
//! archive/
//! ├── mod.rs  - Re-exports
//! └── zip.rs  - ZIP entry-name rules (OOXML, JAR)
//! ```

pub mod zip;

// Re-exports for convenience
pub use self::zip::{
    classify_entries, is_zip_family, refine, refine_reader, ContainerRule, Fallback, Refinement,
    CONTAINER_RULES,
};
