//! Tree construction module.
//!
//! Drives the tag scanner over the source and maintains the cursor into the
//! tree under construction.

/// Document parser implementation.
pub mod core;

pub use self::core::{DocumentParser, MarkupKind, ParseIssue, parse_document, print_tree};
