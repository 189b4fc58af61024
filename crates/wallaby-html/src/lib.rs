//! Permissive HTML scanner and tree builder for the Wallaby renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tag Scanner** - locates markup delimiters, classifies them (comment,
//!   declaration, start/end tag) and extracts tag names plus attributes
//! - **Tree Builder** - single-pass construction of a [`wallaby_dom::DomTree`]
//!   with browser-like recovery on malformed input
//!
//! Parsing never fails: unterminated tags and comments, mismatched closings
//! and missing quotes all degrade the resulting tree instead of producing an
//! error. Whitespace-only text runs are kept; whether they are significant is
//! a layout decision, not a parsing one.
//!
//! # Not Implemented
//!
//! - Full tree-construction conformance (insertion modes, foster parenting,
//!   the adoption agency algorithm)
//! - Script data states
//! - Character-set decoding (input is an already decoded `&str`)

/// Tree construction from scanned tags.
pub mod parser;
/// Tag scanning, attribute extraction and entity decoding.
pub mod scanner;

pub use parser::{DocumentParser, MarkupKind, ParseIssue, parse_document, print_tree};
pub use scanner::{ScannedTag, TagScanner, TagToken, is_void_tag};
