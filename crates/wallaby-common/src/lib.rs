//! Common utilities for the Wallaby renderer.
//!
//! This crate provides shared infrastructure used by all renderer components:
//! - **Warning System** - colored terminal output for recoverable anomalies

pub mod warning;
