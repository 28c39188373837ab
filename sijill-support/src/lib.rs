//! # Sijill Support
//!
//! Shared utilities for the Sijill registry crates.
//!
//! This crate provides:
//! - Text rendering for error messages ("did you mean?", candidate chains)
//! - Attribute name mangling for setter discovery
//! - A `tracing` subscriber bootstrap for binaries and tests

pub mod logging;
pub mod naming;
pub mod rendering;
