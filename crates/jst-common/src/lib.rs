//! Common types and utilities for the jst type lattice.
//!
//! This crate provides foundational types used across all jst crates:
//! - String interning (`Atom`, `Interner`)
//! - Source locations (`SourceLocation`)
//! - Diagnostics and the `ErrorReporter` collaborator
//! - Centralized limits and thresholds

// String interning for property names and type names
pub mod interner;
pub use interner::{Atom, Interner};

// Line/column source locations
pub mod position;
pub use position::SourceLocation;

// Diagnostics reported by the resolution pass
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticCollector, ErrorReporter, TracingReporter,
    diagnostic_codes, diagnostic_messages, format_message,
};

// Centralized limits and thresholds
pub mod limits;
