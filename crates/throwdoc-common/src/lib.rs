//! Common types and utilities for throwdoc.
//!
//! This crate provides foundational types used across all throwdoc crates:
//! - Accessor qualifiers (`Accessor`, `AccessorShape`)
//! - Source spans (`Span`)
//! - Diagnostics and the diagnostic message table
//! - Analysis limits and pool sizes

pub mod accessor;
pub use accessor::{Accessor, AccessorShape};

pub mod span;
pub use span::Span;

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, diagnostic_codes};

// Centralized limits and thresholds
pub mod limits;
