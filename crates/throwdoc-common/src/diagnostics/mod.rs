//! Diagnostic types and message lookup.
//!
//! Message data lives in `data.rs`. Every diagnostic carries a structured
//! property bag so that tooling can rewrite documentation without
//! re-parsing the message text.

use serde::Serialize;
use std::collections::BTreeMap;

mod data;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes, diagnostic_messages};

use crate::Span;

// =============================================================================
// Property keys
// =============================================================================

/// Keys used in [`Diagnostic::properties`].
pub mod property_keys {
    /// Stable id of the declaration whose documentation is incomplete.
    pub const TARGET: &str = "target";
    /// Accessor of the target, when the finding is accessor-scoped.
    pub const ACCESSOR: &str = "accessor";
    /// Comma-joined stable ids of the offending exception types.
    pub const EXCEPTIONS: &str = "exceptions";
    /// Stable id of the declaration referenced at the proximate call site.
    pub const SOURCE: &str = "source";
    /// Accessor invoked at the proximate call site.
    pub const SOURCE_ACCESSOR: &str = "source_accessor";
}

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DiagnosticCategory {
    Error = 0,
    Warning = 1,
    Info = 2,
    /// Reported to tooling but not shown by default.
    Hidden = 3,
}

impl DiagnosticCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Hidden => "hidden",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            "hidden" | "none" => Some(Self::Hidden),
            _ => None,
        }
    }
}

/// Related information for a diagnostic (e.g. the call site that propagates).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

/// A diagnostic with structured metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a diagnostic for `code`, formatting its message template with `args`.
    ///
    /// The category is the table default for the code; unknown codes are
    /// reported as errors with the arguments joined as the message.
    #[must_use]
    pub fn new(code: u32, file: impl Into<String>, span: Span, args: &[&str]) -> Self {
        let (category, message_text) = match get_diagnostic_message(code) {
            Some(message) => (message.category, format_message(message.message, args)),
            None => (DiagnosticCategory::Error, args.join(" ")),
        };
        Self {
            file: file.into(),
            start: span.start,
            length: span.len(),
            message_text,
            category,
            code,
            properties: BTreeMap::new(),
            related_information: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: DiagnosticCategory) -> Self {
        self.category = category;
        self
    }

    /// Attach a structured property. Empty values are not recorded.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.properties.insert(key.to_string(), value);
        }
        self
    }

    /// Add related information to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, file: impl Into<String>, span: Span, message: String) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file: file.into(),
            start: span.start,
            length: span.len(),
            message_text: message,
        });
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Short identifier such as `THROW001`.
    pub fn id(&self) -> &'static str {
        get_diagnostic_message(self.code).map_or("THROW000", |m| m.id)
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub id: &'static str,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Look up a diagnostic code by its short identifier (`THROW001`).
#[must_use]
pub fn code_for_id(id: &str) -> Option<u32> {
    DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.id.eq_ignore_ascii_case(id))
        .map(|m| m.code)
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
