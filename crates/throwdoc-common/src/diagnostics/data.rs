//! Diagnostic message table.

use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const UNDOCUMENTED_EXCEPTION: u32 = 9001;
    pub const UNDOCUMENTED_EXCEPTION_DELEGATE_CREATION: u32 = 9002;
    pub const INCONSISTENT_OVERRIDE_EXCEPTION: u32 = 9003;
    pub const ADJUSTMENT_SYNTAX_ERROR: u32 = 9004;
    pub const ADJUSTMENT_TARGET_UNRESOLVED: u32 = 9005;
    pub const ADJUSTMENT_EXCEPTION_UNRESOLVED: u32 = 9006;
    pub const DOCUMENTATION_NOT_RETAINED: u32 = 9007;
}

pub mod diagnostic_messages {
    pub const UNDOCUMENTED_EXCEPTION: &str =
        "Exception '{0}' may propagate out of '{1}' but is not documented.";
    pub const UNDOCUMENTED_EXCEPTION_DELEGATE_CREATION: &str =
        "Exception '{0}' may propagate through delegate creation in '{1}' but is not documented.";
    pub const INCONSISTENT_OVERRIDE_EXCEPTION: &str =
        "'{0}' documents exception '{1}' which is not documented by '{2}'.";
    pub const ADJUSTMENT_SYNTAX_ERROR: &str = "Syntax error in exception adjustment: {0}.";
    pub const ADJUSTMENT_TARGET_UNRESOLVED: &str =
        "Exception adjustment target '{0}' could not be resolved.";
    pub const ADJUSTMENT_EXCEPTION_UNRESOLVED: &str =
        "Exception adjustment exception type '{0}' could not be resolved.";
    pub const DOCUMENTATION_NOT_RETAINED: &str =
        "Documentation comments are not retained; exception documentation cannot be verified.";
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::UNDOCUMENTED_EXCEPTION,
        id: "THROW001",
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::UNDOCUMENTED_EXCEPTION,
    },
    DiagnosticMessage {
        code: diagnostic_codes::UNDOCUMENTED_EXCEPTION_DELEGATE_CREATION,
        id: "THROW002",
        category: DiagnosticCategory::Hidden,
        message: diagnostic_messages::UNDOCUMENTED_EXCEPTION_DELEGATE_CREATION,
    },
    DiagnosticMessage {
        code: diagnostic_codes::INCONSISTENT_OVERRIDE_EXCEPTION,
        id: "THROW003",
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::INCONSISTENT_OVERRIDE_EXCEPTION,
    },
    DiagnosticMessage {
        code: diagnostic_codes::ADJUSTMENT_SYNTAX_ERROR,
        id: "THROW004",
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::ADJUSTMENT_SYNTAX_ERROR,
    },
    DiagnosticMessage {
        code: diagnostic_codes::ADJUSTMENT_TARGET_UNRESOLVED,
        id: "THROW005",
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::ADJUSTMENT_TARGET_UNRESOLVED,
    },
    DiagnosticMessage {
        code: diagnostic_codes::ADJUSTMENT_EXCEPTION_UNRESOLVED,
        id: "THROW006",
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::ADJUSTMENT_EXCEPTION_UNRESOLVED,
    },
    DiagnosticMessage {
        code: diagnostic_codes::DOCUMENTATION_NOT_RETAINED,
        id: "THROW007",
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::DOCUMENTATION_NOT_RETAINED,
    },
];
