//! Findings and where they go.

use crate::config::AnalyzerConfig;
use smallvec::SmallVec;
use throwdoc_common::diagnostics::property_keys;
use throwdoc_common::{Accessor, Diagnostic, DiagnosticCategory, Span, diagnostic_codes};
use throwdoc_model::{DeclId, Program};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FindingKind {
    /// An exception may escape a declaration without being documented.
    Undocumented,
    /// An exception may escape through a delegate or closure created in a
    /// declaration.
    DelegateCreation,
    /// An override or implementation documents an exception its base does
    /// not.
    InconsistentOverride,
}

impl FindingKind {
    pub const fn code(self) -> u32 {
        match self {
            Self::Undocumented => diagnostic_codes::UNDOCUMENTED_EXCEPTION,
            Self::DelegateCreation => diagnostic_codes::UNDOCUMENTED_EXCEPTION_DELEGATE_CREATION,
            Self::InconsistentOverride => diagnostic_codes::INCONSISTENT_OVERRIDE_EXCEPTION,
        }
    }
}

/// One finding of the analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finding {
    pub kind: FindingKind,
    /// Declaration whose documentation is incomplete.
    pub target: DeclId,
    /// Accessor side of `target` the finding is scoped to.
    pub accessor: Accessor,
    pub exceptions: SmallVec<[DeclId; 2]>,
    /// Declaration referenced at the proximate site (callee, or the base
    /// declaration for inconsistent overrides).
    pub source: Option<DeclId>,
    pub source_accessor: Accessor,
    pub span: Span,
}

impl Finding {
    pub fn new(kind: FindingKind, target: DeclId, span: Span) -> Self {
        Self {
            kind,
            target,
            accessor: Accessor::None,
            exceptions: SmallVec::new(),
            source: None,
            source_accessor: Accessor::None,
            span,
        }
    }

    #[must_use]
    pub fn with_accessor(mut self, accessor: Accessor) -> Self {
        self.accessor = accessor;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: DeclId, accessor: Accessor) -> Self {
        self.source = Some(source);
        self.source_accessor = accessor;
        self
    }

    #[must_use]
    pub fn with_exceptions(mut self, exceptions: impl IntoIterator<Item = DeclId>) -> Self {
        self.exceptions.extend(exceptions);
        self
    }

    /// Render as a diagnostic with structured properties.
    pub fn to_diagnostic(&self, program: &Program) -> Diagnostic {
        let target = program.decl(self.target);
        let file = target.file.as_deref().unwrap_or_default();
        let mut target_name = program.display_name(self.target);
        if !self.accessor.is_none() {
            target_name = format!("{target_name}.{}", self.accessor);
        }
        let exception_names = self
            .exceptions
            .iter()
            .map(|&ty| program.display_name(ty))
            .collect::<Vec<_>>()
            .join(", ");
        let exception_ids = self
            .exceptions
            .iter()
            .map(|&ty| program.decl(ty).doc_id.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let diagnostic = match self.kind {
            FindingKind::Undocumented | FindingKind::DelegateCreation => Diagnostic::new(
                self.kind.code(),
                file,
                self.span,
                &[&exception_names, &target_name],
            ),
            FindingKind::InconsistentOverride => {
                let base = self
                    .source
                    .map(|base| program.display_name(base))
                    .unwrap_or_default();
                Diagnostic::new(
                    self.kind.code(),
                    file,
                    self.span,
                    &[&target_name, &exception_names, &base],
                )
            }
        };

        diagnostic
            .with_property(property_keys::TARGET, target.doc_id.as_str())
            .with_property(property_keys::ACCESSOR, self.accessor.as_str())
            .with_property(property_keys::EXCEPTIONS, exception_ids)
            .with_property(
                property_keys::SOURCE,
                self.source
                    .map(|source| program.decl(source).doc_id.clone())
                    .unwrap_or_default(),
            )
            .with_property(property_keys::SOURCE_ACCESSOR, self.source_accessor.as_str())
    }
}

/// Receives findings and auxiliary diagnostics during analysis.
pub trait FindingSink {
    fn report(&mut self, finding: Finding);

    /// Diagnostics about the analysis input itself (inline overlays).
    fn report_diagnostic(&mut self, diagnostic: Diagnostic);
}

/// Everything reported for one declaration, committed as a unit.
#[derive(Debug, Default)]
pub struct DeclarationReport {
    pub findings: Vec<Finding>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DeclarationReport {
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty() && self.diagnostics.is_empty()
    }

    /// Render findings and apply configured severities.
    pub fn into_diagnostics(self, program: &Program, config: &AnalyzerConfig) -> Vec<Diagnostic> {
        self.findings
            .iter()
            .map(|finding| finding.to_diagnostic(program))
            .chain(self.diagnostics)
            .map(|diagnostic| apply_severity(diagnostic, config))
            .collect()
    }
}

impl FindingSink for DeclarationReport {
    fn report(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    fn report_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Configured severity, then the delegate-creation visibility switch.
pub fn apply_severity(diagnostic: Diagnostic, config: &AnalyzerConfig) -> Diagnostic {
    if let Some(category) = config.severity_for(diagnostic.code) {
        return diagnostic.with_category(category);
    }
    if diagnostic.code == diagnostic_codes::UNDOCUMENTED_EXCEPTION_DELEGATE_CREATION
        && config.report_delegate_creation
    {
        return diagnostic.with_category(DiagnosticCategory::Info);
    }
    diagnostic
}

#[cfg(test)]
#[path = "tests/sink_tests.rs"]
mod tests;
