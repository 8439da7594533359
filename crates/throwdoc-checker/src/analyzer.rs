//! Whole-program analysis.
//!
//! One run:
//!
//! 1. the prerequisite check (documentation comments must be retained);
//! 2. syntax and reference diagnostics of the project rules;
//! 3. flow verification of every top-level declaration and the consistency
//!    check of every override or implementation, in parallel.
//!
//! Findings are buffered per declaration and only committed once its walk
//! completes, so a cancelled run never reports a partial declaration.

use crate::adjustments::check_rule_references;
use crate::config::AnalyzerConfig;
use crate::consistency::{check_consistency, is_candidate};
use crate::context::AnalysisContext;
use crate::sink::{DeclarationReport, apply_severity};
use crate::walker::FlowWalker;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use throwdoc_common::{Diagnostic, Span, diagnostic_codes};
use throwdoc_model::{DeclId, DocumentationMode};
use tracing::{debug, info, info_span};

/// Cooperative cancellation signal, polled between declarations.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("analysis cancelled")]
pub struct Cancelled;

pub struct Analyzer {
    cx: AnalysisContext,
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(cx: AnalysisContext, config: AnalyzerConfig) -> Self {
        Self { cx, config }
    }

    #[inline]
    pub fn context(&self) -> &AnalysisContext {
        &self.cx
    }

    #[inline]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Declarations analyzed by a run, in id order.
    pub fn units(&self) -> Vec<DeclId> {
        let program = self.cx.program();
        let mut units = program.top_level_declarations();
        units.extend(program.ids().filter(|&id| is_candidate(program, id)));
        units.sort_unstable();
        units.dedup();
        units
    }

    /// Analyze the whole program on the current rayon pool.
    ///
    /// Diagnostics come back sorted by file, position and code.
    pub fn analyze(&self, cancel: &CancellationToken) -> Result<Vec<Diagnostic>, Cancelled> {
        let program = self.cx.program();
        if program.documentation_mode == DocumentationMode::None {
            info!("documentation comments not retained, nothing to verify");
            let diagnostic = Diagnostic::new(
                diagnostic_codes::DOCUMENTATION_NOT_RETAINED,
                "",
                Span::dummy(),
                &[],
            );
            return Ok(vec![apply_severity(diagnostic, &self.config)]);
        }

        let units = self.units();
        let _span = info_span!("analyze", declarations = units.len()).entered();

        let mut diagnostics = self.rule_diagnostics();
        let per_declaration: Vec<Vec<Diagnostic>> = units
            .par_iter()
            .map(|&decl| {
                if cancel.is_cancelled() {
                    return Err(Cancelled);
                }
                let report = self.analyze_declaration(decl);
                Ok(report.into_diagnostics(program, &self.config))
            })
            .collect::<Result<_, _>>()?;
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }

        diagnostics.extend(per_declaration.into_iter().flatten());
        sort_diagnostics(&mut diagnostics);
        debug!(diagnostics = diagnostics.len(), "analysis complete");
        Ok(diagnostics)
    }

    /// Everything reported for one declaration.
    pub fn analyze_declaration(&self, decl: DeclId) -> DeclarationReport {
        let program = self.cx.program();
        let mut report = DeclarationReport::default();
        FlowWalker::new(&self.cx, &mut report).analyze(decl);
        if is_candidate(program, decl) {
            check_consistency(self.cx.resolver(), decl, &mut report);
        }
        report
    }

    /// Syntax errors and dangling references of the project rules.
    ///
    /// The built-in table is not checked: it names types of libraries the
    /// program may not reference.
    pub fn rule_diagnostics(&self) -> Vec<Diagnostic> {
        let project = self.cx.rules().project();
        project
            .syntax_diagnostics()
            .into_iter()
            .chain(check_rule_references(self.cx.program(), project))
            .map(|diagnostic| apply_severity(diagnostic, &self.config))
            .collect()
    }
}

pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        (&a.file, a.start, a.code, &a.message_text)
            .cmp(&(&b.file, b.start, b.code, &b.message_text))
    });
}
