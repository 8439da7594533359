//! Application of adjustment rules to contracts.

use crate::error_set::ErrorKindSet;
use throwdoc_common::diagnostics::diagnostic_codes;
use throwdoc_common::{Diagnostic, Span};
use throwdoc_model::{DeclId, Program};
use throwdoc_rules::{AdjustmentRule, RuleKind, RuleSet, THROWER_FLAG};

/// The built-in rule table and the project's rules, applied in that order.
#[derive(Debug, Default)]
pub struct RuleSources {
    builtin: RuleSet,
    project: RuleSet,
}

impl RuleSources {
    pub fn new(builtin: RuleSet, project: RuleSet) -> Self {
        Self { builtin, project }
    }

    /// Project rules only, without the built-in table.
    pub fn project_only(project: RuleSet) -> Self {
        Self::new(RuleSet::new(), project)
    }

    pub fn builtin(&self) -> &RuleSet {
        &self.builtin
    }

    pub fn project(&self) -> &RuleSet {
        &self.project
    }

    /// Passes in application order.
    pub fn passes(&self) -> [&RuleSet; 2] {
        [&self.builtin, &self.project]
    }

    pub fn has_rules_for(&self, doc_id: &str) -> bool {
        self.passes().iter().any(|rules| rules.has_rules_for(doc_id))
    }

    /// Forced (`Some(true)`) or forbidden (`Some(false)`) throw-helper
    /// status from `$thrower` rules. The newest rule wins, project rules
    /// over built-in ones.
    pub fn thrower_override(&self, doc_id: &str) -> Option<bool> {
        self.passes()
            .iter()
            .rev()
            .find_map(|rules| rules.flagged_for(doc_id, THROWER_FLAG).last())
            .map(|rule| rule.kind == RuleKind::Add)
    }
}

/// Apply `rules` to the contract `set` of `decl`.
///
/// All removals are applied before any addition, so within one pass an
/// addition always wins over a conflicting removal. With
/// `expand_unspecified`, a rule without accessor on a member that declares
/// both sides of an accessor pair applies to each side. Removing an entry
/// without accessor from such a member also removes its per-side entries.
/// Rules whose exception type does not resolve are skipped.
pub fn apply_to(
    program: &Program,
    set: &mut ErrorKindSet,
    rules: &[AdjustmentRule],
    decl: DeclId,
    expand_unspecified: bool,
) {
    if rules.is_empty() {
        return;
    }
    let sides = if program.decl(decl).kind.has_accessors() {
        program.accessor_shape(decl).both_sides()
    } else {
        None
    };

    for rule in rules.iter().filter(|rule| rule.kind == RuleKind::Remove) {
        let Some(ty) = program.resolve_doc_id(&rule.error_type) else {
            continue;
        };
        set.remove(ty, rule.accessor);
        if rule.accessor.is_none()
            && let Some(sides) = sides
        {
            for side in sides {
                set.remove(ty, side);
            }
        }
    }

    for rule in rules.iter().filter(|rule| rule.kind == RuleKind::Add) {
        let Some(ty) = program.resolve_doc_id(&rule.error_type) else {
            continue;
        };
        match sides {
            Some(sides) if expand_unspecified && rule.accessor.is_none() => {
                for side in sides {
                    set.add_type(ty, side);
                }
            }
            _ => {
                set.add_type(ty, rule.accessor);
            }
        }
    }
}

/// Warnings for rules whose target or exception type does not resolve.
pub fn check_rule_references(program: &Program, rules: &RuleSet) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for rule in rules.iter() {
        if program.resolve_doc_id(&rule.target).is_none() {
            diagnostics.push(unresolved(
                diagnostic_codes::ADJUSTMENT_TARGET_UNRESOLVED,
                rule,
                &rule.target,
                rule.target_span,
            ));
        }
        if program.resolve_doc_id(&rule.error_type).is_none() {
            diagnostics.push(unresolved(
                diagnostic_codes::ADJUSTMENT_EXCEPTION_UNRESOLVED,
                rule,
                &rule.error_type,
                rule.error_span,
            ));
        }
    }
    diagnostics
}

fn unresolved(code: u32, rule: &AdjustmentRule, id: &str, span: Span) -> Diagnostic {
    Diagnostic::new(code, &*rule.origin, span, &[id])
}

#[cfg(test)]
#[path = "tests/adjustments_tests.rs"]
mod tests;
