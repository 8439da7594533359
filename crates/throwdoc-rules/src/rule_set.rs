//! Parsed rules indexed by target id, and composition of rule sources.

use crate::syntax::{RuleSyntaxError, parse_rule_line};
use indexmap::IndexMap;
use std::sync::Arc;
use throwdoc_common::diagnostics::diagnostic_codes;
use throwdoc_common::{Accessor, Diagnostic, Span};
use tracing::warn;

/// Flag marking a rule that forces (`+`) or forbids (`-`) treating the
/// target as a throw-helper.
pub const THROWER_FLAG: &str = "thrower";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Add,
    Remove,
}

impl RuleKind {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Add => Self::Remove,
            Self::Remove => Self::Add,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Remove => '-',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjustmentRule {
    pub target: String,
    pub accessor: Accessor,
    pub flag: Option<String>,
    pub kind: RuleKind,
    pub error_type: String,
    /// Name of the source the rule was read from.
    pub origin: Arc<str>,
    pub target_span: Span,
    pub error_span: Span,
}

impl AdjustmentRule {
    /// Rules that would conflict when composed from different sources.
    fn same_subject(&self, other: &Self) -> bool {
        self.accessor == other.accessor
            && self.flag == other.flag
            && self.error_type == other.error_type
    }

    pub fn is_flagged(&self, flag: &str) -> bool {
        self.flag.as_deref() == Some(flag)
    }
}

/// Rules from one or more sources.
///
/// Unflagged rules feed contract resolution; flagged rules are a separate
/// pool consulted only by the policies that own the flag.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: IndexMap<String, Vec<AdjustmentRule>>,
    flagged: IndexMap<String, Vec<AdjustmentRule>>,
    errors: Vec<(Arc<str>, RuleSyntaxError)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse rule text. Malformed lines are recorded and skipped.
    pub fn parse(origin: &str, text: &str) -> Self {
        let origin: Arc<str> = Arc::from(origin);
        let mut set = Self::new();
        let mut offset = 0u32;
        for (index, line) in text.split_inclusive('\n').enumerate() {
            let line_number = index as u32 + 1;
            match parse_rule_line(line, offset, line_number, false) {
                Ok(Some(parsed)) => {
                    let rule = AdjustmentRule {
                        target: parsed.target.unwrap_or_default(),
                        accessor: parsed.accessor,
                        flag: parsed.flag,
                        kind: parsed.kind,
                        error_type: parsed.error_type,
                        origin: Arc::clone(&origin),
                        target_span: parsed.target_span,
                        error_span: parsed.error_span,
                    };
                    set.push(rule);
                }
                Ok(None) => {}
                Err(error) => {
                    warn!(
                        origin = %origin,
                        line = line_number,
                        %error,
                        "skipping malformed adjustment rule"
                    );
                    set.errors.push((Arc::clone(&origin), error));
                }
            }
            offset += line.len() as u32;
        }
        set
    }

    fn pool_mut(&mut self, rule: &AdjustmentRule) -> &mut Vec<AdjustmentRule> {
        let pool = if rule.flag.is_some() {
            &mut self.flagged
        } else {
            &mut self.rules
        };
        pool.entry(rule.target.clone()).or_default()
    }

    pub fn push(&mut self, rule: AdjustmentRule) {
        self.pool_mut(&rule).push(rule);
    }

    /// Compose `newer` on top of this set.
    ///
    /// A newer rule replaces older rules for the same target, accessor, flag
    /// and exception type only when their kinds are opposite; otherwise the
    /// rules accumulate in load order. Rules from the same source never
    /// replace each other.
    pub fn merge(&mut self, newer: RuleSet) {
        let RuleSet {
            rules,
            flagged,
            errors,
        } = newer;
        merge_pool(&mut self.rules, rules);
        merge_pool(&mut self.flagged, flagged);
        self.errors.extend(errors);
    }

    /// Compose sources in order (first loaded is oldest).
    pub fn compose(sources: impl IntoIterator<Item = RuleSet>) -> Self {
        let mut composed = Self::new();
        for source in sources {
            composed.merge(source);
        }
        composed
    }

    /// Unflagged rules for a target, in load order.
    pub fn rules_for(&self, target: &str) -> &[AdjustmentRule] {
        self.rules.get(target).map_or(&[], Vec::as_slice)
    }

    /// Flagged rules for a target carrying `flag`.
    pub fn flagged_for<'a>(
        &'a self,
        target: &str,
        flag: &'a str,
    ) -> impl Iterator<Item = &'a AdjustmentRule> + use<'a> {
        self.flagged
            .get(target)
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .filter(move |rule| rule.is_flagged(flag))
    }

    pub fn has_rules_for(&self, target: &str) -> bool {
        self.rules.get(target).is_some_and(|rules| !rules.is_empty())
    }

    /// All rules, unflagged then flagged.
    pub fn iter(&self) -> impl Iterator<Item = &AdjustmentRule> {
        self.rules.values().chain(self.flagged.values()).flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.flagged.is_empty()
    }

    pub fn syntax_errors(&self) -> impl Iterator<Item = (&str, &RuleSyntaxError)> {
        self.errors.iter().map(|(origin, error)| (&**origin, error))
    }

    /// Syntax errors as error diagnostics.
    pub fn syntax_diagnostics(&self) -> Vec<Diagnostic> {
        self.syntax_errors()
            .map(|(origin, error)| {
                let detail = error.kind.to_string();
                Diagnostic::new(
                    diagnostic_codes::ADJUSTMENT_SYNTAX_ERROR,
                    origin,
                    error.span,
                    &[detail.as_str()],
                )
            })
            .collect()
    }
}

fn merge_pool(
    older: &mut IndexMap<String, Vec<AdjustmentRule>>,
    newer: IndexMap<String, Vec<AdjustmentRule>>,
) {
    for (target, newer_rules) in newer {
        let list = older.entry(target).or_default();
        list.retain(|existing| {
            !newer_rules
                .iter()
                .any(|rule| existing.same_subject(rule) && existing.kind != rule.kind)
        });
        list.extend(newer_rules);
    }
}
