//! The built-in rule table, applied before any project rules.

use crate::rule_set::RuleSet;

/// Origin name reported for built-in rules.
pub const BUILTIN_ORIGIN: &str = "<builtin>/ExceptionAdjustments.txt";

const BUILTIN_TEXT: &str = include_str!("../data/ExceptionAdjustments.txt");

/// Parse the embedded rule table.
///
/// Callers own the result; construct it once per session and share it.
pub fn builtin_rules() -> RuleSet {
    RuleSet::parse(BUILTIN_ORIGIN, BUILTIN_TEXT)
}
