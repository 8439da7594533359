//! Statement-scoped rule overlays written as comments.
//!
//! ```text
//! // ExceptionAdjustment: -T:N.CustomError
//! Helper.Run();
//! ```
//!
//! The rule applies only while analyzing the statement that follows. The
//! target id may be omitted, in which case the rule applies to every
//! reference in the statement.

use crate::rule_set::{AdjustmentRule, RuleKind};
use crate::syntax::{RuleSyntaxError, parse_rule_line};
use std::sync::Arc;
use throwdoc_common::{Accessor, Span};

pub const INLINE_PREFIX: &str = "ExceptionAdjustment:";

/// A parsed inline overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineRule {
    /// `None` applies to every reference in the statement.
    pub target: Option<String>,
    pub accessor: Accessor,
    pub kind: RuleKind,
    pub error_type: String,
    pub error_span: Span,
}

impl InlineRule {
    pub fn applies_to(&self, target_doc_id: &str) -> bool {
        self.target.as_deref().is_none_or(|target| target == target_doc_id)
    }

    /// View as an ordinary rule for `target`.
    pub fn to_rule(&self, target: &str, origin: &Arc<str>) -> AdjustmentRule {
        AdjustmentRule {
            target: target.to_string(),
            accessor: self.accessor,
            flag: None,
            kind: self.kind,
            error_type: self.error_type.clone(),
            origin: Arc::clone(origin),
            target_span: Span::dummy(),
            error_span: self.error_span,
        }
    }
}

/// Parse a comment's text (without `//`).
///
/// Returns `None` when the comment is not an overlay, `Some(Err)` when it
/// is one but malformed. `comment_start` is the offset of the comment text.
pub fn parse_inline_comment(
    text: &str,
    comment_start: u32,
) -> Option<Result<InlineRule, RuleSyntaxError>> {
    let trimmed = text.trim_start();
    let rest = trimmed.strip_prefix(INLINE_PREFIX)?;
    let base = comment_start + (text.len() - rest.len()) as u32;
    let parsed = match parse_rule_line(rest, base, 1, true) {
        Ok(Some(parsed)) => parsed,
        // An overlay with nothing after the prefix is not an error.
        Ok(None) => return None,
        Err(error) => return Some(Err(error)),
    };
    if parsed.flag.is_some() {
        // Flags only make sense in rule files.
        return None;
    }
    Some(Ok(InlineRule {
        target: parsed.target,
        accessor: parsed.accessor,
        kind: parsed.kind,
        error_type: parsed.error_type,
        error_span: parsed.error_span,
    }))
}
