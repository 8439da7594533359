//! Throw-helper detection.
//!
//! A throw-helper exists to raise an exception on behalf of its caller, so
//! kinds that are normally intransitive (argument validation, invalid
//! operation) still propagate through a call to it.

use crate::adjustments::RuleSources;
use std::sync::Arc;
use throwdoc_model::{DeclId, Program};

/// Decides whether a declaration is a throw-helper.
pub trait ThrowHelperPolicy: Send + Sync {
    fn is_throw_helper(&self, program: &Program, decl: DeclId) -> bool;
}

/// `Throw` followed by nothing or by a character that is not lowercase
/// (`Throw`, `ThrowIfNull`, `Throw_`), unless a `$thrower` rule forces or
/// forbids it.
pub struct NamingThrowHelperPolicy {
    rules: Arc<RuleSources>,
}

impl NamingThrowHelperPolicy {
    pub fn new(rules: Arc<RuleSources>) -> Self {
        Self { rules }
    }
}

impl ThrowHelperPolicy for NamingThrowHelperPolicy {
    fn is_throw_helper(&self, program: &Program, decl: DeclId) -> bool {
        let decl = program.decl(program.canonical(decl));
        if let Some(forced) = self.rules.thrower_override(&decl.doc_id) {
            return forced;
        }
        has_throw_helper_name(&decl.name)
    }
}

pub fn has_throw_helper_name(name: &str) -> bool {
    name.strip_prefix("Throw")
        .is_some_and(|rest| rest.chars().next().is_none_or(|c| !c.is_lowercase()))
}

/// Policy backed by a closure, mainly for tests.
pub struct FnThrowHelperPolicy<F>(pub F);

impl<F> ThrowHelperPolicy for FnThrowHelperPolicy<F>
where
    F: Fn(&Program, DeclId) -> bool + Send + Sync,
{
    fn is_throw_helper(&self, program: &Program, decl: DeclId) -> bool {
        (self.0)(program, decl)
    }
}
