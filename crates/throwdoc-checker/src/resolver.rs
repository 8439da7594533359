//! Documented-contract resolution.
//!
//! The documented contract of a declaration is the set of exception kinds it
//! is allowed to propagate. It comes from, in order:
//!
//! 1. `<exception>` tags of its own documentation (source declarations), or
//!    of the embedded or side-file documentation of its module (external
//!    declarations), plus everything `<inheritdoc>` pulls in;
//! 2. the built-in adjustment rules;
//! 3. the project adjustment rules.
//!
//! An undocumented declaration with rules gets a contract made of the
//! additions alone.
//!
//! # Caching
//!
//! Results are memoized per canonical declaration in a write-once map:
//! concurrent first computations of the same key may both run, the first to
//! commit wins and every caller sees that value. A result computed while an
//! `inheritdoc` cycle was cut depends on where the cycle was entered, so it
//! is only committed by the outermost resolution.

use crate::adjustments::{RuleSources, apply_to};
use crate::doc_cache::DocumentationCache;
use crate::docs::{DocTags, parse_fragment};
use crate::error_set::{ErrorEntry, ErrorKindSet};
use crate::pool::BuilderPool;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use dashmap::DashMap;
use std::sync::Arc;
use throwdoc_common::Accessor;
use throwdoc_model::{DeclId, Origin, Program};
use throwdoc_rules::{AdjustmentRule, RuleKind};
use tracing::{debug, trace, warn};

/// The documented contract of one declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Contract {
    entries: Arc<[ErrorEntry]>,
    documented: bool,
}

impl Contract {
    pub fn new(entries: Arc<[ErrorEntry]>, documented: bool) -> Self {
        Self {
            entries,
            documented,
        }
    }

    /// No documentation and no rules.
    pub fn undocumented() -> Self {
        Self::default()
    }

    #[inline]
    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = ErrorEntry> + '_ {
        self.entries.iter().copied()
    }

    /// The entries without copying them.
    pub fn shared_entries(&self) -> Arc<[ErrorEntry]> {
        Arc::clone(&self.entries)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether documentation or rules exist. An undocumented contract is
    /// empty, but an empty contract may be documented.
    #[inline]
    pub fn is_documented(&self) -> bool {
        self.documented
    }

    /// Entries that apply when `side` is invoked.
    pub fn for_side(&self, side: Accessor) -> Self {
        if side.is_none() {
            return self.clone();
        }
        let entries: Vec<ErrorEntry> = self
            .iter()
            .filter(|entry| entry.accessor.is_none() || entry.accessor == side)
            .collect();
        Self::new(Arc::from(entries), self.documented)
    }
}

pub struct ContractResolver {
    program: Arc<Program>,
    rules: Arc<RuleSources>,
    docs: Arc<DocumentationCache>,
    cache: DashMap<DeclId, Contract>,
    sets: BuilderPool<ErrorKindSet>,
}

impl ContractResolver {
    pub fn new(
        program: Arc<Program>,
        rules: Arc<RuleSources>,
        docs: Arc<DocumentationCache>,
    ) -> Self {
        Self {
            program,
            rules,
            docs,
            cache: DashMap::new(),
            sets: BuilderPool::default(),
        }
    }

    #[inline]
    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    #[inline]
    pub fn rules(&self) -> &Arc<RuleSources> {
        &self.rules
    }

    /// Number of memoized contracts.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Documented contract of `decl`. Never fails: unresolvable references
    /// and malformed documentation contribute nothing.
    ///
    /// For an accessor declaration this is the owning member's contract
    /// restricted to that side.
    pub fn documented_errors(&self, decl: DeclId) -> Contract {
        let decl = self.program.canonical(decl);
        if let Some((owner, side)) = self.program.accessor_owner(decl) {
            return self.documented_errors(owner).for_side(side);
        }
        let mut guard = RecursionGuard::with_profile(RecursionProfile::InheritDoc);
        self.resolve(decl, &mut guard)
    }

    fn resolve(&self, decl: DeclId, guard: &mut RecursionGuard<DeclId>) -> Contract {
        let decl = self.program.canonical(decl);
        if let Some(cached) = self.cache.get(&decl).map(|entry| entry.clone()) {
            return cached;
        }

        match guard.enter(decl) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => {
                debug!(decl = %self.program.decl(decl).doc_id, "inheritdoc cycle cut");
                return Contract::undocumented();
            }
            denied => {
                warn!(
                    decl = %self.program.decl(decl).doc_id,
                    ?denied,
                    "inheritdoc resolution abandoned"
                );
                return Contract::undocumented();
            }
        }

        let outer_cut = guard.clear_cut();
        let contract = self.compute(decl, guard);
        guard.leave(decl);
        let cut = guard.clear_cut();

        if cut && guard.is_active() {
            guard.restore_cut(true);
            return contract;
        }
        guard.restore_cut(outer_cut);

        let committed = self.cache.entry(decl).or_insert(contract).clone();
        debug!(
            decl = %self.program.decl(decl).doc_id,
            entries = committed.entries().len(),
            documented = committed.is_documented(),
            "contract committed"
        );
        committed
    }

    fn compute(&self, decl: DeclId, guard: &mut RecursionGuard<DeclId>) -> Contract {
        let program = &*self.program;
        let doc_id = program.decl(decl).doc_id.as_str();
        let mut set = self.sets.take();

        let documented = match self.tags_of(decl) {
            Some(tags) => {
                self.collect_tags(&mut set, decl, &tags, guard);
                true
            }
            None => false,
        };

        if documented {
            for rules in self.rules.passes() {
                apply_to(program, &mut set, rules.rules_for(doc_id), decl, true);
            }
        } else if self.rules.has_rules_for(doc_id) {
            let additions: Vec<AdjustmentRule> = self
                .rules
                .passes()
                .iter()
                .flat_map(|rules| rules.rules_for(doc_id))
                .filter(|rule| rule.kind == RuleKind::Add)
                .cloned()
                .collect();
            apply_to(program, &mut set, &additions, decl, true);
            return Contract::new(set.snapshot(), true);
        }

        Contract::new(set.snapshot(), documented)
    }

    /// Documentation tags of `decl`, or `None` when it has no documentation.
    fn tags_of(&self, decl: DeclId) -> Option<DocTags> {
        let declaration = self.program.decl(decl);
        match declaration.origin {
            Origin::Source => declaration.documentation.as_deref().map(parse_fragment),
            Origin::External(_) => {
                let module = self.program.module_of(decl)?;
                if let Some(xml) = module.embedded_documentation.get(&declaration.doc_id) {
                    return Some(parse_fragment(xml));
                }
                self.docs.get(module).member(&declaration.doc_id).cloned()
            }
        }
    }

    fn collect_tags(
        &self,
        set: &mut ErrorKindSet,
        decl: DeclId,
        tags: &DocTags,
        guard: &mut RecursionGuard<DeclId>,
    ) {
        let program = &*self.program;
        let declaration = program.decl(decl);
        let sides = if declaration.kind.has_accessors() {
            program.accessor_shape(decl).both_sides()
        } else {
            None
        };

        for tag in &tags.exceptions {
            let Some(ty) = program.resolve_cref(&tag.cref, Some(decl)) else {
                trace!(cref = %tag.cref, "unresolved exception cref");
                continue;
            };
            if !program.decl(ty).kind.is_type() {
                continue;
            }
            let accessor = match tag.accessor.as_deref().map(str::trim) {
                None | Some("") => Accessor::None,
                Some(text) => match Accessor::parse(text) {
                    Some(accessor) => accessor,
                    None => continue,
                },
            };
            let ty = program.canonical(ty);
            match sides {
                Some(sides) if accessor.is_none() => {
                    for side in sides {
                        set.add_type(ty, side);
                    }
                }
                _ => {
                    set.add_type(ty, accessor);
                }
            }
        }

        for inherit in &tags.inherit {
            match inherit {
                Some(cref) => {
                    if let Some(target) = program.resolve_cref(cref, Some(decl)) {
                        set.extend(self.resolve(target, guard).iter());
                    }
                }
                None => {
                    let bases = declaration
                        .overridden
                        .iter()
                        .chain(declaration.implements.iter());
                    for &base in bases {
                        set.extend(self.resolve(base, guard).iter());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
