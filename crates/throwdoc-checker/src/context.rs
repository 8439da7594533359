//! Shared state of one analysis session.

use crate::adjustments::RuleSources;
use crate::config::AnalyzerConfig;
use crate::doc_cache::DocumentationCache;
use crate::error_set::ErrorKindSet;
use crate::pool::BuilderPool;
use crate::resolver::ContractResolver;
use crate::thrower::{NamingThrowHelperPolicy, ThrowHelperPolicy};
use std::sync::Arc;
use throwdoc_model::{DeclId, Program};
use tracing::debug;

/// Services shared by every declaration analyzed in a session.
///
/// Everything here is safe to use from several worker threads at once.
pub struct AnalysisContext {
    program: Arc<Program>,
    resolver: Arc<ContractResolver>,
    policy: Arc<dyn ThrowHelperPolicy>,
    /// Resolved intransitive types.
    intransitive: Vec<DeclId>,
    sets: BuilderPool<ErrorKindSet>,
}

impl AnalysisContext {
    /// Build the resolver and the default throw-helper policy over `rules`.
    ///
    /// The documentation cache is passed in so that it can outlive the
    /// session; intransitive ids that do not resolve are ignored.
    pub fn new(
        program: Arc<Program>,
        rules: RuleSources,
        docs: Arc<DocumentationCache>,
        config: &AnalyzerConfig,
    ) -> Self {
        let rules = Arc::new(rules);
        let resolver = Arc::new(ContractResolver::new(
            Arc::clone(&program),
            Arc::clone(&rules),
            docs,
        ));
        let policy: Arc<dyn ThrowHelperPolicy> = Arc::new(NamingThrowHelperPolicy::new(rules));
        let intransitive = config
            .intransitive
            .iter()
            .filter_map(|id| {
                let resolved = program.resolve_doc_id(id).map(|ty| program.canonical(ty));
                if resolved.is_none() {
                    debug!(id = %id, "intransitive type not in program");
                }
                resolved
            })
            .collect();
        Self::from_parts(program, resolver, policy, intransitive)
    }

    pub fn from_parts(
        program: Arc<Program>,
        resolver: Arc<ContractResolver>,
        policy: Arc<dyn ThrowHelperPolicy>,
        intransitive: Vec<DeclId>,
    ) -> Self {
        Self {
            program,
            resolver,
            policy,
            intransitive,
            sets: BuilderPool::default(),
        }
    }

    /// Replace the throw-helper policy.
    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn ThrowHelperPolicy>) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    #[inline]
    pub fn resolver(&self) -> &ContractResolver {
        &self.resolver
    }

    #[inline]
    pub fn policy(&self) -> &dyn ThrowHelperPolicy {
        &*self.policy
    }

    pub fn rules(&self) -> &RuleSources {
        self.resolver.rules()
    }

    pub fn intransitive_types(&self) -> &[DeclId] {
        &self.intransitive
    }

    /// Whether `ty` is an intransitive type or derives from one.
    pub fn is_intransitive(&self, ty: DeclId) -> bool {
        self.intransitive
            .iter()
            .any(|&base| self.program.is_subclass_of(ty, base))
    }

    /// Scratch sets for the walkers.
    pub(crate) fn sets(&self) -> &BuilderPool<ErrorKindSet> {
        &self.sets
    }
}
