//! Exception contract verification.
//!
//! This crate is organized into several submodules:
//! - `error_set` - ordered, deduplicating sets of error kinds
//! - `pool` - lock-free free-lists of reusable builders
//! - `recursion` - cycle and depth guards
//! - `docs` / `doc_cache` - documentation tag extraction and the external
//!   documentation cache
//! - `adjustments` - application of adjustment rules to contracts
//! - `resolver` - documented-contract resolution
//! - `thrower` - throw-helper policy
//! - `catch_scope` - catch clause classification and routing
//! - `walker` - flow verification of bodies
//! - `consistency` - override and implementation consistency
//! - `sink` - findings and their rendering as diagnostics
//! - `analyzer` - whole-program driver
//! - `config` - `throwdoc.json`

pub mod adjustments;
pub mod analyzer;
pub mod catch_scope;
pub mod config;
pub mod consistency;
pub mod context;
pub mod doc_cache;
pub mod docs;
pub mod error_set;
pub mod pool;
pub mod recursion;
pub mod resolver;
pub mod sink;
pub mod thrower;
pub mod walker;

pub use adjustments::{RuleSources, apply_to, check_rule_references};
pub use analyzer::{Analyzer, CancellationToken, Cancelled};
pub use catch_scope::{CatchScope, ClauseCatch};
pub use config::{AnalyzerConfig, CONFIG_FILE_NAME, ConfigError};
pub use consistency::check_consistency;
pub use context::AnalysisContext;
pub use doc_cache::DocumentationCache;
pub use error_set::{ErrorEntry, ErrorKindSet};
pub use resolver::{Contract, ContractResolver};
pub use sink::{DeclarationReport, Finding, FindingKind, FindingSink};
pub use thrower::{FnThrowHelperPolicy, NamingThrowHelperPolicy, ThrowHelperPolicy};
pub use walker::{FlowWalker, analyze_declaration};
