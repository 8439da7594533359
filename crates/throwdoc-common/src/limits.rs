//! Centralized limits and thresholds for the analysis.
//!
//! Keeping these in one place prevents duplicate definitions with
//! inconsistent values across the resolver, the walker and the pools.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting of `inheritdoc` resolution.
///
/// Cycles are cut by the in-progress stack; this bound only protects against
/// extremely long acyclic inheritance chains.
pub const MAX_INHERIT_DOC_DEPTH: u32 = 64;

/// Maximum nesting of direct flow analysis (a declaration walking an
/// undocumented local function, which walks another, ...).
pub const MAX_FLOW_ANALYSIS_DEPTH: u32 = 64;

/// Maximum depth of the structural walk of a single body.
///
/// Deeper trees are truncated: the remainder of the subtree contributes no
/// findings.
pub const MAX_WALK_DEPTH: u32 = 1_000;

/// Maximum number of guarded entries per analysis session.
pub const MAX_GUARD_ITERATIONS: u32 = 1_000_000;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Initial capacity of an error-kind set; capacity doubles from here.
pub const ERROR_SET_INITIAL_CAPACITY: usize = 4;

/// Number of free-list slots in a builder pool.
pub const BUILDER_POOL_SIZE: usize = 32;

/// Error-kind sets larger than this are not returned to the pool.
pub const POOLED_SET_MAX_CAPACITY: usize = 128;
