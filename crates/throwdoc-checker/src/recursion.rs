//! Recursion guards for cycle detection and depth limiting.
//!
//! # Design
//!
//! Contract resolution (`inheritdoc` chains) and flow analysis (a member
//! walking an undocumented local function, which walks another, ...) are
//! mutually recursive over declarations. Both carry an explicit stack of the
//! keys currently in progress instead of relying on the call stack alone:
//! re-entering a key that is already on the stack is reported as
//! [`RecursionResult::Cycle`] and the caller treats it as contributing
//! nothing.
//!
//! [`RecursionGuard`] combines:
//! 1. **Cycle detection** via the in-progress stack
//! 2. **Depth limiting** to prevent stack overflow
//! 3. **Iteration bounding** to prevent runaway work
//!
//! [`DepthCounter`] only limits depth and is used for the structural walk
//! of one body, where revisiting is legitimate.
//!
//! # Debug-mode safety
//!
//! Dropping a guard with active entries, or leaving a key that is not the
//! innermost entry, panics in debug builds.

use rustc_hash::FxHashSet;
use std::hash::Hash;
use throwdoc_common::limits;

// ---------------------------------------------------------------------------
// RecursionProfile
// ---------------------------------------------------------------------------

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// `inheritdoc` resolution.
    ///
    /// depth = 64, iterations = 1,000,000
    InheritDoc,

    /// Direct flow analysis of local callables.
    ///
    /// depth = 64, iterations = 1,000,000
    FlowAnalysis,

    /// Custom limits for one-off or test scenarios.
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::InheritDoc => limits::MAX_INHERIT_DOC_DEPTH,
            Self::FlowAnalysis => limits::MAX_FLOW_ANALYSIS_DEPTH,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::InheritDoc | Self::FlowAnalysis => limits::MAX_GUARD_ITERATIONS,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

// ---------------------------------------------------------------------------
// RecursionResult
// ---------------------------------------------------------------------------

/// Result of attempting to enter a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// Proceed with the computation.
    Entered,
    /// This key is already in progress: cycle detected.
    Cycle,
    /// Maximum recursion depth exceeded.
    DepthExceeded,
    /// Maximum iteration count exceeded.
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_cycle(self) -> bool {
        matches!(self, Self::Cycle)
    }

    #[inline]
    pub fn is_exceeded(self) -> bool {
        matches!(self, Self::DepthExceeded | Self::IterationExceeded)
    }
}

// ---------------------------------------------------------------------------
// RecursionGuard
// ---------------------------------------------------------------------------

/// Explicit in-progress stack with cycle detection and limits.
///
/// ```ignore
/// match guard.enter(key) {
///     RecursionResult::Entered => {
///         let result = do_work();
///         guard.leave(key);
///         result
///     }
///     RecursionResult::Cycle => nothing(),
///     _ => give_up(),
/// }
/// ```
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    stack: Vec<K>,
    visiting: FxHashSet<K>,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
    /// Sticky: set whenever an entry was denied by a limit or a cycle was cut.
    cut: bool,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            stack: Vec::new(),
            visiting: FxHashSet::default(),
            iterations: 0,
            max_depth,
            max_iterations,
            cut: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// Try to enter `key`. On `Entered` the caller must call
    /// [`leave`](Self::leave) with the same key.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);

        if self.iterations > self.max_iterations {
            self.cut = true;
            return RecursionResult::IterationExceeded;
        }
        if self.visiting.contains(&key) {
            self.cut = true;
            return RecursionResult::Cycle;
        }
        if self.stack.len() as u32 >= self.max_depth {
            self.cut = true;
            return RecursionResult::DepthExceeded;
        }

        self.visiting.insert(key);
        self.stack.push(key);
        RecursionResult::Entered
    }

    /// Leave the innermost entry.
    pub fn leave(&mut self, key: K) {
        let popped = self.stack.pop();
        debug_assert!(
            popped == Some(key),
            "RecursionGuard::leave() called with a key that is not the innermost entry."
        );
        self.visiting.remove(&key);
    }

    /// Run `f` inside a guarded scope; `Err` carries the denial reason.
    pub fn scope<T>(
        &mut self,
        key: K,
        f: impl FnOnce(&mut Self) -> T,
    ) -> Result<T, RecursionResult> {
        match self.enter(key) {
            RecursionResult::Entered => {
                let result = f(self);
                self.leave(key);
                Ok(result)
            }
            denied => Err(denied),
        }
    }

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.stack.len() as u32
    }

    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Keys in progress, outermost first.
    #[inline]
    pub fn in_progress(&self) -> &[K] {
        &self.stack
    }

    /// Whether any entry was denied since construction (or the last
    /// [`clear_cut`](Self::clear_cut)).
    #[inline]
    pub fn was_cut(&self) -> bool {
        self.cut
    }

    /// Reset the cut flag, returning its previous value.
    #[inline]
    pub fn clear_cut(&mut self) -> bool {
        std::mem::replace(&mut self.cut, false)
    }

    /// Re-raise a cut flag saved with [`clear_cut`](Self::clear_cut).
    #[inline]
    pub fn restore_cut(&mut self, cut: bool) {
        self.cut |= cut;
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.stack.is_empty() {
            panic!(
                "RecursionGuard dropped with {} entries still in progress. \
                 This indicates leaked enter() calls without matching leave() calls.",
                self.stack.len(),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// DepthCounter
// ---------------------------------------------------------------------------

/// Depth-only guard for stack overflow protection.
pub struct DepthCounter {
    depth: u32,
    max_depth: u32,
    exceeded: bool,
}

impl DepthCounter {
    pub fn new(max_depth: u32) -> Self {
        Self {
            depth: 0,
            max_depth,
            exceeded: false,
        }
    }

    /// Try to go one level deeper. On `false` do **not** call `leave()`.
    #[inline]
    pub fn enter(&mut self) -> bool {
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return false;
        }
        self.depth += 1;
        true
    }

    #[inline]
    pub fn leave(&mut self) {
        debug_assert!(self.depth > 0, "DepthCounter::leave() called at depth 0.");
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

#[cfg(test)]
#[path = "tests/recursion_tests.rs"]
mod tests;
