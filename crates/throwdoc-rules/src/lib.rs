//! Exception adjustment rules.
//!
//! A rule adds or removes one exception type from the documented contract of
//! one declaration:
//!
//! ```text
//! # comment
//! M:N.Reader.Read +T:System.IO.IOException
//! P:N.Reader.Position set -T:System.ArgumentOutOfRangeException
//! M:N.Guard.Fail $thrower +T:System.ArgumentException
//! ```
//!
//! - `syntax` - the line grammar and its diagnostics
//! - `rule_set` - parsed rules indexed by target, and composition of sources
//! - `builtin` - the embedded default rule table
//! - `files` - rule file naming convention and loading
//! - `inline` - `// ExceptionAdjustment:` statement overlays

pub mod builtin;
pub mod files;
pub mod inline;
pub mod rule_set;
pub mod syntax;

pub use builtin::builtin_rules;
pub use files::{DEFAULT_FILE_NAME, RuleLoadError, is_adjustment_file, load_rule_files};
pub use inline::{INLINE_PREFIX, parse_inline_comment};
pub use rule_set::{AdjustmentRule, RuleKind, RuleSet, THROWER_FLAG};
pub use syntax::{RuleSyntaxError, SyntaxErrorKind};
