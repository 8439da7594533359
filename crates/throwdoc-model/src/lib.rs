//! Program model consumed by the throwdoc analysis.
//!
//! Parsing and name/type resolution are done by an external front end,
//! which hands over a [`Program`]: an arena of [`Declaration`]s, each with
//! an optional structural [`Body`]. The analysis only ever asks the narrow
//! questions exposed by [`Program`] (canonical identity, stable ids, the
//! class chain, accessor shape, constructors, documentation text).
//!
//! - `decl` - declarations, kinds and origins
//! - `syntax` - the structural statement/expression tree
//! - `program` - the declaration arena and its queries
//! - `builder` - `ProgramBuilder` for front ends and tests

pub mod builder;
pub mod decl;
pub mod program;
pub mod syntax;

pub use builder::ProgramBuilder;
pub use decl::{DeclId, DeclKind, Declaration, DocumentationMode, ExternalModule, ModuleId, Origin};
pub use program::{Program, ProgramLoadError};
pub use syntax::{
    AssignOp, BinaryOp, Block, Body, CatchClause, Comment, Expr, ExprKind, Literal, Stmt,
    StmtKind, UnaryOp,
};
