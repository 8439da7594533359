//! Catch scopes of `try` statements.
//!
//! Each clause of a `try` is classified once, when the scope is entered:
//!
//! - `catch { }`, `catch (T) { }` and clauses whose filter is a literal that
//!   is always true definitely catch their type (everything, for untyped
//!   clauses).
//! - `catch (T e) when (e is A || e is B)` definitely catches `A` and `B`,
//!   restricted to what `T` can hold.
//! - Any other filter makes the clause conditional: it may catch, so the
//!   exception is recorded for a rethrow but keeps propagating.
//!
//! Every exception kind routed to a clause is remembered in that clause's
//! rethrow set, which is what a bare `throw;` inside the clause raises.

use crate::error_set::{ErrorEntry, ErrorKindSet};
use smallvec::SmallVec;
use throwdoc_model::{BinaryOp, CatchClause, DeclId, Expr, ExprKind, Literal, Program, UnaryOp};

/// What one catch clause does with an exception.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClauseCatch {
    /// Catches these types and their subclasses.
    Definite(SmallVec<[DeclId; 2]>),
    /// Might catch the type (anything, for `None`) depending on a filter.
    Conditional(Option<DeclId>),
    /// Catches everything.
    All,
}

impl ClauseCatch {
    /// Classify `clause`. `scratch` is used to collect filter types.
    pub fn classify(program: &Program, clause: &CatchClause, scratch: &mut ErrorKindSet) -> Self {
        let filter = match &clause.filter {
            Some(filter) if !is_always_true(filter) => filter,
            _ => {
                return match clause.ty {
                    Some(ty) => Self::Definite(SmallVec::from_slice(&[program.canonical(ty)])),
                    None => Self::All,
                };
            }
        };

        let (Some(ty), Some(variable)) = (clause.ty, clause.variable.as_deref()) else {
            return Self::Conditional(clause.ty.map(|ty| program.canonical(ty)));
        };
        let ty = program.canonical(ty);

        let start = scratch.len();
        if !collect_type_tests(filter, variable, scratch) {
            scratch.truncate(start);
            return Self::Conditional(Some(ty));
        }
        let mut narrowed: SmallVec<[DeclId; 2]> = SmallVec::new();
        for entry in &scratch.entries()[start..] {
            let tested = program.canonical(entry.ty);
            // `e is Base` where the caught type already derives from Base
            // holds for every caught exception.
            let candidate = if program.is_subclass_of(ty, tested) {
                ty
            } else if program.is_subclass_of(tested, ty) {
                tested
            } else {
                continue;
            };
            if !narrowed.contains(&candidate) {
                narrowed.push(candidate);
            }
        }
        scratch.truncate(start);

        if narrowed.is_empty() {
            Self::Conditional(Some(ty))
        } else {
            Self::Definite(narrowed)
        }
    }
}

#[derive(Debug)]
struct ClauseScope {
    catch: ClauseCatch,
    rethrow: ErrorKindSet,
}

/// The clauses of one `try` statement, innermost scope on top of the
/// walker's stack.
#[derive(Debug)]
pub struct CatchScope {
    clauses: Vec<ClauseScope>,
}

impl CatchScope {
    pub fn new(program: &Program, catches: &[CatchClause], scratch: &mut ErrorKindSet) -> Self {
        let clauses = catches
            .iter()
            .map(|clause| ClauseScope {
                catch: ClauseCatch::classify(program, clause, scratch),
                rethrow: ErrorKindSet::new(),
            })
            .collect();
        Self { clauses }
    }

    #[cfg(test)]
    pub fn clause(&self, index: usize) -> Option<&ClauseCatch> {
        self.clauses.get(index).map(|clause| &clause.catch)
    }

    /// Route an exception raised inside the `try` block through the clauses
    /// in order. Returns `true` when some clause definitely catches it.
    pub fn route(&mut self, program: &Program, ty: DeclId) -> bool {
        for clause in &mut self.clauses {
            match &clause.catch {
                ClauseCatch::All => {
                    clause.rethrow.add(ErrorEntry::unqualified(ty));
                    return true;
                }
                ClauseCatch::Definite(types) => {
                    if types.iter().any(|&caught| program.is_subclass_of(ty, caught)) {
                        clause.rethrow.add(ErrorEntry::unqualified(ty));
                        return true;
                    }
                    // A more general exception may still be one of the
                    // caught types at run time.
                    for &caught in types {
                        if program.is_subclass_of(caught, ty) {
                            clause.rethrow.add(ErrorEntry::unqualified(caught));
                        }
                    }
                }
                ClauseCatch::Conditional(None) => {
                    clause.rethrow.add(ErrorEntry::unqualified(ty));
                }
                ClauseCatch::Conditional(Some(caught)) => {
                    let caught = *caught;
                    if program.is_subclass_of(ty, caught) {
                        clause.rethrow.add(ErrorEntry::unqualified(ty));
                    } else if program.is_subclass_of(caught, ty) {
                        clause.rethrow.add(ErrorEntry::unqualified(caught));
                    }
                }
            }
        }
        false
    }

    /// Kinds routed to the catch-all clause, if there is one.
    #[cfg(test)]
    pub fn general_rethrow(&self) -> Option<&ErrorKindSet> {
        self.clauses
            .iter()
            .find(|clause| clause.catch == ClauseCatch::All)
            .map(|clause| &clause.rethrow)
    }

    #[cfg(test)]
    pub fn rethrow_set(&self, index: usize) -> Option<&ErrorKindSet> {
        self.clauses.get(index).map(|clause| &clause.rethrow)
    }

    /// Rethrow sets in clause order.
    pub fn into_rethrow_sets(self) -> impl Iterator<Item = ErrorKindSet> {
        self.clauses.into_iter().map(|clause| clause.rethrow)
    }
}

/// Collect the types of a disjunction of `variable is T` tests, in source
/// order. Returns `false` if the filter has any other shape.
fn collect_type_tests(filter: &Expr, variable: &str, out: &mut ErrorKindSet) -> bool {
    let start = out.len();
    let mut stack: Vec<&Expr> = vec![filter];
    while let Some(expr) = stack.pop() {
        match &expr.kind {
            ExprKind::Binary {
                op: BinaryOp::LogicalOr,
                operator: None,
                lhs,
                rhs,
            } => {
                stack.push(lhs);
                stack.push(rhs);
            }
            ExprKind::Is { operand, ty } if is_variable(operand, variable) => {
                out.add(ErrorEntry::unqualified(*ty));
            }
            _ => return false,
        }
    }
    // Right operands were popped first.
    out.reverse_tail(start);
    true
}

fn is_variable(expr: &Expr, variable: &str) -> bool {
    matches!(&expr.kind, ExprKind::Variable { name, .. } if name == variable)
}

/// Whether a filter is a boolean literal expression that is always true:
/// `true`, `!false`, `true || x`, `true && true`.
pub fn is_always_true(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Literal(Literal::Bool(value)) => *value,
        ExprKind::Unary {
            op: UnaryOp::Not,
            operator: None,
            operand,
        } => is_always_false(operand),
        ExprKind::Binary {
            op: BinaryOp::LogicalOr,
            operator: None,
            lhs,
            rhs,
        } => is_always_true(lhs) || is_always_true(rhs),
        ExprKind::Binary {
            op: BinaryOp::LogicalAnd,
            operator: None,
            lhs,
            rhs,
        } => is_always_true(lhs) && is_always_true(rhs),
        _ => false,
    }
}

fn is_always_false(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Literal(Literal::Bool(value)) => !*value,
        ExprKind::Unary {
            op: UnaryOp::Not,
            operator: None,
            operand,
        } => is_always_true(operand),
        ExprKind::Binary {
            op: BinaryOp::LogicalOr,
            operator: None,
            lhs,
            rhs,
        } => is_always_false(lhs) && is_always_false(rhs),
        ExprKind::Binary {
            op: BinaryOp::LogicalAnd,
            operator: None,
            lhs,
            rhs,
        } => is_always_false(lhs) || is_always_false(rhs),
        _ => false,
    }
}

#[cfg(test)]
#[path = "tests/catch_scope_tests.rs"]
mod tests;
