//! Structural statement/expression tree.
//!
//! This is not a full syntax tree: names are already resolved to
//! [`DeclId`]s by the front end and only the shapes that matter for
//! exception flow are distinguished. Everything else is `ExprKind::Other`
//! with its children, which the walker simply descends into.

use crate::decl::DeclId;
use serde::{Deserialize, Serialize};
use throwdoc_common::Span;

/// Executable body of a declaration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Body {
    pub block: Block,
    /// Explicit `base(...)`/`this(...)` constructor initializer.
    #[serde(default)]
    pub initializer: Option<Expr>,
}

impl Body {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self {
            block: Block::new(stmts),
            initializer: None,
        }
    }

    /// Body of an expression-bodied member or a field initializer.
    pub fn expression(expr: Expr) -> Self {
        Self::new(vec![Stmt::expr(expr)])
    }

    #[must_use]
    pub fn with_initializer(mut self, initializer: Expr) -> Self {
        self.initializer = Some(initializer);
        self
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    #[serde(default)]
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self {
            stmts,
            span: Span::dummy(),
        }
    }
}

/// A single-line comment immediately preceding a statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment text without the leading `//`.
    pub text: String,
    #[serde(default)]
    pub span: Span,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    #[serde(default)]
    pub span: Span,
    /// Leading single-line comments.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StmtKind {
    Expr(Expr),
    Local {
        name: String,
        init: Option<Expr>,
    },
    Block(Block),
    If {
        cond: Expr,
        then_block: Block,
        else_block: Option<Block>,
    },
    /// `while`, `do`, and `for` loops.
    Loop {
        cond: Option<Expr>,
        body: Block,
    },
    ForEach {
        collection: Expr,
        /// Enumerator protocol members invoked implicitly
        /// (`GetEnumerator`, `MoveNext`, `Current`, `Dispose`).
        #[serde(default)]
        implicit_calls: Vec<DeclId>,
        body: Block,
    },
    Using {
        resource: Expr,
        /// `Dispose` invoked implicitly when the block exits.
        dispose: Option<DeclId>,
        body: Block,
    },
    Return(Option<Expr>),
    /// `throw expr;` or, with `None`, a bare `throw;` rethrow.
    Throw(Option<Expr>),
    Try {
        block: Block,
        #[serde(default)]
        catches: Vec<CatchClause>,
        finally: Option<Block>,
    },
    /// Declaration of a local function; its body is analyzed separately.
    LocalFunction(DeclId),
    Empty,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatchClause {
    /// Caught type; `None` catches anything.
    pub ty: Option<DeclId>,
    #[serde(default)]
    pub variable: Option<String>,
    #[serde(default)]
    pub filter: Option<Expr>,
    pub block: Block,
    #[serde(default)]
    pub span: Span,
}

impl CatchClause {
    pub fn typed(ty: DeclId, stmts: Vec<Stmt>) -> Self {
        Self {
            ty: Some(ty),
            variable: None,
            filter: None,
            block: Block::new(stmts),
            span: Span::dummy(),
        }
    }

    pub fn catch_all(stmts: Vec<Stmt>) -> Self {
        Self {
            ty: None,
            variable: None,
            filter: None,
            block: Block::new(stmts),
            span: Span::dummy(),
        }
    }

    /// `catch (T name) when (filter) { ... }`
    pub fn filtered(ty: DeclId, variable: &str, filter: Expr, stmts: Vec<Stmt>) -> Self {
        Self {
            ty: Some(ty),
            variable: Some(variable.to_string()),
            filter: Some(filter),
            block: Block::new(stmts),
            span: Span::dummy(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    #[serde(default)]
    pub span: Span,
    /// Static type of the expression, when it is a declared type.
    #[serde(default)]
    pub ty: Option<DeclId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignOp {
    /// `=`
    Plain,
    /// `*=`, `??=`, ... (read then write)
    Compound,
    /// `+=`
    Add,
    /// `-=`
    Subtract,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    LogicalOr,
    LogicalAnd,
    Equal,
    NotEqual,
    Arithmetic,
    Comparison,
    Coalesce,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Not,
    Negate,
    Conversion,
    Other,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Str(String),
    Null,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    /// Reference to a member: method group, property, indexer, event or field.
    Member {
        target: DeclId,
        receiver: Option<Box<Expr>>,
        /// Indexer arguments.
        #[serde(default)]
        args: Vec<Expr>,
    },
    Call {
        callee: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
    },
    New {
        ctor: DeclId,
        #[serde(default)]
        args: Vec<Expr>,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        /// User-defined operator or conversion, if any.
        operator: Option<DeclId>,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        operator: Option<DeclId>,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `operand is T`
    Is {
        operand: Box<Expr>,
        ty: DeclId,
    },
    /// A local variable or parameter; `closure` is the local callable it is
    /// known to hold.
    Variable {
        name: String,
        closure: Option<DeclId>,
    },
    /// Creation of a closure.
    Lambda(DeclId),
    /// Throw expression.
    Throw(Box<Expr>),
    Conditional {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    Literal(Literal),
    Other(Vec<Expr>),
}

// =============================================================================
// Construction helpers
// =============================================================================

impl Expr {
    pub const fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            span: Span::dummy(),
            ty: None,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn with_type(mut self, ty: DeclId) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Reference to a member without receiver.
    pub fn member(target: DeclId) -> Self {
        Self::new(ExprKind::Member {
            target,
            receiver: None,
            args: Vec::new(),
        })
    }

    /// Indexer access `receiver[args]`.
    pub fn index(target: DeclId, receiver: Expr, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Member {
            target,
            receiver: Some(Box::new(receiver)),
            args,
        })
    }

    /// `target(args)`
    pub fn call(target: DeclId, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call {
            callee: Box::new(Self::member(target)),
            args,
        })
    }

    pub fn invoke(callee: Expr, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call {
            callee: Box::new(callee),
            args,
        })
    }

    /// `new T(args)`; the expression's type is left to the caller.
    pub fn new_object(ctor: DeclId, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::New { ctor, args })
    }

    pub fn assign(op: AssignOp, target: Expr, value: Expr) -> Self {
        Self::new(ExprKind::Assign {
            op,
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    pub fn variable(name: &str) -> Self {
        Self::new(ExprKind::Variable {
            name: name.to_string(),
            closure: None,
        })
    }

    /// A local variable known to hold the closure/local function `closure`.
    pub fn closure_variable(name: &str, closure: DeclId) -> Self {
        Self::new(ExprKind::Variable {
            name: name.to_string(),
            closure: Some(closure),
        })
    }

    pub fn lambda(decl: DeclId) -> Self {
        Self::new(ExprKind::Lambda(decl))
    }

    pub fn is_type(operand: Expr, ty: DeclId) -> Self {
        Self::new(ExprKind::Is {
            operand: Box::new(operand),
            ty,
        })
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::new(ExprKind::Binary {
            op,
            operator: None,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn or(lhs: Expr, rhs: Expr) -> Self {
        Self::binary(BinaryOp::LogicalOr, lhs, rhs)
    }

    pub fn not(operand: Expr) -> Self {
        Self::new(ExprKind::Unary {
            op: UnaryOp::Not,
            operator: None,
            operand: Box::new(operand),
        })
    }

    pub fn bool(value: bool) -> Self {
        Self::new(ExprKind::Literal(Literal::Bool(value)))
    }

    pub fn throw(operand: Expr) -> Self {
        Self::new(ExprKind::Throw(Box::new(operand)))
    }
}

impl Stmt {
    pub const fn new(kind: StmtKind) -> Self {
        Self {
            kind,
            span: Span::dummy(),
            comments: Vec::new(),
        }
    }

    pub const fn expr(expr: Expr) -> Self {
        Self::new(StmtKind::Expr(expr))
    }

    /// `throw new T();` where `ctor` is a constructor of `ty`.
    pub fn throw_new(ctor: DeclId, ty: DeclId) -> Self {
        Self::new(StmtKind::Throw(Some(Expr::new_object(ctor, Vec::new()).with_type(ty))))
    }

    /// `throw;`
    pub const fn rethrow() -> Self {
        Self::new(StmtKind::Throw(None))
    }

    pub fn try_catch(block: Vec<Stmt>, catches: Vec<CatchClause>) -> Self {
        Self::new(StmtKind::Try {
            block: Block::new(block),
            catches,
            finally: None,
        })
    }

    pub fn try_finally(block: Vec<Stmt>, catches: Vec<CatchClause>, finally: Vec<Stmt>) -> Self {
        Self::new(StmtKind::Try {
            block: Block::new(block),
            catches,
            finally: Some(Block::new(finally)),
        })
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Attach a leading `//` comment (text without the slashes).
    #[must_use]
    pub fn with_comment(mut self, text: &str) -> Self {
        self.comments.push(Comment {
            text: text.to_string(),
            span: Span::dummy(),
        });
        self
    }
}
