//! Flow verification of declaration bodies.
//!
//! The walker visits a body statement by statement and computes, at every
//! site that can raise, which exception kinds escape it:
//!
//! - `throw` statements and expressions raise their static type;
//! - a bare `throw;` raises whatever its enclosing catch clause caught;
//! - member references raise the documented contract of the member, for the
//!   accessor sides the access actually invokes;
//! - references to undocumented local functions and closures raise what
//!   their own bodies let escape (computed on demand and memoized).
//!
//! Each escaping kind is routed through the enclosing catch scopes. What is
//! left and not covered by the contract of the declaration under analysis
//! becomes a finding at the site.
//!
//! Local functions and closures are not analyzed inline: every one that is
//! encountered is queued and walked afterwards in its own frame, with its
//! own catch scopes, sharing the cycle guard of the session. A documented
//! local callable is verified against its own documentation; an
//! undocumented one only contributes delegate-creation findings to the
//! enclosing declaration.

use crate::adjustments::apply_to;
use crate::catch_scope::CatchScope;
use crate::context::AnalysisContext;
use crate::error_set::{ErrorEntry, ErrorKindSet};
use crate::recursion::{DepthCounter, RecursionGuard, RecursionProfile, RecursionResult};
use crate::resolver::Contract;
use crate::sink::{Finding, FindingKind, FindingSink};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::{SmallVec, smallvec};
use std::collections::VecDeque;
use std::sync::Arc;
use throwdoc_common::diagnostics::diagnostic_codes;
use throwdoc_common::limits::MAX_WALK_DEPTH;
use throwdoc_common::{Accessor, Diagnostic, Span};
use throwdoc_model::{
    AssignOp, Block, CatchClause, DeclId, DeclKind, Expr, ExprKind, Program, Stmt, StmtKind,
};
use throwdoc_rules::inline::InlineRule;
use throwdoc_rules::{AdjustmentRule, parse_inline_comment};
use tracing::{debug, debug_span, trace, warn};

/// Origin recorded on rules read from inline overlays.
const INLINE_ORIGIN: &str = "<inline>";

/// How a reference uses its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Intent {
    /// Read, or passed along as a value.
    Value,
    /// Called.
    Invoke,
    /// Assigned with `=`.
    Set,
    /// Read and written (`*=`, `++`, ...).
    GetSet,
    /// `+=`: subscribes to an event, read-write on a property.
    AddAssign,
    /// `-=`: unsubscribes from an event, read-write on a property.
    SubtractAssign,
}

impl Intent {
    fn from_assign(op: AssignOp) -> Self {
        match op {
            AssignOp::Plain => Self::Set,
            AssignOp::Compound => Self::GetSet,
            AssignOp::Add => Self::AddAssign,
            AssignOp::Subtract => Self::SubtractAssign,
        }
    }

    /// Accessor sides of a property, indexer or event invoked by this use.
    fn sides(self, kind: DeclKind) -> SmallVec<[Accessor; 2]> {
        if kind == DeclKind::Event {
            return match self {
                Self::AddAssign => smallvec![Accessor::Add],
                Self::SubtractAssign => smallvec![Accessor::Remove],
                _ => SmallVec::new(),
            };
        }
        match self {
            Self::Value | Self::Invoke => smallvec![Accessor::Get],
            Self::Set => smallvec![Accessor::Set],
            Self::GetSet | Self::AddAssign | Self::SubtractAssign => {
                smallvec![Accessor::Get, Accessor::Set]
            }
        }
    }
}

/// The declaration findings are reported against, with its own contract.
#[derive(Clone, Debug)]
struct ReportTarget {
    target: DeclId,
    accessor: Accessor,
    /// Documented kinds, without accessor qualification.
    own: ErrorKindSet,
}

impl ReportTarget {
    fn new(target: DeclId, accessor: Accessor, contract: &Contract) -> Self {
        let own = contract
            .for_side(accessor)
            .iter()
            .map(|entry| ErrorEntry::unqualified(entry.ty))
            .collect();
        Self {
            target,
            accessor,
            own,
        }
    }

    fn uncovered(&self, program: &Program, residual: &ErrorKindSet) -> SmallVec<[DeclId; 2]> {
        residual
            .iter()
            .filter(|&entry| !self.own.covers(entry, program))
            .map(|entry| entry.ty)
            .collect()
    }
}

#[derive(Debug)]
enum FrameMode {
    /// Report uncovered kinds as findings.
    Report(ReportTarget),
    /// Collect escaping kinds as the effect of a local callable.
    Accumulate(ErrorKindSet),
}

/// Walk state of one body.
#[derive(Debug)]
struct Frame {
    decl: DeclId,
    mode: FrameMode,
    /// Whether delegate-creation findings and overlay diagnostics are
    /// emitted from this body.
    reports: bool,
    scopes: Vec<CatchScope>,
    /// Kinds a bare `throw;` raises, innermost catch clause on top.
    rethrow: Vec<ErrorKindSet>,
    overlays: Vec<InlineRule>,
}

impl Frame {
    fn report(decl: DeclId, target: ReportTarget) -> Self {
        Self::new(decl, FrameMode::Report(target), true)
    }

    fn accumulate(decl: DeclId, reports: bool) -> Self {
        Self::new(decl, FrameMode::Accumulate(ErrorKindSet::new()), reports)
    }

    fn new(decl: DeclId, mode: FrameMode, reports: bool) -> Self {
        Self {
            decl,
            mode,
            reports,
            scopes: Vec::new(),
            rethrow: Vec::new(),
            overlays: Vec::new(),
        }
    }

    fn into_effect(self) -> Arc<[ErrorEntry]> {
        match self.mode {
            FrameMode::Accumulate(set) => set.snapshot(),
            FrameMode::Report(_) => no_effect(),
        }
    }
}

fn no_effect() -> Arc<[ErrorEntry]> {
    Arc::from(Vec::new())
}

/// Verifies the bodies of one top-level declaration.
pub struct FlowWalker<'a, S: FindingSink + ?Sized> {
    cx: &'a AnalysisContext,
    program: &'a Program,
    sink: &'a mut S,
    /// Local callables under direct flow analysis.
    guard: RecursionGuard<DeclId>,
    depth: DepthCounter,
    /// The declaration under analysis; delegate creation inside undocumented
    /// local callables is reported against it.
    root: Option<ReportTarget>,
    /// Escaping kinds of undocumented local callables.
    effects: FxHashMap<DeclId, Arc<[ErrorEntry]>>,
    deferred: VecDeque<DeclId>,
    enqueued: FxHashSet<DeclId>,
    inline_origin: Arc<str>,
}

impl<'a, S: FindingSink + ?Sized> FlowWalker<'a, S> {
    pub fn new(cx: &'a AnalysisContext, sink: &'a mut S) -> Self {
        Self {
            cx,
            program: cx.program().as_ref(),
            sink,
            guard: RecursionGuard::with_profile(RecursionProfile::FlowAnalysis),
            depth: DepthCounter::new(MAX_WALK_DEPTH),
            root: None,
            effects: FxHashMap::default(),
            deferred: VecDeque::new(),
            enqueued: FxHashSet::default(),
            inline_origin: Arc::from(INLINE_ORIGIN),
        }
    }

    /// Analyze a top-level declaration: a member with a body, or a class
    /// for its implicit constructor.
    pub fn analyze(&mut self, decl: DeclId) {
        let program = self.program;
        let declaration = program.decl(decl);
        let _span = debug_span!("flow", decl = %declaration.doc_id).entered();

        match declaration.kind {
            DeclKind::Class => self.check_implicit_constructor(decl),
            DeclKind::Struct | DeclKind::Interface => {}
            DeclKind::LocalFunction | DeclKind::Lambda => {
                debug!("local callables are analyzed through their enclosing member");
            }
            _ => self.analyze_member(decl),
        }
        self.drain_deferred();

        if self.depth.is_exceeded() {
            warn!(decl = %declaration.doc_id, "body nesting too deep, analysis truncated");
        }
    }

    fn analyze_member(&mut self, decl: DeclId) {
        let program = self.program;
        let declaration = program.decl(decl);
        let Some(body) = &declaration.body else {
            return;
        };

        let (target, accessor) = match program.accessor_owner(decl) {
            Some(owner) => owner,
            // Expression-bodied properties are getters.
            None if declaration.kind.has_accessors() => (decl, Accessor::Get),
            None => (decl, Accessor::None),
        };
        let contract = self.cx.resolver().documented_errors(target);
        let report = ReportTarget::new(target, accessor, &contract);
        self.root = Some(report.clone());
        let mut frame = Frame::report(decl, report);

        if declaration.kind == DeclKind::Constructor && !declaration.is_static {
            match &body.initializer {
                Some(initializer) => self.walk_expr(&mut frame, initializer, Intent::Invoke),
                None => self.implicit_base_call(&mut frame, decl, declaration.span),
            }
        }
        self.walk_block(&mut frame, &body.block);
    }

    /// A constructor without initializer calls the parameterless base
    /// constructor.
    fn implicit_base_call(&mut self, frame: &mut Frame, ctor: DeclId, span: Span) {
        let program = self.program;
        let Some(ty) = program.decl(ctor).containing else {
            return;
        };
        if program.decl(ty).kind != DeclKind::Class {
            return;
        }
        let Some(base) = program.decl(ty).base else {
            return;
        };
        if let Some(base_ctor) = program.parameterless_constructor(base) {
            trace!(base = %program.decl(base_ctor).doc_id, "implicit base constructor call");
            self.reference(frame, base_ctor, Intent::Invoke, span);
        }
    }

    /// A class without explicit instance constructors gets an implicit one
    /// that calls the parameterless base constructor.
    fn check_implicit_constructor(&mut self, class: DeclId) {
        let program = self.program;
        let declaration = program.decl(class);
        if declaration.is_static || program.constructors_of(class).next().is_some() {
            return;
        }
        let Some(base) = declaration.base else {
            return;
        };
        let Some(base_ctor) = program.parameterless_constructor(base) else {
            return;
        };

        let implicit = program.members_of(class).find(|&id| {
            let member = program.decl(id);
            member.kind == DeclKind::Constructor && !member.is_static && member.is_implicit
        });
        let report = match implicit {
            Some(ctor) => {
                let contract = self.cx.resolver().documented_errors(ctor);
                ReportTarget::new(ctor, Accessor::None, &contract)
            }
            None => ReportTarget::new(class, Accessor::None, &Contract::undocumented()),
        };
        self.root = Some(report.clone());
        let mut frame = Frame::report(implicit.unwrap_or(class), report);
        self.reference(&mut frame, base_ctor, Intent::Invoke, declaration.span);
    }

    // =========================================================================
    // Local callables
    // =========================================================================

    fn enqueue(&mut self, local: DeclId) {
        if self.enqueued.insert(local) {
            self.deferred.push_back(local);
        }
    }

    /// Walk queued local callables, each in its own frame. Walking one may
    /// queue more.
    fn drain_deferred(&mut self) {
        let program = self.program;
        while let Some(local) = self.deferred.pop_front() {
            let declaration = program.decl(local);
            let Some(body) = &declaration.body else {
                continue;
            };
            let _span = debug_span!("local", decl = %declaration.doc_id).entered();

            let contract = self.cx.resolver().documented_errors(local);
            if contract.is_documented() {
                let report = ReportTarget::new(local, Accessor::None, &contract);
                let mut frame = Frame::report(local, report);
                self.walk_block(&mut frame, &body.block);
                continue;
            }

            match self.guard.enter(local) {
                RecursionResult::Entered => {}
                denied => {
                    warn!(?denied, "local callable not analyzed");
                    continue;
                }
            }
            let outer_cut = self.guard.clear_cut();
            let mut frame = Frame::accumulate(local, true);
            self.walk_block(&mut frame, &body.block);
            self.guard.leave(local);
            let cut = self.guard.clear_cut();
            self.guard.restore_cut(outer_cut);
            if !cut {
                self.effects
                    .entry(local)
                    .or_insert_with(|| frame.into_effect());
            }
        }
    }

    /// Kinds that escape a local callable when it is invoked.
    fn effect_of(&mut self, local: DeclId) -> Arc<[ErrorEntry]> {
        let contract = self.cx.resolver().documented_errors(local);
        if contract.is_documented() {
            return contract.shared_entries();
        }
        if let Some(effect) = self.effects.get(&local) {
            return Arc::clone(effect);
        }

        let program = self.program;
        let Some(body) = &program.decl(local).body else {
            return no_effect();
        };
        match self.guard.enter(local) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => {
                trace!(decl = %program.decl(local).doc_id, "local callable cycle cut");
                return no_effect();
            }
            denied => {
                warn!(
                    decl = %program.decl(local).doc_id,
                    ?denied,
                    "local callable analysis abandoned"
                );
                return no_effect();
            }
        }

        let outer_cut = self.guard.clear_cut();
        let mut frame = Frame::accumulate(local, false);
        self.walk_block(&mut frame, &body.block);
        self.guard.leave(local);
        let cut = self.guard.clear_cut();
        let effect = frame.into_effect();

        // Below the outermost entry a cut result depends on where the cycle
        // was entered.
        if cut && self.guard.is_active() {
            self.guard.restore_cut(true);
        } else {
            self.guard.restore_cut(outer_cut);
            self.effects.insert(local, Arc::clone(&effect));
        }
        effect
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn walk_block(&mut self, frame: &mut Frame, block: &'a Block) {
        for stmt in &block.stmts {
            self.walk_stmt(frame, stmt);
        }
    }

    fn walk_stmt(&mut self, frame: &mut Frame, stmt: &'a Stmt) {
        if !self.depth.enter() {
            return;
        }
        let pushed = self.push_overlays(frame, stmt);

        match &stmt.kind {
            StmtKind::Expr(expr) => self.walk_expr(frame, expr, Intent::Value),
            StmtKind::Local { init, .. } => {
                if let Some(init) = init {
                    self.walk_expr(frame, init, Intent::Value);
                }
            }
            StmtKind::Block(block) => self.walk_block(frame, block),
            StmtKind::If {
                cond,
                then_block,
                else_block,
            } => {
                self.walk_expr(frame, cond, Intent::Value);
                self.walk_block(frame, then_block);
                if let Some(else_block) = else_block {
                    self.walk_block(frame, else_block);
                }
            }
            StmtKind::Loop { cond, body } => {
                if let Some(cond) = cond {
                    self.walk_expr(frame, cond, Intent::Value);
                }
                self.walk_block(frame, body);
            }
            StmtKind::ForEach {
                collection,
                implicit_calls,
                body,
            } => {
                self.walk_expr(frame, collection, Intent::Value);
                for &call in implicit_calls {
                    self.reference(frame, call, Intent::Invoke, stmt.span);
                }
                self.walk_block(frame, body);
            }
            StmtKind::Using {
                resource,
                dispose,
                body,
            } => {
                self.walk_expr(frame, resource, Intent::Value);
                self.walk_block(frame, body);
                if let Some(dispose) = *dispose {
                    self.reference(frame, dispose, Intent::Invoke, stmt.span);
                }
            }
            StmtKind::Return(expr) => {
                if let Some(expr) = expr {
                    self.walk_expr(frame, expr, Intent::Value);
                }
            }
            StmtKind::Throw(Some(expr)) => {
                self.walk_expr(frame, expr, Intent::Value);
                if let Some(ty) = expr.ty {
                    self.raise(frame, ty, stmt.span);
                }
            }
            StmtKind::Throw(None) => self.rethrow(frame, stmt.span),
            StmtKind::Try {
                block,
                catches,
                finally,
            } => self.walk_try(frame, block, catches, finally.as_ref()),
            StmtKind::LocalFunction(local) => self.enqueue(*local),
            StmtKind::Empty => {}
        }

        frame.overlays.truncate(frame.overlays.len() - pushed);
        self.depth.leave();
    }

    fn walk_try(
        &mut self,
        frame: &mut Frame,
        block: &'a Block,
        catches: &'a [CatchClause],
        finally: Option<&'a Block>,
    ) {
        let cx = self.cx;
        let scope = {
            let mut scratch = cx.sets().take();
            CatchScope::new(self.program, catches, &mut scratch)
        };
        frame.scopes.push(scope);
        self.walk_block(frame, block);
        let Some(scope) = frame.scopes.pop() else {
            unreachable!("catch scope pushed for this try is gone");
        };

        for (clause, rethrow) in catches.iter().zip(scope.into_rethrow_sets()) {
            frame.rethrow.push(rethrow);
            self.walk_block(frame, &clause.block);
            frame.rethrow.pop();
        }
        // Exceptions from `finally` are not caught by the clauses.
        if let Some(finally) = finally {
            self.walk_block(frame, finally);
        }
    }

    /// Push the inline overlays written above `stmt`; returns how many.
    fn push_overlays(&mut self, frame: &mut Frame, stmt: &Stmt) -> usize {
        let mut pushed = 0;
        for comment in &stmt.comments {
            match parse_inline_comment(&comment.text, comment.span.start) {
                None => {}
                Some(Err(error)) => {
                    if frame.reports {
                        let detail = error.kind.to_string();
                        self.overlay_diagnostic(
                            frame,
                            diagnostic_codes::ADJUSTMENT_SYNTAX_ERROR,
                            error.span,
                            &detail,
                        );
                    }
                }
                Some(Ok(rule)) => {
                    if frame.reports {
                        self.check_overlay(frame, &rule, comment.span);
                    }
                    frame.overlays.push(rule);
                    pushed += 1;
                }
            }
        }
        pushed
    }

    fn check_overlay(&mut self, frame: &Frame, rule: &InlineRule, span: Span) {
        let program = self.program;
        if let Some(target) = &rule.target
            && program.resolve_doc_id(target).is_none()
        {
            self.overlay_diagnostic(
                frame,
                diagnostic_codes::ADJUSTMENT_TARGET_UNRESOLVED,
                span,
                target,
            );
        }
        if program.resolve_doc_id(&rule.error_type).is_none() {
            self.overlay_diagnostic(
                frame,
                diagnostic_codes::ADJUSTMENT_EXCEPTION_UNRESOLVED,
                rule.error_span,
                &rule.error_type,
            );
        }
    }

    fn overlay_diagnostic(&mut self, frame: &Frame, code: u32, span: Span, arg: &str) {
        let file = self.program.decl(frame.decl).file.as_deref().unwrap_or_default();
        self.sink
            .report_diagnostic(Diagnostic::new(code, file, span, &[arg]));
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn walk_expr(&mut self, frame: &mut Frame, expr: &'a Expr, intent: Intent) {
        if !self.depth.enter() {
            return;
        }

        match &expr.kind {
            ExprKind::Member {
                target,
                receiver,
                args,
            } => {
                if let Some(receiver) = receiver {
                    self.walk_expr(frame, receiver, Intent::Value);
                }
                for arg in args {
                    self.walk_expr(frame, arg, Intent::Value);
                }
                self.reference(frame, *target, intent, expr.span);
            }
            ExprKind::Call { callee, args } => {
                self.walk_expr(frame, callee, Intent::Invoke);
                for arg in args {
                    self.walk_expr(frame, arg, Intent::Value);
                }
            }
            ExprKind::New { ctor, args } => {
                for arg in args {
                    self.walk_expr(frame, arg, Intent::Value);
                }
                self.reference(frame, *ctor, Intent::Invoke, expr.span);
            }
            ExprKind::Assign { op, target, value } => {
                self.walk_expr(frame, value, Intent::Value);
                self.walk_expr(frame, target, Intent::from_assign(*op));
            }
            ExprKind::Unary {
                operator, operand, ..
            } => {
                self.walk_expr(frame, operand, Intent::Value);
                if let Some(operator) = *operator {
                    self.reference(frame, operator, Intent::Invoke, expr.span);
                }
            }
            ExprKind::Binary {
                operator, lhs, rhs, ..
            } => {
                self.walk_expr(frame, lhs, Intent::Value);
                self.walk_expr(frame, rhs, Intent::Value);
                if let Some(operator) = *operator {
                    self.reference(frame, operator, Intent::Invoke, expr.span);
                }
            }
            ExprKind::Is { operand, .. } => self.walk_expr(frame, operand, Intent::Value),
            ExprKind::Variable {
                closure: Some(closure),
                ..
            } => self.reference(frame, *closure, intent, expr.span),
            ExprKind::Variable { closure: None, .. } | ExprKind::Literal(_) => {}
            ExprKind::Lambda(lambda) => {
                self.enqueue(*lambda);
                self.reference(frame, *lambda, intent, expr.span);
            }
            ExprKind::Throw(operand) => {
                self.walk_expr(frame, operand, Intent::Value);
                if let Some(ty) = operand.ty {
                    self.raise(frame, ty, expr.span);
                }
            }
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                self.walk_expr(frame, cond, Intent::Value);
                self.walk_expr(frame, then_expr, Intent::Value);
                self.walk_expr(frame, else_expr, Intent::Value);
            }
            ExprKind::Other(children) => {
                for child in children {
                    self.walk_expr(frame, child, Intent::Value);
                }
            }
        }

        self.depth.leave();
    }

    /// A reference to `target`, used as `intent`.
    fn reference(&mut self, frame: &mut Frame, target: DeclId, intent: Intent, span: Span) {
        let program = self.program;
        let cx = self.cx;
        let target = program.canonical(target);
        let (member, forced_side) = match program.accessor_owner(target) {
            Some((owner, side)) => (owner, Some(side)),
            None => (target, None),
        };
        let kind = program.decl(member).kind;
        let mut thrown = cx.sets().take();

        match kind {
            DeclKind::LocalFunction | DeclKind::Lambda => {
                let effect = self.effect_of(member);
                // Escaping kinds of an undocumented local are its own
                // throws, not calls through it.
                let documented = cx.resolver().documented_errors(member).is_documented();
                self.collect_thrown(frame, member, &effect, &[], documented, &mut thrown);
                if intent == Intent::Invoke {
                    self.propagate(frame, &thrown, member, Accessor::None, span);
                } else {
                    self.delegate_creation(frame, &thrown, member, span);
                }
            }
            DeclKind::Method | DeclKind::Constructor | DeclKind::Operator => {
                let contract = cx.resolver().documented_errors(member);
                self.collect_thrown(frame, member, contract.entries(), &[], true, &mut thrown);
                if intent == Intent::Invoke || kind != DeclKind::Method {
                    self.propagate(frame, &thrown, member, Accessor::None, span);
                } else {
                    self.delegate_creation(frame, &thrown, member, span);
                }
            }
            DeclKind::Property | DeclKind::Indexer | DeclKind::Event => {
                let sides: SmallVec<[Accessor; 2]> = match forced_side {
                    Some(side) => smallvec![side],
                    None => intent.sides(kind),
                };
                if sides.is_empty() {
                    return;
                }
                let contract = cx.resolver().documented_errors(member);
                self.collect_thrown(frame, member, contract.entries(), &sides, true, &mut thrown);
                let source_accessor = match sides.as_slice() {
                    [side] => *side,
                    _ => Accessor::None,
                };
                self.propagate(frame, &thrown, member, source_accessor, span);
            }
            _ => {}
        }
    }

    /// Kinds raised through `member` given its contract `entries`, after the
    /// statement's inline overlays, the accessor sides invoked, and
    /// intransitive suppression.
    fn collect_thrown(
        &self,
        frame: &Frame,
        member: DeclId,
        entries: &[ErrorEntry],
        sides: &[Accessor],
        suppress_intransitive: bool,
        out: &mut ErrorKindSet,
    ) {
        let program = self.program;
        let doc_id = program.decl(member).doc_id.as_str();
        let overlays: Vec<AdjustmentRule> = frame
            .overlays
            .iter()
            .filter(|rule| rule.applies_to(doc_id))
            .map(|rule| rule.to_rule(doc_id, &self.inline_origin))
            .collect();

        let mut adjusted = ErrorKindSet::new();
        let entries = if overlays.is_empty() {
            entries
        } else {
            adjusted.extend(entries.iter().copied());
            apply_to(program, &mut adjusted, &overlays, member, false);
            adjusted.entries()
        };

        let mut throw_helper: Option<bool> = None;
        for entry in entries {
            let applies =
                entry.accessor.is_none() || sides.is_empty() || sides.contains(&entry.accessor);
            if !applies {
                continue;
            }
            let ty = program.canonical(entry.ty);
            if suppress_intransitive && self.cx.is_intransitive(ty) {
                let helper = *throw_helper
                    .get_or_insert_with(|| self.cx.policy().is_throw_helper(program, member));
                if !helper {
                    trace!(
                        ty = %program.decl(ty).doc_id,
                        callee = doc_id,
                        "intransitive kind suppressed"
                    );
                    continue;
                }
            }
            out.add(ErrorEntry::unqualified(ty));
        }
    }

    // =========================================================================
    // Raising
    // =========================================================================

    /// Route through the catch scopes, innermost first. Returns whether some
    /// clause definitely catches `ty`.
    fn route(program: &Program, frame: &mut Frame, ty: DeclId) -> bool {
        frame
            .scopes
            .iter_mut()
            .rev()
            .any(|scope| scope.route(program, ty))
    }

    fn raise(&mut self, frame: &mut Frame, ty: DeclId, span: Span) {
        let program = self.program;
        let ty = program.canonical(ty);
        if Self::route(program, frame, ty) {
            return;
        }
        let residual = ErrorKindSet::from_entries([ErrorEntry::unqualified(ty)]);
        self.emit(frame, &residual, None, span);
    }

    fn rethrow(&mut self, frame: &mut Frame, span: Span) {
        let program = self.program;
        let Some(caught) = frame.rethrow.last() else {
            trace!("rethrow outside of a catch clause");
            return;
        };
        let kinds: SmallVec<[DeclId; 4]> = caught.iter().map(|entry| entry.ty).collect();
        let cx = self.cx;
        let mut residual = cx.sets().take();
        for ty in kinds {
            if !Self::route(program, frame, ty) {
                residual.add(ErrorEntry::unqualified(ty));
            }
        }
        self.emit(frame, &residual, None, span);
    }

    fn propagate(
        &mut self,
        frame: &mut Frame,
        thrown: &ErrorKindSet,
        source: DeclId,
        source_accessor: Accessor,
        span: Span,
    ) {
        if thrown.is_empty() {
            return;
        }
        let program = self.program;
        let cx = self.cx;
        let mut residual = cx.sets().take();
        for entry in thrown {
            if !Self::route(program, frame, entry.ty) {
                residual.add(entry);
            }
        }
        self.emit(frame, &residual, Some((source, source_accessor)), span);
    }

    /// Report or accumulate kinds that escape the body at `span`.
    fn emit(
        &mut self,
        frame: &mut Frame,
        residual: &ErrorKindSet,
        source: Option<(DeclId, Accessor)>,
        span: Span,
    ) {
        if residual.is_empty() {
            return;
        }
        let program = self.program;
        match &mut frame.mode {
            FrameMode::Accumulate(effect) => effect.extend(residual),
            FrameMode::Report(report) => {
                let uncovered = report.uncovered(program, residual);
                if uncovered.is_empty() {
                    return;
                }
                let mut finding = Finding::new(FindingKind::Undocumented, report.target, span)
                    .with_accessor(report.accessor)
                    .with_exceptions(uncovered);
                if let Some((source, accessor)) = source {
                    finding = finding.with_source(source, accessor);
                }
                debug!(
                    target = %program.decl(report.target).doc_id,
                    exceptions = finding.exceptions.len(),
                    "undocumented exception"
                );
                self.sink.report(finding);
            }
        }
    }

    /// Kinds that escape through a delegate or closure created at `span`.
    /// Catch scopes around the creation site do not apply.
    fn delegate_creation(
        &mut self,
        frame: &Frame,
        thrown: &ErrorKindSet,
        source: DeclId,
        span: Span,
    ) {
        if !frame.reports || thrown.is_empty() {
            return;
        }
        let program = self.program;
        let report = match &frame.mode {
            FrameMode::Report(report) => report,
            FrameMode::Accumulate(_) => match &self.root {
                Some(root) => root,
                None => return,
            },
        };
        let uncovered = report.uncovered(program, thrown);
        if uncovered.is_empty() {
            return;
        }
        let finding = Finding::new(FindingKind::DelegateCreation, report.target, span)
            .with_accessor(report.accessor)
            .with_exceptions(uncovered)
            .with_source(source, Accessor::None);
        self.sink.report(finding);
    }
}

/// Analyze one top-level declaration, reporting into `sink`.
pub fn analyze_declaration<S: FindingSink + ?Sized>(
    cx: &AnalysisContext,
    decl: DeclId,
    sink: &mut S,
) {
    FlowWalker::new(cx, sink).analyze(decl);
}
