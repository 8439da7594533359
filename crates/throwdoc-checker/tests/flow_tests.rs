use std::sync::Arc;
use throwdoc_checker::{
    AnalysisContext, AnalyzerConfig, DeclarationReport, DocumentationCache, Finding, FindingKind,
    FnThrowHelperPolicy, RuleSources, analyze_declaration,
};
use throwdoc_common::{Accessor, AccessorShape, Span, diagnostic_codes};
use throwdoc_model::{
    AssignOp, Body, CatchClause, DeclId, Expr, Program, ProgramBuilder, Stmt, StmtKind,
};
use throwdoc_rules::RuleSet;

struct World {
    b: ProgramBuilder,
    exception: DeclId,
    io: DeclId,
    io_ctor: DeclId,
    format: DeclId,
    format_ctor: DeclId,
    argument: DeclId,
    argument_ctor: DeclId,
    argument_null: DeclId,
    ty: DeclId,
}

fn world() -> World {
    let mut b = ProgramBuilder::new();
    b.file("T.cs");
    let exception = b.class("System.Exception", None);
    let io = b.class("System.IO.IOException", Some(exception));
    let io_ctor = b.constructor(io, 0);
    let format = b.class("System.FormatException", Some(exception));
    let format_ctor = b.constructor(format, 0);
    let argument = b.class("System.ArgumentException", Some(exception));
    let argument_ctor = b.constructor(argument, 0);
    let argument_null = b.class("System.ArgumentNullException", Some(argument));
    let ty = b.class("N.T", None);
    World {
        b,
        exception,
        io,
        io_ctor,
        format,
        format_ctor,
        argument,
        argument_ctor,
        argument_null,
        ty,
    }
}

fn context(program: Program, rules: &str) -> AnalysisContext {
    AnalysisContext::new(
        Arc::new(program),
        RuleSources::project_only(RuleSet::parse("ExceptionAdjustments.txt", rules)),
        Arc::new(DocumentationCache::new()),
        &AnalyzerConfig::default(),
    )
}

fn findings(cx: &AnalysisContext, decl: DeclId) -> Vec<Finding> {
    let mut report = DeclarationReport::default();
    analyze_declaration(cx, decl, &mut report);
    report.findings
}

fn documents(b: &mut ProgramBuilder, decl: DeclId, types: &[&str]) {
    let xml: String = types
        .iter()
        .map(|ty| format!(r#"<exception cref="{ty}"/>"#))
        .collect();
    b.doc(decl, &xml);
}

/// `target();` with the reference at `start`.
fn call_at(target: DeclId, start: u32) -> Stmt {
    let callee = Expr::member(target).with_span(Span::new(start, start + 6));
    Stmt::expr(Expr::invoke(callee, Vec::new()))
}

fn call(target: DeclId) -> Stmt {
    Stmt::expr(Expr::call(target, Vec::new()))
}

// =============================================================================
// Catch scopes
// =============================================================================

#[test]
fn test_catch_suppresses_documented_callee_exception() {
    let mut w = world();
    let callee = w.b.method(w.ty, "Callee");
    documents(&mut w.b, callee, &["T:System.IO.IOException"]);
    let m = w.b.method(w.ty, "M");
    w.b.body(
        m,
        Body::new(vec![Stmt::try_catch(
            vec![call(callee)],
            vec![CatchClause::typed(w.io, Vec::new())],
        )]),
    );
    let cx = context(w.b.finish(), "");

    assert!(findings(&cx, m).is_empty());
}

#[test]
fn test_uncaught_kind_is_the_only_residual() {
    let mut w = world();
    let callee = w.b.method(w.ty, "Callee");
    documents(
        &mut w.b,
        callee,
        &["T:System.IO.IOException", "T:System.FormatException"],
    );
    let m = w.b.method(w.ty, "M");
    w.b.body(
        m,
        Body::new(vec![Stmt::try_catch(
            vec![call_at(callee, 10)],
            vec![CatchClause::typed(w.io, Vec::new())],
        )]),
    );
    let cx = context(w.b.finish(), "");

    let found = findings(&cx, m);
    assert_eq!(found.len(), 1);
    let finding = &found[0];
    assert_eq!(finding.kind, FindingKind::Undocumented);
    assert_eq!(finding.target, m);
    assert_eq!(finding.exceptions.as_slice(), &[w.format]);
    assert_eq!(finding.source, Some(callee));
    assert_eq!(finding.span, Span::new(10, 16));
}

#[test]
fn test_documented_base_type_covers_subclass() {
    let mut w = world();
    let callee = w.b.method(w.ty, "Callee");
    documents(&mut w.b, callee, &["T:System.ArgumentNullException"]);
    let m = w.b.method(w.ty, "M");
    documents(&mut w.b, m, &["T:System.Exception"]);
    w.b.body(
        m,
        Body::new(vec![
            Stmt::throw_new(w.io_ctor, w.io),
            Stmt::throw_new(w.format_ctor, w.format),
        ]),
    );
    let cx = context(w.b.finish(), "");

    assert!(findings(&cx, m).is_empty());
}

#[test]
fn test_filter_narrows_rethrown_kinds() {
    let mut w = world();
    let a = w.b.class("N.AError", Some(w.exception));
    let b_error = w.b.class("N.BError", Some(w.exception));
    let c = w.b.class("N.CError", Some(w.exception));
    let callee = w.b.method(w.ty, "Callee");
    documents(&mut w.b, callee, &["T:N.AError", "T:N.BError", "T:N.CError"]);

    // try {
    //     try { Callee(); }
    //     catch (Exception e) when (e is AError || e is BError) { throw; }
    // } catch (AError) { }
    let filter = Expr::or(
        Expr::is_type(Expr::variable("e"), a),
        Expr::is_type(Expr::variable("e"), b_error),
    );
    let inner = Stmt::try_catch(
        vec![call_at(callee, 10)],
        vec![CatchClause::filtered(
            w.exception,
            "e",
            filter,
            vec![Stmt::rethrow().with_span(Span::new(20, 26))],
        )],
    );
    let m = w.b.method(w.ty, "M");
    w.b.body(
        m,
        Body::new(vec![Stmt::try_catch(
            vec![inner],
            vec![CatchClause::typed(a, Vec::new())],
        )]),
    );
    let cx = context(w.b.finish(), "");

    let found = findings(&cx, m);
    assert_eq!(found.len(), 2, "{found:?}");
    // CError is not caught by the filtered clause.
    assert_eq!(found[0].exceptions.as_slice(), &[c]);
    assert_eq!(found[0].span, Span::new(10, 16));
    // The rethrow raises exactly AError and BError; AError is caught outside.
    assert_eq!(found[1].exceptions.as_slice(), &[b_error]);
    assert_eq!(found[1].span, Span::new(20, 26));
    assert_eq!(found[1].source, None);
}

#[test]
fn test_catch_all_rethrow_raises_what_it_caught() {
    let mut w = world();
    let m = w.b.method(w.ty, "M");
    w.b.body(
        m,
        Body::new(vec![Stmt::try_catch(
            vec![Stmt::throw_new(w.io_ctor, w.io)],
            vec![CatchClause::catch_all(vec![Stmt::rethrow()])],
        )]),
    );
    let cx = context(w.b.finish(), "");

    let found = findings(&cx, m);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].exceptions.as_slice(), &[w.io]);
}

#[test]
fn test_always_true_filter_catches() {
    let mut w = world();
    let m = w.b.method(w.ty, "M");
    w.b.body(
        m,
        Body::new(vec![Stmt::try_catch(
            vec![Stmt::throw_new(w.io_ctor, w.io)],
            vec![CatchClause::filtered(
                w.io,
                "e",
                Expr::or(Expr::variable("retry"), Expr::bool(true)),
                Vec::new(),
            )],
        )]),
    );
    let cx = context(w.b.finish(), "");

    assert!(findings(&cx, m).is_empty());
}

#[test]
fn test_opaque_filter_does_not_catch() {
    let mut w = world();
    let m = w.b.method(w.ty, "M");
    w.b.body(
        m,
        Body::new(vec![Stmt::try_catch(
            vec![Stmt::throw_new(w.io_ctor, w.io)],
            vec![CatchClause::filtered(
                w.io,
                "e",
                Expr::variable("retry"),
                Vec::new(),
            )],
        )]),
    );
    let cx = context(w.b.finish(), "");

    assert_eq!(findings(&cx, m).len(), 1);
}

#[test]
fn test_finally_is_outside_the_catch_scope() {
    let mut w = world();
    let callee = w.b.method(w.ty, "Callee");
    documents(&mut w.b, callee, &["T:System.IO.IOException"]);
    let m = w.b.method(w.ty, "M");
    w.b.body(
        m,
        Body::new(vec![Stmt::try_finally(
            Vec::new(),
            vec![CatchClause::typed(w.io, Vec::new())],
            vec![call(callee)],
        )]),
    );
    let cx = context(w.b.finish(), "");

    let found = findings(&cx, m);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].exceptions.as_slice(), &[w.io]);
}

// =============================================================================
// Access intent
// =============================================================================

#[test]
fn test_property_access_invokes_the_matching_accessor() {
    let mut w = world();
    let get_error = w.b.class("N.GetError", Some(w.exception));
    let set_error = w.b.class("N.SetError", Some(w.exception));
    let p = w.b.property(w.ty, "P", AccessorShape::PROPERTY);
    w.b.doc(
        p,
        r#"<exception cref="T:N.GetError" accessor="get"/><exception cref="T:N.SetError" accessor="set"/>"#,
    );

    let read = w.b.method(w.ty, "Read");
    w.b.body(read, Body::expression(Expr::member(p)));
    let write = w.b.method(w.ty, "Write");
    w.b.body(
        write,
        Body::expression(Expr::assign(AssignOp::Plain, Expr::member(p), Expr::bool(true))),
    );
    let update = w.b.method(w.ty, "Update");
    w.b.body(
        update,
        Body::expression(Expr::assign(
            AssignOp::Compound,
            Expr::member(p),
            Expr::bool(true),
        )),
    );
    let cx = context(w.b.finish(), "");

    let found = findings(&cx, read);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].exceptions.as_slice(), &[get_error]);
    assert_eq!(found[0].source_accessor, Accessor::Get);

    let found = findings(&cx, write);
    assert_eq!(found[0].exceptions.as_slice(), &[set_error]);
    assert_eq!(found[0].source_accessor, Accessor::Set);

    let found = findings(&cx, update);
    assert_eq!(found[0].exceptions.as_slice(), &[get_error, set_error]);
    assert_eq!(found[0].source_accessor, Accessor::None);
}

#[test]
fn test_event_subscription_invokes_add() {
    let mut w = world();
    let add_error = w.b.class("N.AddError", Some(w.exception));
    let changed = w.b.event(w.ty, "Changed");
    w.b.doc(changed, r#"<exception cref="T:N.AddError" accessor="add"/>"#);

    let subscribe = w.b.method(w.ty, "Subscribe");
    w.b.body(
        subscribe,
        Body::expression(Expr::assign(
            AssignOp::Add,
            Expr::member(changed),
            Expr::variable("handler"),
        )),
    );
    let unsubscribe = w.b.method(w.ty, "Unsubscribe");
    w.b.body(
        unsubscribe,
        Body::expression(Expr::assign(
            AssignOp::Subtract,
            Expr::member(changed),
            Expr::variable("handler"),
        )),
    );
    let cx = context(w.b.finish(), "");

    let found = findings(&cx, subscribe);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].exceptions.as_slice(), &[add_error]);
    assert_eq!(found[0].source_accessor, Accessor::Add);
    assert!(findings(&cx, unsubscribe).is_empty());
}

#[test]
fn test_accessor_body_is_checked_against_its_side() {
    let mut w = world();
    let p = w.b.property(w.ty, "P", AccessorShape::PROPERTY);
    w.b.doc(
        p,
        r#"<exception cref="T:System.IO.IOException" accessor="set"/>"#,
    );
    let getter = w.b.accessor(p, Accessor::Get).expect("getter");
    let setter = w.b.accessor(p, Accessor::Set).expect("setter");
    w.b.body(getter, Body::new(vec![Stmt::throw_new(w.io_ctor, w.io)]));
    w.b.body(setter, Body::new(vec![Stmt::throw_new(w.io_ctor, w.io)]));
    let cx = context(w.b.finish(), "");

    let found = findings(&cx, getter);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].target, p);
    assert_eq!(found[0].accessor, Accessor::Get);
    assert!(findings(&cx, setter).is_empty());
}

#[test]
fn test_foreach_and_using_invoke_implicit_members() {
    let mut w = world();
    let move_next = w.b.method(w.ty, "MoveNext");
    documents(&mut w.b, move_next, &["T:System.IO.IOException"]);
    let dispose = w.b.method(w.ty, "Dispose");
    documents(&mut w.b, dispose, &["T:System.FormatException"]);

    let m = w.b.method(w.ty, "M");
    w.b.body(
        m,
        Body::new(vec![
            Stmt::new(StmtKind::ForEach {
                collection: Expr::variable("items"),
                implicit_calls: vec![move_next],
                body: Default::default(),
            }),
            Stmt::new(StmtKind::Using {
                resource: Expr::variable("stream"),
                dispose: Some(dispose),
                body: Default::default(),
            }),
        ]),
    );
    let cx = context(w.b.finish(), "");

    let found: Vec<DeclId> = findings(&cx, m)
        .iter()
        .flat_map(|finding| finding.exceptions.iter().copied())
        .collect();
    assert_eq!(found, vec![w.io, w.format]);
}

// =============================================================================
// Intransitive kinds and throw-helpers
// =============================================================================

#[test]
fn test_intransitive_kinds_do_not_propagate_through_calls() {
    let mut w = world();
    let validate = w.b.method(w.ty, "Validate");
    documents(&mut w.b, validate, &["T:System.ArgumentNullException"]);
    let throw_helper = w.b.method(w.ty, "ThrowInvalid");
    documents(&mut w.b, throw_helper, &["T:System.ArgumentException"]);

    let quiet = w.b.method(w.ty, "Quiet");
    w.b.body(quiet, Body::new(vec![call(validate)]));
    let helper_call = w.b.method(w.ty, "HelperCall");
    w.b.body(helper_call, Body::new(vec![call(throw_helper)]));
    let explicit = w.b.method(w.ty, "Explicit");
    w.b.body(
        explicit,
        Body::new(vec![Stmt::throw_new(w.argument_ctor, w.argument)]),
    );
    let cx = context(w.b.finish(), "");

    assert!(findings(&cx, quiet).is_empty());
    assert_eq!(
        findings(&cx, helper_call)[0].exceptions.as_slice(),
        &[w.argument]
    );
    assert_eq!(
        findings(&cx, explicit)[0].exceptions.as_slice(),
        &[w.argument]
    );
}

fn every_callee_is_a_helper(_: &Program, _: DeclId) -> bool {
    true
}

#[test]
fn test_throw_helper_policy_is_pluggable() {
    let mut w = world();
    let validate = w.b.method(w.ty, "Validate");
    documents(&mut w.b, validate, &["T:System.ArgumentNullException"]);
    let m = w.b.method(w.ty, "M");
    w.b.body(m, Body::new(vec![call(validate)]));
    let cx = context(w.b.finish(), "")
        .with_policy(Arc::new(FnThrowHelperPolicy(every_callee_is_a_helper)));

    let found = findings(&cx, m);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].exceptions.as_slice(), &[w.argument_null]);
}

#[test]
fn test_thrower_flag_forces_a_helper() {
    let mut w = world();
    let fail = w.b.method(w.ty, "Fail");
    documents(&mut w.b, fail, &["T:System.ArgumentException"]);
    let m = w.b.method(w.ty, "M");
    w.b.body(m, Body::new(vec![call(fail)]));
    let cx = context(
        w.b.finish(),
        "M:N.T.Fail $thrower +T:System.ArgumentException\n",
    );

    assert_eq!(findings(&cx, m).len(), 1);
}

// =============================================================================
// Local callables and delegates
// =============================================================================

#[test]
fn test_undocumented_local_function_propagates_its_throws() {
    let mut w = world();
    let m = w.b.method(w.ty, "M");
    let helper = w.b.local_function(m, "helper");
    w.b.body(helper, Body::new(vec![Stmt::throw_new(w.io_ctor, w.io)]));
    let invoke_helper = || {
        Stmt::expr(Expr::invoke(
            Expr::closure_variable("helper", helper),
            Vec::new(),
        ))
    };
    w.b.body(
        m,
        Body::new(vec![
            Stmt::new(StmtKind::LocalFunction(helper)),
            Stmt::try_catch(vec![invoke_helper()], vec![CatchClause::typed(w.io, Vec::new())]),
            invoke_helper(),
        ]),
    );
    let cx = context(w.b.finish(), "");

    let found = findings(&cx, m);
    assert_eq!(found.len(), 1, "{found:?}");
    assert_eq!(found[0].target, m);
    assert_eq!(found[0].source, Some(helper));
    assert_eq!(found[0].exceptions.as_slice(), &[w.io]);
}

#[test]
fn test_mutually_recursive_local_functions_terminate() {
    let mut w = world();
    let m = w.b.method(w.ty, "M");
    let f = w.b.local_function(m, "f");
    let g = w.b.local_function(m, "g");
    let invoke = |local: DeclId, name: &str| {
        Stmt::expr(Expr::invoke(Expr::closure_variable(name, local), Vec::new()))
    };
    w.b.body(f, Body::new(vec![invoke(g, "g")]));
    w.b.body(
        g,
        Body::new(vec![invoke(f, "f"), Stmt::throw_new(w.io_ctor, w.io)]),
    );
    w.b.body(
        m,
        Body::new(vec![
            Stmt::new(StmtKind::LocalFunction(f)),
            Stmt::new(StmtKind::LocalFunction(g)),
            invoke(f, "f"),
        ]),
    );
    let cx = context(w.b.finish(), "");

    let found = findings(&cx, m);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].source, Some(f));
    assert_eq!(found[0].exceptions.as_slice(), &[w.io]);
}

#[test]
fn test_documented_local_function_is_verified_on_its_own() {
    let mut w = world();
    let m = w.b.method(w.ty, "M");
    let checked = w.b.local_function(m, "checked");
    documents(&mut w.b, checked, &["T:System.IO.IOException"]);
    w.b.body(
        checked,
        Body::new(vec![
            Stmt::throw_new(w.io_ctor, w.io),
            Stmt::throw_new(w.format_ctor, w.format),
        ]),
    );
    w.b.body(
        m,
        Body::new(vec![
            Stmt::new(StmtKind::LocalFunction(checked)),
            Stmt::try_catch(
                vec![Stmt::expr(Expr::invoke(
                    Expr::closure_variable("checked", checked),
                    Vec::new(),
                ))],
                vec![CatchClause::typed(w.io, Vec::new())],
            ),
        ]),
    );
    let cx = context(w.b.finish(), "");

    let found = findings(&cx, m);
    assert_eq!(found.len(), 1, "{found:?}");
    assert_eq!(found[0].target, checked);
    assert_eq!(found[0].exceptions.as_slice(), &[w.format]);
}

#[test]
fn test_lambda_creation_reports_delegate_creation() {
    let mut w = world();
    let register = w.b.method(w.ty, "Register");
    let m = w.b.method(w.ty, "M");
    let lambda = w.b.lambda(m);
    w.b.body(lambda, Body::new(vec![Stmt::throw_new(w.io_ctor, w.io)]));
    // The catch around the creation site does not apply to the closure.
    w.b.body(
        m,
        Body::new(vec![Stmt::try_catch(
            vec![Stmt::expr(Expr::call(register, vec![Expr::lambda(lambda)]))],
            vec![CatchClause::typed(w.io, Vec::new())],
        )]),
    );
    let cx = context(w.b.finish(), "");

    let found = findings(&cx, m);
    assert_eq!(found.len(), 1, "{found:?}");
    assert_eq!(found[0].kind, FindingKind::DelegateCreation);
    assert_eq!(found[0].target, m);
    assert_eq!(found[0].source, Some(lambda));
}

#[test]
fn test_method_group_value_is_delegate_creation() {
    let mut w = world();
    let callee = w.b.method(w.ty, "Callee");
    documents(&mut w.b, callee, &["T:System.IO.IOException"]);
    let register = w.b.method(w.ty, "Register");
    let m = w.b.method(w.ty, "M");
    w.b.body(
        m,
        Body::new(vec![Stmt::expr(Expr::call(
            register,
            vec![Expr::member(callee)],
        ))]),
    );
    let cx = context(w.b.finish(), "");

    let found = findings(&cx, m);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, FindingKind::DelegateCreation);
    assert_eq!(found[0].source, Some(callee));
}

// =============================================================================
// Constructors
// =============================================================================

#[test]
fn test_implicit_constructor_propagates_base_constructor() {
    let mut w = world();
    let base = w.b.class("N.Base", None);
    let base_ctor = w.b.constructor(base, 0);
    documents(&mut w.b, base_ctor, &["T:System.IO.IOException"]);
    let derived = w.b.class("N.Derived", Some(base));
    let cx = context(w.b.finish(), "");

    let found = findings(&cx, derived);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].target, derived);
    assert_eq!(found[0].source, Some(base_ctor));
    assert_eq!(found[0].exceptions.as_slice(), &[w.io]);
}

#[test]
fn test_constructor_without_initializer_calls_base() {
    let mut w = world();
    let base = w.b.class("N.Base", None);
    let base_ctor = w.b.constructor(base, 0);
    documents(&mut w.b, base_ctor, &["T:System.IO.IOException"]);

    let plain = w.b.class("N.Plain", Some(base));
    let plain_ctor = w.b.constructor(plain, 0);
    w.b.body(plain_ctor, Body::new(Vec::new()));

    let chained = w.b.class("N.Chained", Some(base));
    let other_base_ctor = w.b.constructor(base, 1);
    let chained_ctor = w.b.constructor(chained, 0);
    w.b.body(
        chained_ctor,
        Body::new(Vec::new()).with_initializer(Expr::call(other_base_ctor, Vec::new())),
    );
    let cx = context(w.b.finish(), "");

    let found = findings(&cx, plain_ctor);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].target, plain_ctor);
    assert!(findings(&cx, chained_ctor).is_empty());
    // Classes with explicit constructors get no implicit check.
    assert!(findings(&cx, plain).is_empty());
}

// =============================================================================
// Inline overlays
// =============================================================================

#[test]
fn test_inline_overlay_applies_to_one_statement() {
    let mut w = world();
    w.b.class("N.CustomError", Some(w.exception));
    let callee = w.b.method(w.ty, "Callee");
    let m = w.b.method(w.ty, "M");
    w.b.body(
        m,
        Body::new(vec![
            call_at(callee, 10).with_comment(" ExceptionAdjustment: -T:N.CustomError"),
            call_at(callee, 30),
        ]),
    );
    let cx = context(w.b.finish(), "M:N.T.Callee +T:N.CustomError\n");

    let found = findings(&cx, m);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].span, Span::new(30, 36));
}

#[test]
fn test_targeted_inline_overlay_only_affects_its_target() {
    let mut w = world();
    let callee = w.b.method(w.ty, "Callee");
    documents(&mut w.b, callee, &["T:System.IO.IOException"]);
    let other = w.b.method(w.ty, "Other");
    documents(&mut w.b, other, &["T:System.IO.IOException"]);
    let m = w.b.method(w.ty, "M");
    w.b.body(
        m,
        Body::new(vec![
            Stmt::expr(Expr::binary(
                throwdoc_model::BinaryOp::Arithmetic,
                Expr::call(callee, Vec::new()),
                Expr::call(other, Vec::new()),
            ))
            .with_comment("ExceptionAdjustment: M:N.T.Callee -T:System.IO.IOException"),
        ]),
    );
    let cx = context(w.b.finish(), "");

    let found = findings(&cx, m);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].source, Some(other));
}

#[test]
fn test_malformed_inline_overlay_is_reported() {
    let mut w = world();
    let callee = w.b.method(w.ty, "Callee");
    let m = w.b.method(w.ty, "M");
    w.b.body(
        m,
        Body::new(vec![
            call(callee).with_comment(" ExceptionAdjustment: M:N.T.Callee"),
            call(callee).with_comment(" ExceptionAdjustment: +T:N.Missing"),
        ]),
    );
    let cx = context(w.b.finish(), "");

    let mut report = DeclarationReport::default();
    analyze_declaration(&cx, m, &mut report);
    let codes: Vec<u32> = report.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(
        codes,
        vec![
            diagnostic_codes::ADJUSTMENT_SYNTAX_ERROR,
            diagnostic_codes::ADJUSTMENT_EXCEPTION_UNRESOLVED,
        ]
    );
    assert!(report.findings.is_empty());
}
