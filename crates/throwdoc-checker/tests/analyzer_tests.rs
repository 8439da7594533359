use std::sync::Arc;
use throwdoc_checker::{
    AnalysisContext, Analyzer, AnalyzerConfig, CancellationToken, Cancelled, DocumentationCache,
    RuleSources,
};
use throwdoc_common::diagnostics::property_keys;
use throwdoc_common::{AccessorShape, Diagnostic, DiagnosticCategory, Span, diagnostic_codes};
use throwdoc_model::{Body, DocumentationMode, Expr, Program, ProgramBuilder, Stmt};
use throwdoc_rules::RuleSet;

fn analyzer(program: Program, rules: &str, config: AnalyzerConfig) -> Analyzer {
    let cx = AnalysisContext::new(
        Arc::new(program),
        RuleSources::project_only(RuleSet::parse("ExceptionAdjustments.txt", rules)),
        Arc::new(DocumentationCache::new()),
        &config,
    );
    Analyzer::new(cx, config)
}

fn run(analyzer: &Analyzer) -> Vec<Diagnostic> {
    analyzer
        .analyze(&CancellationToken::new())
        .expect("not cancelled")
}

fn codes(diagnostics: &[Diagnostic]) -> Vec<u32> {
    diagnostics.iter().map(|d| d.code).collect()
}

/// `N.Base.Parse` documents `IOException`; `N.Derived.Parse` overrides it
/// and documents `IOException` and `N.FormatError`.
fn override_program() -> Program {
    let mut b = ProgramBuilder::new();
    b.file("Parser.cs");
    let exception = b.class("System.Exception", None);
    b.class("System.IO.IOException", Some(exception));
    b.class("N.FormatError", Some(exception));
    let base = b.class("N.Base", None);
    let base_parse = b.method(base, "Parse");
    b.doc(base_parse, r#"<exception cref="T:System.IO.IOException"/>"#);
    let derived = b.class("N.Derived", Some(base));
    let parse = b.method(derived, "Parse");
    b.overrides(parse, base_parse);
    b.doc(
        parse,
        r#"<exception cref="T:System.IO.IOException"/><exception cref="T:N.FormatError"/>"#,
    );
    b.decl_mut(parse).span = Span::new(120, 125);
    b.finish()
}

#[test]
fn test_override_documenting_extra_kind_is_inconsistent() {
    let analyzer = analyzer(override_program(), "", AnalyzerConfig::default());
    let diagnostics = run(&analyzer);

    assert_eq!(codes(&diagnostics), vec![diagnostic_codes::INCONSISTENT_OVERRIDE_EXCEPTION]);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.file, "Parser.cs");
    assert_eq!(diagnostic.start, 120);
    assert_eq!(
        diagnostic.message_text,
        "'Derived.Parse' documents exception 'FormatError' which is not documented by 'Base.Parse'."
    );
    assert_eq!(diagnostic.properties[property_keys::EXCEPTIONS], "T:N.FormatError");
    assert_eq!(diagnostic.properties[property_keys::SOURCE], "M:N.Base.Parse");
}

/// `N.Base.P { get; set; }` documents `N.X`; `N.Derived.P { get; }`
/// overrides it and documents `N.X` and `extra`.
fn getter_override_program(extra: &str) -> Program {
    let mut b = ProgramBuilder::new();
    b.file("P.cs");
    let exception = b.class("System.Exception", None);
    b.class("N.X", Some(exception));
    b.class("N.Y", Some(exception));
    let base = b.class("N.Base", None);
    let base_p = b.property(base, "P", AccessorShape::PROPERTY);
    b.doc(base_p, r#"<exception cref="T:N.X"/>"#);
    let derived = b.class("N.Derived", Some(base));
    let p = b.property(derived, "P", AccessorShape::GET_ONLY);
    b.overrides(p, base_p);
    b.doc(p, &format!(r#"<exception cref="T:N.X"/>{extra}"#));
    b.finish()
}

#[test]
fn test_getter_only_override_matches_base_getter() {
    let analyzer = analyzer(getter_override_program(""), "", AnalyzerConfig::default());
    assert!(run(&analyzer).is_empty());
}

#[test]
fn test_getter_only_override_with_extra_kind_is_inconsistent() {
    let extra = r#"<exception cref="T:N.Y"/>"#;
    let analyzer = analyzer(getter_override_program(extra), "", AnalyzerConfig::default());
    let diagnostics = run(&analyzer);
    assert_eq!(codes(&diagnostics), vec![diagnostic_codes::INCONSISTENT_OVERRIDE_EXCEPTION]);
    assert_eq!(diagnostics[0].properties[property_keys::EXCEPTIONS], "T:N.Y");
}

#[test]
fn test_documentation_not_retained_stops_analysis() {
    let mut b = ProgramBuilder::new();
    b.documentation_mode(DocumentationMode::None);
    b.file("T.cs");
    let error = b.class("N.Error", None);
    let error_ctor = b.constructor(error, 0);
    let ty = b.class("N.T", None);
    let m = b.method(ty, "M");
    b.body(m, Body::new(vec![Stmt::throw_new(error_ctor, error)]));
    let analyzer = analyzer(b.finish(), "bad rule line\n", AnalyzerConfig::default());

    let diagnostics = run(&analyzer);
    assert_eq!(codes(&diagnostics), vec![diagnostic_codes::DOCUMENTATION_NOT_RETAINED]);
}

#[test]
fn test_project_rule_problems_are_reported() {
    let mut b = ProgramBuilder::new();
    b.file("T.cs");
    b.class("N.Error", None);
    let ty = b.class("N.T", None);
    b.method(ty, "Run");
    let rules = "M:N.T.Run\nM:N.Missing +T:N.Error\nM:N.T.Run +T:N.Nope\n";
    let analyzer = analyzer(b.finish(), rules, AnalyzerConfig::default());

    let diagnostics = run(&analyzer);
    let mut found = codes(&diagnostics);
    found.sort_unstable();
    assert_eq!(
        found,
        vec![
            diagnostic_codes::ADJUSTMENT_SYNTAX_ERROR,
            diagnostic_codes::ADJUSTMENT_TARGET_UNRESOLVED,
            diagnostic_codes::ADJUSTMENT_EXCEPTION_UNRESOLVED,
        ]
    );
    assert!(diagnostics.iter().all(|d| d.file == "ExceptionAdjustments.txt"));
}

fn delegate_program() -> Program {
    let mut b = ProgramBuilder::new();
    b.file("T.cs");
    let error = b.class("N.Error", None);
    let error_ctor = b.constructor(error, 0);
    let ty = b.class("N.T", None);
    let register = b.method(ty, "Register");
    let m = b.method(ty, "M");
    let lambda = b.lambda(m);
    b.body(lambda, Body::new(vec![Stmt::throw_new(error_ctor, error)]));
    b.body(
        m,
        Body::new(vec![Stmt::expr(Expr::call(register, vec![Expr::lambda(lambda)]))]),
    );
    b.finish()
}

#[test]
fn test_delegate_creation_is_hidden_by_default() {
    let analyzer = analyzer(delegate_program(), "", AnalyzerConfig::default());
    let diagnostics = run(&analyzer);

    assert_eq!(
        codes(&diagnostics),
        vec![diagnostic_codes::UNDOCUMENTED_EXCEPTION_DELEGATE_CREATION]
    );
    assert_eq!(diagnostics[0].category, DiagnosticCategory::Hidden);
}

#[test]
fn test_delegate_creation_can_be_reported() {
    let config = AnalyzerConfig {
        report_delegate_creation: true,
        ..AnalyzerConfig::default()
    };
    let analyzer = analyzer(delegate_program(), "", config);
    let diagnostics = run(&analyzer);

    assert_eq!(diagnostics[0].category, DiagnosticCategory::Info);
}

fn undocumented_throw_program() -> Program {
    let mut b = ProgramBuilder::new();
    b.file("T.cs");
    let error = b.class("N.Error", None);
    let error_ctor = b.constructor(error, 0);
    let ty = b.class("N.T", None);
    for (i, name) in ["A", "B", "C", "D"].into_iter().enumerate() {
        let m = b.method(ty, name);
        let start = 100 - 10 * i as u32;
        b.body(
            m,
            Body::new(vec![
                Stmt::throw_new(error_ctor, error).with_span(Span::new(start, start + 5)),
            ]),
        );
    }
    b.finish()
}

#[test]
fn test_severity_override_applies() {
    let config = AnalyzerConfig::from_json(r#"{ "severity": { "THROW001": "error" } }"#)
        .expect("valid config");
    let analyzer = analyzer(undocumented_throw_program(), "", config);
    let diagnostics = run(&analyzer);

    assert_eq!(diagnostics.len(), 4);
    assert!(diagnostics.iter().all(|d| d.category == DiagnosticCategory::Error));
}

#[test]
fn test_diagnostics_are_sorted_and_deterministic() {
    let analyzer = analyzer(undocumented_throw_program(), "", AnalyzerConfig::default());
    let first = run(&analyzer);
    let starts: Vec<u32> = first.iter().map(|d| d.start).collect();
    assert_eq!(starts, vec![70, 80, 90, 100]);

    for _ in 0..4 {
        assert_eq!(run(&analyzer), first);
    }
    let properties = &first[0].properties;
    assert_eq!(properties[property_keys::TARGET], "M:N.T.D");
    assert_eq!(properties[property_keys::EXCEPTIONS], "T:N.Error");
    assert_eq!(properties[property_keys::SOURCE], "");
}

#[test]
fn test_cancelled_run_reports_nothing() {
    let analyzer = analyzer(undocumented_throw_program(), "", AnalyzerConfig::default());
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert_eq!(analyzer.analyze(&cancel), Err(Cancelled));
}

#[test]
fn test_units_include_overrides_and_classes() {
    let analyzer = analyzer(override_program(), "", AnalyzerConfig::default());
    let program = analyzer.context().program();
    let names: Vec<&str> = analyzer
        .units()
        .into_iter()
        .map(|id| program.decl(id).doc_id.as_str())
        .collect();

    assert!(names.contains(&"M:N.Derived.Parse"));
    assert!(names.contains(&"T:N.Derived"));
    assert!(!names.contains(&"M:N.Base.Parse"));
}
