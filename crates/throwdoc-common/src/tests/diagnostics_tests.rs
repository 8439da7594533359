use super::*;

#[test]
fn test_new_formats_template_and_uses_table_category() {
    let diag = Diagnostic::new(
        diagnostic_codes::UNDOCUMENTED_EXCEPTION,
        "a.cs",
        Span::new(10, 14),
        &["IOException", "Reader.Read()"],
    );

    assert_eq!(diag.category, DiagnosticCategory::Warning);
    assert_eq!(diag.start, 10);
    assert_eq!(diag.length, 4);
    assert_eq!(
        diag.message_text,
        "Exception 'IOException' may propagate out of 'Reader.Read()' but is not documented."
    );
    assert_eq!(diag.id(), "THROW001");
}

#[test]
fn test_delegate_creation_is_hidden_by_default() {
    let message =
        get_diagnostic_message(diagnostic_codes::UNDOCUMENTED_EXCEPTION_DELEGATE_CREATION)
            .expect("delegate creation message should exist");
    assert_eq!(message.category, DiagnosticCategory::Hidden);
}

#[test]
fn test_empty_properties_are_skipped() {
    let diag = Diagnostic::new(diagnostic_codes::ADJUSTMENT_SYNTAX_ERROR, "f", Span::at(0), &["x"])
        .with_property(property_keys::TARGET, "M:N.T.M")
        .with_property(property_keys::ACCESSOR, "");

    assert_eq!(diag.property(property_keys::TARGET), Some("M:N.T.M"));
    assert_eq!(diag.property(property_keys::ACCESSOR), None);
}

#[test]
fn test_code_for_id_is_case_insensitive() {
    assert_eq!(
        code_for_id("throw003"),
        Some(diagnostic_codes::INCONSISTENT_OVERRIDE_EXCEPTION)
    );
    assert_eq!(code_for_id("THROW999"), None);
}
