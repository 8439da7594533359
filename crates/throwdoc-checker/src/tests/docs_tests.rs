use super::*;

#[test]
fn fragment_exception_and_inheritdoc_tags() {
    let tags = parse_fragment(
        r#"<summary>Reads.</summary>
           <exception cref="T:N.IoError">On failure.</exception>
           <exception cref="N.FormatError" accessor="set"/>
           <inheritdoc/>
           <inheritdoc cref="M:N.Base.Run"/>"#,
    );

    assert_eq!(
        tags.exceptions,
        vec![
            ExceptionTag {
                cref: "T:N.IoError".to_string(),
                accessor: None,
            },
            ExceptionTag {
                cref: "N.FormatError".to_string(),
                accessor: Some("set".to_string()),
            },
        ]
    );
    assert_eq!(tags.inherit, vec![None, Some("M:N.Base.Run".to_string())]);
}

#[test]
fn exception_without_cref_is_ignored() {
    let tags = parse_fragment("<exception>no target</exception>");
    assert!(tags.is_empty());
}

#[test]
fn malformed_fragment_yields_no_tags() {
    let tags = parse_fragment(r#"<exception cref="T:N.E">unclosed"#);
    assert!(tags.is_empty());
}

#[test]
fn member_file_is_keyed_by_member_name() {
    let docs = ModuleDocs::parse(
        r#"<?xml version="1.0"?>
        <doc>
          <assembly><name>Lib</name></assembly>
          <members>
            <member name="M:Lib.Reader.Read">
              <exception cref="T:Lib.IoError"/>
            </member>
            <member name="M:Lib.Reader.Close"><summary>Closes.</summary></member>
          </members>
        </doc>"#,
    )
    .expect("well-formed file");

    assert_eq!(docs.len(), 2);
    assert_eq!(docs.member("M:Lib.Reader.Read").map(|t| t.exceptions.len()), Some(1));
    assert!(docs.member("M:Lib.Reader.Close").is_some_and(DocTags::is_empty));
    assert!(docs.member("M:Lib.Reader.Missing").is_none());
}

#[test]
fn legacy_markup_is_stripped_and_retried() {
    let xml = r#"<doc><members>
        <member name="M:Lib.T.M">
          <summary>First<br>second<p>para</summary>
          <exception cref="T:Lib.E"><span class="x">when</span> bad</exception>
        </member>
    </members></doc>"#;

    let docs = ModuleDocs::parse(xml).expect("recovered after stripping markup");
    let tags = docs.member("M:Lib.T.M").expect("member present");
    assert_eq!(tags.exceptions[0].cref, "T:Lib.E");
}

#[test]
fn malformed_file_without_markup_is_an_error() {
    assert!(ModuleDocs::parse("<doc><members><member name='x'>").is_err());
}

#[test]
fn strip_keeps_other_tags_and_text() {
    assert_eq!(
        strip_inline_markup("<a>x<br/>y<P>z</p><pre>k</pre><span>s</span></a>"),
        "<a>xyz<pre>k</pre>s</a>"
    );
}
