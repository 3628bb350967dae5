use indoc::indoc;

use crate::diagnostics::{Diagnostics, ErrorKind, ParserError};

fn sample() -> Diagnostics {
    Diagnostics::from(vec![
        ParserError::syntax(5, "digit"),
        ParserError::semantic(9, "value out of range"),
    ])
}

#[test]
fn syntax_message_names_expectation() {
    let error = ParserError::syntax(3, "`;`");

    assert_eq!(error.message(), "expected `;`");
    assert_eq!(error.kind(), ErrorKind::Syntax);
    assert_eq!(error.to_string(), "expected `;` at offset 3");
    assert!(!error.is_fatal());
    assert!(ParserError::grammar(0, "broken").is_fatal());
}

#[test]
fn collection_keeps_order() {
    let mut diagnostics = Diagnostics::new();
    assert!(diagnostics.is_empty());

    diagnostics.push(ParserError::syntax(1, "a"));
    diagnostics.extend([ParserError::syntax(0, "b")]);

    let positions: Vec<_> = diagnostics.iter().map(ParserError::pos).collect();
    assert_eq!(positions, [1, 0]);
    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.error_count(), 2);
}

#[test]
fn filter_by_kind() {
    let diagnostics = sample();

    let semantic = diagnostics.filter_by_kind(ErrorKind::Semantic);

    assert_eq!(semantic.len(), 1);
    assert_eq!(semantic[0].pos(), 9);
}

#[test]
fn plain_rendering() {
    let rendered = sample().printer().render();

    assert_eq!(
        rendered,
        indoc! {"
            syntax: expected digit at offset 5
            semantic: value out of range at offset 9"}
    );
}

#[test]
fn source_rendering_points_at_offset() {
    let rendered = sample().render("[1],[x],[3] 99");

    assert!(rendered.contains("error: expected digit"));
    assert!(rendered.contains("[1],[x],[3] 99"));
    assert!(rendered.contains("error: value out of range"));
}

#[test]
fn source_rendering_with_path() {
    let diagnostics = Diagnostics::from(vec![ParserError::syntax(2, "`]`")]);

    let rendered = diagnostics.printer().source("[1").path("list.txt").render();

    assert!(rendered.contains("list.txt"));
    assert!(rendered.contains("expected `]`"));
}

#[test]
fn offset_inside_multibyte_character() {
    let diagnostics = Diagnostics::from(vec![ParserError::syntax(1, "letter")]);

    let rendered = diagnostics.render("é");

    assert!(rendered.contains("expected letter"));
}

#[test]
fn serializes_to_json() {
    let json = serde_json::to_value(sample()).unwrap();

    assert_eq!(
        json,
        serde_json::json!([
            { "pos": 5, "kind": "syntax", "message": "expected digit" },
            { "pos": 9, "kind": "semantic", "message": "value out of range" }
        ])
    );
}
