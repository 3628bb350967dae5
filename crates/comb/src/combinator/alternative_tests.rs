use crate::test_utils::{errors, rest, traced};
use crate::{
    alpha1, digit1, first_successful, literal, many0, map, no_way_back, run, sequence,
};

fn concat(parts: Vec<String>) -> String {
    parts.concat()
}

#[test]
fn first_success_wins() {
    let parser = first_successful(vec![literal("a"), literal("b"), literal("bc")]);

    let parsed = run(&parser, "bc").unwrap();

    assert_eq!(parsed.output.as_deref(), Some("b"));
    assert_eq!(rest(&parsed), "c");
}

#[test]
fn backtracks_without_commit_point() {
    let parser = first_successful(vec![
        map(sequence(vec![literal("a"), digit1()]), concat),
        alpha1(),
    ]);

    let parsed = run(&parser, "abc").unwrap();

    assert_eq!(parsed.output.as_deref(), Some("abc"));
    assert!(parsed.errors.is_empty());
}

#[test]
fn commit_point_stops_siblings() {
    let parser = first_successful(vec![
        map(sequence(vec![no_way_back(literal("a")), digit1()]), concat),
        alpha1(),
    ]);

    let (parsed, trace) = traced(&parser, "abc");

    assert_eq!(parsed.output, None);
    insta::assert_snapshot!(errors(&parsed), @"syntax: expected digit at offset 1");
    insta::assert_snapshot!(trace, @r"
    witness  sequence@0 child=1 recovery=none
    error    alternative@0 child=0 recovery=none
    reject   expected digit at offset 1
    ");
}

#[test]
fn furthest_failure_is_reported() {
    let parser = first_successful(vec![
        literal("x"),
        map(sequence(vec![literal("a"), literal("b")]), concat),
    ]);

    let parsed = run(&parser, "ac").unwrap();

    insta::assert_snapshot!(errors(&parsed), @"syntax: expected `b` at offset 1");
}

#[test]
fn ties_report_first_listed() {
    let parser = first_successful(vec![literal("a"), literal("b")]);

    let parsed = run(&parser, "c").unwrap();

    insta::assert_snapshot!(errors(&parsed), @"syntax: expected `a` at offset 0");
}

#[test]
fn expectation_lists_every_child() {
    let parser = first_successful(vec![literal("a"), literal("b")]);

    assert_eq!(parser.expected(), "`a` or `b`");
}

#[test]
fn recovery_descends_into_committed_child() {
    let tag = map(
        sequence(vec![no_way_back(literal("<")), digit1(), literal(">")]),
        concat,
    );
    let parser = many0(first_successful(vec![tag, literal("!")]));

    let (parsed, trace) = traced(&parser, "<x>");

    assert_eq!(parsed.output, Some(vec!["<>".to_string()]));
    insta::assert_snapshot!(errors(&parsed), @"syntax: expected digit at offset 1");
    insta::assert_snapshot!(trace, @r"
    witness  sequence@0 child=1 recovery=2+1
    error    alternative@0 child=0 recovery=none
    error    many@0 child=0 recovery=none
    restart  #1
    handle   many@0 child=0
    handle   alternative@0 child=0
    rewind   sequence@0 resume=2+1
    escape   @1 skip=1
    ");
}

#[test]
#[should_panic(expected = "alternative needs at least one parser")]
fn empty_choice_panics() {
    let _ = first_successful::<String>(vec![]);
}
