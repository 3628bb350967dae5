use crate::diagnostics::ErrorKind;
use crate::test_utils::{errors, rest, traced};
use crate::{
    Error, PrintTracer, RunConfig, char, count, digit0, digit1, literal, many, many0, many1,
    no_way_back, optional, run, run_with, sequence,
};

fn tag() -> crate::Parser<Vec<String>> {
    sequence(vec![no_way_back(literal("<")), digit1(), literal(">")])
}

#[test]
fn many0_stops_at_first_mismatch() {
    let parsed = run(&many0(char('a')), "aab").unwrap();

    assert_eq!(parsed.output, Some(vec!['a', 'a']));
    assert_eq!(rest(&parsed), "b");
}

#[test]
fn many0_accepts_nothing() {
    let parsed = run(&many0(char('a')), "b").unwrap();

    assert_eq!(parsed.output, Some(vec![]));
    assert!(parsed.errors.is_empty());
}

#[test]
fn many1_needs_one() {
    let parsed = run(&many1(char('a')), "b").unwrap();

    assert_eq!(parsed.output, None);
    insta::assert_snapshot!(errors(&parsed), @"syntax: expected `a` at offset 0");
}

#[test]
fn count_stops_at_bound() {
    let parsed = run(&count(char('a'), 2), "aaa").unwrap();

    assert_eq!(parsed.output, Some(vec!['a', 'a']));
    assert_eq!(rest(&parsed), "a");
}

#[test]
fn count_reports_missing_element() {
    let parsed = run(&count(char('a'), 3), "aa").unwrap();

    insta::assert_snapshot!(errors(&parsed), @"syntax: expected `a` at offset 2");
}

#[test]
fn bounded_many() {
    let parser = many(char('a'), 1, Some(3));

    assert_eq!(run(&parser, "aaaa").unwrap().output.map(|v| v.len()), Some(3));
    assert_eq!(run(&parser, "a").unwrap().output.map(|v| v.len()), Some(1));
}

#[test]
#[should_panic(expected = "repetition bounds 3..=1 are empty")]
fn inverted_bounds_panic() {
    let _ = many(char('a'), 3, Some(1));
}

#[test]
fn empty_element_is_fatal_for_every_bound() {
    let bounds = [(0, None), (1, None), (0, Some(1)), (2, Some(2)), (1, Some(5))];

    for (at_least, at_most) in bounds {
        for input in ["", "abc"] {
            let parser = many(digit0(), at_least, at_most);
            let Err(Error::EmptyElement(error)) = run(&parser, input) else {
                panic!("expected empty element error for {at_least}..{at_most:?} on {input:?}");
            };
            assert_eq!(error.kind(), ErrorKind::Grammar);
            assert_eq!(error.pos(), 0);
        }
    }
}

#[test]
fn empty_element_after_progress() {
    let parser = many0(optional(char('a')));
    let mut tracer = PrintTracer::new();

    let result = run_with(&parser, b"aab", &RunConfig::text(), &mut tracer);

    let Err(Error::EmptyElement(error)) = result else {
        panic!("expected empty element error");
    };
    assert_eq!(error.pos(), 2);
    insta::assert_snapshot!(error.to_string(), @"empty element: `a` matched no input inside a repetition at offset 2");
    insta::assert_snapshot!(tracer.dump().trim_end(), @"empty    many@0");
}

#[test]
fn recovery_inside_element() {
    let parser = many0(tag());

    let (parsed, trace) = traced(&parser, "<1><x><2>");

    assert_eq!(parsed.output.as_ref().map(|tags| tags.len()), Some(3));
    insta::assert_snapshot!(errors(&parsed), @"syntax: expected digit at offset 4");
    insta::assert_snapshot!(trace, @r"
    witness  sequence@3 child=1 recovery=2+1
    error    many@0 child=1 recovery=0+2
    restart  #1
    handle   many@0 child=1
    rewind   sequence@3 resume=2+1
    escape   @4 skip=1
    ");
}

#[test]
fn recovery_restarts_element_when_cheaper() {
    let parser = many0(tag());

    let (parsed, trace) = traced(&parser, "<1><x;<2>");

    assert_eq!(
        parsed.output,
        Some(vec![
            vec!["<".to_string(), "1".into(), ">".into()],
            vec!["<".to_string(), "2".into(), ">".into()],
        ])
    );
    insta::assert_snapshot!(trace, @r"
    witness  sequence@3 child=1 recovery=1+3
    error    many@0 child=1 recovery=0+2
    restart  #1
    rewind   many@0 resume=0+2
    escape   @4 skip=2
    ");
}
