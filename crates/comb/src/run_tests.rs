use crate::test_utils::{errors, rest};
use crate::{
    ByteDeleter, Error, FailurePolicy, PrintTracer, RunConfig, alpha0, alpha1, char, digit1,
    first_successful, literal, many0, map, no_way_back, parse, run, run_bytes, run_with, separated1,
    sequence,
};

fn bracketed_list() -> crate::Parser<Vec<Vec<String>>> {
    let item = sequence(vec![no_way_back(literal("[")), digit1(), literal("]")]);
    separated1(item, char(','), false)
}

fn committed_choice() -> crate::Parser<String> {
    first_successful(vec![
        map(sequence(vec![no_way_back(literal("a")), digit1()]), |p| p.concat()),
        alpha1(),
    ])
}

#[test]
fn full_match_has_no_errors() {
    let parsed = run(&sequence(vec![digit1(), alpha0(), digit1()]), "1a3").unwrap();

    assert!(parsed.is_ok());
    assert!(parsed.rest.is_empty());
}

#[test]
fn runs_are_repeatable() {
    let parser = bracketed_list();

    let first = run(&parser, "[1],[x],[3]").unwrap();
    let second = run(&parser, "[1],[x],[3]").unwrap();

    assert_eq!(first, second);
    assert!(!first.is_ok());
}

#[test]
fn strict_policy_drops_output() {
    let parsed = run(&committed_choice(), "abc").unwrap();

    assert_eq!(parsed.output, None);
    assert_eq!(rest(&parsed), "bc");
}

#[test]
fn best_effort_policy_keeps_partial_output() {
    let config = RunConfig::text().with_policy(FailurePolicy::BestEffort);

    let parsed = run_with(&committed_choice(), b"abc", &config, &mut PrintTracer::new()).unwrap();

    assert_eq!(parsed.output.as_deref(), Some("a"));
    assert!(parsed.rest.is_empty());
    insta::assert_snapshot!(errors(&parsed), @"syntax: expected digit at offset 1");
}

#[test]
fn best_effort_closes_innermost_failing_branch() {
    let tag = sequence(vec![no_way_back(literal("<")), digit1(), literal(">")]);
    let config = RunConfig::text().with_policy(FailurePolicy::BestEffort);
    let mut tracer = PrintTracer::new();

    let parsed = run_with(&many0(tag), b"<1><2><x", &config, &mut tracer).unwrap();

    let tags = parsed
        .output
        .as_ref()
        .map(|tags| tags.iter().map(|tag| tag.concat()).collect::<Vec<_>>());
    assert_eq!(tags, Some(vec!["<1>".to_string(), "<2>".into(), "<".into()]));
    assert!(parsed.rest.is_empty());
    insta::assert_snapshot!(errors(&parsed), @"syntax: expected digit at offset 7");
    insta::assert_snapshot!(tracer.dump().trim_end(), @r"
    witness  sequence@6 child=1 recovery=none
    error    many@0 child=2 recovery=none
    restart  #1
    handle   many@0 child=2
    rewind   sequence@6 resume=3+1
    ");
}

#[test]
fn best_effort_without_branch_returns_default() {
    let config = RunConfig::text().with_policy(FailurePolicy::BestEffort);

    let parsed = run_with(&digit1(), b"x", &config, &mut PrintTracer::new()).unwrap();

    assert_eq!(parsed.output.as_deref(), Some(""));
    assert!(parsed.rest.is_empty());
    insta::assert_snapshot!(errors(&parsed), @"syntax: expected digit at offset 0");
}

#[test]
fn strict_policy_drops_partial_output() {
    let tag = sequence(vec![no_way_back(literal("<")), digit1(), literal(">")]);

    let parsed = run(&many0(tag), "<1><2><x").unwrap();

    assert_eq!(parsed.output, None);
    assert_eq!(rest(&parsed), "x");
}

#[test]
fn disabled_recovery_rejects_first_committed_failure() {
    let config = RunConfig::text().with_recovery(false);
    let mut tracer = PrintTracer::new();

    let parsed = run_with(&bracketed_list(), b"[1],[x],[3]", &config, &mut tracer).unwrap();

    assert_eq!(parsed.output, None);
    assert_eq!(rest(&parsed), "x],[3]");
    insta::assert_snapshot!(tracer.dump().trim_end(), @r"
    witness  sequence@4 child=1 recovery=2+1
    error    separated@0 child=2 recovery=1+2
    reject   expected digit at offset 5
    ");
}

#[test]
fn recovery_limit() {
    let input = b"[1],[x],[y],[3]";
    let mut tracer = PrintTracer::new();

    let exhausted = run_with(
        &bracketed_list(),
        input,
        &RunConfig::text().with_max_recoveries(Some(1)),
        &mut tracer,
    );
    let enough = run_with(
        &bracketed_list(),
        input,
        &RunConfig::text().with_max_recoveries(Some(2)),
        &mut tracer,
    );

    assert!(matches!(exhausted, Err(Error::RecoveryLimitExceeded)));
    assert_eq!(enough.unwrap().errors.len(), 2);
}

#[test]
fn parse_requires_clean_input() {
    assert_eq!(parse(&digit1(), "42").unwrap(), "42");

    let Err(Error::Parse(diagnostics)) = parse(&bracketed_list(), "[1],[x]") else {
        panic!("expected parse failure");
    };
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn into_result_keeps_diagnostics() {
    let parsed = run(&digit1(), "x").unwrap();

    let Err(error) = parsed.into_result() else {
        panic!("expected failure");
    };
    assert_eq!(error.to_string(), "parsing failed with 1 errors");
}

#[test]
fn binary_runs_use_byte_deleter() {
    let parsed = run_bytes(&sequence(vec![literal("\u{1}"), literal("\u{2}")]), &[1, 2, 3]).unwrap();

    assert_eq!(parsed.output.map(|v| v.len()), Some(2));
    assert_eq!(parsed.rest, b"\x03");
    assert_eq!(format!("{:?}", RunConfig::binary().deleter()), "ByteDeleter");
}

#[test]
fn config_builders() {
    let config = RunConfig::default()
        .with_deleter(ByteDeleter)
        .with_recovery(false)
        .with_policy(FailurePolicy::BestEffort)
        .with_max_recoveries(Some(3));

    assert!(!config.recovery());
    assert_eq!(config.policy(), FailurePolicy::BestEffort);
    assert_eq!(config.max_recoveries(), Some(3));
    assert_eq!(RunConfig::default().policy(), FailurePolicy::Strict);
    assert_eq!(format!("{:?}", RunConfig::default().deleter()), "RuneTypeChangeDeleter");
}

#[test]
fn error_messages() {
    assert_eq!(Error::RecoveryLimitExceeded.to_string(), "recovery limit exceeded");
}
