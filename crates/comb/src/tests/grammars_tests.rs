//! Small grammars exercising the public API end to end.

use indoc::indoc;

use crate::test_utils::{errors, traced};
use crate::{
    Parser, char, count, hex_digit, int64, map2, map3, no_way_back, parse, run, separated1,
    sequence, try_map,
};

#[derive(Debug, Default, PartialEq, Eq)]
struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

fn hex_color() -> Parser<Color> {
    let channel = try_map(sequence(vec![hex_digit(), hex_digit()]), |digits| {
        let text: String = digits.into_iter().collect();
        u8::from_str_radix(&text, 16).map_err(|e| e.to_string())
    });
    map2(char('#'), count(channel, 3), |_, channels| Color {
        red: channels[0],
        green: channels[1],
        blue: channels[2],
    })
}

#[test]
fn hex_color_parses() {
    let color = parse(&hex_color(), "#2F14DF").unwrap();

    assert_eq!(
        color,
        Color {
            red: 0x2f,
            green: 0x14,
            blue: 0xdf,
        }
    );
}

#[test]
fn hex_color_too_short() {
    let parsed = run(&hex_color(), "#2F14").unwrap();

    assert_eq!(parsed.output, None);
    insta::assert_snapshot!(errors(&parsed), @"syntax: expected hex digit at offset 5");
}

fn csv() -> Parser<Vec<Vec<i64>>> {
    let row = separated1(int64(), no_way_back(char(',')), false);
    separated1(row, char('\n'), true)
}

#[test]
fn csv_parses_rows() {
    let input = indoc! {"
        1,2,3
        -4,5,6
    "};

    let rows = parse(&csv(), input).unwrap();

    assert_eq!(rows, vec![vec![1, 2, 3], vec![-4, 5, 6]]);
}

#[test]
fn csv_recovers_bad_field() {
    let input = indoc! {"
        1,2,3
        4,x,6
        7,8,9
    "};

    let (parsed, trace) = traced(&csv(), input);

    assert_eq!(
        parsed.output,
        Some(vec![vec![1, 2, 3], vec![4, 0, 6], vec![7, 8, 9]])
    );
    assert!(parsed.rest.is_empty());
    insta::assert_snapshot!(errors(&parsed), @"syntax: expected integer at offset 8");
    insta::assert_snapshot!(trace, @r"
    witness  separated@6 child=2 recovery=1+1
    error    separated@0 child=2 recovery=0+2
    restart  #1
    handle   separated@0 child=2
    rewind   separated@6 resume=1+1
    escape   @8 skip=1
    ");
}

fn settings() -> Parser<Vec<(String, i64)>> {
    let entry = map3(
        no_way_back(crate::alpha1()),
        char('='),
        int64(),
        |key, _, value| (key, value),
    );
    separated1(entry, char(';'), false)
}

#[test]
fn settings_skip_bad_value() {
    let (parsed, trace) = traced(&settings(), "a=1;b=?;c=3");

    assert_eq!(
        parsed.output,
        Some(vec![
            ("a".to_string(), 1),
            (String::new(), 0),
            ("c".to_string(), 3),
        ])
    );
    insta::assert_snapshot!(errors(&parsed), @"syntax: expected integer at offset 6");
    insta::assert_snapshot!(trace, @r"
    witness  sequence@4 child=2 recovery=2+4
    error    separated@0 child=2 recovery=1+1
    restart  #1
    rewind   separated@0 resume=1+1
    escape   @6 skip=1
    ");
}

#[test]
fn settings_overflow_is_recovered() {
    let parsed = run(&settings(), "a=99999999999999999999;b=2").unwrap();

    assert_eq!(
        parsed.output,
        Some(vec![(String::new(), 0), ("b".to_string(), 2)])
    );
    assert_eq!(parsed.errors.len(), 1);
    let error = &parsed.errors.as_slice()[0];
    assert_eq!(error.kind(), crate::ErrorKind::Semantic);
    assert_eq!(error.pos(), 2);
    assert!(error.message().starts_with("invalid integer"));
}
