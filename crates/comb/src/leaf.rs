//! Leaf parsers.
//!
//! Leaves know nothing about recovery beyond their recoverer: each one scans
//! the unconsumed input and either matches a prefix or fails where it stands.
//! Leaves that can match empty input carry a forbidden recoverer.

use std::rc::Rc;

use comb_core::decode_char;

use crate::combinator::{label, try_map};
use crate::invariants;
use crate::parser::Parser;
use crate::recoverer::Recoverer;

/// Exactly the character `c`.
pub fn char(c: char) -> Parser<char> {
    let mut buf = [0; 4];
    let token: Rc<[u8]> = c.encode_utf8(&mut buf).as_bytes().into();
    let expected = format!("`{}`", c.escape_debug());
    let recoverer = Recoverer::index_of(&*token);
    Parser::leaf(expected, recoverer, move |rest| {
        rest.starts_with(&token).then_some((token.len(), c))
    })
}

/// Exactly the byte `b`.
pub fn byte(b: u8) -> Parser<u8> {
    Parser::leaf(format!("byte 0x{b:02x}"), Recoverer::index_of([b]), move |rest| {
        (rest.first() == Some(&b)).then_some((1, b))
    })
}

/// Exactly `text`.
pub fn literal(text: &str) -> Parser<String> {
    if text.is_empty() {
        invariants::empty_literal();
    }
    let owned = text.to_owned();
    Parser::leaf(format!("`{text}`"), Recoverer::index_of(text), move |rest| {
        rest.starts_with(owned.as_bytes())
            .then(|| (owned.len(), owned.clone()))
    })
}

/// One character accepted by `pred`.
pub fn satisfy(expected: &str, pred: impl Fn(char) -> bool + 'static) -> Parser<char> {
    let pred = Rc::new(pred);
    let scan_pred = Rc::clone(&pred);
    Parser::leaf(expected, Recoverer::char_matching(move |c| pred(c)), move |rest| {
        decode_char(rest).filter(|&(c, _)| scan_pred(c)).map(|(c, width)| (width, c))
    })
}

/// Any one character.
pub fn any_char() -> Parser<char> {
    let recoverer = Recoverer::from_fn(|rest| (!rest.is_empty()).then_some(0));
    Parser::leaf("any character", recoverer, |rest| {
        decode_char(rest).map(|(c, width)| (width, c))
    })
}

fn take_while_len(rest: &[u8], pred: &dyn Fn(char) -> bool) -> usize {
    let mut len = 0;
    while let Some((c, width)) = decode_char(&rest[len..]) {
        if !pred(c) {
            break;
        }
        len += width;
    }
    len
}

fn take_while(
    expected: &str,
    at_least_one: bool,
    pred: impl Fn(char) -> bool + 'static,
) -> Parser<String> {
    let pred = Rc::new(pred);
    let recoverer = if at_least_one {
        let pred = Rc::clone(&pred);
        Recoverer::char_matching(move |c| pred(c))
    } else {
        Recoverer::forbidden()
    };
    Parser::leaf(expected, recoverer, move |rest| {
        let len = take_while_len(rest, &*pred);
        if at_least_one && len == 0 {
            return None;
        }
        Some((len, String::from_utf8_lossy(&rest[..len]).into_owned()))
    })
}

/// The longest run of characters accepted by `pred`, possibly empty.
pub fn take_while0(expected: &str, pred: impl Fn(char) -> bool + 'static) -> Parser<String> {
    take_while(expected, false, pred)
}

/// The longest non-empty run of characters accepted by `pred`.
pub fn take_while1(expected: &str, pred: impl Fn(char) -> bool + 'static) -> Parser<String> {
    take_while(expected, true, pred)
}

pub fn digit0() -> Parser<String> {
    take_while0("digit", |c| c.is_ascii_digit())
}

pub fn digit1() -> Parser<String> {
    take_while1("digit", |c| c.is_ascii_digit())
}

pub fn alpha0() -> Parser<String> {
    take_while0("letter", char::is_alphabetic)
}

pub fn alpha1() -> Parser<String> {
    take_while1("letter", char::is_alphabetic)
}

pub fn alphanumeric0() -> Parser<String> {
    take_while0("letter or digit", char::is_alphanumeric)
}

pub fn alphanumeric1() -> Parser<String> {
    take_while1("letter or digit", char::is_alphanumeric)
}

pub fn whitespace0() -> Parser<String> {
    take_while0("whitespace", char::is_whitespace)
}

pub fn whitespace1() -> Parser<String> {
    take_while1("whitespace", char::is_whitespace)
}

pub fn hex_digit() -> Parser<char> {
    satisfy("hex digit", |c| c.is_ascii_hexdigit())
}

/// Optional sign followed by ASCII digits.
fn signed_digits() -> Parser<String> {
    let recoverer = Recoverer::char_matching(|c| c.is_ascii_digit() || c == '-' || c == '+');
    Parser::leaf("integer", recoverer, |rest| {
        let sign = usize::from(matches!(rest.first(), Some(b'-' | b'+')));
        let digits = rest[sign..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        let len = sign + digits;
        Some((len, String::from_utf8_lossy(&rest[..len]).into_owned()))
    })
}

/// Decimal `i64`. Out of range values are semantic errors.
pub fn int64() -> Parser<i64> {
    try_map(signed_digits(), |text| {
        text.parse::<i64>()
            .map_err(|e| format!("invalid integer `{text}`: {e}"))
    })
}

/// Decimal `u64`. Out of range values are semantic errors.
pub fn uint64() -> Parser<u64> {
    let digits = label(digit1(), "unsigned integer");
    try_map(digits, |text| {
        text.parse::<u64>()
            .map_err(|e| format!("invalid unsigned integer `{text}`: {e}"))
    })
}

/// End of input.
pub fn eof() -> Parser<()> {
    Parser::leaf("end of input", Recoverer::forbidden(), |rest| {
        rest.is_empty().then_some((0, ()))
    })
}
