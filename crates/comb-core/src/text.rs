//! UTF-8 helpers over raw byte input.
//!
//! Parsers work on `&[u8]` so that binary and text grammars share one engine.
//! Text-oriented code decodes one `char` at a time from the cursor; bytes that
//! do not start a valid sequence are treated as opaque one-byte units.

/// Width of the UTF-8 sequence introduced by `lead`.
///
/// Returns `None` for continuation bytes and bytes that never start a sequence.
pub fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

/// Decodes the character at the start of `bytes` together with its byte width.
pub fn decode_char(bytes: &[u8]) -> Option<(char, usize)> {
    let width = utf8_width(*bytes.first()?)?;
    let chunk = bytes.get(..width)?;
    let c = std::str::from_utf8(chunk).ok()?.chars().next()?;
    Some((c, width))
}

/// Coarse character classes used to find token boundaries in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuneClass {
    Letter,
    Digit,
    Space,
    Punctuation,
    Other,
    /// A byte that does not start a valid UTF-8 sequence.
    Invalid,
}

impl RuneClass {
    pub fn of(c: char) -> Self {
        if c.is_whitespace() {
            Self::Space
        } else if c.is_numeric() {
            Self::Digit
        } else if c.is_alphabetic() || c == '_' {
            Self::Letter
        } else if c.is_ascii_punctuation() {
            Self::Punctuation
        } else {
            Self::Other
        }
    }
}

/// Class and byte width of the unit at the start of `bytes`, `None` at end of input.
pub fn class_at(bytes: &[u8]) -> Option<(RuneClass, usize)> {
    if bytes.is_empty() {
        return None;
    }
    match decode_char(bytes) {
        Some((c, width)) => Some((RuneClass::of(c), width)),
        None => Some((RuneClass::Invalid, 1)),
    }
}

/// Byte offset of the first character in `bytes` accepted by `pred`.
///
/// Invalid bytes are stepped over one at a time and never match.
pub fn find_char(bytes: &[u8], pred: impl Fn(char) -> bool) -> Option<usize> {
    let mut offset = 0;
    while offset < bytes.len() {
        match decode_char(&bytes[offset..]) {
            Some((c, _)) if pred(c) => return Some(offset),
            Some((_, width)) => offset += width,
            None => offset += 1,
        }
    }
    None
}
