//! Deleters convert "discard N logical tokens" into a byte count.
//!
//! Recovery uses a deleter when it has to force progress past input that no
//! recoverer can resynchronize on. Token boundaries depend on the input flavor:
//! binary formats delete bytes, text deletes runs of same-class characters so a
//! multi-byte character or a whitespace run is never split.

use std::fmt;

use crate::text::{RuneClass, class_at};

pub trait Deleter: fmt::Debug {
    /// Byte length of the first token of `input`. Zero only for empty input.
    fn token_len(&self, input: &[u8]) -> usize;

    /// Byte length of the first `count` tokens of `input`, capped at `input.len()`.
    fn delete(&self, input: &[u8], count: usize) -> usize {
        let mut deleted = 0;
        for _ in 0..count {
            let len = self.token_len(&input[deleted..]);
            if len == 0 {
                break;
            }
            deleted += len;
        }
        deleted
    }
}

/// One byte per token. Default for binary input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteDeleter;

impl Deleter for ByteDeleter {
    fn token_len(&self, input: &[u8]) -> usize {
        input.len().min(1)
    }

    fn delete(&self, input: &[u8], count: usize) -> usize {
        input.len().min(count)
    }
}

/// A token is a run of characters sharing one [`RuneClass`]. Default for text.
///
/// Punctuation never forms runs: `"],["` is three tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuneTypeChangeDeleter;

impl Deleter for RuneTypeChangeDeleter {
    fn token_len(&self, input: &[u8]) -> usize {
        let Some((class, width)) = class_at(input) else {
            return 0;
        };
        if class == RuneClass::Punctuation {
            return width;
        }

        let mut len = width;
        while let Some((next, width)) = class_at(&input[len..]) {
            if next != class {
                break;
            }
            len += width;
        }
        len
    }
}

/// A token is a run of non-space characters plus the whitespace following it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceDeleter;

impl Deleter for SpaceDeleter {
    fn token_len(&self, input: &[u8]) -> usize {
        let mut len = 0;
        while let Some((class, width)) = class_at(&input[len..]) {
            if class == RuneClass::Space {
                break;
            }
            len += width;
        }
        while let Some((class, width)) = class_at(&input[len..]) {
            if class != RuneClass::Space {
                break;
            }
            len += width;
        }
        len
    }
}
