//! Invariant checks excluded from coverage reports.
//!
//! `broken recovery invariant` panics are bugs in the engine or in a custom
//! parser; `grammar error` panics are grammars that can never work.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::cache::CacheKey;
use crate::recoverer::Choice;
use crate::state::Mode;

#[inline]
pub(crate) fn assert_within_input(pos: usize, n: usize, len: usize) {
    assert!(
        n <= len - pos,
        "broken recovery invariant: moving {n} bytes from offset {pos} overruns input of {len} bytes"
    );
}

#[inline]
pub(crate) fn assert_safe_spot_progress(start: usize, end: usize, expected: &str) {
    assert!(
        end > start,
        "broken recovery invariant: commit point `{expected}` matched empty input at offset {start}"
    );
}

#[inline]
pub(crate) fn assert_recovery_choice(
    key: CacheKey,
    own: Option<Choice>,
    finish: Option<Choice>,
    chosen: Choice,
) {
    assert!(
        own == Some(chosen) || finish == Some(chosen),
        "broken recovery invariant: {key:?} asked to recover with a choice it never proposed"
    );
}

#[cold]
pub(crate) fn missing_witness(key: CacheKey) -> ! {
    panic!(
        "broken recovery invariant: no cached witness for {key:?} (branch re-entered without observing its failure)"
    )
}

#[cold]
pub(crate) fn witness_type_mismatch(key: CacheKey) -> ! {
    panic!("broken recovery invariant: cached witness for {key:?} has a different output type")
}

#[cold]
pub(crate) fn unexpected_mode(parser: &str, mode: Mode) -> ! {
    panic!("broken recovery invariant: `{parser}` cannot run in {mode:?} mode")
}

#[cold]
pub(crate) fn undeclared_safe_spot(parser: &str) -> ! {
    panic!(
        "broken recovery invariant: `{parser}` saw a committed failure but none of its children report a commit point"
    )
}

#[cold]
pub(crate) fn forbidden_recoverer() -> ! {
    panic!(
        "broken recovery invariant: forbidden recoverer invoked (the parser may match empty input)"
    )
}

#[cold]
pub(crate) fn no_fatal_error() -> ! {
    panic!("broken recovery invariant: fatal error requested but none was recorded")
}

#[cold]
pub(crate) fn zero_width_safe_spot(expected: &str) -> ! {
    panic!("grammar error: no_way_back around `{expected}`, which can match empty input")
}

#[cold]
pub(crate) fn empty_branch(combinator: &str) -> ! {
    panic!("grammar error: {combinator} needs at least one parser")
}

#[cold]
pub(crate) fn empty_recovery_token() -> ! {
    panic!("grammar error: recovery token must not be empty")
}

#[cold]
pub(crate) fn empty_literal() -> ! {
    panic!("grammar error: literal must not be empty")
}

#[cold]
pub(crate) fn invalid_bounds(at_least: usize, at_most: usize) -> ! {
    panic!("grammar error: repetition bounds {at_least}..={at_most} are empty")
}
