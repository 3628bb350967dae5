use comb_core::{ByteDeleter, RuneTypeChangeDeleter};

use crate::branch::{is_committed, probe};
use crate::cache::{BranchId, Cache, CacheKey, CachedResult};
use crate::diagnostics::ParserError;
use crate::parser::Context;
use crate::recoverer::{Choice, Recoverer};
use crate::state::{Mode, State};
use crate::trace::NoopTracer;
use crate::{digit1, literal, no_way_back, sequence};

#[test]
fn new_commit_point_commits() {
    let failed = State::new(b"abc").move_by(2).mark_safe_spot();

    assert!(is_committed(None, &failed));
    assert!(is_committed(Some(1), &failed));
    assert!(!is_committed(Some(2), &failed));
}

#[test]
fn happy_failure_without_commit_point_is_not_committed() {
    let failed = State::new(b"abc").move_by(1);

    assert!(!is_committed(None, &failed));
}

#[test]
fn error_mode_is_always_committed() {
    let failed = State::new(b"abc").with_mode(Mode::Error { best: None });

    assert!(is_committed(None, &failed));
}

#[test]
fn probe_uses_recoverer_waste() {
    let failed = State::new(b"ab;;x").move_by(2);
    let recoverer = Recoverer::index_of("x");

    assert_eq!(probe(&ByteDeleter, &failed, &recoverer, Some(2)), Some(2));
    assert_eq!(probe(&ByteDeleter, &failed, &recoverer, None), Some(2));
}

#[test]
fn probe_forces_progress_on_replay() {
    let failed = State::new(b"ab;;x").move_by(2);
    let recoverer = Recoverer::index_of(";");

    assert_eq!(probe(&ByteDeleter, &failed, &recoverer, None), Some(0));
    assert_eq!(probe(&ByteDeleter, &failed, &recoverer, Some(2)), Some(1));
}

#[test]
fn probe_deletes_a_whole_token() {
    let failed = State::new(b"abc1");
    let recoverer = Recoverer::char_matching(|c| c.is_alphanumeric());

    assert_eq!(probe(&RuneTypeChangeDeleter, &failed, &recoverer, Some(0)), Some(3));
    assert_eq!(probe(&ByteDeleter, &failed, &recoverer, Some(0)), Some(1));
}

#[test]
fn probe_gives_up_at_end_of_input() {
    let failed = State::new(b"ab;").move_by(2);
    let recoverer = Recoverer::index_of(";");

    assert_eq!(probe(&ByteDeleter, &failed, &recoverer, Some(2)), None);
}

#[test]
#[should_panic(expected = "no cached witness")]
fn reentry_without_witness_panics() {
    let parser = sequence(vec![no_way_back(literal("a")), digit1()]);
    let mut tracer = NoopTracer;
    let mut ctx = Context::new(&ByteDeleter, &mut tracer);
    let target = CacheKey::new(BranchId::next(), 0);
    let choice = Choice { index: 1, waste: 0 };
    let state = State::new(b"ax").with_mode(Mode::Handle { target, choice });

    let _ = parser.parse(&mut ctx, state);
}

#[test]
#[should_panic(expected = "has a different output type")]
fn witness_of_other_output_type_panics() {
    let start = State::new(b"ax");
    let key = CacheKey::new(BranchId::next(), 0);
    let mut cache = Cache::default();
    cache.insert(
        key,
        CachedResult {
            child: 1,
            partial: vec!["a".to_string()],
            child_start: start.snapshot(),
            failure: start.move_by(1).snapshot(),
            error: ParserError::syntax(1, "digit"),
            recovery: None,
            finish: None,
        },
    );

    let _: CachedResult<Vec<u8>> = cache.take(key);
}
