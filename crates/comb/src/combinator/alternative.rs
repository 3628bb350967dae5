//! Ordered choice.
//!
//! The first child to succeed wins. When every child fails the furthest
//! failure is reported, the first listed one on ties. A child failing after a
//! commit point ends the choice: its siblings are not tried, and the only
//! recovery is to restart that child further on.

use crate::branch::{self, Failure, Resume};
use crate::cache::{BranchId, CacheKey};
use crate::diagnostics::ParserError;
use crate::invariants;
use crate::parser::{Context, PResult, Parser, ParserImpl};
use crate::recoverer::{Choice, CombiningRecoverer, Recoverer};
use crate::state::{Mode, Snapshot, State};

const BRANCH: &str = "alternative";

struct Alternative<O> {
    id: BranchId,
    children: Vec<Parser<O>>,
    recoverers: CombiningRecoverer,
    expected: String,
    safe_spot: bool,
}

impl<O: 'static> Alternative<O> {
    /// Runs only child `index`: used once the choice is already committed.
    fn resume<'a>(
        &self,
        ctx: &mut Context<'_>,
        key: CacheKey,
        start_spot: Option<usize>,
        index: usize,
        state: State<'a>,
    ) -> PResult<'a, O> {
        let child_start = state.snapshot();
        let (next, result) = self.children[index].parse(ctx, state);
        if ctx.has_fatal_error() {
            return branch::abort(ctx, next);
        }
        match result {
            Ok(output) => (next, Ok(output)),
            Err(error) if branch::is_committed(start_spot, &next) => {
                self.fail(ctx, key, index, child_start, next, error)
            }
            Err(error) => (next.with_mode(Mode::Happy), Err(error)),
        }
    }

    fn fail<'a>(
        &self,
        ctx: &mut Context<'_>,
        key: CacheKey,
        index: usize,
        child_start: Snapshot,
        failed: State<'a>,
        error: ParserError,
    ) -> PResult<'a, O> {
        let proposal = self.propose(ctx, index, &child_start, &failed);
        let failure = Failure {
            child: index,
            partial: (),
            child_start,
            state: failed,
            error,
            finish: None,
        };
        branch::register(ctx, BRANCH, key, failure, proposal)
    }

    fn propose(
        &self,
        ctx: &Context<'_>,
        index: usize,
        child_start: &Snapshot,
        failed: &State<'_>,
    ) -> Option<Choice> {
        let deleter = ctx.deleter();
        self.recoverers.best_of([index], |_, recoverer| {
            branch::probe(deleter, failed, recoverer, Some(child_start.pos))
        })
    }
}

impl<O: 'static> ParserImpl<O> for Alternative<O> {
    fn expected(&self) -> &str {
        &self.expected
    }

    fn recoverer(&self) -> Recoverer {
        self.recoverers.clone().into_recoverer()
    }

    fn is_safe_spot(&self) -> bool {
        self.safe_spot
    }

    fn parse<'a>(&self, ctx: &mut Context<'_>, state: State<'a>) -> PResult<'a, O> {
        let key = CacheKey::new(self.id, state.pos());

        match *state.mode() {
            Mode::Happy => {}
            Mode::Handle { .. } => {
                return match branch::reenter::<()>(ctx, BRANCH, key, &state) {
                    Resume::Descend { entry, state } | Resume::Escape { entry, state, .. } => {
                        self.resume(ctx, key, entry.child_start.safe_spot, entry.child, state)
                    }
                };
            }
            mode @ (Mode::Error { .. } | Mode::Rewind { .. } | Mode::Escape { .. }) => {
                invariants::unexpected_mode(BRANCH, mode)
            }
        }

        let start_spot = state.safe_spot();
        let mut furthest: Option<(State<'a>, ParserError)> = None;
        for (index, child) in self.children.iter().enumerate() {
            let (next, result) = child.parse(ctx, state.clone());
            if ctx.has_fatal_error() {
                return branch::abort(ctx, next);
            }
            let error = match result {
                Ok(output) => return (next, Ok(output)),
                Err(error) => error,
            };
            if branch::is_committed(start_spot, &next) {
                return self.fail(ctx, key, index, state.snapshot(), next, error);
            }
            if furthest.as_ref().is_none_or(|(f, _)| next.pos() > f.pos()) {
                furthest = Some((next, error));
            }
        }

        match furthest {
            Some((failed, error)) => (failed, Err(error)),
            None => invariants::empty_branch(BRANCH),
        }
    }
}

/// Tries `parsers` in order; the first success wins.
pub fn first_successful<O: 'static>(parsers: Vec<Parser<O>>) -> Parser<O> {
    if parsers.is_empty() {
        invariants::empty_branch(BRANCH);
    }
    let recoverers = CombiningRecoverer::new(parsers.iter().map(Parser::recoverer));
    let expected = parsers
        .iter()
        .map(Parser::expected)
        .collect::<Vec<_>>()
        .join(" or ");
    let safe_spot = parsers.iter().any(Parser::is_safe_spot);
    Parser::new(Alternative {
        id: BranchId::next(),
        children: parsers,
        recoverers,
        expected,
        safe_spot,
    })
}
