//! Bounded repetition.
//!
//! An element that succeeds without consuming input would repeat forever, so
//! it aborts the whole run with a grammar error instead.

use crate::branch::{self, Failure, Resume};
use crate::cache::{BranchId, CacheKey};
use crate::diagnostics::ParserError;
use crate::invariants;
use crate::parser::{Context, PResult, Parser, ParserImpl};
use crate::recoverer::{Choice, Recoverer};
use crate::state::{Mode, Snapshot, State};

const BRANCH: &str = "many";

const ELEMENT: usize = 0;
/// Resume point past the element: the items collected so far are the output.
const FINISH: usize = 1;

struct Many<O> {
    id: BranchId,
    element: Parser<O>,
    at_least: usize,
    at_most: Option<usize>,
}

impl<O: 'static> Many<O> {
    fn drive<'a>(
        &self,
        ctx: &mut Context<'_>,
        key: CacheKey,
        start_spot: Option<usize>,
        mut state: State<'a>,
        mut items: Vec<O>,
    ) -> PResult<'a, Vec<O>> {
        loop {
            if self.at_most.is_some_and(|max| items.len() >= max) {
                return (state, Ok(items));
            }

            let before = state.checkpoint();
            let (next, result) = self.element.parse(ctx, state);
            if ctx.has_fatal_error() {
                return branch::abort(ctx, next);
            }

            let error = match result {
                Ok(item) => {
                    if next.pos() == before.pos() {
                        return empty_element(ctx, BRANCH, key, self.element.expected(), next);
                    }
                    items.push(item);
                    state = next;
                    continue;
                }
                Err(error) => error,
            };

            if branch::is_committed(before.safe_spot(), &next) {
                return self.fail(ctx, key, items, before.snapshot(), next, error);
            }
            if items.len() >= self.at_least {
                return (before, Ok(items));
            }
            if branch::is_committed(start_spot, &next) {
                return self.fail(ctx, key, items, before.snapshot(), next, error);
            }
            return (next, Err(error));
        }
    }

    fn fail<'a>(
        &self,
        ctx: &mut Context<'_>,
        key: CacheKey,
        items: Vec<O>,
        child_start: Snapshot,
        failed: State<'a>,
        error: ParserError,
    ) -> PResult<'a, Vec<O>> {
        let proposal = self.propose(ctx, &child_start, &failed);
        let failure = Failure {
            child: items.len(),
            partial: items,
            child_start,
            state: failed,
            error,
            finish: Some(FINISH),
        };
        branch::register(ctx, BRANCH, key, failure, proposal)
    }

    /// Restarting the element further on is the only way forward.
    fn propose(
        &self,
        ctx: &Context<'_>,
        child_start: &Snapshot,
        failed: &State<'_>,
    ) -> Option<Choice> {
        let recoverer = self.element.recoverer();
        if recoverer.is_forbidden() {
            return None;
        }
        let waste = branch::probe(ctx.deleter(), failed, &recoverer, Some(child_start.pos))?;
        Some(Choice {
            index: ELEMENT,
            waste,
        })
    }
}

impl<O: 'static> ParserImpl<Vec<O>> for Many<O> {
    fn expected(&self) -> &str {
        self.element.expected()
    }

    fn recoverer(&self) -> Recoverer {
        if self.at_least > 0 {
            self.element.recoverer()
        } else {
            Recoverer::forbidden()
        }
    }

    fn is_safe_spot(&self) -> bool {
        self.element.is_safe_spot()
    }

    fn parse<'a>(&self, ctx: &mut Context<'_>, state: State<'a>) -> PResult<'a, Vec<O>> {
        let key = CacheKey::new(self.id, state.pos());
        let start_spot = state.safe_spot();

        match *state.mode() {
            Mode::Happy => self.drive(ctx, key, start_spot, state, Vec::new()),
            Mode::Handle { .. } => match branch::reenter::<Vec<O>>(ctx, BRANCH, key, &state) {
                Resume::Escape { entry, state, choice } if choice.index == FINISH => {
                    (state.checkpoint(), Ok(entry.partial))
                }
                Resume::Descend { entry, state } | Resume::Escape { entry, state, .. } => {
                    self.drive(ctx, key, start_spot, state, entry.partial)
                }
            },
            mode @ (Mode::Error { .. } | Mode::Rewind { .. } | Mode::Escape { .. }) => {
                invariants::unexpected_mode(BRANCH, mode)
            }
        }
    }
}

/// Records the fatal empty-element error and unwinds.
pub(crate) fn empty_element<'a, O>(
    ctx: &mut Context<'_>,
    branch: &'static str,
    key: CacheKey,
    expected: &str,
    state: State<'a>,
) -> PResult<'a, O> {
    let error = ParserError::grammar(
        state.pos(),
        format!("empty element: {expected} matched no input inside a repetition"),
    );
    ctx.tracer().trace_empty_element(branch, key.pos);
    ctx.set_fatal(error.clone());
    (state, Err(error))
}

/// Between `at_least` and `at_most` (inclusive, `None` for unbounded) repetitions.
pub fn many<O: 'static>(element: Parser<O>, at_least: usize, at_most: Option<usize>) -> Parser<Vec<O>> {
    if let Some(max) = at_most.filter(|&max| max < at_least) {
        invariants::invalid_bounds(at_least, max);
    }
    Parser::new(Many {
        id: BranchId::next(),
        element,
        at_least,
        at_most,
    })
}

pub fn many0<O: 'static>(element: Parser<O>) -> Parser<Vec<O>> {
    many(element, 0, None)
}

pub fn many1<O: 'static>(element: Parser<O>) -> Parser<Vec<O>> {
    many(element, 1, None)
}

/// Exactly `n` repetitions.
pub fn count<O: 'static>(element: Parser<O>, n: usize) -> Parser<Vec<O>> {
    many(element, n, Some(n))
}
