//! Separated lists.
//!
//! Steps alternate between elements (even) and separators (odd). A missing
//! separator simply ends the list; an element missing after a separator ends
//! it before that separator unless trailing separators are allowed.

use crate::branch::{self, Failure, Resume};
use crate::cache::{BranchId, CacheKey};
use crate::combinator::repeat::empty_element;
use crate::diagnostics::ParserError;
use crate::invariants;
use crate::parser::{Context, PResult, Parser, ParserImpl};
use crate::recoverer::{Choice, CombiningRecoverer, Recoverer};
use crate::state::{Mode, Snapshot, State};

const BRANCH: &str = "separated";

const ELEMENT: usize = 0;
const SEPARATOR: usize = 1;
/// Closes the list; a failed element is replaced by its default.
const FINISH: usize = 2;

struct Separated<O, S> {
    id: BranchId,
    element: Parser<O>,
    separator: Parser<S>,
    recoverers: CombiningRecoverer,
    at_least: usize,
    at_most: Option<usize>,
    trailing: bool,
}

impl<O: Default + 'static, S: 'static> Separated<O, S> {
    fn drive<'a>(
        &self,
        ctx: &mut Context<'_>,
        key: CacheKey,
        start_spot: Option<usize>,
        mut state: State<'a>,
        mut step: usize,
        mut items: Vec<O>,
    ) -> PResult<'a, Vec<O>> {
        let mut before_separator: Option<State<'a>> = None;

        loop {
            let before = state.checkpoint();

            if step % 2 == 1 {
                if self.at_most.is_some_and(|max| items.len() >= max) {
                    return (before, Ok(items));
                }
                let (next, result) = self.separator.parse(ctx, state);
                if ctx.has_fatal_error() {
                    return branch::abort(ctx, next);
                }
                let error = match result {
                    Ok(_) => {
                        before_separator = Some(before);
                        state = next;
                        step += 1;
                        continue;
                    }
                    Err(error) => error,
                };

                if branch::is_committed(before.safe_spot(), &next) {
                    return self.fail(ctx, key, step, items, before.snapshot(), next, error);
                }
                if items.len() >= self.at_least {
                    return (before, Ok(items));
                }
                if branch::is_committed(start_spot, &next) {
                    return self.fail(ctx, key, step, items, before.snapshot(), next, error);
                }
                return (next, Err(error));
            }

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
                    step += 1;
                    continue;
                }
                Err(error) => error,
            };

            // A separator followed by a failing element is one attempt.
            let attempt_spot = before_separator
                .as_ref()
                .map_or(before.safe_spot(), State::safe_spot);
            if branch::is_committed(attempt_spot, &next) {
                return self.fail(ctx, key, step, items, before.snapshot(), next, error);
            }
            if items.len() >= self.at_least {
                let end = match before_separator {
                    Some(separator_start) if !self.trailing => separator_start,
                    _ => before,
                };
                return (end, Ok(items));
            }
            if branch::is_committed(start_spot, &next) {
                return self.fail(ctx, key, step, items, before.snapshot(), next, error);
            }
            return (next, Err(error));
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn fail<'a>(
        &self,
        ctx: &mut Context<'_>,
        key: CacheKey,
        step: usize,
        items: Vec<O>,
        child_start: Snapshot,
        failed: State<'a>,
        error: ParserError,
    ) -> PResult<'a, Vec<O>> {
        let proposal = self.propose(ctx, step, &child_start, &failed);
        let failure = Failure {
            child: step,
            partial: items,
            child_start,
            state: failed,
            error,
            finish: Some(FINISH),
        };
        branch::register(ctx, BRANCH, key, failure, proposal)
    }

    /// Restart the failed step, or continue with the other kind of step.
    fn propose(
        &self,
        ctx: &Context<'_>,
        step: usize,
        child_start: &Snapshot,
        failed: &State<'_>,
    ) -> Option<Choice> {
        let deleter = ctx.deleter();
        let restarts = if step % 2 == 0 { ELEMENT } else { SEPARATOR };
        self.recoverers
            .best_of([ELEMENT, SEPARATOR], |index, recoverer| {
                let replays_from = (index == restarts).then_some(child_start.pos);
                branch::probe(deleter, failed, recoverer, replays_from)
            })
    }
}

impl<O: Default + 'static, S: 'static> ParserImpl<Vec<O>> for Separated<O, S> {
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
        self.element.is_safe_spot() || self.separator.is_safe_spot()
    }

    fn parse<'a>(&self, ctx: &mut Context<'_>, state: State<'a>) -> PResult<'a, Vec<O>> {
        let key = CacheKey::new(self.id, state.pos());
        let start_spot = state.safe_spot();

        match *state.mode() {
            Mode::Happy => self.drive(ctx, key, start_spot, state, 0, Vec::new()),
            Mode::Handle { .. } => match branch::reenter::<Vec<O>>(ctx, BRANCH, key, &state) {
                Resume::Descend { entry, state } => {
                    self.drive(ctx, key, start_spot, state, entry.child, entry.partial)
                }
                Resume::Escape {
                    entry,
                    state,
                    choice,
                } => {
                    let mut items = entry.partial;
                    if choice.index == FINISH {
                        if entry.child % 2 == 0 {
                            items.push(O::default());
                        }
                        return (state.checkpoint(), Ok(items));
                    }
                    let step = match (entry.child % 2 == 0, choice.index) {
                        (true, ELEMENT) | (false, SEPARATOR) => entry.child,
                        (true, _) => {
                            items.push(O::default());
                            entry.child + 1
                        }
                        (false, _) => entry.child + 1,
                    };
                    self.drive(ctx, key, start_spot, state, step, items)
                }
            },
            mode @ (Mode::Error { .. } | Mode::Rewind { .. } | Mode::Escape { .. }) => {
                invariants::unexpected_mode(BRANCH, mode)
            }
        }
    }
}

/// Between `at_least` and `at_most` elements separated by `separator`.
///
/// With `trailing`, a separator after the last element is consumed.
pub fn separated_mn<O, S>(
    element: Parser<O>,
    separator: Parser<S>,
    at_least: usize,
    at_most: Option<usize>,
    trailing: bool,
) -> Parser<Vec<O>>
where
    O: Default + 'static,
    S: 'static,
{
    if let Some(max) = at_most.filter(|&max| max < at_least) {
        invariants::invalid_bounds(at_least, max);
    }
    let recoverers = CombiningRecoverer::new([element.recoverer(), separator.recoverer()]);
    Parser::new(Separated {
        id: BranchId::next(),
        element,
        separator,
        recoverers,
        at_least,
        at_most,
        trailing,
    })
}

pub fn separated0<O, S>(element: Parser<O>, separator: Parser<S>, trailing: bool) -> Parser<Vec<O>>
where
    O: Default + 'static,
    S: 'static,
{
    separated_mn(element, separator, 0, None, trailing)
}

pub fn separated1<O, S>(element: Parser<O>, separator: Parser<S>, trailing: bool) -> Parser<Vec<O>>
where
    O: Default + 'static,
    S: 'static,
{
    separated_mn(element, separator, 1, None, trailing)
}
