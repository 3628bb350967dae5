//! Commit points.

use crate::invariants;
use crate::parser::{Context, PResult, Parser, ParserImpl};
use crate::recoverer::Recoverer;
use crate::state::State;

struct NoWayBack<O> {
    inner: Parser<O>,
}

impl<O: 'static> ParserImpl<O> for NoWayBack<O> {
    fn expected(&self) -> &str {
        self.inner.expected()
    }

    fn recoverer(&self) -> Recoverer {
        self.inner.recoverer()
    }

    fn is_safe_spot(&self) -> bool {
        true
    }

    fn parse<'a>(&self, ctx: &mut Context<'_>, state: State<'a>) -> PResult<'a, O> {
        let start = state.pos();
        let (next, result) = self.inner.parse(ctx, state);
        match result {
            Ok(output) => {
                invariants::assert_safe_spot_progress(start, next.pos(), self.inner.expected());
                (next.mark_safe_spot(), Ok(output))
            }
            Err(error) => (next, Err(error)),
        }
    }
}

/// Marks `parser` as a point of no return.
///
/// Once it matched, a later failure in the enclosing branches is recovered
/// (or reported) instead of letting an enclosing `first_successful` try
/// another alternative.
///
/// # Panics
///
/// When `parser` can match empty input: a commit point that consumes nothing
/// can never be recovered from.
pub fn no_way_back<O: 'static>(parser: Parser<O>) -> Parser<O> {
    if parser.recoverer().is_forbidden() {
        invariants::zero_width_safe_spot(parser.expected());
    }
    Parser::new(NoWayBack { inner: parser })
}

/// Same as [`no_way_back`].
pub fn safe_spot<O: 'static>(parser: Parser<O>) -> Parser<O> {
    no_way_back(parser)
}
