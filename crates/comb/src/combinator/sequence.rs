//! Sequences: children run in order, outputs collected positionally.
//!
//! Recovery may resume at any child from the failing one onwards. Children
//! skipped by a recovery contribute their `Default` output, including every
//! child from the failing one on when a best-effort run closes the sequence.

use crate::branch::{self, Failure, Resume};
use crate::cache::{BranchId, CacheKey};
use crate::combinator::map;
use crate::diagnostics::ParserError;
use crate::invariants;
use crate::parser::{Context, PResult, Parser, ParserImpl, ParserMeta};
use crate::recoverer::{Choice, CombiningRecoverer, Recoverer};
use crate::state::{Mode, Snapshot, State};

const BRANCH: &str = "sequence";

/// Children of a sequence, homogeneous (`Vec`) or heterogeneous (tuples).
pub(crate) trait Children: 'static {
    type Output: Default + 'static;

    fn count(&self) -> usize;

    fn child(&self, index: usize) -> &dyn ParserMeta;

    /// Runs child `index`, storing its output into `partial` on success.
    fn parse_child<'a>(
        &self,
        index: usize,
        ctx: &mut Context<'_>,
        state: State<'a>,
        partial: &mut Self::Output,
    ) -> (State<'a>, Result<(), ParserError>);

    /// Fills the slot of a child that recovery skipped.
    fn skip_child(&self, index: usize, partial: &mut Self::Output);
}

impl<O: Default + 'static> Children for Vec<Parser<O>> {
    type Output = Vec<O>;

    fn count(&self) -> usize {
        self.len()
    }

    fn child(&self, index: usize) -> &dyn ParserMeta {
        &self[index]
    }

    fn parse_child<'a>(
        &self,
        index: usize,
        ctx: &mut Context<'_>,
        state: State<'a>,
        partial: &mut Vec<O>,
    ) -> (State<'a>, Result<(), ParserError>) {
        let (state, result) = self[index].parse(ctx, state);
        (state, result.map(|output| partial.push(output)))
    }

    fn skip_child(&self, _index: usize, partial: &mut Vec<O>) {
        partial.push(O::default());
    }
}

macro_rules! tuple_children {
    ($count:literal; $($name:ident $index:tt),+) => {
        impl<$($name: Default + 'static),+> Children for ($(Parser<$name>,)+) {
            type Output = ($($name,)+);

            fn count(&self) -> usize {
                $count
            }

            fn child(&self, index: usize) -> &dyn ParserMeta {
                match index {
                    $($index => &self.$index,)+
                    _ => unreachable!("tuple sequence has {} children", $count),
                }
            }

            fn parse_child<'a>(
                &self,
                index: usize,
                ctx: &mut Context<'_>,
                state: State<'a>,
                partial: &mut Self::Output,
            ) -> (State<'a>, Result<(), ParserError>) {
                match index {
                    $($index => {
                        let (state, result) = self.$index.parse(ctx, state);
                        (state, result.map(|output| partial.$index = output))
                    })+
                    _ => unreachable!("tuple sequence has {} children", $count),
                }
            }

            fn skip_child(&self, _index: usize, _partial: &mut Self::Output) {}
        }
    };
}

tuple_children!(2; A 0, B 1);
tuple_children!(3; A 0, B 1, C 2);
tuple_children!(4; A 0, B 1, C 2, D 3);
tuple_children!(5; A 0, B 1, C 2, D 3, E 4);

pub(crate) struct Sequence<C> {
    id: BranchId,
    children: C,
    recoverers: CombiningRecoverer,
    expected: String,
    safe_spot: bool,
}

impl<C: Children> Sequence<C> {
    pub(crate) fn new(children: C) -> Self {
        let count = children.count();
        if count == 0 {
            invariants::empty_branch(BRANCH);
        }
        let recoverers = CombiningRecoverer::new((0..count).map(|i| children.child(i).recoverer()));
        let expected = children.child(0).expected().to_owned();
        let safe_spot = (0..count).any(|i| children.child(i).is_safe_spot());
        Self {
            id: BranchId::next(),
            children,
            recoverers,
            expected,
            safe_spot,
        }
    }

    /// Runs children `from..` starting at `state`, with `partial` holding the
    /// outputs of the children before `from`.
    fn drive<'a>(
        &self,
        ctx: &mut Context<'_>,
        key: CacheKey,
        start_spot: Option<usize>,
        mut state: State<'a>,
        from: usize,
        mut partial: C::Output,
    ) -> PResult<'a, C::Output> {
        for index in from..self.children.count() {
            let child_start = self.safe_spot.then(|| state.snapshot());
            let (next, result) = self.children.parse_child(index, ctx, state, &mut partial);
            if ctx.has_fatal_error() {
                return branch::abort(ctx, next);
            }

            let error = match result {
                Ok(()) => {
                    state = next;
                    continue;
                }
                Err(error) => error,
            };
            if !branch::is_committed(start_spot, &next) {
                return (next, Err(error));
            }

            let Some(child_start) = child_start else {
                invariants::undeclared_safe_spot(&self.expected)
            };
            let proposal = self.propose(ctx, index, &child_start, &next);
            let failure = Failure {
                child: index,
                partial,
                child_start,
                state: next,
                error,
                finish: Some(self.children.count()),
            };
            return branch::register(ctx, BRANCH, key, failure, proposal);
        }
        (state, Ok(partial))
    }

    /// Cheapest resume point among the failed child and the ones after it.
    fn propose(
        &self,
        ctx: &Context<'_>,
        failed_child: usize,
        child_start: &Snapshot,
        failed: &State<'_>,
    ) -> Option<Choice> {
        let deleter = ctx.deleter();
        self.recoverers
            .best_of(failed_child..self.children.count(), |index, recoverer| {
                let replays_from = (index == failed_child).then_some(child_start.pos);
                branch::probe(deleter, failed, recoverer, replays_from)
            })
    }
}

impl<C: Children> ParserImpl<C::Output> for Sequence<C> {
    fn expected(&self) -> &str {
        &self.expected
    }

    fn recoverer(&self) -> Recoverer {
        self.recoverers.first_usable()
    }

    fn is_safe_spot(&self) -> bool {
        self.safe_spot
    }

    fn parse<'a>(&self, ctx: &mut Context<'_>, state: State<'a>) -> PResult<'a, C::Output> {
        let key = CacheKey::new(self.id, state.pos());
        let start_spot = state.safe_spot();

        match *state.mode() {
            Mode::Happy => self.drive(ctx, key, start_spot, state, 0, C::Output::default()),
            Mode::Handle { .. } => match branch::reenter::<C::Output>(ctx, BRANCH, key, &state) {
                Resume::Descend { entry, state } => {
                    self.drive(ctx, key, start_spot, state, entry.child, entry.partial)
                }
                Resume::Escape {
                    entry,
                    state,
                    choice,
                } => {
                    let mut partial = entry.partial;
                    for index in entry.child..choice.index {
                        self.children.skip_child(index, &mut partial);
                    }
                    if choice.index == self.children.count() {
                        return (state.checkpoint(), Ok(partial));
                    }
                    self.drive(ctx, key, start_spot, state, choice.index, partial)
                }
            },
            mode @ (Mode::Error { .. } | Mode::Rewind { .. } | Mode::Escape { .. }) => {
                invariants::unexpected_mode(BRANCH, mode)
            }
        }
    }
}

/// Runs `parsers` in order and collects their outputs.
///
/// ```
/// use comb::{alpha0, digit1, run, sequence};
///
/// let parser = sequence(vec![digit1(), alpha0(), digit1()]);
/// let parsed = run(&parser, "1a3bcd").unwrap();
/// assert_eq!(parsed.output, Some(vec!["1".to_string(), "a".into(), "3".into()]));
/// assert_eq!(parsed.rest, b"bcd");
/// ```
pub fn sequence<O: Default + 'static>(parsers: Vec<Parser<O>>) -> Parser<Vec<O>> {
    Parser::new(Sequence::new(parsers))
}

pub fn map2<A, B, O, F>(a: Parser<A>, b: Parser<B>, f: F) -> Parser<O>
where
    A: Default + 'static,
    B: Default + 'static,
    O: 'static,
    F: Fn(A, B) -> O + 'static,
{
    map(Parser::new(Sequence::new((a, b))), move |(a, b)| f(a, b))
}

pub fn map3<A, B, C, O, F>(a: Parser<A>, b: Parser<B>, c: Parser<C>, f: F) -> Parser<O>
where
    A: Default + 'static,
    B: Default + 'static,
    C: Default + 'static,
    O: 'static,
    F: Fn(A, B, C) -> O + 'static,
{
    map(Parser::new(Sequence::new((a, b, c))), move |(a, b, c)| {
        f(a, b, c)
    })
}

pub fn map4<A, B, C, D, O, F>(
    a: Parser<A>,
    b: Parser<B>,
    c: Parser<C>,
    d: Parser<D>,
    f: F,
) -> Parser<O>
where
    A: Default + 'static,
    B: Default + 'static,
    C: Default + 'static,
    D: Default + 'static,
    O: 'static,
    F: Fn(A, B, C, D) -> O + 'static,
{
    map(
        Parser::new(Sequence::new((a, b, c, d))),
        move |(a, b, c, d)| f(a, b, c, d),
    )
}

pub fn map5<A, B, C, D, E, O, F>(
    a: Parser<A>,
    b: Parser<B>,
    c: Parser<C>,
    d: Parser<D>,
    e: Parser<E>,
    f: F,
) -> Parser<O>
where
    A: Default + 'static,
    B: Default + 'static,
    C: Default + 'static,
    D: Default + 'static,
    E: Default + 'static,
    O: 'static,
    F: Fn(A, B, C, D, E) -> O + 'static,
{
    map(
        Parser::new(Sequence::new((a, b, c, d, e))),
        move |(a, b, c, d, e)| f(a, b, c, d, e),
    )
}

/// `first` then `second`, keeping the output of `second`.
pub fn preceded<A, B>(first: Parser<A>, second: Parser<B>) -> Parser<B>
where
    A: Default + 'static,
    B: Default + 'static,
{
    map2(first, second, |_, b| b)
}

/// `first` then `second`, keeping the output of `first`.
pub fn terminated<A, B>(first: Parser<A>, second: Parser<B>) -> Parser<A>
where
    A: Default + 'static,
    B: Default + 'static,
{
    map2(first, second, |a, _| a)
}

/// `open`, `inner`, `close`, keeping the output of `inner`.
pub fn delimited<A, B, C>(open: Parser<A>, inner: Parser<B>, close: Parser<C>) -> Parser<B>
where
    A: Default + 'static,
    B: Default + 'static,
    C: Default + 'static,
{
    map3(open, inner, close, |_, b, _| b)
}
