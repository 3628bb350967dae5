//! The parser abstraction and the per-run context.
//!
//! A parser is a function from [`State`] to `(State, Result<O, ParserError>)`
//! plus metadata: what it expects (for messages), how to resynchronize in
//! front of it ([`Recoverer`]), and whether it contains a commit point.
//!
//! [`Parser`] is a cheap-to-clone handle over a shared [`ParserImpl`], so one
//! grammar value can be reused by many combinators and many runs.

use std::fmt;
use std::rc::Rc;

use comb_core::Deleter;

use crate::cache::{Cache, CacheKey, CachedResult};
use crate::diagnostics::ParserError;
use crate::invariants;
use crate::recoverer::Recoverer;
use crate::state::{Candidate, Mode, State};
use crate::trace::Tracer;

/// Result of one parser call: the state it ended in and its output.
pub type PResult<'a, O> = (State<'a>, Result<O, ParserError>);

/// Implementation side of a parser.
///
/// Leaves usually go through [`Parser::leaf`]. Implementing this trait
/// directly is for parsers that need the [`Context`] or the full [`State`].
pub trait ParserImpl<O> {
    /// Human-readable description used in `expected ...` messages.
    fn expected(&self) -> &str;

    fn recoverer(&self) -> Recoverer;

    /// Whether this parser is or contains a commit point.
    fn is_safe_spot(&self) -> bool {
        false
    }

    fn parse<'a>(&self, ctx: &mut Context<'_>, state: State<'a>) -> PResult<'a, O>;
}

pub struct Parser<O> {
    inner: Rc<dyn ParserImpl<O>>,
}

impl<O> Clone for Parser<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<O: 'static> Parser<O> {
    pub fn new(inner: impl ParserImpl<O> + 'static) -> Self {
        Self {
            inner: Rc::new(inner),
        }
    }

    /// Recovery-unaware parser from a scanner over the unconsumed input.
    ///
    /// `scan` returns the number of bytes matched and the output, or `None`
    /// when the input does not start with what the parser expects.
    pub fn leaf(
        expected: impl Into<String>,
        recoverer: Recoverer,
        scan: impl Fn(&[u8]) -> Option<(usize, O)> + 'static,
    ) -> Self {
        Self::new(Leaf {
            expected: expected.into(),
            recoverer,
            scan,
        })
    }

    pub fn expected(&self) -> &str {
        self.inner.expected()
    }

    pub fn recoverer(&self) -> Recoverer {
        self.inner.recoverer()
    }

    pub fn is_safe_spot(&self) -> bool {
        self.inner.is_safe_spot()
    }

    /// Runs the parser. A state in Escape mode first discards its waste.
    pub fn parse<'a>(&self, ctx: &mut Context<'_>, state: State<'a>) -> PResult<'a, O> {
        if let Mode::Escape { waste } = *state.mode() {
            ctx.tracer().trace_escape(state.pos(), waste);
            let state = state.move_by(waste).with_mode(Mode::Happy);
            return self.inner.parse(ctx, state);
        }
        self.inner.parse(ctx, state)
    }
}

impl<O> fmt::Debug for Parser<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("expected", &self.inner.expected())
            .field("recoverer", &self.inner.recoverer())
            .field("safe_spot", &self.inner.is_safe_spot())
            .finish()
    }
}

/// Metadata of a child parser, independent of its output type.
pub(crate) trait ParserMeta {
    fn expected(&self) -> &str;
    fn recoverer(&self) -> Recoverer;
    fn is_safe_spot(&self) -> bool;
}

impl<O> ParserMeta for Parser<O> {
    fn expected(&self) -> &str {
        self.inner.expected()
    }

    fn recoverer(&self) -> Recoverer {
        self.inner.recoverer()
    }

    fn is_safe_spot(&self) -> bool {
        self.inner.is_safe_spot()
    }
}

struct Leaf<F> {
    expected: String,
    recoverer: Recoverer,
    scan: F,
}

impl<O, F> ParserImpl<O> for Leaf<F>
where
    F: Fn(&[u8]) -> Option<(usize, O)>,
{
    fn expected(&self) -> &str {
        &self.expected
    }

    fn recoverer(&self) -> Recoverer {
        self.recoverer.clone()
    }

    fn parse<'a>(&self, _ctx: &mut Context<'_>, state: State<'a>) -> PResult<'a, O> {
        match *state.mode() {
            Mode::Happy => {}
            mode => invariants::unexpected_mode(&self.expected, mode),
        }
        match (self.scan)(state.rest()) {
            Some((len, output)) => (state.move_by(len), Ok(output)),
            None => {
                let error = state.expected(&self.expected);
                (state, Err(error))
            }
        }
    }
}

/// Everything a run shares across parser calls besides the [`State`].
pub struct Context<'r> {
    cache: Cache,
    deleter: &'r dyn Deleter,
    tracer: &'r mut dyn Tracer,
    fatal: Option<ParserError>,
    fallbacks: Vec<Candidate>,
}

impl<'r> Context<'r> {
    pub(crate) fn new(deleter: &'r dyn Deleter, tracer: &'r mut dyn Tracer) -> Self {
        Self {
            cache: Cache::default(),
            deleter,
            tracer,
            fatal: None,
            fallbacks: Vec::new(),
        }
    }

    /// Token boundaries used when recovery has to force progress.
    pub fn deleter(&self) -> &'r dyn Deleter {
        self.deleter
    }

    pub fn tracer(&mut self) -> &mut dyn Tracer {
        &mut *self.tracer
    }

    /// Records a fatal error. The first one wins.
    pub fn set_fatal(&mut self, error: ParserError) {
        if self.fatal.is_none() {
            self.fatal = Some(error);
        }
    }

    pub fn has_fatal_error(&self) -> bool {
        self.fatal.is_some()
    }

    /// The recorded fatal error, for parsers unwinding because of it.
    pub(crate) fn fatal_error(&self) -> ParserError {
        match &self.fatal {
            Some(error) => error.clone(),
            None => invariants::no_fatal_error(),
        }
    }

    pub(crate) fn take_fatal(&mut self) -> Option<ParserError> {
        self.fatal.take()
    }

    /// Branches able to close early, innermost first.
    pub(crate) fn offer_fallback(&mut self, candidate: Candidate) {
        self.fallbacks.push(candidate);
    }

    pub(crate) fn fallback_mark(&self) -> usize {
        self.fallbacks.len()
    }

    /// Drops fallbacks offered after `mark` by a failure that was swallowed.
    pub(crate) fn forget_fallbacks(&mut self, mark: usize) {
        self.fallbacks.truncate(mark);
    }

    pub(crate) fn take_fallbacks(&mut self) -> Vec<Candidate> {
        std::mem::take(&mut self.fallbacks)
    }

    pub(crate) fn remember<P: 'static>(&mut self, key: CacheKey, entry: CachedResult<P>) {
        self.cache.insert(key, entry);
    }

    pub(crate) fn recall<P: 'static>(&mut self, key: CacheKey) -> CachedResult<P> {
        self.cache.take(key)
    }
}
