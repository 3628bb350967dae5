//! Single-child combinators. Modes pass straight through to the child.

use crate::branch;
use crate::diagnostics::{ErrorKind, ParserError};
use crate::parser::{Context, PResult, Parser, ParserImpl};
use crate::recoverer::Recoverer;
use crate::state::State;

struct Map<O, F> {
    inner: Parser<O>,
    f: F,
}

impl<O: 'static, U, F: Fn(O) -> U> ParserImpl<U> for Map<O, F> {
    fn expected(&self) -> &str {
        self.inner.expected()
    }

    fn recoverer(&self) -> Recoverer {
        self.inner.recoverer()
    }

    fn is_safe_spot(&self) -> bool {
        self.inner.is_safe_spot()
    }

    fn parse<'a>(&self, ctx: &mut Context<'_>, state: State<'a>) -> PResult<'a, U> {
        let (state, result) = self.inner.parse(ctx, state);
        (state, result.map(&self.f))
    }
}

pub fn map<O, U, F>(parser: Parser<O>, f: F) -> Parser<U>
where
    O: 'static,
    U: 'static,
    F: Fn(O) -> U + 'static,
{
    Parser::new(Map { inner: parser, f })
}

struct TryMap<O, F> {
    inner: Parser<O>,
    f: F,
}

impl<O: 'static, U, F: Fn(O) -> Result<U, String>> ParserImpl<U> for TryMap<O, F> {
    fn expected(&self) -> &str {
        self.inner.expected()
    }

    fn recoverer(&self) -> Recoverer {
        self.inner.recoverer()
    }

    fn is_safe_spot(&self) -> bool {
        self.inner.is_safe_spot()
    }

    fn parse<'a>(&self, ctx: &mut Context<'_>, state: State<'a>) -> PResult<'a, U> {
        let start = state.pos();
        let (state, result) = self.inner.parse(ctx, state);
        let value = match result {
            Ok(value) => value,
            Err(error) => return (state, Err(error)),
        };
        match (self.f)(value) {
            Ok(output) => (state, Ok(output)),
            Err(message) => (state, Err(ParserError::semantic(start, message))),
        }
    }
}

/// Like [`map`], but `f` may reject the value with a semantic error.
///
/// The error points at the start of the rejected input; the state stays at
/// its end so recovery never rescans it.
pub fn try_map<O, U, F>(parser: Parser<O>, f: F) -> Parser<U>
where
    O: 'static,
    U: 'static,
    F: Fn(O) -> Result<U, String> + 'static,
{
    Parser::new(TryMap { inner: parser, f })
}

struct Optional<O> {
    inner: Parser<O>,
}

impl<O: 'static> ParserImpl<Option<O>> for Optional<O> {
    fn expected(&self) -> &str {
        self.inner.expected()
    }

    fn recoverer(&self) -> Recoverer {
        Recoverer::forbidden()
    }

    fn is_safe_spot(&self) -> bool {
        self.inner.is_safe_spot()
    }

    fn parse<'a>(&self, ctx: &mut Context<'_>, state: State<'a>) -> PResult<'a, Option<O>> {
        let before = state.checkpoint();
        let (next, result) = self.inner.parse(ctx, state);
        match result {
            Ok(value) => (next, Ok(Some(value))),
            Err(error) if branch::is_committed(before.safe_spot(), &next) => (next, Err(error)),
            Err(_) => (before, Ok(None)),
        }
    }
}

pub fn optional<O: 'static>(parser: Parser<O>) -> Parser<Option<O>> {
    Parser::new(Optional { inner: parser })
}

struct Label<O> {
    inner: Parser<O>,
    label: String,
}

impl<O: 'static> ParserImpl<O> for Label<O> {
    fn expected(&self) -> &str {
        &self.label
    }

    fn recoverer(&self) -> Recoverer {
        self.inner.recoverer()
    }

    fn is_safe_spot(&self) -> bool {
        self.inner.is_safe_spot()
    }

    fn parse<'a>(&self, ctx: &mut Context<'_>, state: State<'a>) -> PResult<'a, O> {
        let start = state.pos();
        let (next, result) = self.inner.parse(ctx, state);
        match result {
            Err(error)
                if next.mode().is_happy()
                    && error.pos() == start
                    && error.kind() == ErrorKind::Syntax =>
            {
                (next, Err(ParserError::syntax(start, &self.label)))
            }
            result => (next, result),
        }
    }
}

/// Reports `expected {label}` instead of the inner expectation when the
/// parser fails without consuming input.
pub fn label<O: 'static>(parser: Parser<O>, label: impl Into<String>) -> Parser<O> {
    Parser::new(Label {
        inner: parser,
        label: label.into(),
    })
}

struct Peek<O> {
    inner: Parser<O>,
}

impl<O: 'static> ParserImpl<O> for Peek<O> {
    fn expected(&self) -> &str {
        self.inner.expected()
    }

    fn recoverer(&self) -> Recoverer {
        Recoverer::forbidden()
    }

    fn parse<'a>(&self, ctx: &mut Context<'_>, state: State<'a>) -> PResult<'a, O> {
        let before = state.checkpoint();
        let mark = ctx.fallback_mark();
        let (_, result) = self.inner.parse(ctx, state);
        ctx.forget_fallbacks(mark);
        (before, result)
    }
}

/// Runs `parser` without consuming input. Commit points inside are dropped.
pub fn peek<O: 'static>(parser: Parser<O>) -> Parser<O> {
    Parser::new(Peek { inner: parser })
}

struct Not<O> {
    inner: Parser<O>,
    expected: String,
}

impl<O: 'static> ParserImpl<()> for Not<O> {
    fn expected(&self) -> &str {
        &self.expected
    }

    fn recoverer(&self) -> Recoverer {
        Recoverer::forbidden()
    }

    fn parse<'a>(&self, ctx: &mut Context<'_>, state: State<'a>) -> PResult<'a, ()> {
        let before = state.checkpoint();
        let mark = ctx.fallback_mark();
        let (_, result) = self.inner.parse(ctx, state);
        ctx.forget_fallbacks(mark);
        match result {
            Ok(_) => {
                let error = before.expected(&self.expected);
                (before, Err(error))
            }
            Err(_) => (before, Ok(())),
        }
    }
}

/// Succeeds without consuming input when `parser` fails.
pub fn not<O: 'static>(parser: Parser<O>) -> Parser<()> {
    let expected = format!("not {}", parser.expected());
    Parser::new(Not {
        inner: parser,
        expected,
    })
}
