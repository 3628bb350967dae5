//! Running a parser over an input.
//!
//! The driver runs the root parser in Happy mode. When the run comes back in
//! Error mode with a recovery candidate, it re-enters the root in Handle mode
//! from the initial state; the grammar replays its cached path to the chosen
//! branch, which skips the wasted input and carries on. The loop ends with a
//! success or with an error nothing can recover from. Best-effort runs close
//! the failing branches instead of giving up on them.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use comb_core::{ByteDeleter, Deleter, RuneTypeChangeDeleter};

use crate::cache::CacheKey;
use crate::diagnostics::{Diagnostics, ParserError};
use crate::invariants;
use crate::parser::{Context, Parser};
use crate::state::{Mode, State};
use crate::trace::{NoopTracer, Tracer};
use crate::{Error, Result};

/// What a run returns when an error cannot be recovered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// No output; the rest starts at the failure.
    #[default]
    Strict,
    /// The innermost failing branch that can still produce a value returns
    /// what it parsed, with defaults for the missing parts, and the run goes
    /// on from the end of the input. Without such a branch the output is
    /// `O::default()`. Either way the rest of the input counts as consumed.
    BestEffort,
}

#[derive(Clone)]
pub struct RunConfig {
    deleter: Rc<dyn Deleter>,
    recovery: bool,
    policy: FailurePolicy,
    max_recoveries: Option<u32>,
}

impl RunConfig {
    /// Text input: deletes runs of same-class characters.
    pub fn text() -> Self {
        Self::with_default_deleter(Rc::new(RuneTypeChangeDeleter))
    }

    /// Binary input: deletes single bytes.
    pub fn binary() -> Self {
        Self::with_default_deleter(Rc::new(ByteDeleter))
    }

    fn with_default_deleter(deleter: Rc<dyn Deleter>) -> Self {
        Self {
            deleter,
            recovery: true,
            policy: FailurePolicy::default(),
            max_recoveries: None,
        }
    }

    pub fn with_deleter(mut self, deleter: impl Deleter + 'static) -> Self {
        self.deleter = Rc::new(deleter);
        self
    }

    /// With recovery off the first committed failure is reported as is.
    pub fn with_recovery(mut self, enabled: bool) -> Self {
        self.recovery = enabled;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Upper bound on recoveries in one run; `None` means unlimited.
    pub fn with_max_recoveries(mut self, limit: Option<u32>) -> Self {
        self.max_recoveries = limit;
        self
    }

    pub fn deleter(&self) -> &dyn Deleter {
        self.deleter.as_ref()
    }

    pub fn recovery(&self) -> bool {
        self.recovery
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn max_recoveries(&self) -> Option<u32> {
        self.max_recoveries
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::text()
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("deleter", &self.deleter)
            .field("recovery", &self.recovery)
            .field("policy", &self.policy)
            .field("max_recoveries", &self.max_recoveries)
            .finish()
    }
}

/// Outcome of a run that was not aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<'i, O> {
    /// `None` when an error could not be recovered under the strict policy.
    pub output: Option<O>,
    /// Every recovered or reported error, in the order they were found.
    pub errors: Diagnostics,
    /// Input left unconsumed.
    pub rest: &'i [u8],
}

impl<O> Parsed<'_, O> {
    /// Output present and no errors.
    pub fn is_ok(&self) -> bool {
        self.output.is_some() && self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<O> {
        match self.output {
            Some(output) if self.errors.is_empty() => Ok(output),
            _ => Err(Error::Parse(self.errors)),
        }
    }
}

/// Runs `parser` over text with the default configuration.
pub fn run<'i, O: Default + 'static>(parser: &Parser<O>, input: &'i str) -> Result<Parsed<'i, O>> {
    run_with(parser, input.as_bytes(), &RunConfig::text(), &mut NoopTracer)
}

/// Runs `parser` over binary input with the default configuration.
pub fn run_bytes<'i, O: Default + 'static>(
    parser: &Parser<O>,
    input: &'i [u8],
) -> Result<Parsed<'i, O>> {
    run_with(parser, input, &RunConfig::binary(), &mut NoopTracer)
}

/// Runs `parser` over text and fails if any error was found.
pub fn parse<O: Default + 'static>(parser: &Parser<O>, input: &str) -> Result<O> {
    run(parser, input)?.into_result()
}

pub fn run_with<'i, O: Default + 'static>(
    parser: &Parser<O>,
    input: &'i [u8],
    config: &RunConfig,
    tracer: &mut dyn Tracer,
) -> Result<Parsed<'i, O>> {
    let mut ctx = Context::new(config.deleter(), tracer);
    let start = State::new(input);
    let mut attempted: HashSet<(CacheKey, usize, usize)> = HashSet::new();
    let mut recoveries = 0u32;
    let mut entry = start.clone();

    loop {
        let (end, result) = parser.parse(&mut ctx, entry);
        let fallbacks = ctx.take_fallbacks();
        if let Some(error) = ctx.take_fatal() {
            return Err(Error::EmptyElement(error));
        }

        let error = match result {
            Ok(output) => {
                if !end.mode().is_happy() {
                    invariants::unexpected_mode("run", *end.mode());
                }
                let rest = end.rest();
                return Ok(Parsed {
                    output: Some(output),
                    errors: end.into_errors().into(),
                    rest,
                });
            }
            Err(error) => error,
        };

        let candidate = match *end.mode() {
            Mode::Happy => None,
            Mode::Error { best } if config.recovery => best,
            Mode::Error { .. } => None,
            mode @ (Mode::Handle { .. } | Mode::Rewind { .. } | Mode::Escape { .. }) => {
                invariants::unexpected_mode("run", mode)
            }
        };
        let fallbacks = match config.policy {
            FailurePolicy::BestEffort if matches!(end.mode(), Mode::Error { .. }) => fallbacks,
            FailurePolicy::Strict | FailurePolicy::BestEffort => Vec::new(),
        };
        // Retrying the same resume point would fail the same way.
        let Some(candidate) = candidate
            .into_iter()
            .chain(fallbacks)
            .find(|c| attempted.insert((c.key, c.choice.index, end.pos() + c.choice.waste)))
        else {
            return Ok(reject(&mut ctx, config.policy, end, error));
        };

        recoveries += 1;
        if config.max_recoveries.is_some_and(|max| recoveries > max) {
            return Err(Error::RecoveryLimitExceeded);
        }
        ctx.tracer().trace_restart(recoveries);
        entry = start.clone().with_mode(Mode::Handle {
            target: candidate.key,
            choice: candidate.choice,
        });
    }
}

fn reject<'i, O: Default>(
    ctx: &mut Context<'_>,
    policy: FailurePolicy,
    end: State<'i>,
    error: ParserError,
) -> Parsed<'i, O> {
    ctx.tracer().trace_reject(&error);
    let input = end.input();
    let (output, rest) = match policy {
        FailurePolicy::Strict => (None, end.rest()),
        FailurePolicy::BestEffort => (Some(O::default()), &input[input.len()..]),
    };
    let errors = end.with_mode(Mode::Happy).fail(error).into_errors();
    Parsed {
        output,
        errors: errors.into(),
        rest,
    }
}
