//! Witness protocol shared by every branch combinator.
//!
//! In Happy mode a branch runs its children. When a child fails after a
//! commit point, the branch registers the failure in the cache and returns in
//! Error mode; every enclosing branch does the same and may offer a cheaper
//! recovery. The driver then re-enters the grammar in Handle mode: branches on
//! the failure path pick their witness up with [`reenter`] and either descend
//! into the failing child or, for the chosen branch, rewind to the failure and
//! resume at the recovering child in Escape mode.

use comb_core::Deleter;

use crate::cache::{CacheKey, CachedResult};
use crate::diagnostics::ParserError;
use crate::invariants;
use crate::parser::{Context, PResult};
use crate::recoverer::{Choice, Recoverer};
use crate::state::{Candidate, Mode, Snapshot, State};

/// Whether a failure must be recovered rather than handed back to the caller.
///
/// `attempt_safe_spot` is the commit offset at the start of the attempt that
/// failed; any newer commit, or an inner branch already in Error mode, means
/// the attempt cannot be abandoned.
pub(crate) fn is_committed(attempt_safe_spot: Option<usize>, failed: &State<'_>) -> bool {
    match *failed.mode() {
        Mode::Error { .. } => true,
        Mode::Happy => failed.safe_spot() > attempt_safe_spot,
        mode => invariants::unexpected_mode("branch child", mode),
    }
}

/// Waste for resuming at a candidate that uses `recoverer`.
///
/// `replays_from` is the offset the failed child started at when the
/// candidate restarts that same child. Resuming exactly there would replay the
/// failure, so one token is deleted first and the recoverer probed again.
pub(crate) fn probe(
    deleter: &dyn Deleter,
    failed: &State<'_>,
    recoverer: &Recoverer,
    replays_from: Option<usize>,
) -> Option<usize> {
    let rest = failed.rest();
    let waste = recoverer.scan(rest)?;
    if replays_from != Some(failed.pos() + waste) {
        return Some(waste);
    }

    let skipped = deleter.delete(rest, 1);
    if skipped == 0 {
        return None;
    }
    Some(skipped + recoverer.scan(&rest[skipped..])?)
}

/// A committed failure passing through a branch.
pub(crate) struct Failure<'a, P> {
    pub child: usize,
    pub partial: P,
    pub child_start: Snapshot,
    pub state: State<'a>,
    pub error: ParserError,
    /// Choice index that makes the branch return `partial` as it is, for
    /// best-effort runs. `None` when the branch has no value to give back.
    pub finish: Option<usize>,
}

/// Caches `failure` under `key` and returns it upward in Error mode.
///
/// The carried candidate is replaced by this branch's `proposal` only when it
/// is strictly cheaper, so inner branches win ties. A branch that can finish
/// early is also offered to the context as a best-effort fallback.
pub(crate) fn register<'a, P: 'static, O>(
    ctx: &mut Context<'_>,
    branch: &'static str,
    key: CacheKey,
    failure: Failure<'a, P>,
    proposal: Option<Choice>,
) -> PResult<'a, O> {
    let Failure {
        child,
        partial,
        child_start,
        state,
        error,
        finish,
    } = failure;

    let (witness, inherited) = match *state.mode() {
        Mode::Happy => (true, None),
        Mode::Error { best } => (false, best),
        mode => invariants::unexpected_mode(branch, mode),
    };
    let own = proposal.map(|choice| Candidate { key, choice });
    let best = match (inherited, own) {
        (Some(inner), Some(own)) if own.choice.waste < inner.choice.waste => Some(own),
        (Some(inner), _) => Some(inner),
        (None, own) => own,
    };

    let finish = finish.map(|index| Choice {
        index,
        waste: state.rest().len(),
    });
    if let Some(choice) = finish {
        ctx.offer_fallback(Candidate { key, choice });
    }

    ctx.tracer()
        .trace_error(branch, key.pos, child, witness, proposal);
    ctx.remember(
        key,
        CachedResult {
            child,
            partial,
            child_start,
            failure: state.snapshot(),
            error: error.clone(),
            recovery: proposal,
            finish,
        },
    );
    (state.with_mode(Mode::Error { best }), Err(error))
}

/// How a branch continues when re-entered in Handle mode.
pub(crate) enum Resume<'a, P> {
    /// The target is inside the failing child: run it in Handle mode from
    /// where it started.
    Descend {
        entry: CachedResult<P>,
        state: State<'a>,
    },
    /// This branch is the target: `state` is the failure, error recorded,
    /// in Escape mode for the child selected by `choice`. A `choice` equal to
    /// the branch's finish index means nothing else runs: the branch returns
    /// its partial output from [`State::checkpoint`].
    Escape {
        entry: CachedResult<P>,
        state: State<'a>,
        choice: Choice,
    },
}

pub(crate) fn reenter<'a, P: 'static>(
    ctx: &mut Context<'_>,
    branch: &'static str,
    key: CacheKey,
    state: &State<'a>,
) -> Resume<'a, P> {
    let Mode::Handle { target, choice } = *state.mode() else {
        invariants::unexpected_mode(branch, *state.mode())
    };
    let entry: CachedResult<P> = ctx.recall(key);

    if target != key {
        ctx.tracer().trace_handle(branch, key.pos, entry.child);
        let state = state.restore(&entry.child_start).with_mode(*state.mode());
        return Resume::Descend { entry, state };
    }

    invariants::assert_recovery_choice(key, entry.recovery, entry.finish, choice);
    ctx.tracer().trace_rewind(branch, key.pos, choice);
    let state = state
        .restore(&entry.failure)
        .with_mode(Mode::Rewind { target: key })
        .fail(entry.error.clone())
        .escape(choice.waste);
    Resume::Escape {
        entry,
        state,
        choice,
    }
}

/// Hands the fatal error back to the caller; nothing else runs after one.
pub(crate) fn abort<'a, O>(ctx: &Context<'_>, state: State<'a>) -> PResult<'a, O> {
    let error = ctx.fatal_error();
    (state.with_mode(Mode::Happy), Err(error))
}
