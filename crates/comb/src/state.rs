//! Parse state threaded through every parser call.
//!
//! A [`State`] is a value: parsers take it by value and hand back the state
//! they ended in. The witness cache is not part of it; it lives in the
//! per-run [`Context`](crate::Context).

use crate::cache::CacheKey;
use crate::diagnostics::ParserError;
use crate::invariants;
use crate::recoverer::Choice;

/// A recovery proposal: resume branch `key` at `choice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub key: CacheKey,
    pub choice: Choice,
}

/// Recovery mode carried by a [`State`].
///
/// ```text
/// Happy ──committed failure──▶ Error ──driver restart──▶ Handle
///   ▲                                                      │
///   └──────── Escape ◀── Rewind ◀── target branch ◀────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal forward parsing.
    Happy,
    /// Unwinding after a committed failure. Every enclosing branch registers
    /// the failure and may replace `best` with a cheaper proposal.
    Error { best: Option<Candidate> },
    /// Re-running from the root along cached failing children towards `target`.
    Handle { target: CacheKey, choice: Choice },
    /// The target branch restored its cached failure.
    Rewind { target: CacheKey },
    /// The next parser discards `waste` bytes and continues in `Happy`.
    Escape { waste: usize },
}

impl Mode {
    pub fn is_happy(&self) -> bool {
        matches!(self, Mode::Happy)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Happy => "happy",
            Mode::Error { .. } => "error",
            Mode::Handle { .. } => "handle",
            Mode::Rewind { .. } => "rewind",
            Mode::Escape { .. } => "escape",
        }
    }
}

#[derive(Debug, Clone)]
pub struct State<'a> {
    input: &'a [u8],
    pos: usize,
    mode: Mode,
    safe_spot: Option<usize>,
    errors: Vec<ParserError>,
}

/// Everything in a [`State`] except the input and the mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Snapshot {
    pub(crate) pos: usize,
    pub(crate) safe_spot: Option<usize>,
    pub(crate) errors: Vec<ParserError>,
}

impl<'a> State<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            mode: Mode::Happy,
            safe_spot: None,
            errors: Vec::new(),
        }
    }

    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Unconsumed input.
    pub fn rest(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    pub fn at_end(&self) -> bool {
        self.pos == self.input.len()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Offset of the newest commit point, if any was passed.
    pub fn safe_spot(&self) -> Option<usize> {
        self.safe_spot
    }

    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParserError> {
        self.errors
    }

    pub fn move_by(mut self, n: usize) -> Self {
        invariants::assert_within_input(self.pos, n, self.input.len());
        self.pos += n;
        self
    }

    /// Records `error`; the position is kept for diagnostics.
    pub fn fail(mut self, error: ParserError) -> Self {
        self.errors.push(error);
        self
    }

    /// Records the current position as the newest commit point.
    ///
    /// Parsers calling this must report `is_safe_spot() == true`.
    pub fn mark_safe_spot(mut self) -> Self {
        self.safe_spot = Some(self.pos);
        self
    }

    /// Whether `other` is at or after the newest commit point of `self`.
    pub fn is_past_safe_spot(&self, other: &State<'_>) -> bool {
        self.safe_spot.is_some_and(|spot| other.pos >= spot)
    }

    /// Syntax error `expected {what}` at the current position.
    pub fn expected(&self, what: &str) -> ParserError {
        ParserError::syntax(self.pos, what)
    }

    pub(crate) fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Rewind → Escape: the next parser skips `waste` bytes.
    pub(crate) fn escape(self, waste: usize) -> Self {
        if !matches!(self.mode, Mode::Rewind { .. }) {
            invariants::unexpected_mode("escape", self.mode);
        }
        self.with_mode(Mode::Escape { waste })
    }

    /// Happy copy at the position the next parser will actually start from.
    pub(crate) fn checkpoint(&self) -> Self {
        let mut state = self.clone();
        if let Mode::Escape { waste } = state.mode {
            state = state.move_by(waste);
        }
        state.with_mode(Mode::Happy)
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        let skipped = match self.mode {
            Mode::Escape { waste } => waste,
            _ => 0,
        };
        Snapshot {
            pos: self.pos + skipped,
            safe_spot: self.safe_spot,
            errors: self.errors.clone(),
        }
    }

    /// A Happy state over the same input, positioned at `snapshot`.
    pub(crate) fn restore(&self, snapshot: &Snapshot) -> Self {
        Self {
            input: self.input,
            pos: snapshot.pos,
            mode: Mode::Happy,
            safe_spot: snapshot.safe_spot,
            errors: snapshot.errors.clone(),
        }
    }
}
