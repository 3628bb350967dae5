//! Recoverers: how much input must be discarded to resynchronize.
//!
//! A recoverer looks at the unconsumed input of a failing state and proposes
//! a waste in bytes: after skipping that many bytes, the parser it belongs to
//! has a chance to match again. `None` means it cannot help here.

use std::fmt;
use std::rc::Rc;

use comb_core::find_char;

use crate::invariants;
use crate::state::State;

#[derive(Clone)]
pub struct Recoverer(Strategy);

#[derive(Clone)]
enum Strategy {
    Forbidden,
    IndexOf(Rc<[u8]>),
    IndexOfAny(Rc<[Box<[u8]>]>),
    Scan(Rc<dyn Fn(&[u8]) -> Option<usize>>),
    Combined(Rc<CombiningRecoverer>),
}

impl Recoverer {
    /// For parsers that may match empty input. Invoking it panics.
    pub fn forbidden() -> Self {
        Self(Strategy::Forbidden)
    }

    /// Distance to the next occurrence of `token`.
    pub fn index_of(token: impl AsRef<[u8]>) -> Self {
        let token = token.as_ref();
        if token.is_empty() {
            invariants::empty_recovery_token();
        }
        Self(Strategy::IndexOf(token.into()))
    }

    /// Distance to the nearest occurrence of any of `tokens`.
    pub fn index_of_any<T: AsRef<[u8]>>(tokens: impl IntoIterator<Item = T>) -> Self {
        let tokens: Rc<[Box<[u8]>]> = tokens
            .into_iter()
            .map(|token| {
                let token = token.as_ref();
                if token.is_empty() {
                    invariants::empty_recovery_token();
                }
                Box::from(token)
            })
            .collect();
        Self(Strategy::IndexOfAny(tokens))
    }

    /// Distance to the next character accepted by `pred`.
    pub fn char_matching(pred: impl Fn(char) -> bool + 'static) -> Self {
        Self::from_fn(move |rest| find_char(rest, &pred))
    }

    /// Custom strategy over the unconsumed input.
    pub fn from_fn(scan: impl Fn(&[u8]) -> Option<usize> + 'static) -> Self {
        Self(Strategy::Scan(Rc::new(scan)))
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self.0, Strategy::Forbidden)
    }

    pub fn recover(&self, state: &State<'_>) -> Option<usize> {
        self.scan(state.rest())
    }

    /// Waste for the unconsumed input `rest`.
    pub fn scan(&self, rest: &[u8]) -> Option<usize> {
        match &self.0 {
            Strategy::Forbidden => invariants::forbidden_recoverer(),
            Strategy::IndexOf(token) => index_of(rest, token),
            Strategy::IndexOfAny(tokens) => tokens.iter().filter_map(|t| index_of(rest, t)).min(),
            Strategy::Scan(scan) => scan(rest),
            Strategy::Combined(combined) => combined.best_in(rest).map(|choice| choice.waste),
        }
    }
}

fn index_of(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

impl fmt::Debug for Recoverer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Strategy::Forbidden => write!(f, "Forbidden"),
            Strategy::IndexOf(token) => write!(f, "IndexOf({:?})", String::from_utf8_lossy(token)),
            Strategy::IndexOfAny(tokens) => f
                .debug_tuple("IndexOfAny")
                .field(
                    &tokens
                        .iter()
                        .map(|t| String::from_utf8_lossy(t))
                        .collect::<Vec<_>>(),
                )
                .finish(),
            Strategy::Scan(_) => write!(f, "Scan"),
            Strategy::Combined(combined) => f
                .debug_tuple("Combined")
                .field(&combined.recoverers)
                .finish(),
        }
    }
}

/// Which recoverer won and how much it wastes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Choice {
    pub index: usize,
    pub waste: usize,
}

/// Picks the cheapest of several recoverers.
///
/// Forbidden recoverers are skipped; ties go to the lowest index.
#[derive(Debug, Clone)]
pub struct CombiningRecoverer {
    recoverers: Vec<Recoverer>,
}

impl CombiningRecoverer {
    pub fn new(recoverers: impl IntoIterator<Item = Recoverer>) -> Self {
        Self {
            recoverers: recoverers.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.recoverers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recoverers.is_empty()
    }

    pub fn best(&self, state: &State<'_>) -> Option<Choice> {
        self.best_in(state.rest())
    }

    pub(crate) fn best_in(&self, rest: &[u8]) -> Option<Choice> {
        self.best_of(0..self.recoverers.len(), |_, recoverer| recoverer.scan(rest))
    }

    /// Minimum over `indexes`, with `probe` computing each candidate's waste.
    pub(crate) fn best_of(
        &self,
        indexes: impl IntoIterator<Item = usize>,
        mut probe: impl FnMut(usize, &Recoverer) -> Option<usize>,
    ) -> Option<Choice> {
        let mut best: Option<Choice> = None;
        for index in indexes {
            let recoverer = &self.recoverers[index];
            if recoverer.is_forbidden() {
                continue;
            }
            let Some(waste) = probe(index, recoverer) else {
                continue;
            };
            if best.is_none_or(|b| waste < b.waste) {
                best = Some(Choice { index, waste });
            }
        }
        best
    }

    /// First recoverer that is not forbidden.
    pub fn first_usable(&self) -> Recoverer {
        self.recoverers
            .iter()
            .find(|r| !r.is_forbidden())
            .cloned()
            .unwrap_or_else(Recoverer::forbidden)
    }

    /// A single recoverer answering with the cheapest member's waste.
    ///
    /// Forbidden as soon as one member is: a choice that may match empty
    /// input must not be used to skip.
    pub fn into_recoverer(self) -> Recoverer {
        if self.recoverers.iter().any(Recoverer::is_forbidden) {
            return Recoverer::forbidden();
        }
        Recoverer(Strategy::Combined(Rc::new(self)))
    }
}
