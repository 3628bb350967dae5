//! Per-run witness cache.
//!
//! A branch that sees a committed failure stores what it knew at that moment
//! so the later re-entries (Handle, Rewind, Escape) can resume it without
//! re-running the children that already succeeded.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use indexmap::IndexMap;

use crate::diagnostics::ParserError;
use crate::invariants;
use crate::recoverer::Choice;
use crate::state::Snapshot;

/// Identity of a branch combinator, assigned when it is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchId(u32);

impl BranchId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A branch instance at the offset it started from.
///
/// One combinator can run at many offsets in a single parse (repetition,
/// recursion), and each of those runs has its own witness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub branch: BranchId,
    pub pos: usize,
}

impl CacheKey {
    pub fn new(branch: BranchId, pos: usize) -> Self {
        Self { branch, pos }
    }
}

/// What a branch knew when a committed failure passed through it.
#[derive(Debug)]
pub(crate) struct CachedResult<P> {
    /// Index of the child (or step) that failed.
    pub child: usize,
    /// Output of the children that completed before `child`.
    pub partial: P,
    /// Where `child` started.
    pub child_start: Snapshot,
    pub failure: Snapshot,
    pub error: ParserError,
    /// This branch's own cheapest recovery.
    pub recovery: Option<Choice>,
    /// Resume point that closes the branch at the end of the input.
    pub finish: Option<Choice>,
}

#[derive(Default)]
pub(crate) struct Cache {
    entries: IndexMap<CacheKey, Box<dyn Any>>,
}

impl Cache {
    pub(crate) fn insert<P: 'static>(&mut self, key: CacheKey, entry: CachedResult<P>) {
        self.entries.insert(key, Box::new(entry));
    }

    /// Removes and returns the witness of `key`.
    ///
    /// Panics on a miss: re-entering a branch in a recovery mode without its
    /// witness is a bug in the engine.
    pub(crate) fn take<P: 'static>(&mut self, key: CacheKey) -> CachedResult<P> {
        let Some(entry) = self.entries.shift_remove(&key) else {
            invariants::missing_witness(key)
        };
        match entry.downcast::<CachedResult<P>>() {
            Ok(entry) => *entry,
            Err(_) => invariants::witness_type_mismatch(key),
        }
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
