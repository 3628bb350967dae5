//! comb: parser combinators with resilient error recovery.
//!
//! Grammars are built from leaf parsers and combinators. Wrapping a parser in
//! [`no_way_back`] marks a point of no return: a failure after it is recovered
//! (input is skipped, the error recorded, parsing resumes) instead of being
//! handed to a sibling alternative.
//!
//! # Example
//!
//! ```
//! use comb::{char, digit1, literal, no_way_back, run, separated1, sequence};
//!
//! let item = sequence(vec![no_way_back(literal("[")), digit1(), literal("]")]);
//! let list = separated1(item, char(','), false);
//!
//! let parsed = run(&list, "[1],[x],[3]").expect("grammar is well formed");
//! assert_eq!(parsed.output.map(|items| items.len()), Some(3));
//! assert_eq!(parsed.errors.len(), 1);
//! eprintln!("{}", parsed.errors.render("[1],[x],[3]"));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod branch;
pub mod cache;
pub mod combinator;
pub mod diagnostics;
mod invariants;
pub mod leaf;
pub mod parser;
pub mod recoverer;
pub mod run;
pub mod state;
pub mod trace;

#[cfg(test)]
mod branch_tests;
#[cfg(test)]
mod run_tests;
#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod tests;

pub use cache::{BranchId, CacheKey};
pub use combinator::{
    count, delimited, first_successful, label, many, many0, many1, map, map2, map3, map4, map5,
    no_way_back, not, optional, peek, preceded, safe_spot, separated_mn, separated0, separated1,
    sequence, terminated, try_map,
};
pub use comb_core::{ByteDeleter, Deleter, RuneClass, RuneTypeChangeDeleter, SpaceDeleter};
pub use diagnostics::{Diagnostics, DiagnosticsPrinter, ErrorKind, ParserError};
pub use leaf::{
    alpha0, alpha1, alphanumeric0, alphanumeric1, any_char, byte, char, digit0, digit1, eof,
    hex_digit, int64, literal, satisfy, take_while0, take_while1, uint64, whitespace0,
    whitespace1,
};
pub use parser::{Context, PResult, Parser, ParserImpl};
pub use recoverer::{Choice, CombiningRecoverer, Recoverer};
pub use run::{FailurePolicy, Parsed, RunConfig, parse, run, run_bytes, run_with};
pub use state::{Candidate, Mode, State};
pub use trace::{NoopTracer, PrintTracer, Tracer};

/// Errors that end a run without a parse result.
///
/// Ordinary syntax and semantic failures are not errors at this level: they
/// are collected in [`Parsed::errors`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// A repetition element succeeded without consuming input.
    #[error("repetition element matched empty input: {0}")]
    EmptyElement(ParserError),

    /// Recovery fuel exhausted (see [`RunConfig::with_max_recoveries`]).
    #[error("recovery limit exceeded")]
    RecoveryLimitExceeded,

    #[error("parsing failed with {} errors", .0.error_count())]
    Parse(Diagnostics),
}

/// Result type for run operations.
pub type Result<T> = std::result::Result<T, Error>;
