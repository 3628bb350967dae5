//! Combinators.
//!
//! Branch combinators (`sequence`, `first_successful`, repetitions, separated
//! lists) take part in recovery through the witness protocol. Unary
//! combinators pass every mode through to their inner parser.

mod alternative;
mod repeat;
mod safe_spot;
mod separated;
mod sequence;
mod unary;

#[cfg(test)]
mod alternative_tests;
#[cfg(test)]
mod repeat_tests;

pub use alternative::first_successful;
pub use repeat::{count, many, many0, many1};
pub use safe_spot::{no_way_back, safe_spot};
pub use separated::{separated_mn, separated0, separated1};
pub use sequence::{delimited, map2, map3, map4, map5, preceded, sequence, terminated};
pub use unary::{label, map, not, optional, peek, try_map};
