//! Diagnostics produced by a parse run.
//!
//! Every recovered or rejected failure ends up as a [`ParserError`] in the
//! run's [`Diagnostics`], in the order the engine reported them.

mod collection;
mod message;
mod printer;

#[cfg(test)]
mod tests;

pub use collection::Diagnostics;
pub use message::{ErrorKind, ParserError};
pub use printer::DiagnosticsPrinter;
