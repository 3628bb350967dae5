//! Test helpers.

use crate::{Parsed, Parser, PrintTracer, RunConfig, run_with};

/// Runs `parser` over `input` and returns the outcome with the engine trace.
pub fn traced<'i, O: Default + 'static>(parser: &Parser<O>, input: &'i str) -> (Parsed<'i, O>, String) {
    let mut tracer = PrintTracer::new();
    let parsed = run_with(parser, input.as_bytes(), &RunConfig::text(), &mut tracer)
        .expect("run aborted");
    (parsed, tracer.dump().trim_end().to_owned())
}

/// Plain one-line-per-error rendering of the run's diagnostics.
pub fn errors<O>(parsed: &Parsed<'_, O>) -> String {
    parsed.errors.printer().render()
}

/// Unconsumed input as text.
pub fn rest<O>(parsed: &Parsed<'_, O>) -> String {
    String::from_utf8_lossy(parsed.rest).into_owned()
}
