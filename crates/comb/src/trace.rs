//! Tracing hooks for the recovery engine.
//!
//! # Design: Zero-Cost Abstraction
//!
//! With `NoopTracer` every hook is an `#[inline(always)]` empty function, so
//! ordinary runs pay nothing for the calls. `PrintTracer` records one line per
//! event, which is what tests snapshot and what is handy when a grammar
//! recovers in surprising ways.
//!
//! Branch names are combinator kinds (`sequence`, `alternative`, `many`,
//! `separated`) followed by the offset the branch started at.

use std::fmt::Write;

use crate::diagnostics::ParserError;
use crate::recoverer::Choice;

/// Receives the mode transitions of one run.
///
/// - `trace_error` - a branch registered a committed failure of child `child`
/// - `trace_restart` - the driver re-enters the grammar to apply a recovery
/// - `trace_handle` - a branch on the failure path descends into `child`
/// - `trace_rewind` - the recovering branch restored its cached failure
/// - `trace_escape` - input is discarded before resuming
/// - `trace_reject` - an error could not be recovered
/// - `trace_empty_element` - a repetition element matched empty input
pub trait Tracer {
    /// `witness` is true for the branch that saw the failure first.
    /// `proposal` is that branch's own cheapest recovery.
    fn trace_error(
        &mut self,
        branch: &'static str,
        pos: usize,
        child: usize,
        witness: bool,
        proposal: Option<Choice>,
    );

    fn trace_restart(&mut self, attempt: u32);

    fn trace_handle(&mut self, branch: &'static str, pos: usize, child: usize);

    fn trace_rewind(&mut self, branch: &'static str, pos: usize, choice: Choice);

    fn trace_escape(&mut self, pos: usize, waste: usize);

    fn trace_reject(&mut self, error: &ParserError);

    fn trace_empty_element(&mut self, branch: &'static str, pos: usize);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_error(
        &mut self,
        _branch: &'static str,
        _pos: usize,
        _child: usize,
        _witness: bool,
        _proposal: Option<Choice>,
    ) {
    }

    #[inline(always)]
    fn trace_restart(&mut self, _attempt: u32) {}

    #[inline(always)]
    fn trace_handle(&mut self, _branch: &'static str, _pos: usize, _child: usize) {}

    #[inline(always)]
    fn trace_rewind(&mut self, _branch: &'static str, _pos: usize, _choice: Choice) {}

    #[inline(always)]
    fn trace_escape(&mut self, _pos: usize, _waste: usize) {}

    #[inline(always)]
    fn trace_reject(&mut self, _error: &ParserError) {}

    #[inline(always)]
    fn trace_empty_element(&mut self, _branch: &'static str, _pos: usize) {}
}

/// Collects one formatted line per event.
#[derive(Debug, Default)]
pub struct PrintTracer {
    lines: Vec<String>,
}

impl PrintTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            writeln!(out, "{line}").expect("String write never fails");
        }
        out
    }

    fn push(&mut self, event: &str, detail: String) {
        self.lines.push(format!("{event:<8} {detail}"));
    }
}

fn format_choice(choice: Option<Choice>) -> String {
    match choice {
        Some(choice) => format!("{}+{}", choice.index, choice.waste),
        None => "none".to_string(),
    }
}

impl Tracer for PrintTracer {
    fn trace_error(
        &mut self,
        branch: &'static str,
        pos: usize,
        child: usize,
        witness: bool,
        proposal: Option<Choice>,
    ) {
        let event = if witness { "witness" } else { "error" };
        let detail = format!(
            "{branch}@{pos} child={child} recovery={}",
            format_choice(proposal)
        );
        self.push(event, detail);
    }

    fn trace_restart(&mut self, attempt: u32) {
        self.push("restart", format!("#{attempt}"));
    }

    fn trace_handle(&mut self, branch: &'static str, pos: usize, child: usize) {
        self.push("handle", format!("{branch}@{pos} child={child}"));
    }

    fn trace_rewind(&mut self, branch: &'static str, pos: usize, choice: Choice) {
        self.push(
            "rewind",
            format!("{branch}@{pos} resume={}", format_choice(Some(choice))),
        );
    }

    fn trace_escape(&mut self, pos: usize, waste: usize) {
        self.push("escape", format!("@{pos} skip={waste}"));
    }

    fn trace_reject(&mut self, error: &ParserError) {
        self.push("reject", error.to_string());
    }

    fn trace_empty_element(&mut self, branch: &'static str, pos: usize) {
        self.push("empty", format!("{branch}@{pos}"));
    }
}
