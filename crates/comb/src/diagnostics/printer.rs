//! Rendering of diagnostics, with or without the parsed source.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use super::collection::Diagnostics;
use super::message::{ErrorKind, ParserError};

/// Renders a [`Diagnostics`] collection.
///
/// Without a source every error is one `kind: message at offset N` line.
/// With a source each error becomes an annotated snippet pointing at the
/// character where it was found.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    /// Text the error offsets point into.
    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    /// File name shown in the snippet header.
    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    /// ANSI styling; off by default.
    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        match self.source {
            Some(source) => self.format_snippets(w, source),
            None => self.format_lines(w),
        }
    }

    fn format_snippets(&self, w: &mut impl Write, source: &str) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };
        for (i, error) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(w)?;
            }
            let report = [self.group(error, source)];
            write!(w, "{}", renderer.render(&report))?;
        }
        Ok(())
    }

    fn group<'a>(&self, error: &'a ParserError, source: &'a str) -> Group<'a>
    where
        's: 'a,
    {
        let annotation = AnnotationKind::Primary
            .span(char_span(source, error.pos))
            .label(kind_label(error.kind));
        let mut snippet = Snippet::source(source).line_start(1).annotation(annotation);
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }
        Level::ERROR.primary_title(&error.message).element(snippet)
    }

    fn format_lines(&self, w: &mut impl Write) -> std::fmt::Result {
        for (i, error) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(w)?;
            }
            write!(w, "{}: {error}", error.kind)?;
        }
        Ok(())
    }
}

fn kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Syntax => "syntax error here",
        ErrorKind::Semantic => "rejected value starts here",
        ErrorKind::Grammar => "grammar gave up here",
    }
}

/// The character starting at `pos`, or an empty span at the end of `source`.
fn char_span(source: &str, pos: usize) -> Range<usize> {
    let mut start = pos.min(source.len());
    while !source.is_char_boundary(start) {
        start -= 1;
    }
    let width = source[start..].chars().next().map_or(0, char::len_utf8);
    start..start + width
}

impl Diagnostics {
    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }

    /// Annotated snippets against `source`, uncolored.
    pub fn render(&self, source: &str) -> String {
        self.printer().source(source).render()
    }
}
