use std::fmt;

/// What kind of rule a [`ParserError`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The input did not have the expected shape.
    Syntax,
    /// A mapping function rejected a well-formed parse.
    Semantic,
    /// The grammar itself is broken. Never recovered.
    Grammar,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "syntax"),
            ErrorKind::Semantic => write!(f, "semantic"),
            ErrorKind::Grammar => write!(f, "grammar"),
        }
    }
}

/// One diagnosed failure at a byte offset.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ParserError {
    pub(crate) pos: usize,
    pub(crate) kind: ErrorKind,
    pub(crate) message: String,
}

impl ParserError {
    /// `expected {expected}` at `pos`.
    pub fn syntax(pos: usize, expected: &str) -> Self {
        Self {
            pos,
            kind: ErrorKind::Syntax,
            message: format!("expected {expected}"),
        }
    }

    pub fn semantic(pos: usize, message: impl Into<String>) -> Self {
        Self {
            pos,
            kind: ErrorKind::Semantic,
            message: message.into(),
        }
    }

    pub fn grammar(pos: usize, message: impl Into<String>) -> Self {
        Self {
            pos,
            kind: ErrorKind::Grammar,
            message: message.into(),
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_fatal(&self) -> bool {
        self.kind == ErrorKind::Grammar
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.pos)
    }
}
