//! Ordered collection of parser errors.

use super::message::{ErrorKind, ParserError};

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<ParserError>);

impl Diagnostics {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, error: ParserError) {
        self.0.push(error);
    }

    pub fn extend(&mut self, iter: impl IntoIterator<Item = ParserError>) {
        self.0.extend(iter);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParserError> {
        self.0.iter()
    }

    pub fn has_errors(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.0.len()
    }

    pub fn filter_by_kind(&self, kind: ErrorKind) -> Vec<&ParserError> {
        self.0.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn as_slice(&self) -> &[ParserError] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ParserError> {
        self.0
    }
}

impl From<Vec<ParserError>> for Diagnostics {
    fn from(errors: Vec<ParserError>) -> Self {
        Self(errors)
    }
}

impl IntoIterator for Diagnostics {
    type Item = ParserError;
    type IntoIter = std::vec::IntoIter<ParserError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a ParserError;
    type IntoIter = std::slice::Iter<'a, ParserError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<ParserError> for Diagnostics {
    fn from_iter<T: IntoIterator<Item = ParserError>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
