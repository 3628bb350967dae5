#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Recovery-unaware building blocks shared by the `comb` parser engine.
//!
//! - [`text`]: decoding and classifying the unit at a byte cursor
//! - [`deleter`]: strategies turning a count of logical tokens into a byte span

pub mod deleter;
pub mod text;

#[cfg(test)]
mod deleter_tests;

pub use deleter::{ByteDeleter, Deleter, RuneTypeChangeDeleter, SpaceDeleter};
pub use text::{RuneClass, class_at, decode_char, find_char, utf8_width};
