//! Common utilities and data structures for Loom.
//!
//! This crate provides foundational types used across the Loom front end:
//! - `Span`: Source code location tracking
//! - `LineIndex`: Byte offset to line/column conversion
//! - `Limits`: Safety valves shared by the lexer and parser

mod limits;
mod line_index;
mod span;

pub use limits::Limits;
pub use line_index::{LineCol, LineIndex};
pub use span::{BytePos, Span};
