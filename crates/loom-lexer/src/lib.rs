//! Lexical analysis for Loom.
//! Loom 词法分析模块。
//!
//! This crate turns source text, code with embedded markup, into an immutable
//! [`TokenStream`]. The tokenizer is context-sensitive: the same character
//! means different things in code, inside a tag, and between tags.
//! 本 crate 将源代码（包含嵌入式标记）转换为不可变的 token 流。

pub mod cook;
mod lexer;
mod literal;
mod markup;
mod scanner;
mod state;
mod stream;
mod token;

pub use cook::{cook_attribute_string, cook_string, decode_entities, parse_number, unescape};
pub use lexer::{Lexer, Tokenizer};
pub use scanner::{Mark, Scanner};
pub use state::{DepthCounters, LexerMode, Resume};
pub use stream::{TokenIndex, TokenStream};
pub use token::{Token, TokenKind};

use loom_common::Limits;
use loom_diagnostic::Diagnostic;

/// Tokenize `source` with default limits.
/// 使用默认限制对源代码进行词法分析。
pub fn scan(source: &str) -> (TokenStream<'_>, Vec<Diagnostic>) {
    scan_with(source, &Limits::default())
}

pub fn scan_with<'src>(source: &'src str, limits: &Limits) -> (TokenStream<'src>, Vec<Diagnostic>) {
    let (stream, diagnostics) = Lexer::with_limits(source, limits).tokenize();
    (stream, diagnostics.into_diagnostics())
}
