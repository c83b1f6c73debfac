//! AST and syntax definitions for Loom.
//! Loom 的 AST 与语法定义。
//!
//! This crate defines the syntax tree produced by the parser and handed,
//! read-only, to later compilation phases. Every node carries the span of
//! the source it was built from; a parent's span contains its children's.

mod ast;
mod expr;
mod markup;
mod pattern;
mod types;
pub mod visit;

pub use ast::*;
pub use expr::*;
pub use markup::*;
pub use pattern::*;
pub use types::*;
