//! Binding patterns.

use crate::{Expr, Ident, PropertyKey};
use loom_common::Span;

/// A binding pattern in declarations and parameters.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

impl Pattern {
    pub fn new(kind: PatternKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The bound name, for a plain identifier pattern.
    pub fn as_ident(&self) -> Option<&Ident> {
        match &self.kind {
            PatternKind::Ident(ident) => Some(ident),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PatternKind {
    /// `x`
    Ident(Ident),

    /// `{ a, b: c, d = 1, ...rest }`
    Object {
        properties: Vec<ObjectPatternProperty>,
        rest: Option<Box<Pattern>>,
    },

    /// `[a, , b, ...rest]`; `None` is a hole
    Array {
        elements: Vec<Option<Pattern>>,
        rest: Option<Box<Pattern>>,
    },

    /// `target = default`
    Assign {
        target: Box<Pattern>,
        default: Box<Expr>,
    },

    /// Could not be parsed.
    Error,
}

/// `key: value` inside an object pattern; shorthand `a` has `value` bound to `a`.
#[derive(Debug, Clone)]
pub struct ObjectPatternProperty {
    pub key: PropertyKey,
    pub value: Pattern,
    pub shorthand: bool,
    pub span: Span,
}
