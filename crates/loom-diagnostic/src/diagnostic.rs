//! Diagnostic types and builders.

use loom_common::{LineCol, Span};

use crate::ErrorCode;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Severity number used by editor protocols (1 = error, 2 = warning, 3 = info).
    pub fn lsp_code(self) -> u8 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        })
    }
}

/// Kind of diagnostic for categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    Lexer,
    Parser,
    Governor,
    Collector,
}

/// A labeled span within a diagnostic, used for related positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub span: Span,
    pub message: String,
    /// Resolved when the owning diagnostic is reported.
    pub start: LineCol,
    pub end: LineCol,
}

impl Label {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            start: LineCol::START,
            end: LineCol::START,
        }
    }
}

/// A diagnostic message with optional labels, notes, and a suggestion.
///
/// `start`/`end` are filled in by the collector from the span; a diagnostic
/// built by hand and never reported keeps `LineCol::START`.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    pub start: LineCol,
    pub end: LineCol,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: ErrorCode, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind: code.kind(),
            code,
            message: message.into(),
            span,
            start: LineCol::START,
            end: LineCol::START,
            labels: vec![],
            notes: vec![],
            suggestion: code.suggestion().map(String::from),
        }
    }

    pub fn error(code: ErrorCode, span: Span, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, span, message)
    }

    pub fn warning(code: ErrorCode, span: Span, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, span, message)
    }

    pub fn info(code: ErrorCode, span: Span, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, span, message)
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
