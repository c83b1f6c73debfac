//! The diagnostics collector shared by the lexer and parser.
//!
//! Reporting never fails and never changes control flow. Once the configured
//! cap is reached, further diagnostics are counted but not stored, and a single
//! trailing `DiagnosticOverflow` warning summarizes how many were dropped.

use loom_common::{LineIndex, Span};

use crate::{Diagnostic, ErrorCode, Severity};

/// Sink for diagnostics. Implemented by [`DiagnosticCollector`].
pub trait DiagnosticSink {
    /// Record a fully built diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);

    /// All stored diagnostics in report order, including the overflow summary.
    fn diagnostics(&self) -> &[Diagnostic];

    /// True if any error was reported, including suppressed ones.
    fn has_errors(&self) -> bool;

    fn add_error(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        suggestion: Option<&str>,
    ) {
        self.report(build(Severity::Error, code, message, span, suggestion));
    }

    fn add_warning(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        suggestion: Option<&str>,
    ) {
        self.report(build(Severity::Warning, code, message, span, suggestion));
    }

    fn add_info(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        suggestion: Option<&str>,
    ) {
        self.report(build(Severity::Info, code, message, span, suggestion));
    }
}

fn build(
    severity: Severity,
    code: ErrorCode,
    message: impl Into<String>,
    span: Span,
    suggestion: Option<&str>,
) -> Diagnostic {
    let diagnostic = Diagnostic::new(severity, code, span, message);
    match suggestion {
        Some(text) => diagnostic.with_suggestion(text),
        None => diagnostic,
    }
}

/// Saved collector length for a single-shot parser backtrack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    stored: usize,
    suppressed: usize,
    suppressed_errors: usize,
    errors: usize,
}

/// Capped, append-only diagnostic store for one source text.
#[derive(Debug)]
pub struct DiagnosticCollector<'src> {
    index: LineIndex<'src>,
    diagnostics: Vec<Diagnostic>,
    max: usize,
    errors: usize,
    suppressed: usize,
    suppressed_errors: usize,
}

impl<'src> DiagnosticCollector<'src> {
    pub fn new(source: &'src str, max: usize) -> Self {
        Self {
            index: LineIndex::new(source),
            diagnostics: Vec::new(),
            max,
            errors: 0,
            suppressed: 0,
            suppressed_errors: 0,
        }
    }

    pub fn line_index(&self) -> &LineIndex<'src> {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Errors reported so far, stored or suppressed.
    pub fn error_count(&self) -> usize {
        self.errors + self.suppressed_errors
    }

    /// Diagnostics dropped after the cap was reached.
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            stored: self.diagnostics.len(),
            suppressed: self.suppressed,
            suppressed_errors: self.suppressed_errors,
            errors: self.errors,
        }
    }

    /// Forget everything reported since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        debug_assert!(
            checkpoint.stored <= self.diagnostics.len(),
            "diagnostic checkpoint is newer than the collector"
        );
        self.diagnostics.truncate(checkpoint.stored);
        self.suppressed = checkpoint.suppressed;
        self.suppressed_errors = checkpoint.suppressed_errors;
        self.errors = checkpoint.errors;
        if self.suppressed > 0 {
            self.refresh_overflow();
        }
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn resolve(&self, diagnostic: &mut Diagnostic) {
        diagnostic.start = self.index.line_col(diagnostic.span.start);
        diagnostic.end = self.index.line_col(diagnostic.span.end);
        for label in &mut diagnostic.labels {
            label.start = self.index.line_col(label.span.start);
            label.end = self.index.line_col(label.span.end);
        }
    }

    fn overflow_message(&self) -> String {
        format!(
            "too many diagnostics: {} more suppressed after the first {}",
            self.suppressed, self.max
        )
    }

    fn refresh_overflow(&mut self) {
        let message = self.overflow_message();
        match self.diagnostics.last_mut() {
            Some(last) if last.code == ErrorCode::DiagnosticOverflow => last.message = message,
            _ => {
                let span = self
                    .diagnostics
                    .last()
                    .map(|d| Span::empty(d.span.end))
                    .unwrap_or(Span::DUMMY);
                let mut summary = Diagnostic::warning(ErrorCode::DiagnosticOverflow, span, message);
                self.resolve(&mut summary);
                self.diagnostics.push(summary);
            }
        }
    }
}

impl DiagnosticSink for DiagnosticCollector<'_> {
    fn report(&mut self, mut diagnostic: Diagnostic) {
        let stored = self.diagnostics.len() - usize::from(self.suppressed > 0);
        if stored >= self.max {
            self.suppressed += 1;
            if diagnostic.is_error() {
                self.suppressed_errors += 1;
            }
            if self.suppressed == 1 {
                tracing::debug!(max = self.max, "diagnostic cap reached");
            }
            self.refresh_overflow();
            return;
        }

        self.resolve(&mut diagnostic);
        if diagnostic.is_error() {
            self.errors += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_common::LineCol;
    use pretty_assertions::assert_eq;

    fn flood(collector: &mut DiagnosticCollector<'_>, count: usize) {
        for i in 0..count {
            collector.add_error(
                ErrorCode::UnexpectedToken,
                format!("error {i}"),
                Span::from_usize(i, i + 1),
                None,
            );
        }
    }

    #[test]
    fn positions_are_resolved_on_report() {
        let mut collector = DiagnosticCollector::new("let\n  x", 100);
        collector.add_warning(ErrorCode::InvalidNumber, "odd", Span::from_usize(6, 7), None);
        let diag = &collector.diagnostics()[0];
        assert_eq!(diag.start, LineCol { line: 2, column: 3 });
        assert_eq!(diag.end, LineCol { line: 2, column: 4 });
        assert!(!collector.has_errors());
    }

    #[test]
    fn overflow_collapses_into_one_summary() {
        let source = "x".repeat(200);
        let mut collector = DiagnosticCollector::new(&source, 10);
        flood(&mut collector, 25);

        let diagnostics = collector.diagnostics();
        assert_eq!(diagnostics.len(), 11);
        let summary = &diagnostics[10];
        assert_eq!(summary.code, ErrorCode::DiagnosticOverflow);
        assert_eq!(summary.severity, Severity::Warning);
        assert!(summary.message.contains("15 more"));
        assert_eq!(collector.error_count(), 25);
        assert_eq!(
            diagnostics
                .iter()
                .filter(|d| d.code == ErrorCode::DiagnosticOverflow)
                .count(),
            1
        );
    }

    #[test]
    fn rollback_discards_speculative_reports() {
        let mut collector = DiagnosticCollector::new("abcdef", 100);
        flood(&mut collector, 2);
        let checkpoint = collector.checkpoint();
        flood(&mut collector, 3);
        assert_eq!(collector.len(), 5);

        collector.rollback(checkpoint);
        assert_eq!(collector.len(), 2);
        assert_eq!(collector.error_count(), 2);
    }

    #[test]
    fn rollback_across_the_cap_restores_summary_count() {
        let source = "x".repeat(50);
        let mut collector = DiagnosticCollector::new(&source, 3);
        flood(&mut collector, 5);
        let checkpoint = collector.checkpoint();
        flood(&mut collector, 4);
        assert!(collector.diagnostics()[3].message.contains("6 more"));

        collector.rollback(checkpoint);
        assert_eq!(collector.len(), 4);
        assert!(collector.diagnostics()[3].message.contains("2 more"));
    }

    #[test]
    fn zero_cap_keeps_only_the_summary() {
        let mut collector = DiagnosticCollector::new("ab", 0);
        flood(&mut collector, 2);
        assert_eq!(collector.len(), 1);
        assert!(collector.has_errors());
    }
}
