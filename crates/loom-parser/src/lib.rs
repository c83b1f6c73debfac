//! Parser for Loom.
//! Loom 语法分析器。
//!
//! This crate provides a recursive descent parser that converts the token
//! stream into an abstract syntax tree. Every input produces a tree: parsing
//! never stops at the first error and never panics.
//!
//! ## Error Recovery
//!
//! Malformed constructs degrade locally. A bad expression becomes
//! [`ExprKind::Error`](loom_syntax::ExprKind::Error), a bad type becomes
//! `Unknown`, and a bad statement is skipped up to the next statement
//! boundary, so one mistake yields one diagnostic and the rest of the file
//! still parses.
//!
//! ## Safety Governor
//!
//! Every loop is watched by a [`LoopGuard`] that reports a loop that stops
//! consuming input or runs past its iteration cap, and nested constructs are
//! bounded by [`Limits::max_nesting_depth`]. Neither ever fires on
//! well-formed input.

mod expr;
mod governor;
mod markup;
mod observer;
mod parser;
mod pattern;
mod recovery;
mod stmt;
mod types;

pub use governor::{LoopGuard, Step};
pub use observer::{ParseObserver, ProductionTrace, TraceEvent};
pub use parser::{Parser, ProgramParser};
pub use recovery::{DelimiterKind, DelimiterStack};

use loom_common::Limits;
use loom_diagnostic::Diagnostic;
use loom_lexer::{Lexer, TokenStream};
use loom_syntax::Program;

/// Options for a single parse.
/// 解析选项。
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub limits: Limits,
    /// Used in log output only.
    pub file_name: Option<String>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}

/// A finished parse: the tree, the stored diagnostics, and the error totals
/// that survive the diagnostic cap.
/// 解析结果：语法树、诊断信息以及包含被截断部分在内的错误总数。
#[derive(Debug)]
pub struct ParseResult {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
    error_count: usize,
    suppressed: usize,
}

impl ParseResult {
    /// True if any error was reported, including ones dropped after the cap.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Errors reported, stored or suppressed.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Diagnostics of any severity dropped after the cap.
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    pub fn into_parts(self) -> (Program, Vec<Diagnostic>) {
        (self.program, self.diagnostics)
    }
}

/// Parse source code into an AST.
/// 将源代码解析为 AST。
pub fn parse(source: &str) -> (Program, Vec<Diagnostic>) {
    parse_with(source, &ParseOptions::default())
}

/// Parse with explicit limits.
pub fn parse_with(source: &str, options: &ParseOptions) -> (Program, Vec<Diagnostic>) {
    run(source, options, None).into_parts()
}

/// Like [`parse_with`], but keeps the error totals. Callers that decide
/// pass/fail must use this: the stored diagnostics alone under-count errors
/// once the cap is reached.
pub fn parse_checked(source: &str, options: &ParseOptions) -> ParseResult {
    run(source, options, None)
}

/// Parse while reporting productions, backtracks and governor faults to `observer`.
pub fn parse_observed(
    source: &str,
    options: &ParseOptions,
    observer: &mut dyn ParseObserver,
) -> (Program, Vec<Diagnostic>) {
    run(source, options, Some(observer)).into_parts()
}

/// Parse an already tokenized stream. Lexer diagnostics are not included.
pub fn parse_tokens(tokens: &TokenStream<'_>, limits: &Limits) -> (Program, Vec<Diagnostic>) {
    let diagnostics =
        loom_diagnostic::DiagnosticCollector::new(tokens.source(), limits.max_diagnostics);
    let mut parser = Parser::new(tokens, diagnostics, *limits);
    let program = parser.parse_file();
    (program, parser.into_diagnostics())
}

fn run(
    source: &str,
    options: &ParseOptions,
    observer: Option<&mut dyn ParseObserver>,
) -> ParseResult {
    let file = options.file_name.as_deref().unwrap_or("<input>");
    let _span = tracing::info_span!("parse_source", file, bytes = source.len()).entered();

    let (tokens, diagnostics) = Lexer::with_limits(source, &options.limits).tokenize();
    let mut parser = Parser::new(&tokens, diagnostics, options.limits);
    if let Some(observer) = observer {
        parser = parser.with_observer(observer);
    }
    let program = parser.parse_file();
    let error_count = parser.diagnostics().error_count();
    let suppressed = parser.diagnostics().suppressed();
    let diagnostics = parser.into_diagnostics();

    tracing::debug!(
        statements = program.body.len(),
        diagnostics = diagnostics.len(),
        errors = error_count,
        "parsed"
    );
    ParseResult {
        program,
        diagnostics,
        error_count,
        suppressed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_diagnostic::ErrorCode;

    #[test]
    fn empty_source() {
        let (program, diagnostics) = parse("");
        assert!(program.body.is_empty());
        assert!(diagnostics.is_empty());
        assert_eq!(program.span.len(), 0);
    }

    #[test]
    fn program_span_covers_the_source() {
        let source = "let a = 1;\n// trailing comment\n";
        let (program, _) = parse(source);
        assert_eq!(program.span.range(), 0..source.len());
    }

    #[test]
    fn observer_sees_balanced_productions() {
        let mut trace = ProductionTrace::new();
        let (_, diagnostics) = parse_observed(
            "const f = (a: number): number => a * 2;",
            &ParseOptions::default(),
            &mut trace,
        );
        assert!(diagnostics.is_empty(), "{diagnostics:#?}");
        assert!(trace.is_balanced());
        assert_eq!(trace.entered("program"), 1);
        assert_eq!(trace.backtracks(), 0);
    }

    #[test]
    fn nesting_limit_is_reported() {
        let options = ParseOptions::new().limits(Limits::new().max_nesting_depth(10));
        let source = format!("x = {}1{};", "(".repeat(20), ")".repeat(20));
        let (_, diagnostics) = parse_with(&source, &options);
        assert!(diagnostics.iter().any(|d| d.code == ErrorCode::NestingTooDeep));
    }

    #[test]
    fn errors_past_the_cap_are_still_counted() {
        // Each leading-zero literal is a warning; the one real error comes last.
        let source = format!("{}let = ;", "x = 08;\n".repeat(100));
        let result = parse_checked(&source, &ParseOptions::default());

        assert_eq!(result.diagnostics.len(), 101);
        assert!(result.diagnostics.iter().all(|d| !d.is_error()));
        assert!(result.has_errors());
        assert!(result.error_count() >= 1);
        assert!(result.suppressed() >= 1);
    }

    #[test]
    fn parse_tokens_reports_parser_errors_only() {
        let (tokens, lexer_diagnostics) = Lexer::new("let = 'open").tokenize();
        assert!(!lexer_diagnostics.is_empty());
        let (_, diagnostics) = parse_tokens(&tokens, &Limits::default());
        assert!(diagnostics.iter().all(|d| d.code != ErrorCode::UnterminatedString));
    }
}
