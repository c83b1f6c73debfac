//! Integration tests for loom-common crate.

use loom_common::{BytePos, Limits, LineCol, LineIndex, Span};

#[test]
fn test_span_merge() {
    let a = Span::from_usize(10, 20);
    let b = Span::from_usize(15, 30);
    let merged = a.merge(b);
    assert_eq!(merged.start.0, 10);
    assert_eq!(merged.end.0, 30);
}

#[test]
fn test_span_contains() {
    let outer = Span::from_usize(0, 10);
    assert!(outer.contains(Span::from_usize(2, 5)));
    assert!(outer.contains(Span::from_usize(10, 10)));
    assert!(!outer.contains(Span::from_usize(5, 11)));
}

#[test]
fn test_empty_span() {
    let span = Span::empty(BytePos(7));
    assert!(span.is_empty());
    assert_eq!(span.range(), 7..7);
}

#[test]
fn test_span_slice() {
    let source = "let name = 1;";
    assert_eq!(Span::from_usize(4, 8).slice(source), "name");
    assert_eq!(usize::from(BytePos(10)), 10);
}

#[test]
fn test_line_index() {
    let index = LineIndex::new("let a;\nlet b;\n");
    assert_eq!(index.line_col(BytePos(0)), LineCol::START);
    assert_eq!(index.line_col(BytePos(11)), LineCol { line: 2, column: 5 });
}

// ============================================================================
// Limits
// ============================================================================

#[test]
fn test_limit_defaults() {
    let limits = Limits::default();
    assert_eq!(limits.max_diagnostics, 100);
    assert_eq!(limits.max_iterations, 50_000);
    assert_eq!(limits.max_nesting_depth, 100);
}

#[test]
fn test_limit_builders() {
    let limits = Limits::new().max_diagnostics(5).max_nesting_depth(8);
    assert_eq!(limits.max_diagnostics, 5);
    assert_eq!(limits.max_nesting_depth, 8);
    assert_eq!(limits.max_iterations, 50_000);
}

#[test]
fn test_limits_from_partial_json() {
    let limits: Limits = serde_json::from_str(r#"{ "max_nesting_depth": 8 }"#).unwrap();
    assert_eq!(limits.max_nesting_depth, 8);
    assert_eq!(limits.max_diagnostics, 100);
}
