//! Integration tests for loom-parser crate.

use loom_diagnostic::ErrorCode;
use loom_parser::parse;
use loom_syntax::*;

fn parse_ok(source: &str) -> Program {
    let (program, diagnostics) = parse(source);
    assert!(diagnostics.is_empty(), "{source}: {diagnostics:#?}");
    program
}

fn codes(source: &str) -> Vec<ErrorCode> {
    let (_, diagnostics) = parse(source);
    diagnostics.iter().map(|d| d.code).collect()
}

// ============================================================================
// Basic Parsing Tests
// ============================================================================

#[test]
fn test_parse_let() {
    let program = parse_ok("let x = 42;");
    assert_eq!(program.body.len(), 1);
}

#[test]
fn test_parse_component() {
    let program = parse_ok(
        r#"
import { useState } from "loom";

export default component Counter({ start = 0 }: Props) {
    const [count, setCount] = useState(start);
    return <button onClick={() => setCount(count + 1)}>Count: {count}</button>;
}
"#,
    );
    assert_eq!(program.body.len(), 2);
    let StmtKind::Export(ExportDecl::DefaultDecl(decl)) = &program.body[1].kind else {
        panic!("expected a default export");
    };
    let StmtKind::Component(component) = &decl.kind else {
        panic!("expected a component");
    };
    assert_eq!(component.name.name, "Counter");
    assert_eq!(component.body.stmts.len(), 2);
}

#[test]
fn test_parse_function_with_types() {
    let program = parse_ok("function add<T>(a: number, b?: number): number { return a + (b ?? 0); }");
    let StmtKind::Function(function) = &program.body[0].kind else {
        panic!("expected a function");
    };
    assert_eq!(function.type_params.len(), 1);
    assert_eq!(function.params.len(), 2);
    assert!(function.params[1].optional);
    assert!(function.return_type.is_some());
}

#[test]
fn test_parse_control_flow() {
    let program = parse_ok(
        "for (const item of items) { if (!item) continue; total += item; }\n\
         for (let i = 0; i < n; i++) {}\n\
         for (key in map) {}\n\
         while (x) x--;\n\
         do { y(); } while (z);\n\
         switch (k) { case 1: break; default: }\n\
         try { risky(); } catch { recover(); } finally { done(); }",
    );
    assert_eq!(program.body.len(), 7);
    assert!(matches!(program.body[0].kind, StmtKind::ForOf { .. }));
    assert!(matches!(program.body[1].kind, StmtKind::For { .. }));
    assert!(matches!(program.body[2].kind, StmtKind::ForIn { .. }));
}

#[test]
fn test_in_inside_for_initializer_parentheses() {
    let program = parse_ok("for (let ok = ('a' in obj); ok; ok = false) {}");
    assert!(matches!(program.body[0].kind, StmtKind::For { .. }));
}

#[test]
fn test_asi_at_line_breaks() {
    let program = parse_ok("let a = 1\nlet b = a\nb++\n");
    assert_eq!(program.body.len(), 3);
}

#[test]
fn test_return_with_markup_on_next_line() {
    let program = parse_ok("function f() {\n  return (\n    <div/>\n  );\n}");
    let StmtKind::Function(function) = &program.body[0].kind else {
        panic!("expected a function");
    };
    let StmtKind::Return(Some(value)) = &function.body.stmts[0].kind else {
        panic!("expected return with a value");
    };
    assert!(matches!(value.kind, ExprKind::Paren(_)));
}

// ============================================================================
// Error Recovery
// ============================================================================

#[test]
fn test_error_does_not_stop_parse() {
    let (program, diagnostics) = parse("let a = ;\nlet b = 2;\nlet c = 3;");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::ExpectedExpression);
    assert_eq!(program.body.len(), 3);
}

#[test]
fn test_missing_closing_paren() {
    let (program, diagnostics) = parse("foo(a, b;\nlet next = 1;");
    assert!(diagnostics.iter().any(|d| d.code == ErrorCode::UnclosedDelimiter));
    assert!(
        program
            .body
            .iter()
            .any(|s| matches!(&s.kind, StmtKind::VarDecl(decl) if decl.declarators[0].pattern.as_ident().is_some_and(|i| i.name == "next")))
    );
}

#[test]
fn test_garbage_tokens_recover() {
    let (program, diagnostics) = parse(") ) ) let ok = 1;");
    assert!(!diagnostics.is_empty());
    assert!(program.body.iter().any(|s| matches!(s.kind, StmtKind::VarDecl(_))));
}

#[test]
fn test_unsupported_constructs_are_reported_not_fatal() {
    assert_eq!(
        codes("async function load() { await fetch(url); }"),
        vec![ErrorCode::UnsupportedConstruct, ErrorCode::UnsupportedConstruct]
    );
}

#[test]
fn test_unclosed_block() {
    let (program, diagnostics) = parse("function f() {\n  let x = 1;\n");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::UnclosedDelimiter);
    assert_eq!(diagnostics[0].labels.len(), 1);
    assert_eq!(program.body.len(), 1);
}
