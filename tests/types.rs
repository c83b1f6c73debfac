//! Integration tests for type annotations.

use loom_diagnostic::ErrorCode;
use loom_parser::{ParseOptions, ProductionTrace, parse, parse_observed};
use loom_syntax::*;

fn declarator(source: &str) -> Declarator {
    let (program, diagnostics) = parse(source);
    assert!(diagnostics.is_empty(), "{source}: {diagnostics:#?}");
    match program.body.into_iter().next().map(|s| s.kind) {
        Some(StmtKind::VarDecl(mut decl)) => decl.declarators.remove(0),
        other => panic!("expected a declaration, got {other:#?}"),
    }
}

fn traced(source: &str) -> (ProductionTrace, usize) {
    let mut trace = ProductionTrace::new();
    let (_, diagnostics) = parse_observed(source, &ParseOptions::default(), &mut trace);
    (trace, diagnostics.len())
}

// ============================================================================
// Annotation Positions
// ============================================================================

#[test]
fn test_variable_annotation() {
    let decl = declarator("let names: string[] = [];");
    let ty = decl.ty.unwrap_or_else(|| panic!("missing annotation"));
    assert!(matches!(ty.kind, TypeKind::Array(_)));
}

#[test]
fn test_arrow_with_return_type() {
    let decl = declarator("const show = (n: number): string => n.toString();");
    let Some(Expr {
        kind: ExprKind::Arrow(arrow),
        ..
    }) = decl.init
    else {
        panic!("expected an arrow function");
    };
    assert_eq!(arrow.params.len(), 1);
    assert!(arrow.params[0].ty.is_some());
    assert!(arrow.return_type.is_some());
}

#[test]
fn test_union_of_function_types() {
    let decl = declarator("let handler: ((e: Event) => void) | null = null;");
    let ty = decl.ty.unwrap_or_else(|| panic!("missing annotation"));
    let TypeKind::Union(members) = ty.kind else {
        panic!("expected a union");
    };
    assert_eq!(members.len(), 2);
    let TypeKind::Paren(inner) = &members[0].kind else {
        panic!("expected a grouped type");
    };
    assert!(matches!(inner.kind, TypeKind::Function { .. }));
}

#[test]
fn test_component_props_annotation() {
    let (program, diagnostics) =
        parse("component Card({ title }: { title: string; onClose?: () => void }) { return <h1>{title}</h1>; }");
    assert!(diagnostics.is_empty(), "{diagnostics:#?}");
    let StmtKind::Component(card) = &program.body[0].kind else {
        panic!("expected a component");
    };
    let ty = card.params[0].ty.as_ref().map(|t| &t.kind);
    assert!(matches!(ty, Some(TypeKind::Object(members)) if members.len() == 2));
}

#[test]
fn test_as_expression_type() {
    let decl = declarator("const n = value as number | undefined;");
    let Some(Expr {
        kind: ExprKind::As { ty, .. },
        ..
    }) = decl.init
    else {
        panic!("expected an `as` expression");
    };
    assert!(matches!(ty.kind, TypeKind::Union(_)));
}

// ============================================================================
// Backtracking
// ============================================================================

#[test]
fn test_typed_arrow_parses_without_backtracking() {
    let (trace, errors) = traced("const f = (a: number, b: string): void => {};");
    assert_eq!(errors, 0);
    assert_eq!(trace.backtracks(), 0);
}

#[test]
fn test_parenthesized_conditional_branch_backtracks_once() {
    let (trace, errors) = traced("const v = ok ? (a) : b;");
    assert_eq!(errors, 0);
    assert_eq!(trace.backtracks(), 1);
}

#[test]
fn test_each_ambiguous_site_backtracks_at_most_once() {
    let source = "type A = (B)[];\ntype C = (D)[];\nconst v = ok ? (a) : b;";
    let (trace, errors) = traced(source);
    assert_eq!(errors, 0);
    assert_eq!(trace.backtracks(), 3);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_type_after_colon() {
    let (_, diagnostics) = parse("function f(a: ) {}");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::ExpectedType);
}

#[test]
fn test_unclosed_type_arguments() {
    let (_, diagnostics) = parse("let m: Map<string, number = x;");
    assert!(!diagnostics.is_empty());
}
