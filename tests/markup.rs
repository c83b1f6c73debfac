//! Integration tests for markup embedded in expressions.

use loom_diagnostic::ErrorCode;
use loom_parser::parse;
use loom_syntax::*;

fn init_of(program: Program) -> Expr {
    match program.body.into_iter().next().map(|s| s.kind) {
        Some(StmtKind::VarDecl(mut decl)) => match decl.declarators.remove(0).init {
            Some(init) => init,
            None => panic!("declaration without initializer"),
        },
        other => panic!("expected a declaration, got {other:#?}"),
    }
}

fn parse_init(source: &str) -> Expr {
    let (program, diagnostics) = parse(source);
    assert!(diagnostics.is_empty(), "{source}: {diagnostics:#?}");
    init_of(program)
}

fn into_element(expr: Expr) -> MarkupElement {
    match expr.kind {
        ExprKind::Element(element) => *element,
        ExprKind::Paren(inner) => into_element(*inner),
        other => panic!("expected an element, got {other:#?}"),
    }
}

// ============================================================================
// Markup Positions
// ============================================================================

#[test]
fn test_markup_as_control_flow_body() {
    for source in ["if (ok) <div/>;", "while (ok) <div/>;", "for (;;) <br/>;"] {
        let (program, diagnostics) = parse(source);
        assert!(diagnostics.is_empty(), "{source}: {diagnostics:#?}");
        let body = match program.body.into_iter().next().map(|s| s.kind) {
            Some(StmtKind::If { consequent, .. }) => consequent,
            Some(StmtKind::While { body, .. }) | Some(StmtKind::For { body, .. }) => body,
            other => panic!("{source}: unexpected {other:#?}"),
        };
        let body = *body;
        let StmtKind::Expr(expr) = body.kind else {
            panic!("{source}: body is not an expression statement");
        };
        assert!(matches!(expr.kind, ExprKind::Element(_)), "{source}");
    }
}

#[test]
fn test_regex_after_if_head() {
    let (program, diagnostics) = parse("if (s) /^a+$/.test(s);");
    assert!(diagnostics.is_empty(), "{diagnostics:#?}");
    assert_eq!(program.body.len(), 1);
}

#[test]
fn test_markup_in_conditional_branches() {
    let expr = parse_init("const view = ok ? <Yes/> : <No reason={why}/>;");
    let ExprKind::Conditional {
        consequent,
        alternate,
        ..
    } = expr.kind
    else {
        panic!("expected a conditional");
    };
    assert_eq!(into_element(*consequent).name(), "Yes");
    assert_eq!(into_element(*alternate).name(), "No");
}

#[test]
fn test_markup_after_logical_and() {
    let expr = parse_init("const badge = <p>{count > 0 && <span>{count}</span>}</p>;");
    let p = into_element(expr);
    let MarkupChild::Expression(container) = &p.children[0] else {
        panic!("expected an expression container");
    };
    let MarkupExpression::Expr(inner) = &container.expression else {
        panic!("expected an expression");
    };
    assert!(matches!(inner.kind, ExprKind::Logical { op: LogicalOp::And, .. }));
}

#[test]
fn test_markup_as_arrow_body() {
    let expr = parse_init("const row = (item) => <li>{item.label}</li>;");
    let ExprKind::Arrow(arrow) = expr.kind else {
        panic!("expected an arrow function");
    };
    let ArrowBody::Expr(body) = arrow.body else {
        panic!("expected an expression body");
    };
    assert_eq!(into_element(*body).name(), "li");
}

#[test]
fn test_less_than_in_code_is_not_markup() {
    let expr = parse_init("const small = a < b;");
    assert!(matches!(expr.kind, ExprKind::Binary { op: BinOp::Lt, .. }));
}

#[test]
fn test_template_inside_attribute() {
    let expr = parse_init("const link = <a class={`btn ${kind}`} href='/home'>go</a>;");
    let a = into_element(expr);
    assert_eq!(a.opening.attributes.len(), 2);
    let MarkupAttributeItem::Attribute(class) = &a.opening.attributes[0] else {
        panic!("expected an attribute");
    };
    let Some(MarkupAttributeValue::Expression(container)) = &class.value else {
        panic!("expected an expression value");
    };
    assert!(matches!(
        &container.expression,
        MarkupExpression::Expr(Expr { kind: ExprKind::Template(_), .. })
    ));
}

#[test]
fn test_hyphenated_attribute_and_tag_names() {
    let expr = parse_init(r#"const x = <data-list aria-label="items" />;"#);
    let list = into_element(expr);
    assert_eq!(list.name(), "data-list");
    let MarkupAttributeItem::Attribute(label) = &list.opening.attributes[0] else {
        panic!("expected an attribute");
    };
    assert_eq!(label.name.name, "aria-label");
}

// ============================================================================
// Spans and Text
// ============================================================================

#[test]
fn test_element_span_covers_closing_tag() {
    let source = "const v = <b>bold</b>;";
    let b = into_element(parse_init(source));
    let start = source.find("<b>").unwrap_or_default();
    let end = source.find(';').unwrap_or_default();
    assert_eq!(usize::from(b.span.start), start);
    assert_eq!(usize::from(b.span.end), end);
}

#[test]
fn test_text_spanning_lines_keeps_newlines() {
    let b = into_element(parse_init("const v = <pre>one\ntwo</pre>;"));
    let MarkupChild::Text(text) = &b.children[0] else {
        panic!("expected text");
    };
    assert_eq!(text.raw, "one\ntwo");
}

// ============================================================================
// Recovery
// ============================================================================

#[test]
fn test_mismatched_tag_then_more_code() {
    let (program, diagnostics) = parse("let a = <div>x</dvi>;\nlet b = 2;");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::MismatchedClosingTag);
    assert_eq!(program.body.len(), 2);
}

#[test]
fn test_unterminated_attribute_expression() {
    let (_, diagnostics) = parse("let a = <div title={name></div>;");
    assert!(!diagnostics.is_empty());
}
