//! Markup parsing: elements, fragments, attributes and children.
//! 标记解析：元素、片段、属性与子节点。
//!
//! The lexer has already split tags from text, so this module only checks
//! structure. Each element pushes its name on `open_tags`; a closing tag that
//! names an enclosing element leaves the inner element unclosed instead of
//! being taken as a mismatch, which keeps one missing `</x>` from turning
//! every following tag into an error.

use loom_common::{BytePos, Span};
use loom_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode, Label};
use loom_lexer::{TokenKind, cook_attribute_string, decode_entities};
use loom_syntax::*;

use crate::parser::Parser;

/// How the children of an element ended.
enum ChildrenEnd {
    /// At `</`.
    ClosingTag,
    /// End of input; the lexer has reported the unclosed element.
    Eof,
    /// Code where markup should continue; already reported.
    Interrupted,
}

impl<'a, 'src> Parser<'a, 'src> {
    /// An element or fragment; the cursor is on `<`.
    /// 解析标记元素或片段。
    pub(crate) fn parse_markup(&mut self) -> Expr {
        self.nested(
            "markup",
            |p| {
                p.enter("markup");
                let expr = p.parse_markup_node();
                p.exit("markup", expr.span);
                expr
            },
            Expr::error,
        )
    }

    fn parse_markup_node(&mut self) -> Expr {
        let start = self.start();
        self.advance();

        if self.check(TokenKind::MarkupTagEnd) {
            self.advance();
            let fragment = self.parse_fragment(self.span_from(start));
            let span = fragment.span;
            return Expr::new(ExprKind::Fragment(Box::new(fragment)), span);
        }

        let element = self.parse_element(start);
        let span = element.span;
        Expr::new(ExprKind::Element(Box::new(element)), span)
    }

    fn parse_fragment(&mut self, opening: Span) -> MarkupFragment {
        self.open_tags.push(String::new());
        let (children, end) = self.parse_children("");
        self.open_tags.pop();

        let closing = match end {
            ChildrenEnd::ClosingTag => self.close_fragment(opening),
            ChildrenEnd::Eof | ChildrenEnd::Interrupted => None,
        };
        MarkupFragment {
            opening,
            children,
            closing,
            span: self.span_from(opening.start),
        }
    }

    fn close_fragment(&mut self, opening: Span) -> Option<Span> {
        let written = self.peek_closing_name();
        if written.is_empty() {
            return Some(self.parse_closing_tag().span);
        }
        if self.open_tags.contains(&written) {
            self.report_unclosed(opening, "<>", &written);
            return None;
        }
        let closing = self.parse_closing_tag();
        self.report_mismatch(opening, "", &closing);
        Some(closing.span)
    }

    fn parse_element(&mut self, start: BytePos) -> MarkupElement {
        let name = self.parse_markup_name(true);
        let attributes = self.parse_attributes();

        let self_closing = self.eat(TokenKind::MarkupSelfClose);
        let ends_tag = self_closing || self.eat(TokenKind::MarkupTagEnd);
        if !ends_tag && !self.at_end() {
            self.unexpected(ErrorCode::UnexpectedToken, "`>` or `/>` to end the tag");
        }
        let opening = MarkupOpeningTag {
            name,
            attributes,
            self_closing,
            span: self.span_from(start),
        };

        if self_closing || !ends_tag {
            return MarkupElement {
                opening,
                children: Vec::new(),
                closing: None,
                span: self.span_from(start),
            };
        }

        let own = opening.name.qualified();
        self.open_tags.push(own.clone());
        let (children, end) = self.parse_children(&own);
        self.open_tags.pop();

        let closing = match end {
            ChildrenEnd::ClosingTag => self.close_element(&opening, &own),
            ChildrenEnd::Eof | ChildrenEnd::Interrupted => None,
        };
        MarkupElement {
            opening,
            children,
            closing,
            span: self.span_from(start),
        }
    }

    /// The cursor is on `</`. Consume it when it closes this element or is a
    /// plain mismatch; leave it for the ancestor it names.
    fn close_element(&mut self, opening: &MarkupOpeningTag, own: &str) -> Option<MarkupClosingTag> {
        let written = self.peek_closing_name();
        if written == own {
            return Some(self.parse_closing_tag());
        }
        if self.open_tags.contains(&written) {
            self.report_unclosed(opening.span, &format!("<{own}>"), &written);
            return None;
        }
        let closing = self.parse_closing_tag();
        self.report_mismatch(opening.name.span, own, &closing);
        Some(closing)
    }

    fn report_unclosed(&mut self, opening: Span, tag: &str, closer: &str) {
        self.diagnostics.report(
            Diagnostic::error(
                ErrorCode::UnclosedElement,
                opening,
                format!("`{tag}` is not closed before `</{closer}>`"),
            )
            .with_suggestion(format!("add `</{}>`", tag.trim_start_matches('<').trim_end_matches('>'))),
        );
    }

    fn report_mismatch(&mut self, opening: Span, expected: &str, closing: &MarkupClosingTag) {
        self.diagnostics.report(
            Diagnostic::error(
                ErrorCode::MismatchedClosingTag,
                closing.span,
                format!(
                    "expected `</{}>`, found `</{}>`",
                    expected,
                    closing.name.qualified()
                ),
            )
            .with_label(Label::new(opening, "opened here")),
        );
    }

    /// The dotted name of the closing tag at the cursor, without consuming it.
    ///
    /// Reads the same name `parse_markup_name` would: identifiers joined by
    /// single dots, stopping at the first part that breaks the pattern.
    fn peek_closing_name(&self) -> String {
        let mut name = String::new();
        let mut offset = 1;
        loop {
            let token = self.peek(offset);
            let wants_part = name.is_empty() || name.ends_with('.');
            match token.kind {
                TokenKind::Identifier if wants_part => name.push_str(token.text),
                TokenKind::Dot if !wants_part => name.push('.'),
                _ => return name,
            }
            offset += 1;
        }
    }

    fn parse_closing_tag(&mut self) -> MarkupClosingTag {
        let start = self.start();
        self.advance();
        let name = self.parse_markup_name(false);
        if !self.eat(TokenKind::MarkupTagEnd) && !self.at_end() {
            self.unexpected(ErrorCode::UnexpectedToken, "`>` to end the closing tag");
            let mut guard = self.loop_guard("closing tag");
            while !self.at_end() && !self.check(TokenKind::MarkupTagEnd) {
                if !self.step(&mut guard) {
                    break;
                }
                self.advance();
            }
            self.eat(TokenKind::MarkupTagEnd);
        }
        MarkupClosingTag {
            name,
            span: self.span_from(start),
        }
    }

    /// `div`, `data-list`, `Menu.Item`. Empty for fragments.
    fn parse_markup_name(&mut self, required: bool) -> MarkupName {
        let start = self.start();
        let mut parts = Vec::new();
        if self.check(TokenKind::Identifier) {
            parts.push(self.parse_ident("a tag name"));
        } else if required {
            self.unexpected(ErrorCode::ExpectedIdentifier, "a tag name");
            return MarkupName {
                parts,
                span: self.missing_span(),
            };
        } else {
            return MarkupName {
                parts,
                span: self.missing_span(),
            };
        }

        let mut guard = self.loop_guard("tag name");
        while self.check(TokenKind::Dot) {
            if !self.step(&mut guard) {
                break;
            }
            self.advance();
            parts.push(self.parse_ident("a name after `.`"));
        }
        MarkupName {
            parts,
            span: self.span_from(start),
        }
    }

    // ========== Attributes ==========

    fn parse_attributes(&mut self) -> Vec<MarkupAttributeItem> {
        let mut attributes = Vec::new();
        let mut guard = self.loop_guard("attributes");
        loop {
            if !self.step(&mut guard) {
                break;
            }
            match self.current_kind() {
                TokenKind::Identifier => {
                    attributes.push(MarkupAttributeItem::Attribute(self.parse_attribute()));
                }
                TokenKind::LBrace => {
                    if let Some(spread) = self.parse_spread_attribute() {
                        attributes.push(MarkupAttributeItem::Spread(spread));
                    }
                }
                // Reported by the lexer.
                TokenKind::Error => {
                    self.advance();
                }
                TokenKind::String | TokenKind::Eq | TokenKind::Dot => {
                    let span = self.advance().span;
                    self.error(
                        ErrorCode::InvalidAttribute,
                        span,
                        "expected an attribute name",
                    );
                }
                _ => break,
            }
        }
        attributes
    }

    fn parse_attribute(&mut self) -> MarkupAttribute {
        let start = self.start();
        let token = self.advance();
        let name = Ident::new(token.text, token.span);

        if !self.eat(TokenKind::Eq) {
            return MarkupAttribute {
                name,
                value: None,
                span: self.span_from(start),
            };
        }

        let token = self.current();
        let value = match token.kind {
            TokenKind::String => {
                self.advance();
                Some(MarkupAttributeValue::String(StrLit {
                    value: cook_attribute_string(token.text).to_string(),
                    span: token.span,
                }))
            }
            TokenKind::LBrace => {
                let container = self.parse_expression_container();
                if let MarkupExpression::Empty = container.expression {
                    self.error(
                        ErrorCode::ExpectedExpression,
                        container.span,
                        format!("attribute `{}` needs an expression inside `{{}}`", name.name),
                    );
                }
                Some(MarkupAttributeValue::Expression(container))
            }
            TokenKind::Error => {
                self.advance();
                None
            }
            _ => {
                self.error(
                    ErrorCode::InvalidAttribute,
                    self.missing_span(),
                    format!(
                        "expected a quoted string or `{{expression}}` after `{}=`",
                        name.name
                    ),
                );
                None
            }
        };
        MarkupAttribute {
            name,
            value,
            span: self.span_from(start),
        }
    }

    /// `{...props}`. Any other container in attribute position is reported and skipped.
    fn parse_spread_attribute(&mut self) -> Option<MarkupSpreadAttribute> {
        if self.peek_kind(1) != TokenKind::Ellipsis {
            let container = self.parse_expression_container();
            self.error(
                ErrorCode::InvalidAttribute,
                container.span,
                "only a spread `{...props}` may appear in a tag without a name",
            );
            return None;
        }

        let start = self.start();
        let open = self.advance().span;
        self.advance();
        let argument = self.in_code(|p| p.parse_assignment());
        self.expect_closing(TokenKind::RBrace, open, "this spread attribute");
        Some(MarkupSpreadAttribute {
            argument,
            span: self.span_from(start),
        })
    }

    /// `{expr}`; `{}` and comment-only containers are empty.
    fn parse_expression_container(&mut self) -> MarkupExpressionContainer {
        let start = self.start();
        let open = self.advance().span;
        if self.eat(TokenKind::RBrace) {
            return MarkupExpressionContainer {
                expression: MarkupExpression::Empty,
                span: self.span_from(start),
            };
        }

        // A container and its expression are one nesting level with the element.
        let depth = self.depth;
        self.depth = depth.saturating_sub(1);
        let expr = self.in_code(|p| p.parse_expression());
        self.depth = depth;
        self.expect_closing(TokenKind::RBrace, open, "this expression container");
        MarkupExpressionContainer {
            expression: MarkupExpression::Expr(expr),
            span: self.span_from(start),
        }
    }

    // ========== Children ==========

    fn parse_children(&mut self, own: &str) -> (Vec<MarkupChild>, ChildrenEnd) {
        let mut children = Vec::new();
        let mut guard = self.loop_guard("markup children");
        loop {
            if !self.step(&mut guard) {
                return (children, ChildrenEnd::Interrupted);
            }
            match self.current_kind() {
                TokenKind::MarkupText => children.push(MarkupChild::Text(self.parse_text_run())),
                TokenKind::LBrace => {
                    children.push(MarkupChild::Expression(self.parse_expression_container()));
                }
                TokenKind::MarkupOpen => {
                    let child = self.parse_markup();
                    match child.kind {
                        ExprKind::Element(element) => children.push(MarkupChild::Element(*element)),
                        ExprKind::Fragment(fragment) => {
                            children.push(MarkupChild::Fragment(*fragment));
                        }
                        // Too deep; already reported.
                        _ => {}
                    }
                }
                TokenKind::MarkupCloseOpen => return (children, ChildrenEnd::ClosingTag),
                TokenKind::Eof => return (children, ChildrenEnd::Eof),
                TokenKind::Error => {
                    self.advance();
                }
                _ => {
                    let tag = if own.is_empty() {
                        "<>".to_string()
                    } else {
                        format!("<{own}>")
                    };
                    self.error_here(
                        ErrorCode::UnclosedElement,
                        format!("`{tag}` is not closed; expected markup, found {}", self.found()),
                    );
                    return (children, ChildrenEnd::Interrupted);
                }
            }
        }
    }

    /// Adjacent text tokens become one run, taken verbatim from the source.
    fn parse_text_run(&mut self) -> MarkupTextRun {
        let first = self.advance().span;
        let mut guard = self.loop_guard("text run");
        while self.check(TokenKind::MarkupText) {
            if !self.step(&mut guard) {
                break;
            }
            self.advance();
        }

        let span = Span::new(first.start, self.prev_end);
        let raw = self
            .tokens
            .source()
            .get(span.range())
            .unwrap_or_default()
            .to_string();
        let value = decode_entities(&raw);
        MarkupTextRun { raw, value, span }
    }

    /// `</name>` where an expression should be.
    pub(crate) fn parse_stray_closing_tag(&mut self) -> Expr {
        let start = self.start();
        let name = self.peek_closing_name();
        self.advance();

        let mut guard = self.loop_guard("closing tag");
        while !self.at_end() && !self.check(TokenKind::MarkupTagEnd) {
            if !self.step(&mut guard) {
                break;
            }
            self.advance();
        }
        self.eat(TokenKind::MarkupTagEnd);

        let span = self.span_from(start);
        self.error(
            ErrorCode::StrayClosingTag,
            span,
            format!("closing tag `</{name}>` has no matching opening tag"),
        );
        Expr::error(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use pretty_assertions::assert_eq;

    fn markup(source: &str) -> (Expr, Vec<Diagnostic>) {
        let (program, diagnostics) = parse(source);
        let expr = match program.body.into_iter().next().map(|s| s.kind) {
            Some(StmtKind::Expr(expr)) => expr,
            Some(StmtKind::VarDecl(mut decl)) => {
                decl.declarators.remove(0).init.unwrap_or_else(|| panic!("no initializer"))
            }
            other => panic!("expected an expression, got {other:#?}"),
        };
        (expr, diagnostics)
    }

    fn element(expr: Expr) -> MarkupElement {
        match expr.kind {
            ExprKind::Element(element) => *element,
            other => panic!("expected an element, got {other:#?}"),
        }
    }

    #[test]
    fn element_with_attributes_and_children() {
        let (expr, diagnostics) = markup(
            r#"const view = <a href="/x?a=1&amp;b=2" disabled {...rest} onClick={go}>Hi {name}!</a>;"#,
        );
        assert!(diagnostics.is_empty(), "{diagnostics:#?}");
        let a = element(expr);
        assert_eq!(a.name(), "a");
        assert_eq!(a.opening.attributes.len(), 4);
        let MarkupAttributeItem::Attribute(href) = &a.opening.attributes[0] else {
            panic!("expected an attribute");
        };
        // Attribute strings are taken verbatim.
        assert!(matches!(
            &href.value,
            Some(MarkupAttributeValue::String(s)) if s.value == "/x?a=1&amp;b=2"
        ));
        assert!(matches!(&a.opening.attributes[1], MarkupAttributeItem::Attribute(attr) if attr.value.is_none()));
        assert!(matches!(a.opening.attributes[2], MarkupAttributeItem::Spread(_)));
        assert_eq!(a.children.len(), 3);
        assert!(matches!(&a.children[0], MarkupChild::Text(text) if text.raw == "Hi "));
        assert!(matches!(a.children[1], MarkupChild::Expression(_)));
        assert_eq!(a.closing.as_ref().map(|c| c.name.qualified()).as_deref(), Some("a"));
    }

    #[test]
    fn text_is_decoded_but_raw_is_kept() {
        let (expr, _) = markup("<p>a &lt; b &amp;&amp; c</p>");
        let p = element(expr);
        let MarkupChild::Text(text) = &p.children[0] else {
            panic!("expected text");
        };
        assert_eq!(text.raw, "a &lt; b &amp;&amp; c");
        assert_eq!(text.value, "a < b && c");
    }

    #[test]
    fn whitespace_only_text_is_kept() {
        let (expr, diagnostics) = markup("<ul>\n  <li/>\n</ul>");
        assert!(diagnostics.is_empty());
        let ul = element(expr);
        assert_eq!(ul.children.len(), 3);
        assert!(matches!(&ul.children[0], MarkupChild::Text(t) if t.is_whitespace()));
    }

    #[test]
    fn fragments_and_dotted_names() {
        let (expr, diagnostics) = markup("<><Menu.Item selected /></>");
        assert!(diagnostics.is_empty(), "{diagnostics:#?}");
        let ExprKind::Fragment(fragment) = expr.kind else {
            panic!("expected a fragment");
        };
        assert!(fragment.closing.is_some());
        let MarkupChild::Element(item) = &fragment.children[0] else {
            panic!("expected an element");
        };
        assert_eq!(item.name(), "Menu.Item");
        assert!(item.is_self_closing());
    }

    #[test]
    fn empty_and_comment_containers() {
        let (expr, diagnostics) = markup("<p>{}{/* note */}</p>");
        assert!(diagnostics.is_empty(), "{diagnostics:#?}");
        let p = element(expr);
        assert_eq!(p.children.len(), 2);
        assert!(p.children.iter().all(|c| matches!(
            c,
            MarkupChild::Expression(MarkupExpressionContainer { expression: MarkupExpression::Empty, .. })
        )));
    }

    #[test]
    fn empty_attribute_container_is_an_error() {
        let (_, diagnostics) = markup("<input value={} />");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::ExpectedExpression);
    }

    #[test]
    fn nested_markup_in_containers() {
        let (expr, diagnostics) = markup("<ul>{items.map(i => <li key={i}>{i}</li>)}</ul>");
        assert!(diagnostics.is_empty(), "{diagnostics:#?}");
        let ul = element(expr);
        assert_eq!(ul.children.len(), 1);
    }

    #[test]
    fn mismatched_closing_tag() {
        let (expr, diagnostics) = markup("<div>text</span>");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::MismatchedClosingTag);
        assert_eq!(diagnostics[0].labels.len(), 1);
        let div = element(expr);
        assert_eq!(div.closing.map(|c| c.name.qualified()).as_deref(), Some("span"));
    }

    #[test]
    fn closing_an_ancestor_leaves_the_child_unclosed() {
        let (expr, diagnostics) = markup("x = <div><span>text</div>;\nlet y = 1;");
        let codes: Vec<_> = diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![ErrorCode::UnclosedElement]);
        let ExprKind::Assign { value, .. } = expr.kind else {
            panic!("expected an assignment");
        };
        let div = element(*value);
        assert!(div.closing.is_some());
        let MarkupChild::Element(span) = &div.children[0] else {
            panic!("expected the inner element");
        };
        assert!(span.closing.is_none());
    }

    #[test]
    fn stray_closing_tag() {
        let (program, diagnostics) = parse("</div>;\nlet y = 1;");
        assert_eq!(diagnostics[0].code, ErrorCode::StrayClosingTag);
        assert!(program.body.iter().any(|s| matches!(s.kind, StmtKind::VarDecl(_))));
    }

    #[test]
    fn unclosed_element_at_eof_is_reported_once() {
        let (_, diagnostics) = parse("<div>text");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::UnterminatedMarkup);
    }

    #[test]
    fn closing_name_ignores_a_second_word() {
        let (expr, diagnostics) = markup("const v = <a>x</a b>;");
        assert!(
            diagnostics.iter().all(|d| d.code != ErrorCode::MismatchedClosingTag),
            "{diagnostics:#?}"
        );
        let a = element(expr);
        let closing = a.closing.unwrap_or_else(|| panic!("`</a b>` should close `<a>`"));
        assert_eq!(closing.name.qualified(), "a");
    }

    #[test]
    fn container_shares_its_elements_nesting_level() {
        use crate::{ParseOptions, parse_with};
        use loom_common::Limits;

        let nest = |levels: usize| {
            format!("x = {}1{};", "<a>{".repeat(levels), "}</a>".repeat(levels))
        };
        let options = ParseOptions::new().limits(Limits::new().max_nesting_depth(20));

        let (_, diagnostics) = parse_with(&nest(12), &options);
        assert!(diagnostics.is_empty(), "{diagnostics:#?}");

        let (_, diagnostics) = parse_with(&nest(30), &options);
        assert!(diagnostics.iter().any(|d| d.code == ErrorCode::NestingTooDeep));
    }
}
