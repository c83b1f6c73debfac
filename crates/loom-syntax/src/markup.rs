//! Markup AST nodes.
//! 标记（类 XML）AST 节点。

use crate::{Expr, Ident, StrLit};
use loom_common::Span;

/// `<Name attrs>children</Name>` or `<Name attrs />`.
/// 标记元素。
#[derive(Debug, Clone)]
pub struct MarkupElement {
    pub opening: MarkupOpeningTag,
    pub children: Vec<MarkupChild>,
    /// `None` when self-closing, or when the element was closed implicitly.
    pub closing: Option<MarkupClosingTag>,
    pub span: Span,
}

impl MarkupElement {
    pub fn name(&self) -> String {
        self.opening.name.qualified()
    }

    pub fn is_self_closing(&self) -> bool {
        self.opening.self_closing
    }
}

/// `<>children</>`.
/// 标记片段。
#[derive(Debug, Clone)]
pub struct MarkupFragment {
    /// Span of `<>`.
    pub opening: Span,
    pub children: Vec<MarkupChild>,
    /// Span of `</>`, when present.
    pub closing: Option<Span>,
    pub span: Span,
}

/// A tag name: `div`, `data-list`, `Menu.Item`.
/// 标签名。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupName {
    pub parts: Vec<Ident>,
    pub span: Span,
}

impl MarkupName {
    /// The dotted, fully qualified name.
    pub fn qualified(&self) -> String {
        let mut name = String::new();
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                name.push('.');
            }
            name.push_str(&part.name);
        }
        name
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// 开始标签。
#[derive(Debug, Clone)]
pub struct MarkupOpeningTag {
    pub name: MarkupName,
    pub attributes: Vec<MarkupAttributeItem>,
    pub self_closing: bool,
    pub span: Span,
}

/// 结束标签。
#[derive(Debug, Clone)]
pub struct MarkupClosingTag {
    pub name: MarkupName,
    pub span: Span,
}

/// An attribute or a spread inside an opening tag.
#[derive(Debug, Clone)]
pub enum MarkupAttributeItem {
    Attribute(MarkupAttribute),
    Spread(MarkupSpreadAttribute),
}

impl MarkupAttributeItem {
    pub fn span(&self) -> Span {
        match self {
            MarkupAttributeItem::Attribute(attr) => attr.span,
            MarkupAttributeItem::Spread(spread) => spread.span,
        }
    }
}

/// `name`, `name="text"` or `name={expr}`. A bare name means `true`.
/// 属性。
#[derive(Debug, Clone)]
pub struct MarkupAttribute {
    pub name: Ident,
    pub value: Option<MarkupAttributeValue>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum MarkupAttributeValue {
    /// Quoted text, taken verbatim.
    String(StrLit),
    Expression(MarkupExpressionContainer),
}

/// `{...props}` inside a tag.
#[derive(Debug, Clone)]
pub struct MarkupSpreadAttribute {
    pub argument: Expr,
    pub span: Span,
}

/// A child of an element or fragment.
/// 元素或片段的子节点。
#[derive(Debug, Clone)]
pub enum MarkupChild {
    Element(MarkupElement),
    Fragment(MarkupFragment),
    Expression(MarkupExpressionContainer),
    Text(MarkupTextRun),
}

impl MarkupChild {
    pub fn span(&self) -> Span {
        match self {
            MarkupChild::Element(element) => element.span,
            MarkupChild::Fragment(fragment) => fragment.span,
            MarkupChild::Expression(container) => container.span,
            MarkupChild::Text(text) => text.span,
        }
    }
}

/// `{expr}`, or `{}` / `{/* comment */}` which hold no expression.
/// 表达式容器。
#[derive(Debug, Clone)]
pub struct MarkupExpressionContainer {
    pub expression: MarkupExpression,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum MarkupExpression {
    /// Nothing, or only comments, between the braces.
    Empty,
    Expr(Expr),
}

/// Text between tags, whitespace preserved.
/// 标签之间的文本，保留空白。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupTextRun {
    /// Exactly as written.
    pub raw: String,
    /// With character references such as `&amp;` decoded.
    pub value: String,
    pub span: Span,
}

impl MarkupTextRun {
    pub fn is_whitespace(&self) -> bool {
        self.raw.chars().all(char::is_whitespace)
    }
}
