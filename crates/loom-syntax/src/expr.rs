//! Expression AST nodes.
//! 表达式 AST 节点。

use crate::{
    Block, Function, Ident, MarkupElement, MarkupFragment, Param, TypeAnnotation, TypeParam,
};
use loom_common::Span;

/// An expression.
/// 表达式。
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Placeholder for an expression that could not be parsed.
    pub fn error(span: Span) -> Self {
        Self::new(ExprKind::Error, span)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, ExprKind::Error)
    }

    /// Whether this expression may appear on the left of `=`.
    pub fn is_assignment_target(&self) -> bool {
        match &self.kind {
            ExprKind::Ident(_)
            | ExprKind::Member { .. }
            | ExprKind::Array(_)
            | ExprKind::Object(_)
            | ExprKind::Error => true,
            ExprKind::Paren(inner) | ExprKind::NonNull(inner) => inner.is_assignment_target(),
            ExprKind::As { expr, .. } => expr.is_assignment_target(),
            _ => false,
        }
    }
}

/// Expression kind.
/// 表达式类型。
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Variable reference / 变量引用
    Ident(Ident),
    /// Literal / 字面量
    Literal(Literal),
    /// Regular expression `/ab+c/gi` / 正则表达式
    Regex { pattern: String, flags: String },
    /// Template literal `` `a${b}c` `` / 模板字面量
    Template(Template),
    /// Tagged template `` tag`a${b}` `` / 带标签模板
    TaggedTemplate { tag: Box<Expr>, quasi: Template },
    /// `this`
    This,

    /// Array literal `[a, , ...b]`; `None` is a hole / 数组字面量
    Array(Vec<Option<ArrayElement>>),
    /// Object literal `{ a, b: 1, ...c }` / 对象字面量
    Object(Vec<Property>),

    /// Function expression / 函数表达式
    Function(Box<Function>),
    /// Arrow function `(a) => b` / 箭头函数
    Arrow(Box<ArrowFunction>),

    /// Unary operation `!a`, `typeof a` / 一元运算
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// `++a`, `a--` / 自增自减
    Update {
        op: UpdateOp,
        prefix: bool,
        operand: Box<Expr>,
    },
    /// Binary operation `a + b` / 二元运算
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Short-circuit operation `a && b` / 逻辑运算
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Assignment `a = b`, `a += b` / 赋值
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// `test ? a : b` / 条件表达式
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },

    /// Function call `f(x)` or `f?.(x)` / 函数调用
    Call {
        callee: Box<Expr>,
        args: Vec<Argument>,
        optional: bool,
    },
    /// `new C(x)`; `args` is `None` without parentheses / 构造调用
    New {
        callee: Box<Expr>,
        args: Option<Vec<Argument>>,
    },
    /// Member access `a.b`, `a[b]`, `a?.b` / 成员访问
    Member {
        object: Box<Expr>,
        property: MemberProperty,
        optional: bool,
    },

    /// `a, b` / 逗号表达式
    Sequence(Vec<Expr>),
    /// `(expr)` / 括号表达式
    Paren(Box<Expr>),
    /// Non-null assertion `a!` / 非空断言
    NonNull(Box<Expr>),
    /// Type assertion `a as T` / 类型断言
    As {
        expr: Box<Expr>,
        ty: TypeAnnotation,
    },

    /// Markup element `<div>...</div>` / 标记元素
    Element(Box<MarkupElement>),
    /// Markup fragment `<>...</>` / 标记片段
    Fragment(Box<MarkupFragment>),

    /// `await x` or `yield x`, parsed but not supported.
    /// 已解析但不支持的结构。
    Unsupported {
        construct: UnsupportedConstruct,
        argument: Option<Box<Expr>>,
    },

    /// An expression that could not be parsed / 无法解析的表达式
    Error,
}

/// Literal values.
/// 字面量。
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    /// `123n`, digits kept as written.
    BigInt(String),
    String(String),
    Bool(bool),
    Null,
}

/// A template literal: `quasis.len() == exprs.len() + 1`.
/// 模板字面量。
#[derive(Debug, Clone)]
pub struct Template {
    pub quasis: Vec<TemplateQuasi>,
    pub exprs: Vec<Expr>,
    pub span: Span,
}

/// Literal text of a template between interpolations.
#[derive(Debug, Clone)]
pub struct TemplateQuasi {
    pub raw: String,
    pub cooked: String,
    pub span: Span,
}

/// An array literal element.
#[derive(Debug, Clone)]
pub enum ArrayElement {
    Expr(Expr),
    Spread(Expr),
}

/// A call argument.
#[derive(Debug, Clone)]
pub enum Argument {
    Expr(Expr),
    Spread(Expr),
}

impl Argument {
    pub fn expr(&self) -> &Expr {
        match self {
            Argument::Expr(expr) | Argument::Spread(expr) => expr,
        }
    }
}

/// The property part of a member access.
#[derive(Debug, Clone)]
pub enum MemberProperty {
    /// `.name`
    Ident(Ident),
    /// `[expr]`
    Computed(Box<Expr>),
}

/// An object literal entry.
/// 对象字面量中的条目。
#[derive(Debug, Clone)]
pub struct Property {
    pub kind: PropertyKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum PropertyKind {
    /// `key: value`
    KeyValue { key: PropertyKey, value: Expr },
    /// `name`
    Shorthand(Ident),
    /// `name() {}`, `get name() {}`, `set name(v) {}`
    Method {
        key: PropertyKey,
        kind: MethodKind,
        function: Box<Function>,
    },
    /// `...expr`
    Spread(Expr),
}

/// An object key.
#[derive(Debug, Clone)]
pub enum PropertyKey {
    Ident(Ident),
    String { value: String, span: Span },
    Number { value: f64, span: Span },
    /// `[expr]`
    Computed(Box<Expr>),
}

impl PropertyKey {
    pub fn span(&self) -> Span {
        match self {
            PropertyKey::Ident(ident) => ident.span,
            PropertyKey::String { span, .. } | PropertyKey::Number { span, .. } => *span,
            PropertyKey::Computed(expr) => expr.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Method,
    Get,
    Set,
}

/// An arrow function.
/// 箭头函数。
#[derive(Debug, Clone)]
pub struct ArrowFunction {
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: Option<TypeAnnotation>,
    pub body: ArrowBody,
    /// Written with `async`; reported as unsupported.
    pub is_async: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ArrowBody {
    Expr(Box<Expr>),
    Block(Block),
}

/// Constructs that are recognised so they can be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedConstruct {
    Await,
    Yield,
    /// `yield* x`
    YieldDelegate,
}

/// Unary operators.
/// 一元运算符。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,    // -
    Plus,   // +
    Not,    // !
    BitNot, // ~
    Typeof,
    Void,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment, // ++
    Decrement, // --
}

/// Binary operators.
/// 二元运算符。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic 算术运算
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Mod, // %
    Pow, // **

    // Comparison 比较运算
    Eq,       // ==
    Ne,       // !=
    StrictEq, // ===
    StrictNe, // !==
    Lt,       // <
    Le,       // <=
    Gt,       // >
    Ge,       // >=
    Instanceof,
    In,

    // Bitwise 位运算
    BitAnd, // &
    BitOr,  // |
    BitXor, // ^
    Shl,    // <<
    Shr,    // >>
    UShr,   // >>>
}

/// Short-circuit operators.
/// 短路运算符。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,      // &&
    Or,       // ||
    Coalesce, // ??
}

/// Assignment operators.
/// 赋值运算符。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,   // =
    Add,      // +=
    Sub,      // -=
    Mul,      // *=
    Div,      // /=
    Mod,      // %=
    Pow,      // **=
    Shl,      // <<=
    Shr,      // >>=
    UShr,     // >>>=
    BitAnd,   // &=
    BitOr,    // |=
    BitXor,   // ^=
    And,      // &&=
    Or,       // ||=
    Coalesce, // ??=
}
