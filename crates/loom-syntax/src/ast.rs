//! Statements and declarations.
//! 语句与声明。

use crate::{Expr, Pattern, TypeAnnotation};
use loom_common::Span;

/// A complete source file.
/// 完整的源文件。
#[derive(Debug, Clone)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A statement.
/// 语句。
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, StmtKind::Error)
    }
}

/// Statement kind.
/// 语句类型。
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// `let x = 1;` / 变量声明
    VarDecl(VarDecl),
    /// `function f() {}` / 函数声明
    Function(Function),
    /// `component Card(props) {}` / 组件声明
    Component(ComponentDecl),
    /// `type Name = T;` / 类型别名
    TypeAlias(TypeAlias),
    /// `import x from "m";` / 导入
    Import(ImportDecl),
    /// `export ...` / 导出
    Export(ExportDecl),
    /// `{ ... }` / 块
    Block(Block),
    /// `if (c) a else b` / 条件语句
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
    },
    /// `for (init; test; update) body` / for 循环
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    /// `for (x in obj) body`
    ForIn {
        left: ForHead,
        right: Expr,
        body: Box<Stmt>,
    },
    /// `for (x of list) body`
    ForOf {
        left: ForHead,
        right: Expr,
        body: Box<Stmt>,
    },
    /// `while (c) body` / while 循环
    While { test: Expr, body: Box<Stmt> },
    /// `do body while (c);`
    DoWhile { body: Box<Stmt>, test: Expr },
    /// `switch (x) { case ... }` / 分支语句
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
    },
    /// `try {} catch (e) {} finally {}` / 异常处理
    Try {
        block: Block,
        handler: Option<CatchClause>,
        finalizer: Option<Block>,
    },
    Throw(Expr),
    Return(Option<Expr>),
    Break(Option<Ident>),
    Continue(Option<Ident>),
    /// `label: stmt` / 带标签语句
    Labeled { label: Ident, body: Box<Stmt> },
    /// Expression statement `expr;` / 表达式语句
    Expr(Expr),
    /// A lone `;` / 空语句
    Empty,
    /// A statement that could not be parsed; diagnostics say why.
    /// 无法解析的语句。
    Error,
}

/// `let`, `const` or `var`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Let,
    Const,
    Var,
}

/// A variable declaration with one or more declarators.
/// 变量声明。
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub kind: VarKind,
    pub declarators: Vec<Declarator>,
    pub span: Span,
}

/// One `pattern: Type = init` binding.
#[derive(Debug, Clone)]
pub struct Declarator {
    pub pattern: Pattern,
    pub ty: Option<TypeAnnotation>,
    pub init: Option<Expr>,
    pub span: Span,
}

/// The first clause of a C-style `for`.
#[derive(Debug, Clone)]
pub enum ForInit {
    VarDecl(VarDecl),
    Expr(Expr),
}

/// The left side of `for ... in` / `for ... of`.
#[derive(Debug, Clone)]
pub enum ForHead {
    VarDecl(VarDecl),
    Target(Expr),
}

/// A function declaration or expression.
/// 函数声明或函数表达式。
#[derive(Debug, Clone)]
pub struct Function {
    pub name: Option<Ident>,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: Option<TypeAnnotation>,
    pub body: Block,
    /// Written with `async`; reported as unsupported.
    pub is_async: bool,
    /// Written with `function*`; reported as unsupported.
    pub is_generator: bool,
    pub span: Span,
}

/// A component declaration `component Name(props) { ... }`.
/// 组件声明。
#[derive(Debug, Clone)]
pub struct ComponentDecl {
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: Option<TypeAnnotation>,
    pub body: Block,
    pub span: Span,
}

/// A function or component parameter.
/// 函数参数。
#[derive(Debug, Clone)]
pub struct Param {
    pub pattern: Pattern,
    pub ty: Option<TypeAnnotation>,
    pub default: Option<Expr>,
    /// `...rest`
    pub rest: bool,
    /// `name?: T`
    pub optional: bool,
    pub span: Span,
}

/// A generic type parameter `T extends U = V`.
/// 泛型类型参数。
#[derive(Debug, Clone)]
pub struct TypeParam {
    pub name: Ident,
    pub constraint: Option<TypeAnnotation>,
    pub default: Option<TypeAnnotation>,
    pub span: Span,
}

/// A type alias.
/// 类型别名。
#[derive(Debug, Clone)]
pub struct TypeAlias {
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub ty: TypeAnnotation,
    pub span: Span,
}

/// A `{ ... }` statement list.
/// 语句块。
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// `case test:` or `default:` with its statements.
#[derive(Debug, Clone)]
pub struct SwitchCase {
    /// `None` for `default`.
    pub test: Option<Expr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `catch (param) { ... }`; the binding is optional.
#[derive(Debug, Clone)]
pub struct CatchClause {
    pub param: Option<Pattern>,
    pub body: Block,
    pub span: Span,
}

/// An import declaration.
/// 导入声明。
#[derive(Debug, Clone)]
pub struct ImportDecl {
    /// Empty for a side-effect import `import "m";`.
    pub specifiers: Vec<ImportSpecifier>,
    pub source: StrLit,
    pub span: Span,
}

/// One imported binding.
/// 导入的绑定。
#[derive(Debug, Clone)]
pub enum ImportSpecifier {
    /// `import x from "m"`
    Default(Ident),
    /// `import * as ns from "m"`
    Namespace(Ident),
    /// `import { a as b } from "m"`; `imported` and `local` are equal without `as`.
    Named { imported: Ident, local: Ident },
}

/// An export declaration.
/// 导出声明。
#[derive(Debug, Clone)]
pub enum ExportDecl {
    /// `export const x = 1;`, `export function f() {}`, ...
    Decl(Box<Stmt>),
    /// `export default function () {}` / `export default component ...`
    DefaultDecl(Box<Stmt>),
    /// `export default expr;`
    DefaultExpr(Expr),
    /// `export { a, b as c } from "m";`
    Named {
        specifiers: Vec<ExportSpecifier>,
        source: Option<StrLit>,
    },
    /// `export * from "m";` / `export * as ns from "m";`
    All {
        exported: Option<Ident>,
        source: StrLit,
    },
}

/// `local as exported` inside an export list.
#[derive(Debug, Clone)]
pub struct ExportSpecifier {
    pub local: Ident,
    pub exported: Ident,
    pub span: Span,
}

/// A string literal in a declaration position (module specifiers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrLit {
    pub value: String,
    pub span: Span,
}

/// An identifier.
/// 标识符。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// Placeholder for a name that was required but missing.
    pub fn missing(span: Span) -> Self {
        Self::new("", span)
    }

    pub fn is_missing(&self) -> bool {
        self.name.is_empty()
    }
}
