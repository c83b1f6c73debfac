//! Type annotation AST nodes.
//! 类型注解 AST 节点。
//!
//! Annotations are advisory at this stage: anything unrecognised becomes
//! [`TypeKind::Unknown`] rather than failing the parse.

use crate::Ident;
use loom_common::Span;

/// A type annotation.
/// 类型注解。
#[derive(Debug, Clone)]
pub struct TypeAnnotation {
    pub kind: TypeKind,
    pub span: Span,
}

impl TypeAnnotation {
    pub fn new(kind: TypeKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn unknown(span: Span) -> Self {
        Self::new(TypeKind::Unknown, span)
    }
}

/// Type kind.
/// 类型种类。
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// A named type `string`, `A.B<C>` / 类型引用
    Reference {
        name: Vec<Ident>,
        args: Vec<TypeAnnotation>,
    },
    /// `A | B | C` / 联合类型
    Union(Vec<TypeAnnotation>),
    /// `T[]` / 数组类型
    Array(Box<TypeAnnotation>),
    /// `(x: A) => B` / 函数类型
    Function {
        params: Vec<FunctionTypeParam>,
        result: Box<TypeAnnotation>,
    },
    /// `"a"`, `1`, `true`, `null`, `undefined` / 字面量类型
    Literal(LiteralType),
    /// `(T)` / 括号类型
    Paren(Box<TypeAnnotation>),
    /// `{ a: T; b?: U }` / 对象类型
    Object(Vec<TypeMember>),
    /// `[A, B]` / 元组类型
    Tuple(Vec<TypeAnnotation>),
    /// `typeof x.y` / 类型查询
    Typeof(Vec<Ident>),
    /// `void`
    Void,
    /// Unrecognised syntax / 无法识别的类型
    Unknown,
}

/// The value of a literal type.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralType {
    String(String),
    Number(f64),
    Bool(bool),
    Null,
    Undefined,
}

/// A parameter of a function type.
#[derive(Debug, Clone)]
pub struct FunctionTypeParam {
    pub name: Ident,
    pub ty: Option<TypeAnnotation>,
    pub optional: bool,
    pub rest: bool,
    pub span: Span,
}

/// A member of an object type.
#[derive(Debug, Clone)]
pub struct TypeMember {
    pub name: Ident,
    pub optional: bool,
    pub readonly: bool,
    pub ty: TypeAnnotation,
    pub span: Span,
}
