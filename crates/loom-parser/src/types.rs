//! Type annotation parsing.
//! 类型注解解析。
//!
//! Annotations are kept for later phases but never fail the parse: anything
//! unrecognised is reported once and becomes [`TypeKind::Unknown`].

use loom_common::BytePos;
use loom_diagnostic::ErrorCode;
use loom_lexer::{TokenKind, cook_string, parse_number};
use loom_syntax::*;

use crate::parser::Parser;

impl<'a, 'src> Parser<'a, 'src> {
    /// Parse a type annotation.
    /// 解析类型注解。
    pub(crate) fn parse_type(&mut self) -> TypeAnnotation {
        self.nested(
            "type",
            |p| {
                p.enter("type");
                let ty = p.parse_union_type();
                p.exit("type", ty.span);
                ty
            },
            TypeAnnotation::unknown,
        )
    }

    /// `A | B`, with an optional leading `|`.
    fn parse_union_type(&mut self) -> TypeAnnotation {
        let start = self.start();
        let leading = self.eat(TokenKind::Pipe);

        let first = self.parse_array_type();
        if !leading && !self.check(TokenKind::Pipe) {
            return first;
        }

        let mut members = vec![first];
        let mut guard = self.loop_guard("union type");
        while self.eat(TokenKind::Pipe) {
            if !self.step(&mut guard) {
                break;
            }
            members.push(self.parse_array_type());
        }
        TypeAnnotation::new(TypeKind::Union(members), self.span_from(start))
    }

    /// A primary type followed by any number of `[]`.
    fn parse_array_type(&mut self) -> TypeAnnotation {
        let mut ty = self.parse_primary_type();
        let start = ty.span.start;

        let mut guard = self.loop_guard("array type");
        while self.check(TokenKind::LBracket)
            && !self.current().newline_before
            && self.peek_kind(1) == TokenKind::RBracket
        {
            if !self.step(&mut guard) {
                break;
            }
            self.advance();
            self.advance();
            ty = TypeAnnotation::new(TypeKind::Array(Box::new(ty)), self.span_from(start));
        }
        ty
    }

    fn parse_primary_type(&mut self) -> TypeAnnotation {
        let token = self.current();
        let start = token.span.start;
        let kind = match token.kind {
            TokenKind::Identifier if token.text == "undefined" => {
                self.advance();
                TypeKind::Literal(LiteralType::Undefined)
            }
            TokenKind::Identifier => return self.parse_type_reference(),
            TokenKind::Null => {
                self.advance();
                TypeKind::Literal(LiteralType::Null)
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                TypeKind::Literal(LiteralType::Bool(token.kind == TokenKind::True))
            }
            TokenKind::String => {
                self.advance();
                TypeKind::Literal(LiteralType::String(cook_string(token.text)))
            }
            TokenKind::Number => {
                self.advance();
                TypeKind::Literal(LiteralType::Number(parse_number(token.text)))
            }
            TokenKind::Minus if self.peek_kind(1) == TokenKind::Number => {
                self.advance();
                let number = self.advance();
                TypeKind::Literal(LiteralType::Number(-parse_number(number.text)))
            }
            TokenKind::Void => {
                self.advance();
                TypeKind::Void
            }
            TokenKind::Typeof => {
                self.advance();
                TypeKind::Typeof(self.parse_dotted_name())
            }
            TokenKind::LParen => return self.parse_paren_type(),
            TokenKind::LBrace => return self.parse_object_type(),
            TokenKind::LBracket => {
                let open = self.advance().span;
                let elements =
                    self.parse_comma_list(TokenKind::RBracket, "tuple type", |p| Some(p.parse_type()));
                self.expect_closing(TokenKind::RBracket, open, "this tuple type");
                TypeKind::Tuple(elements)
            }
            _ => return self.type_error(),
        };
        TypeAnnotation::new(kind, self.span_from(start))
    }

    /// `Name`, `A.B`, `Map<K, V>`.
    fn parse_type_reference(&mut self) -> TypeAnnotation {
        let start = self.start();
        let name = self.parse_dotted_name();
        let args = if self.check(TokenKind::Lt) {
            let open = self.advance().span;
            let args = self.parse_comma_list(TokenKind::Gt, "type arguments", |p| Some(p.parse_type()));
            self.expect_closing(TokenKind::Gt, open, "the type arguments");
            args
        } else {
            Vec::new()
        };
        TypeAnnotation::new(TypeKind::Reference { name, args }, self.span_from(start))
    }

    fn parse_dotted_name(&mut self) -> Vec<Ident> {
        let mut parts = vec![self.parse_ident("a type name")];
        let mut guard = self.loop_guard("qualified name");
        while self.check(TokenKind::Dot) {
            if !self.step(&mut guard) {
                break;
            }
            self.advance();
            parts.push(self.parse_name("a name after `.`"));
        }
        parts
    }

    /// `(x: A) => B` or a grouped `(A)`.
    ///
    /// Whether a `(` starts a function type is only known at the `=>` after
    /// its `)`. Outside speculation the function reading is attempted first
    /// and abandoned on failure; inside, a lookahead scan decides.
    fn parse_paren_type(&mut self) -> TypeAnnotation {
        let start = self.start();

        if self.speculating() {
            if self.after_matching_paren(0) == Some(TokenKind::Arrow) {
                return match self.parse_function_type(start) {
                    Some(ty) => ty,
                    None => self.type_error(),
                };
            }
            return self.parse_grouped_type();
        }

        if self.may_be_function_type() {
            if let Some(ty) = self.try_parse("function type", |p| p.parse_function_type(start)) {
                return ty;
            }
        }
        self.parse_grouped_type()
    }

    /// Tokens after `(` that only a parameter list could start with, or that
    /// could begin one.
    fn may_be_function_type(&self) -> bool {
        match self.peek_kind(1) {
            TokenKind::RParen => self.peek_kind(2) == TokenKind::Arrow,
            TokenKind::Ellipsis => true,
            TokenKind::Identifier => matches!(
                self.peek_kind(2),
                TokenKind::Colon | TokenKind::Question | TokenKind::Comma | TokenKind::RParen
            ),
            _ => false,
        }
    }

    /// The function reading of `( ... ) => R`, or `None` when the tokens do not fit it.
    fn parse_function_type(&mut self, start: BytePos) -> Option<TypeAnnotation> {
        self.advance();
        let params = self.parse_comma_list(TokenKind::RParen, "function type parameters", |p| {
            Some(p.parse_function_type_param())
        });
        if !self.eat(TokenKind::RParen) || !self.eat(TokenKind::Arrow) {
            return None;
        }
        let result = self.parse_type();
        Some(TypeAnnotation::new(
            TypeKind::Function {
                params,
                result: Box::new(result),
            },
            self.span_from(start),
        ))
    }

    fn parse_function_type_param(&mut self) -> FunctionTypeParam {
        let start = self.start();
        let rest = self.eat(TokenKind::Ellipsis);
        let name = self.parse_ident("a parameter name");
        let optional = self.eat(TokenKind::Question);
        let ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_type())
        } else {
            None
        };
        FunctionTypeParam {
            name,
            ty,
            optional,
            rest,
            span: self.span_from(start),
        }
    }

    fn parse_grouped_type(&mut self) -> TypeAnnotation {
        let start = self.start();
        let open = self.advance().span;
        let inner = self.parse_type();
        self.expect_closing(TokenKind::RParen, open, "this type");
        TypeAnnotation::new(TypeKind::Paren(Box::new(inner)), self.span_from(start))
    }

    /// `{ readonly a: T; b?: U, c: V }`; members end with `;`, `,` or a line break.
    fn parse_object_type(&mut self) -> TypeAnnotation {
        let start = self.start();
        let open = self.advance().span;
        let mut members = Vec::new();

        let mut guard = self.loop_guard("object type");
        while !self.check(TokenKind::RBrace) && !self.at_end() {
            if !self.step(&mut guard) {
                break;
            }
            match self.parse_type_member() {
                Some(member) => members.push(member),
                None => self.skip_list_item(),
            }

            if self.eat(TokenKind::Semicolon)
                || self.eat(TokenKind::Comma)
                || self.check(TokenKind::RBrace)
                || self.current().newline_before
            {
                continue;
            }
            self.unexpected(ErrorCode::UnexpectedToken, "`;` or `}` after the member");
            self.skip_list_item();
            if !self.eat(TokenKind::Semicolon) && !self.eat(TokenKind::Comma) {
                break;
            }
        }

        self.expect_closing(TokenKind::RBrace, open, "this object type");
        TypeAnnotation::new(TypeKind::Object(members), self.span_from(start))
    }

    fn parse_type_member(&mut self) -> Option<TypeMember> {
        let start = self.start();
        let readonly = self.check_word("readonly")
            && !matches!(
                self.peek_kind(1),
                TokenKind::Colon | TokenKind::Question | TokenKind::Semicolon | TokenKind::Comma
            )
            && !self.peek(1).newline_before;
        if readonly {
            self.advance();
        }

        let token = self.current();
        let name = if token.kind == TokenKind::String {
            self.advance();
            Ident::new(cook_string(token.text), token.span)
        } else if self.at_name() {
            self.parse_name("a member name")
        } else {
            self.unexpected(ErrorCode::ExpectedType, "a member name");
            return None;
        };

        let optional = self.eat(TokenKind::Question);
        let ty = if self.expect(TokenKind::Colon, "after the member name") {
            self.parse_type()
        } else {
            TypeAnnotation::unknown(self.missing_span())
        };
        Some(TypeMember {
            name,
            optional,
            readonly,
            ty,
            span: self.span_from(start),
        })
    }

    fn type_error(&mut self) -> TypeAnnotation {
        self.unexpected(ErrorCode::ExpectedType, "a type");
        let closes = matches!(
            self.current_kind(),
            TokenKind::Eq
                | TokenKind::Semicolon
                | TokenKind::RParen
                | TokenKind::Comma
                | TokenKind::RBrace
                | TokenKind::Gt
                | TokenKind::RBracket
                | TokenKind::Arrow
                | TokenKind::LBrace
                | TokenKind::Eof
        );
        if closes {
            return TypeAnnotation::unknown(self.missing_span());
        }
        let span = self.advance().span;
        TypeAnnotation::unknown(span)
    }

    // ========== Type Parameters ==========

    /// `<T, U extends V = W>`; empty when there is no `<`.
    pub(crate) fn parse_type_params(&mut self) -> Vec<TypeParam> {
        if !self.check(TokenKind::Lt) {
            return Vec::new();
        }
        let open = self.advance().span;
        let params = self.parse_comma_list(TokenKind::Gt, "type parameters", |p| {
            let start = p.start();
            let name = p.parse_ident("a type parameter name");
            let constraint = if p.eat_word("extends") {
                Some(p.parse_type())
            } else {
                None
            };
            let default = if p.eat(TokenKind::Eq) {
                Some(p.parse_type())
            } else {
                None
            };
            Some(TypeParam {
                name,
                constraint,
                default,
                span: p.span_from(start),
            })
        });
        self.expect_closing(TokenKind::Gt, open, "the type parameters");
        params
    }
}
