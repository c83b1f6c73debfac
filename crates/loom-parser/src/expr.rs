//! Expression parsing by precedence climbing.
//! 表达式解析（优先级爬升）。

use loom_common::{BytePos, Span};
use loom_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode, Label};
use loom_lexer::cook::is_bigint;
use loom_lexer::{TokenKind, cook_string, parse_number, unescape};
use loom_syntax::*;

use crate::parser::Parser;
use crate::recovery::DelimiterStack;

/// A binary-position operator.
#[derive(Debug, Clone, Copy)]
enum Infix {
    Binary(BinOp),
    Logical(LogicalOp),
    /// `expr as T`
    As,
}

/// `>` runs the lexer leaves split so type arguments can close one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShiftRun {
    Shr,
    UShr,
    ShrAssign,
    UShrAssign,
}

#[derive(Debug, Clone, Copy)]
enum Prefix {
    Unary(UnaryOp),
    Update(UpdateOp),
    Await,
}

/// Parameters and return type of an arrow function, up to and including `=>`.
struct ArrowHead {
    params: Vec<Param>,
    return_type: Option<TypeAnnotation>,
}

impl<'a, 'src> Parser<'a, 'src> {
    // ========== Expression Parsing ==========

    /// Parse an expression, comma operator included.
    pub(crate) fn parse_expression(&mut self) -> Expr {
        self.enter("expression");
        let first = self.parse_assignment();
        if !self.check(TokenKind::Comma) {
            self.exit("expression", first.span);
            return first;
        }

        let start = first.span.start;
        let mut exprs = vec![first];
        let mut guard = self.loop_guard("comma expression");
        while self.eat(TokenKind::Comma) {
            if !self.step(&mut guard) {
                break;
            }
            exprs.push(self.parse_assignment());
        }
        let span = self.span_from(start);
        self.exit("expression", span);
        Expr::new(ExprKind::Sequence(exprs), span)
    }

    /// Parse an assignment-level expression (no comma operator).
    pub(crate) fn parse_assignment(&mut self) -> Expr {
        self.nested("expression", |p| p.parse_assignment_inner(), Expr::error)
    }

    fn parse_assignment_inner(&mut self) -> Expr {
        if self.check(TokenKind::Yield) {
            return self.parse_yield();
        }
        if let Some(arrow) = self.try_arrow() {
            return arrow;
        }

        let target = self.parse_conditional();

        let (op, width) = match self.assignment_operator() {
            Some(found) => found,
            None => return target,
        };
        if !target.is_assignment_target() {
            self.error(
                ErrorCode::InvalidAssignmentTarget,
                target.span,
                "cannot assign to this expression",
            );
        }
        for _ in 0..width {
            self.advance();
        }
        let value = self.parse_assignment();
        let span = self.span_from(target.span.start);
        Expr::new(
            ExprKind::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            span,
        )
    }

    fn assignment_operator(&self) -> Option<(AssignOp, usize)> {
        let op = match self.current_kind() {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::Add,
            TokenKind::MinusEq => AssignOp::Sub,
            TokenKind::StarEq => AssignOp::Mul,
            TokenKind::SlashEq => AssignOp::Div,
            TokenKind::PercentEq => AssignOp::Mod,
            TokenKind::StarStarEq => AssignOp::Pow,
            TokenKind::ShlEq => AssignOp::Shl,
            TokenKind::AmpEq => AssignOp::BitAnd,
            TokenKind::PipeEq => AssignOp::BitOr,
            TokenKind::CaretEq => AssignOp::BitXor,
            TokenKind::AmpAmpEq => AssignOp::And,
            TokenKind::PipePipeEq => AssignOp::Or,
            TokenKind::QuestionQuestionEq => AssignOp::Coalesce,
            TokenKind::Gt => {
                return match self.shift_run() {
                    Some((ShiftRun::ShrAssign, width)) => Some((AssignOp::Shr, width)),
                    Some((ShiftRun::UShrAssign, width)) => Some((AssignOp::UShr, width)),
                    _ => None,
                };
            }
            _ => return None,
        };
        Some((op, 1))
    }

    /// Reassemble `>>`, `>>>`, `>>=` and `>>>=` from adjacent `>` tokens.
    fn shift_run(&self) -> Option<(ShiftRun, usize)> {
        if !self.check(TokenKind::Gt) {
            return None;
        }
        let adjacent = |n: usize| self.peek(n).span.start == self.peek(n - 1).span.end;
        match self.peek_kind(1) {
            TokenKind::Gt if adjacent(1) => match self.peek_kind(2) {
                TokenKind::Gt if adjacent(2) => Some((ShiftRun::UShr, 3)),
                TokenKind::GtEq if adjacent(2) => Some((ShiftRun::UShrAssign, 3)),
                _ => Some((ShiftRun::Shr, 2)),
            },
            TokenKind::GtEq if adjacent(1) => Some((ShiftRun::ShrAssign, 2)),
            _ => None,
        }
    }

    fn parse_conditional(&mut self) -> Expr {
        let test = self.parse_binary(0);
        if !self.check(TokenKind::Question) {
            return test;
        }
        self.advance();

        let consequent = self.allowing_in(|p| p.parse_assignment());
        self.expect(TokenKind::Colon, "in conditional expression");
        let alternate = self.parse_assignment();
        let span = self.span_from(test.span.start);
        Expr::new(
            ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            span,
        )
    }

    /// The operator at the cursor with its precedence and token count.
    fn binary_operator(&self) -> Option<(Infix, u8, usize)> {
        use Infix::{Binary, Logical};

        let found = match self.current_kind() {
            TokenKind::QuestionQuestion => (Logical(LogicalOp::Coalesce), 1, 1),
            TokenKind::PipePipe => (Logical(LogicalOp::Or), 2, 1),
            TokenKind::AmpAmp => (Logical(LogicalOp::And), 3, 1),
            TokenKind::Pipe => (Binary(BinOp::BitOr), 4, 1),
            TokenKind::Caret => (Binary(BinOp::BitXor), 5, 1),
            TokenKind::Amp => (Binary(BinOp::BitAnd), 6, 1),
            TokenKind::EqEq => (Binary(BinOp::Eq), 7, 1),
            TokenKind::BangEq => (Binary(BinOp::Ne), 7, 1),
            TokenKind::EqEqEq => (Binary(BinOp::StrictEq), 7, 1),
            TokenKind::BangEqEq => (Binary(BinOp::StrictNe), 7, 1),
            TokenKind::Lt => (Binary(BinOp::Lt), 8, 1),
            TokenKind::LtEq => (Binary(BinOp::Le), 8, 1),
            TokenKind::GtEq => (Binary(BinOp::Ge), 8, 1),
            TokenKind::Instanceof => (Binary(BinOp::Instanceof), 8, 1),
            TokenKind::In if self.allow_in => (Binary(BinOp::In), 8, 1),
            TokenKind::Identifier if self.check_word("as") && !self.current().newline_before => {
                (Infix::As, 8, 1)
            }
            TokenKind::Gt => match self.shift_run() {
                Some((ShiftRun::Shr, width)) => (Binary(BinOp::Shr), 9, width),
                Some((ShiftRun::UShr, width)) => (Binary(BinOp::UShr), 9, width),
                Some(_) => return None,
                None => (Binary(BinOp::Gt), 8, 1),
            },
            TokenKind::Shl => (Binary(BinOp::Shl), 9, 1),
            TokenKind::Plus => (Binary(BinOp::Add), 10, 1),
            TokenKind::Minus => (Binary(BinOp::Sub), 10, 1),
            TokenKind::Star => (Binary(BinOp::Mul), 11, 1),
            TokenKind::Slash => (Binary(BinOp::Div), 11, 1),
            TokenKind::Percent => (Binary(BinOp::Mod), 11, 1),
            TokenKind::StarStar => (Binary(BinOp::Pow), 12, 1),
            _ => return None,
        };
        Some(found)
    }

    /// Precedence climbing over binary operators binding at least `min_prec`.
    fn parse_binary(&mut self, min_prec: u8) -> Expr {
        let mut left = self.parse_unary();
        let mut guard = self.loop_guard("binary expression");

        while let Some((op, prec, width)) = self.binary_operator() {
            if prec < min_prec || !self.step(&mut guard) {
                break;
            }
            for _ in 0..width {
                self.advance();
            }

            let start = left.span.start;
            if let Infix::As = op {
                let ty = self.parse_as_type();
                left = Expr::new(
                    ExprKind::As {
                        expr: Box::new(left),
                        ty,
                    },
                    self.span_from(start),
                );
                continue;
            }

            // `**` is right-associative
            let next = if matches!(op, Infix::Binary(BinOp::Pow)) {
                prec
            } else {
                prec + 1
            };
            let right = self.nested("expression", |p| p.parse_binary(next), Expr::error);
            let span = self.span_from(start);
            let kind = match op {
                Infix::Binary(op) => ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                Infix::Logical(op) => ExprKind::Logical {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                Infix::As => ExprKind::Error,
            };
            left = Expr::new(kind, span);
        }

        left
    }

    /// The type after `as`; `as const` is kept as a reference to `const`.
    fn parse_as_type(&mut self) -> TypeAnnotation {
        if self.check(TokenKind::Const) {
            let token = self.advance();
            return TypeAnnotation::new(
                TypeKind::Reference {
                    name: vec![Ident::new(token.text, token.span)],
                    args: Vec::new(),
                },
                token.span,
            );
        }
        self.parse_type()
    }

    /// Prefix operators are collected in a loop, so long chains do not recurse.
    fn parse_unary(&mut self) -> Expr {
        let mut prefixes: Vec<(Prefix, Span)> = Vec::new();
        let mut guard = self.loop_guard("prefix operators");
        loop {
            let prefix = match self.current_kind() {
                TokenKind::Bang => Prefix::Unary(UnaryOp::Not),
                TokenKind::Tilde => Prefix::Unary(UnaryOp::BitNot),
                TokenKind::Plus => Prefix::Unary(UnaryOp::Plus),
                TokenKind::Minus => Prefix::Unary(UnaryOp::Neg),
                TokenKind::Typeof => Prefix::Unary(UnaryOp::Typeof),
                TokenKind::Void => Prefix::Unary(UnaryOp::Void),
                TokenKind::Delete => Prefix::Unary(UnaryOp::Delete),
                TokenKind::PlusPlus => Prefix::Update(UpdateOp::Increment),
                TokenKind::MinusMinus => Prefix::Update(UpdateOp::Decrement),
                TokenKind::Await => Prefix::Await,
                _ => break,
            };
            if !self.step(&mut guard) {
                break;
            }
            let span = self.advance().span;
            if let Prefix::Await = prefix {
                self.unsupported(span, "await");
            }
            prefixes.push((prefix, span));
        }

        let mut expr = self.parse_postfix();
        for (prefix, op_span) in prefixes.into_iter().rev() {
            let span = self.span_from(op_span.start);
            let operand = Box::new(expr);
            let kind = match prefix {
                Prefix::Unary(op) => ExprKind::Unary { op, operand },
                Prefix::Update(op) => {
                    self.check_update_target(&operand);
                    ExprKind::Update {
                        op,
                        prefix: true,
                        operand,
                    }
                }
                Prefix::Await => ExprKind::Unsupported {
                    construct: UnsupportedConstruct::Await,
                    argument: Some(operand),
                },
            };
            expr = Expr::new(kind, span);
        }
        expr
    }

    fn check_update_target(&mut self, operand: &Expr) {
        if !operand.is_assignment_target() {
            self.error(
                ErrorCode::InvalidAssignmentTarget,
                operand.span,
                "the operand of `++`/`--` must be assignable",
            );
        }
    }

    fn parse_postfix(&mut self) -> Expr {
        let expr = self.parse_call_member();
        let op = match self.current_kind() {
            TokenKind::PlusPlus => UpdateOp::Increment,
            TokenKind::MinusMinus => UpdateOp::Decrement,
            _ => return expr,
        };
        if self.current().newline_before {
            return expr;
        }

        self.check_update_target(&expr);
        self.advance();
        let span = self.span_from(expr.span.start);
        Expr::new(
            ExprKind::Update {
                op,
                prefix: false,
                operand: Box::new(expr),
            },
            span,
        )
    }

    /// Primary expression followed by member accesses, calls, tagged
    /// templates and non-null assertions.
    fn parse_call_member(&mut self) -> Expr {
        let mut expr = if self.check(TokenKind::New) {
            self.parse_new()
        } else {
            self.parse_primary()
        };
        let start = expr.span.start;

        let mut guard = self.loop_guard("member chain");
        loop {
            let kind = self.current_kind();
            let chained = match kind {
                TokenKind::Dot
                | TokenKind::QuestionDot
                | TokenKind::LBracket
                | TokenKind::LParen
                | TokenKind::TemplateStart => true,
                TokenKind::Bang => !self.current().newline_before,
                _ => false,
            };
            if !chained || !self.step(&mut guard) {
                break;
            }

            let object = Box::new(expr);
            let kind = match kind {
                TokenKind::Dot => {
                    self.advance();
                    let property = self.parse_name("a property name");
                    ExprKind::Member {
                        object,
                        property: MemberProperty::Ident(property),
                        optional: false,
                    }
                }
                TokenKind::QuestionDot => {
                    self.advance();
                    match self.current_kind() {
                        TokenKind::LParen => ExprKind::Call {
                            callee: object,
                            args: self.parse_arguments(),
                            optional: true,
                        },
                        TokenKind::LBracket => ExprKind::Member {
                            object,
                            property: MemberProperty::Computed(Box::new(self.parse_computed())),
                            optional: true,
                        },
                        _ => ExprKind::Member {
                            object,
                            property: MemberProperty::Ident(self.parse_name("a property name")),
                            optional: true,
                        },
                    }
                }
                TokenKind::LBracket => ExprKind::Member {
                    object,
                    property: MemberProperty::Computed(Box::new(self.parse_computed())),
                    optional: false,
                },
                TokenKind::LParen => ExprKind::Call {
                    callee: object,
                    args: self.parse_arguments(),
                    optional: false,
                },
                TokenKind::TemplateStart => ExprKind::TaggedTemplate {
                    tag: object,
                    quasi: self.parse_template(),
                },
                _ => {
                    self.advance();
                    ExprKind::NonNull(object)
                }
            };
            expr = Expr::new(kind, self.span_from(start));
        }

        expr
    }

    /// `[expr]` after an object.
    fn parse_computed(&mut self) -> Expr {
        let open = self.advance().span;
        let property = self.allowing_in(|p| p.parse_expression());
        self.expect_closing(TokenKind::RBracket, open, "this index");
        property
    }

    pub(crate) fn parse_arguments(&mut self) -> Vec<Argument> {
        let open = self.advance().span;
        let args = self.allowing_in(|p| {
            p.parse_comma_list(TokenKind::RParen, "arguments", |p| {
                if p.eat(TokenKind::Ellipsis) {
                    Some(Argument::Spread(p.parse_assignment()))
                } else {
                    Some(Argument::Expr(p.parse_assignment()))
                }
            })
        });
        self.expect_closing(TokenKind::RParen, open, "the argument list");
        args
    }

    /// `new Callee(args)`; the callee takes member accesses but not calls.
    fn parse_new(&mut self) -> Expr {
        let start = self.start();
        self.advance();

        let mut callee = if self.check(TokenKind::New) {
            self.nested("expression", |p| p.parse_new(), Expr::error)
        } else {
            self.parse_primary()
        };

        let mut guard = self.loop_guard("member chain");
        while matches!(self.current_kind(), TokenKind::Dot | TokenKind::LBracket) {
            if !self.step(&mut guard) {
                break;
            }
            let object = Box::new(callee);
            let property = if self.eat(TokenKind::Dot) {
                MemberProperty::Ident(self.parse_name("a property name"))
            } else {
                MemberProperty::Computed(Box::new(self.parse_computed()))
            };
            let span = self.span_from(object.span.start);
            callee = Expr::new(
                ExprKind::Member {
                    object,
                    property,
                    optional: false,
                },
                span,
            );
        }

        let args = if self.check(TokenKind::LParen) {
            Some(self.parse_arguments())
        } else {
            None
        };
        Expr::new(
            ExprKind::New {
                callee: Box::new(callee),
                args,
            },
            self.span_from(start),
        )
    }

    fn parse_primary(&mut self) -> Expr {
        let token = self.current();
        let kind = match token.kind {
            TokenKind::Identifier => {
                self.advance();
                ExprKind::Ident(Ident::new(token.text, token.span))
            }
            TokenKind::Number => {
                self.advance();
                if is_bigint(token.text) {
                    let digits = token.text.strip_suffix('n').unwrap_or(token.text);
                    ExprKind::Literal(Literal::BigInt(digits.replace('_', "")))
                } else {
                    ExprKind::Literal(Literal::Number(parse_number(token.text)))
                }
            }
            TokenKind::String => {
                self.advance();
                ExprKind::Literal(Literal::String(cook_string(token.text)))
            }
            TokenKind::Regex => {
                self.advance();
                let (pattern, flags) = split_regex(token.text);
                ExprKind::Regex {
                    pattern: pattern.to_string(),
                    flags: flags.to_string(),
                }
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                ExprKind::Literal(Literal::Bool(token.kind == TokenKind::True))
            }
            TokenKind::Null => {
                self.advance();
                ExprKind::Literal(Literal::Null)
            }
            TokenKind::This => {
                self.advance();
                ExprKind::This
            }
            TokenKind::TemplateStart => ExprKind::Template(self.parse_template()),
            TokenKind::LParen => return self.parse_paren(),
            TokenKind::LBracket => return self.parse_array(),
            TokenKind::LBrace => return self.parse_object(),
            TokenKind::Function => {
                let function = self.parse_function(token.span.start, false, false);
                ExprKind::Function(Box::new(function))
            }
            TokenKind::Async if self.peek_kind(1) == TokenKind::Function => {
                self.advance();
                self.unsupported(token.span, "async function");
                let function = self.parse_function(token.span.start, true, false);
                ExprKind::Function(Box::new(function))
            }
            // `async` on its own is an ordinary name.
            TokenKind::Async => {
                self.advance();
                ExprKind::Ident(Ident::new(token.text, token.span))
            }
            TokenKind::Yield => return self.parse_yield(),
            TokenKind::MarkupOpen => return self.parse_markup(),
            TokenKind::MarkupCloseOpen => return self.parse_stray_closing_tag(),
            TokenKind::Error => {
                // Already reported by the lexer.
                self.advance();
                return Expr::error(token.span);
            }
            _ => {
                self.unexpected(ErrorCode::ExpectedExpression, "an expression");
                return Expr::error(self.missing_span());
            }
        };
        Expr::new(kind, self.span_from(token.span.start))
    }

    fn parse_paren(&mut self) -> Expr {
        let start = self.start();
        let open = self.advance().span;
        if self.check(TokenKind::RParen) {
            self.error_here(
                ErrorCode::ExpectedExpression,
                "expected an expression inside `()`, or `=>` after it",
            );
            self.advance();
            return Expr::error(self.span_from(start));
        }

        let inner = self.allowing_in(|p| p.parse_expression());
        self.expect_closing(TokenKind::RParen, open, "this parenthesis");
        Expr::new(ExprKind::Paren(Box::new(inner)), self.span_from(start))
    }

    fn parse_array(&mut self) -> Expr {
        let start = self.start();
        let open = self.advance().span;

        let elements = self.allowing_in(|p| {
            let mut elements = Vec::new();
            let mut guard = p.loop_guard("array elements");
            while !p.check(TokenKind::RBracket) && !p.at_end() {
                if !p.step(&mut guard) {
                    break;
                }
                if p.eat(TokenKind::Comma) {
                    elements.push(None);
                    continue;
                }
                let element = if p.eat(TokenKind::Ellipsis) {
                    ArrayElement::Spread(p.parse_assignment())
                } else {
                    ArrayElement::Expr(p.parse_assignment())
                };
                elements.push(Some(element));
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            elements
        });

        self.expect_closing(TokenKind::RBracket, open, "this array");
        Expr::new(ExprKind::Array(elements), self.span_from(start))
    }

    fn parse_object(&mut self) -> Expr {
        let start = self.start();
        let open = self.advance().span;
        let properties = self.allowing_in(|p| {
            p.parse_comma_list(TokenKind::RBrace, "object properties", |p| p.parse_property())
        });
        self.expect_closing(TokenKind::RBrace, open, "this object");
        Expr::new(ExprKind::Object(properties), self.span_from(start))
    }

    fn parse_property(&mut self) -> Option<Property> {
        let start = self.start();
        if self.eat(TokenKind::Ellipsis) {
            let argument = self.parse_assignment();
            return Some(Property {
                kind: PropertyKind::Spread(argument),
                span: self.span_from(start),
            });
        }

        let mut kind = MethodKind::Method;
        let mut is_async = false;
        if (self.check_word("get") || self.check_word("set")) && self.at_key_after_modifier() {
            kind = if self.check_word("get") {
                MethodKind::Get
            } else {
                MethodKind::Set
            };
            self.advance();
        } else if self.check(TokenKind::Async) && self.at_key_after_modifier() {
            let span = self.advance().span;
            self.unsupported(span, "async");
            is_async = true;
        }
        let is_generator = self.check(TokenKind::Star);
        if is_generator {
            let span = self.advance().span;
            self.unsupported(span, "*");
        }

        let key = self.parse_property_key()?;

        let is_method = kind != MethodKind::Method
            || is_async
            || is_generator
            || matches!(self.current_kind(), TokenKind::LParen | TokenKind::Lt);
        if is_method {
            let type_params = self.parse_type_params();
            let params = self.parse_params();
            let return_type = self.parse_return_type();
            let body = self.parse_block();
            let function = Function {
                name: None,
                type_params,
                params,
                return_type,
                body,
                is_async,
                is_generator,
                span: self.span_from(start),
            };
            return Some(Property {
                kind: PropertyKind::Method {
                    key,
                    kind,
                    function: Box::new(function),
                },
                span: self.span_from(start),
            });
        }

        let kind = if self.eat(TokenKind::Colon) {
            PropertyKind::KeyValue {
                key,
                value: self.parse_assignment(),
            }
        } else {
            match key {
                PropertyKey::Ident(ident) if !ident.is_missing() => PropertyKind::Shorthand(ident),
                key => {
                    self.unexpected(ErrorCode::UnexpectedToken, "`:` after the property name");
                    PropertyKind::KeyValue {
                        key,
                        value: Expr::error(self.missing_span()),
                    }
                }
            }
        };
        Some(Property {
            kind,
            span: self.span_from(start),
        })
    }

    /// After `get`, `set` or `async`: is the next token a key, making the word a modifier?
    fn at_key_after_modifier(&self) -> bool {
        let next = self.peek(1);
        !next.newline_before
            && (matches!(
                next.kind,
                TokenKind::Identifier
                    | TokenKind::String
                    | TokenKind::Number
                    | TokenKind::LBracket
                    | TokenKind::Star
            ) || next.kind.is_keyword())
    }

    pub(crate) fn parse_property_key(&mut self) -> Option<PropertyKey> {
        let token = self.current();
        match token.kind {
            TokenKind::String => {
                self.advance();
                Some(PropertyKey::String {
                    value: cook_string(token.text),
                    span: token.span,
                })
            }
            TokenKind::Number => {
                self.advance();
                Some(PropertyKey::Number {
                    value: parse_number(token.text),
                    span: token.span,
                })
            }
            TokenKind::LBracket => Some(PropertyKey::Computed(Box::new(self.parse_computed()))),
            _ if self.at_name() => Some(PropertyKey::Ident(self.parse_name("a property name"))),
            _ => {
                self.unexpected(ErrorCode::UnexpectedToken, "a property name");
                None
            }
        }
    }

    /// `` `text ${expr} text` ``; the cursor is on the opening backtick.
    pub(crate) fn parse_template(&mut self) -> Template {
        let start = self.start();
        self.advance();

        let mut quasis: Vec<TemplateQuasi> = Vec::new();
        let mut exprs = Vec::new();
        // A quasi is owed before the next interpolation or the closing backtick.
        let mut owed = true;
        let mut guard = self.loop_guard("template literal");

        loop {
            if !self.step(&mut guard) {
                break;
            }
            let token = self.current();
            match token.kind {
                TokenKind::TemplateChunk => {
                    self.advance();
                    match quasis.last_mut() {
                        Some(last) if !owed => {
                            last.raw.push_str(token.text);
                            last.cooked = unescape(&last.raw);
                            last.span = last.span.merge(token.span);
                        }
                        _ => quasis.push(TemplateQuasi {
                            raw: token.text.to_string(),
                            cooked: unescape(token.text),
                            span: token.span,
                        }),
                    }
                    owed = false;
                }
                TokenKind::TemplateExprStart => {
                    if owed {
                        quasis.push(empty_quasi(token.span.start));
                    }
                    let open = self.advance().span;
                    let expr = self.in_code(|p| p.parse_expression());
                    exprs.push(expr);
                    if !self.eat(TokenKind::TemplateExprEnd) {
                        self.diagnostics.report(
                            Diagnostic::error(
                                ErrorCode::UnclosedDelimiter,
                                self.current_span(),
                                format!("expected `}}` to close the interpolation, found {}", self.found()),
                            )
                            .with_label(Label::new(open, "interpolation opened here")),
                        );
                        self.skip_to_interpolation_end();
                    }
                    owed = true;
                }
                TokenKind::TemplateEnd => {
                    if owed {
                        quasis.push(empty_quasi(token.span.start));
                    }
                    self.advance();
                    owed = false;
                    break;
                }
                // Unterminated; the lexer has reported it.
                _ => break,
            }
        }

        if owed {
            quasis.push(empty_quasi(self.prev_end));
        }
        debug_assert_eq!(quasis.len(), exprs.len() + 1);
        Template {
            quasis,
            exprs,
            span: self.span_from(start),
        }
    }

    fn skip_to_interpolation_end(&mut self) {
        let mut delimiters = DelimiterStack::new();
        while !self.at_end() {
            let kind = self.current_kind();
            if delimiters.is_empty() {
                if kind == TokenKind::TemplateExprEnd {
                    self.advance();
                    return;
                }
                if kind == TokenKind::TemplateEnd {
                    return;
                }
            }
            delimiters.update(kind);
            self.advance();
        }
    }

    fn parse_yield(&mut self) -> Expr {
        let start = self.start();
        self.advance();
        let delegate = self.eat(TokenKind::Star);
        let span = self.span_from(start);
        self.unsupported(span, if delegate { "yield*" } else { "yield" });

        let ends_here = self.at_stmt_end()
            || self.current().newline_before
            || matches!(
                self.current_kind(),
                TokenKind::RParen
                    | TokenKind::RBracket
                    | TokenKind::Comma
                    | TokenKind::Colon
                    | TokenKind::TemplateExprEnd
            );
        let argument = if delegate || !ends_here {
            Some(Box::new(self.parse_assignment()))
        } else {
            None
        };

        let construct = if delegate {
            UnsupportedConstruct::YieldDelegate
        } else {
            UnsupportedConstruct::Yield
        };
        Expr::new(
            ExprKind::Unsupported {
                construct,
                argument,
            },
            self.span_from(start),
        )
    }

    // ========== Arrow Functions ==========

    /// An arrow function at the cursor, if lookahead says there is one.
    fn try_arrow(&mut self) -> Option<Expr> {
        let start = self.start();
        match self.current_kind() {
            TokenKind::Identifier if self.at_arrow_after(1) => Some(self.parse_ident_arrow(start, false)),
            TokenKind::LParen => self.parse_paren_arrow(start, false, 0),
            TokenKind::Async => {
                let is_arrow = match self.peek_kind(1) {
                    TokenKind::Identifier => self.at_arrow_after(2),
                    TokenKind::LParen => matches!(
                        self.after_matching_paren(1),
                        Some(TokenKind::Arrow | TokenKind::Colon)
                    ),
                    _ => false,
                };
                if !is_arrow || self.peek(1).newline_before {
                    return None;
                }
                let keyword = self.current_span();
                if self.peek_kind(1) == TokenKind::Identifier {
                    self.advance();
                    self.unsupported(keyword, "async");
                    return Some(self.parse_ident_arrow(start, true));
                }
                let arrow = self.parse_paren_arrow(start, true, 1);
                if arrow.is_some() {
                    self.unsupported(keyword, "async");
                }
                arrow
            }
            _ => None,
        }
    }

    fn at_arrow_after(&self, offset: usize) -> bool {
        let arrow = self.peek(offset);
        arrow.kind == TokenKind::Arrow && !arrow.newline_before
    }

    /// `x => body`.
    fn parse_ident_arrow(&mut self, start: BytePos, is_async: bool) -> Expr {
        let name = self.parse_ident("a parameter name");
        let param = Param {
            pattern: Pattern::new(PatternKind::Ident(name.clone()), name.span),
            ty: None,
            default: None,
            rest: false,
            optional: false,
            span: name.span,
        };
        self.advance();
        let head = ArrowHead {
            params: vec![param],
            return_type: None,
        };
        self.finish_arrow(start, head, is_async)
    }

    /// `(params) => body` or `(params): T => body`, with the `(` `offset`
    /// tokens ahead (after `async`). `None` when this is not an arrow.
    fn parse_paren_arrow(&mut self, start: BytePos, is_async: bool, offset: usize) -> Option<Expr> {
        match self.after_matching_paren(offset) {
            Some(TokenKind::Arrow) => {
                if offset > 0 {
                    self.advance();
                }
                let params = self.parse_params();
                self.expect(TokenKind::Arrow, "before the arrow function body");
                let head = ArrowHead {
                    params,
                    return_type: None,
                };
                Some(self.finish_arrow(start, head, is_async))
            }
            // `(a): T => a` or `c ? (a) : b`; only a full parse can tell.
            Some(TokenKind::Colon) if !self.speculating() => {
                let head = self.try_parse("arrow function", |p| {
                    if offset > 0 {
                        p.advance();
                    }
                    let params = p.parse_params();
                    if !p.eat(TokenKind::Colon) {
                        return None;
                    }
                    let return_type = p.parse_type();
                    if !p.eat(TokenKind::Arrow) {
                        return None;
                    }
                    Some(ArrowHead {
                        params,
                        return_type: Some(return_type),
                    })
                })?;
                Some(self.finish_arrow(start, head, is_async))
            }
            _ => None,
        }
    }

    fn finish_arrow(&mut self, start: BytePos, head: ArrowHead, is_async: bool) -> Expr {
        let body = if self.check(TokenKind::LBrace) {
            ArrowBody::Block(self.parse_block())
        } else {
            ArrowBody::Expr(Box::new(self.parse_assignment()))
        };
        let span = self.span_from(start);
        Expr::new(
            ExprKind::Arrow(Box::new(ArrowFunction {
                type_params: Vec::new(),
                params: head.params,
                return_type: head.return_type,
                body,
                is_async,
                span,
            })),
            span,
        )
    }

    // ========== Context ==========

    pub(crate) fn allowing_in<T>(&mut self, parse: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.allow_in, true);
        let result = parse(self);
        self.allow_in = saved;
        result
    }

    pub(crate) fn without_in<T>(&mut self, parse: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.allow_in, false);
        let result = parse(self);
        self.allow_in = saved;
        result
    }

    /// Code embedded in markup or a template: enclosing elements are out of
    /// reach of any closing tag found inside.
    pub(crate) fn in_code<T>(&mut self, parse: impl FnOnce(&mut Self) -> T) -> T {
        let open_tags = std::mem::take(&mut self.open_tags);
        let result = self.allowing_in(parse);
        self.open_tags = open_tags;
        result
    }
}

fn empty_quasi(at: BytePos) -> TemplateQuasi {
    TemplateQuasi {
        raw: String::new(),
        cooked: String::new(),
        span: Span::empty(at),
    }
}

/// `/body/flags` into its body and flags.
fn split_regex(text: &str) -> (&str, &str) {
    match text.rfind('/') {
        Some(end) if end > 0 => (
            text.get(1..end).unwrap_or_default(),
            text.get(end + 1..).unwrap_or_default(),
        ),
        _ => (text.get(1..).unwrap_or_default(), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use pretty_assertions::assert_eq;

    fn expr(source: &str) -> Expr {
        let (program, diagnostics) = parse(source);
        assert!(diagnostics.is_empty(), "{source}: {diagnostics:#?}");
        match program.body.into_iter().next().map(|s| s.kind) {
            Some(StmtKind::Expr(expr)) => expr,
            other => panic!("expected an expression statement, got {other:#?}"),
        }
    }

    fn binary_op(expr: &Expr) -> Option<BinOp> {
        match &expr.kind {
            ExprKind::Binary { op, .. } => Some(*op),
            _ => None,
        }
    }

    #[test]
    fn precedence() {
        let e = expr("a + b * c");
        let ExprKind::Binary { op, right, .. } = &e.kind else {
            panic!("expected a binary expression");
        };
        assert_eq!(*op, BinOp::Add);
        assert_eq!(binary_op(right), Some(BinOp::Mul));
    }

    #[test]
    fn exponent_is_right_associative() {
        let e = expr("a ** b ** c");
        let ExprKind::Binary { left, right, .. } = &e.kind else {
            panic!("expected a binary expression");
        };
        assert!(matches!(left.kind, ExprKind::Ident(_)));
        assert_eq!(binary_op(right), Some(BinOp::Pow));
    }

    #[test]
    fn less_than_is_a_comparison() {
        assert_eq!(binary_op(&expr("a < b")), Some(BinOp::Lt));
    }

    #[test]
    fn shifts_are_reassembled() {
        assert_eq!(binary_op(&expr("a >> b")), Some(BinOp::Shr));
        assert_eq!(binary_op(&expr("a >>> b")), Some(BinOp::UShr));
        assert_eq!(binary_op(&expr("a >= b")), Some(BinOp::Ge));
        assert!(matches!(
            expr("a >>>= 2").kind,
            ExprKind::Assign { op: AssignOp::UShr, .. }
        ));
    }

    #[test]
    fn logical_and_coalesce() {
        assert!(matches!(
            expr("a ?? b || c").kind,
            ExprKind::Logical { op: LogicalOp::Coalesce, .. }
        ));
        assert!(matches!(
            expr("x ||= y").kind,
            ExprKind::Assign { op: AssignOp::Or, .. }
        ));
    }

    #[test]
    fn arrows() {
        assert!(matches!(expr("x => x + 1").kind, ExprKind::Arrow(_)));
        let ExprKind::Arrow(arrow) = expr("(a, b: number = 1) => { return a; }").kind else {
            panic!("expected an arrow");
        };
        assert_eq!(arrow.params.len(), 2);
        assert!(matches!(arrow.body, ArrowBody::Block(_)));

        let ExprKind::Arrow(arrow) = expr("(a): string => a").kind else {
            panic!("expected an arrow");
        };
        assert!(arrow.return_type.is_some());
    }

    #[test]
    fn conditional_with_parenthesised_branch_is_not_an_arrow() {
        let e = expr("c ? (a) : b");
        let ExprKind::Conditional { consequent, .. } = &e.kind else {
            panic!("expected a conditional");
        };
        assert!(matches!(consequent.kind, ExprKind::Paren(_)));
    }

    #[test]
    fn member_chains_and_calls() {
        let e = expr("a?.b[c](d, ...e)!.f`t`");
        assert!(matches!(e.kind, ExprKind::TaggedTemplate { .. }));
        let e = expr("new Foo.Bar(1)");
        let ExprKind::New { callee, args } = &e.kind else {
            panic!("expected new");
        };
        assert!(matches!(callee.kind, ExprKind::Member { .. }));
        assert_eq!(args.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn object_literal_forms() {
        let e = expr("({ a, b: 1, [c]: 2, 'd': 3, m() {}, get g() { return 1; }, ...rest })");
        let ExprKind::Paren(inner) = &e.kind else {
            panic!("expected parentheses");
        };
        let ExprKind::Object(properties) = &inner.kind else {
            panic!("expected an object");
        };
        assert_eq!(properties.len(), 7);
        assert!(matches!(properties[0].kind, PropertyKind::Shorthand(_)));
        assert!(matches!(
            properties[5].kind,
            PropertyKind::Method { kind: MethodKind::Get, .. }
        ));
        assert!(matches!(properties[6].kind, PropertyKind::Spread(_)));
    }

    #[test]
    fn array_holes() {
        let ExprKind::Array(elements) = expr("[a, , ...b]").kind else {
            panic!("expected an array");
        };
        assert_eq!(elements.len(), 3);
        assert!(elements[1].is_none());
        assert!(matches!(elements[2], Some(ArrayElement::Spread(_))));
    }

    #[test]
    fn nested_templates() {
        let ExprKind::Template(outer) = expr("`a${ `b${c}` }d`").kind else {
            panic!("expected a template");
        };
        assert_eq!(outer.quasis.len(), 2);
        assert_eq!(outer.quasis[0].raw, "a");
        assert_eq!(outer.quasis[1].raw, "d");
        assert_eq!(outer.exprs.len(), 1);
        let ExprKind::Template(inner) = &outer.exprs[0].kind else {
            panic!("expected a nested template");
        };
        assert_eq!(inner.quasis.len(), 2);
        assert_eq!(inner.quasis[0].raw, "b");
        assert_eq!(inner.quasis[1].raw, "");
    }

    #[test]
    fn literals() {
        assert!(matches!(expr("0x1F").kind, ExprKind::Literal(Literal::Number(n)) if n == 31.0));
        assert!(matches!(expr("1_000n").kind, ExprKind::Literal(Literal::BigInt(ref d)) if d == "1000"));
        assert!(matches!(expr("'a\\tb'").kind, ExprKind::Literal(Literal::String(ref s)) if s == "a\tb"));
        let ExprKind::Regex { pattern, flags } = expr("/ab+c/gi").kind else {
            panic!("expected a regex");
        };
        assert_eq!((pattern.as_str(), flags.as_str()), ("ab+c", "gi"));
    }

    #[test]
    fn type_assertions() {
        let ExprKind::As { ty, .. } = expr("value as string[]").kind else {
            panic!("expected `as`");
        };
        assert!(matches!(ty.kind, TypeKind::Array(_)));
        assert!(matches!(expr("x!").kind, ExprKind::NonNull(_)));
    }

    #[test]
    fn invalid_assignment_target() {
        let (_, diagnostics) = parse("a + b = c;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::InvalidAssignmentTarget);
    }

    #[test]
    fn await_is_parsed_and_reported() {
        let (program, diagnostics) = parse("const x = await load();");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::UnsupportedConstruct);
        let StmtKind::VarDecl(decl) = &program.body[0].kind else {
            panic!("expected a declaration");
        };
        let init = decl.declarators[0].init.as_ref().map(|e| &e.kind);
        assert!(matches!(
            init,
            Some(ExprKind::Unsupported { construct: UnsupportedConstruct::Await, argument: Some(_) })
        ));
    }

    #[test]
    fn async_arrow_is_reported_once() {
        let (program, diagnostics) = parse("const f = async (x) => x;");
        assert_eq!(diagnostics.len(), 1);
        let StmtKind::VarDecl(decl) = &program.body[0].kind else {
            panic!("expected a declaration");
        };
        let init = decl.declarators[0].init.as_ref().map(|e| &e.kind);
        assert!(matches!(init, Some(ExprKind::Arrow(arrow)) if arrow.is_async));
    }

    #[test]
    fn regex_split() {
        assert_eq!(split_regex("/a\\/b/g"), ("a\\/b", "g"));
        assert_eq!(split_regex("/unterminated"), ("unterminated", ""));
    }
}
