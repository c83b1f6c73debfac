//! Binding patterns for declarations, parameters and `catch`.

use loom_diagnostic::ErrorCode;
use loom_lexer::TokenKind;
use loom_syntax::*;

use crate::parser::Parser;

impl<'a, 'src> Parser<'a, 'src> {
    /// A binding target: a name, or an array or object destructuring pattern.
    pub(crate) fn parse_binding_target(&mut self) -> Pattern {
        self.nested(
            "pattern",
            |p| match p.current_kind() {
                TokenKind::Identifier => {
                    let ident = p.parse_ident("a binding name");
                    let span = ident.span;
                    Pattern::new(PatternKind::Ident(ident), span)
                }
                TokenKind::LBracket => p.parse_array_pattern(),
                TokenKind::LBrace => p.parse_object_pattern(),
                _ => p.pattern_error(),
            },
            |span| Pattern::new(PatternKind::Error, span),
        )
    }

    /// A binding target with an optional `= default`.
    fn parse_binding_element(&mut self) -> Pattern {
        let target = self.parse_binding_target();
        if !self.eat(TokenKind::Eq) {
            return target;
        }
        let default = self.parse_assignment();
        let span = self.span_from(target.span.start);
        Pattern::new(
            PatternKind::Assign {
                target: Box::new(target),
                default: Box::new(default),
            },
            span,
        )
    }

    fn pattern_error(&mut self) -> Pattern {
        self.unexpected(ErrorCode::ExpectedPattern, "a binding pattern");
        let closes = matches!(
            self.current_kind(),
            TokenKind::Eq
                | TokenKind::Semicolon
                | TokenKind::RParen
                | TokenKind::Comma
                | TokenKind::RBrace
                | TokenKind::RBracket
                | TokenKind::Gt
                | TokenKind::Arrow
                | TokenKind::Eof
        );
        if closes {
            return Pattern::new(PatternKind::Error, self.missing_span());
        }
        let span = self.advance().span;
        Pattern::new(PatternKind::Error, span)
    }

    /// `[a, , b = 1, ...rest]`
    fn parse_array_pattern(&mut self) -> Pattern {
        let start = self.start();
        let open = self.advance().span;
        let mut elements = Vec::new();
        let mut rest = None;

        let mut guard = self.loop_guard("array pattern");
        while !self.check(TokenKind::RBracket) && !self.at_end() {
            if !self.step(&mut guard) {
                break;
            }
            if self.eat(TokenKind::Comma) {
                elements.push(None);
                continue;
            }
            if self.check(TokenKind::Ellipsis) {
                rest = Some(Box::new(self.parse_rest_pattern()));
                break;
            }
            elements.push(Some(self.parse_binding_element()));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        self.expect_closing(TokenKind::RBracket, open, "this array pattern");
        Pattern::new(PatternKind::Array { elements, rest }, self.span_from(start))
    }

    /// `{ a, b: c, d = 1, ...rest }`
    fn parse_object_pattern(&mut self) -> Pattern {
        let start = self.start();
        let open = self.advance().span;
        let mut properties = Vec::new();
        let mut rest = None;

        let mut guard = self.loop_guard("object pattern");
        while !self.check(TokenKind::RBrace) && !self.at_end() {
            if !self.step(&mut guard) {
                break;
            }
            if self.check(TokenKind::Ellipsis) {
                rest = Some(Box::new(self.parse_rest_pattern()));
                break;
            }
            match self.parse_object_pattern_property() {
                Some(property) => properties.push(property),
                None => self.skip_list_item(),
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        self.expect_closing(TokenKind::RBrace, open, "this object pattern");
        Pattern::new(
            PatternKind::Object { properties, rest },
            self.span_from(start),
        )
    }

    fn parse_object_pattern_property(&mut self) -> Option<ObjectPatternProperty> {
        let start = self.start();
        let key = self.parse_property_key()?;

        if self.eat(TokenKind::Colon) {
            let value = self.parse_binding_element();
            return Some(ObjectPatternProperty {
                key,
                value,
                shorthand: false,
                span: self.span_from(start),
            });
        }

        let ident = match key {
            PropertyKey::Ident(ident) => ident,
            key => {
                self.unexpected(ErrorCode::ExpectedPattern, "`:` after the property name");
                return Some(ObjectPatternProperty {
                    key,
                    value: Pattern::new(PatternKind::Error, self.missing_span()),
                    shorthand: false,
                    span: self.span_from(start),
                });
            }
        };

        let binding = Pattern::new(PatternKind::Ident(ident.clone()), ident.span);
        let value = if self.eat(TokenKind::Eq) {
            let default = self.parse_assignment();
            Pattern::new(
                PatternKind::Assign {
                    target: Box::new(binding),
                    default: Box::new(default),
                },
                self.span_from(start),
            )
        } else {
            binding
        };
        Some(ObjectPatternProperty {
            key: PropertyKey::Ident(ident),
            value,
            shorthand: true,
            span: self.span_from(start),
        })
    }

    /// `...target`, which must end the pattern.
    fn parse_rest_pattern(&mut self) -> Pattern {
        self.advance();
        let target = self.parse_binding_target();
        if self.check(TokenKind::Comma) {
            self.error_here(
                ErrorCode::ExpectedPattern,
                "a rest element must be last in a pattern",
            );
            self.advance();
            self.skip_list_item();
        }
        target
    }
}
