//! Tokenizing inside markup tags and between them.
//! 标签内部与标签之间的词法分析。

use loom_common::Span;
use loom_diagnostic::ErrorCode;

use crate::lexer::Lexer;
use crate::scanner::{is_ident_start, is_markup_name_continue};
use crate::state::{LexerMode, Resume, TagFrame};
use crate::token::TokenKind;

impl<'src> Lexer<'src> {
    fn current_tag(&mut self) -> Option<&mut TagFrame> {
        match self.state.current_mut() {
            LexerMode::MarkupTag(tag) => Some(tag),
            _ => None,
        }
    }

    /// Inside `<...>`: names, `=`, quoted values, `{...}` and the closing `>`
    /// or `/>`. Whitespace here is insignificant.
    /// 标签内部：空白不重要。
    pub(crate) fn lex_markup_tag(&mut self) {
        if self.scanner.eat_while(char::is_whitespace) > 0 {
            if let Some(tag) = self.current_tag() {
                tag.end_name();
            }
        }
        let start = self.scanner.mark();

        let Some(ch) = self.scanner.peek() else {
            self.finish();
            return;
        };

        match ch {
            '>' => {
                self.scanner.bump();
                self.push(TokenKind::MarkupTagEnd, start);
                let Some(LexerMode::MarkupTag(tag)) = self.state.pop() else {
                    return;
                };
                if tag.closing {
                    self.close_element(tag);
                } else {
                    self.state.push(LexerMode::MarkupText { name: tag.name });
                }
            }
            '/' if self.scanner.peek_nth(1) == Some('>') => {
                self.scanner.eat_str("/>");
                self.push(TokenKind::MarkupSelfClose, start);
                if let Some(LexerMode::MarkupTag(tag)) = self.state.pop() {
                    if tag.closing {
                        self.close_element(tag);
                    } else {
                        self.state.depths.markup = self.state.depths.markup.saturating_sub(1);
                    }
                }
            }
            '{' => {
                self.scanner.bump();
                if let Some(tag) = self.current_tag() {
                    tag.end_name();
                }
                self.push(TokenKind::LBrace, start);
                self.state.depths.expression += 1;
                self.state.push(LexerMode::Embedded {
                    braces: 0,
                    resume: Resume::Tag,
                });
            }
            '"' | '\'' => {
                self.scanner.bump();
                self.lex_attribute_string(ch, start.offset);
                if let Some(tag) = self.current_tag() {
                    tag.end_name();
                }
                self.push(TokenKind::String, start);
            }
            '=' => {
                self.scanner.bump();
                if let Some(tag) = self.current_tag() {
                    tag.end_name();
                }
                self.push(TokenKind::Eq, start);
            }
            '.' => {
                self.scanner.bump();
                if let Some(tag) = self.current_tag() {
                    tag.push_name_dot();
                }
                self.push(TokenKind::Dot, start);
            }
            c if is_ident_start(c) => {
                self.scanner.bump();
                self.scanner.eat_while(is_markup_name_continue);
                let text = self.scanner.slice_from(start.offset);
                if let Some(tag) = self.current_tag() {
                    tag.push_name_part(text);
                }
                self.push(TokenKind::Identifier, start);
            }
            c => {
                self.scanner.bump();
                if let Some(tag) = self.current_tag() {
                    tag.end_name();
                }
                if c == '<' {
                    let span = self.scanner.span_from(start.offset);
                    self.error(
                        ErrorCode::StrayMarkupCharacter,
                        span,
                        "unexpected `<` inside a tag; the previous tag is missing `>`",
                    );
                } else {
                    self.error_unexpected_char(c, start);
                }
                self.push(TokenKind::Error, start);
            }
        }
    }

    /// Attribute strings run to the matching quote and may span lines; they
    /// have no escape sequences.
    fn lex_attribute_string(&mut self, quote: char, start: usize) {
        self.scanner.eat_while(|c| c != quote);
        if !self.scanner.eat(quote) {
            let span = self.scanner.span_from(start);
            self.error(
                ErrorCode::UnterminatedString,
                span,
                "unterminated attribute string",
            );
        }
    }

    /// The `>` of a closing tag was consumed and its frame popped.
    ///
    /// A closing tag that names an enclosing element closes that element, and
    /// every element opened inside it, so the text after it is not swallowed.
    fn close_element(&mut self, tag: TagFrame) {
        self.state.depths.markup = self.state.depths.markup.saturating_sub(1);
        let matches_current = match &tag.expected {
            Some(expected) => *expected == tag.name,
            None => true,
        };
        if matches_current {
            return;
        }
        if let Some(index) = self.state.open_ancestor(&tag.name) {
            tracing::trace!(name = %tag.name, implicit = index + 1, "closing tag closes ancestor");
            for _ in 0..=index {
                self.state.pop();
                self.state.depths.markup = self.state.depths.markup.saturating_sub(1);
            }
        }
    }

    /// Between tags: text (whitespace included), child tags, `{...}`.
    /// 标签之间：文本（包括空白）、子标签、`{...}`。
    pub(crate) fn lex_markup_text(&mut self) {
        let start = self.scanner.mark();

        match self.scanner.peek() {
            None => self.finish(),
            Some('<') if self.scanner.peek_nth(1) == Some('/') => {
                self.scanner.eat_str("</");
                self.push(TokenKind::MarkupCloseOpen, start);
                let expected = match self.state.current() {
                    LexerMode::MarkupText { name } => Some(name.clone()),
                    _ => None,
                };
                self.state
                    .replace(LexerMode::MarkupTag(TagFrame::closing(expected)));
            }
            Some('<') if self.at_child_tag() => {
                self.scanner.bump();
                self.push(TokenKind::MarkupOpen, start);
                self.state.depths.markup += 1;
                self.state.push(LexerMode::MarkupTag(TagFrame::opening()));
            }
            Some('{') => {
                self.scanner.bump();
                self.push(TokenKind::LBrace, start);
                self.state.depths.expression += 1;
                self.state.push(LexerMode::Embedded {
                    braces: 0,
                    resume: Resume::Text,
                });
            }
            Some(_) => {
                self.lex_text_run();
                self.push(TokenKind::MarkupText, start);
            }
        }
    }

    fn at_child_tag(&self) -> bool {
        self.scanner
            .peek_nth(1)
            .is_some_and(|c| is_ident_start(c) || c == '>')
    }

    /// Consume text up to the next tag, container or end of input.
    fn lex_text_run(&mut self) {
        loop {
            match self.scanner.peek() {
                None | Some('{') => return,
                Some('<') if self.scanner.peek_nth(1) == Some('/') || self.at_child_tag() => return,
                Some(c @ ('<' | '}')) => {
                    let offset = self.scanner.offset();
                    self.scanner.bump();
                    self.warning(
                        ErrorCode::StrayMarkupCharacter,
                        Span::from_usize(offset, offset + 1),
                        format!("`{c}` in markup text is treated as text"),
                    );
                }
                Some(_) => {
                    self.scanner.bump();
                }
            }
        }
    }
}
