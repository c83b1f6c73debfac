//! Scanning of string, number, regex and template literals.
//! 字符串、数字、正则和模板字面量的扫描。

use loom_common::Span;
use loom_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode, Label};

use crate::lexer::Lexer;
use crate::scanner::{Mark, is_ident_continue, is_ident_start};
use crate::state::{LexerMode, Resume};
use crate::token::TokenKind;

/// Digits scanned for one part of a number.
struct DigitRun {
    count: usize,
    bad_separator: bool,
}

impl<'src> Lexer<'src> {
    /// Scan a quoted string; the opening quote is already consumed.
    /// 扫描带引号的字符串，起始引号已被消耗。
    pub(crate) fn lex_string(&mut self, quote: char, start: Mark) -> TokenKind {
        loop {
            match self.scanner.peek() {
                Some(c) if c == quote => {
                    self.scanner.bump();
                    return TokenKind::String;
                }
                Some('\\') => self.scan_escape(),
                // A raw line break ends the string; scanning resumes on the next line.
                Some('\n') | None => {
                    let span = self.scanner.span_from(start.offset);
                    self.diagnostics.report(
                        Diagnostic::error(ErrorCode::UnterminatedString, span, "unterminated string literal")
                            .with_label(Label::new(
                                Span::from_usize(start.offset, start.offset + 1),
                                "string starts here",
                            ))
                            .with_suggestion(format!("add a closing {quote} before the end of the line")),
                    );
                    return TokenKind::String;
                }
                Some(_) => {
                    self.scanner.bump();
                }
            }
        }
    }

    /// Validate one escape sequence starting at `\`.
    /// 校验一个以 `\` 开头的转义序列。
    pub(crate) fn scan_escape(&mut self) {
        let start = self.scanner.offset();
        self.scanner.bump();

        let valid = match self.scanner.bump() {
            // Line continuation - 续行
            Some('\r') => {
                self.scanner.eat('\n');
                true
            }
            Some('x') => (0..2).all(|_| self.eat_hex_digit()),
            Some('u') => {
                if self.scanner.eat('{') {
                    let mut value: u32 = 0;
                    let mut digits = 0;
                    while let Some(d) = self.scanner.peek().and_then(|c| c.to_digit(16)) {
                        self.scanner.bump();
                        value = value.saturating_mul(16).saturating_add(d);
                        digits += 1;
                    }
                    let closed = self.scanner.eat('}');
                    closed && digits > 0 && value <= 0x10FFFF
                } else {
                    (0..4).all(|_| self.eat_hex_digit())
                }
            }
            // Any other escaped character stands for itself.
            Some(_) => true,
            None => false,
        };

        if !valid {
            let span = self.scanner.span_from(start);
            let text = self.scanner.slice_from(start);
            self.error(
                ErrorCode::InvalidEscape,
                span,
                format!("invalid escape sequence `{text}`"),
            );
        }
    }

    fn eat_hex_digit(&mut self) -> bool {
        if self.scanner.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            self.scanner.bump();
            true
        } else {
            false
        }
    }

    /// Scan digits of `radix`, allowing single `_` separators between digits.
    /// `seen` counts digits of this run already consumed by the caller.
    fn eat_digits(&mut self, radix: u32, seen: usize) -> DigitRun {
        let mut run = DigitRun {
            count: seen,
            bad_separator: false,
        };
        let mut last_was_separator = false;

        while let Some(ch) = self.scanner.peek() {
            if ch == '_' {
                if run.count == 0 || last_was_separator {
                    run.bad_separator = true;
                }
                last_was_separator = true;
            } else if ch.is_digit(radix) {
                run.count += 1;
                last_was_separator = false;
            } else {
                break;
            }
            self.scanner.bump();
        }
        if last_was_separator {
            run.bad_separator = true;
        }
        run
    }

    /// Scan a number; `first` (a digit or `.`) is already consumed.
    /// 扫描数字，首字符（数字或 `.`）已被消耗。
    pub(crate) fn lex_number(&mut self, first: char, start: Mark) -> TokenKind {
        let mut problems: Vec<String> = Vec::new();
        let mut is_integer = true;

        let radix = match (first, self.scanner.peek()) {
            ('0', Some('x' | 'X')) => Some((16, "0x")),
            ('0', Some('o' | 'O')) => Some((8, "0o")),
            ('0', Some('b' | 'B')) => Some((2, "0b")),
            _ => None,
        };

        if let Some((radix, prefix)) = radix {
            self.scanner.bump();
            let run = self.eat_digits(radix, 0);
            if run.count == 0 {
                problems.push(format!("missing digits after `{prefix}`"));
            }
            if run.bad_separator {
                problems.push("misplaced numeric separator `_`".to_string());
            }
        } else {
            if first == '.' {
                is_integer = false;
                let run = self.eat_digits(10, 0);
                if run.bad_separator {
                    problems.push("misplaced numeric separator `_`".to_string());
                }
            } else {
                let run = self.eat_digits(10, 1);
                if run.bad_separator {
                    problems.push("misplaced numeric separator `_`".to_string());
                }
                let integer = self.scanner.slice_from(start.offset);
                if first == '0' && integer.len() > 1 {
                    let legacy_octal = integer.chars().all(|c| ('0'..='7').contains(&c));
                    let message = if legacy_octal {
                        format!("legacy octal literal `{integer}`; use `0o{}`", &integer[1..])
                    } else {
                        format!("decimal literal `{integer}` has a leading zero")
                    };
                    self.warning(
                        ErrorCode::DeprecatedNumber,
                        self.scanner.span_from(start.offset),
                        message,
                    );
                }

                // `1.` is a number, so `1..toString()` is `1.` then `.toString`.
                if self.scanner.peek() == Some('.') {
                    self.scanner.bump();
                    is_integer = false;
                    let run = self.eat_digits(10, 0);
                    if run.bad_separator {
                        problems.push("misplaced numeric separator `_`".to_string());
                    }
                }
            }

            if matches!(self.scanner.peek(), Some('e' | 'E')) {
                self.scanner.bump();
                is_integer = false;
                if matches!(self.scanner.peek(), Some('+' | '-')) {
                    self.scanner.bump();
                }
                if self.eat_digits(10, 0).count == 0 {
                    problems.push("missing digits in exponent".to_string());
                }
            }
        }

        // BigInt suffix - 大整数后缀
        if self.scanner.peek() == Some('n') {
            self.scanner.bump();
            if !is_integer {
                problems.push("BigInt suffix `n` on a non-integer".to_string());
            }
        }

        if self.scanner.peek().is_some_and(is_ident_start) {
            self.scanner.eat_while(is_ident_continue);
            problems.push("identifier starts immediately after number".to_string());
        }

        if !problems.is_empty() {
            let span = self.scanner.span_from(start.offset);
            let text = self.scanner.slice_from(start.offset);
            self.warning(
                ErrorCode::InvalidNumber,
                span,
                format!("malformed number `{text}`: {}", problems.join(", ")),
            );
        }

        TokenKind::Number
    }

    /// Scan a regex literal; the opening `/` is already consumed.
    /// 扫描正则表达式字面量，起始 `/` 已被消耗。
    pub(crate) fn lex_regex(&mut self, start: Mark) -> TokenKind {
        let mut in_class = false;
        loop {
            match self.scanner.peek() {
                None | Some('\n') => {
                    let span = self.scanner.span_from(start.offset);
                    self.error(
                        ErrorCode::UnterminatedRegex,
                        span,
                        "unterminated regular expression literal",
                    );
                    return TokenKind::Regex;
                }
                Some('\\') => {
                    self.scanner.bump();
                    if self.scanner.peek() != Some('\n') {
                        self.scanner.bump();
                    }
                }
                Some('[') => {
                    in_class = true;
                    self.scanner.bump();
                }
                Some(']') => {
                    in_class = false;
                    self.scanner.bump();
                }
                Some('/') if !in_class => {
                    self.scanner.bump();
                    break;
                }
                Some(_) => {
                    self.scanner.bump();
                }
            }
        }
        // Flags - 标志
        self.scanner.eat_while(is_ident_continue);
        TokenKind::Regex
    }

    /// Tokenize inside a template literal.
    /// 在模板字面量内部进行词法分析。
    pub(crate) fn lex_template(&mut self) {
        let start = self.scanner.mark();

        if self.scanner.eat('`') {
            self.state.pop();
            self.state.depths.template = self.state.depths.template.saturating_sub(1);
            self.push(TokenKind::TemplateEnd, start);
            return;
        }

        if self.scanner.eat_str("${") {
            self.state.depths.expression += 1;
            self.state.push(LexerMode::Embedded {
                braces: 0,
                resume: Resume::Template,
            });
            self.push(TokenKind::TemplateExprStart, start);
            return;
        }

        if self.scanner.is_eof() {
            self.finish();
            return;
        }

        loop {
            match self.scanner.peek() {
                None | Some('`') => break,
                Some('$') if self.scanner.peek_nth(1) == Some('{') => break,
                Some('\\') => self.scan_escape(),
                Some(_) => {
                    self.scanner.bump();
                }
            }
        }
        self.push(TokenKind::TemplateChunk, start);
    }
}
