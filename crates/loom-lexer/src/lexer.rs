//! The Loom lexer.
//! Loom 词法分析器。

use loom_common::{Limits, Span};
use loom_diagnostic::{Diagnostic, DiagnosticCollector, DiagnosticSink, ErrorCode, Label};

use crate::scanner::{Mark, Scanner, is_ident_continue, is_ident_start};
use crate::state::{LexerMode, LexerState, Resume, TagFrame};
use crate::stream::TokenStream;
use crate::token::{Token, TokenKind};

/// Turns source text into a finished token stream.
/// 将源文本转换为完整的 token 流。
pub trait Tokenizer<'src> {
    fn tokenize(self) -> (TokenStream<'src>, DiagnosticCollector<'src>);
}

/// The Loom lexer.
/// Loom 词法分析器。
///
/// A state machine over a stack of modes: ordinary code, inside a markup tag,
/// inside markup text, inside a template literal, and code embedded in braces.
/// The whole stream is produced before parsing starts.
pub struct Lexer<'src> {
    pub(crate) scanner: Scanner<'src>,
    pub(crate) state: LexerState,
    pub(crate) diagnostics: DiagnosticCollector<'src>,
    tokens: Vec<Token<'src>>,
    /// An expression may start at the next token (decides `<` and `/`).
    expr_start: bool,
    /// A line break was skipped since the last significant token.
    newline_before: bool,
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code.
    /// 为给定的源代码创建新的词法分析器。
    pub fn new(source: &'src str) -> Self {
        Self::with_limits(source, &Limits::default())
    }

    pub fn with_limits(source: &'src str, limits: &Limits) -> Self {
        Self {
            scanner: Scanner::new(source),
            state: LexerState::new(),
            diagnostics: DiagnosticCollector::new(source, limits.max_diagnostics),
            tokens: Vec::with_capacity(source.len() / 4 + 1),
            expr_start: true,
            newline_before: false,
            finished: false,
        }
    }

    /// Tokenize the entire source and return the stream and diagnostics.
    /// 对整个源代码进行词法分析，返回 token 流和诊断信息。
    pub fn tokenize(mut self) -> (TokenStream<'src>, DiagnosticCollector<'src>) {
        let _span = tracing::debug_span!("scan", bytes = self.scanner.source().len()).entered();

        while !self.finished {
            let before = self.scanner.offset();
            let count = self.tokens.len();
            self.next_token();
            debug_assert!(
                self.finished || self.scanner.offset() > before || self.tokens.len() > count,
                "lexer made no progress at byte {before}"
            );
        }

        tracing::debug!(
            tokens = self.tokens.len(),
            diagnostics = self.diagnostics.len(),
            "scan finished"
        );
        let depths = self.state.depths;
        let stream = TokenStream::new(self.scanner.source(), self.tokens, depths);
        (stream, self.diagnostics)
    }

    /// Produce the next token(s) based on the current mode.
    /// 根据当前模式产生下一个 token。
    fn next_token(&mut self) {
        match self.state.current() {
            LexerMode::Normal | LexerMode::Embedded { .. } => self.lex_code(),
            LexerMode::MarkupTag(_) => self.lex_markup_tag(),
            LexerMode::MarkupText { .. } => self.lex_markup_text(),
            LexerMode::Template { .. } => self.lex_template(),
        }
    }

    pub(crate) fn push(&mut self, kind: TokenKind, start: Mark) {
        let newline_before = if kind.is_trivia() {
            self.newline_before
        } else {
            std::mem::take(&mut self.newline_before)
        };
        let text = self.scanner.slice_from(start.offset);
        if kind.is_trivia() {
            if text.contains('\n') {
                self.newline_before = true;
            }
        } else {
            self.expr_start = kind.leaves_expression_start();
        }

        self.tokens.push(Token {
            kind,
            text,
            span: self.scanner.span_from(start.offset),
            line: start.line,
            column: start.column,
            newline_before,
        });
    }

    /// Report an error at `span`.
    pub(crate) fn error(&mut self, code: ErrorCode, span: Span, message: impl Into<String>) {
        self.diagnostics.report(Diagnostic::error(code, span, message));
    }

    pub(crate) fn warning(&mut self, code: ErrorCode, span: Span, message: impl Into<String>) {
        self.diagnostics.report(Diagnostic::warning(code, span, message));
    }

    /// Emit the synthetic end-of-file token and report any construct left open.
    pub(crate) fn finish(&mut self) {
        if self.finished {
            return;
        }
        let end = self.scanner.offset();
        let eof_span = Span::from_usize(end, end);

        let open = self
            .state
            .frames()
            .iter()
            .rev()
            .find(|mode| !mode.is_code())
            .cloned();
        match open {
            Some(LexerMode::Template { start }) => {
                self.diagnostics.report(
                    Diagnostic::error(
                        ErrorCode::UnterminatedTemplate,
                        eof_span,
                        "unterminated template literal",
                    )
                    .with_label(Label::new(
                        Span::from_usize(start, start + 1),
                        "template starts here",
                    )),
                );
            }
            Some(LexerMode::MarkupTag(tag)) => {
                let what = if tag.closing { "closing tag" } else { "tag" };
                self.error(
                    ErrorCode::UnterminatedMarkup,
                    eof_span,
                    format!("unterminated {what} `<{}`: expected `>`", tag.name),
                );
            }
            Some(LexerMode::MarkupText { name }) => {
                self.error(
                    ErrorCode::UnterminatedMarkup,
                    eof_span,
                    format!("unterminated markup element `<{name}>`: expected `</{name}>`"),
                );
            }
            _ => {}
        }

        let start = self.scanner.mark();
        self.push(TokenKind::Eof, start);
        self.finished = true;
    }

    /// Skip whitespace, remembering whether it crossed a line break.
    /// 跳过空白字符，记录是否跨行。
    fn skip_whitespace(&mut self) {
        let mut newline = false;
        self.scanner.eat_while(|ch| {
            if ch == '\n' {
                newline = true;
            }
            ch.is_whitespace() || ch == '\u{feff}'
        });
        if newline {
            self.newline_before = true;
        }
    }

    /// Tokenize ordinary code, in `Normal` or `Embedded` mode.
    /// 对普通代码进行词法分析。
    fn lex_code(&mut self) {
        self.skip_whitespace();
        let start = self.scanner.mark();

        let Some(ch) = self.scanner.bump() else {
            self.finish();
            return;
        };

        let mut closes_head = false;
        let kind = match ch {
            '(' => {
                let head = self.last_significant().is_some_and(|k| k.takes_paren_head());
                self.state.open_paren(head);
                TokenKind::LParen
            }
            ')' => {
                closes_head = self.state.close_paren();
                TokenKind::RParen
            }
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => {
                if let LexerMode::Embedded { braces, .. } = self.state.current_mut() {
                    *braces += 1;
                }
                TokenKind::LBrace
            }
            '}' => self.close_brace(),
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '~' => TokenKind::Tilde,

            '.' => {
                if self.scanner.starts_with("..") {
                    self.scanner.eat_str("..");
                    TokenKind::Ellipsis
                } else if self.scanner.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.lex_number('.', start)
                } else {
                    TokenKind::Dot
                }
            }

            '?' => {
                if self.scanner.eat_str("?=") {
                    TokenKind::QuestionQuestionEq
                } else if self.scanner.eat('?') {
                    TokenKind::QuestionQuestion
                } else if self.scanner.peek() == Some('.')
                    && !self.scanner.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
                {
                    // `a?.5:1` is a conditional, not optional chaining.
                    self.scanner.bump();
                    TokenKind::QuestionDot
                } else {
                    TokenKind::Question
                }
            }

            '=' => {
                if self.scanner.eat_str("==") {
                    TokenKind::EqEqEq
                } else if self.scanner.eat('=') {
                    TokenKind::EqEq
                } else if self.scanner.eat('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Eq
                }
            }

            '!' => {
                if self.scanner.eat_str("==") {
                    TokenKind::BangEqEq
                } else if self.scanner.eat('=') {
                    TokenKind::BangEq
                } else {
                    TokenKind::Bang
                }
            }

            '+' => {
                if self.scanner.eat('+') {
                    TokenKind::PlusPlus
                } else if self.scanner.eat('=') {
                    TokenKind::PlusEq
                } else {
                    TokenKind::Plus
                }
            }

            '-' => {
                if self.scanner.eat('-') {
                    TokenKind::MinusMinus
                } else if self.scanner.eat('=') {
                    TokenKind::MinusEq
                } else {
                    TokenKind::Minus
                }
            }

            '*' => {
                if self.scanner.eat_str("*=") {
                    TokenKind::StarStarEq
                } else if self.scanner.eat('*') {
                    TokenKind::StarStar
                } else if self.scanner.eat('=') {
                    TokenKind::StarEq
                } else {
                    TokenKind::Star
                }
            }

            '/' => {
                if self.scanner.eat('/') {
                    self.scanner.eat_while(|c| c != '\n');
                    TokenKind::LineComment
                } else if self.scanner.eat('*') {
                    self.block_comment(start)
                } else if self.expr_start {
                    self.lex_regex(start)
                } else if self.scanner.eat('=') {
                    TokenKind::SlashEq
                } else {
                    TokenKind::Slash
                }
            }

            '%' => {
                if self.scanner.eat('=') {
                    TokenKind::PercentEq
                } else {
                    TokenKind::Percent
                }
            }

            '<' => {
                if self.expr_start && self.at_markup_start() {
                    self.open_markup_from_code(start);
                    return;
                }
                if self.scanner.eat_str("<=") {
                    TokenKind::ShlEq
                } else if self.scanner.eat('<') {
                    TokenKind::Shl
                } else if self.scanner.eat('=') {
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }

            // `>>` and `>>>` are left to the parser so nested type arguments close.
            '>' => {
                if self.scanner.eat('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }

            '&' => {
                if self.scanner.eat_str("&=") {
                    TokenKind::AmpAmpEq
                } else if self.scanner.eat('&') {
                    TokenKind::AmpAmp
                } else if self.scanner.eat('=') {
                    TokenKind::AmpEq
                } else {
                    TokenKind::Amp
                }
            }

            '|' => {
                if self.scanner.eat_str("|=") {
                    TokenKind::PipePipeEq
                } else if self.scanner.eat('|') {
                    TokenKind::PipePipe
                } else if self.scanner.eat('=') {
                    TokenKind::PipeEq
                } else {
                    TokenKind::Pipe
                }
            }

            '^' => {
                if self.scanner.eat('=') {
                    TokenKind::CaretEq
                } else {
                    TokenKind::Caret
                }
            }

            '"' | '\'' => self.lex_string(ch, start),

            '`' => {
                self.state.depths.template += 1;
                self.state.push(LexerMode::Template {
                    start: start.offset,
                });
                TokenKind::TemplateStart
            }

            c if c.is_ascii_digit() => self.lex_number(c, start),

            c if is_ident_start(c) => {
                self.scanner.eat_while(is_ident_continue);
                let text = self.scanner.slice_from(start.offset);
                TokenKind::keyword_from_str(text).unwrap_or(TokenKind::Identifier)
            }

            c => {
                self.error_unexpected_char(c, start);
                TokenKind::Error
            }
        };

        self.push(kind, start);
        // `if (c) <p/>`: a statement, and so an expression, follows the head.
        if closes_head {
            self.expr_start = true;
        }
    }

    fn last_significant(&self) -> Option<TokenKind> {
        self.tokens
            .iter()
            .rev()
            .map(|token| token.kind)
            .find(|kind| !kind.is_trivia())
    }

    /// `}` in code: closes an embedded expression at brace depth zero.
    fn close_brace(&mut self) -> TokenKind {
        match self.state.current_mut() {
            LexerMode::Embedded { braces, .. } if *braces > 0 => {
                *braces -= 1;
                TokenKind::RBrace
            }
            LexerMode::Embedded { resume, .. } => {
                let resume = *resume;
                self.state.pop();
                self.state.depths.expression = self.state.depths.expression.saturating_sub(1);
                match resume {
                    Resume::Template => TokenKind::TemplateExprEnd,
                    Resume::Tag | Resume::Text => TokenKind::RBrace,
                }
            }
            _ => TokenKind::RBrace,
        }
    }

    /// After `<` in expression-start context: does a tag begin here?
    fn at_markup_start(&self) -> bool {
        match self.scanner.peek() {
            Some(c) => is_ident_start(c) || c == '>' || c == '/',
            None => false,
        }
    }

    fn open_markup_from_code(&mut self, start: Mark) {
        if self.scanner.eat('/') {
            self.push(TokenKind::MarkupCloseOpen, start);
            self.state.push(LexerMode::MarkupTag(TagFrame::closing(None)));
        } else {
            self.push(TokenKind::MarkupOpen, start);
            self.state.depths.markup += 1;
            self.state.push(LexerMode::MarkupTag(TagFrame::opening()));
        }
    }

    /// Scan the rest of a `/* ... */` comment.
    fn block_comment(&mut self, start: Mark) -> TokenKind {
        loop {
            if self.scanner.eat_str("*/") {
                return TokenKind::BlockComment;
            }
            if self.scanner.bump().is_none() {
                // Unterminated comment - 未终止的注释
                let span = self.scanner.span_from(start.offset);
                self.diagnostics.report(
                    Diagnostic::error(ErrorCode::UnterminatedComment, span, "unterminated block comment")
                        .with_label(Label::new(
                            Span::from_usize(start.offset, start.offset + 2),
                            "comment starts here",
                        )),
                );
                return TokenKind::BlockComment;
            }
        }
    }

    /// Report an unexpected character error.
    /// 报告意外字符错误。
    pub(crate) fn error_unexpected_char(&mut self, ch: char, start: Mark) {
        let span = self.scanner.span_from(start.offset);
        self.diagnostics.report(
            Diagnostic::error(
                ErrorCode::UnexpectedCharacter,
                span,
                format!("unexpected character: '{}'", ch.escape_debug()),
            )
            .with_label(Label::new(span, "unexpected character here")),
        );
    }
}

impl<'src> Tokenizer<'src> for Lexer<'src> {
    fn tokenize(self) -> (TokenStream<'src>, DiagnosticCollector<'src>) {
        Lexer::tokenize(self)
    }
}
