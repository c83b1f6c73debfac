//! The Loom parser.
//! Loom 语法分析器。
//!
//! The grammar is split across modules that each add an `impl Parser` block:
//! statements (`stmt`), expressions (`expr`), binding patterns (`pattern`),
//! type annotations (`types`) and markup (`markup`). This file holds the
//! cursor, the token helpers, the single backtrack helper and the recovery
//! routines they share.

use loom_common::{BytePos, Limits, Span};
use loom_diagnostic::{Checkpoint, Diagnostic, DiagnosticCollector, DiagnosticSink, ErrorCode, Label};
use loom_lexer::{Token, TokenIndex, TokenKind, TokenStream};
use loom_syntax::{Ident, Program};

use crate::observer::ParseObserver;
use crate::recovery::{DelimiterStack, LIST_ENDS, is_in_set, is_stmt_end, is_stmt_start};

/// Turns a token stream into a program.
/// 将 token 流转换为程序。
pub trait ProgramParser {
    fn parse_program(&mut self) -> Program;
}

/// Bounded scans never look further ahead than this many tokens.
const LOOKAHEAD_LIMIT: usize = 512;

/// The Loom parser.
/// Loom 语法分析器。
pub struct Parser<'a, 'src> {
    pub(crate) tokens: &'a TokenStream<'src>,
    pub(crate) pos: TokenIndex,
    /// End of the last consumed token.
    pub(crate) prev_end: BytePos,
    pub(crate) diagnostics: DiagnosticCollector<'src>,
    pub(crate) limits: Limits,
    /// Current nesting of guarded productions.
    pub(crate) depth: usize,
    /// Names of the markup elements being parsed, innermost last; `""` for fragments.
    pub(crate) open_tags: Vec<String>,
    /// Whether `in` is a binary operator here (it is not in a `for (` head).
    pub(crate) allow_in: bool,
    speculating: bool,
    pub(crate) observer: Option<&'a mut dyn ParseObserver>,
}

/// Everything a failed speculative parse must put back.
#[derive(Debug, Clone, Copy)]
struct Snapshot {
    pos: TokenIndex,
    prev_end: BytePos,
    diagnostics: Checkpoint,
    open_tags: usize,
    depth: usize,
    allow_in: bool,
}

impl<'a, 'src> Parser<'a, 'src> {
    /// Create a parser that appends to `diagnostics`, usually the lexer's collector.
    pub fn new(
        tokens: &'a TokenStream<'src>,
        diagnostics: DiagnosticCollector<'src>,
        limits: Limits,
    ) -> Self {
        Self {
            tokens,
            pos: TokenIndex::ZERO,
            prev_end: BytePos::ZERO,
            diagnostics,
            limits,
            depth: 0,
            open_tags: Vec::new(),
            allow_in: true,
            speculating: false,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: &'a mut dyn ParseObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn diagnostics(&self) -> &DiagnosticCollector<'src> {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_diagnostics()
    }

    /// Parse a complete source file.
    pub fn parse_file(&mut self) -> Program {
        let _span = tracing::debug_span!("parse", tokens = self.tokens.len()).entered();
        self.enter("program");

        let mut body = Vec::new();
        let mut guard = self.loop_guard("program");
        while !self.at_end() {
            if !self.step(&mut guard) {
                break;
            }
            body.push(self.parse_stmt_or_recover());
        }

        let span = Span::from_usize(0, self.tokens.source().len());
        self.exit("program", span);
        Program { body, span }
    }

    // ========== Token Helpers ==========

    pub(crate) fn current(&self) -> &'a Token<'src> {
        self.tokens.get(self.pos)
    }

    /// The significant token `n` places after the current one.
    pub(crate) fn peek(&self, n: usize) -> &'a Token<'src> {
        self.tokens.get(TokenIndex::new(self.pos.get() + n))
    }

    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    pub(crate) fn peek_kind(&self, n: usize) -> TokenKind {
        self.peek(n).kind
    }

    pub(crate) fn current_span(&self) -> Span {
        self.current().span
    }

    /// Start of the current token, for nodes that begin by consuming it.
    pub(crate) fn start(&self) -> BytePos {
        self.current_span().start
    }

    /// From `start` to the end of the last consumed token.
    pub(crate) fn span_from(&self, start: BytePos) -> Span {
        Span::new(start, self.prev_end.max(start))
    }

    /// Zero-width span for something required but absent.
    pub(crate) fn missing_span(&self) -> Span {
        Span::empty(self.prev_end)
    }

    pub(crate) fn at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub(crate) fn check_word(&self, word: &str) -> bool {
        self.current().is_word(word)
    }

    pub(crate) fn advance(&mut self) -> &'a Token<'src> {
        let token = self.current();
        if !self.at_end() {
            self.pos = self.pos.next();
            self.prev_end = token.span.end;
        }
        token
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_word(&mut self, word: &str) -> bool {
        if self.check_word(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or report what was expected, without skipping anything.
    pub(crate) fn expect(&mut self, kind: TokenKind, context: &str) -> bool {
        if self.eat(kind) {
            return true;
        }
        let message = format!("expected {} {}, found {}", kind.describe(), context, self.found());
        self.error_here(ErrorCode::UnexpectedToken, message);
        false
    }

    /// Human-readable description of the current token.
    pub(crate) fn found(&self) -> String {
        let token = self.current();
        match token.kind {
            TokenKind::Identifier | TokenKind::Number | TokenKind::String => {
                format!("{} `{}`", token.kind.describe(), token.text)
            }
            kind => kind.describe().to_string(),
        }
    }

    pub(crate) fn error(&mut self, code: ErrorCode, span: Span, message: impl Into<String>) {
        let mut diagnostic = Diagnostic::error(code, span, message);
        if let Some(help) = code.suggestion() {
            diagnostic = diagnostic.with_suggestion(help);
        }
        self.diagnostics.report(diagnostic);
    }

    pub(crate) fn error_here(&mut self, code: ErrorCode, message: impl Into<String>) {
        let span = self.current_span();
        self.error(code, span, message);
    }

    /// Report `expected {what}, found ...` at the current token.
    pub(crate) fn unexpected(&mut self, code: ErrorCode, what: &str) {
        let message = format!("expected {}, found {}", what, self.found());
        self.error_here(code, message);
    }

    /// Report a generator or async construct that is parsed but not supported.
    pub(crate) fn unsupported(&mut self, span: Span, construct: &str) {
        self.error(
            ErrorCode::UnsupportedConstruct,
            span,
            format!("generator/async control flow is not supported: `{construct}`"),
        );
    }

    /// A plain identifier, or a missing one plus a diagnostic.
    pub(crate) fn parse_ident(&mut self, what: &str) -> Ident {
        if self.check(TokenKind::Identifier) {
            let token = self.advance();
            Ident::new(token.text, token.span)
        } else {
            self.unexpected(ErrorCode::ExpectedIdentifier, what);
            Ident::missing(self.missing_span())
        }
    }

    /// An identifier or keyword used as a name, as after `.` or in `{ default as x }`.
    pub(crate) fn parse_name(&mut self, what: &str) -> Ident {
        let token = self.current();
        if token.kind == TokenKind::Identifier || token.kind.is_keyword() {
            self.advance();
            Ident::new(token.text, token.span)
        } else {
            self.unexpected(ErrorCode::ExpectedIdentifier, what);
            Ident::missing(self.missing_span())
        }
    }

    pub(crate) fn at_name(&self) -> bool {
        let kind = self.current_kind();
        kind == TokenKind::Identifier || kind.is_keyword()
    }

    // ========== Observer ==========

    pub(crate) fn enter(&mut self, production: &'static str) {
        let at = self.current_span();
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.enter(production, at);
        }
    }

    pub(crate) fn exit(&mut self, production: &'static str, span: Span) {
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.exit(production, span);
        }
    }

    // ========== Backtracking ==========

    /// Run `parse` speculatively. On `None` the cursor, the diagnostics and the
    /// markup bookkeeping are restored exactly, and the caller falls through to
    /// its alternative.
    pub(crate) fn try_parse<T>(
        &mut self,
        production: &'static str,
        parse: impl FnOnce(&mut Self) -> Option<T>,
    ) -> Option<T> {
        debug_assert!(!self.speculating, "speculative parses do not nest");
        let snapshot = self.snapshot();
        self.speculating = true;
        let result = parse(self);
        self.speculating = false;

        if result.is_none() {
            self.restore(snapshot);
            let to = self.current_span();
            tracing::trace!(production, ?to, "backtrack");
            if let Some(observer) = self.observer.as_deref_mut() {
                observer.backtrack(production, to);
            }
        }
        result
    }

    /// Inside [`try_parse`](Self::try_parse); ambiguities must then be settled by lookahead.
    pub(crate) fn speculating(&self) -> bool {
        self.speculating
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.pos,
            prev_end: self.prev_end,
            diagnostics: self.diagnostics.checkpoint(),
            open_tags: self.open_tags.len(),
            depth: self.depth,
            allow_in: self.allow_in,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        debug_assert!(snapshot.pos <= self.pos, "cursor moved backwards during speculation");
        self.pos = snapshot.pos;
        self.prev_end = snapshot.prev_end;
        self.diagnostics.rollback(snapshot.diagnostics);
        self.open_tags.truncate(snapshot.open_tags);
        self.depth = snapshot.depth;
        self.allow_in = snapshot.allow_in;
    }

    /// Kind of the token after the `)` matching the `(` found `offset` tokens ahead.
    ///
    /// A bounded, non-consuming scan used to tell arrow parameters from a
    /// parenthesised expression, and function types from grouped types.
    pub(crate) fn after_matching_paren(&self, offset: usize) -> Option<TokenKind> {
        debug_assert!(self.peek_kind(offset) == TokenKind::LParen);
        let mut delimiters = DelimiterStack::new();
        for offset in offset..offset + LOOKAHEAD_LIMIT {
            let kind = self.peek_kind(offset);
            if kind == TokenKind::Eof {
                return None;
            }
            delimiters.update(kind);
            if delimiters.is_empty() {
                return Some(self.peek_kind(offset + 1));
            }
        }
        None
    }

    // ========== Nesting ==========

    /// Run `parse` one level deeper, or report and skip the construct when the
    /// configured depth is exceeded.
    pub(crate) fn nested<T>(
        &mut self,
        production: &'static str,
        parse: impl FnOnce(&mut Self) -> T,
        too_deep: impl FnOnce(Span) -> T,
    ) -> T {
        if self.depth >= self.limits.max_nesting_depth {
            let before = self.pos;
            let start = self.start();
            let at = self.current_span();
            tracing::debug!(production, depth = self.depth, "nesting limit reached");
            self.error(
                ErrorCode::NestingTooDeep,
                at,
                format!(
                    "{} nested more than {} levels deep",
                    production, self.limits.max_nesting_depth
                ),
            );
            self.skip_balanced();
            let span = if self.pos == before {
                self.missing_span()
            } else {
                self.span_from(start)
            };
            return too_deep(span);
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // ========== Error Recovery ==========

    /// Synchronize to the next statement boundary.
    ///
    /// Skips past a `;`, or stops before a `}` or a token that starts a
    /// statement. Delimiters opened while skipping are skipped whole.
    pub(crate) fn synchronize(&mut self) {
        let mut delimiters = DelimiterStack::new();
        let mut advanced = false;

        while !self.at_end() {
            let kind = self.current_kind();
            if delimiters.is_empty() && kind == TokenKind::RBrace {
                break;
            }
            if advanced
                && is_stmt_start(kind)
                && (delimiters.is_empty() || self.current().newline_before)
            {
                break;
            }

            delimiters.update(kind);
            self.advance();
            advanced = true;
            if delimiters.is_empty() && kind == TokenKind::Semicolon {
                break;
            }
        }

        tracing::debug!(at = ?self.current_span(), "synchronized");
    }

    /// Check if we're at the end of a statement.
    pub(crate) fn at_stmt_end(&self) -> bool {
        self.at_end() || is_stmt_end(self.current_kind())
    }

    /// Skip a failed list item up to the next `,` or closer at this level.
    pub(crate) fn skip_list_item(&mut self) {
        let mut delimiters = DelimiterStack::new();
        while !self.at_end() {
            let kind = self.current_kind();
            if delimiters.is_empty() && is_in_set(kind, LIST_ENDS) {
                return;
            }
            delimiters.update(kind);
            self.advance();
        }
    }

    /// Consume the construct at the cursor together with everything nested in
    /// it, stopping before a closer or separator that belongs to the caller.
    pub(crate) fn skip_balanced(&mut self) {
        let mut delimiters = DelimiterStack::new();
        let mut elements = 0usize;

        while !self.at_end() {
            let kind = self.current_kind();
            match kind {
                TokenKind::MarkupOpen => elements += 1,
                TokenKind::MarkupSelfClose => {
                    elements = elements.saturating_sub(1);
                    self.advance();
                    if elements == 0 && delimiters.is_empty() {
                        return;
                    }
                    continue;
                }
                TokenKind::MarkupCloseOpen => {
                    if elements == 0 {
                        return;
                    }
                    elements -= 1;
                    while !self.at_end() && !self.check(TokenKind::MarkupTagEnd) {
                        self.advance();
                    }
                    self.eat(TokenKind::MarkupTagEnd);
                    if elements == 0 && delimiters.is_empty() {
                        return;
                    }
                    continue;
                }
                _ if elements == 0 && delimiters.is_empty() => {
                    if is_in_set(kind, LIST_ENDS) || kind == TokenKind::TemplateExprEnd {
                        return;
                    }
                }
                _ => {}
            }

            let depth = delimiters.depth();
            delimiters.update(kind);
            self.advance();
            if elements == 0 && depth > 0 && delimiters.is_empty() {
                return;
            }
        }
    }

    /// Expect the closer of a delimiter opened at `open`.
    ///
    /// On failure the closer is searched for a bounded distance ahead, and
    /// the tokens before it are skipped when it is found at the same level.
    pub(crate) fn expect_closing(&mut self, kind: TokenKind, open: Span, what: &str) -> bool {
        if self.eat(kind) {
            return true;
        }

        let at = self.current_span();
        self.diagnostics.report(
            Diagnostic::error(
                ErrorCode::UnclosedDelimiter,
                at,
                format!("expected {} to close {}, found {}", kind.describe(), what, self.found()),
            )
            .with_label(Label::new(open, "opened here"))
            .with_suggestion(format!("add {} here", kind.describe())),
        );

        if let Some(distance) = self.find_closing(kind) {
            tracing::debug!(skipped = distance, closer = kind.describe(), "skipping to closer");
            for _ in 0..distance {
                self.advance();
            }
            self.advance();
            return true;
        }
        false
    }

    fn find_closing(&self, kind: TokenKind) -> Option<usize> {
        let mut delimiters = DelimiterStack::new();
        for offset in 0..LOOKAHEAD_LIMIT {
            let current = self.peek_kind(offset);
            if delimiters.is_empty() {
                if current == kind {
                    return Some(offset);
                }
                let gives_up = match current {
                    TokenKind::Eof | TokenKind::Semicolon => true,
                    TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => true,
                    _ => false,
                };
                if gives_up {
                    return None;
                }
            }
            delimiters.update(current);
        }
        None
    }

    /// Parse a comma-separated list with error recovery.
    ///
    /// The closing token is left for the caller. A trailing comma is allowed.
    pub(crate) fn parse_comma_list<T>(
        &mut self,
        closing: TokenKind,
        production: &'static str,
        mut parse_item: impl FnMut(&mut Self) -> Option<T>,
    ) -> Vec<T> {
        let mut items = Vec::new();
        let mut guard = self.loop_guard(production);

        while !self.check(closing) && !self.at_end() {
            if !self.step(&mut guard) {
                break;
            }
            if let Some(item) = parse_item(self) {
                items.push(item);
            } else {
                // Recovery: skip to comma or closing delimiter
                self.skip_list_item();
            }

            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        items
    }
}

impl ProgramParser for Parser<'_, '_> {
    fn parse_program(&mut self) -> Program {
        self.parse_file()
    }
}
