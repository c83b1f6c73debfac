//! Synchronization points for panic-mode recovery.
//! 恐慌模式恢复的同步点。
//!
//! After an error the parser skips tokens until it reaches one of these
//! points, stepping over balanced `()`/`[]`/`{}`/`${…}` groups as it goes.

use loom_lexer::TokenKind;

/// Keywords that can only begin a statement.
pub fn is_stmt_start(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Let | Const
            | Var
            | Function
            | If
            | For
            | While
            | Do
            | Switch
            | Try
            | Throw
            | Return
            | Break
            | Continue
            | Import
            | Export
    )
}

pub fn is_stmt_end(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Semicolon | TokenKind::RBrace)
}

/// Where a broken list element gives up.
pub const LIST_ENDS: &[TokenKind] = &[
    TokenKind::Comma,
    TokenKind::Semicolon,
    TokenKind::RParen,
    TokenKind::RBracket,
    TokenKind::RBrace,
];

pub fn is_in_set(kind: TokenKind, set: &[TokenKind]) -> bool {
    set.contains(&kind)
}

/// A bracket family. `Template` is the `${` … `}` hole in a template literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterKind {
    Paren,
    Bracket,
    Brace,
    Template,
}

impl DelimiterKind {
    const PAIRS: [(DelimiterKind, TokenKind, TokenKind); 4] = [
        (DelimiterKind::Paren, TokenKind::LParen, TokenKind::RParen),
        (DelimiterKind::Bracket, TokenKind::LBracket, TokenKind::RBracket),
        (DelimiterKind::Brace, TokenKind::LBrace, TokenKind::RBrace),
        (
            DelimiterKind::Template,
            TokenKind::TemplateExprStart,
            TokenKind::TemplateExprEnd,
        ),
    ];

    pub fn from_opening(kind: TokenKind) -> Option<Self> {
        Self::PAIRS
            .iter()
            .find(|(_, open, _)| *open == kind)
            .map(|(delim, _, _)| *delim)
    }

    pub fn from_closing(kind: TokenKind) -> Option<Self> {
        Self::PAIRS
            .iter()
            .find(|(_, _, close)| *close == kind)
            .map(|(delim, _, _)| *delim)
    }
}

/// Open groups seen while skipping.
/// 跳过记号时尚未闭合的括号。
#[derive(Debug, Default)]
pub struct DelimiterStack {
    open: Vec<DelimiterKind>,
}

impl DelimiterStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Feed one token. A closer only pops when it matches the innermost
    /// opener; a stray `)` inside `{` is skipped like any other token.
    pub fn update(&mut self, token: TokenKind) {
        if let Some(kind) = DelimiterKind::from_opening(token) {
            self.open.push(kind);
        } else if DelimiterKind::from_closing(token).is_some_and(|k| self.open.last() == Some(&k)) {
            self.open.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_boundaries() {
        assert!(is_stmt_start(TokenKind::Export));
        assert!(!is_stmt_start(TokenKind::Identifier));
        assert!(is_stmt_end(TokenKind::Semicolon));
        assert!(!is_stmt_end(TokenKind::RParen));
    }

    #[test]
    fn mismatched_closer_is_skipped() {
        let mut stack = DelimiterStack::new();
        for kind in [TokenKind::LParen, TokenKind::LBrace, TokenKind::RParen] {
            stack.update(kind);
        }
        assert_eq!(stack.depth(), 2);

        stack.update(TokenKind::RBrace);
        stack.update(TokenKind::RParen);
        assert!(stack.is_empty());
    }

    #[test]
    fn template_holes_nest_with_braces() {
        let mut stack = DelimiterStack::new();
        stack.update(TokenKind::TemplateExprStart);
        stack.update(TokenKind::LBrace);
        stack.update(TokenKind::RBrace);
        assert_eq!(stack.depth(), 1);
        stack.update(TokenKind::TemplateExprEnd);
        assert!(stack.is_empty());
    }
}
