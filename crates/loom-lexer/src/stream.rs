//! The immutable token stream handed to the parser.
//! 交给语法分析器的不可变 token 流。

use std::fmt;

use crate::state::DepthCounters;
use crate::token::{Token, TokenKind};

/// Index into the significant (non-comment) view of a [`TokenStream`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TokenIndex(u32);

impl TokenIndex {
    pub const ZERO: TokenIndex = TokenIndex(0);

    pub fn new(index: usize) -> Self {
        TokenIndex(index as u32)
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    pub fn next(self) -> Self {
        TokenIndex(self.0 + 1)
    }
}

impl fmt::Debug for TokenIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Every token of one source text, in order, ending with exactly one `Eof`.
///
/// Comments stay in [`all_tokens`](Self::all_tokens) but are skipped by the
/// significant view that [`TokenIndex`] addresses, so parser lookahead is O(1).
#[derive(Debug, Clone)]
pub struct TokenStream<'src> {
    source: &'src str,
    tokens: Vec<Token<'src>>,
    significant: Vec<u32>,
    depths: DepthCounters,
}

impl<'src> TokenStream<'src> {
    pub(crate) fn new(source: &'src str, tokens: Vec<Token<'src>>, depths: DepthCounters) -> Self {
        debug_assert!(
            tokens.last().is_some_and(|t| t.kind == TokenKind::Eof),
            "token stream must end with Eof"
        );
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia())
            .map(|(i, _)| i as u32)
            .collect();
        Self {
            source,
            tokens,
            significant,
            depths,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// All tokens, comments included.
    pub fn all_tokens(&self) -> &[Token<'src>] {
        &self.tokens
    }

    /// Number of significant tokens, `Eof` included.
    pub fn len(&self) -> usize {
        self.significant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.significant.is_empty()
    }

    /// The significant token at `index`. Indices past the end yield `Eof`.
    pub fn get(&self, index: TokenIndex) -> &Token<'src> {
        let slot = index.get().min(self.significant.len().saturating_sub(1));
        match self.significant.get(slot) {
            Some(&i) => &self.tokens[i as usize],
            None => &EOF_TOKEN,
        }
    }

    pub fn last_index(&self) -> TokenIndex {
        TokenIndex::new(self.significant.len().saturating_sub(1))
    }

    /// Significant tokens in order.
    pub fn iter(&self) -> impl Iterator<Item = &Token<'src>> + '_ {
        self.significant.iter().map(|&i| &self.tokens[i as usize])
    }

    /// Comments that appear between two significant tokens.
    pub fn trivia_before(&self, index: TokenIndex) -> &[Token<'src>] {
        let slot = index.get().min(self.significant.len().saturating_sub(1));
        let Some(&end) = self.significant.get(slot) else {
            return &[];
        };
        let begin = match slot.checked_sub(1) {
            Some(prev) => self.significant[prev] as usize + 1,
            None => 0,
        };
        &self.tokens[begin..end as usize]
    }

    /// Depth counters left open when scanning stopped; all zero for balanced input.
    pub fn final_depths(&self) -> DepthCounters {
        self.depths
    }
}

static EOF_TOKEN: Token<'static> = Token {
    kind: TokenKind::Eof,
    text: "",
    span: loom_common::Span::DUMMY,
    line: 1,
    column: 1,
    newline_before: false,
};
