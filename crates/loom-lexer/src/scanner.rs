//! Character cursor over the source text.
//! 源文本上的字符游标。
//!
//! The scanner only knows about characters and positions. It has no idea what
//! a token is.

use loom_common::{BytePos, Span};

/// A saved scanner position: byte offset plus the line/column it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

/// Forward-only character cursor tracking byte offset, line and column.
#[derive(Debug, Clone)]
pub struct Scanner<'src> {
    source: &'src str,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn pos(&self) -> BytePos {
        BytePos::from(self.pos)
    }

    pub fn mark(&self) -> Mark {
        Mark {
            offset: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    /// Peek at the current character without consuming it.
    /// 查看当前字符但不消耗。
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Peek `n` characters ahead (0 is the current one).
    /// 向前查看第 n 个字符。
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    /// Consume one character.
    /// 消耗一个字符。
    pub fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consume `expected` if it is next.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume `prefix` if the remaining text starts with it.
    pub fn eat_str(&mut self, prefix: &str) -> bool {
        if self.starts_with(prefix) {
            for _ in prefix.chars() {
                self.bump();
            }
            true
        } else {
            false
        }
    }

    /// Consume characters while `pred` holds. Returns how many were consumed.
    pub fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.bump();
            count += 1;
        }
        count
    }

    pub fn slice_from(&self, start: usize) -> &'src str {
        &self.source[start..self.pos]
    }

    pub fn span_from(&self, start: usize) -> Span {
        Span::from_usize(start, self.pos)
    }
}

pub fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

pub fn is_ident_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// Tag and attribute names also allow `-` and `:` (`data-id`, `on:click`).
pub fn is_markup_name_continue(ch: char) -> bool {
    is_ident_continue(ch) || ch == '-' || ch == ':'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_lines_and_columns() {
        let mut scanner = Scanner::new("a\nbé");
        assert_eq!(scanner.bump(), Some('a'));
        assert_eq!(scanner.bump(), Some('\n'));
        assert_eq!(scanner.mark(), Mark { offset: 2, line: 2, column: 1 });
        scanner.bump();
        scanner.bump();
        assert_eq!(scanner.mark(), Mark { offset: 5, line: 2, column: 3 });
        assert!(scanner.is_eof());
        assert_eq!(scanner.bump(), None);
    }

    #[test]
    fn eat_helpers() {
        let mut scanner = Scanner::new("===> x");
        assert!(scanner.eat_str("=="));
        assert!(!scanner.eat('>'));
        assert!(scanner.eat('='));
        assert_eq!(scanner.eat_while(|c| c == '>'), 1);
        assert_eq!(scanner.slice_from(0), "===>");
        assert_eq!(scanner.peek_nth(1), Some('x'));
    }
}
