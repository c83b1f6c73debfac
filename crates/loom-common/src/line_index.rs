//! Byte offset to line/column conversion.
//! 字节偏移到行列号的转换。

use serde::Serialize;

use crate::BytePos;

/// A 1-based line and column pair. Columns count characters, not bytes.
/// 从 1 开始的行列号，列按字符计数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl LineCol {
    pub const START: LineCol = LineCol { line: 1, column: 1 };
}

impl Default for LineCol {
    fn default() -> Self {
        LineCol::START
    }
}

/// Line start table over one source text.
/// 单个源文本的行首偏移表。
#[derive(Debug, Clone)]
pub struct LineIndex<'src> {
    source: &'src str,
    line_starts: Vec<usize>,
}

impl<'src> LineIndex<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Resolve a byte position. Positions past the end clamp to the end of the
    /// text; positions inside a multi-byte character clamp to its start.
    pub fn line_col(&self, pos: BytePos) -> LineCol {
        let (line, prefix) = self.locate(pos);
        LineCol {
            line: line as u32 + 1,
            column: prefix.chars().count() as u32 + 1,
        }
    }

    /// Zero-based line and UTF-16 code-unit offset into it, the way editors
    /// count positions. Clamps like [`LineIndex::line_col`].
    /// 从 0 开始的行号与 UTF-16 码元偏移。
    pub fn utf16_line_col(&self, pos: BytePos) -> (u32, u32) {
        let (line, prefix) = self.locate(pos);
        (line as u32, prefix.encode_utf16().count() as u32)
    }

    /// The line holding `pos` and the text of that line before it.
    fn locate(&self, pos: BytePos) -> (usize, &'src str) {
        let mut offset = usize::from(pos).min(self.source.len());
        while !self.source.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        (line, &self.source[line_start..offset])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_character_is_line_one_column_one() {
        let index = LineIndex::new("abc");
        assert_eq!(index.line_col(BytePos(0)), LineCol::START);
    }

    #[test]
    fn columns_restart_after_newline() {
        let index = LineIndex::new("ab\ncd\n\nx");
        assert_eq!(index.line_col(BytePos(3)), LineCol { line: 2, column: 1 });
        assert_eq!(index.line_col(BytePos(4)), LineCol { line: 2, column: 2 });
        assert_eq!(index.line_col(BytePos(7)), LineCol { line: 4, column: 1 });
        assert_eq!(index.line_count(), 4);
    }

    #[test]
    fn columns_count_characters() {
        let index = LineIndex::new("é=1");
        // `=` starts at byte 2 but is the second character.
        assert_eq!(index.line_col(BytePos(2)), LineCol { line: 1, column: 2 });
        assert_eq!(index.line_col(BytePos(1)), LineCol { line: 1, column: 1 });
    }

    #[test]
    fn past_the_end_clamps() {
        let index = LineIndex::new("ab");
        assert_eq!(index.line_col(BytePos(99)), LineCol { line: 1, column: 3 });
    }

    #[test]
    fn utf16_offsets_count_surrogate_pairs() {
        let index = LineIndex::new("a\n'\u{1F600}' x");
        // `x` follows four characters, five UTF-16 units.
        assert_eq!(index.line_col(BytePos(9)), LineCol { line: 2, column: 5 });
        assert_eq!(index.utf16_line_col(BytePos(9)), (1, 5));
    }
}
