//! Byte offsets and half-open byte ranges into one source text.
//! 源码中的字节偏移与半开字节区间。
//!
//! Offsets are `u32`: a single Loom source file is limited to 4 GiB, which
//! halves the size of every span stored in the tree.

use std::fmt;
use std::ops::Range;

/// A byte offset into the source. Always on a UTF-8 character boundary.
/// 源码中的字节偏移，总是位于 UTF-8 字符边界上。
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BytePos(pub u32);

impl BytePos {
    pub const ZERO: BytePos = BytePos(0);
}

impl fmt::Debug for BytePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<usize> for BytePos {
    fn from(pos: usize) -> Self {
        BytePos(pos as u32)
    }
}

impl From<BytePos> for usize {
    fn from(pos: BytePos) -> Self {
        pos.0 as usize
    }
}

/// The half-open range `start..end` covered by a token, node or diagnostic.
/// 记号、节点或诊断所覆盖的半开区间 `start..end`。
///
/// A node's span contains the spans of all of its children. Nodes built by
/// error recovery may be empty; they sit where the missing input was expected.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: BytePos,
    /// Exclusive.
    pub end: BytePos,
}

impl Span {
    /// An empty span at offset zero, for values that were never in a source.
    pub const DUMMY: Span = Span::empty(BytePos::ZERO);

    pub const fn new(start: BytePos, end: BytePos) -> Self {
        Span { start, end }
    }

    pub fn from_usize(start: usize, end: usize) -> Self {
        Span::new(start.into(), end.into())
    }

    /// The empty span at `pos`.
    /// 位于 `pos` 的空区间。
    pub const fn empty(pos: BytePos) -> Self {
        Span { start: pos, end: pos }
    }

    /// The smallest span covering both.
    /// 同时覆盖两者的最小区间。
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// `other` lies inside `self`; an empty span on either boundary counts.
    /// `other` 位于 `self` 之内；边界上的空区间也算。
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn len(&self) -> usize {
        self.range().len()
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn range(&self) -> Range<usize> {
        usize::from(self.start)..usize::from(self.end)
    }

    /// The text under this span, or `""` when it does not fit `source`.
    /// 区间对应的源码文本；越界时返回空串。
    pub fn slice<'src>(&self, source: &'src str) -> &'src str {
        source.get(self.range()).unwrap_or_default()
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.0, self.end.0)
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::from_usize(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_order_independent() {
        let a = Span::from_usize(4, 9);
        let b = Span::from_usize(1, 6);
        assert_eq!(a.merge(b), b.merge(a));
        assert_eq!(a.merge(b), Span::from_usize(1, 9));
    }

    #[test]
    fn contains_accepts_empty_span_on_boundary() {
        let outer = Span::from_usize(3, 8);
        assert!(outer.contains(Span::empty(BytePos(8))));
        assert!(outer.contains(Span::from_usize(3, 8)));
        assert!(!outer.contains(Span::from_usize(2, 4)));
    }

    #[test]
    fn slice_is_total() {
        let source = "let x";
        assert_eq!(Span::from(4..5).slice(source), "x");
        assert_eq!(Span::from(4..50).slice(source), "");
        assert_eq!(Span::DUMMY.len(), 0);
    }
}
