//! Lexer modes and nesting bookkeeping.
//! 词法分析器模式与嵌套计数。

/// Where a brace-delimited embedded expression returns when its `}` closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    /// Attribute value or spread inside a tag.
    Tag,
    /// Expression container among element children.
    Text,
    /// `${ ... }` inside a template literal.
    Template,
}

/// An open tag, between `<` (or `</`) and its `>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagFrame {
    pub closing: bool,
    /// Dotted tag name collected from the leading identifier/dot tokens.
    pub name: String,
    pub name_done: bool,
    /// For a closing tag: the name of the element it is expected to close.
    pub expected: Option<String>,
}

impl TagFrame {
    pub fn opening() -> Self {
        Self::default()
    }

    pub fn closing(expected: Option<String>) -> Self {
        Self {
            closing: true,
            expected,
            ..Self::default()
        }
    }

    pub fn push_name_part(&mut self, part: &str) {
        if self.name_done {
            return;
        }
        if self.name.is_empty() || self.name.ends_with('.') {
            self.name.push_str(part);
        } else {
            self.name_done = true;
        }
    }

    pub fn push_name_dot(&mut self) {
        if self.name_done || self.name.is_empty() || self.name.ends_with('.') {
            self.name_done = true;
        } else {
            self.name.push('.');
        }
    }

    pub fn end_name(&mut self) {
        if !self.name.is_empty() {
            self.name_done = true;
        }
    }
}

/// Mode for lexer state machine.
/// 词法分析器状态机的模式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexerMode {
    /// Ordinary code - 普通代码
    Normal,
    /// Inside `<...>` - 在标签内部
    MarkupTag(TagFrame),
    /// Children of an open element; whitespace is content
    /// 元素子节点区域，空白是内容
    MarkupText { name: String },
    /// Literal part of a template string - 模板字符串的文本部分
    Template { start: usize },
    /// Code inside `{...}` or `${...}`, counting nested braces
    /// `{...}` 或 `${...}` 中的代码，计算嵌套花括号
    Embedded { braces: u32, resume: Resume },
}

impl LexerMode {
    /// True for modes that tokenize ordinary code.
    pub fn is_code(&self) -> bool {
        matches!(self, LexerMode::Normal | LexerMode::Embedded { .. })
    }
}

/// Depth counters, reported on the finished stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DepthCounters {
    /// Open markup elements and fragments.
    pub markup: u32,
    /// Open template literals.
    pub template: u32,
    /// Open `${...}` interpolations and markup expression containers.
    pub expression: u32,
    /// Open parentheses in code.
    pub paren: u32,
}

/// The mode stack plus counters. The bottom `Normal` frame is never popped.
#[derive(Debug, Clone)]
pub struct LexerState {
    stack: Vec<LexerMode>,
    /// One entry per open `(`: whether it opened an `if`/`while`/`for` head.
    parens: Vec<bool>,
    pub depths: DepthCounters,
}

impl Default for LexerState {
    fn default() -> Self {
        Self::new()
    }
}

impl LexerState {
    pub fn new() -> Self {
        Self {
            stack: vec![LexerMode::Normal],
            parens: Vec::new(),
            depths: DepthCounters::default(),
        }
    }

    pub fn current(&self) -> &LexerMode {
        self.stack.last().unwrap_or(&LexerMode::Normal)
    }

    pub fn current_mut(&mut self) -> &mut LexerMode {
        if self.stack.is_empty() {
            self.stack.push(LexerMode::Normal);
        }
        let top = self.stack.len() - 1;
        &mut self.stack[top]
    }

    pub fn frames(&self) -> &[LexerMode] {
        &self.stack
    }

    /// Push a new mode onto the stack.
    /// 将新模式压入栈中。
    pub fn push(&mut self, mode: LexerMode) {
        tracing::trace!(?mode, depth = self.stack.len(), "push lexer mode");
        self.stack.push(mode);
    }

    /// Pop the current mode from the stack.
    /// 从栈中弹出当前模式。
    pub fn pop(&mut self) -> Option<LexerMode> {
        debug_assert!(self.stack.len() > 1, "lexer mode stack underflow");
        if self.stack.len() > 1 {
            let mode = self.stack.pop();
            tracing::trace!(?mode, depth = self.stack.len(), "pop lexer mode");
            mode
        } else {
            None
        }
    }

    /// Swap the top frame, keeping the depth unchanged.
    pub fn replace(&mut self, mode: LexerMode) -> LexerMode {
        tracing::trace!(?mode, "replace lexer mode");
        std::mem::replace(self.current_mut(), mode)
    }

    pub fn open_paren(&mut self, head: bool) {
        self.parens.push(head);
        self.depths.paren += 1;
    }

    /// Close the innermost `(`; true when it was a control-flow head.
    /// A stray `)` is ignored.
    pub fn close_paren(&mut self) -> bool {
        self.depths.paren = self.depths.paren.saturating_sub(1);
        self.parens.pop().unwrap_or(false)
    }

    /// How many frames below the top form an unbroken run of open elements,
    /// and at which of them (counted from the top) an element named `name` sits.
    pub fn open_ancestor(&self, name: &str) -> Option<usize> {
        self.stack
            .iter()
            .rev()
            .take_while(|mode| matches!(mode, LexerMode::MarkupText { .. }))
            .position(|mode| matches!(mode, LexerMode::MarkupText { name: open } if open == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_name_collects_dotted_path() {
        let mut tag = TagFrame::opening();
        tag.push_name_part("Menu");
        tag.push_name_dot();
        tag.push_name_part("Item");
        tag.push_name_part("disabled");
        assert_eq!(tag.name, "Menu.Item");
        assert!(tag.name_done);
    }

    #[test]
    fn ancestor_search_stops_at_code_frames() {
        let mut state = LexerState::new();
        state.push(LexerMode::MarkupText { name: "ul".into() });
        state.push(LexerMode::Embedded { braces: 0, resume: Resume::Text });
        state.push(LexerMode::MarkupText { name: "li".into() });
        state.push(LexerMode::MarkupText { name: "b".into() });

        assert_eq!(state.open_ancestor("b"), Some(0));
        assert_eq!(state.open_ancestor("li"), Some(1));
        assert_eq!(state.open_ancestor("ul"), None);
    }

    #[test]
    fn bottom_frame_survives_release_pop() {
        let mut state = LexerState::new();
        state.push(LexerMode::Template { start: 0 });
        assert!(state.pop().is_some());
        assert_eq!(state.current(), &LexerMode::Normal);
        assert_eq!(state.frames().len(), 1);
    }

    #[test]
    fn only_head_parens_are_flagged() {
        let mut state = LexerState::new();
        state.open_paren(true);
        state.open_paren(false);
        assert!(!state.close_paren());
        assert!(state.close_paren());
        assert!(!state.close_paren());
        assert_eq!(state.depths.paren, 0);
    }
}
