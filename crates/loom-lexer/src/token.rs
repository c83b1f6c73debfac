//! Token definitions for Loom.
//! Loom 的 token 定义。

use std::fmt;

use loom_common::Span;

/// A token with its kind, source text and position.
/// 带有种类、源文本和位置的 token。
///
/// Tokens borrow their text from the source and are never mutated once the
/// stream is built. Literal values are cooked on demand (see `cook`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Span,
    /// 1-based line of the first character.
    pub line: u32,
    /// 1-based column (in characters) of the first character.
    pub column: u32,
    /// Whitespace or a comment containing a line break precedes this token.
    pub newline_before: bool,
}

impl<'src> Token<'src> {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// True for an identifier with exactly this text (contextual keywords).
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == word
    }
}

/// The kind of a token.
/// token 的种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Identifier,
    Number,
    String,
    Regex,

    // Template literal fragments
    /// Opening backtick
    TemplateStart,
    /// Literal text between interpolations
    TemplateChunk,
    /// `${`
    TemplateExprStart,
    /// `}` closing an interpolation
    TemplateExprEnd,
    /// Closing backtick
    TemplateEnd,

    // Keywords
    Let,
    Const,
    Var,
    Function,
    Return,
    If,
    Else,
    For,
    While,
    Do,
    Break,
    Continue,
    Switch,
    Case,
    Default,
    Throw,
    Try,
    Catch,
    Finally,
    Import,
    Export,
    New,
    Typeof,
    Instanceof,
    In,
    Delete,
    Void,
    This,
    True,
    False,
    Null,
    Async,
    Await,
    Yield,

    // Delimiters
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    LBrace,   // {
    RBrace,   // }

    // Punctuation
    Semicolon,    // ;
    Comma,        // ,
    Dot,          // .
    Ellipsis,     // ...
    Colon,        // :
    Question,     // ?
    QuestionDot,  // ?.
    Arrow,        // =>

    // Operators
    Plus,            // +
    Minus,           // -
    Star,            // *
    StarStar,        // **
    Slash,           // /
    Percent,         // %
    PlusPlus,        // ++
    MinusMinus,      // --
    Lt,              // <
    LtEq,            // <=
    Gt,              // >
    GtEq,            // >=
    Shl,             // <<
    EqEq,            // ==
    EqEqEq,          // ===
    BangEq,          // !=
    BangEqEq,        // !==
    Amp,             // &
    AmpAmp,          // &&
    Pipe,            // |
    PipePipe,        // ||
    Caret,           // ^
    Tilde,           // ~
    Bang,            // !
    QuestionQuestion, // ??

    // Assignment
    Eq,                 // =
    PlusEq,             // +=
    MinusEq,            // -=
    StarEq,             // *=
    StarStarEq,         // **=
    SlashEq,            // /=
    PercentEq,          // %=
    ShlEq,              // <<=
    AmpEq,              // &=
    PipeEq,             // |=
    CaretEq,            // ^=
    AmpAmpEq,           // &&=
    PipePipeEq,         // ||=
    QuestionQuestionEq, // ??=

    // Markup
    /// `<` opening a tag
    MarkupOpen,
    /// `</`
    MarkupCloseOpen,
    /// `>` ending a tag
    MarkupTagEnd,
    /// `/>`
    MarkupSelfClose,
    /// Raw text between tags, whitespace included
    MarkupText,

    // Trivia
    LineComment,
    BlockComment,

    // Special
    Error,
    Eof,
}

impl TokenKind {
    /// Check if this token is a keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Let
                | TokenKind::Const
                | TokenKind::Var
                | TokenKind::Function
                | TokenKind::Return
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::For
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Switch
                | TokenKind::Case
                | TokenKind::Default
                | TokenKind::Throw
                | TokenKind::Try
                | TokenKind::Catch
                | TokenKind::Finally
                | TokenKind::Import
                | TokenKind::Export
                | TokenKind::New
                | TokenKind::Typeof
                | TokenKind::Instanceof
                | TokenKind::In
                | TokenKind::Delete
                | TokenKind::Void
                | TokenKind::This
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::Async
                | TokenKind::Await
                | TokenKind::Yield
        )
    }

    /// Comments are kept in the stream but hidden from the parser.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// Check if this token is an assignment operator.
    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::StarEq
                | TokenKind::StarStarEq
                | TokenKind::SlashEq
                | TokenKind::PercentEq
                | TokenKind::ShlEq
                | TokenKind::AmpEq
                | TokenKind::PipeEq
                | TokenKind::CaretEq
                | TokenKind::AmpAmpEq
                | TokenKind::PipePipeEq
                | TokenKind::QuestionQuestionEq
        )
    }

    /// Whether an expression may begin right after this token.
    ///
    /// Drives both `<` (markup vs. less-than) and `/` (regex vs. division).
    pub fn leaves_expression_start(&self) -> bool {
        match self {
            TokenKind::Identifier
            | TokenKind::Number
            | TokenKind::String
            | TokenKind::Regex
            | TokenKind::TemplateEnd
            | TokenKind::This
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null
            | TokenKind::RParen
            | TokenKind::RBracket
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus
            | TokenKind::MarkupTagEnd
            | TokenKind::MarkupSelfClose => false,
            _ => true,
        }
    }

    /// Keywords whose parenthesised head is followed by a statement.
    pub fn takes_paren_head(&self) -> bool {
        matches!(self, TokenKind::If | TokenKind::While | TokenKind::For)
    }

    /// Look up a keyword by its spelling.
    /// 根据拼写查找关键字。
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        let kind = match s {
            "let" => TokenKind::Let,
            "const" => TokenKind::Const,
            "var" => TokenKind::Var,
            "function" => TokenKind::Function,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "default" => TokenKind::Default,
            "throw" => TokenKind::Throw,
            "try" => TokenKind::Try,
            "catch" => TokenKind::Catch,
            "finally" => TokenKind::Finally,
            "import" => TokenKind::Import,
            "export" => TokenKind::Export,
            "new" => TokenKind::New,
            "typeof" => TokenKind::Typeof,
            "instanceof" => TokenKind::Instanceof,
            "in" => TokenKind::In,
            "delete" => TokenKind::Delete,
            "void" => TokenKind::Void,
            "this" => TokenKind::This,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "async" => TokenKind::Async,
            "await" => TokenKind::Await,
            "yield" => TokenKind::Yield,
            _ => return None,
        };
        Some(kind)
    }

    /// Short human-readable form used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Regex => "regular expression",
            TokenKind::TemplateStart | TokenKind::TemplateEnd => "`` ` ``",
            TokenKind::TemplateChunk => "template text",
            TokenKind::TemplateExprStart => "`${`",
            TokenKind::TemplateExprEnd => "`}`",
            TokenKind::Let => "`let`",
            TokenKind::Const => "`const`",
            TokenKind::Var => "`var`",
            TokenKind::Function => "`function`",
            TokenKind::Return => "`return`",
            TokenKind::If => "`if`",
            TokenKind::Else => "`else`",
            TokenKind::For => "`for`",
            TokenKind::While => "`while`",
            TokenKind::Do => "`do`",
            TokenKind::Break => "`break`",
            TokenKind::Continue => "`continue`",
            TokenKind::Switch => "`switch`",
            TokenKind::Case => "`case`",
            TokenKind::Default => "`default`",
            TokenKind::Throw => "`throw`",
            TokenKind::Try => "`try`",
            TokenKind::Catch => "`catch`",
            TokenKind::Finally => "`finally`",
            TokenKind::Import => "`import`",
            TokenKind::Export => "`export`",
            TokenKind::New => "`new`",
            TokenKind::Typeof => "`typeof`",
            TokenKind::Instanceof => "`instanceof`",
            TokenKind::In => "`in`",
            TokenKind::Delete => "`delete`",
            TokenKind::Void => "`void`",
            TokenKind::This => "`this`",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::Null => "`null`",
            TokenKind::Async => "`async`",
            TokenKind::Await => "`await`",
            TokenKind::Yield => "`yield`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Comma => "`,`",
            TokenKind::Dot => "`.`",
            TokenKind::Ellipsis => "`...`",
            TokenKind::Colon => "`:`",
            TokenKind::Question => "`?`",
            TokenKind::QuestionDot => "`?.`",
            TokenKind::Arrow => "`=>`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::StarStar => "`**`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::PlusPlus => "`++`",
            TokenKind::MinusMinus => "`--`",
            TokenKind::Lt => "`<`",
            TokenKind::LtEq => "`<=`",
            TokenKind::Gt => "`>`",
            TokenKind::GtEq => "`>=`",
            TokenKind::Shl => "`<<`",
            TokenKind::EqEq => "`==`",
            TokenKind::EqEqEq => "`===`",
            TokenKind::BangEq => "`!=`",
            TokenKind::BangEqEq => "`!==`",
            TokenKind::Amp => "`&`",
            TokenKind::AmpAmp => "`&&`",
            TokenKind::Pipe => "`|`",
            TokenKind::PipePipe => "`||`",
            TokenKind::Caret => "`^`",
            TokenKind::Tilde => "`~`",
            TokenKind::Bang => "`!`",
            TokenKind::QuestionQuestion => "`??`",
            TokenKind::Eq => "`=`",
            TokenKind::PlusEq => "`+=`",
            TokenKind::MinusEq => "`-=`",
            TokenKind::StarEq => "`*=`",
            TokenKind::StarStarEq => "`**=`",
            TokenKind::SlashEq => "`/=`",
            TokenKind::PercentEq => "`%=`",
            TokenKind::ShlEq => "`<<=`",
            TokenKind::AmpEq => "`&=`",
            TokenKind::PipeEq => "`|=`",
            TokenKind::CaretEq => "`^=`",
            TokenKind::AmpAmpEq => "`&&=`",
            TokenKind::PipePipeEq => "`||=`",
            TokenKind::QuestionQuestionEq => "`??=`",
            TokenKind::MarkupOpen => "`<`",
            TokenKind::MarkupCloseOpen => "`</`",
            TokenKind::MarkupTagEnd => "`>`",
            TokenKind::MarkupSelfClose => "`/>`",
            TokenKind::MarkupText => "markup text",
            TokenKind::LineComment | TokenKind::BlockComment => "comment",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip_through_lookup() {
        for word in ["let", "function", "instanceof", "yield", "null"] {
            let kind = TokenKind::keyword_from_str(word).unwrap();
            assert!(kind.is_keyword());
        }
        // Contextual words stay identifiers.
        for word in ["component", "type", "of", "as", "from", "undefined"] {
            assert_eq!(TokenKind::keyword_from_str(word), None);
        }
    }

    #[test]
    fn operands_end_expression_start() {
        assert!(!TokenKind::Identifier.leaves_expression_start());
        assert!(!TokenKind::RParen.leaves_expression_start());
        assert!(TokenKind::Return.leaves_expression_start());
        assert!(TokenKind::LParen.leaves_expression_start());
        assert!(TokenKind::Arrow.leaves_expression_start());
    }
}
