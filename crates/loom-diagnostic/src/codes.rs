//! Error codes for Loom diagnostics.

use crate::DiagnosticKind;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lexer (E0001 - E0099)
    UnexpectedCharacter,
    UnterminatedString,
    UnterminatedComment,
    InvalidEscape,
    InvalidNumber,
    DeprecatedNumber,
    UnterminatedTemplate,
    UnterminatedRegex,
    UnterminatedMarkup,
    StrayMarkupCharacter,

    // Parser (E0100 - E0199)
    UnexpectedToken,
    ExpectedExpression,
    ExpectedPattern,
    ExpectedType,
    UnclosedDelimiter,
    MissingSemicolon,
    ExpectedIdentifier,
    InvalidAssignmentTarget,
    MismatchedClosingTag,
    UnclosedElement,
    StrayClosingTag,
    InvalidAttribute,
    UnsupportedConstruct,
    NestingTooDeep,

    // Governor (E0200 - E0299)
    IterationLimit,
    NoProgress,

    // Collector (E0300 - E0399)
    DiagnosticOverflow,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::UnexpectedCharacter => "E0001",
            ErrorCode::UnterminatedString => "E0002",
            ErrorCode::UnterminatedComment => "E0003",
            ErrorCode::InvalidEscape => "E0004",
            ErrorCode::InvalidNumber => "E0005",
            ErrorCode::DeprecatedNumber => "E0006",
            ErrorCode::UnterminatedTemplate => "E0007",
            ErrorCode::UnterminatedRegex => "E0008",
            ErrorCode::UnterminatedMarkup => "E0009",
            ErrorCode::StrayMarkupCharacter => "E0010",

            // Parser
            ErrorCode::UnexpectedToken => "E0100",
            ErrorCode::ExpectedExpression => "E0101",
            ErrorCode::ExpectedPattern => "E0102",
            ErrorCode::ExpectedType => "E0103",
            ErrorCode::UnclosedDelimiter => "E0104",
            ErrorCode::MissingSemicolon => "E0105",
            ErrorCode::ExpectedIdentifier => "E0106",
            ErrorCode::InvalidAssignmentTarget => "E0107",
            ErrorCode::MismatchedClosingTag => "E0108",
            ErrorCode::UnclosedElement => "E0109",
            ErrorCode::StrayClosingTag => "E0110",
            ErrorCode::InvalidAttribute => "E0111",
            ErrorCode::UnsupportedConstruct => "E0112",
            ErrorCode::NestingTooDeep => "E0113",

            // Governor
            ErrorCode::IterationLimit => "E0200",
            ErrorCode::NoProgress => "E0201",

            // Collector
            ErrorCode::DiagnosticOverflow => "E0300",
        }
    }

    /// The stage that reports this code.
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            ErrorCode::UnexpectedCharacter
            | ErrorCode::UnterminatedString
            | ErrorCode::UnterminatedComment
            | ErrorCode::InvalidEscape
            | ErrorCode::InvalidNumber
            | ErrorCode::DeprecatedNumber
            | ErrorCode::UnterminatedTemplate
            | ErrorCode::UnterminatedRegex
            | ErrorCode::UnterminatedMarkup
            | ErrorCode::StrayMarkupCharacter => DiagnosticKind::Lexer,
            ErrorCode::IterationLimit | ErrorCode::NoProgress => DiagnosticKind::Governor,
            ErrorCode::DiagnosticOverflow => DiagnosticKind::Collector,
            _ => DiagnosticKind::Parser,
        }
    }

    /// Get a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::UnexpectedCharacter => "unexpected character in input",
            ErrorCode::UnterminatedString => "string literal is not terminated",
            ErrorCode::UnterminatedComment => "comment is not terminated",
            ErrorCode::InvalidEscape => "invalid escape sequence in string",
            ErrorCode::InvalidNumber => "malformed number literal",
            ErrorCode::DeprecatedNumber => "deprecated number literal form",
            ErrorCode::UnterminatedTemplate => "template literal is not terminated",
            ErrorCode::UnterminatedRegex => "regular expression literal is not terminated",
            ErrorCode::UnterminatedMarkup => "markup element is not terminated",
            ErrorCode::StrayMarkupCharacter => "character is not allowed here in markup",

            // Parser
            ErrorCode::UnexpectedToken => "unexpected token",
            ErrorCode::ExpectedExpression => "expected an expression",
            ErrorCode::ExpectedPattern => "expected a binding pattern",
            ErrorCode::ExpectedType => "expected a type",
            ErrorCode::UnclosedDelimiter => "unclosed delimiter",
            ErrorCode::MissingSemicolon => "missing semicolon",
            ErrorCode::ExpectedIdentifier => "expected an identifier",
            ErrorCode::InvalidAssignmentTarget => "invalid assignment target",
            ErrorCode::MismatchedClosingTag => "closing tag does not match opening tag",
            ErrorCode::UnclosedElement => "markup element is not closed",
            ErrorCode::StrayClosingTag => "closing tag without a matching opening tag",
            ErrorCode::InvalidAttribute => "malformed markup attribute",
            ErrorCode::UnsupportedConstruct => "construct is not supported",
            ErrorCode::NestingTooDeep => "nesting exceeds the configured depth",

            // Governor
            ErrorCode::IterationLimit => "loop iteration limit exceeded",
            ErrorCode::NoProgress => "parser made no progress",

            // Collector
            ErrorCode::DiagnosticOverflow => "too many diagnostics",
        }
    }

    /// Get a suggested fix for the error, if available.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ErrorCode::UnterminatedString => Some("add the matching closing quote"),
            ErrorCode::UnterminatedComment => Some("add `*/` to close the comment"),
            ErrorCode::UnterminatedTemplate => Some("add a closing backtick"),
            ErrorCode::MissingSemicolon => Some("add `;` at the end of the statement"),
            ErrorCode::UnclosedDelimiter => Some("add the matching closing delimiter"),
            ErrorCode::StrayMarkupCharacter => Some("wrap the character in an expression, e.g. `{'<'}`"),
            ErrorCode::UnsupportedConstruct => {
                Some("rewrite the code without generators or async control flow")
            }
            ErrorCode::NestingTooDeep => Some("split the expression into smaller named parts"),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
