//! Integration tests for loom-lexer crate.

use loom_diagnostic::{DiagnosticSink, ErrorCode};
use loom_lexer::{Lexer, TokenIndex, TokenKind, scan};
use pretty_assertions::assert_eq;

fn kinds(source: &str) -> Vec<TokenKind> {
    let (stream, _) = scan(source);
    stream.all_tokens().iter().map(|t| t.kind).collect()
}

// ============================================================================
// Code Mode
// ============================================================================

#[test]
fn test_declaration_tokens() {
    use TokenKind::*;
    assert_eq!(
        kinds("const total = a + 1;"),
        vec![Const, Identifier, Eq, Identifier, Plus, Number, Semicolon, Eof]
    );
}

#[test]
fn test_contextual_words_are_identifiers() {
    for word in ["component", "type", "of", "as", "from", "get", "set", "undefined"] {
        assert_eq!(kinds(word), vec![TokenKind::Identifier, TokenKind::Eof], "{word}");
    }
}

#[test]
fn test_less_than_depends_on_context() {
    use TokenKind::*;
    assert_eq!(kinds("a < b"), vec![Identifier, Lt, Identifier, Eof]);
    assert_eq!(
        kinds("x = <b/>"),
        vec![Identifier, Eq, MarkupOpen, Identifier, MarkupSelfClose, Eof]
    );
}

#[test]
fn test_positions_are_one_based() {
    let (stream, _) = scan("let a\n  = 1");
    let eq = stream.get(TokenIndex::new(2));
    assert_eq!(eq.kind, TokenKind::Eq);
    assert_eq!((eq.line, eq.column), (2, 3));
    assert!(eq.newline_before);
}

#[test]
fn test_comments_are_trivia() {
    let (stream, diagnostics) = scan("a // note\n/* block */ b");
    assert!(diagnostics.is_empty());
    assert_eq!(stream.len(), 3);
    let trivia = stream.trivia_before(TokenIndex::new(1));
    assert_eq!(trivia.len(), 2);
    assert_eq!(trivia[0].kind, TokenKind::LineComment);
}

// ============================================================================
// Templates and Markup
// ============================================================================

#[test]
fn test_template_with_interpolation() {
    use TokenKind::*;
    assert_eq!(
        kinds("`a${b}c`"),
        vec![
            TemplateStart,
            TemplateChunk,
            TemplateExprStart,
            Identifier,
            TemplateExprEnd,
            TemplateChunk,
            TemplateEnd,
            Eof
        ]
    );
}

#[test]
fn test_markup_text_keeps_whitespace() {
    let (stream, _) = scan("<p>  two  words </p>");
    let text = stream.get(TokenIndex::new(3));
    assert_eq!(text.kind, TokenKind::MarkupText);
    assert_eq!(text.text, "  two  words ");
}

#[test]
fn test_markup_returns_to_code() {
    use TokenKind::*;
    assert_eq!(
        kinds("x = <a>{y}</a>; z"),
        vec![
            Identifier, Eq, MarkupOpen, Identifier, MarkupTagEnd, LBrace, Identifier, RBrace,
            MarkupCloseOpen, Identifier, MarkupTagEnd, Semicolon, Identifier, Eof
        ]
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unterminated_string_stops_at_line_end() {
    let (stream, diagnostics) = Lexer::new("x = 'open\ny").tokenize();
    assert_eq!(diagnostics.diagnostics()[0].code, ErrorCode::UnterminatedString);
    let last = stream.all_tokens().iter().rev().nth(1).map(|t| t.text);
    assert_eq!(last, Some("y"));
}

#[test]
fn test_every_stream_ends_with_eof() {
    for source in ["", "`unterminated ${", "<div attr=", "/* open", "'", "<>"] {
        let (stream, _) = scan(source);
        assert_eq!(
            stream.all_tokens().last().map(|t| t.kind),
            Some(TokenKind::Eof),
            "{source:?}"
        );
    }
}
