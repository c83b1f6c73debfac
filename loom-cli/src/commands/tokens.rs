//! The `loom tokens` command.

use std::io::Write;

use loom_common::Limits;
use loom_lexer::{Lexer, Token, TokenIndex, TokenKind};

use super::{CommandError, Input};

/// Print one token per line: kind, `line:column`, text.
pub fn run(input: &Input, limits: &Limits, trivia: bool) -> Result<(), CommandError> {
    let (tokens, diagnostics) = Lexer::with_limits(&input.source, limits).tokenize();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (i, token) in tokens.iter().enumerate() {
        if trivia {
            for comment in tokens.trivia_before(TokenIndex::new(i)) {
                writeln!(out, "{}", format_token(comment))?;
            }
        }
        writeln!(out, "{}", format_token(token))?;
    }

    let errors = diagnostics.error_count();
    if errors > 0 {
        return Err(CommandError::Diagnostics(errors));
    }
    Ok(())
}

fn format_token(token: &Token<'_>) -> String {
    let text = match token.kind {
        TokenKind::Eof => String::new(),
        _ => format!("{:?}", token.text),
    };
    format!(
        "{:<18} {:>4}:{:<4} {}",
        format!("{:?}", token.kind),
        token.line,
        token.column,
        text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_line_shows_kind_position_and_text() {
        let (tokens, _) = Lexer::new("let\n  x").tokenize();
        let x = tokens.get(TokenIndex::new(1));
        let line = format_token(x);
        assert!(line.starts_with("Identifier"));
        assert!(line.contains("2:3"));
        assert!(line.ends_with("\"x\""));
    }
}
