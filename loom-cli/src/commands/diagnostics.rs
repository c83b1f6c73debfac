//! The `loom diagnostics` command.

use std::io::Write;

use loom_common::Limits;
use loom_diagnostic::Diagnostic;
use loom_diagnostic::lsp::to_lsp_json;
use loom_parser::parse_checked;

use super::{CommandError, Input};
use crate::Format;

/// Print every diagnostic; exits non-zero when any is an error.
pub fn run(input: &Input, limits: &Limits, format: Format) -> Result<(), CommandError> {
    let result = parse_checked(&input.source, &input.options(limits));
    let diagnostics = &result.diagnostics;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        Format::Lsp => writeln!(out, "{}", to_lsp_json(diagnostics, &input.source, &input.path)?)?,
        Format::Text => {
            for diag in diagnostics {
                writeln!(out, "{}", text_line(&input.path, diag))?;
            }
        }
    }

    if result.has_errors() {
        return Err(CommandError::Diagnostics(result.error_count()));
    }
    Ok(())
}

fn text_line(path: &str, diag: &Diagnostic) -> String {
    format!(
        "{}:{}:{}: {} [{}] {}",
        path, diag.start.line, diag.start.column, diag.severity, diag.code, diag.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_parser::parse;

    #[test]
    fn text_line_uses_one_based_positions() {
        let (_, diagnostics) = parse("let x = ;");
        let line = text_line("main.loom", &diagnostics[0]);
        assert!(line.starts_with("main.loom:1:9: error [E0101]"), "{line}");
    }
}
