//! The `loom ast` command.

use std::io::Write;

use loom_common::Limits;
use loom_parser::parse_with;

use super::{CommandError, Input};

/// Print the syntax tree. Diagnostics go to stderr as plain lines.
pub fn run(input: &Input, limits: &Limits) -> Result<(), CommandError> {
    let (program, diagnostics) = parse_with(&input.source, &input.options(limits));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{program:#?}")?;

    for diag in &diagnostics {
        eprintln!(
            "{}:{}:{}: {} [{}] {}",
            input.path, diag.start.line, diag.start.column, diag.severity, diag.code, diag.message
        );
    }
    Ok(())
}
