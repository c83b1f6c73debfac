//! The `loom check` command.
//! `loom check` 命令。

use loom_common::Limits;
use loom_diagnostic::emit;
use loom_parser::parse_checked;

use super::{CommandError, Input};
use crate::output;

/// Parse a Loom file and render its diagnostics.
/// 解析 Loom 文件并渲染诊断信息。
pub fn run(input: &Input, limits: &Limits, verbose: bool, quiet: bool) -> Result<(), CommandError> {
    let result = parse_checked(&input.source, &input.options(limits));

    for diag in &result.diagnostics {
        emit(&input.source, &input.path, diag)?;
    }

    if verbose {
        output::info(&format!(
            "parsed {} top-level statements",
            result.program.body.len()
        ));
    }

    // Counted by the collector so errors dropped after the cap still fail the check.
    let errors = result.error_count();
    let warnings = result.diagnostics.iter().filter(|d| !d.is_error()).count();
    if result.has_errors() {
        return Err(CommandError::Diagnostics(errors));
    }

    if !quiet {
        if warnings > 0 {
            output::warning(&output::summary(&input.path, errors, warnings));
        } else {
            output::success(&format!("{}: no problems found", input.path));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_after_a_full_cap_fails_the_check() {
        let input = Input {
            path: "flood.loom".to_string(),
            source: format!("{}let = ;", "x = 08;\n".repeat(10)),
        };
        let limits = Limits::new().max_diagnostics(10);
        let err = run(&input, &limits, false, true).unwrap_err();
        assert!(matches!(err, CommandError::Diagnostics(n) if n >= 1));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn warnings_alone_pass() {
        let input = Input {
            path: "warn.loom".to_string(),
            source: "x = 08;\n".to_string(),
        };
        assert!(run(&input, &Limits::default(), false, true).is_ok());
    }
}
