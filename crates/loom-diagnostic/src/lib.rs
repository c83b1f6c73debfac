//! Diagnostic and error reporting for Loom.
//! Loom 的诊断和错误报告。
//!
//! Diagnostics are collected by [`DiagnosticCollector`], rendered for terminals
//! with ariadne, and exported for editors through [`lsp`].

mod codes;
mod collector;
mod diagnostic;
pub mod lsp;

pub use codes::ErrorCode;
pub use collector::{Checkpoint, DiagnosticCollector, DiagnosticSink};
pub use diagnostic::{Diagnostic, DiagnosticKind, Label, Severity};

use ariadne::{ColorGenerator, Config, Label as AriadneLabel, Report, ReportKind, Source};

fn build_report<'a>(
    filename: &'a str,
    diagnostic: &'a Diagnostic,
    color: bool,
) -> Report<'a, (&'a str, std::ops::Range<usize>)> {
    let kind = match diagnostic.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
    };

    let mut colors = ColorGenerator::new();
    let mut report = Report::build(kind, filename, diagnostic.span.start.0 as usize)
        .with_config(Config::default().with_color(color))
        .with_code(diagnostic.code.as_str())
        .with_message(&diagnostic.message)
        .with_label(
            AriadneLabel::new((filename, diagnostic.span.range()))
                .with_message(diagnostic.code.description())
                .with_color(colors.next()),
        );

    for label in &diagnostic.labels {
        let ariadne_label = AriadneLabel::new((filename, label.span.range()))
            .with_message(&label.message)
            .with_color(colors.next());
        report = report.with_label(ariadne_label);
    }

    for note in &diagnostic.notes {
        report = report.with_note(note);
    }

    if let Some(help) = &diagnostic.suggestion {
        report = report.with_help(help);
    }

    report.finish()
}

/// Render a diagnostic to stderr.
/// 将诊断信息渲染到标准错误输出。
pub fn emit(source: &str, filename: &str, diagnostic: &Diagnostic) -> std::io::Result<()> {
    build_report(filename, diagnostic, true).eprint((filename, Source::from(source)))
}

/// Render a diagnostic without colors, for logs and tests.
/// 不带颜色地渲染诊断信息。
pub fn render(source: &str, filename: &str, diagnostic: &Diagnostic) -> std::io::Result<String> {
    let mut out = Vec::new();
    build_report(filename, diagnostic, false).write((filename, Source::from(source)), &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_common::Span;

    #[test]
    fn render_includes_code_and_message() {
        let source = "let x = ;";
        let diag = Diagnostic::error(
            ErrorCode::ExpectedExpression,
            Span::from_usize(8, 9),
            "expected an expression, found `;`",
        );
        let text = render(source, "main.loom", &diag).unwrap();
        assert!(text.contains("E0101"));
        assert!(text.contains("expected an expression, found `;`"));
        assert!(text.contains("main.loom"));
    }
}
