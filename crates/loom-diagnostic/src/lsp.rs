//! Export to the editor-protocol diagnostic shape.
//!
//! Diagnostics carry 1-based line/column pairs counted in characters. Editor
//! ranges are 0-based and count UTF-16 code units, so they are recomputed from
//! the byte spans against the source text.

use loom_common::{LineIndex, Span};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Diagnostic;

/// Source name attached to exported diagnostics.
pub const LSP_SOURCE: &str = "loom";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize diagnostics: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LspPosition {
    pub line: u32,
    pub character: u32,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LspRange {
    pub start: LspPosition,
    pub end: LspPosition,
}

impl LspRange {
    pub fn of(span: Span, index: &LineIndex<'_>) -> Self {
        let position = |pos| {
            let (line, character) = index.utf16_line_col(pos);
            LspPosition { line, character }
        };
        Self {
            start: position(span.start),
            end: position(span.end),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LspLocation {
    pub uri: String,
    pub range: LspRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LspRelatedInformation {
    pub location: LspLocation,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LspDiagnostic {
    pub range: LspRange,
    pub severity: u8,
    pub code: String,
    pub source: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<LspRelatedInformation>,
}

/// Convert one diagnostic. `index` must be built over the source the
/// diagnostic was reported against; `uri` names the file in related links.
pub fn to_lsp(diagnostic: &Diagnostic, index: &LineIndex<'_>, uri: &str) -> LspDiagnostic {
    let related_information = diagnostic
        .labels
        .iter()
        .map(|label| LspRelatedInformation {
            location: LspLocation {
                uri: uri.to_string(),
                range: LspRange::of(label.span, index),
            },
            message: label.message.clone(),
        })
        .collect();

    let mut message = diagnostic.message.clone();
    if let Some(suggestion) = &diagnostic.suggestion {
        message.push_str("\nhelp: ");
        message.push_str(suggestion);
    }

    LspDiagnostic {
        range: LspRange::of(diagnostic.span, index),
        severity: diagnostic.severity.lsp_code(),
        code: diagnostic.code.as_str().to_string(),
        source: LSP_SOURCE.to_string(),
        message,
        related_information,
    }
}

/// Convert a batch reported against `source` and serialize it as a JSON array.
pub fn to_lsp_json(
    diagnostics: &[Diagnostic],
    source: &str,
    uri: &str,
) -> Result<String, ExportError> {
    let index = LineIndex::new(source);
    let records: Vec<LspDiagnostic> = diagnostics
        .iter()
        .map(|d| to_lsp(d, &index, uri))
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiagnosticCollector, DiagnosticSink, ErrorCode, Label};
    use loom_common::Span;
    use pretty_assertions::assert_eq;

    #[test]
    fn ranges_are_zero_based() {
        let mut collector = DiagnosticCollector::new("let x\n  = ;", 100);
        collector.report(
            Diagnostic::error(ErrorCode::ExpectedExpression, Span::from_usize(10, 11), "expected an expression")
                .with_label(Label::new(Span::from_usize(4, 5), "binding declared here")),
        );
        let lsp = to_lsp(&collector.diagnostics()[0], collector.line_index(), "app.loom");

        assert_eq!(lsp.range.start, LspPosition { line: 1, character: 4 });
        assert_eq!(lsp.range.end, LspPosition { line: 1, character: 5 });
        assert_eq!(lsp.severity, 1);
        assert_eq!(lsp.code, "E0101");
        assert_eq!(lsp.source, "loom");
        assert_eq!(lsp.related_information.len(), 1);
        assert_eq!(
            lsp.related_information[0].location.range.start,
            LspPosition { line: 0, character: 4 }
        );
    }

    #[test]
    fn json_uses_editor_field_names() {
        let mut collector = DiagnosticCollector::new("08", 100);
        collector.add_warning(ErrorCode::DeprecatedNumber, "leading zero", Span::from_usize(0, 2), None);
        let json = to_lsp_json(collector.diagnostics(), "08", "a.loom").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["severity"], 2);
        assert_eq!(value[0]["range"]["end"]["character"], 2);
        assert!(value[0].get("relatedInformation").is_none());
    }

    #[test]
    fn characters_are_utf16_units() {
        let source = "s = '\u{1F600}' ?";
        let mut collector = DiagnosticCollector::new(source, 100);
        collector.add_error(ErrorCode::UnexpectedToken, "unexpected `?`", Span::from_usize(11, 12), None);
        let diagnostic = &collector.diagnostics()[0];
        // Eight characters precede `?`, one of them outside the BMP.
        assert_eq!(diagnostic.start.column, 9);

        let lsp = to_lsp(diagnostic, collector.line_index(), "a.loom");
        assert_eq!(lsp.range.start, LspPosition { line: 0, character: 9 });
        assert_eq!(lsp.range.end, LspPosition { line: 0, character: 10 });
    }
}
