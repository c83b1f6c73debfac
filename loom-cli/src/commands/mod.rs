//! CLI command implementations.

pub mod ast;
pub mod check;
pub mod diagnostics;
pub mod tokens;

use std::fs;

use loom_diagnostic::lsp::ExportError;
use thiserror::Error;

/// Why a command failed.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("cannot read file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("{0} error(s) found")]
    Diagnostics(usize),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
}

impl CommandError {
    /// `1` when the input has errors, `2` when the command itself could not run.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Diagnostics(_) => 1,
            _ => 2,
        }
    }
}

/// A source file read from disk.
pub struct Input {
    pub path: String,
    pub source: String,
}

impl Input {
    pub fn read(path: &str) -> Result<Self, CommandError> {
        let source = fs::read_to_string(path).map_err(|source| CommandError::Read {
            path: path.to_string(),
            source,
        })?;
        tracing::debug!(path, bytes = source.len(), "read input");
        Ok(Self {
            path: path.to_string(),
            source,
        })
    }

    pub fn options(&self, limits: &loom_common::Limits) -> loom_parser::ParseOptions {
        loom_parser::ParseOptions::new()
            .limits(*limits)
            .file_name(self.path.clone())
    }
}
