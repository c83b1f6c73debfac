//! Safety valves shared by the lexer and parser.

use serde::{Deserialize, Serialize};

/// Default cap on stored diagnostics before overflow collapses into one warning.
pub const DEFAULT_MAX_DIAGNOSTICS: usize = 100;
/// Default per-loop iteration guard.
pub const DEFAULT_MAX_ITERATIONS: usize = 50_000;
/// Default bound on nested constructs (expressions, blocks, elements, types).
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 100;

/// Limits are advisory safety valves, not semantic options: changing them never
/// changes how well-formed input parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_diagnostics: usize,
    pub max_iterations: usize,
    pub max_nesting_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_diagnostics: DEFAULT_MAX_DIAGNOSTICS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl Limits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_diagnostics(mut self, max: usize) -> Self {
        self.max_diagnostics = max;
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    pub fn max_nesting_depth(mut self, max: usize) -> Self {
        self.max_nesting_depth = max.max(1);
        self
    }
}
