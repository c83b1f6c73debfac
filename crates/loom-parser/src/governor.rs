//! The safety governor: iteration caps and forced progress for parse loops.
//! 安全调节器：解析循环的迭代上限与强制前进。
//!
//! Every loop whose trip count depends on the input owns a [`LoopGuard`] and
//! consults it once per iteration through [`Parser::step`]. The guard never
//! changes what a well-formed file parses to; it only bounds the damage done
//! by adversarial or truncated input.

use loom_common::Span;
use loom_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode, Label};
use loom_lexer::TokenIndex;

use crate::parser::Parser;

/// Outcome of one governed iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The cursor moved since the previous iteration.
    Continue,
    /// The cursor has not moved since the previous iteration.
    Stuck,
    /// The loop ran more times than the configured cap.
    Exhausted,
}

/// Per-loop bookkeeping.
#[derive(Debug)]
pub struct LoopGuard {
    production: &'static str,
    max: usize,
    iterations: usize,
    last: Option<TokenIndex>,
}

impl LoopGuard {
    pub fn new(production: &'static str, max: usize) -> Self {
        Self {
            production,
            max,
            iterations: 0,
            last: None,
        }
    }

    pub fn production(&self) -> &'static str {
        self.production
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Record the cursor at the top of an iteration.
    pub fn step(&mut self, pos: TokenIndex) -> Step {
        self.iterations += 1;
        if self.iterations > self.max {
            return Step::Exhausted;
        }
        let stuck = self.last == Some(pos);
        self.last = Some(pos);
        if stuck { Step::Stuck } else { Step::Continue }
    }
}

impl<'a, 'src> Parser<'a, 'src> {
    pub(crate) fn loop_guard(&self, production: &'static str) -> LoopGuard {
        LoopGuard::new(production, self.limits.max_iterations)
    }

    /// Consult `guard` at the top of a loop iteration; `false` means break.
    ///
    /// A stuck cursor is reported and pushed forward by one token, so the
    /// caller always makes progress.
    pub(crate) fn step(&mut self, guard: &mut LoopGuard) -> bool {
        match guard.step(self.pos) {
            Step::Continue => true,
            Step::Stuck => {
                let span = self.current_span();
                tracing::debug!(production = guard.production(), ?span, "no progress, forcing advance");
                self.diagnostics.report(
                    Diagnostic::error(
                        ErrorCode::NoProgress,
                        span,
                        format!("parser made no progress in {}; skipping {}", guard.production(), self.found()),
                    )
                    .with_note("this is a recovery step, the surrounding code is likely malformed"),
                );
                self.notify_fault(ErrorCode::NoProgress, span);
                self.advance();
                // The forced step may have moved past the loop's own terminator.
                !self.at_end()
            }
            Step::Exhausted => {
                let span = self.current_span();
                tracing::debug!(
                    production = guard.production(),
                    max = self.limits.max_iterations,
                    "iteration limit reached"
                );
                self.diagnostics.report(
                    Diagnostic::error(
                        ErrorCode::IterationLimit,
                        span,
                        format!(
                            "{} exceeded the limit of {} iterations; the rest of it is skipped",
                            guard.production(),
                            self.limits.max_iterations
                        ),
                    )
                    .with_label(Label::new(span, "gave up here")),
                );
                self.notify_fault(ErrorCode::IterationLimit, span);
                false
            }
        }
    }

    fn notify_fault(&mut self, code: ErrorCode, span: Span) {
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.governor_fault(code, span);
        }
    }
}
