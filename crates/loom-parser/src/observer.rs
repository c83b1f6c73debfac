//! Optional side channel for watching a parse.
//!
//! An observer is passed explicitly to [`parse_observed`](crate::parse_observed);
//! the parser never reaches for one on its own, and the tree and diagnostics
//! are identical with or without it.

use loom_common::Span;
use loom_diagnostic::ErrorCode;

/// Callbacks fired while parsing. All methods default to doing nothing.
pub trait ParseObserver {
    /// A production started at `at`.
    fn enter(&mut self, production: &'static str, at: Span) {
        let _ = (production, at);
    }

    /// A production finished, covering `span`.
    fn exit(&mut self, production: &'static str, span: Span) {
        let _ = (production, span);
    }

    /// A speculative parse of `production` failed and the cursor went back to `to`.
    fn backtrack(&mut self, production: &'static str, to: Span) {
        let _ = (production, to);
    }

    /// The safety governor intervened.
    fn governor_fault(&mut self, code: ErrorCode, at: Span) {
        let _ = (code, at);
    }
}

/// One recorded callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Enter { production: &'static str, at: Span },
    Exit { production: &'static str, span: Span },
    Backtrack { production: &'static str, to: Span },
    GovernorFault { code: ErrorCode, at: Span },
}

/// Records every callback in order.
#[derive(Debug, Default)]
pub struct ProductionTrace {
    events: Vec<TraceEvent>,
    depth: usize,
    max_depth: usize,
}

impl ProductionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// How many times `production` was entered.
    pub fn entered(&self, production: &str) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Enter { production: p, .. } if *p == production))
            .count()
    }

    pub fn backtracks(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Backtrack { .. }))
            .count()
    }

    pub fn faults(&self) -> impl Iterator<Item = ErrorCode> + '_ {
        self.events.iter().filter_map(|e| match e {
            TraceEvent::GovernorFault { code, .. } => Some(*code),
            _ => None,
        })
    }

    /// Deepest nesting of observed productions.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Every `enter` was matched by an `exit`.
    pub fn is_balanced(&self) -> bool {
        self.depth == 0
    }
}

impl ParseObserver for ProductionTrace {
    fn enter(&mut self, production: &'static str, at: Span) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.events.push(TraceEvent::Enter { production, at });
    }

    fn exit(&mut self, production: &'static str, span: Span) {
        self.depth = self.depth.saturating_sub(1);
        self.events.push(TraceEvent::Exit { production, span });
    }

    fn backtrack(&mut self, production: &'static str, to: Span) {
        self.events.push(TraceEvent::Backtrack { production, to });
    }

    fn governor_fault(&mut self, code: ErrorCode, at: Span) {
        self.events.push(TraceEvent::GovernorFault { code, at });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_tracks_depth() {
        let mut trace = ProductionTrace::new();
        let at = Span::from_usize(0, 0);
        trace.enter("statement", at);
        trace.enter("expression", at);
        trace.exit("expression", at);
        trace.exit("statement", at);
        assert_eq!(trace.max_depth(), 2);
        assert!(trace.is_balanced());
        assert_eq!(trace.entered("expression"), 1);
        assert_eq!(trace.events().len(), 4);
    }
}
