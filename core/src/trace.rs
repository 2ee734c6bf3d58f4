//! Evaluation trace types for debugging match behavior.
//!
//! [`Match::evaluate_with_trace`](crate::Match::evaluate_with_trace) returns
//! the same result as `evaluate()` plus the path taken: which arms were
//! tried, which one matched, and what it bound.
//!
//! # Example
//!
//! ```
//! use pmatch::{ds, Capture, Match, Pattern, Value};
//!
//! let x = Capture::new("x");
//! let m = Match::new()
//!     .arm(ds![1, Pattern::wildcard()], |_| "one")
//!     .arm(ds![Pattern::wildcard(), &x], |_| "other");
//!
//! let trace = m.evaluate_with_trace(&Value::from((2, 3)));
//! assert_eq!(trace.result, Some("other"));
//! assert_eq!(trace.steps.len(), 2);
//! assert!(!trace.steps[0].matched);
//! assert_eq!(trace.steps[1].bindings, vec![("x".to_string(), "3".to_string())]);
//! ```

use std::fmt;

/// Trace of a full [`Match`](crate::Match) evaluation.
///
/// # INV: `result` is what `evaluate()` returns
///
/// `None` here corresponds to [`MatchError::NonExhaustive`](crate::MatchError::NonExhaustive).
pub struct EvalTrace<R> {
    /// The handler's result, if any arm matched.
    pub result: Option<R>,
    /// One step per arm tried, in order. Stops after the first match.
    pub steps: Vec<EvalStep>,
}

impl<R> EvalTrace<R> {
    /// Index of the arm that matched, if any.
    #[must_use]
    pub fn matched_arm(&self) -> Option<usize> {
        self.steps.iter().find(|s| s.matched).map(|s| s.index)
    }
}

impl<R: fmt::Debug> fmt::Debug for EvalTrace<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalTrace")
            .field("result", &self.result)
            .field("steps", &self.steps)
            .finish()
    }
}

/// One arm attempt in a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalStep {
    /// Arm index (0-based, declaration order).
    pub index: usize,
    /// The arm's pattern (Debug format).
    pub pattern: String,
    /// Did the pattern (including its guards) match?
    pub matched: bool,
    /// `(capture name, value)` for every binding of a matching arm, in
    /// binding order. Empty for arms that did not match.
    pub bindings: Vec<(String, String)>,
}
