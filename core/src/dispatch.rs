//! Match — Arm dispatcher with first-match-wins semantics
//!
//! The `Match` is the entry point for evaluation. It holds arms in
//! declaration order, tries them one by one against the subject and runs
//! the handler of the first arm whose pattern matches.

use crate::{
    Arm, Bindings, EvalStep, EvalTrace, MatchError, Pattern, Shape, Value, MAX_ARMS,
};
use std::fmt;

/// A match expression: ordered arms sharing one result type.
///
/// # Type Parameters
///
/// - `'a`: Lifetime of borrowed patterns and handler captures
/// - `R`: The result type of every handler
///
/// # INV: First-match-wins
///
/// Arms are tried in order. The first matching pattern terminates
/// evaluation: its handler runs exactly once and no later pattern or guard
/// is evaluated.
///
/// # INV: Scope reset
///
/// Every arm attempt starts from an empty environment. Nothing bound by an
/// earlier arm, an earlier evaluation or an enclosing evaluation of the
/// same pattern (recursion) is visible to it.
///
/// # Example
///
/// ```
/// use pmatch::{ds, Capture, Match, Pattern, Value};
///
/// let i = Capture::new("i");
/// let j = Capture::new("j");
/// let calc = Match::new()
///     .arm(ds!['/', 0, Pattern::wildcard()], |_| 0)
///     .arm(ds!['*', &i, &j], {
///         let (i, j) = (i.clone(), j.clone());
///         move |b| b[&i].as_int().unwrap_or(0) * b[&j].as_int().unwrap_or(0)
///     })
///     .arm(Pattern::wildcard(), |_| -1);
///
/// assert_eq!(calc.evaluate(&Value::from(('*', 2, 1))).unwrap(), 2);
/// assert_eq!(calc.evaluate(&Value::from(('/', 2, 1))).unwrap(), -1);
/// ```
pub struct Match<'a, R> {
    arms: Vec<Arm<'a, R>>,
}

impl<'a, R> Match<'a, R> {
    /// An empty match. Evaluating it always fails as non-exhaustive.
    #[must_use]
    pub fn new() -> Self {
        Self { arms: Vec::new() }
    }

    /// Add an arm whose handler reads the bindings.
    #[must_use]
    pub fn arm<F>(self, pattern: impl Into<Pattern>, handler: F) -> Self
    where
        F: Fn(&Bindings<'_>) -> R + Send + Sync + 'a,
    {
        self.push(Arm::new(pattern, handler))
    }

    /// Add an arm whose handler also reads the subject.
    #[must_use]
    pub fn arm_with_subject<F>(self, pattern: impl Into<Pattern>, handler: F) -> Self
    where
        F: Fn(&Value, &Bindings<'_>) -> R + Send + Sync + 'a,
    {
        self.push(Arm::with_subject(pattern, handler))
    }

    /// Add an arm over a pattern that lives elsewhere, e.g. in a `static`.
    #[must_use]
    pub fn arm_ref<F>(self, pattern: &'a Pattern, handler: F) -> Self
    where
        F: Fn(&Value, &Bindings<'_>) -> R + Send + Sync + 'a,
    {
        self.push(Arm::borrowed(pattern, handler))
    }

    /// Add a prebuilt arm.
    #[must_use]
    pub fn push(mut self, arm: Arm<'a, R>) -> Self {
        self.arms.push(arm);
        self
    }

    /// Evaluate against `subject`.
    ///
    /// Returns the result of the first matching arm's handler.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NonExhaustive`] if no arm matches.
    #[tracing::instrument(level = "trace", skip_all, fields(arms = self.arms.len()))]
    pub fn evaluate(&self, subject: &Value) -> Result<R, MatchError> {
        let mut bindings = Bindings::new();
        for (index, arm) in self.arms.iter().enumerate() {
            bindings.clear();
            let matched = arm.pattern().matches(subject, &mut bindings);
            tracing::trace!(arm = index, matched, "arm attempted");
            if matched {
                tracing::debug!(arm = index, bound = bindings.len(), "arm selected");
                return Ok(arm.run(subject, &bindings));
            }
        }
        tracing::debug!(arms = self.arms.len(), subject = ?subject, "non-exhaustive match");
        Err(MatchError::NonExhaustive {
            arms: self.arms.len(),
            subject: format!("{subject:?}"),
        })
    }

    /// Evaluate, falling back to `default` instead of failing.
    pub fn evaluate_or(&self, subject: &Value, default: R) -> R {
        self.evaluate(subject).unwrap_or(default)
    }

    /// Evaluate with a per-arm trace for debugging.
    ///
    /// Same result as [`evaluate`](Self::evaluate); handlers run the same
    /// number of times.
    pub fn evaluate_with_trace(&self, subject: &Value) -> EvalTrace<R> {
        let mut steps = Vec::new();
        let mut bindings = Bindings::new();
        for (index, arm) in self.arms.iter().enumerate() {
            bindings.clear();
            let matched = arm.pattern().matches(subject, &mut bindings);
            steps.push(EvalStep {
                index,
                pattern: format!("{:?}", arm.pattern()),
                matched,
                bindings: if matched {
                    bindings.snapshot()
                } else {
                    Vec::new()
                },
            });
            if matched {
                return EvalTrace {
                    result: Some(arm.run(subject, &bindings)),
                    steps,
                };
            }
        }
        EvalTrace {
            result: None,
            steps,
        }
    }

    /// Check every arm against the shape of the subjects it will see.
    ///
    /// Call this once after building the match, before evaluating.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Shape`] for the first arm that can never match.
    pub fn validate(&self, shape: &Shape) -> Result<(), MatchError> {
        for (index, arm) in self.arms.iter().enumerate() {
            arm.pattern()
                .check_shape(shape)
                .map_err(|source| MatchError::Shape {
                    arm: index,
                    shape: shape.to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Validate against safety constraints.
    ///
    /// Checks:
    /// - Number of arms does not exceed [`MAX_ARMS`]
    /// - Every pattern passes [`Pattern::validate_limits`]
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::TooManyArms`], [`MatchError::DepthExceeded`] or
    /// [`MatchError::TooManyPatterns`].
    pub fn validate_limits(&self) -> Result<(), MatchError> {
        if self.arms.len() > MAX_ARMS {
            return Err(MatchError::TooManyArms {
                count: self.arms.len(),
                max: MAX_ARMS,
            });
        }
        self.arms
            .iter()
            .try_for_each(|arm| arm.pattern().validate_limits())
    }

    /// The deepest pattern nesting across all arms.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.arms
            .iter()
            .map(|arm| arm.pattern().depth())
            .max()
            .unwrap_or(0)
    }

    /// The arms, in declaration order.
    #[must_use]
    pub fn arms(&self) -> &[Arm<'a, R>] {
        &self.arms
    }

    /// Number of arms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arms.len()
    }

    /// Returns `true` if there are no arms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }
}

impl<R> Default for Match<'_, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for Match<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("arms", &self.arms)
            .finish()
    }
}
