//! Combinator evaluator
//!
//! `match_subject` is the recursive core. Its contract: on success the
//! environment holds every binding the pattern made; on failure the
//! environment is exactly as it was on entry. Each call records the length
//! of the binding trail and truncates back to it when the pattern fails,
//! which gives `Or` clean branches and keeps `Not` from leaking, without a
//! separate reset walk.

use crate::{Bindings, Bound, CaptureMode, Pattern, Value};
use std::borrow::Cow;

/// A value being matched and whether it lives inside the subject.
///
/// `Anchored` values outlive the evaluation and can be captured by
/// reference. `Detached` values were computed by a projection and only live
/// for the current frame; borrowed captures of them fall back to a clone.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Subject<'a, 'v> {
    Anchored(&'v Value),
    Detached(&'a Value),
}

impl<'a, 'v: 'a> Subject<'a, 'v> {
    pub(crate) fn value(self) -> &'a Value {
        match self {
            Self::Anchored(v) => v,
            Self::Detached(v) => v,
        }
    }
}

/// Tuple positions being matched, anchored or detached like [`Subject`].
#[derive(Debug, Clone, Copy)]
pub(crate) enum Positions<'a, 'v> {
    Anchored(&'v [Value]),
    Detached(&'a [Value]),
}

impl<'a, 'v: 'a> Positions<'a, 'v> {
    pub(crate) fn len(self) -> usize {
        match self {
            Self::Anchored(items) => items.len(),
            Self::Detached(items) => items.len(),
        }
    }

    pub(crate) fn get(self, index: usize) -> Option<Subject<'a, 'v>> {
        match self {
            Self::Anchored(items) => items.get(index).map(Subject::Anchored),
            Self::Detached(items) => items.get(index).map(Subject::Detached),
        }
    }
}

impl Pattern {
    /// Match `value`, recording bindings in `bindings`.
    ///
    /// Bindings already present act as constraints: a capture that is bound
    /// is compared, not rebound. On failure `bindings` is left unchanged.
    ///
    /// Literals of a different kind than the value simply do not match;
    /// use [`Pattern::check_shape`] to reject such pairings up front.
    pub fn matches<'v>(&self, value: &'v Value, bindings: &mut Bindings<'v>) -> bool {
        self.match_subject(Subject::Anchored(value), bindings)
    }

    /// Match `value` in a fresh environment and discard the bindings.
    #[must_use]
    pub fn is_match(&self, value: &Value) -> bool {
        self.matches(value, &mut Bindings::new())
    }

    pub(crate) fn match_subject<'a, 'v: 'a>(
        &self,
        subject: Subject<'a, 'v>,
        env: &mut Bindings<'v>,
    ) -> bool {
        let mark = env.len();
        let matched = self.match_node(subject, env);
        if !matched {
            env.truncate(mark);
        }
        matched
    }

    fn match_node<'a, 'v: 'a>(&self, subject: Subject<'a, 'v>, env: &mut Bindings<'v>) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Literal(expected) => subject.value() == expected,
            Self::Predicate(matcher) => matcher.matches(subject.value()),
            Self::Or(patterns) => patterns.iter().any(|p| p.match_subject(subject, env)),
            Self::And(patterns) => patterns.iter().all(|p| p.match_subject(subject, env)),
            Self::Not(inner) => {
                let mark = env.len();
                let matched = inner.match_subject(subject, env);
                env.truncate(mark);
                !matched
            }
            Self::Transform {
                projection,
                pattern,
            } => match subject {
                Subject::Anchored(v) => match projection.apply(v) {
                    Cow::Borrowed(view) => pattern.match_subject(Subject::Anchored(view), env),
                    Cow::Owned(view) => pattern.match_subject(Subject::Detached(&view), env),
                },
                Subject::Detached(v) => match projection.apply(v) {
                    Cow::Borrowed(view) => pattern.match_subject(Subject::Detached(view), env),
                    Cow::Owned(view) => pattern.match_subject(Subject::Detached(&view), env),
                },
            },
            Self::Capture(capture) => match env.get(capture) {
                Some(bound) => bound == subject.value(),
                None => {
                    let bound = match (capture.mode(), subject) {
                        (CaptureMode::Borrowed, Subject::Anchored(v)) => Bound::Borrowed(v),
                        (_, other) => Bound::Owned(other.value().clone()),
                    };
                    env.bind(capture, bound);
                    true
                }
            },
            Self::Destructure(seq) => match subject {
                Subject::Anchored(v) => v
                    .as_tuple()
                    .is_some_and(|items| seq.match_positions(Positions::Anchored(items), env)),
                Subject::Detached(v) => v
                    .as_tuple()
                    .is_some_and(|items| seq.match_positions(Positions::Detached(items), env)),
            },
            // A segment outside a destructure has no run to consume: it is
            // its inner pattern applied to the whole value.
            Self::Segment(inner) => inner.match_subject(subject, env),
            Self::Guard { pattern, condition } => {
                pattern.match_subject(subject, env) && condition(env)
            }
        }
    }
}
