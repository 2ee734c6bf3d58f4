//! Shape — Value-independent description of what a subject looks like
//!
//! A [`Shape`] is the static part of a value: its kind, and for tuples the
//! arity and the shape of every position. [`Pattern::check_shape`] decides
//! whether a pattern can ever match values of a shape, without looking at any
//! concrete value. Run it once when a match is built, not per evaluation.
//!
//! Shape incompatibility is a construction error ([`ShapeError`]); it is a
//! different category from a runtime non-match.

use crate::{Pattern, Value, ValueKind};
use std::fmt;

/// Static description of a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Nothing is known. Compatible with everything.
    Any,
    /// A scalar (or nullable) of the given kind.
    Scalar(ValueKind),
    /// A fixed-arity product with a shape per position.
    Tuple(Vec<Shape>),
    /// A caller-defined type, identified by [`CustomValue::custom_type_name`](crate::CustomValue::custom_type_name).
    Custom(&'static str),
}

impl Shape {
    /// Derive the shape of a concrete value.
    ///
    /// ```
    /// use pmatch::{Shape, Value, ValueKind};
    ///
    /// let shape = Shape::of(&Value::from(('/', 2, 1)));
    /// assert_eq!(shape.arity(), Some(3));
    /// assert_eq!(shape, Shape::Tuple(vec![
    ///     Shape::Scalar(ValueKind::Char),
    ///     Shape::Scalar(ValueKind::Int),
    ///     Shape::Scalar(ValueKind::Int),
    /// ]));
    /// ```
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Tuple(items) => Self::Tuple(items.iter().map(Self::of).collect()),
            Value::Custom(c) => Self::Custom(c.custom_type_name()),
            other => Self::Scalar(other.kind()),
        }
    }

    /// A tuple of `n` positions about which nothing else is known.
    #[must_use]
    pub fn tuple_of(n: usize) -> Self {
        Self::Tuple(vec![Self::Any; n])
    }

    /// Number of positions, if this is a tuple shape.
    #[must_use]
    pub fn arity(&self) -> Option<usize> {
        match self {
            Self::Tuple(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Returns `true` if a value of shape `self` could equal a value of shape `other`.
    #[must_use]
    pub fn is_compatible(&self, other: &Shape) -> bool {
        match (self, other) {
            (Self::Any, _) | (_, Self::Any) => true,
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.is_compatible(y))
            }
            (Self::Custom(a), Self::Custom(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("_"),
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Custom(name) => f.write_str(name),
            Self::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Position of a sub-pattern inside a pattern tree.
///
/// Each step is the index of a child: the element index inside a
/// destructure, the branch index inside `or`/`and`, and `0` for single-child
/// wrappers. Displayed as `$`, `$.1`, `$.1.0`, ...
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternPath(Vec<usize>);

impl PatternPath {
    /// The root of a pattern tree.
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// The path of the `index`-th child.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut steps = self.0.clone();
        steps.push(index);
        Self(steps)
    }

    /// The individual steps from the root.
    #[must_use]
    pub fn steps(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for PatternPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for step in &self.0 {
            write!(f, ".{step}")?;
        }
        Ok(())
    }
}

/// Why a pattern can never match values of a given shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// Destructure without segments has a different number of sub-patterns than positions.
    #[error(
        "destructure at {path} has {expected} sub-patterns but the subject has {found} positions; \
         match the arity or add a segment"
    )]
    ArityMismatch {
        /// Where the destructure sits.
        path: PatternPath,
        /// Number of sub-patterns.
        expected: usize,
        /// Number of positions in the subject.
        found: usize,
    },
    /// Destructure with segments needs more positions than the subject has.
    #[error(
        "destructure at {path} needs at least {min} positions besides its segments \
         but the subject has {found}"
    )]
    TooFewValues {
        /// Where the destructure sits.
        path: PatternPath,
        /// Number of non-segment sub-patterns.
        min: usize,
        /// Number of positions in the subject.
        found: usize,
    },
    /// Destructure applied to something that is not a tuple.
    #[error("destructure at {path} expects a tuple but the subject is {found}")]
    NotATuple {
        /// Where the destructure sits.
        path: PatternPath,
        /// Shape of the subject.
        found: String,
    },
    /// Literal (or typed matcher) of a different type than the subject.
    #[error("pattern at {path} expects {expected} but the subject is {found}")]
    TypeMismatch {
        /// Where the pattern sits.
        path: PatternPath,
        /// What the pattern compares against.
        expected: String,
        /// Shape of the subject.
        found: String,
    },
    /// Segment used anywhere but as a direct element of a destructure.
    #[error("segment at {path} is only valid as an element of a destructure")]
    SegmentOutsideDestructure {
        /// Where the segment sits.
        path: PatternPath,
    },
}

impl Pattern {
    /// Decide whether this pattern can match values of `shape` at all.
    ///
    /// Independent of concrete values: a destructure of arity 3 against a
    /// pair is rejected here once, instead of failing on every evaluation.
    ///
    /// # Errors
    ///
    /// Returns the first [`ShapeError`] found in depth-first order.
    ///
    /// # Example
    ///
    /// ```
    /// use pmatch::{ds, Pattern, Shape, ShapeError};
    ///
    /// let pattern = ds![1, Pattern::wildcard(), 3];
    /// assert!(pattern.check_shape(&Shape::tuple_of(3)).is_ok());
    /// assert!(matches!(
    ///     pattern.check_shape(&Shape::tuple_of(2)),
    ///     Err(ShapeError::ArityMismatch { expected: 3, found: 2, .. })
    /// ));
    /// ```
    pub fn check_shape(&self, shape: &Shape) -> Result<(), ShapeError> {
        self.check_shape_at(shape, &PatternPath::root())
    }

    fn check_shape_at(&self, shape: &Shape, path: &PatternPath) -> Result<(), ShapeError> {
        match self {
            Pattern::Wildcard | Pattern::Capture(_) => Ok(()),
            Pattern::Literal(value) => {
                let expected = Shape::of(value);
                if expected.is_compatible(shape) {
                    Ok(())
                } else {
                    Err(ShapeError::TypeMismatch {
                        path: path.clone(),
                        expected: expected.to_string(),
                        found: shape.to_string(),
                    })
                }
            }
            Pattern::Predicate(matcher) => {
                let kinds = matcher.supported_kinds();
                match shape {
                    Shape::Scalar(kind) if !kinds.is_empty() && !kinds.contains(kind) => {
                        Err(ShapeError::TypeMismatch {
                            path: path.clone(),
                            expected: kinds
                                .iter()
                                .map(|k| k.name())
                                .collect::<Vec<_>>()
                                .join(" | "),
                            found: shape.to_string(),
                        })
                    }
                    _ => Ok(()),
                }
            }
            Pattern::Or(patterns) | Pattern::And(patterns) => patterns
                .iter()
                .enumerate()
                .try_for_each(|(i, p)| p.check_shape_at(shape, &path.child(i))),
            Pattern::Not(inner) | Pattern::Guard { pattern: inner, .. } => {
                inner.check_shape_at(shape, &path.child(0))
            }
            Pattern::Transform { projection, pattern } => {
                pattern.check_shape_at(&projection.output_shape(shape), &path.child(0))
            }
            Pattern::Segment(_) => Err(ShapeError::SegmentOutsideDestructure { path: path.clone() }),
            Pattern::Destructure(seq) => seq.check_shape_at(shape, path),
        }
    }
}

impl crate::destructure::Sequence {
    fn check_shape_at(&self, shape: &Shape, path: &PatternPath) -> Result<(), ShapeError> {
        let items = match shape {
            Shape::Any => {
                // Still reject segments nested in non-destructure positions.
                return self.check_elements(&[], path);
            }
            Shape::Tuple(items) => items.as_slice(),
            other => {
                return Err(ShapeError::NotATuple {
                    path: path.clone(),
                    found: other.to_string(),
                })
            }
        };

        let fixed = self.fixed_len();
        if self.segments() == 0 {
            if fixed != items.len() {
                return Err(ShapeError::ArityMismatch {
                    path: path.clone(),
                    expected: fixed,
                    found: items.len(),
                });
            }
        } else if fixed > items.len() {
            return Err(ShapeError::TooFewValues {
                path: path.clone(),
                min: fixed,
                found: items.len(),
            });
        }
        self.check_elements(items, path)
    }

    /// Check each element against the position it is guaranteed to land on.
    ///
    /// Elements before the first segment align from the front, elements after
    /// the last segment align from the back. Elements between two segments
    /// float and are checked against `Shape::Any`.
    fn check_elements(&self, items: &[Shape], path: &PatternPath) -> Result<(), ShapeError> {
        let patterns = self.patterns();
        let first_segment = patterns.iter().position(Pattern::is_segment);
        let last_segment = patterns.iter().rposition(Pattern::is_segment);

        for (i, pattern) in patterns.iter().enumerate() {
            let child = path.child(i);
            let target = match (first_segment, last_segment) {
                (None, _) | (_, None) => items.get(i),
                (Some(first), Some(_)) if i < first => items.get(i),
                (Some(_), Some(last)) if i > last => {
                    let from_end = patterns.len() - i;
                    items.len().checked_sub(from_end).and_then(|j| items.get(j))
                }
                _ => None,
            };
            let target = target.unwrap_or(&Shape::Any);

            match pattern {
                // A segment's elements float: its inner pattern sees every
                // position it may consume, so only Any is sound here.
                Pattern::Segment(inner) => inner.check_shape_at(&Shape::Any, &child.child(0))?,
                other => other.check_shape_at(target, &child)?,
            }
        }
        Ok(())
    }
}
