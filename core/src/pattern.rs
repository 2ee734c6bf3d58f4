//! Pattern — The closed set of pattern variants
//!
//! A [`Pattern`] is an immutable tree. Leaves are literals, wildcards,
//! predicates and captures; inner nodes combine (`Or`, `And`, `Not`), project
//! (`Transform`), destructure tuples (`Destructure`, `Segment`) or add a
//! condition over bound captures (`Guard`).
//!
//! Patterns hold no match state. Bound values live in a
//! [`Bindings`] environment, one per evaluation, so a pattern can be built
//! once and reused everywhere, including recursively and across threads.

use crate::destructure::Sequence;
use crate::{
    Bindings, Capture, CompareMatcher, CompareOp, Field, FnMatcher, IsPresent, MapFn,
    MatchError, Projection, SelectFn, TypeMatcher, Unwrap, Value, ValueMatcher,
    MAX_DEPTH, MAX_PATTERNS_PER_COMPOUND,
};
use std::any::Any;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// A condition checked after its pattern matched, over what that pattern bound.
pub type Condition = Arc<dyn Fn(&Bindings<'_>) -> bool + Send + Sync>;

/// A pattern tree.
///
/// # Variants
///
/// - `Literal` — equality against a value
/// - `Wildcard` — anything
/// - `Predicate` — a [`ValueMatcher`] accepts the value
/// - `Or` / `And` / `Not` — short-circuit combinators, left to right
/// - `Transform` — match the view produced by a [`Projection`]
/// - `Capture` — bind on first encounter, compare on later ones
/// - `Destructure` — positional match over a tuple, may contain segments
/// - `Segment` — a run of zero or more tuple positions, each matching the inner pattern
/// - `Guard` — the inner pattern, then a [`Condition`] over the bindings
///
/// # Example
///
/// ```
/// use pmatch::{ds, Capture, Pattern, Value};
///
/// let i = Capture::new("i");
/// let j = Capture::new("j");
/// let product = ds!['*', &i, &j];
///
/// let mut bindings = pmatch::Bindings::new();
/// let subject = Value::from(('*', 2, 3));
/// assert!(product.matches(&subject, &mut bindings));
/// assert_eq!(bindings[&i].as_int(), Some(2));
/// assert_eq!(bindings[&j].as_int(), Some(3));
/// ```
#[derive(Clone)]
pub enum Pattern {
    /// Equality against a value.
    Literal(Value),
    /// Matches anything.
    Wildcard,
    /// Matches iff the matcher accepts the value.
    Predicate(Arc<dyn ValueMatcher>),
    /// Matches iff any sub-pattern matches. Only the first matching branch binds.
    Or(Vec<Pattern>),
    /// Matches iff every sub-pattern matches. Later conjuncts see earlier bindings.
    And(Vec<Pattern>),
    /// Matches iff the sub-pattern does not. Never binds.
    Not(Box<Pattern>),
    /// Matches iff `pattern` matches `projection(value)`.
    Transform {
        /// The view to compute.
        projection: Arc<dyn Projection>,
        /// The pattern the view is matched against.
        pattern: Box<Pattern>,
    },
    /// Binds the value, or checks it against an existing binding.
    Capture(Capture),
    /// Positional match over a tuple.
    Destructure(Sequence),
    /// A run of tuple positions. Only meaningful directly inside a `Destructure`.
    Segment(Box<Pattern>),
    /// Matches iff `pattern` matches and `condition` holds afterwards.
    Guard {
        /// The structural part.
        pattern: Box<Pattern>,
        /// Evaluated only after `pattern` matched.
        condition: Condition,
    },
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constructors
// ═══════════════════════════════════════════════════════════════════════════════

impl Pattern {
    /// Matches anything.
    #[must_use]
    pub fn wildcard() -> Self {
        Self::Wildcard
    }

    /// Equality against `value`.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Accept values a [`ValueMatcher`] accepts.
    pub fn matcher(matcher: impl ValueMatcher + 'static) -> Self {
        Self::Predicate(Arc::new(matcher))
    }

    /// Accept values a closure accepts.
    ///
    /// ```
    /// use pmatch::{Pattern, Value};
    ///
    /// let even = Pattern::predicate("even", |v| v.as_int().is_some_and(|i| i % 2 == 0));
    /// assert!(even.is_match(&Value::from(4)));
    /// assert!(!even.is_match(&Value::from(3)));
    /// ```
    pub fn predicate<F>(label: impl AsRef<str>, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::matcher(FnMatcher::new(label, f))
    }

    /// Any of `patterns`, first match wins.
    pub fn or(patterns: impl IntoIterator<Item = Pattern>) -> Self {
        Self::Or(patterns.into_iter().collect())
    }

    /// All of `patterns`, in order.
    pub fn and(patterns: impl IntoIterator<Item = Pattern>) -> Self {
        Self::And(patterns.into_iter().collect())
    }

    /// Negation.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(pattern: Pattern) -> Self {
        Self::Not(Box::new(pattern))
    }

    /// Match `pattern` against the view `projection` computes.
    pub fn transform(projection: impl Projection + 'static, pattern: impl Into<Pattern>) -> Self {
        Self::Transform {
            projection: Arc::new(projection),
            pattern: Box::new(pattern.into()),
        }
    }

    /// Match `pattern` against `f(value)`.
    ///
    /// ```
    /// use pmatch::{Pattern, Value};
    ///
    /// let halves_to_two = Pattern::app(|v| Value::from(v.as_int().unwrap_or(0) / 2), 2);
    /// assert!(halves_to_two.is_match(&Value::from(4)));
    /// ```
    pub fn app<F>(f: F, pattern: impl Into<Pattern>) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self::transform(MapFn::new("fn", f), pattern)
    }

    /// Match `pattern` against the part of the value `f` selects.
    ///
    /// The selected value stays a reference into the subject, so borrowed
    /// captures under it alias the subject.
    pub fn select<F>(f: F, pattern: impl Into<Pattern>) -> Self
    where
        F: for<'x> Fn(&'x Value) -> Option<&'x Value> + Send + Sync + 'static,
    {
        Self::transform(SelectFn::new("fn", f), pattern)
    }

    /// Bind to (or compare with) `capture`.
    #[must_use]
    pub fn capture(capture: &Capture) -> Self {
        Self::Capture(capture.clone())
    }

    /// Positional match over a tuple. Prefer the [`ds!`](crate::ds) macro.
    pub fn destructure(patterns: impl IntoIterator<Item = Pattern>) -> Self {
        Self::Destructure(Sequence::new(patterns.into_iter().collect()))
    }

    /// A run of tuple positions each matching `pattern`.
    ///
    /// Segments take the fewest positions that let the rest of the
    /// destructure match. With several segments, the leftmost one grows first.
    pub fn segment(pattern: impl Into<Pattern>) -> Self {
        Self::Segment(Box::new(pattern.into()))
    }

    /// `pattern`, then `condition`.
    pub fn guard<F>(pattern: impl Into<Pattern>, condition: F) -> Self
    where
        F: Fn(&Bindings<'_>) -> bool + Send + Sync + 'static,
    {
        Self::Guard {
            pattern: Box::new(pattern.into()),
            condition: Arc::new(condition),
        }
    }

    /// Postfix form of [`Pattern::guard`].
    ///
    /// ```
    /// use pmatch::{ds, Capture, Pattern, Value};
    ///
    /// let i = Capture::new("i");
    /// let j = Capture::new("j");
    /// let sums_to_ten = ds![&i, &j].when({
    ///     let (i, j) = (i.clone(), j.clone());
    ///     move |b| b[&i].as_int().zip(b[&j].as_int()).is_some_and(|(i, j)| i + j == 10)
    /// });
    /// assert!(sums_to_ten.is_match(&Value::from((1, 9))));
    /// assert!(!sums_to_ten.is_match(&Value::from((1, 7))));
    /// ```
    #[must_use]
    pub fn when<F>(self, condition: F) -> Self
    where
        F: Fn(&Bindings<'_>) -> bool + Send + Sync + 'static,
    {
        Self::guard(self, condition)
    }

    /// Match `pattern` against the `index`-th position of a tuple.
    pub fn field(index: usize, pattern: impl Into<Pattern>) -> Self {
        Self::transform(Field(index), pattern)
    }

    /// A present nullable whose content matches `pattern`.
    pub fn some(pattern: impl Into<Pattern>) -> Self {
        Self::And(vec![
            Self::transform(IsPresent, true),
            Self::transform(Unwrap, pattern),
        ])
    }

    /// An empty nullable.
    #[must_use]
    pub fn none() -> Self {
        Self::transform(IsPresent, false)
    }

    /// A custom value of concrete type `T` that also matches `pattern`.
    pub fn downcast<T: Any>(pattern: impl Into<Pattern>) -> Self {
        Self::And(vec![Self::matcher(TypeMatcher::<T>::new()), pattern.into()])
    }

    /// Bind the whole value to `capture` and also match it against `pattern`.
    pub fn at(capture: &Capture, pattern: impl Into<Pattern>) -> Self {
        Self::And(vec![Self::capture(capture), pattern.into()])
    }

    /// `value < operand`
    pub fn lt(operand: impl Into<Value>) -> Self {
        Self::matcher(CompareMatcher::new(CompareOp::Lt, operand))
    }

    /// `value <= operand`
    pub fn le(operand: impl Into<Value>) -> Self {
        Self::matcher(CompareMatcher::new(CompareOp::Le, operand))
    }

    /// `value > operand`
    pub fn gt(operand: impl Into<Value>) -> Self {
        Self::matcher(CompareMatcher::new(CompareOp::Gt, operand))
    }

    /// `value >= operand`
    pub fn ge(operand: impl Into<Value>) -> Self {
        Self::matcher(CompareMatcher::new(CompareOp::Ge, operand))
    }

    /// `value != operand`
    pub fn ne(operand: impl Into<Value>) -> Self {
        Self::matcher(CompareMatcher::new(CompareOp::Ne, operand))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Introspection
// ═══════════════════════════════════════════════════════════════════════════════

impl Pattern {
    /// Returns `true` if this is a `Segment`.
    #[must_use]
    pub fn is_segment(&self) -> bool {
        matches!(self, Self::Segment(_))
    }

    /// Returns `true` if a `Segment` appears anywhere in the tree.
    #[must_use]
    pub fn has_segment(&self) -> bool {
        self.any_node(&mut Pattern::is_segment)
    }

    /// Nesting depth. Leaves have depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children().map(Pattern::depth).max().unwrap_or(0)
    }

    /// Distinct captures reachable from this pattern, in first-seen order.
    #[must_use]
    pub fn captures(&self) -> Vec<Capture> {
        let mut found: Vec<Capture> = Vec::new();
        self.any_node(&mut |p| {
            if let Self::Capture(c) = p {
                if !found.contains(c) {
                    found.push(c.clone());
                }
            }
            false
        });
        found
    }

    /// Unbind every capture reachable from this pattern.
    ///
    /// Captures bound by other patterns stay bound.
    pub fn reset(&self, bindings: &mut Bindings<'_>) {
        self.any_node(&mut |p| {
            if let Self::Capture(c) = p {
                bindings.remove(c);
            }
            false
        });
    }

    /// Check nesting depth and compound width against [`MAX_DEPTH`] and
    /// [`MAX_PATTERNS_PER_COMPOUND`].
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::DepthExceeded`] or [`MatchError::TooManyPatterns`].
    pub fn validate_limits(&self) -> Result<(), MatchError> {
        let depth = self.depth();
        if depth > MAX_DEPTH {
            return Err(MatchError::DepthExceeded {
                depth,
                max: MAX_DEPTH,
            });
        }
        let mut widest = 0;
        self.any_node(&mut |p| {
            widest = widest.max(p.children().count());
            false
        });
        if widest > MAX_PATTERNS_PER_COMPOUND {
            return Err(MatchError::TooManyPatterns {
                count: widest,
                max: MAX_PATTERNS_PER_COMPOUND,
            });
        }
        Ok(())
    }

    /// Direct sub-patterns, in evaluation order.
    pub fn children(&self) -> impl Iterator<Item = &Pattern> {
        let slice: &[Pattern] = match self {
            Self::Literal(_) | Self::Wildcard | Self::Predicate(_) | Self::Capture(_) => &[],
            Self::Or(ps) | Self::And(ps) => ps,
            Self::Destructure(seq) => seq.patterns(),
            Self::Not(p)
            | Self::Segment(p)
            | Self::Transform { pattern: p, .. }
            | Self::Guard { pattern: p, .. } => std::slice::from_ref(&**p),
        };
        slice.iter()
    }

    /// Pre-order walk; stops as soon as `visit` returns `true`.
    fn any_node(&self, visit: &mut impl FnMut(&Pattern) -> bool) -> bool {
        visit(self) || self.children().any(|child| child.any_node(&mut *visit))
    }
}

impl Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(v) => write!(f, "{v:?}"),
            Self::Wildcard => f.write_str("_"),
            Self::Predicate(m) => write!(f, "{m:?}"),
            Self::Or(ps) => f.debug_tuple("Or").field(ps).finish(),
            Self::And(ps) => f.debug_tuple("And").field(ps).finish(),
            Self::Not(p) => f.debug_tuple("Not").field(p).finish(),
            Self::Transform {
                projection,
                pattern,
            } => f
                .debug_tuple("Transform")
                .field(projection)
                .field(pattern)
                .finish(),
            Self::Capture(c) => write!(f, "{c:?}"),
            Self::Destructure(seq) => f.debug_tuple("Ds").field(&seq.patterns()).finish(),
            Self::Segment(p) => write!(f, "...{p:?}"),
            Self::Guard { pattern, .. } => f.debug_tuple("Guard").field(pattern).finish(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Conversions
// ═══════════════════════════════════════════════════════════════════════════════

macro_rules! literal_from {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Pattern {
                fn from(value: $ty) -> Self {
                    Self::Literal(Value::from(value))
                }
            }
        )+
    };
}

literal_from!(Value, &str, String, i64, i32, bool, char);

impl From<&Capture> for Pattern {
    fn from(capture: &Capture) -> Self {
        Self::capture(capture)
    }
}

impl From<Capture> for Pattern {
    fn from(capture: Capture) -> Self {
        Self::Capture(capture)
    }
}

impl From<&Pattern> for Pattern {
    fn from(pattern: &Pattern) -> Self {
        pattern.clone()
    }
}
