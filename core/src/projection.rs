//! `Projection` — Unary views applied by [`Pattern::Transform`](crate::Pattern::Transform)
//!
//! A projection turns the subject into the value a nested pattern is matched
//! against: a tuple position, the content of a nullable, a field of a custom
//! type, a computed property. Field and member accessors are plain functions
//! supplied by the caller; the engine never reflects.
//!
//! A projection that cannot produce anything returns the absent sentinel
//! ([`Value::None`]); the nested pattern is then matched against it like any
//! other value.
//!
//! Projections that only *select* part of their input return
//! [`Cow::Borrowed`]; the selected value stays anchored in the subject and
//! can be captured by reference. Computed results are [`Cow::Owned`].

use crate::value::ABSENT;
use crate::{Shape, Value, ValueKind};
use std::borrow::Cow;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// A unary view over a [`Value`].
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so pattern trees stay shareable.
///
/// # Example
///
/// ```
/// use std::borrow::Cow;
/// use pmatch::{Projection, Value};
///
/// #[derive(Debug)]
/// struct Doubled;
///
/// impl Projection for Doubled {
///     fn apply<'x>(&self, value: &'x Value) -> Cow<'x, Value> {
///         Cow::Owned(value.as_int().map_or(Value::None, |i| Value::from(i * 2)))
///     }
/// }
///
/// assert_eq!(*Doubled.apply(&Value::from(21)), Value::from(42));
/// assert_eq!(*Doubled.apply(&Value::from("x")), Value::None);
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Projection`",
    label = "this type cannot be used as a view over `Value`",
    note = "wrap a closure with `Pattern::app(|v| ..., pattern)` or implement `apply(&self, &Value) -> Cow<Value>`"
)]
pub trait Projection: Send + Sync + Debug {
    /// Compute the view of `value`.
    fn apply<'x>(&self, value: &'x Value) -> Cow<'x, Value>;

    /// The shape of the output, given the shape of the input.
    ///
    /// Used by [`Pattern::check_shape`](crate::Pattern::check_shape). Default
    /// is [`Shape::Any`]: nothing is known about computed results.
    fn output_shape(&self, _input: &Shape) -> Shape {
        Shape::Any
    }
}

#[diagnostic::do_not_recommend]
impl Projection for Box<dyn Projection> {
    fn apply<'x>(&self, value: &'x Value) -> Cow<'x, Value> {
        (**self).apply(value)
    }

    fn output_shape(&self, input: &Shape) -> Shape {
        (**self).output_shape(input)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Selecting projections
// ═══════════════════════════════════════════════════════════════════════════════

/// The `i`-th position of a tuple.
///
/// ```
/// use pmatch::{Field, Projection, Value};
///
/// let subject = Value::from(('+', 1, 2));
/// assert_eq!(*Field(2).apply(&subject), Value::from(2));
/// assert_eq!(*Field(7).apply(&subject), Value::None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field(pub usize);

impl Projection for Field {
    fn apply<'x>(&self, value: &'x Value) -> Cow<'x, Value> {
        Cow::Borrowed(
            value
                .as_tuple()
                .and_then(|items| items.get(self.0))
                .unwrap_or(&ABSENT),
        )
    }

    fn output_shape(&self, input: &Shape) -> Shape {
        match input {
            Shape::Tuple(items) => items.get(self.0).cloned().unwrap_or(Shape::Any),
            _ => Shape::Any,
        }
    }
}

/// The content of a present nullable; absent for an empty one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unwrap;

impl Projection for Unwrap {
    fn apply<'x>(&self, value: &'x Value) -> Cow<'x, Value> {
        Cow::Borrowed(value.as_maybe().flatten().unwrap_or(&ABSENT))
    }
}

/// Selection through a caller-supplied accessor.
///
/// Built by [`Pattern::select`](crate::Pattern::select); use it for accessors
/// that return a reference into the value (e.g. a field of a custom type
/// stored as a [`Value`]).
#[derive(Clone)]
pub struct SelectFn {
    label: Arc<str>,
    f: Arc<dyn for<'x> Fn(&'x Value) -> Option<&'x Value> + Send + Sync>,
}

impl SelectFn {
    /// Wrap an accessor.
    pub fn new<F>(label: impl AsRef<str>, f: F) -> Self
    where
        F: for<'x> Fn(&'x Value) -> Option<&'x Value> + Send + Sync + 'static,
    {
        Self {
            label: Arc::from(label.as_ref()),
            f: Arc::new(f),
        }
    }
}

impl Projection for SelectFn {
    fn apply<'x>(&self, value: &'x Value) -> Cow<'x, Value> {
        Cow::Borrowed((self.f)(value).unwrap_or(&ABSENT))
    }
}

impl Debug for SelectFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "select({})", self.label)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Computing projections
// ═══════════════════════════════════════════════════════════════════════════════

/// `true` for a present nullable, `false` for an empty one, absent otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsPresent;

impl Projection for IsPresent {
    fn apply<'x>(&self, value: &'x Value) -> Cow<'x, Value> {
        Cow::Owned(
            value
                .as_maybe()
                .map_or(Value::None, |inner| Value::Bool(inner.is_some())),
        )
    }

    fn output_shape(&self, _input: &Shape) -> Shape {
        Shape::Scalar(ValueKind::Bool)
    }
}

/// Number of positions of a tuple, characters of a string or bytes of a blob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Len;

impl Projection for Len {
    fn apply<'x>(&self, value: &'x Value) -> Cow<'x, Value> {
        let len = match value {
            Value::Tuple(items) => items.len(),
            Value::String(s) => s.chars().count(),
            Value::Bytes(b) => b.len(),
            _ => return Cow::Borrowed(&ABSENT),
        };
        Cow::Owned(i64::try_from(len).map_or(Value::None, Value::Int))
    }

    fn output_shape(&self, _input: &Shape) -> Shape {
        Shape::Scalar(ValueKind::Int)
    }
}

/// A caller-supplied function computing a new value.
///
/// Built by [`Pattern::app`](crate::Pattern::app).
#[derive(Clone)]
pub struct MapFn {
    label: Arc<str>,
    f: Arc<dyn Fn(&Value) -> Value + Send + Sync>,
}

impl MapFn {
    /// Wrap a function.
    pub fn new<F>(label: impl AsRef<str>, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self {
            label: Arc::from(label.as_ref()),
            f: Arc::new(f),
        }
    }
}

impl Projection for MapFn {
    fn apply<'x>(&self, value: &'x Value) -> Cow<'x, Value> {
        Cow::Owned((self.f)(value))
    }
}

impl Debug for MapFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "app({})", self.label)
    }
}
