//! `Value` — Type-erased subject that patterns are matched against
//!
//! Every subject, every literal and every projection result is a [`Value`].
//! Erasing at the data level keeps [`Pattern`](crate::Pattern) non-generic:
//! the same pattern tree can match tuples of integers, strings, nullable
//! containers or caller-defined types without monomorphizing the matcher.
//!
//! # Extensibility via `Custom`
//!
//! For caller-defined types (structs, class hierarchies, closed sums), implement
//! [`CustomValue`] and wrap in `Value::Custom(Arc::new(your_type))`. Fields are
//! reached with plain accessor functions through
//! [`Pattern::transform`](crate::Pattern::transform); the engine never reflects.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// The value a failed projection yields.
///
/// Accessors that find nothing (a missing tuple position, an empty nullable,
/// a downcast to the wrong type) hand back a reference to this sentinel so the
/// nested pattern still has something to be matched against.
pub(crate) static ABSENT: Value = Value::None;

/// Extension trait for caller-defined subject types.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so that pattern trees holding custom
/// literals stay shareable.
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use std::sync::Arc;
/// use pmatch::{CustomValue, Value};
///
/// #[derive(Debug)]
/// struct Circle {
///     radius: i64,
/// }
///
/// impl CustomValue for Circle {
///     fn custom_type_name(&self) -> &'static str {
///         "circle"
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let value = Value::Custom(Arc::new(Circle { radius: 2 }));
/// assert!(value.is_custom());
/// assert_eq!(value.type_name(), "circle");
/// assert_eq!(value.downcast_ref::<Circle>().map(|c| c.radius), Some(2));
/// ```
pub trait CustomValue: Send + Sync + Debug {
    /// Returns a human-readable type identifier.
    ///
    /// Used by shape checking: two custom shapes are compatible only when their
    /// names agree. Convention: `snake_case`, e.g. `"circle"`, `"http_request"`.
    fn custom_type_name(&self) -> &'static str;

    /// Returns a reference to `self` as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Structural equality against another custom value.
    ///
    /// Used by literal patterns and repeated captures. The default only
    /// considers the very same allocation equal, so override it for value types.
    fn eq_custom(&self, _other: &dyn CustomValue) -> bool {
        false
    }
}

/// Discriminant of a [`Value`], used by shapes and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ValueKind {
    /// The absent sentinel.
    None,
    /// `bool`.
    Bool,
    /// `i64`.
    Int,
    /// `char`.
    Char,
    /// Owned string.
    String,
    /// Raw bytes.
    Bytes,
    /// Positional product.
    Tuple,
    /// Nullable container.
    Maybe,
    /// Caller-defined type.
    Custom,
}

impl ValueKind {
    /// Returns the lowercase name of this kind.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Char => "char",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Tuple => "tuple",
            Self::Maybe => "maybe",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The erased subject type.
///
/// # Variants
///
/// - `None` — Absent sentinel (a projection found nothing)
/// - `Bool`, `Int`, `Char`, `String`, `Bytes` — Scalars
/// - `Tuple` — Fixed-length positional product (tuples, arrays, flattened records)
/// - `Maybe` — Nullable container; nesting keeps layers distinct
/// - `Custom` — Caller-defined types implementing [`CustomValue`]
///
/// # Example
///
/// ```
/// use pmatch::Value;
///
/// let subject = Value::from(('*', 2, 1));
/// assert_eq!(subject.as_tuple().map(<[Value]>::len), Some(3));
/// assert_eq!(subject.as_tuple().and_then(|t| t[1].as_int()), Some(2));
/// ```
#[derive(Clone, Default)]
pub enum Value {
    /// Nothing. Projections return this when they cannot produce a value.
    #[default]
    None,

    /// Boolean data.
    Bool(bool),

    /// Integer data.
    Int(i64),

    /// A single character.
    Char(char),

    /// String data.
    String(String),

    /// Raw bytes data.
    Bytes(Vec<u8>),

    /// A fixed-length ordered product of values.
    Tuple(Vec<Value>),

    /// A nullable container: `Some` holds exactly one inner value.
    Maybe(Option<Box<Value>>),

    /// Custom data type for caller-defined subjects.
    Custom(Arc<dyn CustomValue>),
}

// Manual PartialEq because trait objects don't auto-derive it.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Maybe(a), Self::Maybe(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => {
                Arc::ptr_eq(a, b) || a.eq_custom(b.as_ref())
            }
            _ => false,
        }
    }
}

/// Ordering is only defined between values of the same kind.
///
/// Tuples and nullables compare lexicographically; custom values and bytes
/// are unordered.
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
            (Self::Char(a), Self::Char(b)) => a.partial_cmp(b),
            (Self::String(a), Self::String(b)) => a.partial_cmp(b),
            (Self::Tuple(a), Self::Tuple(b)) => a.partial_cmp(b),
            (Self::Maybe(a), Self::Maybe(b)) => a.partial_cmp(b),
            _ => Option::None,
        }
    }
}

impl Value {
    /// Build a tuple from anything convertible into values.
    ///
    /// ```
    /// use pmatch::Value;
    ///
    /// let array = Value::tuple([1, 2, 3]);
    /// assert_eq!(array, Value::from((1, 2, 3)));
    /// ```
    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// A present nullable holding `value`.
    pub fn some(value: impl Into<Value>) -> Self {
        Self::Maybe(Some(Box::new(value.into())))
    }

    /// An empty nullable.
    #[must_use]
    pub fn null() -> Self {
        Self::Maybe(Option::None)
    }

    /// Returns the discriminant of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::None => ValueKind::None,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Char(_) => ValueKind::Char,
            Self::String(_) => ValueKind::String,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Tuple(_) => ValueKind::Tuple,
            Self::Maybe(_) => ValueKind::Maybe,
            Self::Custom(_) => ValueKind::Custom,
        }
    }

    /// Returns `true` if this is the absent sentinel.
    #[inline]
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns `true` if this is the `Custom` variant.
    #[inline]
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Try to get the value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => Option::None,
        }
    }

    /// Try to get the value as an integer.
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => Option::None,
        }
    }

    /// Try to get the value as a boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => Option::None,
        }
    }

    /// Try to get the value as a character.
    #[inline]
    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => Option::None,
        }
    }

    /// Try to get the value as a byte slice.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b.as_slice()),
            _ => Option::None,
        }
    }

    /// Try to get the positional elements of a tuple.
    #[inline]
    #[must_use]
    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Self::Tuple(items) => Some(items.as_slice()),
            _ => Option::None,
        }
    }

    /// Try to open a nullable: `Some(Some(inner))` when present,
    /// `Some(None)` when empty, `None` when this is not a nullable at all.
    #[inline]
    #[must_use]
    pub fn as_maybe(&self) -> Option<Option<&Value>> {
        match self {
            Self::Maybe(inner) => Some(inner.as_deref()),
            _ => Option::None,
        }
    }

    /// Try to get the inner [`CustomValue`] trait object.
    #[inline]
    #[must_use]
    pub fn as_custom(&self) -> Option<&dyn CustomValue> {
        match self {
            Self::Custom(c) => Some(c.as_ref()),
            _ => Option::None,
        }
    }

    /// Downcast a custom value to its concrete type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_custom()?.as_any().downcast_ref::<T>()
    }

    /// Returns a string describing the type of this value.
    ///
    /// For `Custom` variants, this delegates to [`CustomValue::custom_type_name`].
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Custom(c) => c.custom_type_name(),
            other => other.kind().name(),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Char(c) => write!(f, "{c:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "b{b:?}"),
            Self::Tuple(items) => {
                let mut t = f.debug_tuple("");
                for item in items {
                    t.field(item);
                }
                t.finish()
            }
            Self::Maybe(Some(inner)) => f.debug_tuple("Some").field(inner).finish(),
            Self::Maybe(Option::None) => f.write_str("Null"),
            Self::Custom(c) => Debug::fmt(c, f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Tuple(items)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        Self::Maybe(opt.map(|v| Box::new(v.into())))
    }
}

impl From<Arc<dyn CustomValue>> for Value {
    fn from(c: Arc<dyn CustomValue>) -> Self {
        Self::Custom(c)
    }
}

macro_rules! tuple_into_value {
    ($($name:ident),+) => {
        impl<$($name: Into<Value>),+> From<($($name,)+)> for Value {
            #[allow(non_snake_case)]
            fn from(($($name,)+): ($($name,)+)) -> Self {
                Self::Tuple(vec![$($name.into()),+])
            }
        }
    };
}

tuple_into_value!(A);
tuple_into_value!(A, B);
tuple_into_value!(A, B, C);
tuple_into_value!(A, B, C, D);
tuple_into_value!(A, B, C, D, E);
tuple_into_value!(A, B, C, D, E, F);
tuple_into_value!(A, B, C, D, E, F, G);
tuple_into_value!(A, B, C, D, E, F, G, H);
