//! `ValueMatcher` — Stateless predicates over a [`Value`]
//!
//! The payload of [`Pattern::Predicate`](crate::Pattern::Predicate). A
//! matcher looks at one value and answers yes or no; it never binds.
//!
//! # Available Matchers
//!
//! - [`StringMatcher`] — exact / prefix / suffix / contains / regex, optional case folding
//! - [`BoolMatcher`] — boolean equality
//! - [`CompareMatcher`] — ordering against an operand (`_ < 5`, `_ != 'x'`, ...)
//! - [`TypeMatcher`] — dynamic type test on custom values
//! - [`FnMatcher`] — any caller-supplied `Fn(&Value) -> bool`

use crate::{Value, ValueKind};
use std::any::Any;
use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::Arc;

/// Decides whether a single value is acceptable.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`: they are stored inside
/// patterns, and patterns are shared.
///
/// # Example
///
/// ```
/// use pmatch::{StringMatcher, Value, ValueMatcher};
///
/// let matcher = StringMatcher::suffix(".json", false);
/// assert!(matcher.matches(&Value::from("data.json")));
/// assert!(!matcher.matches(&Value::from(1)));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `ValueMatcher`",
    label = "this type cannot decide whether a `Value` matches",
    note = "use a built-in matcher (StringMatcher, CompareMatcher, ...), wrap a closure with `Pattern::when`, or implement `matches(&self, &Value) -> bool`"
)]
pub trait ValueMatcher: Send + Sync + Debug {
    /// Check if the given value matches.
    ///
    /// Returns `false` if the value is of a kind this matcher does not handle.
    fn matches(&self, value: &Value) -> bool;

    /// The kinds this matcher can ever accept.
    ///
    /// Used by shape checking. Empty means "any kind", which is the default.
    fn supported_kinds(&self) -> &[ValueKind] {
        &[]
    }
}

#[diagnostic::do_not_recommend]
impl ValueMatcher for Box<dyn ValueMatcher> {
    fn matches(&self, value: &Value) -> bool {
        (**self).matches(value)
    }

    fn supported_kinds(&self) -> &[ValueKind] {
        (**self).supported_kinds()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// StringMatcher
// ═══════════════════════════════════════════════════════════════════════════════

/// String matching with all common strategies.
///
/// # Example
///
/// ```
/// use pmatch::{StringMatcher, Value, ValueMatcher};
///
/// let matcher = StringMatcher::prefix("/API/", true);
/// assert!(matcher.matches(&Value::from("/api/users")));
///
/// let matcher = StringMatcher::regex(r"^\d+$").unwrap();
/// assert!(matcher.matches(&Value::from("123")));
/// assert!(!matcher.matches(&Value::from("12a")));
/// ```
#[derive(Debug, Clone)]
pub enum StringMatcher {
    /// Whole-string equality.
    Exact { value: String, ignore_case: bool },
    /// Leading substring.
    Prefix { value: String, ignore_case: bool },
    /// Trailing substring.
    Suffix { value: String, ignore_case: bool },
    /// Substring anywhere. Stored lowercased when `ignore_case` is set.
    Contains { value: String, ignore_case: bool },
    /// Regular expression (RE2 semantics, linear time).
    Regex(regex::Regex),
}

impl StringMatcher {
    /// Whole-string equality.
    #[must_use]
    pub fn exact(value: impl Into<String>, ignore_case: bool) -> Self {
        Self::Exact {
            value: value.into(),
            ignore_case,
        }
    }

    /// Leading substring.
    #[must_use]
    pub fn prefix(value: impl Into<String>, ignore_case: bool) -> Self {
        Self::Prefix {
            value: value.into(),
            ignore_case,
        }
    }

    /// Trailing substring.
    #[must_use]
    pub fn suffix(value: impl Into<String>, ignore_case: bool) -> Self {
        Self::Suffix {
            value: value.into(),
            ignore_case,
        }
    }

    /// Substring anywhere.
    #[must_use]
    pub fn contains(value: impl Into<String>, ignore_case: bool) -> Self {
        let value = value.into();
        Self::Contains {
            value: if ignore_case {
                value.to_ascii_lowercase()
            } else {
                value
            },
            ignore_case,
        }
    }

    /// Regular expression, compiled once.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the expression does not compile.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        regex::Regex::new(pattern).map(Self::Regex)
    }

    /// Case-insensitive regular expression.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the expression does not compile.
    pub fn regex_ignore_case(pattern: &str) -> Result<Self, regex::Error> {
        regex::RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map(Self::Regex)
    }

    fn matches_str(&self, input: &str) -> bool {
        match self {
            Self::Exact { value, ignore_case } => {
                if *ignore_case {
                    input.eq_ignore_ascii_case(value)
                } else {
                    input == value
                }
            }
            Self::Prefix { value, ignore_case } => {
                if *ignore_case {
                    input
                        .get(..value.len())
                        .is_some_and(|head| head.eq_ignore_ascii_case(value))
                } else {
                    input.starts_with(value.as_str())
                }
            }
            Self::Suffix { value, ignore_case } => {
                if *ignore_case {
                    input
                        .len()
                        .checked_sub(value.len())
                        .and_then(|start| input.get(start..))
                        .is_some_and(|tail| tail.eq_ignore_ascii_case(value))
                } else {
                    input.ends_with(value.as_str())
                }
            }
            Self::Contains { value, ignore_case } => {
                if *ignore_case {
                    input.to_ascii_lowercase().contains(value.as_str())
                } else {
                    input.contains(value.as_str())
                }
            }
            Self::Regex(re) => re.is_match(input),
        }
    }
}

impl ValueMatcher for StringMatcher {
    fn matches(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|s| self.matches_str(s))
    }

    fn supported_kinds(&self) -> &[ValueKind] {
        &[ValueKind::String]
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BoolMatcher
// ═══════════════════════════════════════════════════════════════════════════════

/// Boolean equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolMatcher {
    expected: bool,
}

impl BoolMatcher {
    /// Match values equal to `expected`.
    #[must_use]
    pub fn new(expected: bool) -> Self {
        Self { expected }
    }
}

impl ValueMatcher for BoolMatcher {
    fn matches(&self, value: &Value) -> bool {
        value.as_bool() == Some(self.expected)
    }

    fn supported_kinds(&self) -> &[ValueKind] {
        &[ValueKind::Bool]
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CompareMatcher
// ═══════════════════════════════════════════════════════════════════════════════

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// Apply the operator to `lhs op rhs`.
    ///
    /// Ordering operators are `false` for values that have no ordering
    /// (different kinds, custom values).
    #[must_use]
    pub fn apply(self, lhs: &Value, rhs: &Value) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
            Self::Lt => lhs.partial_cmp(rhs) == Some(Ordering::Less),
            Self::Le => matches!(lhs.partial_cmp(rhs), Some(Ordering::Less | Ordering::Equal)),
            Self::Gt => lhs.partial_cmp(rhs) == Some(Ordering::Greater),
            Self::Ge => matches!(
                lhs.partial_cmp(rhs),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }

    /// The operator as written in source.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// `value op operand`.
///
/// ```
/// use pmatch::{CompareMatcher, CompareOp, Value, ValueMatcher};
///
/// let below_five = CompareMatcher::new(CompareOp::Lt, 5);
/// assert!(below_five.matches(&Value::from(1)));
/// assert!(!below_five.matches(&Value::from(7)));
/// assert!(!below_five.matches(&Value::from("1")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompareMatcher {
    op: CompareOp,
    operand: Value,
}

impl CompareMatcher {
    /// Compare against `operand` with `op`.
    pub fn new(op: CompareOp, operand: impl Into<Value>) -> Self {
        Self {
            op,
            operand: operand.into(),
        }
    }

    /// The operator.
    #[must_use]
    pub fn op(&self) -> CompareOp {
        self.op
    }

    /// The right-hand side.
    #[must_use]
    pub fn operand(&self) -> &Value {
        &self.operand
    }
}

impl ValueMatcher for CompareMatcher {
    fn matches(&self, value: &Value) -> bool {
        self.op.apply(value, &self.operand)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TypeMatcher
// ═══════════════════════════════════════════════════════════════════════════════

/// Accepts custom values whose concrete type is `T`.
pub struct TypeMatcher<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any> TypeMatcher<T> {
    /// Match values downcastable to `T`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: Any> Default for TypeMatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for TypeMatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "is<{}>", std::any::type_name::<T>())
    }
}

impl<T: Any> ValueMatcher for TypeMatcher<T> {
    fn matches(&self, value: &Value) -> bool {
        value
            .as_custom()
            .is_some_and(|c| c.as_any().is::<T>())
    }

    fn supported_kinds(&self) -> &[ValueKind] {
        &[ValueKind::Custom]
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FnMatcher
// ═══════════════════════════════════════════════════════════════════════════════

/// A caller-supplied predicate.
#[derive(Clone)]
pub struct FnMatcher {
    label: Arc<str>,
    f: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl FnMatcher {
    /// Wrap a predicate. `label` is only used for display.
    pub fn new<F>(label: impl AsRef<str>, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            label: Arc::from(label.as_ref()),
            f: Arc::new(f),
        }
    }

    /// The display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Debug for FnMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "when({})", self.label)
    }
}

impl ValueMatcher for FnMatcher {
    fn matches(&self, value: &Value) -> bool {
        (self.f)(value)
    }
}
