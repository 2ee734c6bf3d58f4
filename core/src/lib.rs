//! pmatch - Structural pattern matching over type-erased values
//!
//! A pattern-matching engine: given a subject and an ordered list of
//! `(pattern, handler)` arms, find the first arm whose pattern structurally
//! matches, bind its named captures and run its handler.
//!
//! # Architecture
//!
//! - [`Value`] — Erased subject type (scalars, tuples, nullables, custom types)
//! - [`Pattern`] — Closed enum of pattern variants, immutable and shareable
//! - [`Capture`] / [`Bindings`] — Capture identities and the per-evaluation environment
//! - [`ValueMatcher`] / [`Projection`] — Predicate and view extension points
//! - [`Match`] — Ordered arms with first-match-wins dispatch
//! - [`Shape`] — Construction-time compatibility check, separate from matching
//!
//! # Key Design Insights
//!
//! 1. **Bindings live outside the pattern**: every evaluation threads its own
//!    environment, so one pattern tree serves loops, recursion and threads.
//!
//! 2. **Failure leaves no trace**: a sub-pattern that fails rolls the
//!    environment back to where it started. `Or` branches, `Not` and
//!    segment backtracking never leak partial bindings.
//!
//! 3. **Segments are lazy**: a segment consumes as few positions as the rest
//!    of the destructure allows, scanning each position once.
//!
//! # Example
//!
//! ```
//! use pmatch::prelude::*;
//!
//! let i = Capture::new("i");
//! let j = Capture::new("j");
//!
//! let sum = {
//!     let (i, j) = (i.clone(), j.clone());
//!     move |b: &Bindings<'_>| b[&i].as_int().unwrap_or(0) + b[&j].as_int().unwrap_or(0)
//! };
//!
//! let m = Match::new()
//!     .arm(ds![&i, &j].when(move |b| sum(b) == 10), |_| 3)
//!     .arm(ds![Pattern::lt(5), Pattern::wildcard()], |_| 5)
//!     .arm(Pattern::wildcard(), |_| 1);
//!
//! assert_eq!(m.evaluate(&Value::from((1, 9))), Ok(3));
//! assert_eq!(m.evaluate(&Value::from((1, 7))), Ok(5));
//! assert_eq!(m.evaluate(&Value::from((7, 7))), Ok(1));
//! ```
//!
//! # Declarative patterns
//!
//! With feature `"registry"`, patterns and whole match expressions load from
//! JSON/YAML through a [`Registry`] of named predicates and projections.

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod arm;
mod capture;
mod destructure;
mod dispatch;
mod evaluate;
mod pattern;
mod projection;
mod shape;
mod trace;
mod value;
mod value_matcher;

#[cfg(feature = "registry")]
mod config;
#[cfg(feature = "registry")]
mod registry;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use arm::Arm;
pub use capture::{Bindings, Bound, Capture, CaptureMode};
pub use destructure::Sequence;
pub use dispatch::Match;
pub use pattern::{Condition, Pattern};
pub use shape::{PatternPath, Shape, ShapeError};
pub use value::{CustomValue, Value, ValueKind};

// Extension points
pub use projection::{Field, IsPresent, Len, MapFn, Projection, SelectFn, Unwrap};
pub use value_matcher::{
    BoolMatcher, CompareMatcher, CompareOp, FnMatcher, StringMatcher, TypeMatcher, ValueMatcher,
};

// Registry (feature-gated)
#[cfg(feature = "registry")]
pub use config::{
    ArmConfig, GuardConfig, MatchConfig, OperandConfig, PatternConfig, StringMatchConfig,
    StringMatchType, ValueConfig,
};
#[cfg(feature = "registry")]
pub use registry::{register_core, Registry, RegistryBuilder};

// Trace types
pub use trace::{EvalStep, EvalTrace};

/// Match `value` against `pattern` in a fresh environment.
///
/// Returns the bindings on success. The one-arm form of [`Match`], for
/// `if let` style use.
///
/// ```
/// use pmatch::{ds, matches, Capture, Pattern, Value};
///
/// let rest = Capture::new("rest");
/// let subject = Value::from(('*', "123", 3));
/// let pattern = ds![Pattern::segment(Pattern::wildcard()), 3];
///
/// assert!(matches(&subject, &pattern).is_some());
/// assert!(matches(&subject, &ds![&rest, Pattern::wildcard()]).is_none());
/// ```
#[must_use]
pub fn matches<'v>(value: &'v Value, pattern: &Pattern) -> Option<Bindings<'v>> {
    let mut bindings = Bindings::new();
    pattern.matches(value, &mut bindings).then_some(bindings)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Macros
// ═══════════════════════════════════════════════════════════════════════════════

/// Build a `Destructure` pattern. Elements are anything convertible into a
/// [`Pattern`]: literals, `&Capture`, or patterns.
///
/// ```
/// use pmatch::{ds, Pattern, Value};
///
/// let pattern = ds!['+', Pattern::wildcard(), 1];
/// assert!(pattern.is_match(&Value::from(('+', 5, 1))));
/// ```
#[macro_export]
macro_rules! ds {
    ($($element:expr),* $(,)?) => {
        $crate::Pattern::destructure(::std::vec![$($crate::Pattern::from($element)),*])
    };
}

/// Build an `Or` pattern from anything convertible into a [`Pattern`].
#[macro_export]
macro_rules! or {
    ($($alternative:expr),+ $(,)?) => {
        $crate::Pattern::or(::std::vec![$($crate::Pattern::from($alternative)),+])
    };
}

/// Build an `And` pattern from anything convertible into a [`Pattern`].
#[macro_export]
macro_rules! and {
    ($($conjunct:expr),+ $(,)?) => {
        $crate::Pattern::and(::std::vec![$($crate::Pattern::from($conjunct)),+])
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use pmatch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        and,
        ds,
        // Functions
        matches,
        or,
        // Core types
        Arm,
        Bindings,
        Capture,
        CaptureMode,
        // Extension points
        CustomValue,
        // Trace types
        EvalStep,
        EvalTrace,
        Match,
        // Errors
        MatchError,
        Pattern,
        Projection,
        Shape,
        ShapeError,
        StringMatcher,
        Value,
        ValueKind,
        ValueMatcher,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum allowed pattern nesting depth.
///
/// Evaluation recurses once per nesting level. Validate at construction
/// time via [`Match::validate_limits`].
pub const MAX_DEPTH: usize = 32;

/// Maximum number of arms in a single [`Match`].
pub const MAX_ARMS: usize = 256;

/// Maximum number of children of a single `Or`, `And` or `Destructure`.
///
/// Width-based protection for configs, the counterpart of [`MAX_DEPTH`].
pub const MAX_PATTERNS_PER_COMPOUND: usize = 256;

/// Maximum length for regex patterns loaded from config.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from match construction, validation and evaluation.
///
/// Everything except [`NonExhaustive`](Self::NonExhaustive) is a
/// construction-time problem: fix the pattern or config and rebuild.
/// Capture conflicts, false guards and exhausted segment searches are not
/// errors; the arm simply does not match.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// No arm matched the subject.
    #[error(
        "non-exhaustive match: none of the {arms} arms matched {subject} \
         — add a wildcard arm or use `evaluate_or`"
    )]
    NonExhaustive {
        /// Number of arms tried.
        arms: usize,
        /// The subject (Debug format).
        subject: String,
    },
    /// An arm's pattern can never match subjects of the declared shape.
    #[error("arm {arm} can never match subjects of shape {shape}: {source}")]
    Shape {
        /// Index of the offending arm.
        arm: usize,
        /// The declared subject shape.
        shape: String,
        /// What is wrong and where.
        source: ShapeError,
    },
    /// Pattern nesting exceeds [`MAX_DEPTH`].
    #[error(
        "pattern nesting depth is {depth}, but maximum allowed is {max} \
         — flatten nested destructures or split the match"
    )]
    DepthExceeded {
        /// Actual depth of the pattern tree.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
    /// Too many arms in a single [`Match`].
    #[error("match has {count} arms, but maximum allowed is {max}")]
    TooManyArms {
        /// Actual number of arms.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// Too many children in a single compound pattern.
    #[error("compound pattern has {count} children, but maximum allowed is {max}")]
    TooManyPatterns {
        /// Actual number of children.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// A regex or string pattern is invalid.
    #[error("invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying error message.
        reason: String,
    },
    /// Configuration deserialization or construction failed.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// The underlying error message.
        reason: String,
    },
    /// A name was not found in the registry.
    #[error("unknown {registry} \"{name}\"{}", registered_hint(.registry, .available))]
    UnknownName {
        /// The unregistered name.
        name: String,
        /// Which registry was searched (`"predicate"` or `"projection"`).
        registry: &'static str,
        /// Names that ARE registered (for self-correcting error messages).
        available: Vec<String>,
    },
}

fn registered_hint(registry: &str, available: &[String]) -> String {
    if available.is_empty() {
        format!(" — no {registry}s are registered")
    } else {
        format!(" — registered: {}", available.join(", "))
    }
}
