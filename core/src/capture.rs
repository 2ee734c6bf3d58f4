//! Captures and the binding environment
//!
//! A [`Capture`] is the identity of a named variable: create it once, use it
//! in as many patterns as you like. The values it is bound to never live in
//! the pattern; they live in a [`Bindings`] environment that the matcher
//! threads through one evaluation. Patterns therefore stay immutable and can
//! be shared freely, reused in recursion, or evaluated from several threads.
//!
//! # Ownership modes
//!
//! - [`CaptureMode::Owning`] (default) — the environment holds a clone
//! - [`CaptureMode::Borrowed`] — the environment holds `&'v Value` into the
//!   subject; the borrow checker ties it to the lifetime of the subject, so
//!   it cannot outlive the evaluation it was made in

use crate::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, Index};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_CAPTURE_ID: AtomicU64 = AtomicU64::new(1);

/// How a capture stores the value it is bound to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CaptureMode {
    /// Clone the matched value into the environment.
    #[default]
    Owning,
    /// Alias the matched value for the duration of one evaluation.
    Borrowed,
}

/// The identity of a named capture.
///
/// Two handles are the same capture iff one was cloned from the other;
/// two calls to [`Capture::new`] with the same name produce distinct
/// captures that never see each other's bindings.
///
/// # Example
///
/// ```
/// use pmatch::{ds, matches, Capture, Pattern, Value};
///
/// let x = Capture::new("x");
/// let pattern = ds![&x, ds![Pattern::wildcard(), &x]];
///
/// assert!(matches(&Value::from((2, (1, 2))), &pattern).is_some());
/// assert!(matches(&Value::from((2, (1, 3))), &pattern).is_none());
/// ```
#[derive(Clone)]
pub struct Capture {
    id: u64,
    name: Arc<str>,
    mode: CaptureMode,
}

impl Capture {
    /// Create a new owning capture.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self::with_mode(name, CaptureMode::Owning)
    }

    /// Create a new capture that aliases the subject instead of cloning it.
    pub fn borrowed(name: impl AsRef<str>) -> Self {
        Self::with_mode(name, CaptureMode::Borrowed)
    }

    /// Create a new capture with an explicit ownership mode.
    pub fn with_mode(name: impl AsRef<str>, mode: CaptureMode) -> Self {
        Self {
            id: NEXT_CAPTURE_ID.fetch_add(1, Ordering::Relaxed),
            name: Arc::from(name.as_ref()),
            mode,
        }
    }

    /// The name given at construction. Only used for display.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ownership mode.
    #[must_use]
    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    /// The process-unique identity of this capture.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl PartialEq for Capture {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Capture {}

impl Hash for Capture {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            CaptureMode::Owning => write!(f, "{}#{}", self.name, self.id),
            CaptureMode::Borrowed => write!(f, "&{}#{}", self.name, self.id),
        }
    }
}

impl fmt::Display for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A value held by the environment.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound<'v> {
    /// An independent copy.
    Owned(Value),
    /// A reference into the subject.
    Borrowed(&'v Value),
}

impl Bound<'_> {
    /// Returns `true` if this aliases the subject.
    #[must_use]
    pub fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed(_))
    }

    /// Detach from the subject.
    #[must_use]
    pub fn into_owned(self) -> Bound<'static> {
        match self {
            Self::Owned(v) => Bound::Owned(v),
            Self::Borrowed(v) => Bound::Owned(v.clone()),
        }
    }
}

impl Deref for Bound<'_> {
    type Target = Value;

    fn deref(&self) -> &Value {
        match self {
            Self::Owned(v) => v,
            Self::Borrowed(v) => v,
        }
    }
}

/// The binding environment of one match attempt.
///
/// Entries keep binding order. Each capture appears at most once: a second
/// encounter of a bound capture is an equality check, never a rebind.
#[derive(Debug, Clone, Default)]
pub struct Bindings<'v> {
    entries: Vec<(Capture, Bound<'v>)>,
}

impl<'v> Bindings<'v> {
    /// An empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The value bound to `capture`, if any.
    #[must_use]
    pub fn get(&self, capture: &Capture) -> Option<&Value> {
        self.get_bound(capture).map(Deref::deref)
    }

    /// The binding of `capture` with its ownership, if any.
    #[must_use]
    pub fn get_bound(&self, capture: &Capture) -> Option<&Bound<'v>> {
        self.entries
            .iter()
            .find(|(c, _)| c == capture)
            .map(|(_, bound)| bound)
    }

    /// Look a binding up by capture name. The first capture bound under
    /// that name wins.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(c, _)| c.name() == name)
            .map(|(_, bound)| &**bound)
    }

    /// Returns `true` if `capture` is bound.
    #[must_use]
    pub fn is_bound(&self, capture: &Capture) -> bool {
        self.entries.iter().any(|(c, _)| c == capture)
    }

    /// Number of bound captures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate bindings in the order they were made.
    pub fn iter(&self) -> impl Iterator<Item = (&Capture, &Value)> {
        self.entries.iter().map(|(c, bound)| (c, &**bound))
    }

    /// Unbind everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Unbind a single capture.
    pub fn remove(&mut self, capture: &Capture) -> Option<Bound<'v>> {
        let index = self.entries.iter().position(|(c, _)| c == capture)?;
        Some(self.entries.remove(index).1)
    }

    /// Detach every binding from the subject.
    #[must_use]
    pub fn into_owned(self) -> Bindings<'static> {
        Bindings {
            entries: self
                .entries
                .into_iter()
                .map(|(c, bound)| (c, bound.into_owned()))
                .collect(),
        }
    }

    /// `(name, rendered value)` pairs, for traces and diagnostics.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(c, v)| (c.name().to_string(), format!("{v:?}")))
            .collect()
    }

    pub(crate) fn bind(&mut self, capture: &Capture, bound: Bound<'v>) {
        self.entries.push((capture.clone(), bound));
    }

    /// Drop every binding made after the environment had `mark` entries.
    pub(crate) fn truncate(&mut self, mark: usize) {
        self.entries.truncate(mark);
    }
}

impl Index<&Capture> for Bindings<'_> {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if `capture` is not bound. Handlers only see captures their
    /// arm bound unconditionally, so a panic here means the capture sits
    /// under `or`/`not`; use [`Bindings::get`] there.
    fn index(&self, capture: &Capture) -> &Value {
        match self.get(capture) {
            Some(v) => v,
            None => panic!("capture `{capture}` is not bound in this match"),
        }
    }
}
