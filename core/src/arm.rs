//! `Arm` — Pattern + handler
//!
//! An arm pairs a pattern with the code to run when it is the first to
//! match. The pattern is either owned by the arm or borrowed from somewhere
//! longer-lived (a `static`, a field), so a pattern tree can be built once
//! and shared by many match expressions.

use crate::{Bindings, Pattern, Value};
use std::borrow::Cow;
use std::fmt;

type Handler<'a, R> = Box<dyn Fn(&Value, &Bindings<'_>) -> R + Send + Sync + 'a>;

/// One `(pattern, handler)` pair of a [`Match`](crate::Match).
///
/// # Type Parameters
///
/// - `'a`: How long a borrowed pattern and the handler's captures live
/// - `R`: The result type shared by every arm of one match
pub struct Arm<'a, R> {
    pattern: Cow<'a, Pattern>,
    handler: Handler<'a, R>,
}

impl<'a, R> Arm<'a, R> {
    /// An arm whose handler reads the bindings.
    pub fn new<F>(pattern: impl Into<Pattern>, handler: F) -> Self
    where
        F: Fn(&Bindings<'_>) -> R + Send + Sync + 'a,
    {
        Self {
            pattern: Cow::Owned(pattern.into()),
            handler: Box::new(move |_: &Value, bindings: &Bindings<'_>| handler(bindings)),
        }
    }

    /// An arm whose handler also reads the subject.
    pub fn with_subject<F>(pattern: impl Into<Pattern>, handler: F) -> Self
    where
        F: Fn(&Value, &Bindings<'_>) -> R + Send + Sync + 'a,
    {
        Self {
            pattern: Cow::Owned(pattern.into()),
            handler: Box::new(handler),
        }
    }

    /// An arm over a pattern that lives elsewhere.
    pub fn borrowed<F>(pattern: &'a Pattern, handler: F) -> Self
    where
        F: Fn(&Value, &Bindings<'_>) -> R + Send + Sync + 'a,
    {
        Self {
            pattern: Cow::Borrowed(pattern),
            handler: Box::new(handler),
        }
    }

    /// The arm's pattern.
    #[must_use]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Run the handler. Only called once the pattern matched.
    pub(crate) fn run(&self, subject: &Value, bindings: &Bindings<'_>) -> R {
        (self.handler)(subject, bindings)
    }
}

impl<R> fmt::Debug for Arm<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arm")
            .field("pattern", &*self.pattern)
            .field("borrowed", &matches!(self.pattern, Cow::Borrowed(_)))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Capture;

    #[test]
    fn test_owned_and_borrowed_patterns() {
        let shared = Pattern::literal(1);
        let owned: Arm<'_, i64> = Arm::new(1, |_| 10);
        let borrowed: Arm<'_, i64> = Arm::borrowed(&shared, |_, _| 20);

        assert!(format!("{owned:?}").contains("borrowed: false"));
        assert!(format!("{borrowed:?}").contains("borrowed: true"));
        assert!(std::ptr::eq(borrowed.pattern(), &shared));
    }

    #[test]
    fn test_run_passes_subject_and_bindings() {
        let x = Capture::new("x");
        let mut bindings = Bindings::new();
        let subject = Value::from(4);
        assert!(Pattern::capture(&x).matches(&subject, &mut bindings));

        let arm = Arm::with_subject(&x, |v: &Value, b: &Bindings<'_>| {
            v.as_int().unwrap_or(0) + b.len() as i64
        });
        assert_eq!(arm.run(&subject, &bindings), 5);
    }

    #[test]
    fn test_arm_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Arm<'static, String>>();
    }
}
