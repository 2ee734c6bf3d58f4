//! Destructure and segment search
//!
//! A [`Sequence`] is the element list of a `Destructure` pattern. Without
//! segments it is a positional zip. With segments it is a backtracking
//! search over how many positions each segment consumes, the same family of
//! problem as a glob with several `*`.
//!
//! # Segment search
//!
//! For a segment at the front of the remaining patterns, candidate lengths
//! `k` are tried in ascending order from `0`: segments are lazy and the
//! smallest `k` that lets the rest of the sequence match wins. Going from
//! `k` to `k + 1` only checks the one newly consumed position against the
//! segment's pattern. The first position that fails ends the search for
//! this segment, since every longer run would contain it too. A single
//! segment is therefore a linear scan; several segments backtrack into the
//! outer segment's next `k` when an inner one is exhausted.

use crate::evaluate::Positions;
use crate::{Bindings, Pattern};

/// The element list of a `Destructure` pattern.
#[derive(Clone)]
pub struct Sequence {
    patterns: Vec<Pattern>,
    /// `fixed_from[i]` = number of non-segment patterns in `patterns[i..]`.
    fixed_from: Vec<usize>,
    segments: usize,
}

impl Sequence {
    pub(crate) fn new(patterns: Vec<Pattern>) -> Self {
        let mut fixed_from = vec![0; patterns.len() + 1];
        for (i, pattern) in patterns.iter().enumerate().rev() {
            fixed_from[i] = fixed_from[i + 1] + usize::from(!pattern.is_segment());
        }
        let segments = patterns.len() - fixed_from[0];
        Self {
            patterns,
            fixed_from,
            segments,
        }
    }

    /// The element patterns, in position order.
    #[must_use]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Number of elements that are not segments: the minimum arity matched.
    #[must_use]
    pub fn fixed_len(&self) -> usize {
        self.fixed_from[0]
    }

    /// Number of segment elements.
    #[must_use]
    pub fn segments(&self) -> usize {
        self.segments
    }

    pub(crate) fn match_positions<'a, 'v: 'a>(
        &self,
        values: Positions<'a, 'v>,
        env: &mut Bindings<'v>,
    ) -> bool {
        let len = values.len();
        if self.segments == 0 && len != self.fixed_len() {
            return false;
        }
        if len < self.fixed_len() {
            return false;
        }
        self.match_from(0, values, 0, env)
    }

    /// Match `patterns[pi..]` against `values[vi..]`.
    ///
    /// Leaves partial bindings behind on failure; callers roll back.
    fn match_from<'a, 'v: 'a>(
        &self,
        pi: usize,
        values: Positions<'a, 'v>,
        mut vi: usize,
        env: &mut Bindings<'v>,
    ) -> bool {
        for (offset, pattern) in self.patterns[pi..].iter().enumerate() {
            if let Pattern::Segment(inner) = pattern {
                return self.match_segment(inner, pi + offset, values, vi, env);
            }
            match values.get(vi) {
                Some(value) if pattern.match_subject(value, env) => vi += 1,
                _ => return false,
            }
        }
        vi == values.len()
    }

    /// The segment `patterns[pi]` starts at `values[start]`.
    fn match_segment<'a, 'v: 'a>(
        &self,
        inner: &Pattern,
        pi: usize,
        values: Positions<'a, 'v>,
        start: usize,
        env: &mut Bindings<'v>,
    ) -> bool {
        // Positions the fixed patterns after this segment still need.
        let Some(max_take) = values
            .len()
            .checked_sub(start)
            .and_then(|rest| rest.checked_sub(self.fixed_from[pi + 1]))
        else {
            return false;
        };

        let mut k = 0;
        loop {
            let mark = env.len();
            if self.match_from(pi + 1, values, start + k, env) {
                tracing::trace!(segment = pi, start, consumed = k, "segment matched");
                return true;
            }
            env.truncate(mark);

            if k == max_take {
                tracing::trace!(segment = pi, start, consumed = k, "segment exhausted");
                return false;
            }
            match values.get(start + k) {
                Some(value) if inner.match_subject(value, env) => k += 1,
                _ => {
                    tracing::trace!(segment = pi, start, failed_at = start + k, "segment pruned");
                    return false;
                }
            }
        }
    }
}
