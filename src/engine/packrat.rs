//! Packrat memoization
//!
//! [`Packrat`] wraps a parser with a private table from start position to
//! the successful outcome computed there. Backtracking grammars that retry
//! the same sub-rule at the same offset then pay for it once.
//!
//! Only successes are recorded. A failure at a position is recomputed on
//! every call, which differs from classical packrat parsing (where both are
//! memoized) and can cost time in grammars that repeatedly probe a failing
//! rule. The asymmetry is kept for compatibility with existing grammars.
//!
//! The table is keyed by position alone, so one wrapper must only ever see
//! one logical input. Build a fresh wrapper (or call [`Packrat::clear`])
//! before parsing a different source.

use super::outcome::ParseOutcome;
use super::parser::Parser;
use ahash::RandomState;
use hashbrown::HashMap;
use std::cell::{Cell, RefCell};
use std::fmt;

/// Default number of positions reserved up front
const DEFAULT_CAPACITY: usize = 64;

/// Memoizing wrapper around a parser
///
/// The memo table sits in a `RefCell`, so the wrapper is `!Sync` and cannot
/// be shared across threads.
pub struct Packrat<P, T> {
    inner: P,
    memo: RefCell<HashMap<usize, (usize, T), RandomState>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<P, T> Packrat<P, T> {
    /// Wrap `inner` with an empty memo table
    pub fn new(inner: P) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    /// Wrap `inner`, reserving room for `capacity` memoized positions
    ///
    /// Sizing the table to the expected input length avoids rehashing
    /// during long parses.
    pub fn with_capacity(inner: P, capacity: usize) -> Self {
        Self {
            inner,
            memo: RefCell::new(HashMap::with_capacity_and_hasher(
                capacity,
                RandomState::new(),
            )),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// The wrapped parser
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Current cache statistics
    pub fn stats(&self) -> PackratStats {
        PackratStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
            entries: self.memo.borrow().len(),
        }
    }

    /// Forget every memoized outcome and reset the counters
    pub fn clear(&self) {
        self.memo.borrow_mut().clear();
        self.hits.set(0);
        self.misses.set(0);
    }
}

impl<E, P, T> Parser<E> for Packrat<P, T>
where
    P: Parser<E, Output = T>,
    T: Clone,
{
    type Output = T;

    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<T> {
        // The borrow must end before `inner` runs: a recursive grammar can
        // re-enter this wrapper at another position.
        let cached = self.memo.borrow().get(&pos).cloned();
        if let Some((consumed, value)) = cached {
            self.hits.set(self.hits.get() + 1);
            log_debug!("packrat hit at {} (consumed {})", pos, consumed);
            return ParseOutcome::success(consumed, value);
        }

        self.misses.set(self.misses.get() + 1);
        log_debug!("packrat miss at {}", pos);

        let outcome = self.inner.parse_at(source, pos);
        if let ParseOutcome::Success { consumed, value } = &outcome {
            self.memo
                .borrow_mut()
                .insert(pos, (*consumed, value.clone()));
        }
        outcome
    }
}

impl<P, T> fmt::Debug for Packrat<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packrat")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Memoize successful outcomes of `inner` by start position
pub fn packrat<E, P>(inner: P) -> Packrat<P, P::Output>
where
    P: Parser<E>,
    P::Output: Clone,
{
    Packrat::new(inner)
}

/// Cache statistics of a [`Packrat`] wrapper
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackratStats {
    /// Invocations answered from the table
    pub hits: u64,
    /// Invocations that ran the wrapped parser
    pub misses: u64,
    /// Positions currently memoized
    pub entries: usize,
}

impl PackratStats {
    /// Fraction of invocations answered from the table
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

impl fmt::Display for PackratStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hits, {} misses, {} entries ({:.1}% hit rate)",
            self.hits,
            self.misses,
            self.entries,
            self.hit_rate() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::combinators::satisfy;
    use crate::engine::parser::ParserExt;
    use std::cell::Cell;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_second_call_is_served_from_cache() {
        let runs = Cell::new(0);
        let parser = satisfy(|c: &char| c.is_ascii_digit())
            .on_success(|_, _, _, _| runs.set(runs.get() + 1))
            .packrat();
        let source = chars("7");

        let first = parser.parse_at(&source, 0);
        let second = parser.parse_at(&source, 0);

        assert_eq!(first, second);
        assert_eq!(first, ParseOutcome::success(1, '7'));
        assert_eq!(runs.get(), 1);
        assert_eq!(
            parser.stats(),
            PackratStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn test_failures_are_recomputed() {
        let attempts = Cell::new(0);
        let parser = satisfy(|c: &char| c.is_ascii_digit())
            .before(|_, _| attempts.set(attempts.get() + 1))
            .packrat();
        let source = chars("x");

        assert!(parser.parse_at(&source, 0).is_failure());
        assert!(parser.parse_at(&source, 0).is_failure());
        assert_eq!(attempts.get(), 2);
        assert_eq!(parser.stats().entries, 0);
        assert_eq!(parser.stats().hits, 0);
    }

    #[test]
    fn test_positions_are_cached_independently() {
        let parser = packrat(satisfy(|c: &char| c.is_alphabetic()));
        let source = chars("ab");

        assert_eq!(parser.parse_at(&source, 0), ParseOutcome::success(1, 'a'));
        assert_eq!(parser.parse_at(&source, 1), ParseOutcome::success(1, 'b'));
        assert_eq!(parser.stats().entries, 2);
        assert_eq!(parser.stats().misses, 2);
    }

    #[test]
    fn test_clear_resets_table_and_counters() {
        let parser = Packrat::with_capacity(satisfy(|c: &char| *c == 'a'), 8);
        let source = chars("a");
        parser.parse(&source);
        parser.parse(&source);
        assert_eq!(parser.stats().hits, 1);

        parser.clear();
        assert_eq!(parser.stats(), PackratStats::default());
    }

    #[test]
    fn test_hit_rate() {
        let stats = PackratStats {
            hits: 3,
            misses: 1,
            entries: 1,
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
        assert_eq!(PackratStats::default().hit_rate(), 0.0);
    }
}
