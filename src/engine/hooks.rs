//! Instrumentation hooks
//!
//! Hooks observe a parse attempt without changing its outcome. They are the
//! intended place to hang diagnostics (furthest-failure tracking, counters,
//! traces) since the engine itself reports failure as a bare signal.

use super::outcome::ParseOutcome;
use super::parser::Parser;
use std::borrow::Cow;

/// Runs a hook immediately before each attempt
#[derive(Clone, Copy)]
pub struct Before<P, F> {
    inner: P,
    hook: F,
}

impl<P, F> Before<P, F> {
    /// Create a new before-hook wrapper
    pub fn new(inner: P, hook: F) -> Self {
        Self { inner, hook }
    }
}

impl<E, P, F> Parser<E> for Before<P, F>
where
    P: Parser<E>,
    F: Fn(&[E], usize),
{
    type Output = P::Output;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<P::Output> {
        (self.hook)(source, pos);
        self.inner.parse_at(source, pos)
    }
}

/// Runs a hook after each success
#[derive(Clone, Copy)]
pub struct OnSuccess<P, F> {
    inner: P,
    hook: F,
}

impl<P, F> OnSuccess<P, F> {
    /// Create a new success-hook wrapper
    pub fn new(inner: P, hook: F) -> Self {
        Self { inner, hook }
    }
}

impl<E, P, F> Parser<E> for OnSuccess<P, F>
where
    P: Parser<E>,
    F: Fn(&[E], usize, usize, &P::Output),
{
    type Output = P::Output;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<P::Output> {
        let outcome = self.inner.parse_at(source, pos);
        if let ParseOutcome::Success { consumed, value } = &outcome {
            (self.hook)(source, pos, *consumed, value);
        }
        outcome
    }
}

/// Runs a hook after each failure
#[derive(Clone, Copy)]
pub struct OnFailure<P, F> {
    inner: P,
    hook: F,
}

impl<P, F> OnFailure<P, F> {
    /// Create a new failure-hook wrapper
    pub fn new(inner: P, hook: F) -> Self {
        Self { inner, hook }
    }
}

impl<E, P, F> Parser<E> for OnFailure<P, F>
where
    P: Parser<E>,
    F: Fn(&[E], usize),
{
    type Output = P::Output;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<P::Output> {
        let outcome = self.inner.parse_at(source, pos);
        if outcome.is_failure() {
            (self.hook)(source, pos);
        }
        outcome
    }
}

/// Named wrapper that logs every attempt at debug level
///
/// Records are emitted through the `log` facade when the `logging` feature
/// is enabled; otherwise this is a plain pass-through.
#[derive(Debug, Clone)]
pub struct Traced<P> {
    inner: P,
    name: Cow<'static, str>,
}

impl<P> Traced<P> {
    /// Create a new traced wrapper
    pub fn new(inner: P, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            inner,
            name: name.into(),
        }
    }

    /// Name used in log records
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<E, P> Parser<E> for Traced<P>
where
    P: Parser<E>,
{
    type Output = P::Output;

    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<P::Output> {
        log_debug!("{}: trying at {} of {}", self.name, pos, source.len());
        let outcome = self.inner.parse_at(source, pos);
        match &outcome {
            ParseOutcome::Success { consumed, .. } => {
                log_debug!("{}: matched {} at {}", self.name, consumed, pos);
            }
            ParseOutcome::Failure => {
                log_debug!("{}: failed at {}", self.name, pos);
            }
        }
        outcome
    }
}

// ============================================================================
// Free constructors
// ============================================================================

/// Run `hook` with `(source, pos)` before every attempt of `inner`
pub fn before<E, P, F>(inner: P, hook: F) -> Before<P, F>
where
    P: Parser<E>,
    F: Fn(&[E], usize),
{
    Before::new(inner, hook)
}

/// Run `hook` with `(source, pos, consumed, value)` after every success of `inner`
pub fn on_success<E, P, F>(inner: P, hook: F) -> OnSuccess<P, F>
where
    P: Parser<E>,
    F: Fn(&[E], usize, usize, &P::Output),
{
    OnSuccess::new(inner, hook)
}

/// Run `hook` with `(source, pos)` after every failure of `inner`
pub fn on_failure<E, P, F>(inner: P, hook: F) -> OnFailure<P, F>
where
    P: Parser<E>,
    F: Fn(&[E], usize),
{
    OnFailure::new(inner, hook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::combinators::satisfy;
    use crate::engine::parser::ParserExt;
    use std::cell::{Cell, RefCell};

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn digit() -> impl Parser<char, Output = char> + Clone {
        satisfy(|c: &char| c.is_ascii_digit())
    }

    #[test]
    fn test_before_runs_on_every_attempt() {
        let seen = RefCell::new(Vec::new());
        let parser = digit().before(|_, pos| seen.borrow_mut().push(pos));
        let source = chars("1x");

        assert!(parser.parse_at(&source, 0).is_success());
        assert!(parser.parse_at(&source, 1).is_failure());
        assert_eq!(*seen.borrow(), vec![0, 1]);
    }

    #[test]
    fn test_on_success_sees_consumed_and_value() {
        let seen = RefCell::new(None);
        let parser = digit().on_success(|_, pos, consumed, value: &char| {
            *seen.borrow_mut() = Some((pos, consumed, *value));
        });

        assert!(parser.parse_at(&chars("x4"), 0).is_failure());
        assert_eq!(*seen.borrow(), None);
        assert_eq!(parser.parse_at(&chars("x4"), 1), ParseOutcome::success(1, '4'));
        assert_eq!(*seen.borrow(), Some((1, 1, '4')));
    }

    #[test]
    fn test_on_failure_tracks_furthest_position() {
        let furthest = Cell::new(0);
        let parser = digit().on_failure(|_, pos| furthest.set(furthest.get().max(pos)));
        let source = chars("12a");

        for pos in 0..source.len() {
            parser.parse_at(&source, pos);
        }
        assert_eq!(furthest.get(), 2);
    }

    #[test]
    fn test_hooks_do_not_alter_outcome() {
        let source = chars("5");
        let plain = digit().parse(&source);
        let hooked = digit()
            .before(|_, _| {})
            .on_success(|_, _, _, _| {})
            .on_failure(|_, _| {})
            .traced("digit")
            .parse(&source);
        assert_eq!(plain, hooked);
    }

    #[test]
    fn test_free_constructors() {
        let count = Cell::new(0);
        let counted = before(digit(), |_: &[char], _| count.set(count.get() + 1));
        let succeeded = on_success(counted, |_: &[char], _, _, _: &char| {
            count.set(count.get() + 10)
        });
        let parser = on_failure(succeeded, |_: &[char], _| count.set(count.get() + 100));
        parser.parse(&chars("1"));
        parser.parse(&chars("a"));
        assert_eq!(count.get(), 112);
    }

    #[test]
    fn test_traced_name() {
        let parser = Traced::new(digit(), "digit");
        assert_eq!(parser.name(), "digit");
        assert_eq!(parser.parse(&chars("9")), ParseOutcome::success(1, '9'));
    }
}
