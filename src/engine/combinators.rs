//! Core combinator algebra
//!
//! Each combinator is a small struct holding its sub-parsers and implementing
//! [`Parser`]. Free functions construct them; the same constructors are
//! available as methods through [`ParserExt`](super::parser::ParserExt).
//!
//! Failure propagates unchanged through [`Cat`], the mandatory head of
//! [`Delimited`] / [`SeparatedBy`], and the second stage of [`Bind`]. Only
//! [`Alt`], [`Optional`], [`And`], [`Not`] and [`Repeat`] turn a sub-failure
//! into an overall success.
//!
//! # Zero-width repetition
//!
//! [`Repeat`] with an unbounded maximum never terminates when its parser
//! succeeds without consuming input (for example an [`Optional`] or a
//! lookahead). The engine does not guard against this; grammars must ensure
//! every repeated parser consumes at least one element on success. The same
//! holds for the delimiter/value pair of [`Delimited`] and [`SeparatedBy`].

use super::collector::Collector;
use super::error::EngineError;
use super::outcome::ParseOutcome;
use super::parser::{pairing, Pairing, Parser};
use std::marker::PhantomData;

// ============================================================================
// Primitives
// ============================================================================

/// Match exactly one element satisfying a predicate
#[derive(Clone, Copy)]
pub struct Satisfy<F> {
    test: F,
}

impl<E, F> Parser<E> for Satisfy<F>
where
    E: Clone,
    F: Fn(&E) -> bool,
{
    type Output = E;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<E> {
        match source.get(pos) {
            Some(element) if (self.test)(element) => ParseOutcome::success(1, element.clone()),
            _ => ParseOutcome::failure(),
        }
    }
}

/// Match one element for which `test` holds; fails at end of input
pub fn satisfy<E, F>(test: F) -> Satisfy<F>
where
    E: Clone,
    F: Fn(&E) -> bool,
{
    Satisfy { test }
}

/// Always succeed with a value, consuming nothing
#[derive(Debug, Clone, Copy)]
pub struct Succeed<T> {
    value: T,
}

impl<E, T: Clone> Parser<E> for Succeed<T> {
    type Output = T;

    #[inline]
    fn parse_at(&self, _source: &[E], _pos: usize) -> ParseOutcome<T> {
        ParseOutcome::success(0, self.value.clone())
    }
}

/// Parser that always succeeds with `value` and consumes nothing
pub fn success<T: Clone>(value: T) -> Succeed<T> {
    Succeed { value }
}

/// Always fail
pub struct Fail<T> {
    _output: PhantomData<fn() -> T>,
}

impl<T> Clone for Fail<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Fail<T> {}

impl<E, T> Parser<E> for Fail<T> {
    type Output = T;

    #[inline]
    fn parse_at(&self, _source: &[E], _pos: usize) -> ParseOutcome<T> {
        ParseOutcome::failure()
    }
}

/// Parser that never matches
pub fn fail<T>() -> Fail<T> {
    Fail {
        _output: PhantomData,
    }
}

/// Succeed without consuming exactly when no input remains
#[derive(Debug, Clone, Copy, Default)]
pub struct EndOfInput;

impl<E> Parser<E> for EndOfInput {
    type Output = ();

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<()> {
        if pos >= source.len() {
            ParseOutcome::success(0, ())
        } else {
            ParseOutcome::failure()
        }
    }
}

/// Parser matching the end of the input
pub fn end_of_input() -> EndOfInput {
    EndOfInput
}

// ============================================================================
// Sequencing and choice
// ============================================================================

/// Sequence of two parsers with a value combiner
#[derive(Clone, Copy)]
pub struct Cat<P0, P1, F> {
    first: P0,
    second: P1,
    combine: F,
}

impl<P0, P1, F> Cat<P0, P1, F> {
    /// Create a new sequence
    pub fn new(first: P0, second: P1, combine: F) -> Self {
        Self {
            first,
            second,
            combine,
        }
    }
}

impl<E, P0, P1, F, T> Parser<E> for Cat<P0, P1, F>
where
    P0: Parser<E>,
    P1: Parser<E>,
    F: Fn(P0::Output, P1::Output) -> T,
{
    type Output = T;

    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<T> {
        let (c0, v0) = match self.first.parse_at(source, pos) {
            ParseOutcome::Success { consumed, value } => (consumed, value),
            ParseOutcome::Failure => return ParseOutcome::failure(),
        };
        match self.second.parse_at(source, pos + c0) {
            ParseOutcome::Success { consumed, value } => {
                ParseOutcome::success(c0 + consumed, (self.combine)(v0, value))
            }
            ParseOutcome::Failure => ParseOutcome::failure(),
        }
    }
}

/// Run `first` then `second`, combining both values
pub fn cat<E, P0, P1, F, T>(first: P0, second: P1, combine: F) -> Cat<P0, P1, F>
where
    P0: Parser<E>,
    P1: Parser<E>,
    F: Fn(P0::Output, P1::Output) -> T,
{
    Cat::new(first, second, combine)
}

/// Run `first` then `second`, pairing both values
pub fn pair<E, P0, P1>(first: P0, second: P1) -> Cat<P0, P1, Pairing<P0::Output, P1::Output>>
where
    P0: Parser<E>,
    P1: Parser<E>,
{
    Cat::new(first, second, pairing as Pairing<P0::Output, P1::Output>)
}

/// Ordered choice between two parsers
#[derive(Clone, Copy)]
pub struct Alt<P0, P1> {
    first: P0,
    second: P1,
}

impl<P0, P1> Alt<P0, P1> {
    /// Create a new ordered choice
    pub fn new(first: P0, second: P1) -> Self {
        Self { first, second }
    }
}

impl<E, P0, P1> Parser<E> for Alt<P0, P1>
where
    P0: Parser<E>,
    P1: Parser<E, Output = P0::Output>,
{
    type Output = P0::Output;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<Self::Output> {
        match self.first.parse_at(source, pos) {
            ParseOutcome::Failure => self.second.parse_at(source, pos),
            success => success,
        }
    }
}

/// Try `first`; if it fails, try `second` from the same position
pub fn alt<E, P0, P1>(first: P0, second: P1) -> Alt<P0, P1>
where
    P0: Parser<E>,
    P1: Parser<E, Output = P0::Output>,
{
    Alt::new(first, second)
}

/// Succeed with a default when the inner parser fails
#[derive(Clone, Copy)]
pub struct Optional<P, T> {
    inner: P,
    default: T,
}

impl<P, T> Optional<P, T> {
    /// Create a new optional parser
    pub fn new(inner: P, default: T) -> Self {
        Self { inner, default }
    }
}

impl<E, P, T> Parser<E> for Optional<P, T>
where
    P: Parser<E, Output = T>,
    T: Clone,
{
    type Output = T;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<T> {
        match self.inner.parse_at(source, pos) {
            ParseOutcome::Failure => ParseOutcome::success(0, self.default.clone()),
            success => success,
        }
    }
}

/// Run `inner`, or succeed with `default` and zero consumption
pub fn optional<E, P>(inner: P, default: P::Output) -> Optional<P, P::Output>
where
    P: Parser<E>,
    P::Output: Clone,
{
    Optional::new(inner, default)
}

// ============================================================================
// Repetition
// ============================================================================

/// Minimum and maximum number of matches for [`Repeat`]
///
/// A `max` of `None` means unbounded. Construction rejects bounds no input
/// could satisfy, so an invalid repetition never reaches parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawBounds")
)]
pub struct Bounds {
    min: usize,
    max: Option<usize>,
}

/// Unvalidated wire form of [`Bounds`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawBounds {
    min: usize,
    max: Option<usize>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawBounds> for Bounds {
    type Error = EngineError;

    fn try_from(raw: RawBounds) -> Result<Self, EngineError> {
        Bounds::new(raw.min, raw.max)
    }
}

impl Bounds {
    /// Zero or more matches
    pub const ZERO_OR_MORE: Bounds = Bounds { min: 0, max: None };

    /// One or more matches
    pub const ONE_OR_MORE: Bounds = Bounds { min: 1, max: None };

    /// Create bounds, rejecting `min > max`
    pub fn new(min: usize, max: Option<usize>) -> Result<Self, EngineError> {
        match max {
            Some(max) if min > max => Err(EngineError::invalid_bounds(
                to_signed(min),
                to_signed(max),
            )),
            _ => Ok(Self { min, max }),
        }
    }

    /// Create bounds from signed values where a `max` of `-1` means unbounded
    ///
    /// A negative `min`, a `max` below `-1`, or `min > max` are rejected.
    pub fn from_signed(min: i64, max: i64) -> Result<Self, EngineError> {
        let invalid = || EngineError::invalid_bounds(min, max);
        let min_count = usize::try_from(min).map_err(|_| invalid())?;
        let max_count = match max {
            -1 => None,
            max => Some(usize::try_from(max).map_err(|_| invalid())?),
        };
        Self::new(min_count, max_count).map_err(|_| invalid())
    }

    /// At least `min` matches
    pub fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    /// Exactly `count` matches
    pub fn exactly(count: usize) -> Self {
        Self {
            min: count,
            max: Some(count),
        }
    }

    /// Minimum number of matches
    #[inline]
    pub fn min(&self) -> usize {
        self.min
    }

    /// Maximum number of matches (`None` = unbounded)
    #[inline]
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// Whether another match may be attempted after `count` matches
    #[inline]
    pub fn allows_more(&self, count: usize) -> bool {
        self.max.map_or(true, |max| count < max)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::ZERO_OR_MORE
    }
}

fn to_signed(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// Repeat a parser within [`Bounds`], folding values into a collector
#[derive(Clone, Copy)]
pub struct Repeat<P, C> {
    inner: P,
    collector: C,
    bounds: Bounds,
}

impl<P, C> Repeat<P, C> {
    /// Create a new repetition
    pub fn new(inner: P, collector: C, bounds: Bounds) -> Self {
        Self {
            inner,
            collector,
            bounds,
        }
    }

    /// The bounds of this repetition
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

impl<E, P, C> Parser<E> for Repeat<P, C>
where
    P: Parser<E>,
    C: Collector<P::Output>,
{
    type Output = C::Output;

    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<C::Output> {
        let mut acc = self.collector.supply();
        let mut count = 0;
        let mut offset = 0;

        while self.bounds.allows_more(count) {
            match self.inner.parse_at(source, pos + offset) {
                ParseOutcome::Success { consumed, value } => {
                    acc = self.collector.accumulate(acc, value);
                    offset += consumed;
                    count += 1;
                }
                ParseOutcome::Failure => break,
            }
        }

        if count < self.bounds.min {
            return ParseOutcome::failure();
        }
        ParseOutcome::success(offset, self.collector.finish(acc))
    }
}

/// Repeat `inner` within `bounds`
pub fn repeat<E, P, C>(inner: P, collector: C, bounds: Bounds) -> Repeat<P, C>
where
    P: Parser<E>,
    C: Collector<P::Output>,
{
    Repeat::new(inner, collector, bounds)
}

/// Repeat `inner` between `min` and `max` times (`max == -1` = unbounded)
///
/// Invalid bounds are reported here, before any input is examined.
pub fn repeat_range<E, P, C>(
    inner: P,
    collector: C,
    min: i64,
    max: i64,
) -> Result<Repeat<P, C>, EngineError>
where
    P: Parser<E>,
    C: Collector<P::Output>,
{
    Ok(Repeat::new(inner, collector, Bounds::from_signed(min, max)?))
}

/// Repeat `inner` any number of times
pub fn zero_or_more<E, P, C>(inner: P, collector: C) -> Repeat<P, C>
where
    P: Parser<E>,
    C: Collector<P::Output>,
{
    Repeat::new(inner, collector, Bounds::ZERO_OR_MORE)
}

/// Repeat `inner` at least once
pub fn one_or_more<E, P, C>(inner: P, collector: C) -> Repeat<P, C>
where
    P: Parser<E>,
    C: Collector<P::Output>,
{
    Repeat::new(inner, collector, Bounds::ONE_OR_MORE)
}

// ============================================================================
// Lookahead
// ============================================================================

/// Positive lookahead: succeed with the inner value, consuming nothing
#[derive(Clone, Copy)]
pub struct And<P> {
    inner: P,
}

impl<P> And<P> {
    /// Create a new positive lookahead
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<E, P> Parser<E> for And<P>
where
    P: Parser<E>,
{
    type Output = P::Output;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<P::Output> {
        match self.inner.parse_at(source, pos) {
            ParseOutcome::Success { value, .. } => ParseOutcome::success(0, value),
            ParseOutcome::Failure => ParseOutcome::failure(),
        }
    }
}

/// Succeed without consuming when `inner` would succeed
pub fn and<E, P>(inner: P) -> And<P>
where
    P: Parser<E>,
{
    And::new(inner)
}

/// Alias of [`and`] reading as positive lookahead
pub fn peek<E, P>(inner: P) -> And<P>
where
    P: Parser<E>,
{
    And::new(inner)
}

/// Negative lookahead: succeed with a fixed value exactly when the inner parser fails
#[derive(Clone, Copy)]
pub struct Not<P, T> {
    inner: P,
    value: T,
}

impl<P, T> Not<P, T> {
    /// Create a new negative lookahead
    pub fn new(inner: P, value: T) -> Self {
        Self { inner, value }
    }
}

impl<E, P, T> Parser<E> for Not<P, T>
where
    P: Parser<E>,
    T: Clone,
{
    type Output = T;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<T> {
        match self.inner.parse_at(source, pos) {
            ParseOutcome::Success { .. } => ParseOutcome::failure(),
            ParseOutcome::Failure => ParseOutcome::success(0, self.value.clone()),
        }
    }
}

/// Succeed with `value` without consuming when `inner` fails
pub fn not<E, P, T>(inner: P, value: T) -> Not<P, T>
where
    P: Parser<E>,
    T: Clone,
{
    Not::new(inner, value)
}

// ============================================================================
// Delimited lists
// ============================================================================

/// A mandatory head value followed by `(delimiter, value)` pairs
///
/// The head seeds a collector through `head_to_collector`; every following
/// pair is merged by `combine` and folded in. A trailing delimiter without a
/// value is left unconsumed.
#[derive(Clone, Copy)]
pub struct Delimited<V, D, F, H> {
    value: V,
    delimiter: D,
    combine: F,
    head_to_collector: H,
}

impl<V, D, F, H> Delimited<V, D, F, H> {
    /// Create a new delimited list parser
    pub fn new(value: V, delimiter: D, combine: F, head_to_collector: H) -> Self {
        Self {
            value,
            delimiter,
            combine,
            head_to_collector,
        }
    }
}

impl<E, V, D, F, H, X, C> Parser<E> for Delimited<V, D, F, H>
where
    V: Parser<E>,
    D: Parser<E>,
    F: Fn(D::Output, V::Output) -> X,
    H: Fn(V::Output) -> C,
    C: Collector<X>,
{
    type Output = C::Output;

    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<C::Output> {
        let (mut offset, head) = match self.value.parse_at(source, pos) {
            ParseOutcome::Success { consumed, value } => (consumed, value),
            ParseOutcome::Failure => return ParseOutcome::failure(),
        };

        let collector = (self.head_to_collector)(head);
        let mut acc = collector.supply();

        while let Some((consumed, delimiter, value)) =
            next_pair(&self.delimiter, &self.value, source, pos + offset)
        {
            acc = collector.accumulate(acc, (self.combine)(delimiter, value));
            offset += consumed;
        }

        ParseOutcome::success(offset, collector.finish(acc))
    }
}

/// Parse `value (delimiter value)*`, folding pairs into a head-seeded collector
pub fn delimited<E, V, D, F, H, X, C>(
    value: V,
    delimiter: D,
    combine: F,
    head_to_collector: H,
) -> Delimited<V, D, F, H>
where
    V: Parser<E>,
    D: Parser<E>,
    F: Fn(D::Output, V::Output) -> X,
    H: Fn(V::Output) -> C,
    C: Collector<X>,
{
    Delimited::new(value, delimiter, combine, head_to_collector)
}

/// A mandatory value followed by `(delimiter, value)` pairs, keeping only values
#[derive(Clone, Copy)]
pub struct SeparatedBy<V, D, C> {
    value: V,
    delimiter: D,
    collector: C,
}

impl<V, D, C> SeparatedBy<V, D, C> {
    /// Create a new separated list parser
    pub fn new(value: V, delimiter: D, collector: C) -> Self {
        Self {
            value,
            delimiter,
            collector,
        }
    }
}

impl<E, V, D, C> Parser<E> for SeparatedBy<V, D, C>
where
    V: Parser<E>,
    D: Parser<E>,
    C: Collector<V::Output>,
{
    type Output = C::Output;

    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<C::Output> {
        let (mut offset, head) = match self.value.parse_at(source, pos) {
            ParseOutcome::Success { consumed, value } => (consumed, value),
            ParseOutcome::Failure => return ParseOutcome::failure(),
        };

        let mut acc = self.collector.accumulate(self.collector.supply(), head);

        while let Some((consumed, _, value)) =
            next_pair(&self.delimiter, &self.value, source, pos + offset)
        {
            acc = self.collector.accumulate(acc, value);
            offset += consumed;
        }

        ParseOutcome::success(offset, self.collector.finish(acc))
    }
}

/// Parse `value (delimiter value)*`, discarding delimiter output
pub fn separated_by<E, V, D, C>(value: V, delimiter: D, collector: C) -> SeparatedBy<V, D, C>
where
    V: Parser<E>,
    D: Parser<E>,
    C: Collector<V::Output>,
{
    SeparatedBy::new(value, delimiter, collector)
}

/// Parse one `delimiter value` pair, reporting the total consumed count
fn next_pair<E, V, D>(
    delimiter: &D,
    value: &V,
    source: &[E],
    pos: usize,
) -> Option<(usize, D::Output, V::Output)>
where
    V: Parser<E>,
    D: Parser<E>,
{
    let (dc, d) = delimiter.parse_at(source, pos).into_parts()?;
    let (vc, v) = value.parse_at(source, pos + dc).into_parts()?;
    Some((dc + vc, d, v))
}

// ============================================================================
// Bind and value transforms
// ============================================================================

/// Monadic bind: choose the next parser from the full outcome of the first
#[derive(Clone, Copy)]
pub struct Bind<P, F> {
    inner: P,
    binder: F,
}

impl<P, F> Bind<P, F> {
    /// Create a new bind
    pub fn new(inner: P, binder: F) -> Self {
        Self { inner, binder }
    }
}

impl<E, P, F, Q> Parser<E> for Bind<P, F>
where
    P: Parser<E>,
    F: Fn(ParseOutcome<P::Output>) -> Q,
    Q: Parser<E>,
{
    type Output = Q::Output;

    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<Q::Output> {
        let first = self.inner.parse_at(source, pos);
        let advance = match &first {
            ParseOutcome::Success { consumed, .. } => *consumed,
            ParseOutcome::Failure => 0,
        };
        (self.binder)(first)
            .parse_at(source, pos + advance)
            .advanced_by(advance)
    }
}

/// Run `inner`, hand its outcome to `binder`, then run the returned parser
/// from the advanced position (no advance after a failure)
pub fn bind<E, P, F, Q>(inner: P, binder: F) -> Bind<P, F>
where
    P: Parser<E>,
    F: Fn(ParseOutcome<P::Output>) -> Q,
    Q: Parser<E>,
{
    Bind::new(inner, binder)
}

/// Transform the value of a successful parse
#[derive(Clone, Copy)]
pub struct Map<P, F> {
    inner: P,
    f: F,
}

impl<P, F> Map<P, F> {
    /// Create a new value transform
    pub fn new(inner: P, f: F) -> Self {
        Self { inner, f }
    }
}

impl<E, P, F, T> Parser<E> for Map<P, F>
where
    P: Parser<E>,
    F: Fn(P::Output) -> T,
{
    type Output = T;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<T> {
        self.inner.parse_at(source, pos).map(&self.f)
    }
}

/// Apply `f` to the value of `inner`
pub fn map<E, P, F, T>(inner: P, f: F) -> Map<P, F>
where
    P: Parser<E>,
    F: Fn(P::Output) -> T,
{
    Map::new(inner, f)
}

/// Transform the value of a successful parse, failing on `None`
#[derive(Clone, Copy)]
pub struct TryMap<P, F> {
    inner: P,
    f: F,
}

impl<P, F> TryMap<P, F> {
    /// Create a new fallible value transform
    pub fn new(inner: P, f: F) -> Self {
        Self { inner, f }
    }
}

impl<E, P, F, T> Parser<E> for TryMap<P, F>
where
    P: Parser<E>,
    F: Fn(P::Output) -> Option<T>,
{
    type Output = T;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<T> {
        self.inner
            .parse_at(source, pos)
            .into_parts()
            .and_then(|(consumed, value)| Some((consumed, (self.f)(value)?)))
            .into()
    }
}

/// Fail unless the value of a successful parse satisfies a predicate
#[derive(Clone, Copy)]
pub struct Filter<P, F> {
    inner: P,
    predicate: F,
}

impl<P, F> Filter<P, F> {
    /// Create a new filter
    pub fn new(inner: P, predicate: F) -> Self {
        Self { inner, predicate }
    }
}

impl<E, P, F> Parser<E> for Filter<P, F>
where
    P: Parser<E>,
    F: Fn(&P::Output) -> bool,
{
    type Output = P::Output;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<P::Output> {
        match self.inner.parse_at(source, pos) {
            ParseOutcome::Success { consumed, value } if (self.predicate)(&value) => {
                ParseOutcome::success(consumed, value)
            }
            _ => ParseOutcome::failure(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::collector::{Aggregate, CollectorExt, Counting, ToList};
    use crate::engine::parser::ParserExt;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn is(expected: char) -> Satisfy<impl Fn(&char) -> bool + Clone> {
        satisfy(move |c: &char| *c == expected)
    }

    #[test]
    fn test_satisfy() {
        let digit = satisfy(|c: &char| c.is_ascii_digit());
        assert_eq!(digit.parse(&chars("7a")), ParseOutcome::success(1, '7'));
        assert!(digit.parse(&chars("a7")).is_failure());
        assert!(digit.parse(&chars("")).is_failure());
        assert!(digit.parse_at(&chars("7"), 1).is_failure());
    }

    #[test]
    fn test_primitives() {
        let source = chars("x");
        assert_eq!(success(5).parse_at(&source, 1), ParseOutcome::success(0, 5));
        assert!(fail::<u8>().parse(&source).is_failure());
        assert!(end_of_input().parse(&source).is_failure());
        assert_eq!(
            end_of_input().parse_at(&source, 1),
            ParseOutcome::success(0, ())
        );
    }

    #[test]
    fn test_cat_consumption_is_additive() {
        let ab = cat(is('a'), is('b'), |a, b| format!("{}{}", a, b));
        assert_eq!(
            ab.parse(&chars("abc")),
            ParseOutcome::success(2, "ab".to_string())
        );
    }

    #[test]
    fn test_cat_fails_on_either_side() {
        let ab = pair(is('a'), is('b'));
        assert!(ab.parse(&chars("xb")).is_failure());
        assert!(ab.parse(&chars("ax")).is_failure());
        assert!(ab.parse(&chars("a")).is_failure());
    }

    #[test]
    fn test_alt_is_ordered() {
        let first = is('a').map(|_| 1);
        let second = is('a').then(is('a')).map(|_| 2);
        let choice = alt(first, second);
        assert_eq!(choice.parse(&chars("aa")), ParseOutcome::success(1, 1));
    }

    #[test]
    fn test_alt_retries_from_same_position() {
        let ab = pair(is('a'), is('b'));
        let ac = pair(is('a'), is('c'));
        let choice = alt(ab, ac);
        assert_eq!(
            choice.parse(&chars("ac")),
            ParseOutcome::success(2, ('a', 'c'))
        );
        assert!(choice.parse(&chars("ad")).is_failure());
    }

    #[test]
    fn test_optional() {
        let maybe_a = optional(is('a'), '-');
        assert_eq!(maybe_a.parse(&chars("a")), ParseOutcome::success(1, 'a'));
        assert_eq!(maybe_a.parse(&chars("b")), ParseOutcome::success(0, '-'));
        assert_eq!(maybe_a.parse(&chars("")), ParseOutcome::success(0, '-'));
    }

    #[test]
    fn test_bounds_validation() {
        assert!(Bounds::new(2, Some(4)).is_ok());
        assert!(Bounds::new(3, Some(3)).is_ok());
        assert!(Bounds::new(5, None).is_ok());
        assert_eq!(
            Bounds::new(4, Some(2)),
            Err(EngineError::InvalidRepeatBounds { min: 4, max: 2 })
        );

        assert_eq!(Bounds::from_signed(0, -1), Ok(Bounds::ZERO_OR_MORE));
        assert_eq!(Bounds::from_signed(1, -1), Ok(Bounds::ONE_OR_MORE));
        assert!(Bounds::from_signed(-1, 3).is_err());
        assert!(Bounds::from_signed(3, 2).is_err());
        assert!(Bounds::from_signed(0, -2).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_bounds_deserialize_validates() {
        let bounds: Bounds = serde_json::from_str(r#"{"min":2,"max":4}"#).unwrap();
        assert_eq!(bounds, Bounds::new(2, Some(4)).unwrap());

        let unbounded: Bounds = serde_json::from_str(r#"{"min":1,"max":null}"#).unwrap();
        assert_eq!(unbounded, Bounds::ONE_OR_MORE);

        let err = serde_json::from_str::<Bounds>(r#"{"min":5,"max":2}"#).unwrap_err();
        assert!(err.to_string().contains("minimum 5 exceeds maximum 2"));
    }

    #[test]
    fn test_repeat_range_rejects_at_construction() {
        let result = repeat_range(is('a'), Counting, 3, 1);
        assert!(matches!(
            result,
            Err(EngineError::InvalidRepeatBounds { min: 3, max: 1 })
        ));
    }

    #[test]
    fn test_repeat_bounds() {
        let bounds = Bounds::new(2, Some(4)).expect("valid bounds");
        let a = repeat(is('a'), Counting, bounds);

        assert!(a.parse(&chars("ab")).is_failure());
        assert_eq!(a.parse(&chars("aaab")), ParseOutcome::success(3, 3));
        assert_eq!(a.parse(&chars("aaaaa")), ParseOutcome::success(4, 4));
    }

    #[test]
    fn test_repeat_zero_max() {
        let none = repeat(is('a'), Counting, Bounds::exactly(0));
        assert_eq!(none.parse(&chars("aaa")), ParseOutcome::success(0, 0));
    }

    #[test]
    fn test_zero_and_one_or_more() {
        let many = zero_or_more(is('a'), ToList);
        assert_eq!(many.parse(&chars("b")), ParseOutcome::success(0, vec![]));

        let some = one_or_more(is('a'), ToList);
        assert!(some.parse(&chars("b")).is_failure());
        assert_eq!(
            some.parse(&chars("aab")),
            ParseOutcome::success(2, vec!['a', 'a'])
        );
    }

    #[test]
    fn test_lookahead_never_consumes() {
        let ab = pair(is('a'), is('b'));
        assert_eq!(
            and(&ab).parse(&chars("ab")),
            ParseOutcome::success(0, ('a', 'b'))
        );
        assert!(and(&ab).parse(&chars("ax")).is_failure());

        assert!(not(&ab, ()).parse(&chars("ab")).is_failure());
        assert_eq!(not(&ab, 7).parse(&chars("ax")), ParseOutcome::success(0, 7));
    }

    #[test]
    fn test_delimited_requires_head() {
        let list = delimited(is('x'), is(','), |_, v| v, |head| ToList.accept(head));
        assert!(list.parse(&chars("")).is_failure());
        assert!(list.parse(&chars(",x")).is_failure());
    }

    #[test]
    fn test_delimited_combines_pairs() {
        let digit = satisfy(|c: &char| c.is_ascii_digit()).map(|c| c as i64 - '0' as i64);
        let op = is('+').or(is('-'));
        let sum = delimited(
            digit,
            op,
            |op, v| if op == '-' { -v } else { v },
            |head| Aggregate::new(head, |acc: i64, v: i64| acc + v),
        );
        assert_eq!(sum.parse(&chars("1+2-4")), ParseOutcome::success(5, -1));
        assert_eq!(sum.parse(&chars("7")), ParseOutcome::success(1, 7));
    }

    #[test]
    fn test_delimited_leaves_trailing_delimiter() {
        let list = separated_by(is('x'), is(','), Counting);
        assert_eq!(list.parse(&chars("x,x,")), ParseOutcome::success(3, 2));
    }

    #[test]
    fn test_bind_sees_outcome() {
        let source = chars("ab");
        let chosen = bind(is('a'), |outcome: ParseOutcome<char>| {
            if outcome.is_success() {
                is('b')
            } else {
                is('a')
            }
        });
        assert_eq!(chosen.parse(&source), ParseOutcome::success(2, 'b'));

        // failure of the first stage advances nothing
        let recover = bind(is('z'), |outcome: ParseOutcome<char>| {
            success(outcome.is_failure())
        });
        assert_eq!(recover.parse(&source), ParseOutcome::success(0, true));
    }

    #[test]
    fn test_bind_second_stage_failure_propagates() {
        let chained = bind(is('a'), |_| is('z'));
        assert!(chained.parse(&chars("ab")).is_failure());
    }

    #[test]
    fn test_map_try_map_filter() {
        let digit = satisfy(|c: &char| c.is_ascii_digit());

        assert_eq!(
            map(digit, |c| c.to_digit(10)).parse(&chars("5")),
            ParseOutcome::success(1, Some(5))
        );

        let odd = TryMap::new(digit, |c: char| c.to_digit(10).filter(|d| d % 2 == 1));
        assert_eq!(odd.parse(&chars("3")), ParseOutcome::success(1, 3));
        assert!(odd.parse(&chars("4")).is_failure());

        let not_zero = Filter::new(digit, |c: &char| *c != '0');
        assert!(not_zero.parse(&chars("0")).is_failure());
        assert!(not_zero.parse(&chars("9")).is_success());
    }
}
