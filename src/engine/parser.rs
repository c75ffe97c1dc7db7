//! The parser contract
//!
//! A parser maps `(source, start position)` to a [`ParseOutcome`]. The start
//! position is explicit so combinators can re-invoke sub-parsers at any
//! offset without slicing the input: backtracking simply tries another
//! parser from the same position, and lookahead probes then discards the
//! consumed count.
//!
//! # Example
//!
//! ```rust
//! use parsekit::prelude::*;
//! use parsekit::text::is;
//!
//! let source: Vec<char> = "ab".chars().collect();
//! let ab = is('a').then(is('b'));
//!
//! assert_eq!(ab.parse(&source), ParseOutcome::success(2, ('a', 'b')));
//! ```

use super::collector::Collector;
use super::combinators::{
    Alt, And, Bind, Bounds, Cat, Delimited, Filter, Map, Not, Optional, Repeat, SeparatedBy,
    TryMap,
};
use super::hooks::{Before, OnFailure, OnSuccess, Traced};
use super::outcome::ParseOutcome;
use super::packrat::Packrat;
use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

/// A parser over input elements of type `E`
///
/// Implementations must not assume anything about the source beyond its
/// length, and must never read positions before `pos`.
pub trait Parser<E> {
    /// Value produced on success
    type Output;

    /// Attempt to recognize a fragment of `source` starting at `pos`
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<Self::Output>;
}

/// Type-erased, cheaply cloneable parser handle
pub type BoxedParser<'a, E, T> = Rc<dyn Parser<E, Output = T> + 'a>;

impl<E, P> Parser<E> for &P
where
    P: Parser<E> + ?Sized,
{
    type Output = P::Output;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<Self::Output> {
        (**self).parse_at(source, pos)
    }
}

impl<E, P> Parser<E> for Box<P>
where
    P: Parser<E> + ?Sized,
{
    type Output = P::Output;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<Self::Output> {
        (**self).parse_at(source, pos)
    }
}

impl<E, P> Parser<E> for Rc<P>
where
    P: Parser<E> + ?Sized,
{
    type Output = P::Output;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<Self::Output> {
        (**self).parse_at(source, pos)
    }
}

impl<E, P> Parser<E> for Arc<P>
where
    P: Parser<E> + ?Sized,
{
    type Output = P::Output;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<Self::Output> {
        (**self).parse_at(source, pos)
    }
}

/// Parser backed by a plain function
#[derive(Clone, Copy)]
pub struct FromFn<F> {
    f: F,
}

impl<E, T, F> Parser<E> for FromFn<F>
where
    F: Fn(&[E], usize) -> ParseOutcome<T>,
{
    type Output = T;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<T> {
        (self.f)(source, pos)
    }
}

/// Adapt a function `(source, pos) -> ParseOutcome` into a parser
pub fn from_fn<E, T, F>(f: F) -> FromFn<F>
where
    F: Fn(&[E], usize) -> ParseOutcome<T>,
{
    FromFn { f }
}

/// Combiner used by [`ParserExt::then`]
pub type Pairing<A, B> = fn(A, B) -> (A, B);
/// Combiner used by [`ParserExt::discard_right`]
pub type KeepFirst<A, B> = fn(A, B) -> A;
/// Combiner used by [`ParserExt::discard_left`]
pub type KeepSecond<A, B> = fn(A, B) -> B;

pub(crate) fn pairing<A, B>(a: A, b: B) -> (A, B) {
    (a, b)
}

pub(crate) fn keep_first<A, B>(a: A, _: B) -> A {
    a
}

pub(crate) fn keep_second<A, B>(_: A, b: B) -> B {
    b
}

/// Extension trait providing the combinator algebra as methods
pub trait ParserExt<E>: Parser<E> + Sized {
    /// Run the parser from the start of `source`
    fn parse(&self, source: &[E]) -> ParseOutcome<Self::Output> {
        self.parse_at(source, 0)
    }

    /// Run the parser from the start, requiring it to consume all of `source`
    fn parse_complete(&self, source: &[E]) -> Option<Self::Output> {
        match self.parse_at(source, 0) {
            ParseOutcome::Success { consumed, value } if consumed == source.len() => Some(value),
            _ => None,
        }
    }

    /// Sequence: `self` then `other`, pairing the values
    fn then<Q>(self, other: Q) -> Cat<Self, Q, Pairing<Self::Output, Q::Output>>
    where
        Q: Parser<E>,
    {
        Cat::new(self, other, pairing as Pairing<Self::Output, Q::Output>)
    }

    /// Sequence: `self` then `other`, combining the values with `combine`
    fn then_with<Q, F, T>(self, other: Q, combine: F) -> Cat<Self, Q, F>
    where
        Q: Parser<E>,
        F: Fn(Self::Output, Q::Output) -> T,
    {
        Cat::new(self, other, combine)
    }

    /// Sequence keeping only the value of `other`
    fn discard_left<Q>(self, other: Q) -> Cat<Self, Q, KeepSecond<Self::Output, Q::Output>>
    where
        Q: Parser<E>,
    {
        Cat::new(self, other, keep_second as KeepSecond<Self::Output, Q::Output>)
    }

    /// Sequence keeping only the value of `self`
    fn discard_right<Q>(self, other: Q) -> Cat<Self, Q, KeepFirst<Self::Output, Q::Output>>
    where
        Q: Parser<E>,
    {
        Cat::new(self, other, keep_first as KeepFirst<Self::Output, Q::Output>)
    }

    /// Ordered choice: `self`, or `other` from the same position
    fn or<Q>(self, other: Q) -> Alt<Self, Q>
    where
        Q: Parser<E, Output = Self::Output>,
    {
        Alt::new(self, other)
    }

    /// Always succeed, yielding `default` without consuming when `self` fails
    fn optional(self, default: Self::Output) -> Optional<Self, Self::Output>
    where
        Self::Output: Clone,
    {
        Optional::new(self, default)
    }

    /// Repeat within `bounds`, folding values into `collector`
    fn repeat<C>(self, collector: C, bounds: Bounds) -> Repeat<Self, C>
    where
        C: Collector<Self::Output>,
    {
        Repeat::new(self, collector, bounds)
    }

    /// Repeat any number of times
    fn zero_or_more<C>(self, collector: C) -> Repeat<Self, C>
    where
        C: Collector<Self::Output>,
    {
        Repeat::new(self, collector, Bounds::ZERO_OR_MORE)
    }

    /// Repeat at least once
    fn one_or_more<C>(self, collector: C) -> Repeat<Self, C>
    where
        C: Collector<Self::Output>,
    {
        Repeat::new(self, collector, Bounds::ONE_OR_MORE)
    }

    /// Positive lookahead
    fn peek(self) -> And<Self> {
        And::new(self)
    }

    /// Negative lookahead yielding `value` when `self` fails
    fn not_ahead<T>(self, value: T) -> Not<Self, T>
    where
        T: Clone,
    {
        Not::new(self, value)
    }

    /// Monadic bind over the full outcome of `self`
    fn bind<F, Q>(self, binder: F) -> Bind<Self, F>
    where
        F: Fn(ParseOutcome<Self::Output>) -> Q,
        Q: Parser<E>,
    {
        Bind::new(self, binder)
    }

    /// Transform a successful value
    fn map<F, T>(self, f: F) -> Map<Self, F>
    where
        F: Fn(Self::Output) -> T,
    {
        Map::new(self, f)
    }

    /// Transform a successful value, failing when `f` yields `None`
    fn try_map<F, T>(self, f: F) -> TryMap<Self, F>
    where
        F: Fn(Self::Output) -> Option<T>,
    {
        TryMap::new(self, f)
    }

    /// Fail unless the value satisfies `predicate`
    fn filter<F>(self, predicate: F) -> Filter<Self, F>
    where
        F: Fn(&Self::Output) -> bool,
    {
        Filter::new(self, predicate)
    }

    /// One or more `self` separated by `delimiter`; see [`Delimited`]
    fn delimited<D, F, H, X, C>(
        self,
        delimiter: D,
        combine: F,
        head_to_collector: H,
    ) -> Delimited<Self, D, F, H>
    where
        D: Parser<E>,
        F: Fn(D::Output, Self::Output) -> X,
        H: Fn(Self::Output) -> C,
        C: Collector<X>,
    {
        Delimited::new(self, delimiter, combine, head_to_collector)
    }

    /// One or more `self` separated by `delimiter`, discarding delimiters
    fn separated_by<D, C>(self, delimiter: D, collector: C) -> SeparatedBy<Self, D, C>
    where
        D: Parser<E>,
        C: Collector<Self::Output>,
    {
        SeparatedBy::new(self, delimiter, collector)
    }

    /// Run `hook` before every attempt
    fn before<F>(self, hook: F) -> Before<Self, F>
    where
        F: Fn(&[E], usize),
    {
        Before::new(self, hook)
    }

    /// Run `hook` after every success with `(source, pos, consumed, value)`
    fn on_success<F>(self, hook: F) -> OnSuccess<Self, F>
    where
        F: Fn(&[E], usize, usize, &Self::Output),
    {
        OnSuccess::new(self, hook)
    }

    /// Run `hook` after every failure with `(source, pos)`
    fn on_failure<F>(self, hook: F) -> OnFailure<Self, F>
    where
        F: Fn(&[E], usize),
    {
        OnFailure::new(self, hook)
    }

    /// Emit debug log records for each attempt under `name`
    fn traced(self, name: impl Into<Cow<'static, str>>) -> Traced<Self> {
        Traced::new(self, name)
    }

    /// Memoize successful outcomes by start position
    fn packrat(self) -> Packrat<Self, Self::Output>
    where
        Self::Output: Clone,
    {
        Packrat::new(self)
    }

    /// Erase the concrete parser type
    fn boxed<'a>(self) -> BoxedParser<'a, E, Self::Output>
    where
        Self: 'a,
    {
        Rc::new(self)
    }
}

impl<E, P> ParserExt<E> for P where P: Parser<E> {}
