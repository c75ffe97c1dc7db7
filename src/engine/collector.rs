//! Collectors: fold descriptors for repetition
//!
//! A [`Collector`] bundles three operations: `supply` a fresh accumulator,
//! `accumulate` one value into it, and `finish` it into a result. Repetition
//! and delimited-list combinators drive a collector without knowing the
//! shape of what it builds, so counting, string building, joining, min/max
//! selection, list/set/map construction and discarding all reuse the same
//! engine code.
//!
//! The accumulator is passed by value: mutating folds push into it and
//! return it, pure folds return a new one.
//!
//! # Example
//!
//! ```rust
//! use parsekit::prelude::*;
//! use parsekit::text::digit;
//!
//! let digits: Vec<char> = "123".chars().collect();
//! let doubled = digit()
//!     .map(|c| c.to_digit(10).unwrap_or(0))
//!     .one_or_more(ToList.map_input(|d: u32| d * 2));
//!
//! assert_eq!(doubled.parse(&digits).ok(), Some(vec![2, 4, 6]));
//! ```

use hashbrown::{HashMap, HashSet};
use std::cmp::Ordering;
use std::fmt::{self, Display, Write};
use std::hash::Hash;

/// A fold descriptor over values of type `T`
///
/// `supply` must be callable any number of times, each call starting an
/// independent fold. Values are accumulated strictly in parse order.
pub trait Collector<T> {
    /// Intermediate accumulator
    type Acc;
    /// Final result
    type Output;

    /// Create a fresh accumulator
    fn supply(&self) -> Self::Acc;

    /// Fold one value into the accumulator
    fn accumulate(&self, acc: Self::Acc, value: T) -> Self::Acc;

    /// Convert the accumulator into the final result
    fn finish(&self, acc: Self::Acc) -> Self::Output;
}

impl<T, C> Collector<T> for &C
where
    C: Collector<T> + ?Sized,
{
    type Acc = C::Acc;
    type Output = C::Output;

    #[inline]
    fn supply(&self) -> Self::Acc {
        (**self).supply()
    }

    #[inline]
    fn accumulate(&self, acc: Self::Acc, value: T) -> Self::Acc {
        (**self).accumulate(acc, value)
    }

    #[inline]
    fn finish(&self, acc: Self::Acc) -> Self::Output {
        (**self).finish(acc)
    }
}

/// Extension trait for deriving collectors from collectors
pub trait CollectorExt<T>: Collector<T> + Sized {
    /// A collector whose fresh accumulator already contains `initial`
    fn accept(self, initial: T) -> Accept<Self, T>
    where
        T: Clone,
    {
        Accept {
            downstream: self,
            initial,
        }
    }

    /// Pre-transform each value with `mapper` before folding it
    fn map_input<U, F>(self, mapper: F) -> Mapping<F, Self>
    where
        F: Fn(U) -> T,
    {
        Mapping::new(mapper, self)
    }

    /// Post-transform the finished result with `finisher`
    fn and_then<F, R>(self, finisher: F) -> CollectingAndThen<Self, F>
    where
        F: Fn(Self::Output) -> R,
    {
        CollectingAndThen::new(self, finisher)
    }
}

impl<T, C> CollectorExt<T> for C where C: Collector<T> {}

// ============================================================================
// Adapters
// ============================================================================

/// Collector built from three closures
#[derive(Clone, Copy)]
pub struct FnCollector<S, A, F> {
    supply: S,
    accumulate: A,
    finish: F,
}

impl<T, State, R, S, A, F> Collector<T> for FnCollector<S, A, F>
where
    S: Fn() -> State,
    A: Fn(State, T) -> State,
    F: Fn(State) -> R,
{
    type Acc = State;
    type Output = R;

    #[inline]
    fn supply(&self) -> State {
        (self.supply)()
    }

    #[inline]
    fn accumulate(&self, acc: State, value: T) -> State {
        (self.accumulate)(acc, value)
    }

    #[inline]
    fn finish(&self, acc: State) -> R {
        (self.finish)(acc)
    }
}

/// Build a collector from `supply`, `accumulate` and `finish` functions
pub fn collector<T, State, R, S, A, F>(supply: S, accumulate: A, finish: F) -> FnCollector<S, A, F>
where
    S: Fn() -> State,
    A: Fn(State, T) -> State,
    F: Fn(State) -> R,
{
    FnCollector {
        supply,
        accumulate,
        finish,
    }
}

/// Pre-transforms each value before delegating to a downstream collector
#[derive(Clone, Copy)]
pub struct Mapping<F, C> {
    mapper: F,
    downstream: C,
}

impl<F, C> Mapping<F, C> {
    /// Create a new mapping collector
    pub fn new(mapper: F, downstream: C) -> Self {
        Self { mapper, downstream }
    }
}

impl<U, T, F, C> Collector<U> for Mapping<F, C>
where
    F: Fn(U) -> T,
    C: Collector<T>,
{
    type Acc = C::Acc;
    type Output = C::Output;

    #[inline]
    fn supply(&self) -> C::Acc {
        self.downstream.supply()
    }

    #[inline]
    fn accumulate(&self, acc: C::Acc, value: U) -> C::Acc {
        self.downstream.accumulate(acc, (self.mapper)(value))
    }

    #[inline]
    fn finish(&self, acc: C::Acc) -> C::Output {
        self.downstream.finish(acc)
    }
}

/// Post-transforms the finished result of a downstream collector
#[derive(Clone, Copy)]
pub struct CollectingAndThen<C, F> {
    downstream: C,
    finisher: F,
}

impl<C, F> CollectingAndThen<C, F> {
    /// Create a new post-processing collector
    pub fn new(downstream: C, finisher: F) -> Self {
        Self {
            downstream,
            finisher,
        }
    }
}

impl<T, R, C, F> Collector<T> for CollectingAndThen<C, F>
where
    C: Collector<T>,
    F: Fn(C::Output) -> R,
{
    type Acc = C::Acc;
    type Output = R;

    #[inline]
    fn supply(&self) -> C::Acc {
        self.downstream.supply()
    }

    #[inline]
    fn accumulate(&self, acc: C::Acc, value: T) -> C::Acc {
        self.downstream.accumulate(acc, value)
    }

    #[inline]
    fn finish(&self, acc: C::Acc) -> R {
        (self.finisher)(self.downstream.finish(acc))
    }
}

/// Minimal fold from an identity value; the accumulator is the result
#[derive(Clone, Copy)]
pub struct Aggregate<A, F> {
    identity: A,
    op: F,
}

impl<A, F> Aggregate<A, F> {
    /// Create a new aggregate from `identity` and a folding `op`
    pub fn new(identity: A, op: F) -> Self {
        Self { identity, op }
    }
}

impl<T, A, F> Collector<T> for Aggregate<A, F>
where
    A: Clone,
    F: Fn(A, T) -> A,
{
    type Acc = A;
    type Output = A;

    #[inline]
    fn supply(&self) -> A {
        self.identity.clone()
    }

    #[inline]
    fn accumulate(&self, acc: A, value: T) -> A {
        (self.op)(acc, value)
    }

    #[inline]
    fn finish(&self, acc: A) -> A {
        acc
    }
}

/// A collector seeded with one already-folded value
///
/// Created by [`CollectorExt::accept`]; used for "head + tail" grammars
/// where the first element is parsed before the repetition starts.
#[derive(Clone, Copy)]
pub struct Accept<C, T> {
    downstream: C,
    initial: T,
}

impl<T, C> Collector<T> for Accept<C, T>
where
    T: Clone,
    C: Collector<T>,
{
    type Acc = C::Acc;
    type Output = C::Output;

    #[inline]
    fn supply(&self) -> C::Acc {
        self.downstream
            .accumulate(self.downstream.supply(), self.initial.clone())
    }

    #[inline]
    fn accumulate(&self, acc: C::Acc, value: T) -> C::Acc {
        self.downstream.accumulate(acc, value)
    }

    #[inline]
    fn finish(&self, acc: C::Acc) -> C::Output {
        self.downstream.finish(acc)
    }
}

// ============================================================================
// Premade collectors
// ============================================================================

/// Collect values into a `Vec` in parse order
#[derive(Debug, Clone, Copy, Default)]
pub struct ToList;

impl<T> Collector<T> for ToList {
    type Acc = Vec<T>;
    type Output = Vec<T>;

    fn supply(&self) -> Vec<T> {
        Vec::new()
    }

    fn accumulate(&self, mut acc: Vec<T>, value: T) -> Vec<T> {
        acc.push(value);
        acc
    }

    fn finish(&self, acc: Vec<T>) -> Vec<T> {
        acc
    }
}

/// Collect values into a set
#[derive(Debug, Clone, Copy, Default)]
pub struct ToSet;

impl<T: Eq + Hash> Collector<T> for ToSet {
    type Acc = HashSet<T>;
    type Output = HashSet<T>;

    fn supply(&self) -> HashSet<T> {
        HashSet::new()
    }

    fn accumulate(&self, mut acc: HashSet<T>, value: T) -> HashSet<T> {
        acc.insert(value);
        acc
    }

    fn finish(&self, acc: HashSet<T>) -> HashSet<T> {
        acc
    }
}

/// Collect `(key, value)` pairs into a map; later keys overwrite earlier ones
#[derive(Debug, Clone, Copy, Default)]
pub struct ToMap;

impl<K: Eq + Hash, V> Collector<(K, V)> for ToMap {
    type Acc = HashMap<K, V>;
    type Output = HashMap<K, V>;

    fn supply(&self) -> HashMap<K, V> {
        HashMap::new()
    }

    fn accumulate(&self, mut acc: HashMap<K, V>, (key, value): (K, V)) -> HashMap<K, V> {
        acc.insert(key, value);
        acc
    }

    fn finish(&self, acc: HashMap<K, V>) -> HashMap<K, V> {
        acc
    }
}

/// Count values
#[derive(Debug, Clone, Copy, Default)]
pub struct Counting;

impl<T> Collector<T> for Counting {
    type Acc = usize;
    type Output = usize;

    fn supply(&self) -> usize {
        0
    }

    fn accumulate(&self, acc: usize, _value: T) -> usize {
        acc + 1
    }

    fn finish(&self, acc: usize) -> usize {
        acc
    }
}

/// Drop every value
#[derive(Debug, Clone, Copy, Default)]
pub struct Discarding;

impl<T> Collector<T> for Discarding {
    type Acc = ();
    type Output = ();

    fn supply(&self) -> Self::Acc {}

    fn accumulate(&self, _acc: Self::Acc, _value: T) -> Self::Acc {}

    fn finish(&self, _acc: Self::Acc) -> Self::Output {}
}

/// Concatenate the display form of every value
#[derive(Debug, Clone, Copy, Default)]
pub struct Stringify;

impl<T: Display> Collector<T> for Stringify {
    type Acc = String;
    type Output = String;

    fn supply(&self) -> String {
        String::new()
    }

    fn accumulate(&self, mut acc: String, value: T) -> String {
        push_display(&mut acc, &value);
        acc
    }

    fn finish(&self, acc: String) -> String {
        acc
    }
}

/// Join the display form of values with a separator, prefix and suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joining {
    separator: String,
    prefix: String,
    suffix: String,
}

impl Joining {
    /// Join with `separator` between values and no surrounding text
    pub fn new(separator: impl Into<String>) -> Self {
        Self::with_affixes(separator, "", "")
    }

    /// Join with `separator`, wrapping the result in `prefix` and `suffix`
    pub fn with_affixes(
        separator: impl Into<String>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            separator: separator.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

/// Accumulator of [`Joining`]: the joined text so far and whether it is empty
#[derive(Debug, Clone)]
pub struct JoinState {
    text: String,
    empty: bool,
}

impl Default for JoinState {
    fn default() -> Self {
        Self {
            text: String::new(),
            empty: true,
        }
    }
}

impl<T: Display> Collector<T> for Joining {
    type Acc = JoinState;
    type Output = String;

    fn supply(&self) -> JoinState {
        JoinState {
            text: self.prefix.clone(),
            empty: true,
        }
    }

    fn accumulate(&self, mut acc: JoinState, value: T) -> JoinState {
        if !acc.empty {
            acc.text.push_str(&self.separator);
        }
        push_display(&mut acc.text, &value);
        acc.empty = false;
        acc
    }

    fn finish(&self, mut acc: JoinState) -> String {
        acc.text.push_str(&self.suffix);
        acc.text
    }
}

/// Keep the smallest value under a comparator; ties keep the earliest
#[derive(Clone, Copy)]
pub struct MinBy<F> {
    compare: F,
}

impl<F> MinBy<F> {
    /// Select the minimum using `compare`
    pub fn new(compare: F) -> Self {
        Self { compare }
    }
}

impl<T, F> Collector<T> for MinBy<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    type Acc = Option<T>;
    type Output = Option<T>;

    fn supply(&self) -> Option<T> {
        None
    }

    fn accumulate(&self, acc: Option<T>, value: T) -> Option<T> {
        match acc {
            Some(best) if (self.compare)(&value, &best) != Ordering::Less => Some(best),
            _ => Some(value),
        }
    }

    fn finish(&self, acc: Option<T>) -> Option<T> {
        acc
    }
}

/// Keep the largest value under a comparator; ties keep the earliest
#[derive(Clone, Copy)]
pub struct MaxBy<F> {
    compare: F,
}

impl<F> MaxBy<F> {
    /// Select the maximum using `compare`
    pub fn new(compare: F) -> Self {
        Self { compare }
    }
}

impl<T, F> Collector<T> for MaxBy<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    type Acc = Option<T>;
    type Output = Option<T>;

    fn supply(&self) -> Option<T> {
        None
    }

    fn accumulate(&self, acc: Option<T>, value: T) -> Option<T> {
        match acc {
            Some(best) if (self.compare)(&value, &best) != Ordering::Greater => Some(best),
            _ => Some(value),
        }
    }

    fn finish(&self, acc: Option<T>) -> Option<T> {
        acc
    }
}

/// Smallest value by natural order
pub fn min<T: Ord>() -> MinBy<fn(&T, &T) -> Ordering> {
    MinBy::new(T::cmp as fn(&T, &T) -> Ordering)
}

/// Largest value by natural order
pub fn max<T: Ord>() -> MaxBy<fn(&T, &T) -> Ordering> {
    MaxBy::new(T::cmp as fn(&T, &T) -> Ordering)
}

fn push_display<T: Display + ?Sized>(buffer: &mut String, value: &T) {
    // Writing into a String cannot fail
    let _: fmt::Result = write!(buffer, "{}", value);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold<T, C: Collector<T>>(collector: &C, values: impl IntoIterator<Item = T>) -> C::Output {
        let acc = values
            .into_iter()
            .fold(collector.supply(), |acc, v| collector.accumulate(acc, v));
        collector.finish(acc)
    }

    #[test]
    fn test_to_list_preserves_order() {
        assert_eq!(fold(&ToList, [3, 1, 2]), vec![3, 1, 2]);
    }

    #[test]
    fn test_supply_is_independent() {
        let list = ToList.accept(0);
        assert_eq!(fold(&list, [1, 2]), vec![0, 1, 2]);
        assert_eq!(fold(&list, [9]), vec![0, 9]);
    }

    #[test]
    fn test_stringify_and_joining() {
        assert_eq!(fold(&Stringify, ['a', 'b', 'c']), "abc");
        assert_eq!(fold(&Joining::with_affixes(",", "[", "]"), ["x", "y"]), "[x,y]");
        assert_eq!(fold(&Joining::with_affixes(",", "[", "]"), Vec::<&str>::new()), "[]");
        assert_eq!(fold(&Joining::new("-"), [1, 2, 3]), "1-2-3");
    }

    #[test]
    fn test_join_state_default_has_no_leading_separator() {
        let joining = Joining::new(",");
        let acc = Collector::<&str>::accumulate(&joining, JoinState::default(), "x");
        let acc = Collector::<&str>::accumulate(&joining, acc, "y");
        assert_eq!(Collector::<&str>::finish(&joining, acc), "x,y");
    }

    #[test]
    fn test_counting_and_discarding() {
        assert_eq!(fold(&Counting, "hello".chars()), 5);
        fold(&Discarding, [1, 2, 3]);
    }

    #[test]
    fn test_set_and_map() {
        let set = fold(&ToSet, [1, 2, 2, 3]);
        assert_eq!(set.len(), 3);

        let map = fold(&ToMap, [("a", 1), ("b", 2), ("a", 3)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&3));
    }

    #[test]
    fn test_min_max_ties_keep_first() {
        let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
        assert_eq!(fold(&MinBy::new(by_len), ["bb", "a", "c"]), Some("a"));
        assert_eq!(fold(&MaxBy::new(by_len), ["bb", "cc", "a"]), Some("bb"));
        assert_eq!(fold(&min::<i32>(), Vec::new()), None);
        assert_eq!(fold(&max(), [4, 9, 2]), Some(9));
    }

    #[test]
    fn test_mapping_equals_premapped_fold() {
        let doubled = ToList.map_input(|v: i32| v * 2);
        assert_eq!(fold(&doubled, [1, 2, 3]), fold(&ToList, [2, 4, 6]));
    }

    #[test]
    fn test_collecting_and_then() {
        let length = ToList.and_then(|list: Vec<char>| list.len());
        assert_eq!(fold(&length, ['x', 'y']), 2);
    }

    #[test]
    fn test_aggregate_and_fn_collector() {
        let sum = Aggregate::new(0, |acc: i32, v: i32| acc + v);
        assert_eq!(fold(&sum, [1, 2, 3]), 6);

        let average = collector(
            || (0.0, 0usize),
            |(total, n): (f64, usize), v: f64| (total + v, n + 1),
            |(total, n)| if n == 0 { 0.0 } else { total / n as f64 },
        );
        assert_eq!(fold(&average, [1.0, 2.0, 6.0]), 3.0);
    }

    #[test]
    fn test_reference_collector() {
        let counting = Counting;
        assert_eq!(fold(&&counting, [(), ()]), 2);
    }
}
