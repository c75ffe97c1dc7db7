//! Deferred construction and recursive grammars
//!
//! A grammar whose production refers to itself cannot be built eagerly:
//! constructing the body would require the finished parser, which requires
//! the body. [`Lazy`] defers construction to parse time, and [`Recursive`]
//! ties the knot by handing the body a handle to the parser being defined.
//! [`Forward`] declares a parser first and defines it later, which lets
//! stateful sub-parsers such as [`Packrat`](super::packrat::Packrat) be
//! built once and shared by every level of the recursion.
//!
//! # Example
//!
//! ```rust
//! use parsekit::prelude::*;
//! use parsekit::text::is;
//!
//! // balanced := '(' balanced ')' | ε
//! let balanced = recursive(|balanced| {
//!     is('(')
//!         .discard_left(balanced)
//!         .discard_right(is(')'))
//!         .optional(())
//! });
//!
//! let accepts = |s: &str| balanced.parse_complete(&s.chars().collect::<Vec<_>>()).is_some();
//! assert!(accepts("(())"));
//! assert!(!accepts("(()"));
//! ```

use super::error::EngineError;
use super::outcome::ParseOutcome;
use super::parser::{BoxedParser, Parser};
use std::cell::OnceCell;
use std::rc::Rc;

/// A parser resolved by calling a supplier on every invocation
#[derive(Clone, Copy)]
pub struct Lazy<F> {
    supplier: F,
}

impl<F> Lazy<F> {
    /// Create a new lazy parser
    pub fn new(supplier: F) -> Self {
        Self { supplier }
    }
}

impl<E, F, P> Parser<E> for Lazy<F>
where
    F: Fn() -> P,
    P: Parser<E>,
{
    type Output = P::Output;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<P::Output> {
        (self.supplier)().parse_at(source, pos)
    }
}

/// Defer choosing the parser until it is invoked
pub fn lazy<E, F, P>(supplier: F) -> Lazy<F>
where
    F: Fn() -> P,
    P: Parser<E>,
{
    Lazy::new(supplier)
}

type Body<'a, E, T> = Rc<dyn Fn(Recursive<'a, E, T>) -> BoxedParser<'a, E, T> + 'a>;

/// Handle to a self-referential parser
///
/// Cloning is cheap and every clone denotes the same grammar. Each
/// invocation rebuilds the body from the definition, so construction never
/// recurses before input is examined; the cost is one body construction per
/// parse attempt. Wrap expensive shared sub-rules in
/// [`Packrat`](super::packrat::Packrat) outside the definition to reuse work.
pub struct Recursive<'a, E, T> {
    body: Body<'a, E, T>,
}

impl<'a, E, T> Clone for Recursive<'a, E, T> {
    fn clone(&self) -> Self {
        Self {
            body: Rc::clone(&self.body),
        }
    }
}

impl<'a, E, T> Parser<E> for Recursive<'a, E, T> {
    type Output = T;

    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<T> {
        (self.body)(self.clone()).parse_at(source, pos)
    }
}

/// Define a parser as the fixed point of `definition`
///
/// `definition` receives a handle to the parser being defined and returns
/// its body.
pub fn recursive<'a, E, T, F, P>(definition: F) -> Recursive<'a, E, T>
where
    E: 'a,
    T: 'a,
    F: Fn(Recursive<'a, E, T>) -> P + 'a,
    P: Parser<E, Output = T> + 'a,
{
    let body: Body<'a, E, T> = Rc::new(move |this: Recursive<'a, E, T>| {
        Rc::new(definition(this)) as BoxedParser<'a, E, T>
    });
    Recursive { body }
}

/// A parser declared before its definition exists
///
/// Clones share one definition slot. Until [`Forward::define`] is called
/// every invocation fails. A definition that refers back to its own
/// declaration forms a reference cycle, so the grammar lives until the
/// thread exits; build such grammars once and reuse them.
pub struct Forward<'a, E, T> {
    slot: Rc<OnceCell<BoxedParser<'a, E, T>>>,
}

impl<'a, E, T> Forward<'a, E, T> {
    /// Declare a parser without a definition
    pub fn new() -> Self {
        Self {
            slot: Rc::new(OnceCell::new()),
        }
    }

    /// Supply the definition
    ///
    /// Returns [`EngineError::AlreadyDefined`] if a definition was given before.
    pub fn define<P>(&self, parser: P) -> Result<(), EngineError>
    where
        P: Parser<E, Output = T> + 'a,
    {
        self.slot
            .set(Rc::new(parser))
            .map_err(|_| EngineError::AlreadyDefined)
    }

    /// Whether a definition has been supplied
    pub fn is_defined(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl<'a, E, T> Clone for Forward<'a, E, T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<'a, E, T> Parser<E> for Forward<'a, E, T> {
    type Output = T;

    #[inline]
    fn parse_at(&self, source: &[E], pos: usize) -> ParseOutcome<T> {
        match self.slot.get() {
            Some(parser) => parser.parse_at(source, pos),
            None => {
                log_debug!("forward parser invoked at {} before definition", pos);
                ParseOutcome::failure()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::collector::{Counting, ToList};
    use crate::engine::combinators::{satisfy, success};
    use crate::engine::parser::ParserExt;
    use std::cell::Cell;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn is(expected: char) -> impl Parser<char, Output = char> + Clone {
        satisfy(move |c: &char| *c == expected)
    }

    #[test]
    fn test_lazy_supplier_called_per_invocation() {
        let calls = Cell::new(0);
        let parser = lazy(|| {
            calls.set(calls.get() + 1);
            is('a')
        });
        assert_eq!(calls.get(), 0);

        let source = chars("aa");
        assert!(parser.parse_at(&source, 0).is_success());
        assert!(parser.parse_at(&source, 1).is_success());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_recursive_balanced_brackets() {
        let balanced = recursive(|this| {
            is('(')
                .discard_left(this)
                .discard_right(is(')'))
                .optional(())
        });

        for accepted in ["", "()", "(())", "((()))"] {
            assert!(
                balanced.parse_complete(&chars(accepted)).is_some(),
                "should accept {:?}",
                accepted
            );
        }
        for rejected in ["(", ")(", "(()"] {
            assert!(
                balanced.parse_complete(&chars(rejected)).is_none(),
                "should reject {:?}",
                rejected
            );
        }
    }

    #[test]
    fn test_recursive_nesting_depth() {
        // depth := '[' depth ']' -> depth + 1 | 0
        let depth = recursive(|this| {
            is('[')
                .discard_left(this)
                .discard_right(is(']'))
                .map(|d: usize| d + 1)
                .or(success(0))
        });
        assert_eq!(depth.parse(&chars("[[[]]]")), ParseOutcome::success(6, 3));
        assert_eq!(depth.parse(&chars("x")), ParseOutcome::success(0, 0));
    }

    #[test]
    fn test_forward_declaration() {
        let expr: Forward<'_, char, usize> = Forward::new();
        assert!(!expr.is_defined());
        assert!(expr.parse(&chars("()")).is_failure());

        // expr := '(' expr ')' -> depth + 1 | 0
        let nested = is('(')
            .discard_left(expr.clone())
            .discard_right(is(')'))
            .map(|d: usize| d + 1);
        assert_eq!(expr.define(nested.or(success(0))), Ok(()));
        assert!(expr.is_defined());
        assert_eq!(expr.parse_complete(&chars("((()))")), Some(3));

        assert_eq!(expr.define(success(9)), Err(EngineError::AlreadyDefined));
        assert_eq!(expr.parse_complete(&chars("()")), Some(1));
    }

    #[test]
    fn test_forward_shares_packrat_across_levels() {
        use crate::engine::packrat::Packrat;

        let expr: Forward<'_, char, usize> = Forward::new();
        let atom = Rc::new(Packrat::new(
            is('(')
                .discard_left(expr.clone())
                .discard_right(is(')'))
                .map(|d: usize| d + 1)
                .or(is('x').map(|_| 0)),
        ));
        // expr := atom '+' expr | atom '-' expr | atom
        let plus = Rc::clone(&atom).discard_right(is('+')).then(expr.clone());
        let minus = Rc::clone(&atom).discard_right(is('-')).then(expr.clone());
        let body = plus
            .or(minus)
            .map(|(a, b): (usize, usize)| a.max(b))
            .or(Rc::clone(&atom));
        assert_eq!(expr.define(body), Ok(()));

        assert_eq!(expr.parse_complete(&chars("((x))")), Some(2));
        // Each of the three atom positions is derived once, then served
        // from the table by the two retried alternatives.
        let stats = atom.stats();
        assert_eq!(stats.entries, 3);
        assert_eq!(stats.misses, 3);
        assert_eq!(stats.hits, 6);
    }

    #[test]
    fn test_recursive_list_of_lists() {
        // item := 'x' | '(' item* ')'
        let count = recursive(|item| {
            is('x').map(|_| 1usize).or(is('(')
                .discard_left(item.zero_or_more(ToList))
                .discard_right(is(')'))
                .map(|inner: Vec<usize>| inner.into_iter().sum()))
        });
        assert_eq!(count.parse(&chars("(x(xx)x)")).ok(), Some(4));
        assert_eq!(
            count.zero_or_more(Counting).parse(&chars("x(x)()")).ok(),
            Some(3)
        );
    }
}
