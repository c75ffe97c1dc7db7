//! Character parsers over `[char]` input
//!
//! Everything here is assembled from the public engine API; nothing adds
//! new combinator semantics. Input is a slice of `char`, so consumed counts
//! are characters, not UTF-8 bytes.
//!
//! # Example
//!
//! ```rust
//! use parsekit::prelude::*;
//! use parsekit::text::{decimal, is, spaces};
//!
//! // point := '(' x ',' y ')'
//! let coordinate = spaces().discard_left(decimal()).discard_right(spaces());
//! let point = is('(')
//!     .discard_left(coordinate.clone())
//!     .discard_right(is(','))
//!     .then(coordinate)
//!     .discard_right(is(')'));
//!
//! let source: Vec<char> = "( 1.5, -2e1 )".chars().collect();
//! assert_eq!(point.parse_complete(&source), Some((1.5, -20.0)));
//! ```

use crate::engine::{
    collector, from_fn, satisfy, Counting, Discarding, ParseOutcome, Parser, ParserExt,
};

// ============================================================================
// Single characters
// ============================================================================

/// Match exactly `expected`
pub fn is(expected: char) -> impl Parser<char, Output = char> + Clone {
    satisfy(move |c: &char| *c == expected)
}

/// Match any single character
pub fn any_char() -> impl Parser<char, Output = char> + Clone {
    satisfy(|_: &char| true)
}

/// Match any character contained in `set`
pub fn one_of(set: &str) -> impl Parser<char, Output = char> + Clone {
    let set: Vec<char> = set.chars().collect();
    satisfy(move |c: &char| set.contains(c))
}

/// Match any character not contained in `set`
pub fn none_of(set: &str) -> impl Parser<char, Output = char> + Clone {
    let set: Vec<char> = set.chars().collect();
    satisfy(move |c: &char| !set.contains(c))
}

/// Match an ASCII digit
pub fn digit() -> impl Parser<char, Output = char> + Clone {
    satisfy(|c: &char| c.is_ascii_digit())
}

/// Match an alphabetic character
pub fn letter() -> impl Parser<char, Output = char> + Clone {
    satisfy(|c: &char| c.is_alphabetic())
}

/// Match a whitespace character
pub fn whitespace() -> impl Parser<char, Output = char> + Clone {
    satisfy(|c: &char| c.is_whitespace())
}

/// Skip any run of whitespace, yielding how many characters were skipped
pub fn spaces() -> impl Parser<char, Output = usize> + Clone {
    whitespace().zero_or_more(Counting)
}

// ============================================================================
// Literals
// ============================================================================

/// Matches a fixed character sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    expected: Vec<char>,
}

impl Parser<char> for Literal {
    type Output = String;

    fn parse_at(&self, source: &[char], pos: usize) -> ParseOutcome<String> {
        let end = pos.saturating_add(self.expected.len());
        match source.get(pos..end) {
            Some(window) if window == self.expected.as_slice() => {
                ParseOutcome::success(self.expected.len(), self.expected.iter().collect())
            }
            _ => ParseOutcome::failure(),
        }
    }
}

/// Match `expected` exactly, yielding it as a `String`
///
/// An empty literal always succeeds without consuming.
pub fn literal(expected: &str) -> Literal {
    Literal {
        expected: expected.chars().collect(),
    }
}

/// Run `inner` and yield the text it consumed instead of its value
pub fn recognize<P>(inner: P) -> impl Parser<char, Output = String> + Clone
where
    P: Parser<char> + Clone,
{
    from_fn(move |source: &[char], pos: usize| -> ParseOutcome<String> {
        inner
            .parse_at(source, pos)
            .into_parts()
            .and_then(|(consumed, _)| {
                let text = source.get(pos..pos + consumed)?.iter().collect();
                Some((consumed, text))
            })
            .into()
    })
}

// ============================================================================
// Numbers
// ============================================================================

fn digits() -> impl Parser<char, Output = ()> + Clone {
    digit().one_or_more(Discarding)
}

fn sign() -> impl Parser<char, Output = ()> + Clone {
    one_of("+-").map(|_| ()).optional(())
}

/// One or more digits as a `u64`; fails when the value overflows
pub fn unsigned_integer() -> impl Parser<char, Output = u64> + Clone {
    let checked_decimal = collector(
        || Some(0u64),
        |acc: Option<u64>, d: char| {
            let next = u64::from(d.to_digit(10)?);
            acc?.checked_mul(10)?.checked_add(next)
        },
        |acc: Option<u64>| acc,
    );
    digit().one_or_more(checked_decimal).try_map(|value| value)
}

/// Optionally signed digits as an `i64`; fails when the value overflows
pub fn signed_integer() -> impl Parser<char, Output = i64> + Clone {
    recognize(sign().then(digits())).try_map(|text: String| text.parse::<i64>().ok())
}

/// Decimal literal as an `f64`
///
/// Accepts an optional sign, digits, an optional fraction and an optional
/// exponent (`-12.5e-3`). A dot must be followed by digits to belong to the
/// literal. Values too large for `f64` fail rather than yield infinity.
pub fn decimal() -> impl Parser<char, Output = f64> + Clone {
    let fraction = is('.').then(digits()).map(|_| ()).optional(());
    let exponent = one_of("eE")
        .then(sign())
        .then(digits())
        .map(|_| ())
        .optional(());
    recognize(sign().then(digits()).then(fraction).then(exponent))
        .try_map(|text: String| text.parse::<f64>().ok())
        .filter(|value: &f64| value.is_finite())
}
