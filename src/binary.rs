//! Byte and fixed-width integer parsers over `[u8]` input
//!
//! Integers are decoded from exactly [`FixedWidth::WIDTH`] bytes in the
//! requested byte order. Every decoder fails, consuming nothing, when fewer
//! bytes remain than the width requires or when the acceptance predicate
//! rejects the decoded value.
//!
//! # Example
//!
//! ```rust
//! use parsekit::prelude::*;
//! use parsekit::binary::{byte_eq, int16, int32_where, Endian};
//!
//! // record := 0x7E len:i16(le) id:i32(be, > 0)
//! let record = byte_eq(0x7E)
//!     .discard_left(int16(Endian::Little))
//!     .then(int32_where(Endian::Big, |id| *id > 0));
//!
//! let source = [0x7E, 0x02, 0x00, 0x00, 0x00, 0x01, 0x00];
//! assert_eq!(record.parse_complete(&source), Some((2, 256)));
//! ```

use crate::engine::{satisfy, ParseOutcome, Parser};
use std::marker::PhantomData;

/// Byte order used to decode multi-byte integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endian {
    /// Most significant byte first (network order)
    #[default]
    Big,
    /// Least significant byte first
    Little,
}

impl Endian {
    /// Byte order of the target platform
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endian::Big
        } else {
            Endian::Little
        }
    }
}

/// Integer types decodable from a fixed number of bytes
pub trait FixedWidth: Sized + Copy {
    /// Number of bytes consumed
    const WIDTH: usize;

    /// Decode from exactly `WIDTH` bytes; `None` for any other length
    fn decode(bytes: &[u8], endian: Endian) -> Option<Self>;
}

macro_rules! impl_fixed_width {
    ($($ty:ty),*) => {
        $(
            impl FixedWidth for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn decode(bytes: &[u8], endian: Endian) -> Option<Self> {
                    let array = bytes.try_into().ok()?;
                    Some(match endian {
                        Endian::Big => <$ty>::from_be_bytes(array),
                        Endian::Little => <$ty>::from_le_bytes(array),
                    })
                }
            }
        )*
    };
}

impl_fixed_width!(i16, i32, i64, u16, u32, u64);

// ============================================================================
// Bytes
// ============================================================================

/// Match any single byte
pub fn byte() -> impl Parser<u8, Output = u8> + Clone {
    satisfy(|_: &u8| true)
}

/// Match exactly `expected`
pub fn byte_eq(expected: u8) -> impl Parser<u8, Output = u8> + Clone {
    satisfy(move |b: &u8| *b == expected)
}

/// Matches a fixed byte sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteLiteral {
    expected: Vec<u8>,
}

impl Parser<u8> for ByteLiteral {
    type Output = Vec<u8>;

    fn parse_at(&self, source: &[u8], pos: usize) -> ParseOutcome<Vec<u8>> {
        let end = pos.saturating_add(self.expected.len());
        match source.get(pos..end) {
            Some(window) if window == self.expected.as_slice() => {
                ParseOutcome::success(self.expected.len(), self.expected.clone())
            }
            _ => ParseOutcome::failure(),
        }
    }
}

/// Match `expected` exactly (magic numbers, signatures)
pub fn bytes(expected: &[u8]) -> ByteLiteral {
    ByteLiteral {
        expected: expected.to_vec(),
    }
}

// ============================================================================
// Fixed-width integers
// ============================================================================

/// Decodes one fixed-width integer and checks it against a predicate
pub struct Integer<T, F> {
    endian: Endian,
    accept: F,
    _value: PhantomData<fn() -> T>,
}

impl<T, F: Clone> Clone for Integer<T, F> {
    fn clone(&self) -> Self {
        Self {
            endian: self.endian,
            accept: self.accept.clone(),
            _value: PhantomData,
        }
    }
}

impl<T, F> Integer<T, F> {
    /// Byte order used for decoding
    pub fn endian(&self) -> Endian {
        self.endian
    }
}

impl<T, F> Parser<u8> for Integer<T, F>
where
    T: FixedWidth,
    F: Fn(&T) -> bool,
{
    type Output = T;

    #[inline]
    fn parse_at(&self, source: &[u8], pos: usize) -> ParseOutcome<T> {
        let end = pos.saturating_add(T::WIDTH);
        match source
            .get(pos..end)
            .and_then(|window| T::decode(window, self.endian))
        {
            Some(value) if (self.accept)(&value) => ParseOutcome::success(T::WIDTH, value),
            _ => ParseOutcome::failure(),
        }
    }
}

/// Predicate accepting every decoded value
pub type AcceptAll<T> = fn(&T) -> bool;

fn accept_all<T>(_: &T) -> bool {
    true
}

/// Decode any [`FixedWidth`] integer whose value satisfies `accept`
pub fn integer_where<T, F>(endian: Endian, accept: F) -> Integer<T, F>
where
    T: FixedWidth,
    F: Fn(&T) -> bool,
{
    Integer {
        endian,
        accept,
        _value: PhantomData,
    }
}

/// Decode any [`FixedWidth`] integer
pub fn integer<T: FixedWidth>(endian: Endian) -> Integer<T, AcceptAll<T>> {
    integer_where(endian, accept_all as AcceptAll<T>)
}

/// Decode a two-byte signed integer
pub fn int16(endian: Endian) -> Integer<i16, AcceptAll<i16>> {
    integer(endian)
}

/// Decode a two-byte signed integer satisfying `accept`
pub fn int16_where<F>(endian: Endian, accept: F) -> Integer<i16, F>
where
    F: Fn(&i16) -> bool,
{
    integer_where(endian, accept)
}

/// Decode a four-byte signed integer
pub fn int32(endian: Endian) -> Integer<i32, AcceptAll<i32>> {
    integer(endian)
}

/// Decode a four-byte signed integer satisfying `accept`
pub fn int32_where<F>(endian: Endian, accept: F) -> Integer<i32, F>
where
    F: Fn(&i32) -> bool,
{
    integer_where(endian, accept)
}

/// Decode an eight-byte signed integer
pub fn int64(endian: Endian) -> Integer<i64, AcceptAll<i64>> {
    integer(endian)
}

/// Decode an eight-byte signed integer satisfying `accept`
pub fn int64_where<F>(endian: Endian, accept: F) -> Integer<i64, F>
where
    F: Fn(&i64) -> bool,
{
    integer_where(endian, accept)
}
