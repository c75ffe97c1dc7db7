//! Parse outcomes
//!
//! Every parser invocation produces a fresh [`ParseOutcome`]: either a
//! success carrying the number of consumed elements and a value, or a bare
//! failure. Outcomes are never mutated; combinators thread them into new
//! outcomes.

use super::error::EngineError;

/// Result of invoking a parser at a position
///
/// `consumed` counts elements of the input sequence (characters, bytes, ...),
/// never bytes of some encoding specifically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseOutcome<T> {
    /// The parser matched
    Success {
        /// Number of input elements consumed
        consumed: usize,
        /// Value produced by the parser
        value: T,
    },
    /// The parser did not match
    Failure,
}

impl<T> ParseOutcome<T> {
    /// Create a successful outcome
    #[inline]
    pub fn success(consumed: usize, value: T) -> Self {
        ParseOutcome::Success { consumed, value }
    }

    /// Create a failed outcome
    #[inline]
    pub fn failure() -> Self {
        ParseOutcome::Failure
    }

    /// Whether the parse succeeded
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, ParseOutcome::Success { .. })
    }

    /// Whether the parse failed
    #[inline]
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Number of consumed elements
    ///
    /// Reading this on a failure is a misuse and returns
    /// [`EngineError::FailureAccess`].
    #[inline]
    pub fn consumed(&self) -> Result<usize, EngineError> {
        match self {
            ParseOutcome::Success { consumed, .. } => Ok(*consumed),
            ParseOutcome::Failure => Err(EngineError::failure_access("consumed")),
        }
    }

    /// Borrow the produced value
    ///
    /// Reading this on a failure is a misuse and returns
    /// [`EngineError::FailureAccess`].
    #[inline]
    pub fn value(&self) -> Result<&T, EngineError> {
        match self {
            ParseOutcome::Success { value, .. } => Ok(value),
            ParseOutcome::Failure => Err(EngineError::failure_access("value")),
        }
    }

    /// Take the produced value
    #[inline]
    pub fn into_value(self) -> Result<T, EngineError> {
        match self {
            ParseOutcome::Success { value, .. } => Ok(value),
            ParseOutcome::Failure => Err(EngineError::failure_access("value")),
        }
    }

    /// Split a success into `(consumed, value)`
    #[inline]
    pub fn into_parts(self) -> Option<(usize, T)> {
        match self {
            ParseOutcome::Success { consumed, value } => Some((consumed, value)),
            ParseOutcome::Failure => None,
        }
    }

    /// The value of a success, discarding the consumed count
    #[inline]
    pub fn ok(self) -> Option<T> {
        self.into_parts().map(|(_, value)| value)
    }

    /// Transform the value of a success, forwarding failure unchanged
    #[inline]
    pub fn map<U, F>(self, f: F) -> ParseOutcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            ParseOutcome::Success { consumed, value } => ParseOutcome::success(consumed, f(value)),
            ParseOutcome::Failure => ParseOutcome::Failure,
        }
    }

    /// Borrowing view of this outcome
    #[inline]
    pub fn as_ref(&self) -> ParseOutcome<&T> {
        match self {
            ParseOutcome::Success { consumed, value } => ParseOutcome::success(*consumed, value),
            ParseOutcome::Failure => ParseOutcome::Failure,
        }
    }

    /// Shift the consumed count of a success by `offset` elements
    #[inline]
    pub(crate) fn advanced_by(self, offset: usize) -> Self {
        match self {
            ParseOutcome::Success { consumed, value } => {
                ParseOutcome::success(consumed + offset, value)
            }
            ParseOutcome::Failure => ParseOutcome::Failure,
        }
    }
}

impl<T> From<Option<(usize, T)>> for ParseOutcome<T> {
    fn from(parts: Option<(usize, T)>) -> Self {
        match parts {
            Some((consumed, value)) => ParseOutcome::success(consumed, value),
            None => ParseOutcome::Failure,
        }
    }
}
