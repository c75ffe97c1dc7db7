//! Engine misuse errors
//!
//! Parse failure is never reported through this type: it is an ordinary
//! [`ParseOutcome::Failure`](super::outcome::ParseOutcome::Failure). The
//! variants here cover API misuse that is detected immediately: reading a
//! failed outcome, constructing a repetition with bounds that can never be
//! satisfied, or defining a forward declaration twice.

use std::fmt;

/// Misuse of the engine's API (distinct from a parse failure)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// `consumed` or `value` was read from a failed outcome
    FailureAccess {
        /// Name of the accessor that was called
        field: &'static str,
    },

    /// Repetition bounds that no input could satisfy
    InvalidRepeatBounds {
        /// Requested minimum number of matches
        min: i64,
        /// Requested maximum number of matches (`-1` = unbounded)
        max: i64,
    },

    /// A forward declaration was given a second definition
    AlreadyDefined,
}

impl EngineError {
    /// Create a `FailureAccess` error for the given accessor
    #[inline]
    pub fn failure_access(field: &'static str) -> Self {
        EngineError::FailureAccess { field }
    }

    /// Create an `InvalidRepeatBounds` error
    #[inline]
    pub fn invalid_bounds(min: i64, max: i64) -> Self {
        EngineError::InvalidRepeatBounds { min, max }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::FailureAccess { field } => {
                write!(f, "Cannot read `{}` of a failed parse outcome", field)
            }
            EngineError::InvalidRepeatBounds { min, max } if *min < 0 => {
                write!(
                    f,
                    "Invalid repeat bounds: minimum {} is negative (maximum {})",
                    min, max
                )
            }
            EngineError::InvalidRepeatBounds { max, .. } if *max < -1 => {
                write!(
                    f,
                    "Invalid repeat bounds: maximum {} is below -1 (unbounded)",
                    max
                )
            }
            EngineError::InvalidRepeatBounds { min, max } => {
                write!(
                    f,
                    "Invalid repeat bounds: minimum {} exceeds maximum {}",
                    min, max
                )
            }
            EngineError::AlreadyDefined => {
                write!(f, "Forward parser is already defined")
            }
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_access_display() {
        let err = EngineError::failure_access("value");
        assert_eq!(
            err.to_string(),
            "Cannot read `value` of a failed parse outcome"
        );
    }

    #[test]
    fn test_invalid_bounds_display() {
        let err = EngineError::invalid_bounds(5, 2);
        assert!(err.to_string().contains("minimum 5 exceeds maximum 2"));

        let err = EngineError::invalid_bounds(-1, 3);
        assert!(err.to_string().contains("is negative"));

        let err = EngineError::invalid_bounds(0, -2);
        assert_eq!(
            err.to_string(),
            "Invalid repeat bounds: maximum -2 is below -1 (unbounded)"
        );
    }

    #[test]
    fn test_already_defined_display() {
        assert_eq!(
            EngineError::AlreadyDefined.to_string(),
            "Forward parser is already defined"
        );
    }

    #[test]
    fn test_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&EngineError::failure_access("consumed"));
    }
}
