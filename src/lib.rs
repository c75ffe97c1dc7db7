//! Parsekit - Composable Parser Combinators with Packrat Memoization
//!
//! Parsers are small values that recognize a fragment of an input sequence
//! at a given position and report how many elements they consumed. Grammars
//! are assembled from them with sequencing, ordered choice, bounded
//! repetition, lookahead, binding and recursion. It provides:
//! - A generic [`Parser`](engine::Parser) contract over any element type
//! - A combinator algebra exposed as free functions and as methods
//! - Collectors that let repetition build any result shape
//! - Recursive grammars through lazy fixed points
//! - Opt-in packrat memoization per parser
//! - Ready-made element parsers for text and binary input
//!
//! ## Quick Start
//!
//! ```rust
//! use parsekit::prelude::*;
//! use parsekit::text::{is, unsigned_integer};
//!
//! // list := '[' number (',' number)* ']'
//! let list = is('[')
//!     .discard_left(unsigned_integer().separated_by(is(','), ToList))
//!     .discard_right(is(']'));
//!
//! let source: Vec<char> = "[1,22,333]".chars().collect();
//! assert_eq!(list.parse_complete(&source), Some(vec![1, 22, 333]));
//! ```
//!
//! ## Failure Model
//!
//! Parse failure is an ordinary value ([`ParseOutcome::Failure`](engine::ParseOutcome))
//! with no diagnostic payload. Only API misuse (reading a failed outcome,
//! invalid repetition bounds) is reported as an [`EngineError`](engine::EngineError).
//! Position tracking for diagnostics can be layered on with the
//! [`on_failure`](engine::ParserExt::on_failure) hook.
//!
//! ## Feature Flags
//!
//! - `logging` - Enable debug logging using the `log` crate
//! - `serde` - Derive `Serialize`/`Deserialize` for outcomes and statistics

// Lint configuration for production quality
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]
#![allow(clippy::module_inception)]
#![allow(clippy::type_complexity)]

/// Logging macros - no-op when logging feature is disabled
#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Logging macros - use log crate when logging feature is enabled
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

// Prelude module for convenient imports
pub mod prelude;

// Combinator engine
pub mod engine;

// Element parsers built on the engine
pub mod binary;
pub mod text;

/// Re-export commonly used types for convenience
pub use engine::{
    BoxedParser, Bounds, Collector, CollectorExt, EngineError, Packrat, PackratStats,
    ParseOutcome, Parser, ParserExt,
};
