//! The combinator engine
//!
//! Everything here is independent of the element type being parsed. The
//! [`text`](crate::text) and [`binary`](crate::binary) modules build their
//! element parsers purely on top of this public surface.
//!
//! # Module Organization
//!
//! ## Core Types
//! - [`ParseOutcome`] - Result of one parser invocation
//! - [`Parser`] / [`ParserExt`] - The parser contract and its method algebra
//! - [`EngineError`] - API misuse conditions (never parse failures)
//!
//! ## Combinators
//! - [`combinators`] - Sequencing, choice, repetition, lookahead, binding
//! - [`hooks`] - Observation without altering outcomes
//! - [`lazy`] - Deferred construction and recursive grammars
//!
//! ## Accumulation
//! - [`collector`] - Fold descriptors used by repetition
//!
//! ## Memoization
//! - [`packrat`] - Per-position success cache

// ============================================================================
// Module Declarations
// ============================================================================

pub mod collector;
pub mod combinators;
pub mod error;
pub mod hooks;
pub mod lazy;
pub mod outcome;
pub mod packrat;
pub mod parser;

// ============================================================================
// Core Types
// ============================================================================

pub use error::EngineError;
pub use outcome::ParseOutcome;
pub use parser::{from_fn, BoxedParser, FromFn, Parser, ParserExt};

// ============================================================================
// Combinators
// ============================================================================

pub use combinators::{
    alt, and, bind, cat, delimited, end_of_input, fail, map, not, one_or_more, optional, pair,
    peek, repeat, repeat_range, satisfy, separated_by, success, zero_or_more, Alt, And, Bind,
    Bounds, Cat, Delimited, EndOfInput, Fail, Filter, Map, Not, Optional, Repeat, Satisfy,
    SeparatedBy, Succeed, TryMap,
};
pub use hooks::{before, on_failure, on_success, Before, OnFailure, OnSuccess, Traced};
pub use lazy::{lazy, recursive, Forward, Lazy, Recursive};

// ============================================================================
// Accumulation
// ============================================================================

pub use collector::{
    collector, Accept, Aggregate, CollectingAndThen, Collector, CollectorExt, Counting,
    Discarding, FnCollector, JoinState, Joining, Mapping, MaxBy, MinBy, Stringify, ToList,
    ToMap, ToSet,
};

// ============================================================================
// Memoization
// ============================================================================

pub use packrat::{packrat, Packrat, PackratStats};
