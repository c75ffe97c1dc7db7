//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from parsekit.
//! Importing this module with a wildcard import brings the core types into scope:
//!
//! ```
//! use parsekit::prelude::*;
//! ```
//!
//! # Re-exported Items
//!
//! ## Core Types
//! - [`ParseOutcome`] - Success with consumed count and value, or failure
//! - [`Parser`] - The parser contract
//! - [`ParserExt`] - Combinator methods on every parser
//! - [`BoxedParser`] - Type-erased shared parser
//! - [`EngineError`] - Misuse conditions
//!
//! ## Combinators
//! - [`satisfy()`], [`success()`], [`fail()`], [`end_of_input()`] - Primitives
//! - [`cat()`], [`pair()`], [`alt()`], [`optional()`] - Sequencing and choice
//! - [`repeat()`], [`zero_or_more()`], [`one_or_more()`], [`Bounds`] - Repetition
//! - [`peek()`], [`not()`] - Lookahead
//! - [`lazy()`], [`recursive()`], [`Forward`] - Deferred and self-referential grammars
//! - [`packrat()`] - Memoization
//!
//! ## Collectors
//! - [`Collector`] / [`CollectorExt`] - Fold descriptors and their adapters
//! - [`ToList`], [`ToSet`], [`ToMap`], [`Counting`], [`Discarding`],
//!   [`Stringify`], [`Joining`], [`Aggregate`] - Ready-made collectors

// ============================================================================
// Core Types
// ============================================================================

pub use crate::engine::{from_fn, BoxedParser, EngineError, ParseOutcome, Parser, ParserExt};

// ============================================================================
// Combinators
// ============================================================================

pub use crate::engine::{
    alt, cat, end_of_input, fail, lazy, not, one_or_more, optional, packrat, pair, peek,
    recursive, repeat, satisfy, success, zero_or_more, Bounds, Forward, Packrat, PackratStats,
};

// ============================================================================
// Collectors
// ============================================================================

pub use crate::engine::{
    collector, Aggregate, Collector, CollectorExt, Counting, Discarding, Joining, Stringify,
    ToList, ToMap, ToSet,
};
