//! Type-directed argument parsing for Herald.
//!
//! Turns the text of a command line into typed [`Value`](herald_foundation::Value)s,
//! one declared parameter at a time.
//!
//! # Architecture
//!
//! ```text
//! "12.23 1,2,3 'more words'"
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ PARSER REGISTRY │  float → FloatParser, int[] → ArrayParser(int), ...
//! └─────────────────┘
//!          │  (resolved once per parameter, cached by type)
//!          ▼
//! ┌─────────────────┐
//! │ CURSOR          │  each strategy consumes its slice up to the
//! │ + STRATEGIES    │  end predicate, or fails without moving
//! └─────────────────┘
//!          │
//!          ▼
//!   [12.23, [1,2,3], "more words"]
//! ```
//!
//! # Modules
//!
//! - [`cursor`] - Text cursor and end predicates
//! - [`strategy`] - The strategy trait, failure kinds, and `check_and_parse`
//! - [`basic`] - Integer, float, bool and string strategies, numeric constraints
//! - [`collection`] - Array, container and map strategies
//! - [`registry`] - Type to strategy resolution with caching

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod basic;
pub mod collection;
pub mod cursor;
pub mod registry;
pub mod strategy;

pub use basic::{
    BoolParser, CheckedFloats, FloatConstraints, FloatParser, GreedyStringParser, IntConstraints,
    IntegerParser, StringParser,
};
pub use collection::{ArrayParser, ArrayShape, MapParser, MapTokens};
pub use cursor::{EndPredicate, ParserCursor};
pub use registry::{ParamSite, ParserRegistry, Resolver, SiteResolver};
pub use strategy::{
    ParseErrorKind, ParseFailure, ParseResult, Strategy, TypeParser, Validated, check_and_parse,
};
