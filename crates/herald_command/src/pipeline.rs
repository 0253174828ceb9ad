//! The per-invocation argument pipeline.
//!
//! Each call gets a fresh cursor over the argument text. Arguments are parsed
//! left to right; the first failure stops the fold and nothing is invoked.
//! Parsed values are then merged with the injected slots into one array in
//! declaration order.

use std::fmt;

use herald_foundation::{HMap, HVec, Value};
use herald_parser::{ParseErrorKind, ParseFailure, ParserCursor};
use thiserror::Error;

use crate::actor::{Actor, ActorHandle};
use crate::argument::Argument;
use crate::special::{InjectionContext, InjectionMismatch, SpecialArgumentTable};

/// One resolved call argument.
#[derive(Clone)]
pub enum CallArg {
    /// An injected actor.
    Actor(ActorHandle),
    /// A parsed or injected value.
    Value(Value),
}

impl fmt::Debug for CallArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actor(actor) => write!(f, "{:?}", &**actor),
            Self::Value(value) => write!(f, "{value:?}"),
        }
    }
}

/// A parse failure at a specific positional argument.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("argument {index}: {failure}")]
pub struct ArgumentFailure {
    /// Index among the parsed (non-special) arguments.
    pub index: usize,
    /// What went wrong.
    pub failure: ParseFailure,
}

/// Parses the argument text against an ordered argument list.
///
/// Whitespace between arguments is skipped. Running out of text before the
/// last argument is a `MissingArgument` failure at that argument; text left
/// after the last one is a `TooManyArguments` failure with
/// `index == arguments.len()`.
///
/// # Errors
///
/// Returns the first failing argument.
pub fn parse_arguments(arguments: &[Argument], input: &str) -> Result<Vec<Value>, ArgumentFailure> {
    let mut cursor = ParserCursor::new(input);
    let mut values = Vec::with_capacity(arguments.len());

    for (index, argument) in arguments.iter().enumerate() {
        cursor.skip_whitespace();
        if cursor.is_at_end() {
            return Err(ArgumentFailure {
                index,
                failure: ParseFailure::at(&cursor, ParseErrorKind::MissingArgument),
            });
        }
        let value = argument
            .parse(&mut cursor)
            .map_err(|failure| ArgumentFailure { index, failure })?;
        values.push(value);
    }

    cursor.skip_whitespace();
    if !cursor.is_at_end() {
        return Err(ArgumentFailure {
            index: arguments.len(),
            failure: ParseFailure::at(&cursor, ParseErrorKind::TooManyArguments),
        });
    }
    Ok(values)
}

/// Merges injected slots and parsed values in declaration order.
///
/// # Errors
///
/// Returns the injection mismatch, if any; no arguments are produced then.
pub fn merge(
    special: &SpecialArgumentTable,
    parsed: Vec<Value>,
    ctx: &InjectionContext<'_>,
) -> Result<ParsedArguments, InjectionMismatch> {
    let mut slots: Vec<Option<CallArg>> = vec![None; parsed.len() + special.len()];
    special.provide(&mut slots, ctx)?;

    let mut parsed = parsed.into_iter();
    let args = slots
        .into_iter()
        .filter_map(|slot| slot.or_else(|| parsed.next().map(CallArg::Value)))
        .collect();
    Ok(ParsedArguments { args })
}

/// The fully resolved arguments of one call, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct ParsedArguments {
    args: Vec<CallArg>,
}

impl ParsedArguments {
    /// Creates arguments from already resolved values.
    #[must_use]
    pub fn new(args: Vec<CallArg>) -> Self {
        Self { args }
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Returns true if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Returns the argument at a declaration index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CallArg> {
        self.args.get(index)
    }

    /// Iterates in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &CallArg> {
        self.args.iter()
    }

    /// Returns the value at an index, if it is a value.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&Value> {
        match self.args.get(index)? {
            CallArg::Value(value) => Some(value),
            CallArg::Actor(_) => None,
        }
    }

    /// Returns the actor at an index, if it is an actor.
    #[must_use]
    pub fn actor(&self, index: usize) -> Option<&ActorHandle> {
        match self.args.get(index)? {
            CallArg::Actor(actor) => Some(actor),
            CallArg::Value(_) => None,
        }
    }

    /// Downcasts the actor at an index to a concrete type.
    #[must_use]
    pub fn actor_as<T: Actor + 'static>(&self, index: usize) -> Option<&T> {
        self.actor(index)?.as_any().downcast_ref::<T>()
    }

    /// Returns an integer argument.
    #[must_use]
    pub fn int(&self, index: usize) -> Option<i64> {
        self.value(index)?.as_int()
    }

    /// Returns a float argument.
    #[must_use]
    pub fn float(&self, index: usize) -> Option<f64> {
        self.value(index)?.as_float()
    }

    /// Returns a boolean argument.
    #[must_use]
    pub fn bool(&self, index: usize) -> Option<bool> {
        self.value(index)?.as_bool()
    }

    /// Returns a string argument.
    #[must_use]
    pub fn str(&self, index: usize) -> Option<&str> {
        self.value(index)?.as_str()
    }

    /// Returns an `int[]` argument.
    #[must_use]
    pub fn int_array(&self, index: usize) -> Option<&[i64]> {
        self.value(index)?.as_int_array()
    }

    /// Returns a `float[]` argument.
    #[must_use]
    pub fn float_array(&self, index: usize) -> Option<&[f64]> {
        self.value(index)?.as_float_array()
    }

    /// Returns the items of an array or container argument.
    #[must_use]
    pub fn items(&self, index: usize) -> Option<&HVec<Value>> {
        self.value(index)?.as_items()
    }

    /// Returns a map argument.
    #[must_use]
    pub fn map(&self, index: usize) -> Option<&HMap<Value, Value>> {
        self.value(index)?.as_map()
    }
}

impl<'a> IntoIterator for &'a ParsedArguments {
    type Item = &'a CallArg;
    type IntoIter = std::slice::Iter<'a, CallArg>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.iter()
    }
}

impl From<Vec<Value>> for ParsedArguments {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values.into_iter().map(CallArg::Value).collect())
    }
}
