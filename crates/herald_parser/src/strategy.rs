//! Parsing strategies.
//!
//! A strategy turns the text at a cursor into one [`Value`]. Strategies are
//! pure: the same input slice and end predicate always produce the same
//! result, which is what makes caching resolved strategies sound.

use std::fmt;
use std::sync::Arc;

use herald_foundation::Value;
use thiserror::Error;

use crate::cursor::{EndPredicate, ParserCursor};

/// Stable, message-free classification of a parse failure.
///
/// The code string is meant as a lookup key for whatever renders messages
/// to the user.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// The argument was required but no text was left.
    MissingArgument,
    /// Text was left over after the last argument.
    TooManyArguments,
    /// A strategy reported success without consuming anything.
    NothingConsumed,
    /// The token is not a valid integer.
    InvalidInteger,
    /// The token is not a valid number.
    InvalidNumber,
    /// The token is not a valid boolean.
    InvalidBool,
    /// A numeric value was outside the allowed ranges or values.
    OutOfRange,
    /// Infinity or NaN where they are not allowed.
    NotFinite,
    /// A quoted string was not closed.
    UnterminatedQuote,
    /// A specific character was expected.
    Expected(char),
    /// A strategy-defined failure.
    Custom(Arc<str>),
}

impl ParseErrorKind {
    /// Returns the stable code for this kind.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::MissingArgument => "missing-argument",
            Self::TooManyArguments => "too-many-arguments",
            Self::NothingConsumed => "nothing-consumed",
            Self::InvalidInteger => "invalid-integer",
            Self::InvalidNumber => "invalid-number",
            Self::InvalidBool => "invalid-bool",
            Self::OutOfRange => "out-of-range",
            Self::NotFinite => "not-finite",
            Self::UnterminatedQuote => "unterminated-quote",
            Self::Expected(_) => "expected-token",
            Self::Custom(code) => code,
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected(c) => write!(f, "expected-token '{c}'"),
            other => write!(f, "{}", other.code()),
        }
    }
}

/// Failure metadata from a strategy.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind} at byte {position}")]
pub struct ParseFailure {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Byte position in the argument text where the failure was detected.
    pub position: usize,
}

impl ParseFailure {
    /// Creates a failure at the cursor's current position.
    #[must_use]
    pub fn at(cursor: &ParserCursor<'_>, kind: ParseErrorKind) -> Self {
        Self {
            kind,
            position: cursor.position(),
        }
    }
}

/// Result of running a strategy.
pub type ParseResult<T = Value> = std::result::Result<T, ParseFailure>;

/// A parsing strategy.
///
/// Implementations may leave the cursor anywhere on failure; callers go
/// through [`check_and_parse`], which restores it.
pub trait TypeParser: Send + Sync {
    /// Parses one value, stopping where `end` matches.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseFailure`] when the text is not valid for this strategy.
    fn parse(&self, cursor: &mut ParserCursor<'_>, end: &EndPredicate) -> ParseResult;

    /// End predicate this strategy works best with, if not whitespace.
    fn end_hint(&self) -> Option<EndPredicate> {
        None
    }

    /// This strategy with its float checks removed, if it has any.
    ///
    /// Lets a float attribute replace the default finiteness checks instead of
    /// stacking on top of them.
    fn without_float_checks(&self) -> Option<Strategy> {
        None
    }
}

impl fmt::Debug for dyn TypeParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeParser")
    }
}

impl<F> TypeParser for F
where
    F: Fn(&mut ParserCursor<'_>, &EndPredicate) -> ParseResult + Send + Sync,
{
    fn parse(&self, cursor: &mut ParserCursor<'_>, end: &EndPredicate) -> ParseResult {
        self(cursor, end)
    }
}

/// Shared handle to a resolved strategy.
pub type Strategy = Arc<dyn TypeParser>;

/// Runs a strategy and enforces the strategy contract.
///
/// On failure the cursor is restored to where it was. A success that consumed
/// no input is turned into a [`ParseErrorKind::NothingConsumed`] failure, so
/// a fold over strategies always terminates.
///
/// # Errors
///
/// Returns the strategy's failure, or `NothingConsumed`.
pub fn check_and_parse(
    parser: &dyn TypeParser,
    cursor: &mut ParserCursor<'_>,
    end: &EndPredicate,
) -> ParseResult {
    let start = cursor.position();
    match parser.parse(cursor, end) {
        Ok(_) if cursor.position() == start => {
            cursor.reset(start);
            Err(ParseFailure {
                kind: ParseErrorKind::NothingConsumed,
                position: start,
            })
        }
        Ok(value) => Ok(value),
        Err(failure) => {
            cursor.reset(start);
            Err(failure)
        }
    }
}

/// Wraps a strategy with a post-parse check on the produced value.
pub struct Validated {
    inner: Strategy,
    check: Arc<dyn Fn(&Value) -> Option<ParseErrorKind> + Send + Sync>,
}

impl Validated {
    /// Creates a validated strategy; `check` returns `Some` to reject a value.
    pub fn new(
        inner: Strategy,
        check: impl Fn(&Value) -> Option<ParseErrorKind> + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner,
            check: Arc::new(check),
        }
    }
}

impl TypeParser for Validated {
    fn parse(&self, cursor: &mut ParserCursor<'_>, end: &EndPredicate) -> ParseResult {
        let start = cursor.position();
        let value = check_and_parse(self.inner.as_ref(), cursor, end)?;
        match (self.check)(&value) {
            None => Ok(value),
            Some(kind) => Err(ParseFailure {
                kind,
                position: start,
            }),
        }
    }

    fn end_hint(&self) -> Option<EndPredicate> {
        self.inner.end_hint()
    }
}
