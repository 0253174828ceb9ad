//! Scalar strategies: integers, floats, booleans and strings.

use std::sync::Arc;

use herald_foundation::Value;

use crate::cursor::{EndPredicate, ParserCursor};
use crate::strategy::{
    ParseErrorKind, ParseFailure, ParseResult, Strategy, TypeParser, Validated, check_and_parse,
};

/// Parses a signed integer token in a fixed radix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntegerParser {
    radix: u32,
}

impl IntegerParser {
    /// Base-10 integers.
    pub const DECIMAL: Self = Self { radix: 10 };
    /// Base-16 integers, with or without a `0x` prefix.
    pub const HEX: Self = Self { radix: 16 };

    /// Creates a parser for the given radix (2 to 36).
    #[must_use]
    pub const fn with_radix(radix: u32) -> Self {
        Self { radix }
    }

    fn parse_token(self, token: &str) -> Option<i64> {
        let (negative, digits) = match token.as_bytes().first() {
            Some(b'-') => (true, &token[1..]),
            Some(b'+') => (false, &token[1..]),
            _ => (false, token),
        };
        let digits = if self.radix == 16 {
            digits
                .strip_prefix("0x")
                .or_else(|| digits.strip_prefix("0X"))
                .unwrap_or(digits)
        } else {
            digits
        };
        if digits.is_empty() || digits.starts_with(['+', '-']) {
            return None;
        }
        // Parse with the sign attached so i64::MIN stays representable.
        let signed = if negative {
            format!("-{digits}")
        } else {
            digits.to_string()
        };
        i64::from_str_radix(&signed, self.radix).ok()
    }
}

impl TypeParser for IntegerParser {
    fn parse(&self, cursor: &mut ParserCursor<'_>, end: &EndPredicate) -> ParseResult {
        let start = cursor.position();
        let token = cursor.take_until(end);
        self.parse_token(token)
            .map(Value::Int)
            .ok_or(ParseFailure {
                kind: ParseErrorKind::InvalidInteger,
                position: start,
            })
    }
}

/// Parses a floating point token.
///
/// Accepts the full `f64` syntax including `inf` and `NaN`; whether those are
/// acceptable is decided by [`FloatConstraints`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FloatParser;

impl TypeParser for FloatParser {
    fn parse(&self, cursor: &mut ParserCursor<'_>, end: &EndPredicate) -> ParseResult {
        let start = cursor.position();
        let token = cursor.take_until(end);
        token.parse::<f64>().map(Value::Float).map_err(|_| ParseFailure {
            kind: ParseErrorKind::InvalidNumber,
            position: start,
        })
    }
}

/// Parses `true/false`, `yes/no` and `on/off`, case-insensitively.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoolParser;

impl TypeParser for BoolParser {
    fn parse(&self, cursor: &mut ParserCursor<'_>, end: &EndPredicate) -> ParseResult {
        let start = cursor.position();
        let token = cursor.take_until(end).to_ascii_lowercase();
        match token.as_str() {
            "true" | "yes" | "on" => Ok(Value::Bool(true)),
            "false" | "no" | "off" => Ok(Value::Bool(false)),
            _ => Err(ParseFailure {
                kind: ParseErrorKind::InvalidBool,
                position: start,
            }),
        }
    }
}

/// Parses a bare word, or a single- or double-quoted string.
///
/// Quoted strings may contain whitespace and separators; a backslash escapes
/// the next character.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringParser;

const QUOTES: [char; 2] = ['"', '\''];

impl TypeParser for StringParser {
    fn parse(&self, cursor: &mut ParserCursor<'_>, end: &EndPredicate) -> ParseResult {
        let Some(quote) = cursor.expect_any(&QUOTES) else {
            let token = cursor.take_until(end);
            if token.is_empty() {
                return Err(ParseFailure::at(cursor, ParseErrorKind::MissingArgument));
            }
            return Ok(Value::from(token));
        };

        let mut text = String::new();
        loop {
            match cursor.next_char() {
                None => return Err(ParseFailure::at(cursor, ParseErrorKind::UnterminatedQuote)),
                Some('\\') => match cursor.next_char() {
                    Some(escaped) => text.push(escaped),
                    None => {
                        return Err(ParseFailure::at(cursor, ParseErrorKind::UnterminatedQuote));
                    }
                },
                Some(c) if c == quote => return Ok(Value::from(text)),
                Some(c) => text.push(c),
            }
        }
    }
}

/// Consumes the rest of the line as one string, ignoring the end predicate.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyStringParser;

impl TypeParser for GreedyStringParser {
    fn parse(&self, cursor: &mut ParserCursor<'_>, _end: &EndPredicate) -> ParseResult {
        let rest = cursor.take_rest();
        let text = rest.trim_end();
        if text.is_empty() {
            return Err(ParseFailure::at(cursor, ParseErrorKind::MissingArgument));
        }
        Ok(Value::from(text))
    }

    fn end_hint(&self) -> Option<EndPredicate> {
        Some(EndPredicate::never())
    }
}

/// Visits every number in a scalar or array value.
fn numbers(value: &Value) -> Vec<f64> {
    #[allow(clippy::cast_precision_loss)]
    match value {
        Value::Int(n) => vec![*n as f64],
        Value::Float(n) => vec![*n],
        Value::IntArray(items) => items.iter().map(|n| *n as f64).collect(),
        Value::FloatArray(items) => items.to_vec(),
        Value::Array { items, .. } | Value::List(items) => items.iter().flat_map(numbers).collect(),
        _ => Vec::new(),
    }
}

/// Range and value-set restrictions shared by the numeric constraints.
fn check_number(
    n: f64,
    ranges: &[(f64, f64)],
    valid: &[f64],
    invalid: &[f64],
) -> Option<ParseErrorKind> {
    #[allow(clippy::float_cmp)]
    let listed = |set: &[f64]| set.iter().any(|v| *v == n);
    if !valid.is_empty() && !listed(valid) {
        return Some(ParseErrorKind::OutOfRange);
    }
    if listed(invalid) {
        return Some(ParseErrorKind::OutOfRange);
    }
    if !ranges.is_empty() && !ranges.iter().any(|(min, max)| n >= *min && n <= *max) {
        return Some(ParseErrorKind::OutOfRange);
    }
    None
}

/// Restrictions on float arguments.
///
/// By default infinity and NaN are rejected and every finite value is
/// allowed. Several `[min, max]` ranges may be given; a value passes if it is
/// inside any of them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FloatConstraints {
    /// Accept positive and negative infinity.
    pub allow_infinity: bool,
    /// Accept NaN.
    pub allow_nan: bool,
    /// Inclusive ranges; empty means unbounded.
    pub ranges: Vec<(f64, f64)>,
    /// Values that are always rejected.
    pub invalid_values: Vec<f64>,
    /// If non-empty, the only values accepted.
    pub valid_values: Vec<f64>,
}

impl FloatConstraints {
    /// Creates the default (finite values only) constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an inclusive range.
    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.ranges.push((min, max));
        self
    }

    /// Allows infinite values.
    #[must_use]
    pub const fn allow_infinity(mut self, allow: bool) -> Self {
        self.allow_infinity = allow;
        self
    }

    /// Allows NaN.
    #[must_use]
    pub const fn allow_nan(mut self, allow: bool) -> Self {
        self.allow_nan = allow;
        self
    }

    /// Rejects a specific value.
    #[must_use]
    pub fn with_invalid(mut self, value: f64) -> Self {
        self.invalid_values.push(value);
        self
    }

    /// Restricts to a specific set of values.
    #[must_use]
    pub fn with_valid(mut self, values: &[f64]) -> Self {
        self.valid_values.extend_from_slice(values);
        self
    }

    /// Returns the failure kind for a number, or `None` if it is accepted.
    #[must_use]
    pub fn check(&self, n: f64) -> Option<ParseErrorKind> {
        if n.is_nan() {
            return (!self.allow_nan).then_some(ParseErrorKind::NotFinite);
        }
        if n.is_infinite() {
            return (!self.allow_infinity).then_some(ParseErrorKind::NotFinite);
        }
        check_number(n, &self.ranges, &self.valid_values, &self.invalid_values)
    }

    /// Wraps a strategy so every number it produces is checked.
    #[must_use]
    pub fn apply(self, inner: Strategy) -> Strategy {
        Arc::new(CheckedFloats {
            inner,
            constraints: self,
        })
    }
}

/// A strategy whose numbers must pass [`FloatConstraints`].
///
/// Works over scalars, arrays and containers alike.
pub struct CheckedFloats {
    inner: Strategy,
    constraints: FloatConstraints,
}

impl CheckedFloats {
    /// Returns the constraints.
    #[must_use]
    pub const fn constraints(&self) -> &FloatConstraints {
        &self.constraints
    }
}

impl TypeParser for CheckedFloats {
    fn parse(&self, cursor: &mut ParserCursor<'_>, end: &EndPredicate) -> ParseResult {
        let start = cursor.position();
        let value = check_and_parse(self.inner.as_ref(), cursor, end)?;
        match numbers(&value).into_iter().find_map(|n| self.constraints.check(n)) {
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

    fn without_float_checks(&self) -> Option<Strategy> {
        Some(
            self.inner
                .without_float_checks()
                .unwrap_or_else(|| Arc::clone(&self.inner)),
        )
    }
}

/// Restrictions on integer arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntConstraints {
    /// Inclusive ranges; empty means unbounded.
    pub ranges: Vec<(i64, i64)>,
    /// Values that are always rejected.
    pub invalid_values: Vec<i64>,
    /// If non-empty, the only values accepted.
    pub valid_values: Vec<i64>,
}

impl IntConstraints {
    /// Creates unrestricted constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an inclusive range.
    #[must_use]
    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.ranges.push((min, max));
        self
    }

    /// Rejects a specific value.
    #[must_use]
    pub fn with_invalid(mut self, value: i64) -> Self {
        self.invalid_values.push(value);
        self
    }

    /// Restricts to a specific set of values.
    #[must_use]
    pub fn with_valid(mut self, values: &[i64]) -> Self {
        self.valid_values.extend_from_slice(values);
        self
    }

    /// Returns the failure kind for a number, or `None` if it is accepted.
    #[must_use]
    pub fn check(&self, n: i64) -> Option<ParseErrorKind> {
        if !self.valid_values.is_empty() && !self.valid_values.contains(&n) {
            return Some(ParseErrorKind::OutOfRange);
        }
        if self.invalid_values.contains(&n) {
            return Some(ParseErrorKind::OutOfRange);
        }
        if !self.ranges.is_empty() && !self.ranges.iter().any(|(min, max)| (*min..=*max).contains(&n))
        {
            return Some(ParseErrorKind::OutOfRange);
        }
        None
    }

    /// Wraps a strategy so every integer it produces is checked.
    #[must_use]
    pub fn apply(self, inner: Strategy) -> Strategy {
        fn ints(value: &Value) -> Vec<i64> {
            match value {
                Value::Int(n) => vec![*n],
                Value::IntArray(items) => items.to_vec(),
                Value::Array { items, .. } | Value::List(items) => items.iter().flat_map(ints).collect(),
                _ => Vec::new(),
            }
        }
        Arc::new(Validated::new(inner, move |value| {
            ints(value).into_iter().find_map(|n| self.check(n))
        }))
    }
}
