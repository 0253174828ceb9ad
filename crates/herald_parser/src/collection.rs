//! Compound strategies: arrays, containers and maps.

use std::sync::Arc;

use herald_foundation::{HMap, TypeDesc, Value};

use crate::cursor::{EndPredicate, ParserCursor};
use crate::strategy::{ParseErrorKind, ParseFailure, ParseResult, Strategy, TypeParser, check_and_parse};

/// Separator between array elements.
pub const ELEMENT_SEPARATOR: char = ',';

/// How an [`ArrayParser`] packages the elements it parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayShape {
    /// A primitive `int[]`.
    Ints,
    /// A primitive `float[]`.
    Floats,
    /// An array that remembers its declared element type.
    Typed(TypeDesc),
    /// A container such as `Collection<T>`.
    List,
}

/// Parses comma-separated elements until the outer end predicate.
///
/// Each element is parsed with `outer_end OR ','`, so `1,2,3` yields three
/// elements and stops at the whitespace that follows.
pub struct ArrayParser {
    element: Strategy,
    shape: ArrayShape,
}

impl ArrayParser {
    /// Creates an array parser over an element strategy.
    #[must_use]
    pub fn new(element: Strategy, shape: ArrayShape) -> Self {
        Self { element, shape }
    }

    /// Returns the output shape.
    #[must_use]
    pub const fn shape(&self) -> &ArrayShape {
        &self.shape
    }

    fn build(&self, items: Vec<Value>, cursor: &ParserCursor<'_>) -> ParseResult {
        match &self.shape {
            ArrayShape::Ints => items
                .iter()
                .map(Value::as_int)
                .collect::<Option<Vec<_>>>()
                .map(|ints| Value::IntArray(ints.into()))
                .ok_or_else(|| ParseFailure::at(cursor, ParseErrorKind::InvalidInteger)),
            ArrayShape::Floats => items
                .iter()
                .map(Value::as_float)
                .collect::<Option<Vec<_>>>()
                .map(|floats| Value::FloatArray(floats.into()))
                .ok_or_else(|| ParseFailure::at(cursor, ParseErrorKind::InvalidNumber)),
            ArrayShape::Typed(element) => Ok(Value::Array {
                element: element.clone(),
                items: items.into_iter().collect(),
            }),
            ArrayShape::List => Ok(Value::List(items.into_iter().collect())),
        }
    }
}

impl TypeParser for ArrayParser {
    fn parse(&self, cursor: &mut ParserCursor<'_>, end: &EndPredicate) -> ParseResult {
        let element_end = end.or(&EndPredicate::any_of(&[ELEMENT_SEPARATOR]));
        let mut items = Vec::new();
        loop {
            items.push(check_and_parse(self.element.as_ref(), cursor, &element_end)?);
            if !cursor.expect(ELEMENT_SEPARATOR) {
                break;
            }
        }
        self.build(items, cursor)
    }

    fn without_float_checks(&self) -> Option<Strategy> {
        let element = self.element.without_float_checks()?;
        Some(Arc::new(Self::new(element, self.shape.clone())))
    }
}

/// Bracket and separator characters for map arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapTokens {
    /// Opening brackets.
    pub start: Vec<char>,
    /// Closing brackets.
    pub end: Vec<char>,
    /// Separators between a key and its value.
    pub separator: Vec<char>,
    /// Separators between entries.
    pub entry_separator: Vec<char>,
}

impl Default for MapTokens {
    fn default() -> Self {
        Self {
            start: vec!['{'],
            end: vec!['}'],
            separator: vec![':', '='],
            entry_separator: vec![','],
        }
    }
}

impl MapTokens {
    /// Predicate ending a key or value token inside the map.
    fn token_end(&self) -> EndPredicate {
        let mut stops = self.end.clone();
        stops.extend(&self.separator);
        stops.extend(&self.entry_separator);
        EndPredicate::whitespace().or(&EndPredicate::any_of(&stops))
    }
}

/// Parses a bracketed map such as `{a: 1, b = 2}`.
///
/// Whitespace around brackets and separators is ignored.
pub struct MapParser {
    key: Strategy,
    value: Strategy,
    tokens: MapTokens,
}

impl MapParser {
    /// Creates a map parser from key and value strategies.
    #[must_use]
    pub fn new(key: Strategy, value: Strategy, tokens: MapTokens) -> Self {
        Self { key, value, tokens }
    }

    /// Returns the tokens this parser uses.
    #[must_use]
    pub const fn tokens(&self) -> &MapTokens {
        &self.tokens
    }
}

fn expected(cursor: &ParserCursor<'_>, choices: &[char]) -> ParseFailure {
    let c = choices.first().copied().unwrap_or(' ');
    ParseFailure::at(cursor, ParseErrorKind::Expected(c))
}

impl TypeParser for MapParser {
    fn parse(&self, cursor: &mut ParserCursor<'_>, _end: &EndPredicate) -> ParseResult {
        let tokens = &self.tokens;
        if cursor.expect_any(&tokens.start).is_none() {
            return Err(expected(cursor, &tokens.start));
        }

        let token_end = tokens.token_end();
        let mut map = HMap::new();
        cursor.skip_whitespace();
        if cursor.expect_any(&tokens.end).is_some() {
            return Ok(Value::Map(map));
        }

        loop {
            cursor.skip_whitespace();
            let key = check_and_parse(self.key.as_ref(), cursor, &token_end)?;
            cursor.skip_whitespace();
            if cursor.expect_any(&tokens.separator).is_none() {
                return Err(expected(cursor, &tokens.separator));
            }
            cursor.skip_whitespace();
            let value = check_and_parse(self.value.as_ref(), cursor, &token_end)?;
            map.insert(key, value);
            cursor.skip_whitespace();

            if cursor.expect_any(&tokens.entry_separator).is_some() {
                continue;
            }
            if cursor.expect_any(&tokens.end).is_some() {
                return Ok(Value::Map(map));
            }
            return Err(expected(cursor, &tokens.end));
        }
    }

    fn end_hint(&self) -> Option<EndPredicate> {
        Some(EndPredicate::any_of(&self.tokens.end))
    }
}
