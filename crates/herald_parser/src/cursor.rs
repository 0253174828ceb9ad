//! Text cursor and end predicates.
//!
//! Every invocation builds its own [`ParserCursor`] over the argument text;
//! cursors are never shared between invocations.

use std::fmt;
use std::sync::Arc;

/// Decides where the text slice of the current argument ends.
///
/// The default predicate ends an argument at the next whitespace character.
#[derive(Clone)]
pub struct EndPredicate {
    label: &'static str,
    test: Arc<dyn Fn(char) -> bool + Send + Sync>,
}

impl EndPredicate {
    /// Creates a predicate from a function.
    pub fn new(label: &'static str, test: impl Fn(char) -> bool + Send + Sync + 'static) -> Self {
        Self {
            label,
            test: Arc::new(test),
        }
    }

    /// Ends at any whitespace character.
    #[must_use]
    pub fn whitespace() -> Self {
        Self::new("whitespace", char::is_whitespace)
    }

    /// Ends at any of the given characters.
    #[must_use]
    pub fn any_of(chars: &[char]) -> Self {
        let chars: Arc<[char]> = chars.into();
        Self::new("any-of", move |c| chars.contains(&c))
    }

    /// Never ends; the argument runs to the end of the input.
    #[must_use]
    pub fn never() -> Self {
        Self::new("never", |_| false)
    }

    /// Ends where either predicate ends.
    #[must_use]
    pub fn or(&self, other: &EndPredicate) -> Self {
        let a = Arc::clone(&self.test);
        let b = Arc::clone(&other.test);
        Self {
            label: "or",
            test: Arc::new(move |c| a(c) || b(c)),
        }
    }

    /// Returns true if the argument ends before this character.
    #[must_use]
    pub fn matches(&self, c: char) -> bool {
        (self.test)(c)
    }
}

impl Default for EndPredicate {
    fn default() -> Self {
        Self::whitespace()
    }
}

impl fmt::Debug for EndPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EndPredicate({})", self.label)
    }
}

/// A forward-only position over borrowed input text.
#[derive(Clone, Debug)]
pub struct ParserCursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> ParserCursor<'a> {
    /// Creates a cursor at the start of the input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Returns the full input.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor back to a previously observed position.
    ///
    /// Positions must come from [`position`](Self::position) on this cursor.
    pub fn reset(&mut self, pos: usize) {
        debug_assert!(self.input.is_char_boundary(pos));
        self.pos = pos;
    }

    /// Returns the unconsumed text.
    #[must_use]
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Returns true if all input has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the next character without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Consumes and returns the next character.
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes the next character if it equals `expected`.
    pub fn expect(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consumes the next character if it is one of `chars`.
    pub fn expect_any(&mut self, chars: &[char]) -> Option<char> {
        let c = self.peek().filter(|c| chars.contains(c))?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Returns true if the next character ends the current argument.
    #[must_use]
    pub fn at_end_of(&self, end: &EndPredicate) -> bool {
        self.peek().is_none_or(|c| end.matches(c))
    }

    /// Consumes text up to (not including) the first character matching `end`.
    pub fn take_until(&mut self, end: &EndPredicate) -> &'a str {
        let rest = self.remaining();
        let len = rest
            .char_indices()
            .find(|&(_, c)| end.matches(c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += len;
        &rest[..len]
    }

    /// Consumes all text up to the end of the input.
    pub fn take_rest(&mut self) -> &'a str {
        let rest = self.remaining();
        self.pos = self.input.len();
        rest
    }

    /// Skips whitespace, returning the number of bytes skipped.
    pub fn skip_whitespace(&mut self) -> usize {
        let rest = self.remaining();
        let trimmed = rest.trim_start();
        let skipped = rest.len() - trimmed.len();
        self.pos += skipped;
        skipped
    }
}
