//! Syntax highlighting for the REPL.

use std::borrow::Cow;

const RESET: &str = "\x1b[0m";
const KNOWN: &str = "\x1b[1;32m";
const UNKNOWN: &str = "\x1b[31m";
const STRING: &str = "\x1b[33m";
const NUMBER: &str = "\x1b[35m";
const DELIMITER: &str = "\x1b[1m";

/// Highlighter for command lines.
///
/// The command token is green when it is a registered label and red
/// otherwise. Quoted strings, numbers and map brackets are colored in the
/// arguments.
#[derive(Debug, Default)]
pub struct CommandHighlighter {
    labels: Vec<String>,
}

impl CommandHighlighter {
    /// Creates a highlighter with no known labels.
    #[must_use]
    pub const fn new() -> Self {
        Self { labels: Vec::new() }
    }

    /// Replaces the known command labels.
    pub fn set_labels(&mut self, labels: Vec<String>) {
        self.labels = labels;
    }

    /// Returns the known command labels.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Highlight a line of input.
    pub fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.trim().is_empty() {
            return Cow::Borrowed(line);
        }

        let mut result = String::with_capacity(line.len() * 2);
        let body = line.trim_start();
        result.push_str(&line[..line.len() - body.len()]);

        let (label, rest) = match body.find(char::is_whitespace) {
            Some(at) => body.split_at(at),
            None => (body, ""),
        };
        let color = if self.labels.iter().any(|known| known == label) {
            KNOWN
        } else {
            UNKNOWN
        };
        result.push_str(color);
        result.push_str(label);
        result.push_str(RESET);

        highlight_arguments(rest, &mut result);
        Cow::Owned(result)
    }
}

fn highlight_arguments(text: &str, result: &mut String) {
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;
    let mut token_start = true;

    while let Some(c) = chars.next() {
        if let Some(open) = quote {
            result.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            } else if c == open {
                result.push_str(RESET);
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                result.push_str(STRING);
                result.push(c);
                quote = Some(c);
            }
            '{' | '}' => {
                result.push_str(DELIMITER);
                result.push(c);
                result.push_str(RESET);
            }
            c if token_start && (c.is_ascii_digit() || (c == '-' && chars.peek().is_some_and(char::is_ascii_digit))) => {
                result.push_str(NUMBER);
                result.push(c);
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '.' || next == '_' {
                        result.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                result.push_str(RESET);
            }
            _ => result.push(c),
        }
        token_start = c.is_whitespace() || matches!(c, ',' | ':' | '=' | '{');
    }

    if quote.is_some() {
        result.push_str(RESET);
    }
}
