//! The console actor and the terminal failure reporter.

use std::any::Any;

use herald_command::{Actor, ActorHandle, CONSOLE, FailureKind, FailureReport, FailureReporter};
use herald_foundation::TypeDesc;
use herald_parser::ParseErrorKind;

/// The operator at the terminal.
#[derive(Clone, Debug)]
pub struct ConsoleActor {
    name: String,
}

impl ConsoleActor {
    /// Creates the console actor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "console".to_string(),
        }
    }
}

impl Default for ConsoleActor {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for ConsoleActor {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TypeDesc {
        TypeDesc::named(CONSOLE)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Prints failure reports to stderr.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleReporter;

impl FailureReporter for ConsoleReporter {
    fn report(&self, _actor: &ActorHandle, report: &FailureReport) {
        eprintln!("\x1b[31m{}\x1b[0m", describe(report));
    }
}

/// Renders a failure report as a sentence for the terminal.
#[must_use]
pub fn describe(report: &FailureReport) -> String {
    let what = match &report.kind {
        FailureKind::UnknownCommand => return format!("Unknown command: {}", report.alias),
        FailureKind::InjectionMismatch { expected, .. } => {
            format!("only a {expected} can use this command")
        }
        FailureKind::Invocation(message) => format!("the command failed: {message}"),
        FailureKind::Parse(kind) => parse_problem(kind),
    };
    match report.argument {
        Some(index) => format!("{}: argument {}: {what}", report.alias, index + 1),
        None => format!("{}: {what}", report.alias),
    }
}

fn parse_problem(kind: &ParseErrorKind) -> String {
    match kind {
        ParseErrorKind::MissingArgument => "missing argument".to_string(),
        ParseErrorKind::TooManyArguments => "too many arguments".to_string(),
        ParseErrorKind::NothingConsumed => "nothing to parse".to_string(),
        ParseErrorKind::InvalidInteger => "not a whole number".to_string(),
        ParseErrorKind::InvalidNumber => "not a number".to_string(),
        ParseErrorKind::InvalidBool => "not true or false".to_string(),
        ParseErrorKind::OutOfRange => "value out of range".to_string(),
        ParseErrorKind::NotFinite => "value must be finite".to_string(),
        ParseErrorKind::UnterminatedQuote => "unterminated quote".to_string(),
        ParseErrorKind::Expected(c) => format!("expected '{c}'"),
        other => other.code().to_string(),
    }
}
