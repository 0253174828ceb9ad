//! Failure reports and dispatch outcomes.
//!
//! The command layer never formats user-facing messages. When a line can't
//! be dispatched it hands a [`FailureReport`] (command, label, argument
//! index, stable kind) to a [`FailureReporter`], which owns presentation.

use std::fmt;
use std::sync::Arc;

use herald_foundation::TypeDesc;
use herald_parser::ParseErrorKind;

use crate::actor::ActorHandle;

/// Stable classification of a dispatch failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// An argument didn't parse.
    Parse(ParseErrorKind),
    /// The invoking context didn't satisfy a special slot.
    InjectionMismatch {
        /// Declaration index of the slot.
        slot: usize,
        /// The declared capability.
        expected: TypeDesc,
        /// What the context had.
        actual: TypeDesc,
    },
    /// No command is registered under the label.
    UnknownCommand,
    /// The command body returned an error or panicked.
    Invocation(Arc<str>),
}

impl FailureKind {
    /// Returns the stable code for this kind.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Parse(kind) => kind.code(),
            Self::InjectionMismatch { .. } => "injection-mismatch",
            Self::UnknownCommand => "unknown-command",
            Self::Invocation(_) => "invocation-failed",
        }
    }
}

/// Everything a reporter needs to tell the actor what went wrong.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureReport {
    /// Primary name of the command, or the unknown label.
    pub command: Arc<str>,
    /// Label the command was invoked with.
    pub alias: Arc<str>,
    /// Index of the failing positional argument, for parse failures.
    pub argument: Option<usize>,
    /// What went wrong.
    pub kind: FailureKind,
}

impl FailureReport {
    /// Returns the stable code of the failure kind.
    #[must_use]
    pub fn code(&self) -> &str {
        self.kind.code()
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.alias, self.code())?;
        if let Some(index) = self.argument {
            write!(f, " at argument {index}")?;
        }
        match &self.kind {
            FailureKind::InjectionMismatch {
                expected, actual, ..
            } => write!(f, " (expected {expected}, got {actual})"),
            FailureKind::Invocation(message) => write!(f, " ({message})"),
            FailureKind::Parse(_) | FailureKind::UnknownCommand => Ok(()),
        }
    }
}

/// Presents failures to the actor that caused them.
pub trait FailureReporter: Send + Sync {
    /// Reports one failure.
    fn report(&self, actor: &ActorHandle, report: &FailureReport);
}

impl<F> FailureReporter for F
where
    F: Fn(&ActorHandle, &FailureReport) + Send + Sync,
{
    fn report(&self, actor: &ActorHandle, report: &FailureReport) {
        self(actor, report);
    }
}

/// Reporter that only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl FailureReporter for LogReporter {
    fn report(&self, actor: &ActorHandle, report: &FailureReport) {
        tracing::info!(
            actor = actor.name(),
            command = %report.command,
            alias = %report.alias,
            argument = ?report.argument,
            code = report.code(),
            "command failed"
        );
    }
}

/// What happened to one dispatched line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The command body ran and returned normally.
    Executed,
    /// No command matched and the policy is to ignore it.
    Unknown,
    /// No command matched and a report was sent.
    UnknownReported(FailureReport),
    /// An argument failed to parse; the body was not invoked.
    ParseFailed(FailureReport),
    /// A special slot couldn't be filled; the body was not invoked.
    InjectionMismatch(FailureReport),
    /// The body returned an error or panicked.
    InvocationFailed(FailureReport),
}

impl DispatchOutcome {
    /// Returns true if the command body ran to completion.
    #[must_use]
    pub const fn is_executed(&self) -> bool {
        matches!(self, Self::Executed)
    }

    /// Returns the failure report, if any.
    #[must_use]
    pub const fn report(&self) -> Option<&FailureReport> {
        match self {
            Self::Executed | Self::Unknown => None,
            Self::UnknownReported(report)
            | Self::ParseFailed(report)
            | Self::InjectionMismatch(report)
            | Self::InvocationFailed(report) => Some(report),
        }
    }
}
