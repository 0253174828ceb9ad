//! Command descriptors and their builder.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use herald_foundation::{Error, ErrorKind, Result};

use crate::actor::{ActorHandle, ActorKinds};
use crate::argument::Argument;
use crate::pipeline::{ParsedArguments, merge, parse_arguments};
use crate::report::{DispatchOutcome, FailureKind, FailureReport};
use crate::special::{InjectionContext, SpecialArgumentTable};

/// Error returned by a command body.
pub type CommandError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a command body.
pub type CommandResult = std::result::Result<(), CommandError>;

/// Everything a command body receives.
pub struct CallContext<'a> {
    /// The invoking actor.
    pub actor: &'a ActorHandle,
    /// The command being run.
    pub command: &'a RegisteredCommand,
    /// Label the command was invoked with.
    pub alias: &'a str,
    /// Arguments in declaration order, special slots included.
    pub args: ParsedArguments,
}

/// The bound invocation thunk of a command.
pub type Executor = Arc<dyn Fn(&CallContext<'_>) -> CommandResult + Send + Sync>;

/// An immutable, fully resolved command.
pub struct RegisteredCommand {
    name: Arc<str>,
    aliases: Vec<Arc<str>>,
    arguments: Vec<Argument>,
    special: SpecialArgumentTable,
    executor: Executor,
}

impl RegisteredCommand {
    /// Returns the primary name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the aliases.
    #[must_use]
    pub fn aliases(&self) -> &[Arc<str>] {
        &self.aliases
    }

    /// Returns the name followed by the aliases.
    pub fn labels(&self) -> impl Iterator<Item = &Arc<str>> {
        std::iter::once(&self.name).chain(self.aliases.iter())
    }

    /// Returns the parsed arguments in declaration order.
    #[must_use]
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Returns the special slots.
    #[must_use]
    pub const fn special(&self) -> &SpecialArgumentTable {
        &self.special
    }

    /// Returns the total number of declared parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arguments.len() + self.special.len()
    }

    /// Parses `input`, fills the special slots and invokes the body.
    ///
    /// Errors and panics from the body are caught here and logged; they
    /// never reach the caller.
    pub fn run(
        &self,
        actor: &ActorHandle,
        alias: &str,
        input: &str,
        kinds: &ActorKinds,
    ) -> DispatchOutcome {
        let report = |argument: Option<usize>, kind: FailureKind| FailureReport {
            command: Arc::clone(&self.name),
            alias: alias.into(),
            argument,
            kind,
        };

        let parsed = match parse_arguments(&self.arguments, input) {
            Ok(parsed) => parsed,
            Err(failure) => {
                tracing::debug!(command = %self.name, index = failure.index, %failure, "argument failed to parse");
                return DispatchOutcome::ParseFailed(report(
                    Some(failure.index),
                    FailureKind::Parse(failure.failure.kind),
                ));
            }
        };

        let injection = InjectionContext {
            actor,
            command: &self.name,
            alias,
            kinds,
        };
        let args = match merge(&self.special, parsed, &injection) {
            Ok(args) => args,
            Err(mismatch) => {
                tracing::debug!(command = %self.name, %mismatch, "special argument mismatch");
                return DispatchOutcome::InjectionMismatch(report(
                    None,
                    FailureKind::InjectionMismatch {
                        slot: mismatch.slot,
                        expected: mismatch.expected,
                        actual: mismatch.actual,
                    },
                ));
            }
        };

        let ctx = CallContext {
            actor,
            command: self,
            alias,
            args,
        };
        let message: Arc<str> = match catch_unwind(AssertUnwindSafe(|| (self.executor)(&ctx))) {
            Ok(Ok(())) => return DispatchOutcome::Executed,
            Ok(Err(err)) => {
                tracing::error!(command = %self.name, alias, error = %err, "command failed");
                err.to_string().into()
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(command = %self.name, alias, panic = %message, "command panicked");
                message.into()
            }
        };
        DispatchOutcome::InvocationFailed(report(None, FailureKind::Invocation(message)))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}

impl fmt::Debug for RegisteredCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("arguments", &self.arguments)
            .field("special", &self.special)
            .finish_non_exhaustive()
    }
}

/// Assembles a [`RegisteredCommand`].
pub struct CommandBuilder {
    name: Arc<str>,
    aliases: Vec<Arc<str>>,
    arguments: Vec<Argument>,
    special: SpecialArgumentTable,
    executor: Option<Executor>,
}

impl CommandBuilder {
    /// Creates a builder for a command name.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            arguments: Vec::new(),
            special: SpecialArgumentTable::new(),
            executor: None,
        }
    }

    /// Adds an alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<Arc<str>>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds several aliases.
    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Sets the special slot table.
    #[must_use]
    pub fn with_special(mut self, special: SpecialArgumentTable) -> Self {
        self.special = special;
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_executor(
        mut self,
        executor: impl Fn(&CallContext<'_>) -> CommandResult + Send + Sync + 'static,
    ) -> Self {
        self.executor = Some(Arc::new(executor));
        self
    }

    /// Sets an already shared body.
    #[must_use]
    pub fn with_shared_executor(mut self, executor: Executor) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Finalizes the command.
    ///
    /// # Errors
    ///
    /// Returns `MissingExecutor` if no body was set, and an internal error if
    /// a special slot lies outside the parameter list.
    pub fn build(self) -> Result<RegisteredCommand> {
        let executor = self
            .executor
            .ok_or_else(|| Error::missing_executor(self.name.as_ref()))?;

        let arity = self.arguments.len() + self.special.len();
        if let Some(slot) = self.special.slots().iter().find(|slot| slot.index >= arity) {
            return Err(Error::new(ErrorKind::Internal(format!(
                "special slot #{} is outside the {arity} parameters of {}",
                slot.index, self.name
            ))));
        }

        let mut aliases: Vec<Arc<str>> = Vec::with_capacity(self.aliases.len());
        for alias in self.aliases {
            if alias != self.name && !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }

        Ok(RegisteredCommand {
            name: self.name,
            aliases,
            arguments: self.arguments,
            special: self.special,
            executor,
        })
    }
}
