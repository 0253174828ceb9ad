//! The command table and line dispatcher.
//!
//! Labels (primary names and aliases) map to shared, immutable command
//! descriptors. The table is a persistent map behind an [`ArcSwap`]: readers
//! load a snapshot without locking, writers clone the snapshot, modify it and
//! publish it with a compare-and-swap, retrying if another writer won.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use herald_foundation::{Error, Result, TypeDesc};
use herald_parser::ParserRegistry;

use crate::actor::{ActorHandle, ActorKinds};
use crate::argument::{ArgumentBuilder, Customizers};
use crate::builder::{CommandBuilder, RegisteredCommand};
use crate::config::{AliasCollisionPolicy, DispatchConfig, UnknownCommandPolicy};
use crate::discovery::{CommandHolder, Discovery, RegistrationReport};
use crate::report::{DispatchOutcome, FailureKind, FailureReport, FailureReporter, LogReporter};
use crate::special::Injectors;

type CommandTable = im::HashMap<Arc<str>, Arc<RegisteredCommand>>;

/// Registers commands and dispatches command lines to them.
pub struct CommandManager {
    commands: ArcSwap<CommandTable>,
    parsers: Arc<ParserRegistry>,
    injectors: Injectors,
    customizers: Customizers,
    kinds: Arc<ActorKinds>,
    reporter: Arc<dyn FailureReporter>,
    config: DispatchConfig,
}

impl CommandManager {
    /// Creates a manager with the default parsers, injectors, customizers
    /// and actor kinds, reporting failures to the log.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parsers(Arc::new(ParserRegistry::new()))
    }

    /// Creates a manager that resolves strategies through `parsers`.
    #[must_use]
    pub fn with_parsers(parsers: Arc<ParserRegistry>) -> Self {
        Self {
            commands: ArcSwap::from_pointee(CommandTable::new()),
            parsers,
            injectors: Injectors::new(),
            customizers: Customizers::new(),
            kinds: Arc::new(ActorKinds::new()),
            reporter: Arc::new(LogReporter),
            config: DispatchConfig::default(),
        }
    }

    /// Builder method to set the failure reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: impl FailureReporter + 'static) -> Self {
        self.reporter = Arc::new(reporter);
        self
    }

    /// Builder method to set the dispatch configuration.
    #[must_use]
    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Builder method to share an actor kind hierarchy.
    #[must_use]
    pub fn with_kinds(mut self, kinds: Arc<ActorKinds>) -> Self {
        self.kinds = kinds;
        self
    }

    /// Returns the dispatch configuration.
    #[must_use]
    pub const fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Returns the parser registry.
    #[must_use]
    pub fn parsers(&self) -> &Arc<ParserRegistry> {
        &self.parsers
    }

    /// Returns the special-argument injectors.
    #[must_use]
    pub const fn injectors(&self) -> &Injectors {
        &self.injectors
    }

    /// Returns the attribute customizers.
    #[must_use]
    pub const fn customizers(&self) -> &Customizers {
        &self.customizers
    }

    /// Returns the actor kind hierarchy.
    #[must_use]
    pub fn kinds(&self) -> &Arc<ActorKinds> {
        &self.kinds
    }

    /// Starts building a command by hand.
    #[must_use]
    pub fn create_command(&self, name: impl Into<Arc<str>>) -> CommandBuilder {
        CommandBuilder::new(name)
    }

    /// Starts an argument of type `ty` with its registered strategy.
    ///
    /// # Errors
    ///
    /// Returns a missing parser error if nothing resolves `ty`.
    pub fn argument(&self, ty: TypeDesc) -> Result<ArgumentBuilder> {
        let strategy = self.parsers.require(&ty)?;
        Ok(ArgumentBuilder::new(ty).with_strategy(strategy))
    }

    /// Registers a command under its name and every alias.
    ///
    /// A label that's already taken is handled per the alias collision
    /// policy. With [`AliasCollisionPolicy::Reject`] nothing is registered
    /// when any label collides.
    ///
    /// # Errors
    ///
    /// Returns an alias collision error under the reject policy.
    pub fn register_command(&self, command: RegisteredCommand) -> Result<Arc<RegisteredCommand>> {
        self.insert(command).map(|(command, _)| command)
    }

    /// Publishes a command; the flag is false when no label routes to it.
    fn insert(&self, command: RegisteredCommand) -> Result<(Arc<RegisteredCommand>, bool)> {
        let command = Arc::new(command);
        loop {
            let current = self.commands.load_full();
            let mut next = (*current).clone();
            let mut overwritten = Vec::new();
            let mut kept = Vec::new();

            for label in command.labels() {
                match next.get(label).cloned() {
                    Some(existing) if Arc::ptr_eq(&existing, &command) => {}
                    Some(existing) => match self.config.alias_collision {
                        AliasCollisionPolicy::Overwrite => {
                            overwritten.push((Arc::clone(label), existing));
                            next.insert(Arc::clone(label), Arc::clone(&command));
                        }
                        AliasCollisionPolicy::Reject => {
                            return Err(Error::alias_collision(label.as_ref(), existing.name()));
                        }
                        AliasCollisionPolicy::KeepFirst => kept.push((Arc::clone(label), existing)),
                    },
                    None => {
                        next.insert(Arc::clone(label), Arc::clone(&command));
                    }
                }
            }

            let reachable = command
                .labels()
                .any(|label| next.get(label).is_some_and(|owner| Arc::ptr_eq(owner, &command)));
            let prev = self.commands.compare_and_swap(&current, Arc::new(next));
            if Arc::ptr_eq(&prev, &current) {
                for (label, existing) in overwritten {
                    tracing::warn!(
                        %label,
                        previous = existing.name(),
                        command = command.name(),
                        "label overwritten"
                    );
                }
                for (label, existing) in kept {
                    tracing::debug!(%label, owner = existing.name(), command = command.name(), "label kept by earlier command");
                }
                if reachable {
                    tracing::debug!(command = command.name(), aliases = command.aliases().len(), "registered command");
                } else {
                    tracing::warn!(command = command.name(), "every label is taken; command is unreachable");
                }
                return Ok((command, reachable));
            }
        }
    }

    /// Discovers and registers every command method of a holder.
    ///
    /// A failing method is logged and recorded in the report; the other
    /// methods still register.
    pub fn register_holder<H: CommandHolder>(&self, holder: H) -> RegistrationReport {
        self.register_shared_holder(&Arc::new(holder))
    }

    /// Like [`register_holder`](Self::register_holder), for a holder that is
    /// shared with the caller.
    pub fn register_shared_holder<H: CommandHolder>(&self, holder: &Arc<H>) -> RegistrationReport {
        let discovery = Discovery {
            parsers: &self.parsers,
            injectors: &self.injectors,
            customizers: &self.customizers,
            kinds: &self.kinds,
        };

        let mut report = RegistrationReport::default();
        for (method, built) in discovery.discover(holder) {
            match built.and_then(|command| self.insert(command)) {
                Ok((command, true)) => report.registered.push(Arc::from(command.name())),
                Ok((command, false)) => report.unreachable.push(Arc::from(command.name())),
                Err(err) => {
                    tracing::warn!(holder = holder.holder_name(), %method, error = %err, "failed to register command");
                    report.failed.push((method, err));
                }
            }
        }
        report
    }

    /// Returns the command registered under a label.
    #[must_use]
    pub fn command(&self, label: &str) -> Option<Arc<RegisteredCommand>> {
        self.commands.load().get(label).cloned()
    }

    /// Returns every registered label, sorted.
    #[must_use]
    pub fn labels(&self) -> Vec<Arc<str>> {
        let mut labels: Vec<_> = self.commands.load().keys().cloned().collect();
        labels.sort();
        labels
    }

    /// Returns every distinct registered command, sorted by name.
    #[must_use]
    pub fn commands(&self) -> Vec<Arc<RegisteredCommand>> {
        let table = self.commands.load();
        let mut commands: Vec<Arc<RegisteredCommand>> = Vec::new();
        for command in table.values() {
            if !commands.iter().any(|seen| Arc::ptr_eq(seen, command)) {
                commands.push(Arc::clone(command));
            }
        }
        commands.sort_by(|a, b| a.name().cmp(b.name()));
        commands
    }

    /// Dispatches one command line on behalf of `actor`.
    ///
    /// The first whitespace-delimited token selects the command; the rest of
    /// the line is its argument text. Every failure is sent to the reporter
    /// and also returned.
    pub fn execute(&self, actor: &ActorHandle, line: &str) -> DispatchOutcome {
        let line = line.trim_start();
        let (label, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        if label.is_empty() {
            return DispatchOutcome::Unknown;
        }

        let Some(command) = self.command(label) else {
            return self.unknown(actor, label);
        };

        let outcome = command.run(actor, label, rest, &self.kinds);
        if let Some(report) = outcome.report() {
            self.reporter.report(actor, report);
        }
        outcome
    }

    fn unknown(&self, actor: &ActorHandle, label: &str) -> DispatchOutcome {
        match self.config.unknown_command {
            UnknownCommandPolicy::Ignore => {
                tracing::debug!(label, actor = actor.name(), "ignoring unknown command");
                DispatchOutcome::Unknown
            }
            UnknownCommandPolicy::Report => {
                let report = FailureReport {
                    command: label.into(),
                    alias: label.into(),
                    argument: None,
                    kind: FailureKind::UnknownCommand,
                };
                self.reporter.report(actor, &report);
                DispatchOutcome::UnknownReported(report)
            }
        }
    }
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CommandManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandManager")
            .field("labels", &self.labels())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
