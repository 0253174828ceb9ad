//! The interactive command loop.

use std::io::{self, Write};
use std::sync::Arc;

use herald_command::{ActorHandle, CommandManager, DispatchOutcome};

use crate::config::RuntimeConfig;
use crate::console::ConsoleActor;
use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::error::Result;

/// Words that end the loop instead of being dispatched.
const EXIT_WORDS: &[&str] = &["exit", "quit"];

/// The interactive REPL.
///
/// Every line is dispatched as the console actor; failures are shown by the
/// manager's reporter.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// The dispatcher.
    manager: Arc<CommandManager>,

    /// Actor that runs the commands.
    actor: ActorHandle,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a REPL with the rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(manager: Arc<CommandManager>, config: &RuntimeConfig) -> Result<Self> {
        let editor = RustylineEditor::new(config.history_size)?;
        let repl = Self::with_editor(editor, manager)
            .with_prompt(config.prompt.clone());
        Ok(if config.banner { repl } else { repl.without_banner() })
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a REPL with the given editor.
    pub fn with_editor(mut editor: E, manager: Arc<CommandManager>) -> Self {
        editor.set_labels(manager.labels().iter().map(ToString::to_string).collect());
        Self {
            editor,
            manager,
            actor: Arc::new(ConsoleActor::new()),
            show_banner: true,
            prompt: "herald> ".to_string(),
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Sets the actor that runs the commands.
    #[must_use]
    pub fn with_actor(mut self, actor: ActorHandle) -> Self {
        self.actor = actor;
        self
    }

    /// Returns the dispatcher.
    #[must_use]
    pub fn manager(&self) -> &Arc<CommandManager> {
        &self.manager
    }

    /// Dispatches one line as the REPL's actor.
    pub fn execute(&self, line: &str) -> DispatchOutcome {
        self.manager.execute(&self.actor, line)
    }

    /// Runs the REPL loop until EOF or an exit word.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        while let Some(line) = self.read()? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            self.editor.add_history(&line);
            if EXIT_WORDS.contains(&trimmed) {
                break;
            }
            let outcome = self.execute(trimmed);
            tracing::trace!(?outcome, "dispatched line");
        }

        println!("\nGoodbye!");
        Ok(())
    }

    fn read(&mut self) -> Result<Option<String>> {
        match self.editor.read_line(&self.prompt)? {
            ReadResult::Line(line) => Ok(Some(line)),
            ReadResult::Interrupted => {
                println!();
                Ok(Some(String::new()))
            }
            ReadResult::Eof => Ok(None),
        }
    }

    fn print_banner(&self) {
        println!("\x1b[1;36mHerald\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
        println!(
            "{} commands registered. Type `help` for a list, Ctrl+D to exit.\n",
            self.manager.commands().len()
        );
        let _ = io::stdout().flush();
    }
}
