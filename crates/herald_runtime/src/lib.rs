//! REPL, CLI, configuration and logging setup for Herald.
//!
//! This crate provides:
//! - [`Repl`] - Interactive command loop
//! - [`RuntimeConfig`] - Settings, optionally loaded from TOML
//! - [`logging`] - Tracing subscriber setup
//! - [`ConsoleActor`] and [`ConsoleReporter`] - The terminal as an actor
//! - [`DemoCommands`] - The command set the `herald` binary registers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod console;
pub mod demo;
pub mod editor;
pub mod error;
pub mod highlight;
pub mod logging;
pub mod repl;

pub use config::RuntimeConfig;
pub use console::{ConsoleActor, ConsoleReporter, describe};
pub use demo::{DemoCommands, DemoPlayer};
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use error::{Result, RuntimeError};
pub use highlight::CommandHighlighter;
pub use repl::Repl;
