//! Integration tests for dispatch
//!
//! Tests for the full path from a command line to a command body:
//! - Label routing and registration policies
//! - Failure reporting
//! - Runtime configuration and the demo command set

use std::sync::Arc;

use herald_command::{ActorHandle, CommandManager, FailureReport};
use herald_runtime::{ConsoleActor, DemoCommands, DemoPlayer};
use parking_lot::Mutex;

mod routing;
mod runtime;

/// Lines written by the demo commands.
pub type Lines = Arc<Mutex<Vec<String>>>;

/// Reports received by the recording reporter.
pub type Reports = Arc<Mutex<Vec<FailureReport>>>;

pub fn console() -> ActorHandle {
    Arc::new(ConsoleActor::new())
}

pub fn player(name: &str) -> ActorHandle {
    Arc::new(DemoPlayer::new(name))
}

/// A manager that records every report it sends.
pub fn recording(manager: CommandManager) -> (CommandManager, Reports) {
    let reports: Reports = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reports);
    let manager = manager.with_reporter(move |_: &ActorHandle, report: &FailureReport| {
        sink.lock().push(report.clone());
    });
    (manager, reports)
}

/// Registers the demo commands with captured output.
pub fn with_demo(manager: &CommandManager) -> Lines {
    let lines: Lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let report = manager.register_holder(DemoCommands::with_output(Arc::new(move |line: &str| {
        sink.lock().push(line.to_string());
    })));
    assert!(report.is_complete(), "{:?}", report.failed);
    lines
}
