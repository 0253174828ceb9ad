//! Label routing and registration policy tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use herald_command::{
    AliasCollisionPolicy, CommandManager, DispatchConfig, DispatchOutcome, FailureKind,
    UnknownCommandPolicy,
};
use herald_foundation::{ErrorKind, TypeDesc};
use parking_lot::Mutex;
use proptest::prelude::*;

use crate::{console, recording, with_demo};

fn counting(manager: &CommandManager, name: &str, aliases: &[&str]) -> Arc<AtomicUsize> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let command = manager
        .create_command(name)
        .with_aliases(aliases.iter().copied())
        .with_executor(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .build()
        .unwrap();
    let _ = manager.register_command(command);
    calls
}

// =============================================================================
// Routing
// =============================================================================

#[test]
fn aliases_route_to_the_same_command() {
    let manager = CommandManager::new();
    let lines = with_demo(&manager);

    let by_name = manager.command("something").unwrap();
    let by_alias = manager.command("sm").unwrap();
    assert!(Arc::ptr_eq(&by_name, &by_alias));

    assert!(manager.execute(&console(), "sm 1 1 1 x").is_executed());
    assert!(manager.execute(&console(), "something 1 1 1 x").is_executed());
    let lines = lines.lock();
    assert!(lines[0].starts_with("console ran sm:"));
    assert!(lines[1].starts_with("console ran something:"));
}

proptest! {
    #[test]
    fn every_label_reaches_the_same_body(
        aliases in prop::collection::hash_set("[a-z]{1,6}", 1..6),
        argument in -1000i64..1000,
    ) {
        let manager = CommandManager::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let command = manager
            .create_command("main")
            .with_aliases(aliases.iter().filter(|alias| *alias != "main").cloned())
            .with_argument(manager.argument(TypeDesc::Int).unwrap().build().unwrap())
            .with_executor(move |ctx| {
                sink.lock().push((ctx.alias.to_string(), ctx.args.int(0)));
                Ok(())
            })
            .build()
            .unwrap();
        manager.register_command(command).unwrap();

        for label in &aliases {
            let outcome = manager.execute(&console(), &format!("{label} {argument}"));
            prop_assert!(outcome.is_executed());
        }
        let seen = seen.lock();
        prop_assert_eq!(seen.len(), aliases.len());
        for (label, (alias, value)) in aliases.iter().zip(seen.iter()) {
            prop_assert_eq!(label, alias);
            prop_assert_eq!(*value, Some(argument));
        }
    }
}

#[test]
fn dispatch_is_deterministic() {
    let manager = CommandManager::new();
    let lines = with_demo(&manager);
    let line = "something 12.23 1,2,3 1.2,1.3 'more words'";

    let first = manager.execute(&console(), line);
    let second = manager.execute(&console(), line);
    assert_eq!(first, second);
    let lines = lines.lock();
    assert_eq!(lines[0], lines[1]);
}

#[test]
fn leading_whitespace_and_exact_labels() {
    let manager = CommandManager::new();
    let lines = with_demo(&manager);

    assert!(manager.execute(&console(), "   echo hi").is_executed());
    assert_eq!(manager.execute(&console(), "ECHO hi"), DispatchOutcome::Unknown);
    assert_eq!(manager.execute(&console(), ""), DispatchOutcome::Unknown);
    assert_eq!(manager.execute(&console(), "   "), DispatchOutcome::Unknown);
    assert_eq!(lines.lock().as_slice(), ["hi"]);
}

#[test]
fn labels_and_commands_are_listed() {
    let manager = CommandManager::new();
    let _ = with_demo(&manager);

    let labels: Vec<String> = manager.labels().iter().map(ToString::to_string).collect();
    assert!(labels.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(labels.len(), 11);

    let names: Vec<String> = manager
        .commands()
        .iter()
        .map(|command| command.name().to_string())
        .collect();
    assert_eq!(
        names,
        ["echo", "help", "scale", "something", "tag", "tp", "whoami"]
    );
}

// =============================================================================
// Registration policies
// =============================================================================

#[test]
fn last_registered_label_wins_by_default() {
    let manager = CommandManager::new();
    let first = counting(&manager, "first", &["go"]);
    let second = counting(&manager, "second", &["go"]);

    assert!(manager.execute(&console(), "go").is_executed());
    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);

    assert!(manager.execute(&console(), "first").is_executed());
    assert_eq!(first.load(Ordering::SeqCst), 1);
}

#[test]
fn keep_first_leaves_the_owner() {
    let manager = CommandManager::new().with_config(
        DispatchConfig::default().with_alias_collision(AliasCollisionPolicy::KeepFirst),
    );
    let first = counting(&manager, "first", &["go"]);
    let second = counting(&manager, "second", &["go"]);

    assert!(manager.execute(&console(), "go").is_executed());
    assert!(manager.execute(&console(), "second").is_executed());
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[test]
fn reject_registers_nothing() {
    let manager = CommandManager::new().with_config(DispatchConfig::strict());
    let _ = counting(&manager, "first", &["go"]);

    let command = manager
        .create_command("second")
        .with_alias("go")
        .with_argument(manager.argument(TypeDesc::Int).unwrap().build().unwrap())
        .with_executor(|_| Ok(()))
        .build()
        .unwrap();
    let err = manager.register_command(command).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AliasCollision { .. }));
    assert!(manager.command("second").is_none());
    assert_eq!(manager.command("go").unwrap().name(), "first");
}

// =============================================================================
// Unknown commands
// =============================================================================

#[test]
fn unknown_commands_are_ignored_by_default() {
    let (manager, reports) = recording(CommandManager::new());
    assert_eq!(manager.execute(&console(), "nope 1 2"), DispatchOutcome::Unknown);
    assert!(reports.lock().is_empty());
}

#[test]
fn unknown_commands_can_be_reported() {
    let (manager, reports) = recording(CommandManager::new().with_config(
        DispatchConfig::default().with_unknown_command(UnknownCommandPolicy::Report),
    ));
    let outcome = manager.execute(&console(), "nope 1 2");
    let DispatchOutcome::UnknownReported(report) = outcome else {
        panic!("expected a report, got {outcome:?}");
    };
    assert_eq!(report.alias.as_ref(), "nope");
    assert_eq!(report.kind, FailureKind::UnknownCommand);
    assert_eq!(reports.lock().as_slice(), [report]);
}
