//! Runtime configuration and demo command tests

use herald_command::{
    AliasCollisionPolicy, CommandManager, DispatchConfig, DispatchOutcome, UnknownCommandPolicy,
};
use herald_foundation::ErrorKind;
use herald_runtime::{DemoCommands, RuntimeConfig, RuntimeError};

use crate::{console, player, recording, with_demo};

#[test]
fn toml_config_drives_the_dispatcher() {
    let config = RuntimeConfig::from_toml_str(
        r#"
        prompt = "> "

        [dispatch]
        unknown_command = "ignore"
        alias_collision = "reject"
        "#,
    )
    .unwrap();
    assert_eq!(
        config.dispatch,
        DispatchConfig {
            unknown_command: UnknownCommandPolicy::Ignore,
            alias_collision: AliasCollisionPolicy::Reject,
        }
    );
    assert_eq!(config.history_size, RuntimeConfig::default().history_size);

    let (manager, reports) = recording(CommandManager::new().with_config(config.dispatch));
    let _ = with_demo(&manager);
    assert_eq!(manager.execute(&console(), "nope"), DispatchOutcome::Unknown);
    assert!(reports.lock().is_empty());

    let again = manager.register_holder(DemoCommands::with_output(std::sync::Arc::new(|_: &str| {})));
    assert!(again.registered.is_empty());
    assert_eq!(again.failed.len(), 7);
    assert!(
        again
            .failed
            .iter()
            .all(|(_, err)| matches!(err.kind, ErrorKind::AliasCollision { .. }))
    );
}

#[test]
fn runtime_defaults_report_unknown_commands() {
    let config = RuntimeConfig::from_toml_str("").unwrap();
    assert_eq!(config, RuntimeConfig::default());

    let (manager, reports) = recording(CommandManager::new().with_config(config.dispatch));
    let outcome = manager.execute(&console(), "nope");
    assert!(matches!(outcome, DispatchOutcome::UnknownReported(_)));
    assert_eq!(reports.lock().len(), 1);
}

#[test]
fn bad_policy_names_are_rejected() {
    let err = RuntimeConfig::from_toml_str("[dispatch]\nunknown_command = \"shout\"").unwrap_err();
    assert!(matches!(err, RuntimeError::ParseConfig(_)));
}

#[test]
fn demo_session() {
    let manager = CommandManager::new();
    let lines = with_demo(&manager);
    let alex = player("alex");

    for (actor, line) in [
        (console(), "something 12.23 1,2,3 1.2,1.3 'more words'"),
        (console(), "say hello   world"),
        (alex.clone(), "whoami"),
        (alex.clone(), "tp 10 64 -10"),
        (alex, "tag {hp: 20, level = 3}"),
    ] {
        let outcome = manager.execute(&actor, line);
        assert!(outcome.is_executed(), "{line}: {outcome:?}");
    }

    assert_eq!(
        lines.lock().as_slice(),
        [
            "console ran something: value=12.23 ints=[1, 2, 3] floats=[1.2, 1.3] text=\"more words\"",
            "hello   world",
            "You are alex (Player)",
            "Teleported alex to 10, 64, -10",
            "Tagged 2 entries: hp=20 level=3",
        ]
    );
}
