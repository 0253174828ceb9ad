//! Integration tests for special-argument injection

use std::any::Any;
use std::sync::Arc;

use herald_command::{
    Actor, ActorHandle, ActorKinds, CallArg, CommandHolder, CommandManager, CommandMethod,
    DispatchOutcome, FailureKind, InjectionContext, InjectionMismatch, Injectors, PLAYER,
    ParamAttr, ParamDecl, SENDER, SlotInjector, SpecialArgumentTable,
};
use herald_foundation::{ErrorKind, Result, TypeDesc, Value};
use parking_lot::Mutex;

use crate::{console, player};

// =============================================================================
// Actor Kinds
// =============================================================================

#[test]
fn default_hierarchy() {
    let kinds = ActorKinds::new();
    let sender = TypeDesc::named(SENDER);
    let player = TypeDesc::named(PLAYER);
    assert!(kinds.is_assignable(&sender, &player));
    assert!(!kinds.is_assignable(&player, &sender));
    assert!(!kinds.is_assignable(&player, &TypeDesc::named("Console")));
    assert!(!kinds.is_actor_kind(&TypeDesc::Str));
}

#[test]
fn kinds_may_have_several_parents() {
    let kinds = ActorKinds::new();
    let moderator = TypeDesc::named("Moderator");
    let operator = TypeDesc::named("Operator");
    let admin = TypeDesc::named("Admin");
    kinds.register(moderator.clone(), &[TypeDesc::named(PLAYER)]);
    kinds.register(operator.clone(), &[]);
    kinds.register(admin.clone(), &[moderator.clone(), operator.clone()]);

    assert!(kinds.is_assignable(&TypeDesc::named(PLAYER), &admin));
    assert!(kinds.is_assignable(&operator, &admin));
    assert!(kinds.is_assignable(&TypeDesc::named(SENDER), &operator));
    assert!(!kinds.is_assignable(&moderator, &operator));
}

// =============================================================================
// Slot Tables
// =============================================================================

#[test]
fn single_actor_slot_per_command() {
    let params = [
        ParamDecl::actor("a", TypeDesc::named(SENDER)),
        ParamDecl::new("x", TypeDesc::Int),
        ParamDecl::actor("b", TypeDesc::named(PLAYER)),
    ];
    let err = SpecialArgumentTable::build(&params, &Injectors::new(), &ActorKinds::new()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateSpecialArgument(_)));
    assert_eq!(err.context.unwrap().parameter, Some(2));
}

#[test]
fn alias_slots_must_be_strings() {
    let params = [ParamDecl::new("label", TypeDesc::Int).with_attr(ParamAttr::Alias)];
    let err = SpecialArgumentTable::build(&params, &Injectors::new(), &ActorKinds::new()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidSpecialArgument { .. }));
}

#[test]
fn plain_parameters_are_not_special() {
    let params = [ParamDecl::new("who", TypeDesc::named(PLAYER))];
    let table = SpecialArgumentTable::build(&params, &Injectors::new(), &ActorKinds::new()).unwrap();
    assert!(table.is_empty());
}

// =============================================================================
// Custom Injectors
// =============================================================================

/// Injects the command's primary name into `Custom { key: "command" }` strings.
struct CommandNameInjector;

impl SlotInjector for CommandNameInjector {
    fn name(&self) -> &str {
        "command"
    }

    fn claims(&self, param: &ParamDecl, _kinds: &ActorKinds) -> Result<bool> {
        Ok(param.has_attr("command") && param.ty == TypeDesc::Str)
    }

    fn provide(
        &self,
        _slot: usize,
        _declared: &TypeDesc,
        ctx: &InjectionContext<'_>,
    ) -> std::result::Result<CallArg, InjectionMismatch> {
        Ok(CallArg::Value(Value::from(ctx.command)))
    }
}

struct Holder {
    seen: Mutex<Vec<String>>,
}

impl CommandHolder for Holder {
    fn holder_name(&self) -> &str {
        "Holder"
    }

    fn methods(&self) -> Vec<CommandMethod<Self>> {
        vec![
            CommandMethod::new("describe")
                .command()
                .alias("desc")
                .param(ParamDecl::new("count", TypeDesc::Int))
                .param(ParamDecl::new("label", TypeDesc::Str).with_attr(ParamAttr::Alias))
                .param(
                    ParamDecl::new("name", TypeDesc::Str).with_attr(ParamAttr::Custom {
                        key: "command".into(),
                        value: String::new().into(),
                    }),
                )
                .param(ParamDecl::actor("sender", TypeDesc::named(SENDER)))
                .bound(|this: &Self, ctx| {
                    let sender = ctx.args.actor(3).ok_or("no sender")?;
                    this.seen.lock().push(format!(
                        "{} {} {} {}",
                        ctx.args.int(0).ok_or("no count")?,
                        ctx.args.str(1).ok_or("no label")?,
                        ctx.args.str(2).ok_or("no name")?,
                        sender.name(),
                    ));
                    Ok(())
                }),
            CommandMethod::new("kick")
                .command()
                .param(ParamDecl::actor("player", TypeDesc::named(PLAYER)))
                .param(ParamDecl::new("target", TypeDesc::Str))
                .bound(|this: &Self, ctx| {
                    this.seen.lock().push(format!("kick {}", ctx.args.str(1).unwrap_or_default()));
                    Ok(())
                }),
        ]
    }
}

fn manager_with_holder() -> (CommandManager, Arc<Holder>) {
    let manager = CommandManager::new();
    manager.injectors().prepend(CommandNameInjector);
    let holder = Arc::new(Holder {
        seen: Mutex::new(Vec::new()),
    });
    assert!(manager.register_shared_holder(&holder).is_complete());
    (manager, holder)
}

#[test]
fn injected_and_parsed_values_keep_declaration_order() {
    let (manager, holder) = manager_with_holder();
    assert!(manager.execute(&console(), "desc 7").is_executed());
    assert_eq!(holder.seen.lock().as_slice(), ["7 desc describe console"]);
}

#[test]
fn capability_mismatch_blocks_invocation() {
    let (manager, holder) = manager_with_holder();
    let outcome = manager.execute(&console(), "kick steve");
    let DispatchOutcome::InjectionMismatch(report) = outcome else {
        panic!("expected an injection mismatch, got {outcome:?}");
    };
    assert_eq!(
        report.kind,
        FailureKind::InjectionMismatch {
            slot: 0,
            expected: TypeDesc::named(PLAYER),
            actual: TypeDesc::named("Console"),
        }
    );
    assert!(holder.seen.lock().is_empty());

    assert!(manager.execute(&player("alex"), "kick steve").is_executed());
    assert_eq!(holder.seen.lock().as_slice(), ["kick steve"]);
}

#[test]
fn subkinds_satisfy_their_parents() {
    struct Admin;

    impl Actor for Admin {
        fn name(&self) -> &str {
            "root"
        }
        fn kind(&self) -> TypeDesc {
            TypeDesc::named("Admin")
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    let (manager, holder) = manager_with_holder();
    manager
        .kinds()
        .register(TypeDesc::named("Admin"), &[TypeDesc::named(PLAYER)]);
    let admin: ActorHandle = Arc::new(Admin);
    assert!(manager.execute(&admin, "kick steve").is_executed());
    assert_eq!(holder.seen.lock().len(), 1);
}
