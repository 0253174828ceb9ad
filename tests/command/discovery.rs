//! Integration tests for holder discovery

use std::sync::Arc;

use herald_command::{
    ActorKinds, CommandHolder, CommandMethod, Customizers, Discovery, Injectors, ParamDecl,
    RegisteredCommand, SENDER,
};
use herald_foundation::{ErrorKind, Result, TypeDesc};
use herald_parser::ParserRegistry;

struct Shop;

impl CommandHolder for Shop {
    fn holder_name(&self) -> &str {
        "Shop"
    }

    fn methods(&self) -> Vec<CommandMethod<Self>> {
        vec![
            CommandMethod::new("buy")
                .command()
                .alias("purchase")
                .param(ParamDecl::actor("buyer", TypeDesc::named(SENDER)))
                .param(ParamDecl::new("item", TypeDesc::Str))
                .param(ParamDecl::new("count", TypeDesc::Int))
                .bound(|_, _| Ok(())),
            CommandMethod::new("prices")
                .named("price-list")
                .param(ParamDecl::new("items", TypeDesc::array(TypeDesc::Str)))
                .bound(|_, _| Ok(())),
            CommandMethod::new("restock")
                .command()
                .param(ParamDecl::new("stock", TypeDesc::named("Inventory")))
                .bound(|_, _| Ok(())),
            CommandMethod::new("audit").command().unbound(|_| Ok(())),
            CommandMethod::new("close").command(),
            CommandMethod::new("internal").bound(|_, _| Ok(())),
            CommandMethod::new("haggle")
                .command()
                .param(ParamDecl::actor("who", TypeDesc::Int))
                .bound(|_, _| Ok(())),
        ]
    }
}

fn discover() -> Vec<(Arc<str>, Result<RegisteredCommand>)> {
    let parsers = ParserRegistry::new();
    let injectors = Injectors::new();
    let customizers = Customizers::new();
    let kinds = ActorKinds::new();
    Discovery {
        parsers: &parsers,
        injectors: &injectors,
        customizers: &customizers,
        kinds: &kinds,
    }
    .discover(&Arc::new(Shop))
}

fn outcome<'a>(
    results: &'a [(Arc<str>, Result<RegisteredCommand>)],
    method: &str,
) -> &'a Result<RegisteredCommand> {
    &results
        .iter()
        .find(|(name, _)| name.as_ref() == method)
        .unwrap()
        .1
}

fn error_kind<'a>(results: &'a [(Arc<str>, Result<RegisteredCommand>)], method: &str) -> &'a ErrorKind {
    &outcome(results, method).as_ref().err().unwrap().kind
}

#[test]
fn only_marked_methods_are_discovered() {
    let results = discover();
    let names: Vec<&str> = results.iter().map(|(name, _)| name.as_ref()).collect();
    assert_eq!(
        names,
        ["buy", "prices", "restock", "audit", "close", "haggle"]
    );
}

#[test]
fn arguments_follow_declaration_order() {
    let results = discover();
    let buy = outcome(&results, "buy").as_ref().unwrap();
    assert_eq!(buy.labels().map(|label| &**label).collect::<Vec<&str>>(), ["buy", "purchase"]);
    let types: Vec<&TypeDesc> = buy.arguments().iter().map(|a| a.ty()).collect();
    assert_eq!(types, [&TypeDesc::Str, &TypeDesc::Int]);
    assert_eq!(buy.special().slots()[0].index, 0);
    assert_eq!(buy.arity(), 3);
}

#[test]
fn explicit_names_replace_method_names() {
    let results = discover();
    assert_eq!(outcome(&results, "prices").as_ref().unwrap().name(), "price-list");
}

#[test]
fn configuration_errors_are_per_method() {
    let results = discover();
    assert!(matches!(error_kind(&results, "restock"), ErrorKind::MissingParser(_)));
    assert!(matches!(error_kind(&results, "audit"), ErrorKind::UnboundMethod(_)));
    assert!(matches!(error_kind(&results, "close"), ErrorKind::MissingExecutor(_)));
    assert!(matches!(
        error_kind(&results, "haggle"),
        ErrorKind::InvalidSpecialArgument { .. }
    ));
    assert!(outcome(&results, "buy").is_ok());
}

#[test]
fn errors_name_holder_method_and_parameter() {
    let results = discover();
    let err = outcome(&results, "restock").as_ref().err().unwrap();
    let message = err.to_string();
    assert!(message.contains("Shop::restock"), "{message}");
    assert!(message.contains("parameter #0"), "{message}");
    assert!(message.contains("Inventory"), "{message}");
}

#[test]
fn holders_are_bound_once() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        hits: AtomicUsize,
    }

    impl CommandHolder for Counter {
        fn holder_name(&self) -> &str {
            "Counter"
        }

        fn methods(&self) -> Vec<CommandMethod<Self>> {
            vec![CommandMethod::new("bump").command().bound(|this: &Self, _| {
                this.hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })]
        }
    }

    let holder = Arc::new(Counter {
        hits: AtomicUsize::new(0),
    });
    let parsers = ParserRegistry::new();
    let injectors = Injectors::new();
    let customizers = Customizers::new();
    let kinds = ActorKinds::new();
    let discovery = Discovery {
        parsers: &parsers,
        injectors: &injectors,
        customizers: &customizers,
        kinds: &kinds,
    };
    let (_, command) = discovery.discover(&holder).pop().unwrap();
    let command = command.unwrap();

    let actor = crate::console();
    for _ in 0..3 {
        assert!(command.run(&actor, "bump", "", &kinds).is_executed());
    }
    assert_eq!(holder.hits.load(Ordering::SeqCst), 3);
}
