//! Integration tests for argument customizers and the parsing pipeline

use std::sync::Arc;

use herald_command::{
    ArgumentBuilder, CommandBuilder, CommandHolder, CommandManager, CommandMethod, Customizers,
    DispatchOutcome, FailureKind, ParamAttr, ParamDecl, parse_arguments,
};
use herald_foundation::{Error, ErrorKind, TypeDesc, Value};
use herald_parser::{
    EndPredicate, FloatConstraints, IntConstraints, IntegerParser, ParamSite, ParseErrorKind,
    ParseFailure, ParserCursor, ParserRegistry, Strategy,
};
use parking_lot::Mutex;

fn argument(param: &ParamDecl) -> herald_foundation::Result<herald_command::Argument> {
    let registry = ParserRegistry::new();
    let customizers = Customizers::new();
    let mut builder = ArgumentBuilder::new(param.ty.clone());
    if let Some(strategy) = registry.resolve(&param.ty) {
        builder = builder.with_strategy(strategy);
    }
    customizers.apply_all(&mut builder, param)?;
    builder.build()
}

// =============================================================================
// Customizers
// =============================================================================

#[test]
fn float_attribute_restricts_range() {
    let param = ParamDecl::new("speed", TypeDesc::Float)
        .with_attr(ParamAttr::FloatArg(FloatConstraints::new().with_range(0.0, 2.0)));
    let args = [argument(&param).unwrap()];
    assert_eq!(parse_arguments(&args, "1.5").unwrap(), [Value::Float(1.5)]);
    let failure = parse_arguments(&args, "2.5").unwrap_err();
    assert_eq!(failure.failure.kind, ParseErrorKind::OutOfRange);
}

#[test]
fn float_attribute_applies_to_float_arrays() {
    let param = ParamDecl::new("weights", TypeDesc::array(TypeDesc::Float))
        .with_attr(ParamAttr::FloatArg(FloatConstraints::new().with_range(0.0, 1.0)));
    let args = [argument(&param).unwrap()];
    assert!(parse_arguments(&args, "0.1,0.9").is_ok());
    assert_eq!(
        parse_arguments(&args, "0.1,1.9").unwrap_err().failure.kind,
        ParseErrorKind::OutOfRange
    );
}

#[test]
fn float_attribute_on_other_types_is_a_configuration_error() {
    let param = ParamDecl::new("name", TypeDesc::Str)
        .with_attr(ParamAttr::FloatArg(FloatConstraints::new()));
    let err = argument(&param).err().unwrap();
    assert!(matches!(err.kind, ErrorKind::InvalidAttribute { .. }));
}

#[test]
fn int_attribute_wraps_the_resolved_strategy() {
    let param = ParamDecl::new("slots", TypeDesc::array(TypeDesc::Int))
        .with_attr(ParamAttr::IntArg(IntConstraints::new().with_range(1, 9)));
    let args = [argument(&param).unwrap()];
    assert!(parse_arguments(&args, "1,5,9").is_ok());
    assert_eq!(
        parse_arguments(&args, "1,10").unwrap_err().failure.kind,
        ParseErrorKind::OutOfRange
    );
}

#[test]
fn greedy_string_swallows_remaining_arguments() {
    let count = argument(&ParamDecl::new("count", TypeDesc::Int)).unwrap();
    let text = argument(&ParamDecl::new("text", TypeDesc::Str).with_attr(ParamAttr::Greedy)).unwrap();
    let values = parse_arguments(&[count, text], "3 a b  c ").unwrap();
    assert_eq!(values, [Value::Int(3), Value::from("a b  c")]);
}

#[test]
fn custom_customizer_keys() {
    let customizers = Customizers::new();
    customizers.register(
        "hex",
        |builder: &mut ArgumentBuilder, _: &ParamAttr, _: &ParamDecl| -> Result<(), Error> {
            builder.set_strategy(Arc::new(IntegerParser::HEX));
            Ok(())
        },
    );
    let param = ParamDecl::new("mask", TypeDesc::Int).with_attr(ParamAttr::Custom {
        key: "hex".into(),
        value: "".into(),
    });
    let mut builder = ArgumentBuilder::new(TypeDesc::Int);
    customizers.apply_all(&mut builder, &param).unwrap();
    let args = [builder.build().unwrap()];
    assert_eq!(parse_arguments(&args, "ff").unwrap(), [Value::Int(255)]);

    let ignored = ParamDecl::new("n", TypeDesc::Int).with_attr(ParamAttr::Custom {
        key: "unknown".into(),
        value: "".into(),
    });
    assert!(argument(&ignored).is_ok());
}

#[test]
fn explicit_end_predicate_overrides_whitespace() {
    let registry = ParserRegistry::new();
    let words = ArgumentBuilder::new(TypeDesc::Str)
        .with_strategy(registry.resolve(&TypeDesc::Str).unwrap())
        .with_end(EndPredicate::any_of(&[';']))
        .build()
        .unwrap();
    let count = ArgumentBuilder::new(TypeDesc::Str)
        .with_strategy(registry.resolve(&TypeDesc::Str).unwrap())
        .build()
        .unwrap();
    let values = parse_arguments(&[words, count], "two words;rest").unwrap();
    assert_eq!(values, [Value::from("two words"), Value::from(";rest")]);
}

struct Gauges {
    shares: Mutex<Vec<f64>>,
}

impl CommandHolder for Gauges {
    fn holder_name(&self) -> &str {
        "Gauges"
    }

    fn methods(&self) -> Vec<CommandMethod<Self>> {
        let unit = || ParamAttr::FloatArg(FloatConstraints::new().with_range(0.0, 1.0));
        vec![
            CommandMethod::new("pct")
                .command()
                .param(ParamDecl::new("share", TypeDesc::Float).with_attr(unit()))
                .bound(|this: &Self, ctx| {
                    this.shares.lock().push(ctx.args.float(0).ok_or("no share")?);
                    Ok(())
                }),
            CommandMethod::new("spread")
                .command()
                .param(
                    ParamDecl::new("counts", TypeDesc::collection(TypeDesc::Int))
                        .with_attr(ParamAttr::IntArg(IntConstraints::new().with_range(0, 9))),
                )
                .param(ParamDecl::new("weights", TypeDesc::collection(TypeDesc::Float)).with_attr(unit()))
                .bound(|_: &Self, _| Ok(())),
        ]
    }
}

fn percent() -> Strategy {
    Arc::new(|cursor: &mut ParserCursor<'_>, end: &EndPredicate| {
        let start = cursor.position();
        cursor
            .take_until(end)
            .strip_suffix('%')
            .and_then(|digits| digits.parse::<f64>().ok())
            .map(|n| Value::Float(n / 100.0))
            .ok_or(ParseFailure {
                kind: ParseErrorKind::InvalidNumber,
                position: start,
            })
    })
}

#[test]
fn float_attribute_keeps_site_strategies_and_collections() {
    let manager = CommandManager::new();
    manager.parsers().register_site_resolver(
        |site: &ParamSite, ty: &TypeDesc, _: &ParserRegistry| -> Option<Strategy> {
            (site.method.as_ref() == "pct" && *ty == TypeDesc::Float).then(percent)
        },
    );
    let gauges = Arc::new(Gauges {
        shares: Mutex::new(Vec::new()),
    });
    let report = manager.register_shared_holder(&gauges);
    assert!(report.is_complete(), "{:?}", report.failed);
    assert_eq!(report.registered.len(), 2);

    assert!(manager.execute(&crate::console(), "pct 50%").is_executed());
    assert_eq!(*gauges.shares.lock(), [0.5]);
    let outcome = manager.execute(&crate::console(), "pct 150%");
    let DispatchOutcome::ParseFailed(report) = outcome else {
        panic!("expected a parse failure, got {outcome:?}");
    };
    assert_eq!(report.kind, FailureKind::Parse(ParseErrorKind::OutOfRange));

    assert!(manager.execute(&crate::console(), "spread 1,9 0.25,0.75").is_executed());
    let outcome = manager.execute(&crate::console(), "spread 1,9 0.25,1.5");
    let DispatchOutcome::ParseFailed(report) = outcome else {
        panic!("expected a parse failure, got {outcome:?}");
    };
    assert_eq!(report.argument, Some(1));
    assert_eq!(report.kind, FailureKind::Parse(ParseErrorKind::OutOfRange));
}

// =============================================================================
// Pipeline
// =============================================================================

#[test]
fn full_signature_parses() {
    let registry = ParserRegistry::new();
    let args: Vec<_> = [
        TypeDesc::Float,
        TypeDesc::array(TypeDesc::Int),
        TypeDesc::collection(TypeDesc::Float),
        TypeDesc::Str,
    ]
    .into_iter()
    .map(|ty| {
        let strategy = registry.resolve(&ty).unwrap();
        ArgumentBuilder::new(ty).with_strategy(strategy).build().unwrap()
    })
    .collect();

    let values = parse_arguments(&args, "12.23 1,2,3 1.2,1.3 'more words'").unwrap();
    assert_eq!(values[0], Value::Float(12.23));
    assert_eq!(values[1].as_int_array(), Some(&[1, 2, 3][..]));
    let Value::List(floats) = &values[2] else {
        panic!("expected a list, got {:?}", values[2]);
    };
    assert_eq!(floats.iter().cloned().collect::<Vec<_>>(), [Value::Float(1.2), Value::Float(1.3)]);
    assert_eq!(values[3].as_str(), Some("more words"));
}

#[test]
fn first_argument_failure_skips_the_body() {
    let registry = ParserRegistry::new();
    let int = || {
        ArgumentBuilder::new(TypeDesc::Int)
            .with_strategy(registry.resolve(&TypeDesc::Int).unwrap())
            .build()
            .unwrap()
    };
    let called = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let flag = Arc::clone(&called);
    let command = CommandBuilder::new("sum")
        .with_argument(int())
        .with_argument(int())
        .with_executor(move |_| {
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        })
        .build()
        .unwrap();

    let kinds = herald_command::ActorKinds::new();
    let outcome = command.run(&crate::console(), "sum", "one 2", &kinds);
    let DispatchOutcome::ParseFailed(report) = outcome else {
        panic!("expected a parse failure, got {outcome:?}");
    };
    assert_eq!(report.argument, Some(0));
    assert_eq!(report.kind, FailureKind::Parse(ParseErrorKind::InvalidInteger));
    assert!(!called.load(std::sync::atomic::Ordering::SeqCst));
}
