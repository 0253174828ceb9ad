//! Integration tests for the parser registry

use std::sync::Arc;

use herald_foundation::{ErrorKind, TypeDesc, Value};
use herald_parser::{
    EndPredicate, IntegerParser, ParamSite, ParserCursor, ParserRegistry, Strategy,
    check_and_parse,
};

fn parse(strategy: &Strategy, input: &str) -> Option<Value> {
    let mut cursor = ParserCursor::new(input);
    check_and_parse(strategy.as_ref(), &mut cursor, &EndPredicate::whitespace()).ok()
}

// =============================================================================
// Built-in Resolution
// =============================================================================

#[test]
fn scalars_resolve_by_default() {
    let registry = ParserRegistry::new();
    for ty in [TypeDesc::Int, TypeDesc::Float, TypeDesc::Bool, TypeDesc::Str] {
        assert!(registry.resolve(&ty).is_some(), "{ty}");
    }
}

#[test]
fn int_array_parses_comma_list() {
    let registry = ParserRegistry::new();
    let strategy = registry.resolve(&TypeDesc::array(TypeDesc::Int)).unwrap();
    assert_eq!(
        parse(&strategy, "1,2,3"),
        Some(Value::IntArray(vec![1, 2, 3].into()))
    );
}

#[test]
fn float_collection_parses_in_order() {
    let registry = ParserRegistry::new();
    let strategy = registry
        .resolve(&TypeDesc::collection(TypeDesc::Float))
        .unwrap();
    assert_eq!(parse(&strategy, "1.2,1.3"), Some(Value::from(vec![1.2, 1.3])));
}

#[test]
fn bounded_wildcard_resolves_like_its_bound() {
    let registry = ParserRegistry::new();
    let bounded = registry
        .resolve(&TypeDesc::collection(TypeDesc::extends(TypeDesc::Float)))
        .unwrap();
    assert_eq!(parse(&bounded, "0.5,2"), Some(Value::from(vec![0.5, 2.0])));
}

#[test]
fn bare_wildcard_and_unknown_types_do_not_resolve() {
    let registry = ParserRegistry::new();
    assert!(registry.resolve(&TypeDesc::collection(TypeDesc::wildcard())).is_none());
    assert!(registry.resolve(&TypeDesc::named("World")).is_none());
    assert!(registry
        .resolve(&TypeDesc::array(TypeDesc::named("World")))
        .is_none());

    let err = registry.require(&TypeDesc::named("World")).err().unwrap();
    assert!(matches!(err.kind, ErrorKind::MissingParser(_)));
}

#[test]
fn maps_resolve_only_for_the_map_container() {
    let registry = ParserRegistry::new();
    assert!(registry
        .resolve(&TypeDesc::map(TypeDesc::Str, TypeDesc::Int))
        .is_some());
    assert!(registry
        .resolve(&TypeDesc::generic("Pair", vec![TypeDesc::Str, TypeDesc::Int]))
        .is_none());
}

// =============================================================================
// Registration and Caching
// =============================================================================

#[test]
fn empty_registry_has_no_scalars() {
    let registry = ParserRegistry::empty();
    assert!(registry.resolve(&TypeDesc::Int).is_none());
    assert!(registry.resolve(&TypeDesc::array(TypeDesc::Int)).is_none());
}

#[test]
fn user_int_strategy_drives_int_arrays() {
    let registry = ParserRegistry::empty();
    registry.register_exact(TypeDesc::Int, Arc::new(IntegerParser::DECIMAL));
    let decimal = registry.resolve(&TypeDesc::Int).unwrap();
    assert_eq!(parse(&decimal, "ff"), None);
    assert!(registry.cached_types() > 0);

    let hex = ParserRegistry::empty();
    hex.register_exact(TypeDesc::Int, Arc::new(IntegerParser::HEX));
    let ints = hex.resolve(&TypeDesc::array(TypeDesc::Int)).unwrap();
    assert_eq!(
        parse(&ints, "ff,0x10"),
        Some(Value::IntArray(vec![255, 16].into()))
    );
}

#[test]
fn first_exact_registration_wins() {
    let registry = ParserRegistry::empty();
    registry.register_exact(TypeDesc::Int, Arc::new(IntegerParser::HEX));
    registry.register_exact(TypeDesc::Int, Arc::new(IntegerParser::DECIMAL));
    let strategy = registry.resolve(&TypeDesc::Int).unwrap();
    assert_eq!(parse(&strategy, "10"), Some(Value::Int(16)));
}

#[test]
fn clear_cache_drops_resolutions() {
    let registry = ParserRegistry::new();
    let _ = registry.resolve(&TypeDesc::array(TypeDesc::Float));
    assert!(registry.cached_types() > 0);
    registry.clear_cache();
    assert_eq!(registry.cached_types(), 0);
}

#[test]
fn resolution_is_deterministic() {
    let registry = ParserRegistry::new();
    let ty = TypeDesc::array(TypeDesc::Int);
    let cold = registry.resolve(&ty).unwrap();
    let warm = registry.resolve(&ty).unwrap();
    assert!(Arc::ptr_eq(&cold, &warm));
    let fresh = ParserRegistry::new().resolve(&ty).unwrap();
    for input in ["1,2,3", "-4", "x", "1,,2"] {
        assert_eq!(parse(&cold, input), parse(&fresh, input), "{input}");
    }
}

#[test]
fn site_resolvers_take_precedence() {
    let registry = ParserRegistry::new();
    let target = ParamSite::new("Admin", "give", 1);
    registry.register_site_resolver(
        move |site: &ParamSite, ty: &TypeDesc, _: &ParserRegistry| -> Option<Strategy> {
            (*site == target && *ty == TypeDesc::Int)
                .then(|| Arc::new(IntegerParser::HEX) as Strategy)
        },
    );

    let at_site = registry
        .resolve_site(&ParamSite::new("Admin", "give", 1), &TypeDesc::Int)
        .unwrap();
    assert_eq!(parse(&at_site, "ff"), Some(Value::Int(255)));

    let elsewhere = registry
        .resolve_site(&ParamSite::new("Admin", "give", 2), &TypeDesc::Int)
        .unwrap();
    assert_eq!(parse(&elsewhere, "ff"), None);
}

#[test]
fn concurrent_resolution_agrees() {
    let registry = ParserRegistry::new();
    let ty = TypeDesc::map(TypeDesc::Str, TypeDesc::Int);
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let strategy = registry.resolve(&ty).unwrap();
                let value = parse(&strategy, "{a: 1, b = 2}").unwrap();
                assert_eq!(value.as_map().map(|m| m.len()), Some(2));
            });
        }
    });
}
