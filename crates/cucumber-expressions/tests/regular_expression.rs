//! Regular expressions and the expression factory.

use cucumber_expressions::{
    AnyExpression, ErrorKind, Expression, ExpressionFactory, ParameterType, ParameterTypeRegistry,
    RegularExpression,
};
use regex::Regex;
use rstest::{fixture, rstest};

#[fixture]
fn registry() -> ParameterTypeRegistry {
    ParameterTypeRegistry::new()
}

fn regular<'r>(pattern: &str, registry: &'r ParameterTypeRegistry) -> RegularExpression<'r> {
    let regex =
        Regex::new(pattern).unwrap_or_else(|err| panic!("`{pattern}` should compile: {err}"));
    RegularExpression::new(regex, registry)
        .unwrap_or_else(|err| panic!("`{pattern}` should wrap: {err}"))
}

fn define(registry: &mut ParameterTypeRegistry, parameter_type: ParameterType) {
    let name = parameter_type.name().to_string();
    registry
        .define_parameter_type(parameter_type)
        .unwrap_or_else(|err| panic!("`{name}` should register: {err}"));
}

fn text_type(name: &str, regexp: &str) -> ParameterType {
    ParameterType::text(name, [regexp])
        .unwrap_or_else(|err| panic!("`{name}` should be valid: {err}"))
}

#[rstest]
fn converts_registered_groups(registry: ParameterTypeRegistry) {
    let expression = regular(r"^I have (\d+) cukes? in my (\w+) now$", &registry);
    let args = expression
        .match_text("I have 7 cukes in my belly now")
        .unwrap_or_else(|err| panic!("match should succeed: {err}"))
        .unwrap_or_else(|| panic!("text should match"));
    let names: Vec<_> = args.iter().map(|a| a.parameter_type().name()).collect();
    assert_eq!(names, ["int", ""]);
    assert!(matches!(
        args.first().map(|a| a.value::<i32>()),
        Some(Ok(Some(7)))
    ));
    let belly = args.get(1).map(|a| a.value::<String>());
    assert!(matches!(belly, Some(Ok(Some(ref v))) if v == "belly"));
}

#[rstest]
#[case(r"^(-?\d+)$", "-22", -22)]
#[case(r"^(\d+)$", "22", 22)]
fn transforms_integers(
    registry: ParameterTypeRegistry,
    #[case] pattern: &str,
    #[case] text: &str,
    #[case] expected: i32,
) {
    let args = regular(pattern, &registry)
        .match_text(text)
        .unwrap_or_else(|err| panic!("match should succeed: {err}"))
        .unwrap_or_else(|| panic!("text should match"));
    let value = args.first().map(|a| a.value::<i32>());
    assert!(matches!(value, Some(Ok(Some(v))) if v == expected));
}

#[rstest]
fn leaves_unregistered_groups_as_text(registry: ParameterTypeRegistry) {
    let args = regular(r"^(\d\d)$", &registry)
        .match_text("22")
        .unwrap_or_else(|err| panic!("match should succeed: {err}"))
        .unwrap_or_else(|| panic!("text should match"));
    let value = args.first().map(|a| a.value::<String>());
    assert!(matches!(value, Some(Ok(Some(ref v))) if v == "22"));
}

#[rstest]
fn escaped_parentheses_are_not_groups(registry: ParameterTypeRegistry) {
    let args = regular(r"^Across the line\(s\)$", &registry)
        .match_text("Across the line(s)")
        .unwrap_or_else(|err| panic!("match should succeed: {err}"))
        .unwrap_or_else(|| panic!("text should match"));
    assert!(args.is_empty());
}

#[rstest]
fn returns_none_without_a_match(registry: ParameterTypeRegistry) {
    let result = regular(r"^(\d+) cukes$", &registry).match_text("many cukes");
    assert!(matches!(result, Ok(None)));
}

#[test]
fn ambiguous_types_are_reported_with_suggestions() {
    let mut registry = ParameterTypeRegistry::new();
    define(&mut registry, text_type("lower", "[a-z]+"));
    define(&mut registry, text_type("letters", "[a-z]+"));
    let expression = regular("^I have ([a-z]+) cukes$", &registry);
    let Err(err) = expression.match_text("I have many cukes") else {
        panic!("shared regexp should be ambiguous");
    };
    assert_eq!(err.kind(), ErrorKind::AmbiguousParameterType);
    let message = err.to_string();
    assert!(
        message.contains("Your Regular Expression /^I have ([a-z]+) cukes$/"),
        "{message}"
    );
    assert!(message.contains("{lower}\n   {letters}"), "{message}");
    assert!(message.contains("I {lower} {lower} {lower}"), "{message}");
}

#[test]
fn preferential_types_settle_ambiguity() {
    let mut registry = ParameterTypeRegistry::new();
    define(&mut registry, text_type("lower", "[a-z]+"));
    define(
        &mut registry,
        text_type("letters", "[a-z]+").with_prefer_for_regexp_match(true),
    );
    let args = regular("^I have ([a-z]+) cukes$", &registry)
        .match_text("I have many cukes")
        .unwrap_or_else(|err| panic!("match should succeed: {err}"))
        .unwrap_or_else(|| panic!("text should match"));
    assert_eq!(
        args.first().map(|a| a.parameter_type().name()),
        Some("letters")
    );
}

#[rstest]
#[case("I have {int} cukes", true)]
#[case("I have a cuke(s)", true)]
#[case("^I have (\\d+) cukes$", false)]
#[case("I have (\\d+) cukes$", false)]
#[case("/I have (\\d+) cukes/", false)]
fn factory_picks_the_expression_kind(
    registry: ParameterTypeRegistry,
    #[case] source: &str,
    #[case] cucumber: bool,
) {
    let expression = ExpressionFactory::new(&registry)
        .create_expression(source)
        .unwrap_or_else(|err| panic!("`{source}` should build: {err}"));
    assert_eq!(matches!(expression, AnyExpression::Cucumber(_)), cucumber);
}

#[rstest]
fn factory_wraps_compiled_regexes(registry: ParameterTypeRegistry) {
    let regex = Regex::new(r"^(\d+)$").unwrap_or_else(|err| panic!("regex should compile: {err}"));
    let expression = ExpressionFactory::new(&registry)
        .create_regular_expression(regex)
        .unwrap_or_else(|err| panic!("regex should wrap: {err}"));
    assert_eq!(expression.source(), r"^(\d+)$");
    let args = expression
        .match_text("12")
        .unwrap_or_else(|err| panic!("match should succeed: {err}"));
    assert_eq!(args.map(|a| a.len()), Some(1));
}

#[rstest]
fn factory_explains_anchored_cucumber_expressions(registry: ParameterTypeRegistry) {
    let Err(err) = ExpressionFactory::new(&registry).create_expression("^the {int}$") else {
        panic!("anchored Cucumber Expression should fail");
    };
    assert_eq!(err.kind(), ErrorKind::AnchorsInCucumberExpression);
}
