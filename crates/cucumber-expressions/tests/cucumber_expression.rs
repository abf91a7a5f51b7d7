//! End-to-end tests for parsing, compiling and matching Cucumber Expressions.

use cucumber_expressions::{
    CucumberExpression, ErrorKind, Expression, NodeType, NumberFormat, ParameterType,
    ParameterTypeRegistry, TokenType, parse, tokenize,
};
use rstest::{fixture, rstest};

#[fixture]
fn registry() -> ParameterTypeRegistry {
    ParameterTypeRegistry::new()
}

fn expression(source: &str, registry: &ParameterTypeRegistry) -> CucumberExpression {
    CucumberExpression::new(source, registry)
        .unwrap_or_else(|err| panic!("`{source}` should compile: {err}"))
}

fn match_values<T: 'static>(
    source: &str,
    text: &str,
    registry: &ParameterTypeRegistry,
) -> Option<Vec<Option<T>>> {
    let args = expression(source, registry)
        .match_text(text)
        .unwrap_or_else(|err| panic!("matching `{text}` should not fail: {err}"))?;
    Some(
        args.iter()
            .map(|arg| {
                arg.value::<T>()
                    .unwrap_or_else(|err| panic!("argument of `{text}` should transform: {err}"))
            })
            .collect(),
    )
}

#[test]
fn tokenizes_words_and_whitespace() {
    let tokens = tokenize("a b").unwrap_or_else(|err| panic!("should tokenize: {err}"));
    let inner: Vec<_> = tokens
        .iter()
        .filter(|t| !matches!(t.kind, TokenType::StartOfLine | TokenType::EndOfLine))
        .map(|t| (t.kind, t.text.as_str()))
        .collect();
    assert_eq!(
        inner,
        [
            (TokenType::Text, "a"),
            (TokenType::WhiteSpace, " "),
            (TokenType::Text, "b"),
        ]
    );
}

#[test]
fn tokenizing_nothing_yields_only_sentinels() {
    let tokens = tokenize("").unwrap_or_else(|err| panic!("should tokenize: {err}"));
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, [TokenType::StartOfLine, TokenType::EndOfLine]);
}

#[rstest]
#[case("three blind mice")]
#[case("three (blind) mice")]
#[case("three blind/sighted mice")]
#[case("")]
fn parameterless_expressions_round_trip(#[case] source: &str) {
    let ast = parse(source).unwrap_or_else(|err| panic!("`{source}` should parse: {err}"));
    assert_eq!(ast.kind, NodeType::Expression);
    assert_eq!(ast.text(), source);
}

#[test]
fn unterminated_optional_points_at_the_open_paren() {
    let Err(err) = parse("a (b") else {
        panic!("unterminated optional should fail");
    };
    assert_eq!(err.kind(), ErrorKind::MissingEndToken);
    let Some(diagnostic) = err.diagnostic() else {
        panic!("missing end token should carry a diagnostic");
    };
    assert_eq!(diagnostic.index, 2);
    assert_eq!(
        err.to_string(),
        "This Cucumber Expression has a problem at column 3:\n\n\
         a (b\n  ^\n\
         The '(' does not have a matching ')'.\n\
         If you did not intend to use optional text you can use '\\(' to escape the optional text"
    );
}

#[rstest]
fn matches_int(registry: ParameterTypeRegistry) {
    let values = match_values::<i32>("I have {int} cukes", "I have 2 cukes", &registry);
    assert_eq!(values, Some(vec![Some(2)]));
}

#[rstest]
fn matches_negative_int_and_rejects_words(registry: ParameterTypeRegistry) {
    assert_eq!(
        match_values::<i32>("{int}", "-22", &registry),
        Some(vec![Some(-22)])
    );
    assert_eq!(match_values::<i32>("{int}", "twenty", &registry), None);
}

#[rstest]
fn matches_quoted_strings(registry: ParameterTypeRegistry) {
    let values = match_values::<String>(
        "I like {string} and {string}",
        r#"I like "bangers" and 'mash'"#,
        &registry,
    );
    let expected = vec![Some("bangers".to_string()), Some("mash".to_string())];
    assert_eq!(values, Some(expected));
}

#[rstest]
#[case(r#"three "blind \"mice\"""#, r#"blind "mice""#)]
#[case(r"three 'blind \'mice\''", "blind 'mice'")]
#[case(r#"three """#, "")]
#[case(r#"three "it's""#, "it's")]
fn unescapes_quoted_strings(
    registry: ParameterTypeRegistry,
    #[case] text: &str,
    #[case] expected: &str,
) {
    let values = match_values::<String>("three {string}", text, &registry);
    assert_eq!(values, Some(vec![Some(expected.to_string())]));
}

#[rstest]
#[case("1", Some(1.0))]
#[case("-1", Some(-1.0))]
#[case("1.1", Some(1.1))]
#[case("-1.1", Some(-1.1))]
#[case(".1", Some(0.1))]
#[case("-.1", Some(-0.1))]
#[case("1E1", Some(10.0))]
#[case("-.1E-1", Some(-0.01))]
#[case("-.1E+2", Some(-10.0))]
#[case("0", Some(0.0))]
#[case("", None)]
#[case(".", None)]
#[case("-", None)]
#[case("E", None)]
#[case("1,", None)]
#[case("1.", None)]
#[case("1,000", None)]
#[case("1,000.1", None)]
#[case("E1", None)]
fn matches_float(
    registry: ParameterTypeRegistry,
    #[case] text: &str,
    #[case] expected: Option<f64>,
) {
    let values = match_values::<f64>("{double}", text, &registry);
    match expected {
        Some(expected) => {
            let Some([Some(value)]) = values.as_deref() else {
                panic!("`{text}` should match one float, got {values:?}");
            };
            assert_eq!(value.to_bits(), expected.to_bits(), "`{text}` gave {value}");
        }
        None => assert!(values.is_none(), "`{text}` should not match"),
    }
}

#[test]
fn matches_float_with_a_comma_separator() {
    let registry = ParameterTypeRegistry::with_number_format(NumberFormat::new(','));
    let values = match_values::<f32>("{float} kg", "1,5 kg", &registry);
    assert_eq!(values, Some(vec![Some(1.5)]));
    assert!(match_values::<f32>("{float} kg", "1.5 kg", &registry).is_none());
}

#[rstest]
fn matches_anonymous_parameters_as_text(registry: ParameterTypeRegistry) {
    let values = match_values::<String>("{}", "0.22", &registry);
    assert_eq!(values, Some(vec![Some("0.22".to_string())]));
}

#[rstest]
fn matches_words(registry: ParameterTypeRegistry) {
    let values = match_values::<String>("three {word} mice", "three blind mice", &registry);
    assert_eq!(values, Some(vec![Some("blind".to_string())]));
}

#[rstest]
#[case("I have 1 cuke", true)]
#[case("I have 2 cukes", true)]
#[case("I have cukes", false)]
fn matches_optional_text(
    registry: ParameterTypeRegistry,
    #[case] text: &str,
    #[case] matches: bool,
) {
    let values = match_values::<i32>("I have {int} cuke(s)", text, &registry);
    assert_eq!(values.is_some(), matches);
}

#[rstest]
#[case("three blind mice", true)]
#[case("three sighted mice", true)]
#[case("three deaf mice", false)]
fn matches_alternation(
    registry: ParameterTypeRegistry,
    #[case] text: &str,
    #[case] should_match: bool,
) {
    let values = match_values::<String>("three blind/sighted mice", text, &registry);
    assert_eq!(values.is_some(), should_match);
}

#[rstest]
fn escaped_syntax_matches_literally(registry: ParameterTypeRegistry) {
    let source = r"I have \{int} cukes \(maybe\) a\/b";
    let values = match_values::<String>(source, "I have {int} cukes (maybe) a/b", &registry);
    assert_eq!(values, Some(Vec::new()));
}

#[rstest]
fn regex_special_characters_are_literal(registry: ParameterTypeRegistry) {
    let values = match_values::<i32>(
        "I have {int} cukes.*?+^$[]|",
        "I have 3 cukes.*?+^$[]|",
        &registry,
    );
    assert_eq!(values, Some(vec![Some(3)]));
    assert!(match_values::<i32>("a.c", "abc", &registry).is_none());
}

#[rstest]
fn reports_undefined_parameter_types(registry: ParameterTypeRegistry) {
    let Err(err) = CucumberExpression::new("I have {unknown} cukes", &registry) else {
        panic!("undefined parameter type should fail");
    };
    assert_eq!(err.kind(), ErrorKind::UndefinedParameterType);
    assert_eq!(err.undefined_parameter_type_name(), Some("unknown"));
}

#[test]
fn custom_parameter_types_transform_the_whole_match() {
    #[derive(Debug, PartialEq)]
    struct Color(String);

    let mut registry = ParameterTypeRegistry::new();
    let regexps = ["red|blue|yellow", "dark (?:red|blue)"];
    let color = ParameterType::new("color", regexps, |values: &[Option<&str>]| {
        let name = values.first().copied().flatten().unwrap_or_default();
        Ok::<_, std::convert::Infallible>(Color(name.to_string()))
    })
    .unwrap_or_else(|err| panic!("color should be valid: {err}"));
    registry
        .define_parameter_type(color)
        .unwrap_or_else(|err| panic!("color should register: {err}"));

    let text = "I have a dark blue ball";
    let values = match_values::<Color>("I have a {color} ball", text, &registry);
    assert_eq!(values, Some(vec![Some(Color("dark blue".to_string()))]));
}

#[test]
fn custom_capture_groups_are_flattened() {
    let mut registry = ParameterTypeRegistry::new();
    let coordinate = ParameterType::new("coordinate", [r"(\d+),(\d+)"], |values: &[Option<&str>]| {
        let raw = values.first().copied().flatten().unwrap_or_default();
        let (x, y) = raw.split_once(',').unwrap_or_default();
        Ok::<_, std::num::ParseIntError>((x.parse::<u32>()?, y.parse::<u32>()?))
    })
    .unwrap_or_else(|err| panic!("coordinate should be valid: {err}"));
    registry
        .define_parameter_type(coordinate)
        .unwrap_or_else(|err| panic!("coordinate should register: {err}"));

    let values = match_values::<(u32, u32)>("move to {coordinate}", "move to 3,4", &registry);
    assert_eq!(values, Some(vec![Some((3, 4))]));
}

#[rstest]
fn typed_access_reports_wrong_types(registry: ParameterTypeRegistry) {
    let args = expression("{int}", &registry)
        .match_text("5")
        .unwrap_or_else(|err| panic!("match should succeed: {err}"))
        .unwrap_or_else(|| panic!("text should match"));
    let Some(arg) = args.first() else {
        panic!("expected one argument");
    };
    let Err(err) = arg.value::<i64>() else {
        panic!("int produces i32, not i64");
    };
    assert_eq!(err.kind(), ErrorKind::TransformTypeMismatch);
    assert!(matches!(arg.parse::<i64>(), Ok(Some(5))));
}

#[rstest]
fn transform_failures_surface_as_errors(registry: ParameterTypeRegistry) {
    let args = expression("{byte}", &registry)
        .match_text("300")
        .unwrap_or_else(|err| panic!("match should succeed: {err}"))
        .unwrap_or_else(|| panic!("text should match"));
    let Some(arg) = args.first() else {
        panic!("expected one argument");
    };
    let Err(err) = arg.value::<i8>() else {
        panic!("300 does not fit in a byte");
    };
    assert_eq!(err.kind(), ErrorKind::Transform);
}

#[rstest]
fn reports_argument_spans(registry: ParameterTypeRegistry) {
    let args = expression("I have {int} cukes in {word}", &registry)
        .match_text("I have 12 cukes in jars")
        .unwrap_or_else(|err| panic!("match should succeed: {err}"))
        .unwrap_or_else(|| panic!("text should match"));
    let spans: Vec<_> = args
        .iter()
        .map(|a| (a.group().start, a.group().end))
        .collect();
    assert_eq!(spans, [(Some(7), Some(9)), (Some(19), Some(23))]);
}
