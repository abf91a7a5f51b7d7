//! Parameter types every registry starts with.

use std::any::type_name;

use crate::config::NumberFormat;
use crate::errors::BoxError;
use crate::parameter_type::{ParameterType, Transformer, first_value};

/// Regexps shared by the integer parameter types.
pub const INTEGER_REGEXPS: [&str; 2] = [r"-?\d+", r"\d+"];
/// Regexp of the `word` parameter type.
pub const WORD_REGEXP: &str = r"[^\s]+";
/// Regexps of the `string` parameter type: double or single quoted text.
pub const STRING_REGEXPS: [&str; 2] = [r#""([^"\\]*(\\.[^"\\]*)*)""#, r"'([^'\\]*(\\.[^'\\]*)*)'"];
/// Regexp of the anonymous parameter type.
pub const ANONYMOUS_REGEXP: &str = ".*";

/// Name of the quoted string parameter type, which the compiler treats
/// specially.
pub(crate) const STRING_TYPE_NAME: &str = "string";

/// Regexp matching a decimal number that uses `separator` between the integer
/// and fractional digits.
///
/// Either side of the separator may be empty but not both, and an exponent
/// needs digits before it.
///
/// # Examples
/// ```
/// use cucumber_expressions::float_regexp;
/// assert_eq!(float_regexp(','), r"[-+]?(?:\d+(?:,\d+)?|,\d+)(?:E[-+]?\d+)?");
/// ```
#[must_use]
pub fn float_regexp(separator: char) -> String {
    let separator = regex::escape(separator.encode_utf8(&mut [0; 4]));
    format!(r"[-+]?(?:\d+(?:{separator}\d+)?|{separator}\d+)(?:E[-+]?\d+)?")
}

fn integer<T>(name: &str) -> ParameterType
where
    T: std::str::FromStr + Send + Sync + 'static,
    T::Err: Into<BoxError>,
{
    ParameterType::unchecked(
        name.to_string(),
        INTEGER_REGEXPS.iter().map(ToString::to_string).collect(),
        type_name::<T>(),
        Transformer::parsing::<T>(),
    )
}

fn float<T>(name: &str, format: NumberFormat) -> ParameterType
where
    T: std::str::FromStr + Send + Sync + 'static,
    T::Err: Into<BoxError>,
{
    let separator = format.decimal_separator;
    let transformer = Transformer::new(move |values: &[Option<&str>]| {
        first_value(values)
            .unwrap_or_default()
            .replace(separator, ".")
            .parse::<T>()
            .map_err(Into::into)
    });
    ParameterType::unchecked(
        name.to_string(),
        vec![float_regexp(separator)],
        type_name::<T>(),
        transformer,
    )
}

fn unescape_quoted(values: &[Option<&str>]) -> Result<String, BoxError> {
    let value = first_value(values).unwrap_or_default();
    Ok(value.replace("\\\"", "\"").replace("\\'", "'"))
}

fn string_type() -> ParameterType {
    ParameterType::unchecked(
        STRING_TYPE_NAME.to_string(),
        STRING_REGEXPS.iter().map(ToString::to_string).collect(),
        type_name::<String>(),
        Transformer::new(unescape_quoted),
    )
}

fn text_type(name: &str, regexp: &str) -> ParameterType {
    ParameterType::unchecked(
        name.to_string(),
        vec![regexp.to_string()],
        type_name::<String>(),
        Transformer::identity(),
    )
}

/// The built-in parameter types in definition order.
pub(crate) fn builtin_parameter_types(format: NumberFormat) -> Vec<ParameterType> {
    [
        integer::<i32>("int")
            .with_prefer_for_regexp_match(true)
            .with_weight(1000),
        integer::<i8>("byte").with_use_for_snippets(false),
        integer::<i16>("short").with_use_for_snippets(false),
        integer::<i64>("long").with_use_for_snippets(false),
        float::<f32>("float", format),
        float::<f64>("double", format).with_use_for_snippets(false),
        text_type("word", WORD_REGEXP).with_use_for_snippets(false),
        string_type(),
        text_type("", ANONYMOUS_REGEXP)
            .with_use_for_snippets(false)
            .with_prefer_for_regexp_match(true),
    ]
    .into_iter()
    .map(ParameterType::into_builtin)
    .collect()
}
