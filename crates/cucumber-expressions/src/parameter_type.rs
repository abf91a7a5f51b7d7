//! Parameter types: named regexps paired with a value transformer.

use std::any::{Any, type_name};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use regex::Regex;

use crate::errors::{BoxError, CucumberExpressionError, invalid_regex};

/// Type-erased value produced by a [`Transformer`].
pub type TransformedValue = Box<dyn Any + Send + Sync>;

type TransformFn = dyn Fn(&[Option<&str>]) -> Result<TransformedValue, BoxError> + Send + Sync;

/// Converts the captured group values of an argument into a typed value.
///
/// Transformers receive one entry per capture group of the argument, `None`
/// for groups that did not participate in the match.
#[derive(Clone)]
pub struct Transformer(Arc<TransformFn>);

impl Transformer {
    /// Wrap a fallible transformation function.
    ///
    /// # Examples
    /// ```
    /// use cucumber_expressions::Transformer;
    /// let upper = Transformer::new(|values: &[Option<&str>]| {
    ///     Ok::<_, std::convert::Infallible>(values.first().copied().flatten().map(str::to_uppercase))
    /// });
    /// let value = upper.transform(&[Some("red")])
    ///     .unwrap_or_else(|err| panic!("transform should succeed: {err}"));
    /// assert_eq!(value.downcast_ref::<Option<String>>(), Some(&Some("RED".to_string())));
    /// ```
    pub fn new<T, E, F>(transform: F) -> Self
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(&[Option<&str>]) -> Result<T, E> + Send + Sync + 'static,
    {
        Self(Arc::new(move |values: &[Option<&str>]| {
            transform(values)
                .map(|value| Box::new(value) as TransformedValue)
                .map_err(Into::into)
        }))
    }

    /// Parse the first participating group with [`FromStr`].
    #[must_use]
    pub fn parsing<T>() -> Self
    where
        T: FromStr + Any + Send + Sync,
        T::Err: Into<BoxError>,
    {
        Self::new(|values: &[Option<&str>]| {
            first_value(values)
                .unwrap_or_default()
                .parse::<T>()
                .map_err(Into::into)
        })
    }

    /// Return the first participating group as a `String`.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(|values: &[Option<&str>]| {
            Ok::<_, BoxError>(first_value(values).unwrap_or_default().to_string())
        })
    }

    /// Run the transformation.
    ///
    /// # Errors
    /// Propagates the error returned by the wrapped function.
    pub fn transform(&self, values: &[Option<&str>]) -> Result<TransformedValue, BoxError> {
        (self.0)(values)
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer").finish_non_exhaustive()
    }
}

/// First group value that participated in the match.
pub(crate) fn first_value<'a>(values: &[Option<&'a str>]) -> Option<&'a str> {
    values.iter().flatten().next().copied()
}

/// A named set of regexps that an expression parameter may match.
///
/// Parameter types are immutable once built and shared as
/// `Arc<ParameterType>` between the registry, compiled expressions, and
/// arguments.
///
/// # Examples
/// ```
/// use cucumber_expressions::ParameterType;
/// let color = ParameterType::new("color", ["red|blue|yellow"], |values: &[Option<&str>]| {
///     Ok::<_, std::convert::Infallible>(values.first().copied().flatten().unwrap_or_default().to_string())
/// })
/// .unwrap_or_else(|err| panic!("parameter type should be valid: {err}"))
/// .with_prefer_for_regexp_match(true);
/// assert_eq!(color.name(), "color");
/// assert!(color.use_for_snippets());
/// ```
#[derive(Debug, Clone)]
pub struct ParameterType {
    name: String,
    regexps: Vec<String>,
    type_name: &'static str,
    transformer: Transformer,
    use_for_snippets: bool,
    prefer_for_regexp_match: bool,
    weight: i32,
    builtin: bool,
}

impl ParameterType {
    /// Create a parameter type whose values are produced by `transform`.
    ///
    /// An empty `name` declares the anonymous parameter type. The new type is
    /// used for snippets, is not preferential, and has weight zero.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::InvalidParameterTypeName`] for names
    /// containing `{ } ( ) \ /`, [`CucumberExpressionError::EmptyRegexps`]
    /// without regexps, [`CucumberExpressionError::InvalidRegex`] when a
    /// regexp does not compile, and
    /// [`CucumberExpressionError::UnsupportedRegexFlag`] when a regexp turns
    /// on case-insensitive matching.
    pub fn new<T, E, F>(
        name: impl Into<String>,
        regexps: impl IntoIterator<Item = impl Into<String>>,
        transform: F,
    ) -> Result<Self, CucumberExpressionError>
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(&[Option<&str>]) -> Result<T, E> + Send + Sync + 'static,
    {
        Self::from_transformer(name, regexps, type_name::<T>(), Transformer::new(transform))
    }

    /// Create a parameter type from a prepared [`Transformer`].
    ///
    /// `type_name` documents what the transformer produces and is reported
    /// when an argument is requested as a different type.
    ///
    /// # Errors
    /// As for [`ParameterType::new`].
    pub fn from_transformer(
        name: impl Into<String>,
        regexps: impl IntoIterator<Item = impl Into<String>>,
        type_name: &'static str,
        transformer: Transformer,
    ) -> Result<Self, CucumberExpressionError> {
        let parameter_type = Self::unchecked(
            name.into(),
            regexps.into_iter().map(Into::into).collect(),
            type_name,
            transformer,
        );
        parameter_type.validate()?;
        Ok(parameter_type)
    }

    /// Create a `String`-valued parameter type returning the first
    /// participating group.
    ///
    /// # Errors
    /// As for [`ParameterType::new`].
    pub fn text(
        name: impl Into<String>,
        regexps: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, CucumberExpressionError> {
        Self::from_transformer(
            name,
            regexps,
            type_name::<String>(),
            Transformer::identity(),
        )
    }

    pub(crate) fn unchecked(
        name: String,
        regexps: Vec<String>,
        type_name: &'static str,
        transformer: Transformer,
    ) -> Self {
        Self {
            name,
            regexps,
            type_name,
            transformer,
            use_for_snippets: true,
            prefer_for_regexp_match: false,
            weight: 0,
            builtin: false,
        }
    }

    /// Anonymous stand-in used for regular expression groups that no
    /// registered parameter type claims.
    pub(crate) fn anonymous_for(regexp: &str) -> Self {
        Self::unchecked(
            String::new(),
            vec![regexp.to_string()],
            type_name::<String>(),
            Transformer::identity(),
        )
        .with_use_for_snippets(false)
    }

    fn validate(&self) -> Result<(), CucumberExpressionError> {
        if self.name.chars().any(is_illegal_name_char) {
            return Err(CucumberExpressionError::InvalidParameterTypeName {
                name: self.name.clone(),
            });
        }
        if self.regexps.is_empty() {
            return Err(CucumberExpressionError::EmptyRegexps {
                name: self.name.clone(),
            });
        }
        for regexp in &self.regexps {
            Regex::new(regexp).map_err(|err| invalid_regex(regexp, err))?;
            if enables_case_insensitivity(regexp) {
                return Err(CucumberExpressionError::UnsupportedRegexFlag {
                    flag: 'i',
                    pattern: regexp.clone(),
                });
            }
        }
        Ok(())
    }

    /// Set whether the generator may suggest this type.
    #[must_use]
    pub fn with_use_for_snippets(mut self, use_for_snippets: bool) -> Self {
        self.use_for_snippets = use_for_snippets;
        self
    }

    /// Set whether this type wins regexp lookups shared with other types.
    #[must_use]
    pub fn with_prefer_for_regexp_match(mut self, prefer: bool) -> Self {
        self.prefer_for_regexp_match = prefer;
        self
    }

    /// Set the tie-breaking weight; heavier types are ranked first.
    #[must_use]
    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub(crate) fn into_builtin(mut self) -> Self {
        self.builtin = true;
        self
    }

    /// The name used between `{` and `}`; empty for the anonymous type.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the anonymous parameter type.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    /// The alternative regexps, in the order they are tried.
    #[must_use]
    pub fn regexps(&self) -> &[String] {
        &self.regexps
    }

    /// Name of the Rust type the transformer produces.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the generator may suggest this type.
    #[must_use]
    pub fn use_for_snippets(&self) -> bool {
        self.use_for_snippets
    }

    /// Whether this type wins regexp lookups shared with other types.
    #[must_use]
    pub fn prefer_for_regexp_match(&self) -> bool {
        self.prefer_for_regexp_match
    }

    /// Tie-breaking weight.
    #[must_use]
    pub fn weight(&self) -> i32 {
        self.weight
    }

    /// Whether the registry defined this type itself.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// Transform captured group values.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::Transform`] when the transformer
    /// fails.
    pub fn transform(
        &self,
        values: &[Option<&str>],
    ) -> Result<TransformedValue, CucumberExpressionError> {
        self.transformer
            .transform(values)
            .map_err(|source| CucumberExpressionError::Transform {
                parameter_type: self.name.clone(),
                source,
            })
    }

    /// Ranking used for regexp buckets and generator suggestions:
    /// preferential types first, then heavier types.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        other
            .prefer_for_regexp_match
            .cmp(&self.prefer_for_regexp_match)
            .then_with(|| other.weight.cmp(&self.weight))
    }
}

fn is_illegal_name_char(ch: char) -> bool {
    matches!(ch, '{' | '}' | '(' | ')' | '\\' | '/')
}

/// Detect inline flag groups such as `(?i)` or `(?mi:...)` that switch on
/// case-insensitive matching. Parentheses inside character classes are
/// literal and never open a flag group.
fn enables_case_insensitivity(regexp: &str) -> bool {
    let bytes = regexp.as_bytes();
    let mut escaping = false;
    let mut char_class = false;
    for (index, &b) in bytes.iter().enumerate() {
        match b {
            b'[' if !escaping => char_class = true,
            b']' if !escaping => char_class = false,
            b'(' if !escaping && !char_class && bytes.get(index + 1) == Some(&b'?') => {
                let flags = bytes
                    .get(index + 2..)
                    .unwrap_or_default()
                    .iter()
                    .take_while(|c| c.is_ascii_alphabetic() || **c == b'-');
                for &flag in flags {
                    if flag == b'-' {
                        break;
                    }
                    if flag == b'i' {
                        return true;
                    }
                }
            }
            _ => {}
        }
        escaping = b == b'\\' && !escaping;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use rstest::rstest;
    use std::convert::Infallible;

    fn text_type(name: &str, regexp: &str) -> ParameterType {
        ParameterType::text(name, [regexp])
            .unwrap_or_else(|err| panic!("`{name}` should be valid: {err}"))
    }

    #[rstest]
    #[case("[string]")]
    #[case("{x}")]
    #[case("a/b")]
    #[case("a\\b")]
    #[case("(x)")]
    fn rejects_illegal_names(#[case] name: &str) {
        let Err(err) = ParameterType::text(name, [".*"]) else {
            panic!("`{name}` should be rejected");
        };
        assert_eq!(err.kind(), ErrorKind::InvalidParameterTypeName);
        let message = err.to_string();
        assert!(message.starts_with("Illegal character in parameter name {"));
    }

    #[test]
    fn rejects_missing_regexps() {
        let Err(err) = ParameterType::text("empty", Vec::<String>::new()) else {
            panic!("parameter type without regexps should be rejected");
        };
        assert_eq!(err.kind(), ErrorKind::EmptyRegexps);
    }

    #[test]
    fn rejects_invalid_regexps() {
        let Err(err) = ParameterType::text("broken", ["("]) else {
            panic!("invalid regexp should be rejected");
        };
        assert_eq!(err.kind(), ErrorKind::InvalidRegex);
    }

    #[rstest]
    #[case("(?i)red", true)]
    #[case("(?mi:red)", true)]
    #[case("(?m-i:red)", false)]
    #[case(r"\(?i\)", false)]
    #[case("[(?i)]", false)]
    #[case(r"[\]](?i)x", true)]
    #[case("(?:red)", false)]
    #[case("red", false)]
    fn detects_case_insensitive_flags(#[case] regexp: &str, #[case] expected: bool) {
        assert_eq!(enables_case_insensitivity(regexp), expected);
    }

    #[test]
    fn rejects_case_insensitive_regexps() {
        let Err(err) = ParameterType::text("shout", ["(?i)hey"]) else {
            panic!("case-insensitive regexp should be rejected");
        };
        assert_eq!(err.kind(), ErrorKind::UnsupportedRegexFlag);
    }

    #[test]
    fn accepts_flag_lookalikes_inside_character_classes() {
        let bracket = ParameterType::text("bracket", ["[(?i)]"])
            .unwrap_or_else(|err| panic!("character class should be accepted: {err}"));
        assert_eq!(bracket.regexps(), ["[(?i)]"]);
    }

    #[test]
    fn records_the_produced_type() {
        let count = ParameterType::new("count", [r"\d+"], |values: &[Option<&str>]| {
            first_value(values).unwrap_or_default().parse::<u64>()
        })
        .unwrap_or_else(|err| panic!("count should be valid: {err}"));
        assert_eq!(count.type_name(), "u64");
        let Ok(value) = count.transform(&[Some("42")]) else {
            panic!("transform should succeed");
        };
        assert_eq!(value.downcast_ref::<u64>(), Some(&42));
    }

    #[test]
    fn wraps_transform_failures() {
        let Ok(count) = ParameterType::from_transformer(
            "count",
            [r"\d+"],
            "u8",
            Transformer::parsing::<u8>(),
        ) else {
            panic!("count should be valid");
        };
        let Err(err) = count.transform(&[Some("300")]) else {
            panic!("overflow should fail");
        };
        assert_eq!(err.kind(), ErrorKind::Transform);
    }

    #[test]
    fn orders_preferential_then_heavier_types() {
        let plain = text_type("plain", "a");
        let heavy = text_type("heavy", "a").with_weight(10);
        let preferred = text_type("preferred", "a").with_prefer_for_regexp_match(true);
        let mut types = [plain, heavy, preferred];
        types.sort_by(ParameterType::compare);
        let names: Vec<_> = types.iter().map(ParameterType::name).collect();
        assert_eq!(names, ["preferred", "heavy", "plain"]);
    }

    #[test]
    fn transformer_sees_missing_groups() {
        let transformer = Transformer::new(|values: &[Option<&str>]| {
            Ok::<_, Infallible>(values.iter().filter(|v| v.is_none()).count())
        });
        let Ok(value) = transformer.transform(&[None, Some("x"), None]) else {
            panic!("transform should succeed");
        };
        assert_eq!(value.downcast_ref::<usize>(), Some(&2));
    }
}
