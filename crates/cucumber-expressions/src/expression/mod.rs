//! The expression façade: Cucumber and regular expressions behind one trait.

mod cucumber;
mod regular;

use std::sync::LazyLock;

use regex::Regex;

use crate::argument::Argument;
use crate::errors::CucumberExpressionError;
use crate::registry::ParameterTypeRegistry;

pub use cucumber::CucumberExpression;
pub use regular::RegularExpression;

static PARAMETER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}").unwrap_or_else(|_| unreachable!()));

/// Behaviour shared by every kind of expression.
pub trait Expression {
    /// The text the expression was created from.
    fn source(&self) -> &str;

    /// The compiled regular expression used for matching.
    fn regex(&self) -> &Regex;

    /// Match `text`, returning one argument per parameter, or `None` when
    /// the text does not match.
    ///
    /// # Errors
    /// Returns a [`CucumberExpressionError`] when the match cannot be turned
    /// into arguments, for example because a regular expression group maps to
    /// several parameter types.
    fn match_text(&self, text: &str) -> Result<Option<Vec<Argument>>, CucumberExpressionError>;
}

/// Either kind of expression, as produced by [`ExpressionFactory`].
#[derive(Debug, Clone)]
pub enum AnyExpression<'r> {
    /// A Cucumber Expression.
    Cucumber(CucumberExpression),
    /// A regular expression.
    Regular(RegularExpression<'r>),
}

impl Expression for AnyExpression<'_> {
    fn source(&self) -> &str {
        match self {
            Self::Cucumber(expression) => expression.source(),
            Self::Regular(expression) => expression.source(),
        }
    }

    fn regex(&self) -> &Regex {
        match self {
            Self::Cucumber(expression) => expression.regex(),
            Self::Regular(expression) => expression.regex(),
        }
    }

    fn match_text(&self, text: &str) -> Result<Option<Vec<Argument>>, CucumberExpressionError> {
        match self {
            Self::Cucumber(expression) => expression.match_text(text),
            Self::Regular(expression) => expression.match_text(text),
        }
    }
}

/// Creates expressions from strings, telling regular expressions and
/// Cucumber Expressions apart.
///
/// # Examples
/// ```
/// use cucumber_expressions::{AnyExpression, ExpressionFactory, ParameterTypeRegistry};
/// let registry = ParameterTypeRegistry::new();
/// let factory = ExpressionFactory::new(&registry);
/// let create = |source| {
///     factory
///         .create_expression(source)
///         .unwrap_or_else(|err| panic!("`{source}` should build: {err}"))
/// };
/// assert!(matches!(create("I have {int} cukes"), AnyExpression::Cucumber(_)));
/// assert!(matches!(create("^I have (\\d+) cukes$"), AnyExpression::Regular(_)));
/// assert!(matches!(create("/I have (\\d+) cukes/"), AnyExpression::Regular(_)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ExpressionFactory<'r> {
    registry: &'r ParameterTypeRegistry,
}

impl<'r> ExpressionFactory<'r> {
    /// Create a factory resolving parameter types in `registry`.
    #[must_use]
    pub fn new(registry: &'r ParameterTypeRegistry) -> Self {
        Self { registry }
    }

    /// The registry expressions are resolved against.
    #[must_use]
    pub fn registry(&self) -> &'r ParameterTypeRegistry {
        self.registry
    }

    /// Create an expression from `expression`.
    ///
    /// Text starting with `^` or ending with `$` is an anchored regular
    /// expression, text enclosed in `/` is a regular expression without the
    /// slashes, and anything else is a Cucumber Expression.
    ///
    /// # Errors
    /// Returns the error of the chosen expression kind. An anchored input
    /// that does not compile but contains `{...}` reports
    /// [`CucumberExpressionError::AnchorsInCucumberExpression`].
    pub fn create_expression(
        &self,
        expression: &str,
    ) -> Result<AnyExpression<'r>, CucumberExpressionError> {
        if expression.starts_with('^') || expression.ends_with('$') {
            return self.create_anchored(expression);
        }
        if let Some(inner) = expression
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
        {
            return self.create_regular_source(inner);
        }
        CucumberExpression::new(expression, self.registry).map(AnyExpression::Cucumber)
    }

    /// Wrap an already compiled regex.
    ///
    /// # Errors
    /// As for [`RegularExpression::new`].
    pub fn create_regular_expression(
        &self,
        regex: Regex,
    ) -> Result<AnyExpression<'r>, CucumberExpressionError> {
        RegularExpression::new(regex, self.registry).map(AnyExpression::Regular)
    }

    fn create_regular_source(
        &self,
        source: &str,
    ) -> Result<AnyExpression<'r>, CucumberExpressionError> {
        RegularExpression::with_flags(source, "", self.registry).map(AnyExpression::Regular)
    }

    fn create_anchored(
        &self,
        expression: &str,
    ) -> Result<AnyExpression<'r>, CucumberExpressionError> {
        match Regex::new(expression) {
            Ok(regex) => self.create_regular_expression(regex),
            Err(source) if PARAMETER_PATTERN.is_match(expression) => {
                Err(CucumberExpressionError::AnchorsInCucumberExpression {
                    expression: expression.to_string(),
                    source,
                })
            }
            Err(source) => Err(crate::errors::invalid_regex(expression, source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn strips_slashes_from_regular_expressions() {
        let registry = ParameterTypeRegistry::new();
        let factory = ExpressionFactory::new(&registry);
        let expression = factory
            .create_expression("/I have (\\d+) cukes/")
            .unwrap_or_else(|err| panic!("expression should build: {err}"));
        assert_eq!(expression.source(), "I have (\\d+) cukes");
    }

    #[test]
    fn a_lone_slash_is_a_cucumber_expression() {
        let registry = ParameterTypeRegistry::new();
        let factory = ExpressionFactory::new(&registry);
        let result = factory.create_expression("/");
        let Err(err) = result else {
            panic!("a lone alternation should not parse");
        };
        assert_eq!(err.kind(), ErrorKind::AlternativeMayNotBeEmpty);
    }

    #[test]
    fn anchored_cucumber_expressions_get_a_hint() {
        let registry = ParameterTypeRegistry::new();
        let factory = ExpressionFactory::new(&registry);
        let Err(err) = factory.create_expression("^I have {int} cukes$") else {
            panic!("anchored Cucumber Expression should fail");
        };
        assert_eq!(err.kind(), ErrorKind::AnchorsInCucumberExpression);
        assert_eq!(
            err.to_string(),
            "You cannot use anchors (^ or $) in Cucumber Expressions. Please remove them from ^I have {int} cukes$"
        );
    }

    #[test]
    fn broken_anchored_regexps_are_invalid() {
        let registry = ParameterTypeRegistry::new();
        let factory = ExpressionFactory::new(&registry);
        let Err(err) = factory.create_expression("^I have (\\d+ cukes$") else {
            panic!("unbalanced regex should fail");
        };
        assert_eq!(err.kind(), ErrorKind::InvalidRegex);
    }

    #[test]
    fn any_expression_delegates() {
        let registry = ParameterTypeRegistry::new();
        let factory = ExpressionFactory::new(&registry);
        let expression = factory
            .create_expression("I have {int} cukes")
            .unwrap_or_else(|err| panic!("expression should build: {err}"));
        assert_eq!(expression.source(), "I have {int} cukes");
        assert!(expression.regex().is_match("I have 3 cukes"));
        let args = expression
            .match_text("I have 3 cukes")
            .unwrap_or_else(|err| panic!("match should succeed: {err}"));
        assert_eq!(args.map(|a| a.len()), Some(1));
    }
}
