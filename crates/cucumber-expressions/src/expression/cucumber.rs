//! Expressions written in the Cucumber Expression syntax.

use std::sync::Arc;

use regex::Regex;

use super::Expression;
use crate::argument::Argument;
use crate::ast::Node;
use crate::errors::{CucumberExpressionError, invalid_regex};
use crate::parameter_type::ParameterType;
use crate::pattern::{CompiledExpression, compile, parse};
use crate::registry::ParameterTypeRegistry;
use crate::tree_regex::TreeRegex;

/// A parsed and compiled Cucumber Expression such as
/// `I have {int} cuke(s)`.
///
/// Parameter types are resolved when the expression is created; later
/// changes to the registry do not affect it.
///
/// # Examples
/// ```
/// use cucumber_expressions::{CucumberExpression, Expression, ParameterTypeRegistry};
/// let registry = ParameterTypeRegistry::new();
/// let expression = CucumberExpression::new("I have {int} cuke(s)", &registry)
///     .unwrap_or_else(|err| panic!("expression should compile: {err}"));
/// assert_eq!(expression.regex().as_str(), r"^I have ((?:-?\d+)|(?:\d+)) cuke(?:s)?$");
/// let matched = expression
///     .match_text("I have 1 cuke")
///     .unwrap_or_else(|err| panic!("match should succeed: {err}"));
/// assert_eq!(matched.map(|args| args.len()), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct CucumberExpression {
    source: String,
    ast: Node,
    compiled: CompiledExpression,
    tree_regex: TreeRegex,
}

impl CucumberExpression {
    /// Parse and compile `expression` against `registry`.
    ///
    /// # Errors
    /// Returns the syntax error found by the parser,
    /// [`CucumberExpressionError::UndefinedParameterType`] for unknown
    /// parameter types, or [`CucumberExpressionError::InvalidRegex`] when a
    /// parameter type regexp does not combine into a valid pattern.
    pub fn new(
        expression: &str,
        registry: &ParameterTypeRegistry,
    ) -> Result<Self, CucumberExpressionError> {
        let ast = parse(expression)?;
        let compiled = compile(&ast, expression, registry)?;
        let regex = Regex::new(&compiled.pattern)
            .map_err(|err| invalid_regex(&compiled.pattern, err))?;
        let tree_regex = TreeRegex::from_regex(regex)?;
        log::debug!("compiled `{expression}` to /{}/", compiled.pattern);
        Ok(Self {
            source: expression.to_string(),
            ast,
            compiled,
            tree_regex,
        })
    }

    /// The syntax tree of the expression.
    #[must_use]
    pub fn ast(&self) -> &Node {
        &self.ast
    }

    /// Parameter types in the order their parameters appear.
    #[must_use]
    pub fn parameter_types(&self) -> &[Arc<ParameterType>] {
        &self.compiled.parameter_types
    }

    /// The tree regex used for matching.
    #[must_use]
    pub fn tree_regex(&self) -> &TreeRegex {
        &self.tree_regex
    }
}

impl Expression for CucumberExpression {
    fn source(&self) -> &str {
        &self.source
    }

    fn regex(&self) -> &Regex {
        self.tree_regex.regex()
    }

    fn match_text(&self, text: &str) -> Result<Option<Vec<Argument>>, CucumberExpressionError> {
        let Some(group) = self.tree_regex.match_text(text) else {
            return Ok(None);
        };
        Argument::build(
            group,
            &self.compiled.parameter_types,
            &self.compiled.group_counts,
            text,
        )
        .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn expression(source: &str, registry: &ParameterTypeRegistry) -> CucumberExpression {
        CucumberExpression::new(source, registry)
            .unwrap_or_else(|err| panic!("`{source}` should compile: {err}"))
    }

    #[test]
    fn exposes_source_and_ast() {
        let registry = ParameterTypeRegistry::new();
        let expression = expression("a (b) c/d", &registry);
        assert_eq!(expression.source(), "a (b) c/d");
        assert_eq!(expression.ast().text(), "a (b) c/d");
        assert!(expression.parameter_types().is_empty());
    }

    #[test]
    fn does_not_match_other_text() {
        let registry = ParameterTypeRegistry::new();
        let matched = expression("I have {int} cukes", &registry)
            .match_text("I have many cukes")
            .unwrap_or_else(|err| panic!("match should succeed: {err}"));
        assert!(matched.is_none());
    }

    #[test]
    fn keeps_types_resolved_at_creation() {
        let mut registry = ParameterTypeRegistry::new();
        let color = ParameterType::text("color", ["red|blue"])
            .unwrap_or_else(|err| panic!("color should be valid: {err}"));
        registry
            .define_parameter_type(color)
            .unwrap_or_else(|err| panic!("color should register: {err}"));
        let expression = expression("a {color} ball", &registry);
        registry.remove_parameter_type("color");
        let args = expression
            .match_text("a red ball")
            .unwrap_or_else(|err| panic!("match should succeed: {err}"))
            .unwrap_or_else(|| panic!("text should match"));
        let value = args.first().map(|arg| arg.value::<String>());
        assert!(matches!(value, Some(Ok(Some(ref v))) if v == "red"));
    }

    #[test]
    fn surfaces_syntax_errors() {
        let registry = ParameterTypeRegistry::new();
        let Err(err) = CucumberExpression::new("a (b", &registry) else {
            panic!("unterminated optional should fail");
        };
        assert_eq!(err.kind(), ErrorKind::MissingEndToken);
        assert_eq!(err.diagnostic().map(|d| d.index), Some(2));
    }
}
