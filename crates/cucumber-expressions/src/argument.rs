//! Matched arguments and their lazily transformed values.

use std::any::{Any, type_name};
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::{BoxError, CucumberExpressionError};
use crate::parameter_type::{ParameterType, first_value};
use crate::tree_regex::Group;

/// One matched parameter: its capture group and the parameter type that
/// interprets it.
#[derive(Debug, Clone)]
pub struct Argument {
    group: Group,
    parameter_type: Arc<ParameterType>,
}

impl Argument {
    /// Pair the top-level groups of a match with their parameter types.
    ///
    /// `group_counts[i]` top-level groups belong to `parameter_types[i]`;
    /// when a parameter owns several groups they are merged under one
    /// enclosing group.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::ArgumentCountMismatch`] when the
    /// number of groups does not line up with the parameter types.
    pub fn build(
        group: Group,
        parameter_types: &[Arc<ParameterType>],
        group_counts: &[usize],
        text: &str,
    ) -> Result<Vec<Self>, CucumberExpressionError> {
        let expected: usize = group_counts.iter().sum();
        if group.children.len() != expected || group_counts.len() != parameter_types.len() {
            return Err(CucumberExpressionError::ArgumentCountMismatch {
                groups: group.children.len(),
                parameter_types: parameter_types.len(),
            });
        }
        let mut groups = group.children.into_iter();
        Ok(parameter_types
            .iter()
            .zip(group_counts)
            .map(|(parameter_type, &count)| {
                let owned: Vec<Group> = groups.by_ref().take(count).collect();
                let group = if owned.len() == 1 {
                    owned.into_iter().next().unwrap_or_default()
                } else {
                    Group::enclosing(owned, text)
                };
                Self {
                    group,
                    parameter_type: Arc::clone(parameter_type),
                }
            })
            .collect())
    }

    /// The matched capture group.
    #[must_use]
    pub fn group(&self) -> &Group {
        &self.group
    }

    /// The parameter type interpreting the group.
    #[must_use]
    pub fn parameter_type(&self) -> &Arc<ParameterType> {
        &self.parameter_type
    }

    /// Values handed to the transformer. The anonymous type sees the whole
    /// group; every other type sees the group's children.
    fn values(&self) -> Vec<Option<&str>> {
        if self.parameter_type.is_anonymous() {
            vec![self.group.value.as_deref()]
        } else {
            self.group.values()
        }
    }

    /// Run the parameter type's transformer and return its value as `T`.
    ///
    /// Returns `Ok(None)` when no group of the argument took part in the
    /// match, for example an unmatched optional group of a regular
    /// expression.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::Transform`] when the transformer
    /// fails and [`CucumberExpressionError::TransformTypeMismatch`] when it
    /// does not produce a `T`.
    ///
    /// # Examples
    /// ```
    /// use cucumber_expressions::{CucumberExpression, Expression, ParameterTypeRegistry};
    /// let registry = ParameterTypeRegistry::new();
    /// let expression = CucumberExpression::new("I have {int} cukes", &registry)
    ///     .unwrap_or_else(|err| panic!("expression should compile: {err}"));
    /// let args = expression
    ///     .match_text("I have 7 cukes")
    ///     .unwrap_or_else(|err| panic!("match should succeed: {err}"))
    ///     .unwrap_or_else(|| panic!("text should match"));
    /// let count = args.first().map(|arg| arg.value::<i32>());
    /// assert!(matches!(count, Some(Ok(Some(7)))));
    /// ```
    pub fn value<T: Any>(&self) -> Result<Option<T>, CucumberExpressionError> {
        let values = self.values();
        if values.iter().all(Option::is_none) {
            return Ok(None);
        }
        let value = self.parameter_type.transform(&values)?;
        value
            .downcast::<T>()
            .map(|boxed| Some(*boxed))
            .map_err(|_| CucumberExpressionError::TransformTypeMismatch {
                parameter_type: self.parameter_type.name().to_string(),
                expected: type_name::<T>(),
                actual: self.parameter_type.type_name(),
            })
    }

    /// Parse the first participating group with [`FromStr`], bypassing the
    /// parameter type's transformer.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::Transform`] when parsing fails.
    pub fn parse<T>(&self) -> Result<Option<T>, CucumberExpressionError>
    where
        T: FromStr,
        T::Err: Into<BoxError>,
    {
        let values = self.values();
        let Some(raw) = first_value(&values) else {
            return Ok(None);
        };
        raw.parse::<T>()
            .map(Some)
            .map_err(|err| CucumberExpressionError::Transform {
                parameter_type: self.parameter_type.name().to_string(),
                source: err.into(),
            })
    }
}
