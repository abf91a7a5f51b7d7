//! JSON descriptors for expressions and parameter type registries.
//!
//! Expressions serialize to `{"type": "CucumberExpression", "expression": ...}`
//! or `{"type": "RegularExpression", "expression": ..., "flags": ...}`. A
//! registry serializes to `{"parameterTypes": [...], "decimalSeparator": ...}`
//! listing only the types defined on top of the built-ins, which every
//! registry recreates itself from the decimal separator.

use serde::{Deserialize, Serialize};

use crate::config::NumberFormat;
use crate::errors::CucumberExpressionError;
use crate::expression::{
    AnyExpression, CucumberExpression, Expression, ExpressionFactory, RegularExpression,
};
use crate::parameter_type::ParameterType;
use crate::registry::ParameterTypeRegistry;

/// Serialized form of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExpressionJson {
    /// A Cucumber Expression.
    CucumberExpression {
        /// Expression source.
        expression: String,
    },
    /// A regular expression.
    RegularExpression {
        /// Regex source without delimiters.
        expression: String,
        /// Single-letter regex flags.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        flags: Option<String>,
    },
}

/// Serialized form of a parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterTypeJson {
    /// Parameter type name.
    pub name: String,
    /// Alternative regexps.
    pub regexp_strings: Vec<String>,
    /// Whether the generator may suggest the type.
    #[serde(default = "default_true")]
    pub use_for_snippets: bool,
    /// Whether the type wins shared regexp lookups.
    #[serde(default)]
    pub prefer_for_regexp_match: bool,
    /// Whether the type is built in.
    #[serde(default)]
    pub builtin: bool,
}

fn default_true() -> bool {
    true
}

fn default_decimal_separator() -> char {
    NumberFormat::default().decimal_separator
}

/// Serialized form of a parameter type registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterTypeRegistryJson {
    /// Parameter types defined beyond the built-ins.
    pub parameter_types: Vec<ParameterTypeJson>,
    /// Separator the built-in `float` and `double` types expect.
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,
}

impl Default for ParameterTypeRegistryJson {
    fn default() -> Self {
        Self {
            parameter_types: Vec::new(),
            decimal_separator: default_decimal_separator(),
        }
    }
}

impl From<&ParameterType> for ParameterTypeJson {
    fn from(parameter_type: &ParameterType) -> Self {
        Self {
            name: parameter_type.name().to_string(),
            regexp_strings: parameter_type.regexps().to_vec(),
            use_for_snippets: parameter_type.use_for_snippets(),
            prefer_for_regexp_match: parameter_type.prefer_for_regexp_match(),
            builtin: parameter_type.is_builtin(),
        }
    }
}

impl ExpressionJson {
    /// Encode as a JSON string.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::Json`] when encoding fails.
    pub fn to_json_string(&self) -> Result<String, CucumberExpressionError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from a JSON string.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::Json`] for malformed input.
    pub fn from_json_str(json: &str) -> Result<Self, CucumberExpressionError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl CucumberExpression {
    /// Describe the expression as JSON.
    #[must_use]
    pub fn to_json(&self) -> ExpressionJson {
        ExpressionJson::CucumberExpression {
            expression: self.source().to_string(),
        }
    }
}

impl RegularExpression<'_> {
    /// Describe the expression as JSON.
    #[must_use]
    pub fn to_json(&self) -> ExpressionJson {
        ExpressionJson::RegularExpression {
            expression: self.source().to_string(),
            flags: Some(self.flags().to_string()).filter(|flags| !flags.is_empty()),
        }
    }
}

impl AnyExpression<'_> {
    /// Describe the expression as JSON.
    #[must_use]
    pub fn to_json(&self) -> ExpressionJson {
        match self {
            Self::Cucumber(expression) => expression.to_json(),
            Self::Regular(expression) => expression.to_json(),
        }
    }
}

impl<'r> ExpressionFactory<'r> {
    /// Recreate an expression from its JSON description.
    ///
    /// # Errors
    /// Returns the error raised while building the expression.
    ///
    /// # Examples
    /// ```
    /// use cucumber_expressions::{Expression, ExpressionFactory, ExpressionJson, ParameterTypeRegistry};
    /// let registry = ParameterTypeRegistry::new();
    /// let json = ExpressionJson::from_json_str(r#"{"type":"RegularExpression","expression":"^a (\\d+)$","flags":"i"}"#)
    ///     .unwrap_or_else(|err| panic!("json should decode: {err}"));
    /// let expression = ExpressionFactory::new(&registry)
    ///     .create_expression_from_json(&json)
    ///     .unwrap_or_else(|err| panic!("expression should build: {err}"));
    /// assert!(expression.regex().is_match("A 1"));
    /// assert_eq!(expression.to_json(), json);
    /// ```
    pub fn create_expression_from_json(
        &self,
        json: &ExpressionJson,
    ) -> Result<AnyExpression<'r>, CucumberExpressionError> {
        match json {
            ExpressionJson::CucumberExpression { expression } => {
                CucumberExpression::new(expression, self.registry()).map(AnyExpression::Cucumber)
            }
            ExpressionJson::RegularExpression { expression, flags } => {
                let flags = flags.as_deref().unwrap_or_default();
                RegularExpression::with_flags(expression, flags, self.registry())
                    .map(AnyExpression::Regular)
            }
        }
    }
}

impl ParameterTypeRegistry {
    /// Describe the parameter types defined beyond the built-ins, together
    /// with the decimal separator of the built-in floating point types.
    #[must_use]
    pub fn to_json(&self) -> ParameterTypeRegistryJson {
        ParameterTypeRegistryJson {
            parameter_types: self
                .parameter_types()
                .filter(|p| !p.is_builtin())
                .map(|p| ParameterTypeJson::from(p.as_ref()))
                .collect(),
            decimal_separator: self.number_format().decimal_separator,
        }
    }

    /// Recreate a registry: the built-ins for the recorded decimal separator
    /// plus the listed parameter types, each returning its first matched
    /// group as a `String`.
    ///
    /// Entries flagged `builtin` are skipped.
    ///
    /// # Errors
    /// Returns the validation or registration error of the first rejected
    /// parameter type.
    pub fn from_json(json: &ParameterTypeRegistryJson) -> Result<Self, CucumberExpressionError> {
        let number_format = NumberFormat::new(json.decimal_separator);
        let mut registry = Self::with_number_format(number_format);
        for entry in json.parameter_types.iter().filter(|entry| !entry.builtin) {
            let regexps = entry.regexp_strings.clone();
            let parameter_type = ParameterType::text(entry.name.clone(), regexps)?
                .with_use_for_snippets(entry.use_for_snippets)
                .with_prefer_for_regexp_match(entry.prefer_for_regexp_match);
            registry.define_parameter_type(parameter_type)?;
        }
        Ok(registry)
    }
}

impl ParameterTypeRegistryJson {
    /// Encode as a JSON string.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::Json`] when encoding fails.
    pub fn to_json_string(&self) -> Result<String, CucumberExpressionError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from a JSON string.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::Json`] for malformed input.
    pub fn from_json_str(json: &str) -> Result<Self, CucumberExpressionError> {
        Ok(serde_json::from_str(json)?)
    }
}
