//! Registry of parameter types, indexed by name and by regexp.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::builtin::builtin_parameter_types;
use crate::config::NumberFormat;
use crate::errors::{Ambiguity, CucumberExpressionError};
use crate::generator::CucumberExpressionGenerator;
use crate::parameter_type::ParameterType;

/// The parameter types known to expressions, keyed by name and by regexp.
///
/// Each name maps to exactly one type. Each regexp maps to the types that
/// declare it, ordered by [`ParameterType::compare`], and holds at most one
/// preferential type. Mutation takes `&mut self`; share a registry between
/// threads behind a lock of the caller's choosing.
///
/// # Examples
/// ```
/// use cucumber_expressions::{ParameterType, ParameterTypeRegistry};
/// let mut registry = ParameterTypeRegistry::new();
/// let color = ParameterType::text("color", ["red|blue"])
///     .unwrap_or_else(|err| panic!("parameter type should be valid: {err}"));
/// registry
///     .define_parameter_type(color)
///     .unwrap_or_else(|err| panic!("color should register: {err}"));
/// assert!(registry.lookup_by_type_name("color").is_some());
/// assert!(registry.lookup_by_type_name("int").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ParameterTypeRegistry {
    by_name: HashMap<String, Arc<ParameterType>>,
    by_regexp: HashMap<String, Vec<Arc<ParameterType>>>,
    ordered: Vec<Arc<ParameterType>>,
    number_format: NumberFormat,
}

impl ParameterTypeRegistry {
    /// Create a registry holding the built-in parameter types, with `.` as
    /// the decimal separator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_number_format(NumberFormat::default())
    }

    /// Create a registry holding the built-in parameter types, parsing
    /// floating point numbers with `number_format`.
    #[must_use]
    pub fn with_number_format(number_format: NumberFormat) -> Self {
        let mut registry = Self {
            by_name: HashMap::new(),
            by_regexp: HashMap::new(),
            ordered: Vec::new(),
            number_format,
        };
        for parameter_type in builtin_parameter_types(number_format) {
            registry.insert(Arc::new(parameter_type));
        }
        registry
    }

    /// Number format used by the built-in floating point types.
    #[must_use]
    pub fn number_format(&self) -> NumberFormat {
        self.number_format
    }

    /// Register `parameter_type`.
    ///
    /// Nothing is registered when an error is returned.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::DuplicateParameterTypeName`] when
    /// the name is taken, and
    /// [`CucumberExpressionError::ConflictingPreferredRegexp`] when a
    /// preferential type already claims one of its regexps.
    pub fn define_parameter_type(
        &mut self,
        parameter_type: ParameterType,
    ) -> Result<Arc<ParameterType>, CucumberExpressionError> {
        self.check(&parameter_type)?;
        let parameter_type = Arc::new(parameter_type);
        self.insert(Arc::clone(&parameter_type));
        log::debug!(
            "defined parameter type {{{}}} with regexps {:?}",
            parameter_type.name(),
            parameter_type.regexps()
        );
        Ok(parameter_type)
    }

    fn check(&self, parameter_type: &ParameterType) -> Result<(), CucumberExpressionError> {
        let name = parameter_type.name();
        if self.by_name.contains_key(name) {
            return Err(CucumberExpressionError::DuplicateParameterTypeName {
                name: name.to_string(),
            });
        }
        if !parameter_type.prefer_for_regexp_match() {
            return Ok(());
        }
        for regexp in parameter_type.regexps() {
            let existing = self
                .by_regexp
                .get(regexp)
                .and_then(|bucket| bucket.first())
                .filter(|first| first.prefer_for_regexp_match());
            if let Some(existing) = existing {
                return Err(CucumberExpressionError::ConflictingPreferredRegexp {
                    regexp: regexp.clone(),
                    existing: existing.name().to_string(),
                    new: name.to_string(),
                });
            }
        }
        Ok(())
    }

    fn insert(&mut self, parameter_type: Arc<ParameterType>) {
        for regexp in parameter_type.regexps() {
            let bucket = self.by_regexp.entry(regexp.clone()).or_default();
            if bucket.iter().any(|p| Arc::ptr_eq(p, &parameter_type)) {
                continue;
            }
            bucket.push(Arc::clone(&parameter_type));
            bucket.sort_by(|a, b| a.compare(b));
        }
        let name = parameter_type.name().to_string();
        self.by_name.insert(name, Arc::clone(&parameter_type));
        self.ordered.push(parameter_type);
    }

    /// Unregister the parameter type called `name`, returning it.
    ///
    /// Expressions compiled earlier keep their own reference to the type.
    pub fn remove_parameter_type(&mut self, name: &str) -> Option<Arc<ParameterType>> {
        let removed = self.by_name.remove(name)?;
        self.ordered.retain(|p| !Arc::ptr_eq(p, &removed));
        for regexp in removed.regexps() {
            if let Some(bucket) = self.by_regexp.get_mut(regexp) {
                bucket.retain(|p| !Arc::ptr_eq(p, &removed));
                if bucket.is_empty() {
                    self.by_regexp.remove(regexp);
                }
            }
        }
        log::debug!("removed parameter type {{{name}}}");
        Some(removed)
    }

    /// Find a parameter type by name; the empty name finds the anonymous
    /// type.
    #[must_use]
    pub fn lookup_by_type_name(&self, name: &str) -> Option<&Arc<ParameterType>> {
        self.by_name.get(name)
    }

    /// Find the parameter type for a capture group whose source is `regexp`.
    ///
    /// `expression_regexp` and `text` only feed the report raised when the
    /// choice is ambiguous.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::AmbiguousParameterType`] when
    /// several types share `regexp` and none of them is preferential. The
    /// report suggests Cucumber Expressions generated from `text`.
    pub fn lookup_by_regexp(
        &self,
        regexp: &str,
        expression_regexp: &str,
        text: &str,
    ) -> Result<Option<&Arc<ParameterType>>, CucumberExpressionError> {
        let Some(bucket) = self.by_regexp.get(regexp) else {
            return Ok(None);
        };
        let first = bucket.first();
        if bucket.len() > 1 && !first.is_some_and(|p| p.prefer_for_regexp_match()) {
            let generated_expressions = CucumberExpressionGenerator::new(self)
                .generate_expressions(text)
                .iter()
                .map(|generated| generated.source())
                .collect();
            let ambiguity = Ambiguity {
                parameter_type_regexp: regexp.to_string(),
                expression_regexp: expression_regexp.to_string(),
                parameter_type_names: bucket.iter().map(|p| p.name().to_string()).collect(),
                generated_expressions,
            };
            let error = CucumberExpressionError::AmbiguousParameterType(Box::new(ambiguity));
            return Err(error);
        }
        Ok(first)
    }

    /// Registered parameter types in definition order.
    pub fn parameter_types(&self) -> impl Iterator<Item = &Arc<ParameterType>> {
        self.ordered.iter()
    }
}

impl Default for ParameterTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
