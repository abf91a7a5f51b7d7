//! Expressions given as plain regular expressions.

use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use super::Expression;
use crate::argument::Argument;
use crate::errors::{CucumberExpressionError, invalid_regex};
use crate::parameter_type::ParameterType;
use crate::registry::ParameterTypeRegistry;
use crate::tree_regex::TreeRegex;

/// A regular expression whose capture groups become arguments.
///
/// Each top-level capture group is interpreted by the parameter type that
/// registered the same regexp source; groups nobody registered are returned
/// as text.
///
/// # Examples
/// ```
/// use cucumber_expressions::{Expression, ParameterTypeRegistry, RegularExpression};
/// let registry = ParameterTypeRegistry::new();
/// let regex = regex::Regex::new(r"^I have (-?\d+) cukes in my (\w+)$")
///     .unwrap_or_else(|err| panic!("regex should compile: {err}"));
/// let expression = RegularExpression::new(regex, &registry)
///     .unwrap_or_else(|err| panic!("expression should build: {err}"));
/// let args = expression
///     .match_text("I have 7 cukes in my belly")
///     .unwrap_or_else(|err| panic!("match should succeed: {err}"))
///     .unwrap_or_else(|| panic!("text should match"));
/// assert!(matches!(args.first().map(|a| a.value::<i32>()), Some(Ok(Some(7)))));
/// assert!(matches!(args.get(1).map(|a| a.value::<String>()), Some(Ok(Some(ref s))) if s == "belly"));
/// ```
#[derive(Debug, Clone)]
pub struct RegularExpression<'r> {
    flags: String,
    tree_regex: TreeRegex,
    registry: &'r ParameterTypeRegistry,
}

impl<'r> RegularExpression<'r> {
    /// Wrap a compiled regex.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::NamedCaptureGroup`] when the regex
    /// holds named groups and those are configured to be rejected.
    pub fn new(
        regex: Regex,
        registry: &'r ParameterTypeRegistry,
    ) -> Result<Self, CucumberExpressionError> {
        Self::build(regex, String::new(), registry)
    }

    /// Compile `source` with single-letter `flags`: `i` (case-insensitive),
    /// `m` (multi-line), `s` (dot matches new line), `x` (verbose) and `U`
    /// (swap greed).
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::UnsupportedRegexFlag`] for any
    /// other flag and [`CucumberExpressionError::InvalidRegex`] when the
    /// source does not compile.
    pub fn with_flags(
        source: &str,
        flags: &str,
        registry: &'r ParameterTypeRegistry,
    ) -> Result<Self, CucumberExpressionError> {
        let mut builder = RegexBuilder::new(source);
        for flag in flags.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'x' => builder.ignore_whitespace(true),
                'U' => builder.swap_greed(true),
                _ => {
                    return Err(CucumberExpressionError::UnsupportedRegexFlag {
                        flag,
                        pattern: source.to_string(),
                    });
                }
            };
        }
        let regex = builder.build().map_err(|err| invalid_regex(source, err))?;
        Self::build(regex, flags.to_string(), registry)
    }

    fn build(
        regex: Regex,
        flags: String,
        registry: &'r ParameterTypeRegistry,
    ) -> Result<Self, CucumberExpressionError> {
        let tree_regex = TreeRegex::from_regex(regex)?;
        log::debug!(
            "wrapped /{}/{flags} with {} top-level groups",
            tree_regex.regex().as_str(),
            tree_regex.group_builder().children().len()
        );
        Ok(Self {
            flags,
            tree_regex,
            registry,
        })
    }

    /// Flags the regex was compiled with; empty for [`RegularExpression::new`].
    #[must_use]
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// The tree regex used for matching.
    #[must_use]
    pub fn tree_regex(&self) -> &TreeRegex {
        &self.tree_regex
    }

    /// Resolve one parameter type per top-level capture group.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::AmbiguousParameterType`] when a
    /// group's regexp is shared by several non-preferential types; the report
    /// suggests expressions generated from `text`.
    pub fn parameter_types(
        &self,
        text: &str,
    ) -> Result<Vec<Arc<ParameterType>>, CucumberExpressionError> {
        let source = self.tree_regex.regex().as_str();
        self.tree_regex
            .group_builder()
            .children()
            .iter()
            .map(|group| {
                let regexp = group.source();
                let found = self.registry.lookup_by_regexp(regexp, source, text)?;
                Ok(found.map_or_else(
                    || Arc::new(ParameterType::anonymous_for(regexp)),
                    Arc::clone,
                ))
            })
            .collect()
    }
}

impl Expression for RegularExpression<'_> {
    fn source(&self) -> &str {
        self.tree_regex.regex().as_str()
    }

    fn regex(&self) -> &Regex {
        self.tree_regex.regex()
    }

    fn match_text(&self, text: &str) -> Result<Option<Vec<Argument>>, CucumberExpressionError> {
        let Some(group) = self.tree_regex.match_text(text) else {
            return Ok(None);
        };
        let parameter_types = self.parameter_types(text)?;
        let group_counts = vec![1; parameter_types.len()];
        Argument::build(group, &parameter_types, &group_counts, text).map(Some)
    }
}
