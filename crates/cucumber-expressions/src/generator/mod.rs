//! Suggests Cucumber Expressions for plain step text.
//!
//! The generator scans the text for whole-word matches of every parameter
//! type flagged for snippets. At each step the earliest, longest and heaviest
//! match wins; all parameter types tied for that match form one slot of the
//! expression template. Slots are then expanded combinatorially.

mod combinatorial;
mod generated;
mod matcher;

use std::sync::Arc;

use crate::parameter_type::ParameterType;
use crate::registry::ParameterTypeRegistry;

pub use combinatorial::{CombinatorialGeneratedExpressionFactory, MAX_EXPRESSIONS};
pub use generated::{GeneratedExpression, ParameterInfo};
use matcher::{Candidate, ParameterTypeMatcher};

/// Generates Cucumber Expressions from example text.
///
/// # Examples
/// ```
/// use cucumber_expressions::{CucumberExpressionGenerator, ParameterTypeRegistry};
/// let registry = ParameterTypeRegistry::new();
/// let generator = CucumberExpressionGenerator::new(&registry);
/// let sources: Vec<_> = generator
///     .generate_expressions("I have 2 cukes and 1.5 euro")
///     .iter()
///     .map(|g| g.source())
///     .collect();
/// assert_eq!(sources, ["I have {int} cukes and {float} euro"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CucumberExpressionGenerator<'r> {
    registry: &'r ParameterTypeRegistry,
}

impl<'r> CucumberExpressionGenerator<'r> {
    /// Create a generator drawing parameter types from `registry`.
    #[must_use]
    pub fn new(registry: &'r ParameterTypeRegistry) -> Self {
        Self { registry }
    }

    /// Suggest up to [`MAX_EXPRESSIONS`] expressions matching `text`.
    #[must_use]
    pub fn generate_expressions(&self, text: &str) -> Vec<GeneratedExpression> {
        let matchers: Vec<_> = self
            .registry
            .parameter_types()
            .filter(|p| p.use_for_snippets())
            .flat_map(ParameterTypeMatcher::for_type)
            .collect();

        let mut template = String::new();
        let mut combinations = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            let mut candidates: Vec<Candidate> = matchers
                .iter()
                .filter_map(|m| m.find_from(text, pos))
                .collect();
            candidates.sort_by(Candidate::rank);
            let Some(best) = candidates.first().cloned() else {
                break;
            };
            let mut slot: Vec<Arc<ParameterType>> = Vec::new();
            for candidate in candidates.iter().take_while(|c| c.rank(&best).is_eq()) {
                let parameter_type = &candidate.parameter_type;
                if !slot.iter().any(|p| Arc::ptr_eq(p, parameter_type)) {
                    slot.push(Arc::clone(parameter_type));
                }
            }
            slot.sort_by(|a, b| a.compare(b));

            push_escaped(&mut template, text.get(pos..best.start).unwrap_or_default());
            template.push_str(&format!("{{{}}}", combinations.len()));
            combinations.push(slot);
            pos = best.end;
        }
        push_escaped(&mut template, text.get(pos..).unwrap_or_default());

        CombinatorialGeneratedExpressionFactory::new(template, combinations).generate_expressions()
    }
}

/// Append `text` to a template so that it reads back as literal expression
/// text.
fn push_escaped(template: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '\\' => template.push_str(r"\\"),
            '(' => template.push_str(r"\("),
            '{' => template.push_str(r"\{{"),
            '}' => template.push_str("}}"),
            '/' => template.push_str(r"\/"),
            _ => template.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a(b)", r"a\(b)")]
    #[case("{x}", r"\{{x}}")]
    #[case("1/2", r"1\/2")]
    #[case(r"a\b", r"a\\b")]
    fn escapes_template_text(#[case] text: &str, #[case] expected: &str) {
        let mut template = String::new();
        push_escaped(&mut template, text);
        assert_eq!(template, expected);
    }

    #[test]
    fn plain_text_has_no_slots() {
        let registry = ParameterTypeRegistry::new();
        let generated = CucumberExpressionGenerator::new(&registry).generate_expressions("hello");
        let Some(only) = generated.first() else {
            panic!("expected one expression");
        };
        assert_eq!(generated.len(), 1);
        assert_eq!(only.source(), "hello");
        assert!(only.parameter_types().is_empty());
    }

    #[test]
    fn empty_text_yields_empty_expression() {
        let registry = ParameterTypeRegistry::new();
        let generated = CucumberExpressionGenerator::new(&registry).generate_expressions("");
        let sources: Vec<_> = generated.iter().map(GeneratedExpression::source).collect();
        assert_eq!(sources, [""]);
    }
}
