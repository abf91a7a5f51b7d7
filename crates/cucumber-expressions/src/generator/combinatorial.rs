//! Expansion of per-slot parameter type choices into concrete expressions.

use std::sync::Arc;

use super::generated::GeneratedExpression;
use crate::parameter_type::ParameterType;

/// Upper bound on the number of expressions generated for one text.
pub const MAX_EXPRESSIONS: usize = 256;

/// Enumerates every combination of parameter types for a template, slot by
/// slot, stopping at [`MAX_EXPRESSIONS`].
#[derive(Debug)]
pub struct CombinatorialGeneratedExpressionFactory {
    template: String,
    combinations: Vec<Vec<Arc<ParameterType>>>,
}

impl CombinatorialGeneratedExpressionFactory {
    /// Create a factory for `template`, whose `n`th slot may hold any type in
    /// `combinations[n]`.
    #[must_use]
    pub fn new(template: impl Into<String>, combinations: Vec<Vec<Arc<ParameterType>>>) -> Self {
        Self {
            template: template.into(),
            combinations,
        }
    }

    /// Generate the expressions depth first, in slot order.
    #[must_use]
    pub fn generate_expressions(&self) -> Vec<GeneratedExpression> {
        let mut generated = Vec::new();
        let mut current = Vec::with_capacity(self.combinations.len());
        self.permute(&mut generated, &mut current);
        if generated.len() >= MAX_EXPRESSIONS {
            log::trace!(
                "stopped generating expressions for `{}` at {MAX_EXPRESSIONS}",
                self.template
            );
        }
        generated
    }

    fn permute(
        &self,
        generated: &mut Vec<GeneratedExpression>,
        current: &mut Vec<Arc<ParameterType>>,
    ) {
        if generated.len() >= MAX_EXPRESSIONS {
            return;
        }
        let Some(choices) = self.combinations.get(current.len()) else {
            let expression = GeneratedExpression::new(self.template.clone(), current.clone());
            generated.push(expression);
            return;
        };
        for choice in choices {
            if generated.len() >= MAX_EXPRESSIONS {
                return;
            }
            current.push(Arc::clone(choice));
            self.permute(generated, current);
            current.pop();
        }
    }
}
