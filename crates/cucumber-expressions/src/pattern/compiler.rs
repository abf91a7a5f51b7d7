//! Compile an expression syntax tree into an anchored regular expression.

use std::sync::Arc;

use crate::ast::{Node, NodeType};
use crate::builtin::STRING_TYPE_NAME;
use crate::config::NamedGroupPolicy;
use crate::errors::{CucumberExpressionError, Diagnostic};
use crate::parameter_type::ParameterType;
use crate::registry::ParameterTypeRegistry;
use crate::tree_regex::{create_group_builder, remove_capture_groups, remove_inner_capture_groups};

/// Regular expression source compiled from a Cucumber Expression.
#[derive(Debug, Clone)]
pub struct CompiledExpression {
    /// Anchored regular expression source.
    pub pattern: String,
    /// Parameter types in the order their parameters appear.
    pub parameter_types: Vec<Arc<ParameterType>>,
    /// Number of top-level capture groups each parameter contributes.
    pub group_counts: Vec<usize>,
}

/// Compile the syntax tree `ast` of `expression`, resolving parameters in
/// `registry`.
///
/// # Errors
/// Returns [`CucumberExpressionError::UndefinedParameterType`] when a
/// parameter names a type the registry does not know.
///
/// # Examples
/// ```
/// use cucumber_expressions::{ParameterTypeRegistry, compile, parse};
/// let registry = ParameterTypeRegistry::new();
/// let expression = "I have {int} cuke(s)";
/// let ast = parse(expression).unwrap_or_else(|err| panic!("should parse: {err}"));
/// let compiled = compile(&ast, expression, &registry)
///     .unwrap_or_else(|err| panic!("should compile: {err}"));
/// assert_eq!(compiled.pattern, r"^I have ((?:-?\d+)|(?:\d+)) cuke(?:s)?$");
/// assert_eq!(compiled.group_counts, [1]);
/// ```
pub fn compile(
    ast: &Node,
    expression: &str,
    registry: &ParameterTypeRegistry,
) -> Result<CompiledExpression, CucumberExpressionError> {
    let mut compiler = Compiler {
        expression,
        registry,
        parameter_types: Vec::new(),
        group_counts: Vec::new(),
    };
    let mut pattern = String::from("^");
    compiler.write_node(ast, &mut pattern)?;
    pattern.push('$');
    Ok(CompiledExpression {
        pattern,
        parameter_types: compiler.parameter_types,
        group_counts: compiler.group_counts,
    })
}

struct Compiler<'a> {
    expression: &'a str,
    registry: &'a ParameterTypeRegistry,
    parameter_types: Vec<Arc<ParameterType>>,
    group_counts: Vec<usize>,
}

impl Compiler<'_> {
    fn write_node(&mut self, node: &Node, out: &mut String) -> Result<(), CucumberExpressionError> {
        match node.kind {
            NodeType::Text => {
                push_escaped(out, node.token().unwrap_or_default());
                Ok(())
            }
            NodeType::Optional => {
                out.push_str("(?:");
                self.write_children(node, out)?;
                out.push_str(")?");
                Ok(())
            }
            NodeType::Alternation => {
                out.push_str("(?:");
                for (i, alternative) in node.nodes().iter().enumerate() {
                    if i > 0 {
                        out.push('|');
                    }
                    self.write_node(alternative, out)?;
                }
                out.push(')');
                Ok(())
            }
            NodeType::Alternative | NodeType::Expression => self.write_children(node, out),
            NodeType::Parameter => self.write_parameter(node, out),
        }
    }

    fn write_children(
        &mut self,
        node: &Node,
        out: &mut String,
    ) -> Result<(), CucumberExpressionError> {
        node.nodes()
            .iter()
            .try_for_each(|child| self.write_node(child, out))
    }

    fn write_parameter(
        &mut self,
        node: &Node,
        out: &mut String,
    ) -> Result<(), CucumberExpressionError> {
        let name = node.inner_text();
        let Some(parameter_type) = self.registry.lookup_by_type_name(&name) else {
            let diagnostic = Diagnostic::located(
                self.expression,
                node.start,
                node.end,
                &format!("Undefined parameter type '{name}'"),
                &format!("Please register a ParameterType for '{name}'"),
            );
            return Err(CucumberExpressionError::UndefinedParameterType { name, diagnostic });
        };

        let (fragment, group_count) = if is_quoted_string(parameter_type) {
            let inner = parameter_type
                .regexps()
                .iter()
                .map(|regexp| remove_inner_capture_groups(regexp))
                .collect::<Result<Vec<_>, _>>()?;
            let fragment = format!("(?:{})", join_alternatives(&inner));
            let group_count = create_group_builder(&fragment, NamedGroupPolicy::Capture)?
                .children()
                .len();
            (fragment, group_count)
        } else {
            let flattened = parameter_type
                .regexps()
                .iter()
                .map(|regexp| remove_capture_groups(regexp))
                .collect::<Result<Vec<_>, _>>()?;
            (format!("({})", join_alternatives(&flattened)), 1)
        };

        out.push_str(&fragment);
        self.parameter_types.push(Arc::clone(parameter_type));
        self.group_counts.push(group_count);
        Ok(())
    }
}

fn is_quoted_string(parameter_type: &ParameterType) -> bool {
    parameter_type.is_builtin() && parameter_type.name() == STRING_TYPE_NAME
}

/// A single regexp is used as is; several are each wrapped non-capturing
/// and joined with `|`.
fn join_alternatives(regexps: &[String]) -> String {
    match regexps {
        [single] => single.clone(),
        _ => regexps
            .iter()
            .map(|regexp| format!("(?:{regexp})"))
            .collect::<Vec<_>>()
            .join("|"),
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        if matches!(
            ch,
            '\\' | '^' | '[' | '(' | '{' | '$' | '.' | '|' | '?' | '*' | '+' | '}' | ')' | ']'
        ) {
            out.push('\\');
        }
        out.push(ch);
    }
}
