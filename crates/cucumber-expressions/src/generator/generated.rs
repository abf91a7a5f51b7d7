//! Cucumber Expressions suggested for a piece of step text.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::parameter_type::ParameterType;

/// Names that cannot be used verbatim as generated parameter names: Rust
/// keywords and primitive type names common to step definition languages.
const RESERVED_NAMES: &[&str] = &[
    "as", "async", "await", "bool", "boolean", "break", "byte", "char", "const", "continue",
    "crate", "decimal", "double", "dyn", "else", "enum", "extern", "f32", "f64", "false", "float",
    "fn", "for", "i8", "i16", "i32", "i64", "i128", "if", "impl", "in", "int", "isize", "let",
    "long", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "self", "short",
    "static", "str", "string", "struct", "super", "trait", "true", "type", "u8", "u16", "u32",
    "u64", "u128", "unsafe", "use", "usize", "where", "while",
];

/// Description of one parameter of a [`GeneratedExpression`], for building
/// step definition snippets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    /// Name of the Rust type the parameter type produces.
    pub type_name: &'static str,
    /// Name of the parameter type.
    pub name: String,
    /// How many times the parameter type has been used so far, this one
    /// included.
    pub count: usize,
}

/// A suggested Cucumber Expression together with the parameter types filling
/// its slots.
#[derive(Debug, Clone)]
pub struct GeneratedExpression {
    template: String,
    parameter_types: Vec<Arc<ParameterType>>,
}

impl GeneratedExpression {
    /// Pair a template with one parameter type per placeholder.
    ///
    /// In the template `{{` and `}}` stand for literal braces and `{n}` for
    /// the `n`th slot.
    #[must_use]
    pub fn new(template: impl Into<String>, parameter_types: Vec<Arc<ParameterType>>) -> Self {
        Self {
            template: template.into(),
            parameter_types,
        }
    }

    /// The expression template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The Cucumber Expression source with every slot filled in.
    ///
    /// # Examples
    /// ```
    /// use cucumber_expressions::{CucumberExpressionGenerator, ParameterTypeRegistry};
    /// let registry = ParameterTypeRegistry::new();
    /// let generated = CucumberExpressionGenerator::new(&registry).generate_expressions("I have 3 cukes");
    /// assert_eq!(generated.first().map(|g| g.source()).as_deref(), Some("I have {int} cukes"));
    /// ```
    #[must_use]
    pub fn source(&self) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut chars = self.template.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let mut index = String::new();
                    for digit in chars.by_ref() {
                        if digit == '}' {
                            break;
                        }
                        index.push(digit);
                    }
                    let name = index
                        .parse::<usize>()
                        .ok()
                        .and_then(|i| self.parameter_types.get(i))
                        .map_or("", |p| p.name());
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
                _ => out.push(ch),
            }
        }
        out
    }

    /// The parameter types, one per slot.
    #[must_use]
    pub fn parameter_types(&self) -> &[Arc<ParameterType>] {
        &self.parameter_types
    }

    /// Unique argument names for a step definition snippet.
    ///
    /// Repeated names get a numeric suffix from their second use; reserved
    /// names such as `int` are suffixed from the first.
    #[must_use]
    pub fn parameter_names(&self) -> Vec<String> {
        let mut usage = HashMap::new();
        self.parameter_types
            .iter()
            .map(|p| parameter_name(p.name(), &mut usage))
            .collect()
    }

    /// Type, name and running use count of every parameter.
    #[must_use]
    pub fn parameter_infos(&self) -> Vec<ParameterInfo> {
        let mut usage: HashMap<&str, usize> = HashMap::new();
        self.parameter_types
            .iter()
            .map(|p| {
                let count = usage.entry(p.name()).or_default();
                *count += 1;
                ParameterInfo {
                    type_name: p.type_name(),
                    name: p.name().to_string(),
                    count: *count,
                }
            })
            .collect()
    }
}

fn parameter_name<'a>(name: &'a str, usage: &mut HashMap<&'a str, usize>) -> String {
    let count = usage.entry(name).or_default();
    *count += 1;
    if *count == 1 && !RESERVED_NAMES.contains(&name) {
        name.to_string()
    } else {
        format!("{name}{count}")
    }
}
