//! Cucumber Expressions: a readable alternative to regular expressions for
//! matching step text.
//!
//! An expression such as `I have {int} cuke(s)` is tokenized, parsed into a
//! syntax tree, and compiled into an anchored regular expression. Parameters
//! like `{int}` resolve against a [`ParameterTypeRegistry`], which pairs each
//! parameter type with its regexps and a transformer producing typed values.
//! Matching goes through a [`TreeRegex`] so that nested capture groups are
//! reported as a tree and grouped into one [`Argument`] per parameter.
//!
//! The crate also works in reverse: [`CucumberExpressionGenerator`] suggests
//! expressions for plain step text, which is how step definition snippets
//! are produced.
//!
//! # Examples
//! ```
//! use cucumber_expressions::{CucumberExpression, Expression, ParameterTypeRegistry};
//!
//! let registry = ParameterTypeRegistry::new();
//! let expression = CucumberExpression::new("I have {int} cuke(s) in my {word}", &registry)
//!     .unwrap_or_else(|err| panic!("expression should compile: {err}"));
//! let args = expression
//!     .match_text("I have 42 cukes in my belly")
//!     .unwrap_or_else(|err| panic!("match should succeed: {err}"))
//!     .unwrap_or_else(|| panic!("text should match"));
//! assert!(matches!(args.first().map(|a| a.value::<i32>()), Some(Ok(Some(42)))));
//! ```

mod argument;
mod ast;
mod builtin;
pub mod config;
mod errors;
mod expression;
mod generator;
mod parameter_type;
mod pattern;
mod registry;
#[cfg(feature = "json")]
mod serialization;
mod tree_regex;

pub use argument::Argument;
pub use ast::{Node, NodeContent, NodeType, Token, TokenType};
pub use builtin::{ANONYMOUS_REGEXP, INTEGER_REGEXPS, STRING_REGEXPS, WORD_REGEXP, float_regexp};
pub use config::{
    NamedGroupPolicy, NumberFormat, clear_named_group_policy_override, named_group_policy,
    set_named_group_policy,
};
pub use errors::{Ambiguity, BoxError, CucumberExpressionError, Diagnostic, ErrorKind};
pub use expression::{
    AnyExpression, CucumberExpression, Expression, ExpressionFactory, RegularExpression,
};
pub use generator::{
    CombinatorialGeneratedExpressionFactory, CucumberExpressionGenerator, GeneratedExpression,
    MAX_EXPRESSIONS, ParameterInfo,
};
pub use parameter_type::{ParameterType, TransformedValue, Transformer};
pub use pattern::{CompiledExpression, compile, parse, tokenize};
pub use registry::ParameterTypeRegistry;
#[cfg(feature = "json")]
pub use serialization::{ExpressionJson, ParameterTypeJson, ParameterTypeRegistryJson};
pub use tree_regex::{
    Group, GroupBuilder, TreeRegex, create_group_builder, remove_capture_groups,
    remove_inner_capture_groups,
};
