//! Cucumber Expression lexing, parsing, and compilation.

mod compiler;
mod lexer;
mod parser;

pub use compiler::{CompiledExpression, compile};
pub use lexer::tokenize;
pub use parser::parse;
