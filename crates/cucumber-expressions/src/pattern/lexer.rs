//! Expression lexer converting expression strings into typed tokens.

use crate::ast::{Token, TokenType};
use crate::errors::{CucumberExpressionError, Diagnostic};

const ESCAPE_CHARACTER: char = '\\';

/// Split a Cucumber Expression into tokens.
///
/// The result always starts with a [`TokenType::StartOfLine`] token and ends
/// with a [`TokenType::EndOfLine`] token. Offsets are counted in characters.
///
/// # Errors
/// Returns [`CucumberExpressionError::CantEscape`] when a `\` precedes a
/// character that cannot be escaped, and
/// [`CucumberExpressionError::EndOfLineCannotBeEscaped`] when the expression
/// ends with a lone `\`.
///
/// # Examples
/// ```
/// use cucumber_expressions::{TokenType, tokenize};
/// let tokens = tokenize("a b").unwrap_or_else(|err| panic!("should tokenize: {err}"));
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     [
///         TokenType::StartOfLine,
///         TokenType::Text,
///         TokenType::WhiteSpace,
///         TokenType::Text,
///         TokenType::EndOfLine,
///     ]
/// );
/// ```
pub fn tokenize(expression: &str) -> Result<Vec<Token>, CucumberExpressionError> {
    Lexer::new(expression).run()
}

struct Lexer<'a> {
    expression: &'a str,
    tokens: Vec<Token>,
    buffer: String,
    buffer_len: usize,
    buffer_start: usize,
    escaped: usize,
    previous: TokenType,
}

impl<'a> Lexer<'a> {
    fn new(expression: &'a str) -> Self {
        Self {
            expression,
            tokens: Vec::new(),
            buffer: String::new(),
            buffer_len: 0,
            buffer_start: 0,
            escaped: 0,
            previous: TokenType::StartOfLine,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, CucumberExpressionError> {
        let start_of_line = Token::new(TokenType::StartOfLine, "", 0, 0);
        self.tokens.push(start_of_line);
        let mut treat_as_text = false;

        for ch in self.expression.chars() {
            if !treat_as_text && ch == ESCAPE_CHARACTER {
                self.escaped += 1;
                treat_as_text = true;
                continue;
            }
            let kind = self.token_type_of(ch, treat_as_text)?;
            treat_as_text = false;

            let continues = kind.merges() && kind == self.previous;
            if self.previous != TokenType::StartOfLine && !continues {
                self.flush();
            }
            self.previous = kind;
            self.buffer.push(ch);
            self.buffer_len += 1;
        }

        if self.buffer_len > 0 {
            self.flush();
        }
        if treat_as_text {
            return Err(self.end_of_line_cannot_be_escaped());
        }
        let end = self.buffer_start;
        let end_of_line = Token::new(TokenType::EndOfLine, "", end, end);
        self.tokens.push(end_of_line);
        Ok(self.tokens)
    }

    fn token_type_of(
        &self,
        ch: char,
        treat_as_text: bool,
    ) -> Result<TokenType, CucumberExpressionError> {
        if !treat_as_text {
            return Ok(TokenType::of(ch));
        }
        if TokenType::can_escape(ch) {
            return Ok(TokenType::Text);
        }
        let index = self.buffer_start + self.buffer_len + self.escaped;
        let diagnostic = Diagnostic::at(
            self.expression,
            index,
            "Only the characters '{', '}', '(', ')', '\\', '/' and whitespace can be escaped",
            "If you did mean to use an '\\' you can use '\\\\' to escape it",
        );
        Err(CucumberExpressionError::CantEscape(diagnostic))
    }

    fn flush(&mut self) {
        let escaped = if self.previous == TokenType::Text {
            std::mem::take(&mut self.escaped)
        } else {
            0
        };
        let end = self.buffer_start + self.buffer_len + escaped;
        let buffer = std::mem::take(&mut self.buffer);
        let token = Token::new(self.previous, buffer, self.buffer_start, end);
        self.tokens.push(token);
        self.buffer_len = 0;
        self.buffer_start = end;
    }

    fn end_of_line_cannot_be_escaped(&self) -> CucumberExpressionError {
        let index = self.expression.chars().count().saturating_sub(1);
        let diagnostic = Diagnostic::at(
            self.expression,
            index,
            "The end of line can not be escaped",
            "You can use '\\\\' to escape the '\\'",
        );
        CucumberExpressionError::EndOfLineCannotBeEscaped(diagnostic)
    }
}
