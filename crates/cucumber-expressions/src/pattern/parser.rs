//! Recursive-descent parser assembling tokens into an expression tree.
//!
//! Each grammar rule inspects the token at the current position and reports
//! how many tokens it consumed. A rule that does not apply consumes nothing,
//! which lets the caller try the next rule in priority order. Genuine syntax
//! problems are reported as [`CucumberExpressionError`]s.
//!
//! Once the tree is complete it is validated top-down, so an outer optional or
//! alternation reports its problem before anything nested inside it.

use crate::ast::{Node, NodeType, Token, TokenType};
use crate::errors::{CucumberExpressionError, Diagnostic};

use super::lexer::tokenize;

#[derive(Debug, Clone, Copy)]
enum Rule {
    Text,
    Name,
    Parameter,
    Optional,
    Alternation,
    AlternativeSeparator,
}

const EXPRESSION_RULES: &[Rule] = &[
    Rule::Alternation,
    Rule::Optional,
    Rule::Parameter,
    Rule::Text,
];
const OPTIONAL_RULES: &[Rule] = &[Rule::Optional, Rule::Parameter, Rule::Text];
const PARAMETER_RULES: &[Rule] = &[Rule::Name];
const ALTERNATIVE_RULES: &[Rule] = &[
    Rule::AlternativeSeparator,
    Rule::Optional,
    Rule::Parameter,
    Rule::Text,
];

#[derive(Debug, Default)]
struct Parsed {
    consumed: usize,
    nodes: Vec<Node>,
}

impl Parsed {
    fn none() -> Self {
        Self::default()
    }

    fn one(consumed: usize, node: Node) -> Self {
        Self {
            consumed,
            nodes: vec![node],
        }
    }
}

/// Parse a Cucumber Expression into its syntax tree.
///
/// The returned root is always a [`NodeType::Expression`] node spanning the
/// whole input.
///
/// # Errors
/// Returns a [`CucumberExpressionError`] describing the first syntax problem
/// found, such as an unterminated optional or an empty alternative.
///
/// # Examples
/// ```
/// use cucumber_expressions::{NodeType, parse};
/// let ast = parse("I have {int} cuke(s)")
///     .unwrap_or_else(|err| panic!("expression should parse: {err}"));
/// assert_eq!(ast.kind, NodeType::Expression);
/// assert_eq!(ast.nodes().len(), 8);
/// ```
pub fn parse(expression: &str) -> Result<Node, CucumberExpressionError> {
    let tokens = tokenize(expression)?;
    let parser = Parser {
        expression,
        tokens: &tokens,
    };
    let parsed = parser.parse_between(
        NodeType::Expression,
        TokenType::StartOfLine,
        TokenType::EndOfLine,
        EXPRESSION_RULES,
        0,
    )?;
    let root = parsed
        .nodes
        .into_iter()
        .next()
        .unwrap_or_else(|| Node::branch(NodeType::Expression, Vec::new(), 0, 0));
    parser.validate(&root)?;
    Ok(root)
}

struct Parser<'a> {
    expression: &'a str,
    tokens: &'a [Token],
}

impl Parser<'_> {
    fn apply(&self, rule: Rule, current: usize) -> Result<Parsed, CucumberExpressionError> {
        match rule {
            Rule::Text => self.parse_text(current),
            Rule::Name => self.parse_name(current),
            Rule::Parameter => self.parse_between(
                NodeType::Parameter,
                TokenType::BeginParameter,
                TokenType::EndParameter,
                PARAMETER_RULES,
                current,
            ),
            Rule::Optional => self.parse_between(
                NodeType::Optional,
                TokenType::BeginOptional,
                TokenType::EndOptional,
                OPTIONAL_RULES,
                current,
            ),
            Rule::Alternation => self.parse_alternation(current),
            Rule::AlternativeSeparator => Ok(self.parse_separator(current)),
        }
    }

    fn parse_text(&self, current: usize) -> Result<Parsed, CucumberExpressionError> {
        let Some(token) = self.tokens.get(current) else {
            return Ok(Parsed::none());
        };
        match token.kind {
            TokenType::WhiteSpace
            | TokenType::Text
            | TokenType::EndParameter
            | TokenType::EndOptional => Ok(Parsed::one(1, text_node(token))),
            TokenType::Alternation => {
                let diagnostic = self.located(
                    token.start,
                    token.end,
                    "An alternation can not be used inside an optional",
                    "If you did not mean to use an alternation you can use '\\/' to escape \
                     the '/'. Otherwise rephrase your expression or consider using a regular \
                     expression instead.",
                );
                let error = CucumberExpressionError::AlternationNotAllowedInOptional(diagnostic);
                Err(error)
            }
            TokenType::StartOfLine
            | TokenType::EndOfLine
            | TokenType::BeginOptional
            | TokenType::BeginParameter => Ok(Parsed::none()),
        }
    }

    fn parse_name(&self, current: usize) -> Result<Parsed, CucumberExpressionError> {
        let Some(token) = self.tokens.get(current) else {
            return Ok(Parsed::none());
        };
        match token.kind {
            TokenType::WhiteSpace | TokenType::Text => Ok(Parsed::one(1, text_node(token))),
            TokenType::BeginOptional
            | TokenType::EndOptional
            | TokenType::BeginParameter
            | TokenType::EndParameter
            | TokenType::Alternation => {
                let diagnostic = self.located(
                    token.start,
                    token.end,
                    "Parameter names may not contain '{', '}', '(', ')', '\\' or '/'",
                    "Did you mean to use a regular expression?",
                );
                let error = CucumberExpressionError::InvalidParameterTypeNameInExpression;
                Err(error(diagnostic))
            }
            TokenType::StartOfLine | TokenType::EndOfLine => Ok(Parsed::none()),
        }
    }

    fn parse_separator(&self, current: usize) -> Parsed {
        match self.tokens.get(current) {
            Some(token) if token.kind == TokenType::Alternation => {
                let separator = Node::leaf(
                    NodeType::Alternative,
                    token.text.clone(),
                    token.start,
                    token.end,
                );
                Parsed::one(1, separator)
            }
            _ => Parsed::none(),
        }
    }

    fn parse_between(
        &self,
        kind: NodeType,
        begin: TokenType,
        end: TokenType,
        rules: &[Rule],
        current: usize,
    ) -> Result<Parsed, CucumberExpressionError> {
        if !self.looking_at(Some(current), begin) {
            return Ok(Parsed::none());
        }
        let mut sub_current = current + 1;
        let inner = self.parse_tokens_until(rules, sub_current, &[end, TokenType::EndOfLine])?;
        sub_current += inner.consumed;

        if !self.looking_at(Some(sub_current), end) {
            return Err(self.missing_end_token(begin, end, current));
        }
        let node = Node::branch(
            kind,
            inner.nodes,
            self.start_of(current),
            self.end_of(sub_current),
        );
        Ok(Parsed::one(sub_current + 1 - current, node))
    }

    fn parse_alternation(&self, current: usize) -> Result<Parsed, CucumberExpressionError> {
        let previous = current.checked_sub(1);
        if !self.looking_at_any(
            previous,
            &[
                TokenType::StartOfLine,
                TokenType::WhiteSpace,
                TokenType::EndParameter,
            ],
        ) {
            return Ok(Parsed::none());
        }

        let parsed = self.parse_tokens_until(
            ALTERNATIVE_RULES,
            current,
            &[
                TokenType::WhiteSpace,
                TokenType::EndOfLine,
                TokenType::BeginParameter,
            ],
        )?;
        if !parsed.nodes.iter().any(is_separator) {
            return Ok(Parsed::none());
        }

        let start = self.start_of(current);
        let end = self.start_of(current + parsed.consumed);
        let alternatives = split_alternatives(start, end, parsed.nodes);
        let alternation = Node::branch(NodeType::Alternation, alternatives, start, end);
        Ok(Parsed::one(parsed.consumed, alternation))
    }

    fn parse_tokens_until(
        &self,
        rules: &[Rule],
        start_at: usize,
        end_tokens: &[TokenType],
    ) -> Result<Parsed, CucumberExpressionError> {
        let mut current = start_at;
        let mut nodes = Vec::new();
        while current < self.tokens.len() {
            if self.looking_at_any(Some(current), end_tokens) {
                break;
            }
            let parsed = self.parse_token(rules, current)?;
            if parsed.consumed == 0 {
                // Each rule set consumes every token kind that can reach it.
                break;
            }
            current += parsed.consumed;
            nodes.extend(parsed.nodes);
        }
        Ok(Parsed {
            consumed: current - start_at,
            nodes,
        })
    }

    fn parse_token(
        &self,
        rules: &[Rule],
        current: usize,
    ) -> Result<Parsed, CucumberExpressionError> {
        for rule in rules {
            let parsed = self.apply(*rule, current)?;
            if parsed.consumed != 0 {
                return Ok(parsed);
            }
        }
        Ok(Parsed::none())
    }

    fn looking_at_any(&self, at: Option<usize>, kinds: &[TokenType]) -> bool {
        kinds.iter().any(|kind| self.looking_at(at, *kind))
    }

    fn looking_at(&self, at: Option<usize>, kind: TokenType) -> bool {
        let Some(at) = at else {
            // Everything before the first token reads as the start of the line.
            return kind == TokenType::StartOfLine;
        };
        self.tokens
            .get(at)
            .map_or(kind == TokenType::EndOfLine, |token| token.kind == kind)
    }

    fn start_of(&self, index: usize) -> usize {
        self.tokens
            .get(index)
            .map_or_else(|| self.expression.chars().count(), |token| token.start)
    }

    fn end_of(&self, index: usize) -> usize {
        self.tokens
            .get(index)
            .map_or_else(|| self.expression.chars().count(), |token| token.end)
    }

    fn located(&self, start: usize, end: usize, problem: &str, solution: &str) -> Diagnostic {
        Diagnostic::located(self.expression, start, end, problem, solution)
    }

    fn missing_end_token(
        &self,
        begin: TokenType,
        end: TokenType,
        current: usize,
    ) -> CucumberExpressionError {
        let begin_symbol = begin.symbol().map(String::from).unwrap_or_default();
        let end_symbol = end.symbol().map(String::from).unwrap_or_default();
        let purpose = begin.purpose().unwrap_or_default();
        let problem = format!("The '{begin_symbol}' does not have a matching '{end_symbol}'");
        let solution = format!(
            "If you did not intend to use {purpose} you can use '\\{begin_symbol}' to escape \
             the {purpose}"
        );
        let diagnostic = self.located(
            self.start_of(current),
            self.end_of(current),
            &problem,
            &solution,
        );
        CucumberExpressionError::MissingEndToken(diagnostic)
    }

    /// Check optionals and alternations, outermost first.
    fn validate(&self, node: &Node) -> Result<(), CucumberExpressionError> {
        if node.kind == NodeType::Optional {
            self.check_optional(node)?;
        } else if node.kind == NodeType::Alternation {
            for alternative in node.nodes() {
                self.check_alternative(alternative)?;
            }
        }
        for child in node.nodes() {
            self.validate(child)?;
        }
        Ok(())
    }

    fn check_optional(&self, optional: &Node) -> Result<(), CucumberExpressionError> {
        let children = optional.nodes();
        if let Some(parameter) = children.iter().find(|n| n.kind == NodeType::Parameter) {
            let diagnostic = self.located(
                parameter.start,
                parameter.end,
                "An optional may not contain a parameter type",
                "If you did not mean to use an parameter type you can use '\\{' to escape \
                 the '{'",
            );
            let error = CucumberExpressionError::ParameterNotAllowedInOptional(diagnostic);
            return Err(error);
        }
        if let Some(nested) = children.iter().find(|n| n.kind == NodeType::Optional) {
            let diagnostic = self.located(
                nested.start,
                nested.end,
                "An optional may not contain an other optional",
                "If you did not mean to use an optional type you can use '\\(' to escape \
                 the '('. For more complicated expressions consider using a regular \
                 expression instead.",
            );
            let error = CucumberExpressionError::OptionalNotAllowedInOptional(diagnostic);
            return Err(error);
        }
        if !children.iter().any(|n| n.kind == NodeType::Text) {
            let diagnostic = self.located(
                optional.start,
                optional.end,
                "An optional must contain some text",
                "If you did not mean to use an optional you can use '\\(' to escape the '('",
            );
            let error = CucumberExpressionError::OptionalMayNotBeEmpty(diagnostic);
            return Err(error);
        }
        Ok(())
    }

    fn check_alternative(&self, alternative: &Node) -> Result<(), CucumberExpressionError> {
        let children = alternative.nodes();
        if children.is_empty() {
            let diagnostic = self.located(
                alternative.start,
                alternative.end,
                "Alternative may not be empty",
                "If you did not mean to use an alternative you can use '\\/' to escape the '/'",
            );
            let error = CucumberExpressionError::AlternativeMayNotBeEmpty(diagnostic);
            return Err(error);
        }
        if !children.iter().any(|n| n.kind == NodeType::Text) {
            let diagnostic = self.located(
                alternative.start,
                alternative.end,
                "An alternative may not exclusively contain optionals",
                "If you did not mean to use an optional you can use '\\(' to escape the '('",
            );
            let error = CucumberExpressionError::AlternativeMayNotExclusivelyContainOptionals;
            return Err(error(diagnostic));
        }
        Ok(())
    }
}

fn text_node(token: &Token) -> Node {
    Node::leaf(NodeType::Text, token.text.clone(), token.start, token.end)
}

fn is_separator(node: &Node) -> bool {
    node.kind == NodeType::Alternative && node.token().is_some()
}

/// Group the nodes between `/` separators into alternative nodes.
fn split_alternatives(start: usize, end: usize, nodes: Vec<Node>) -> Vec<Node> {
    let mut separators: Vec<(usize, usize)> = Vec::new();
    let mut groups: Vec<Vec<Node>> = vec![Vec::new()];
    for node in nodes {
        if is_separator(&node) {
            separators.push((node.start, node.end));
            groups.push(Vec::new());
        } else if let Some(group) = groups.last_mut() {
            group.push(node);
        }
    }

    let last = groups.len().saturating_sub(1);
    groups
        .into_iter()
        .enumerate()
        .map(|(i, group)| {
            let left = i
                .checked_sub(1)
                .and_then(|prev| separators.get(prev))
                .map_or(start, |&(_, sep_end)| sep_end);
            let right = if i == last {
                end
            } else {
                separators.get(i).map_or(end, |&(sep_start, _)| sep_start)
            };
            Node::branch(NodeType::Alternative, group, left, right)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use rstest::rstest;

    fn parse_ok(expression: &str) -> Node {
        parse(expression).unwrap_or_else(|err| panic!("`{expression}` should parse: {err}"))
    }

    fn parse_err(expression: &str) -> CucumberExpressionError {
        match parse(expression) {
            Ok(ast) => panic!("expected parse error for `{expression}`, got {ast:?}"),
            Err(err) => err,
        }
    }

    fn text(token: &str, start: usize, end: usize) -> Node {
        Node::leaf(NodeType::Text, token, start, end)
    }

    #[test]
    fn parses_empty_expression() {
        assert_eq!(
            parse_ok(""),
            Node::branch(NodeType::Expression, vec![], 0, 0)
        );
    }

    #[test]
    fn parses_parameter() {
        let parameter = Node::branch(NodeType::Parameter, vec![text("int", 1, 4)], 0, 5);
        assert_eq!(
            parse_ok("{int}"),
            Node::branch(NodeType::Expression, vec![parameter], 0, 5)
        );
    }

    #[test]
    fn parses_optional_inside_a_word() {
        assert_eq!(
            parse_ok("cuke(s)"),
            Node::branch(
                NodeType::Expression,
                vec![
                    text("cuke", 0, 4),
                    Node::branch(NodeType::Optional, vec![text("s", 5, 6)], 4, 7),
                ],
                0,
                7,
            )
        );
    }

    #[test]
    fn parses_alternation_with_spans() {
        assert_eq!(
            parse_ok("mice/rats"),
            Node::branch(
                NodeType::Expression,
                vec![Node::branch(
                    NodeType::Alternation,
                    vec![
                        Node::branch(NodeType::Alternative, vec![text("mice", 0, 4)], 0, 4),
                        Node::branch(NodeType::Alternative, vec![text("rats", 5, 9)], 5, 9),
                    ],
                    0,
                    9,
                )],
                0,
                9,
            )
        );
    }

    #[test]
    fn alternation_stops_at_whitespace() {
        let ast = parse_ok("three mice/rats run");
        let kinds: Vec<_> = ast.nodes().iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            [
                NodeType::Text,
                NodeType::Text,
                NodeType::Alternation,
                NodeType::Text,
                NodeType::Text,
            ]
        );
    }

    #[test]
    fn alternation_may_follow_a_parameter() {
        let ast = parse_ok("{int}st/nd");
        assert_eq!(
            ast.nodes().get(1).map(|n| n.kind),
            Some(NodeType::Alternation)
        );
    }

    #[test]
    fn slash_inside_a_word_is_an_alternation_of_the_whole_word() {
        let ast = parse_ok("a/b(c)");
        let Some(alternation) = ast.nodes().first() else {
            panic!("expected an alternation");
        };
        assert_eq!(alternation.kind, NodeType::Alternation);
        let second = alternation.nodes().get(1).map(Node::nodes);
        assert_eq!(second.map(<[Node]>::len), Some(2));
    }

    #[test]
    fn stray_closing_tokens_are_text() {
        let ast = parse_ok("a) b}");
        assert!(ast.nodes().iter().all(|n| n.kind == NodeType::Text));
        assert_eq!(ast.text(), "a) b}");
    }

    #[rstest]
    #[case("I have {int} cuke(s)")]
    #[case("three blind/sighted mice")]
    #[case("a/b/c")]
    #[case("(a) b")]
    fn text_round_trips(#[case] expression: &str) {
        assert_eq!(parse_ok(expression).text(), expression);
    }

    #[test]
    fn reports_unterminated_optional_at_its_opening() {
        let err = parse_err("a (b");
        assert_eq!(err.kind(), ErrorKind::MissingEndToken);
        assert_eq!(err.diagnostic().map(|d| d.index), Some(2));
        assert_eq!(
            err.to_string(),
            "This Cucumber Expression has a problem at column 3:\n\na (b\n  ^\n\
             The '(' does not have a matching ')'.\n\
             If you did not intend to use optional text you can use '\\(' to escape the \
             optional text"
        );
    }

    #[test]
    fn reports_unterminated_parameter() {
        let err = parse_err("{int");
        assert_eq!(err.kind(), ErrorKind::MissingEndToken);
        let solution = "If you did not intend to use a parameter you can use '\\{' to escape \
                        the a parameter";
        assert!(err.to_string().ends_with(solution));
    }

    #[rstest]
    #[case("(a/b)", ErrorKind::AlternationNotAllowedInOptional, 2, "  ^")]
    #[case("{a(b}", ErrorKind::InvalidParameterTypeName, 2, "  ^")]
    #[case("({int})", ErrorKind::ParameterNotAllowedInOptional, 1, " ^---^")]
    #[case("((a))", ErrorKind::OptionalNotAllowedInOptional, 1, " ^-^")]
    #[case("a () b", ErrorKind::OptionalMayNotBeEmpty, 2, "  ^^")]
    #[case("a/ b", ErrorKind::AlternativeMayNotBeEmpty, 2, "  ^")]
    #[case("/a", ErrorKind::AlternativeMayNotBeEmpty, 0, "^")]
    #[case("a/(b)", ErrorKind::AlternativeMayNotExclusivelyContainOptionals, 2, "  ^-^")]
    #[case("((a{int}))", ErrorKind::OptionalNotAllowedInOptional, 1, " ^------^")]
    #[case("a/({int})", ErrorKind::AlternativeMayNotExclusivelyContainOptionals, 2, "  ^-----^")]
    fn reports_structural_problems(
        #[case] expression: &str,
        #[case] kind: ErrorKind,
        #[case] index: usize,
        #[case] pointer: &str,
    ) {
        let err = parse_err(expression);
        assert_eq!(err.kind(), kind, "unexpected error: {err}");
        let Some(diagnostic) = err.diagnostic() else {
            panic!("expected a positioned diagnostic for `{expression}`");
        };
        assert_eq!(diagnostic.index, index);
        assert_eq!(diagnostic.pointer, pointer);
    }
}
