//! Tokens and syntax tree nodes shared by the lexer, parser, and compiler.

const ESCAPE_CHARACTER: char = '\\';
const ALTERNATION_CHARACTER: char = '/';
const BEGIN_PARAMETER_CHARACTER: char = '{';
const END_PARAMETER_CHARACTER: char = '}';
const BEGIN_OPTIONAL_CHARACTER: char = '(';
const END_OPTIONAL_CHARACTER: char = ')';

/// Lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// Zero-width marker opening every token stream.
    StartOfLine,
    /// Zero-width marker closing every token stream.
    EndOfLine,
    /// A run of whitespace.
    WhiteSpace,
    /// `(`
    BeginOptional,
    /// `)`
    EndOptional,
    /// `{`
    BeginParameter,
    /// `}`
    EndParameter,
    /// `/`
    Alternation,
    /// A run of literal characters, including escaped ones.
    Text,
}

impl TokenType {
    pub(crate) fn of(ch: char) -> Self {
        if ch.is_whitespace() {
            return Self::WhiteSpace;
        }
        match ch {
            ALTERNATION_CHARACTER => Self::Alternation,
            BEGIN_PARAMETER_CHARACTER => Self::BeginParameter,
            END_PARAMETER_CHARACTER => Self::EndParameter,
            BEGIN_OPTIONAL_CHARACTER => Self::BeginOptional,
            END_OPTIONAL_CHARACTER => Self::EndOptional,
            _ => Self::Text,
        }
    }

    pub(crate) fn can_escape(ch: char) -> bool {
        ch.is_whitespace()
            || matches!(
                ch,
                ESCAPE_CHARACTER
                    | ALTERNATION_CHARACTER
                    | BEGIN_PARAMETER_CHARACTER
                    | END_PARAMETER_CHARACTER
                    | BEGIN_OPTIONAL_CHARACTER
                    | END_OPTIONAL_CHARACTER
            )
    }

    /// Whether consecutive characters of this type share one token.
    pub(crate) fn merges(self) -> bool {
        matches!(self, Self::WhiteSpace | Self::Text)
    }

    /// The character this token type stands for, if it has one.
    #[must_use]
    pub fn symbol(self) -> Option<char> {
        match self {
            Self::BeginOptional => Some(BEGIN_OPTIONAL_CHARACTER),
            Self::EndOptional => Some(END_OPTIONAL_CHARACTER),
            Self::BeginParameter => Some(BEGIN_PARAMETER_CHARACTER),
            Self::EndParameter => Some(END_PARAMETER_CHARACTER),
            Self::Alternation => Some(ALTERNATION_CHARACTER),
            Self::StartOfLine | Self::EndOfLine | Self::WhiteSpace | Self::Text => None,
        }
    }

    /// What the syntax introduced by this token is for, as used in diagnostics.
    #[must_use]
    pub fn purpose(self) -> Option<&'static str> {
        match self {
            Self::BeginOptional | Self::EndOptional => Some("optional text"),
            Self::BeginParameter | Self::EndParameter => Some("a parameter"),
            Self::Alternation => Some("alternation"),
            Self::StartOfLine | Self::EndOfLine | Self::WhiteSpace | Self::Text => None,
        }
    }
}

/// A lexed slice of an expression.
///
/// `start` and `end` are half-open character offsets into the expression.
/// Escaped characters are rendered without their backslash but the backslash
/// still counts towards the span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lexical class.
    pub kind: TokenType,
    /// Rendered text.
    pub text: String,
    /// Offset of the first character.
    pub start: usize,
    /// Offset one past the last character.
    pub end: usize,
}

impl Token {
    /// Create a token.
    #[must_use]
    pub fn new(kind: TokenType, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
        }
    }
}

/// Syntactic role of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Literal text.
    Text,
    /// `( ... )`
    Optional,
    /// A set of `/`-separated alternatives.
    Alternation,
    /// One branch of an alternation. Also used for the `/` separator leaf
    /// while the alternation is being assembled.
    Alternative,
    /// `{ ... }`
    Parameter,
    /// The root of every parse.
    Expression,
}

/// Payload of a [`Node`]: either children or a leaf token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
    /// Interior node.
    Nodes(Vec<Node>),
    /// Leaf node.
    Token(String),
}

/// A node of the expression syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Syntactic role.
    pub kind: NodeType,
    /// Offset of the first character covered.
    pub start: usize,
    /// Offset one past the last character covered.
    pub end: usize,
    /// Children or leaf text.
    pub content: NodeContent,
}

impl Node {
    /// Create an interior node.
    #[must_use]
    pub fn branch(kind: NodeType, nodes: Vec<Self>, start: usize, end: usize) -> Self {
        Self {
            kind,
            start,
            end,
            content: NodeContent::Nodes(nodes),
        }
    }

    /// Create a leaf node.
    #[must_use]
    pub fn leaf(kind: NodeType, token: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            start,
            end,
            content: NodeContent::Token(token.into()),
        }
    }

    /// Child nodes; empty for leaves.
    #[must_use]
    pub fn nodes(&self) -> &[Self] {
        match &self.content {
            NodeContent::Nodes(nodes) => nodes,
            NodeContent::Token(_) => &[],
        }
    }

    /// Leaf text; `None` for interior nodes.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match &self.content {
            NodeContent::Token(token) => Some(token),
            NodeContent::Nodes(_) => None,
        }
    }

    /// Render the node back to expression syntax with escapes removed.
    ///
    /// # Examples
    /// ```
    /// use cucumber_expressions::parse;
    /// let ast = parse("three (blind) mice/rats")
    ///     .unwrap_or_else(|err| panic!("expression should parse: {err}"));
    /// assert_eq!(ast.text(), "three (blind) mice/rats");
    /// ```
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match (&self.content, self.kind) {
            (NodeContent::Token(token), _) => out.push_str(token),
            (NodeContent::Nodes(nodes), NodeType::Optional) => {
                out.push(BEGIN_OPTIONAL_CHARACTER);
                nodes.iter().for_each(|node| node.write_text(out));
                out.push(END_OPTIONAL_CHARACTER);
            }
            (NodeContent::Nodes(nodes), NodeType::Parameter) => {
                out.push(BEGIN_PARAMETER_CHARACTER);
                nodes.iter().for_each(|node| node.write_text(out));
                out.push(END_PARAMETER_CHARACTER);
            }
            (NodeContent::Nodes(nodes), NodeType::Alternation) => {
                for (i, node) in nodes.iter().enumerate() {
                    if i > 0 {
                        out.push(ALTERNATION_CHARACTER);
                    }
                    node.write_text(out);
                }
            }
            (NodeContent::Nodes(nodes), _) => {
                nodes.iter().for_each(|node| node.write_text(out));
            }
        }
    }

    /// Concatenated leaf text of the children, used for parameter names.
    pub(crate) fn inner_text(&self) -> String {
        self.nodes().iter().map(Self::text).collect()
    }
}
