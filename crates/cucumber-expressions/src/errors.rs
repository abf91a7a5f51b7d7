//! Error types surfaced while parsing, compiling, and matching expressions.
//!
//! Every failure belongs to [`CucumberExpressionError`]. Syntax problems carry
//! a [`Diagnostic`] that renders the familiar multi-line report with a column
//! pointer into the offending expression; the remaining variants describe
//! registry conflicts, regex problems, and transformation failures.

use std::fmt;
use thiserror::Error;

/// Boxed error produced by parameter type transformers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of a [`CucumberExpressionError`].
///
/// # Examples
/// ```
/// use cucumber_expressions::{ErrorKind, parse};
/// let Err(err) = parse("a (b") else { panic!("expected a parse error") };
/// assert_eq!(err.kind(), ErrorKind::MissingEndToken);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An optional or parameter was opened but never closed.
    MissingEndToken,
    /// A `/` appeared inside an optional.
    AlternationNotAllowedInOptional,
    /// The expression ends with a lone `\`.
    EndOfLineCannotBeEscaped,
    /// An alternation contains an empty alternative.
    AlternativeMayNotBeEmpty,
    /// An optional contains a parameter.
    ParameterNotAllowedInOptional,
    /// An optional contains another optional.
    OptionalNotAllowedInOptional,
    /// An optional contains no text.
    OptionalMayNotBeEmpty,
    /// An alternative holds nothing but optionals.
    AlternativeMayNotExclusivelyContainOptionals,
    /// A character that cannot be escaped follows a `\`.
    CantEscape,
    /// A parameter type name contains a reserved character.
    InvalidParameterTypeName,
    /// An expression refers to a parameter type the registry does not know.
    UndefinedParameterType,
    /// Several non-preferential parameter types share a regexp.
    AmbiguousParameterType,
    /// A parameter type name is already registered.
    DuplicateParameterTypeName,
    /// Two preferential parameter types share a regexp.
    ConflictingPreferredRegexp,
    /// A regular expression failed to compile.
    InvalidRegex,
    /// An anchored regular expression looked like a Cucumber Expression.
    AnchorsInCucumberExpression,
    /// A regex flag is not supported in this position.
    UnsupportedRegexFlag,
    /// A named capture group was found while they are rejected.
    NamedCaptureGroup,
    /// The matched groups do not line up with the parameter types.
    ArgumentCountMismatch,
    /// A parameter type transformer failed.
    Transform,
    /// A transformed value was requested as the wrong type.
    TransformTypeMismatch,
    /// A parameter type was declared without any regexp.
    EmptyRegexps,
    /// A JSON descriptor could not be read or written.
    #[cfg(feature = "json")]
    Json,
}

/// Positioned description of a problem inside an expression.
///
/// # Examples
/// ```
/// use cucumber_expressions::Diagnostic;
/// let diagnostic = Diagnostic::new("a (b", 2, "  ^", "The '(' does not have a matching ')'", "Escape it");
/// assert_eq!(diagnostic.column(), 3);
/// assert!(diagnostic.to_string().starts_with("This Cucumber Expression has a problem at column 3:"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Zero-based character offset of the problem.
    pub index: usize,
    /// The expression being parsed.
    pub expression: String,
    /// Marker line pointing at the problem.
    pub pointer: String,
    /// Human readable problem statement, without trailing full stop.
    pub problem: String,
    /// Suggested fix.
    pub solution: String,
}

impl Diagnostic {
    /// Create a diagnostic from its parts.
    #[must_use]
    pub fn new(
        expression: impl Into<String>,
        index: usize,
        pointer: impl Into<String>,
        problem: impl Into<String>,
        solution: impl Into<String>,
    ) -> Self {
        Self {
            index,
            expression: expression.into(),
            pointer: pointer.into(),
            problem: problem.into(),
            solution: solution.into(),
        }
    }

    /// Diagnostic pointing at a single character.
    pub(crate) fn at(expression: &str, index: usize, problem: &str, solution: &str) -> Self {
        Self::new(expression, index, point_at(index), problem, solution)
    }

    /// Diagnostic underlining the half-open span `start..end`.
    pub(crate) fn located(
        expression: &str,
        start: usize,
        end: usize,
        problem: &str,
        solution: &str,
    ) -> Self {
        Self::new(
            expression,
            start,
            point_at_located(start, end),
            problem,
            solution,
        )
    }

    /// One-based column of the problem.
    #[must_use]
    pub fn column(&self) -> usize {
        self.index + 1
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "This Cucumber Expression has a problem at column {}:",
            self.column()
        )?;
        writeln!(f)?;
        writeln!(f, "{}", self.expression)?;
        writeln!(f, "{}", self.pointer)?;
        writeln!(f, "{}.", self.problem)?;
        write!(f, "{}", self.solution)
    }
}

fn point_at(index: usize) -> String {
    let mut pointer = " ".repeat(index);
    pointer.push('^');
    pointer
}

fn point_at_located(start: usize, end: usize) -> String {
    let mut pointer = point_at(start);
    if start + 1 < end {
        pointer.push_str(&"-".repeat(end - start - 2));
        pointer.push('^');
    }
    pointer
}

/// Details of an ambiguous regexp-to-parameter-type lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ambiguity {
    /// The regexp shared by the competing parameter types.
    pub parameter_type_regexp: String,
    /// The full regular expression being matched.
    pub expression_regexp: String,
    /// Names of the competing parameter types.
    pub parameter_type_names: Vec<String>,
    /// Cucumber Expressions suggested as an alternative.
    pub generated_expressions: Vec<String>,
}

impl fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self
            .parameter_type_names
            .iter()
            .map(|name| format!("{{{name}}}"))
            .collect::<Vec<_>>()
            .join("\n   ");
        writeln!(f, "Your Regular Expression /{}/", self.expression_regexp)?;
        writeln!(
            f,
            "matches multiple parameter types with regexp /{}/:",
            self.parameter_type_regexp
        )?;
        writeln!(f, "   {names}")?;
        writeln!(f)?;
        writeln!(
            f,
            "I couldn't decide which one to use. You have two options:"
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "1) Use a Cucumber Expression instead of a Regular Expression. Try one of these:"
        )?;
        writeln!(f, "   {}", self.generated_expressions.join("\n   "))?;
        writeln!(f)?;
        write!(
            f,
            "2) Make one of the parameter types preferential and continue to use a Regular Expression."
        )
    }
}

fn duplicate_name_message(name: &str) -> String {
    if name.is_empty() {
        "The anonymous parameter type has already been defined".to_string()
    } else {
        format!("There is already a parameter type with name {name}")
    }
}

/// Errors raised while working with Cucumber Expressions.
///
/// # Examples
/// ```
/// use cucumber_expressions::{CucumberExpressionError, ErrorKind};
/// let err = CucumberExpressionError::DuplicateParameterTypeName { name: "color".into() };
/// assert_eq!(err.kind(), ErrorKind::DuplicateParameterTypeName);
/// assert_eq!(err.to_string(), "There is already a parameter type with name color");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CucumberExpressionError {
    /// An optional or parameter was opened but never closed.
    #[error("{0}")]
    MissingEndToken(Diagnostic),
    /// A `/` appeared inside an optional.
    #[error("{0}")]
    AlternationNotAllowedInOptional(Diagnostic),
    /// The expression ends with a lone `\`.
    #[error("{0}")]
    EndOfLineCannotBeEscaped(Diagnostic),
    /// An alternation contains an empty alternative.
    #[error("{0}")]
    AlternativeMayNotBeEmpty(Diagnostic),
    /// An optional contains a parameter.
    #[error("{0}")]
    ParameterNotAllowedInOptional(Diagnostic),
    /// An optional contains another optional.
    #[error("{0}")]
    OptionalNotAllowedInOptional(Diagnostic),
    /// An optional contains no text.
    #[error("{0}")]
    OptionalMayNotBeEmpty(Diagnostic),
    /// An alternative holds nothing but optionals.
    #[error("{0}")]
    AlternativeMayNotExclusivelyContainOptionals(Diagnostic),
    /// A character that cannot be escaped follows a `\`.
    #[error("{0}")]
    CantEscape(Diagnostic),
    /// A reserved character appeared between `{` and `}`.
    #[error("{0}")]
    InvalidParameterTypeNameInExpression(Diagnostic),
    /// A parameter type was declared with a reserved character in its name.
    #[error(
        "Illegal character in parameter name {{{name}}}. Parameter names may not contain '{{', '}}', '(', ')', '\\' or '/'"
    )]
    InvalidParameterTypeName {
        /// The rejected name.
        name: String,
    },
    /// An expression refers to an unknown parameter type.
    #[error("{diagnostic}")]
    UndefinedParameterType {
        /// Name of the missing parameter type.
        name: String,
        /// Positioned report.
        diagnostic: Diagnostic,
    },
    /// Several parameter types share a regexp and none is preferential.
    #[error("{0}")]
    AmbiguousParameterType(Box<Ambiguity>),
    /// A parameter type name is already registered.
    #[error("{}", duplicate_name_message(.name))]
    DuplicateParameterTypeName {
        /// The duplicated name; empty for the anonymous type.
        name: String,
    },
    /// Two preferential parameter types share a regexp.
    #[error(
        "There can only be one preferential parameter type per regexp. The regexp /{regexp}/ is used for two preferential parameter types, {{{existing}}} and {{{new}}}"
    )]
    ConflictingPreferredRegexp {
        /// The shared regexp.
        regexp: String,
        /// Name of the registered preferential type.
        existing: String,
        /// Name of the rejected preferential type.
        new: String,
    },
    /// A regular expression failed to compile.
    #[error("Invalid regular expression: '{pattern}'")]
    InvalidRegex {
        /// The rejected pattern.
        pattern: String,
        /// Engine error.
        #[source]
        source: regex::Error,
    },
    /// An anchored regular expression looked like a Cucumber Expression.
    #[error(
        "You cannot use anchors (^ or $) in Cucumber Expressions. Please remove them from {expression}"
    )]
    AnchorsInCucumberExpression {
        /// The offending input.
        expression: String,
        /// Engine error raised for the input.
        #[source]
        source: regex::Error,
    },
    /// A regex flag is not supported in this position.
    #[error("Unsupported regular expression flag '{flag}' in /{pattern}/")]
    UnsupportedRegexFlag {
        /// The rejected flag.
        flag: char,
        /// Pattern carrying the flag.
        pattern: String,
    },
    /// A named capture group was found while they are rejected.
    #[error(
        "Named capture groups are not supported: found (?<{name}>...) in /{pattern}/"
    )]
    NamedCaptureGroup {
        /// Group name.
        name: String,
        /// Pattern containing the group.
        pattern: String,
    },
    /// The matched groups do not line up with the parameter types.
    #[error(
        "Group has {groups} capture groups, but there were {parameter_types} parameter types"
    )]
    ArgumentCountMismatch {
        /// Number of argument groups.
        groups: usize,
        /// Number of parameter types.
        parameter_types: usize,
    },
    /// A parameter type transformer failed.
    #[error(
        "Failed to transform argument for parameter type {{{parameter_type}}}: {source}"
    )]
    Transform {
        /// Name of the parameter type.
        parameter_type: String,
        /// Transformer error.
        #[source]
        source: BoxError,
    },
    /// A transformed value was requested as the wrong type.
    #[error(
        "Parameter type {{{parameter_type}}} produces values of type {actual}, not {expected}"
    )]
    TransformTypeMismatch {
        /// Name of the parameter type.
        parameter_type: String,
        /// Requested type.
        expected: &'static str,
        /// Type the parameter type declares.
        actual: &'static str,
    },
    /// A parameter type was declared without any regexp.
    #[error("Parameter type {{{name}}} must have at least one regexp")]
    EmptyRegexps {
        /// Name of the parameter type.
        name: String,
    },
    /// A JSON descriptor could not be read or written.
    #[cfg(feature = "json")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CucumberExpressionError {
    /// Classify the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingEndToken(_) => ErrorKind::MissingEndToken,
            Self::AlternationNotAllowedInOptional(_) => ErrorKind::AlternationNotAllowedInOptional,
            Self::EndOfLineCannotBeEscaped(_) => ErrorKind::EndOfLineCannotBeEscaped,
            Self::AlternativeMayNotBeEmpty(_) => ErrorKind::AlternativeMayNotBeEmpty,
            Self::ParameterNotAllowedInOptional(_) => ErrorKind::ParameterNotAllowedInOptional,
            Self::OptionalNotAllowedInOptional(_) => ErrorKind::OptionalNotAllowedInOptional,
            Self::OptionalMayNotBeEmpty(_) => ErrorKind::OptionalMayNotBeEmpty,
            Self::AlternativeMayNotExclusivelyContainOptionals(_) => {
                ErrorKind::AlternativeMayNotExclusivelyContainOptionals
            }
            Self::CantEscape(_) => ErrorKind::CantEscape,
            Self::InvalidParameterTypeNameInExpression(_)
            | Self::InvalidParameterTypeName { .. } => ErrorKind::InvalidParameterTypeName,
            Self::UndefinedParameterType { .. } => ErrorKind::UndefinedParameterType,
            Self::AmbiguousParameterType(_) => ErrorKind::AmbiguousParameterType,
            Self::DuplicateParameterTypeName { .. } => ErrorKind::DuplicateParameterTypeName,
            Self::ConflictingPreferredRegexp { .. } => ErrorKind::ConflictingPreferredRegexp,
            Self::InvalidRegex { .. } => ErrorKind::InvalidRegex,
            Self::AnchorsInCucumberExpression { .. } => ErrorKind::AnchorsInCucumberExpression,
            Self::UnsupportedRegexFlag { .. } => ErrorKind::UnsupportedRegexFlag,
            Self::NamedCaptureGroup { .. } => ErrorKind::NamedCaptureGroup,
            Self::ArgumentCountMismatch { .. } => ErrorKind::ArgumentCountMismatch,
            Self::Transform { .. } => ErrorKind::Transform,
            Self::TransformTypeMismatch { .. } => ErrorKind::TransformTypeMismatch,
            Self::EmptyRegexps { .. } => ErrorKind::EmptyRegexps,
            #[cfg(feature = "json")]
            Self::Json(_) => ErrorKind::Json,
        }
    }

    /// The positioned report, for syntax and resolution errors.
    #[must_use]
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::MissingEndToken(d)
            | Self::AlternationNotAllowedInOptional(d)
            | Self::EndOfLineCannotBeEscaped(d)
            | Self::AlternativeMayNotBeEmpty(d)
            | Self::ParameterNotAllowedInOptional(d)
            | Self::OptionalNotAllowedInOptional(d)
            | Self::OptionalMayNotBeEmpty(d)
            | Self::AlternativeMayNotExclusivelyContainOptionals(d)
            | Self::CantEscape(d)
            | Self::InvalidParameterTypeNameInExpression(d)
            | Self::UndefinedParameterType { diagnostic: d, .. } => Some(d),
            _ => None,
        }
    }

    /// Name of the undefined parameter type, when that is the problem.
    #[must_use]
    pub fn undefined_parameter_type_name(&self) -> Option<&str> {
        match self {
            Self::UndefinedParameterType { name, .. } => Some(name),
            _ => None,
        }
    }
}

pub(crate) fn invalid_regex(pattern: &str, source: regex::Error) -> CucumberExpressionError {
    CucumberExpressionError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    }
}
