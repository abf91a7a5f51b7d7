//! Tree-Regex: matches reported as a tree of capture groups.
//!
//! Regex engines report captures as a flat list. [`TreeRegex`] scans the
//! pattern source once to recover how the capturing groups nest, then uses
//! that shape to arrange every match into a [`Group`] tree whose root stands
//! for the whole match.

mod builder;
mod capture_groups;
mod group;

use regex::Regex;

use crate::config::{NamedGroupPolicy, named_group_policy};
use crate::errors::{CucumberExpressionError, invalid_regex};

pub use builder::{GroupBuilder, create_group_builder};
pub use capture_groups::{remove_capture_groups, remove_inner_capture_groups};
pub use group::Group;

/// A compiled regular expression paired with its capture group tree.
///
/// # Examples
/// ```
/// use cucumber_expressions::TreeRegex;
/// let tree = TreeRegex::new(r"(\d+) (\w+)")
///     .unwrap_or_else(|err| panic!("pattern should compile: {err}"));
/// let group = tree.match_text("12 apples").unwrap_or_else(|| panic!("should match"));
/// assert_eq!(group.values(), [Some("12"), Some("apples")]);
/// ```
#[derive(Debug, Clone)]
pub struct TreeRegex {
    regex: Regex,
    group_builder: GroupBuilder,
}

impl TreeRegex {
    /// Compile `pattern` and scan its groups using the configured
    /// [`NamedGroupPolicy`].
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::InvalidRegex`] when the pattern does
    /// not compile, or [`CucumberExpressionError::NamedCaptureGroup`] when it
    /// holds a named group that the policy rejects.
    pub fn new(pattern: &str) -> Result<Self, CucumberExpressionError> {
        let regex = Regex::new(pattern).map_err(|err| invalid_regex(pattern, err))?;
        Self::from_regex(regex)
    }

    /// Wrap an already compiled regex using the configured
    /// [`NamedGroupPolicy`].
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::NamedCaptureGroup`] when the regex
    /// holds a named group that the policy rejects.
    pub fn from_regex(regex: Regex) -> Result<Self, CucumberExpressionError> {
        Self::with_policy(regex, named_group_policy())
    }

    /// Wrap an already compiled regex with an explicit named group policy.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::NamedCaptureGroup`] when the regex
    /// holds a named group and `policy` is [`NamedGroupPolicy::Reject`].
    pub fn with_policy(
        regex: Regex,
        policy: NamedGroupPolicy,
    ) -> Result<Self, CucumberExpressionError> {
        let group_builder = create_group_builder(regex.as_str(), policy)?;
        if group_builder.group_count() != regex.captures_len() {
            log::warn!(
                "capture group scan of /{}/ found {} groups but the engine reports {}",
                regex.as_str(),
                group_builder.group_count(),
                regex.captures_len()
            );
        }
        Ok(Self {
            regex,
            group_builder,
        })
    }

    /// The compiled regex.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// The capture group tree; its root stands for the whole pattern.
    #[must_use]
    pub fn group_builder(&self) -> &GroupBuilder {
        &self.group_builder
    }

    /// Match `text`, returning the group tree or `None` when it does not match.
    #[must_use]
    pub fn match_text(&self, text: &str) -> Option<Group> {
        let captures = self.regex.captures(text)?;
        let mut index = 0;
        Some(self.group_builder.build(&captures, &mut index))
    }
}
