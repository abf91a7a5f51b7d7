//! Runtime configuration for expression matching.
//!
//! Two knobs exist. The named capture group policy decides how Tree-Regex
//! treats `(?<name>...)` and `(?P<name>...)` groups in user supplied regular
//! expressions; it is read from `CUCUMBER_EXPRESSIONS_NAMED_GROUPS` unless an
//! in-process override is set. [`NumberFormat`] supplies the decimal
//! separator used by the built-in floating point parameter types and is passed
//! explicitly to [`crate::ParameterTypeRegistry::with_number_format`].

use std::sync::atomic::{AtomicU8, Ordering};

const NAMED_GROUPS_ENV: &str = "CUCUMBER_EXPRESSIONS_NAMED_GROUPS";

const OVERRIDE_UNSET: u8 = 0;
const OVERRIDE_CAPTURE: u8 = 1;
const OVERRIDE_REJECT: u8 = 2;

static NAMED_GROUP_OVERRIDE: AtomicU8 = AtomicU8::new(OVERRIDE_UNSET);

/// How named capture groups in regular expressions are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamedGroupPolicy {
    /// Treat named groups as ordinary capturing groups.
    #[default]
    Capture,
    /// Fail with [`crate::CucumberExpressionError::NamedCaptureGroup`].
    Reject,
}

fn parse_policy(value: &str) -> Option<NamedGroupPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "capture" => Some(NamedGroupPolicy::Capture),
        "reject" => Some(NamedGroupPolicy::Reject),
        _ => None,
    }
}

fn env_named_group_policy() -> Option<NamedGroupPolicy> {
    let value = std::env::var(NAMED_GROUPS_ENV).ok()?;
    let policy = parse_policy(&value);
    if policy.is_none() {
        log::warn!("ignoring unrecognised {NAMED_GROUPS_ENV} value `{value}`");
    }
    policy
}

fn override_state() -> Option<NamedGroupPolicy> {
    match NAMED_GROUP_OVERRIDE.load(Ordering::Relaxed) {
        OVERRIDE_CAPTURE => Some(NamedGroupPolicy::Capture),
        OVERRIDE_REJECT => Some(NamedGroupPolicy::Reject),
        _ => None,
    }
}

/// Determine the named capture group policy for the current process.
#[must_use]
pub fn named_group_policy() -> NamedGroupPolicy {
    override_state()
        .or_else(env_named_group_policy)
        .unwrap_or_default()
}

/// Override the named capture group policy for the current process.
///
/// Call [`clear_named_group_policy_override`] to fall back to the environment.
pub fn set_named_group_policy(policy: NamedGroupPolicy) {
    let value = match policy {
        NamedGroupPolicy::Capture => OVERRIDE_CAPTURE,
        NamedGroupPolicy::Reject => OVERRIDE_REJECT,
    };
    NAMED_GROUP_OVERRIDE.store(value, Ordering::Relaxed);
}

/// Remove any in-process override of the named capture group policy.
pub fn clear_named_group_policy_override() {
    NAMED_GROUP_OVERRIDE.store(OVERRIDE_UNSET, Ordering::Relaxed);
}

/// Number formatting used by the built-in floating point parameter types.
///
/// # Examples
/// ```
/// use cucumber_expressions::{NumberFormat, ParameterTypeRegistry};
/// let registry = ParameterTypeRegistry::with_number_format(NumberFormat::new(','));
/// assert_eq!(registry.number_format().decimal_separator, ',');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    /// Character separating the integer and fractional parts.
    pub decimal_separator: char,
}

impl NumberFormat {
    /// Create a number format with the given decimal separator.
    #[must_use]
    pub const fn new(decimal_separator: char) -> Self {
        Self { decimal_separator }
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::new('.')
    }
}
