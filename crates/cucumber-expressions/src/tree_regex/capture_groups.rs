//! Rewrites turning capturing groups into non-capturing ones.

use crate::config::NamedGroupPolicy;
use crate::errors::CucumberExpressionError;

use super::builder::{GroupBuilder, create_group_builder};

/// Turn every capturing group of `regexp` into a non-capturing group.
///
/// Named groups lose their name along with the capture.
///
/// # Errors
/// This rewrite never rejects named groups; the `Result` is kept for parity
/// with [`create_group_builder`].
///
/// # Examples
/// ```
/// use cucumber_expressions::remove_capture_groups;
/// let rewritten = remove_capture_groups(r"(\d+)-(?<unit>[a-z]+)")
///     .unwrap_or_else(|err| panic!("regexp should rewrite: {err}"));
/// assert_eq!(rewritten, r"(?:\d+)-(?:[a-z]+)");
/// ```
pub fn remove_capture_groups(regexp: &str) -> Result<String, CucumberExpressionError> {
    rewrite(regexp, 0)
}

/// Turn capturing groups nested inside other capturing groups into
/// non-capturing groups, keeping the outermost captures.
///
/// # Errors
/// This rewrite never rejects named groups; the `Result` is kept for parity
/// with [`create_group_builder`].
///
/// # Examples
/// ```
/// use cucumber_expressions::remove_inner_capture_groups;
/// let rewritten = remove_inner_capture_groups(r#""([^"\\]*(\\.[^"\\]*)*)""#)
///     .unwrap_or_else(|err| panic!("regexp should rewrite: {err}"));
/// assert_eq!(rewritten, r#""([^"\\]*(?:\\.[^"\\]*)*)""#);
/// ```
pub fn remove_inner_capture_groups(regexp: &str) -> Result<String, CucumberExpressionError> {
    rewrite(regexp, 1)
}

fn rewrite(regexp: &str, keep_levels: usize) -> Result<String, CucumberExpressionError> {
    let root = create_group_builder(regexp, NamedGroupPolicy::Capture)?;
    let mut targets = Vec::new();
    for child in root.children() {
        collect(child, 0, keep_levels, &mut targets);
    }
    // Edit back to front so earlier offsets stay valid.
    targets.sort_by(|a, b| b.0.cmp(&a.0));

    let mut out = regexp.to_string();
    for (start, prefix_len) in targets {
        let after_paren = start + 1;
        if prefix_len == 0 {
            out.insert_str(after_paren, "?:");
        } else {
            out.replace_range(after_paren..after_paren + prefix_len, "?:");
        }
    }
    Ok(out)
}

fn collect(
    group: &GroupBuilder,
    level: usize,
    keep_levels: usize,
    targets: &mut Vec<(usize, usize)>,
) {
    if level >= keep_levels {
        targets.push((group.start_index(), group.prefix_len()));
    }
    for child in group.children() {
        collect(child, level + 1, keep_levels, targets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r"\d+", r"\d+")]
    #[case(r"(\d+)", r"(?:\d+)")]
    #[case(r"((a)|(b))", r"(?:(?:a)|(?:b))")]
    #[case(r"(?:a)(b)", r"(?:a)(?:b)")]
    #[case(r"\((a)\)", r"\((?:a)\)")]
    #[case(r"[(](a)", r"[(](?:a)")]
    #[case(r"(?P<n>x)", r"(?:x)")]
    #[case(r"(?<=a)(b)", r"(?<=a)(?:b)")]
    fn removes_all_captures(#[case] regexp: &str, #[case] expected: &str) {
        let rewritten = remove_capture_groups(regexp)
            .unwrap_or_else(|err| panic!("`{regexp}` should rewrite: {err}"));
        assert_eq!(rewritten, expected);
    }

    #[rstest]
    #[case(r"(a)(b)", r"(a)(b)")]
    #[case(r"(a(b)(c))", r"(a(?:b)(?:c))")]
    #[case(r"'([^'\\]*(\\.[^'\\]*)*)'", r"'([^'\\]*(?:\\.[^'\\]*)*)'")]
    #[case(r"(?:x(y(z)))", r"(?:x(y(?:z)))")]
    fn removes_only_nested_captures(#[case] regexp: &str, #[case] expected: &str) {
        let rewritten = remove_inner_capture_groups(regexp)
            .unwrap_or_else(|err| panic!("`{regexp}` should rewrite: {err}"));
        assert_eq!(rewritten, expected);
    }
}
