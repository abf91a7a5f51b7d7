//! Scanner reconstructing the capture group nesting of a regex source.

use regex::Captures;

use crate::config::NamedGroupPolicy;
use crate::errors::CucumberExpressionError;

use super::group::Group;

/// Mirror of the capturing group structure of a regular expression.
///
/// Non-capturing groups are transparent: their capturing descendants are
/// attached to the nearest capturing ancestor. The root stands for the whole
/// pattern (capture group 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBuilder {
    source: String,
    capturing: bool,
    start_index: usize,
    end_index: usize,
    prefix_len: usize,
    children: Vec<GroupBuilder>,
}

impl GroupBuilder {
    fn open(start_index: usize, capturing: bool, prefix_len: usize) -> Self {
        Self {
            source: String::new(),
            capturing,
            start_index,
            end_index: start_index,
            prefix_len,
            children: Vec::new(),
        }
    }

    /// Source of the group, without the surrounding parentheses or any
    /// `?<name>` prefix.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Capturing groups nested directly inside this one.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Whether this group captures.
    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Byte offset of the opening parenthesis.
    #[must_use]
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Byte offset of the closing parenthesis.
    #[must_use]
    pub fn end_index(&self) -> usize {
        self.end_index
    }

    /// Length of the `?<name>` or `?P<name>` prefix of a named group.
    pub(crate) fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// Number of groups in this subtree, itself included.
    #[must_use]
    pub fn group_count(&self) -> usize {
        1 + self.children.iter().map(Self::group_count).sum::<usize>()
    }

    /// Assign matched values depth first, in capture group order.
    pub(crate) fn build(&self, captures: &Captures<'_>, index: &mut usize) -> Group {
        let matched = captures.get(*index);
        *index += 1;
        let children = self
            .children
            .iter()
            .map(|child| child.build(captures, index))
            .collect();
        Group {
            value: matched.map(|m| m.as_str().to_string()),
            start: matched.map(|m| m.start()),
            end: matched.map(|m| m.end()),
            children,
        }
    }
}

enum GroupKind {
    Capturing,
    Named { name: String, prefix_len: usize },
    NonCapturing,
}

fn classify(bytes: &[u8], open: usize) -> GroupKind {
    if bytes.get(open + 1) != Some(&b'?') {
        return GroupKind::Capturing;
    }
    let name_start = match (bytes.get(open + 2), bytes.get(open + 3)) {
        (Some(b'<'), Some(b'=' | b'!')) => return GroupKind::NonCapturing,
        (Some(b'<'), _) => open + 3,
        (Some(b'P'), Some(b'<')) => open + 4,
        _ => return GroupKind::NonCapturing,
    };
    let name_end = bytes
        .get(name_start..)
        .and_then(|rest| rest.iter().position(|&b| b == b'>'))
        .map_or(name_start, |offset| name_start + offset);
    let name = bytes
        .get(name_start..name_end)
        .map(|raw| String::from_utf8_lossy(raw).into_owned())
        .unwrap_or_default();
    GroupKind::Named {
        name,
        prefix_len: name_end + 1 - (open + 1),
    }
}

/// Build the capture group tree of `source`.
///
/// The scan tracks escapes and character classes so that parentheses inside
/// `[...]` or preceded by `\` are ignored.
///
/// # Errors
/// Returns [`CucumberExpressionError::NamedCaptureGroup`] when `source`
/// contains a named group and `policy` is [`NamedGroupPolicy::Reject`].
///
/// # Examples
/// ```
/// use cucumber_expressions::{NamedGroupPolicy, create_group_builder};
/// let builder = create_group_builder("(a(?:b)?)(c)", NamedGroupPolicy::Capture)
///     .unwrap_or_else(|err| panic!("pattern should scan: {err}"));
/// let sources: Vec<_> = builder.children().iter().map(|g| g.source()).collect();
/// assert_eq!(sources, ["a(?:b)?", "c"]);
/// ```
pub fn create_group_builder(
    source: &str,
    policy: NamedGroupPolicy,
) -> Result<GroupBuilder, CucumberExpressionError> {
    let bytes = source.as_bytes();
    let mut root = GroupBuilder::open(0, true, 0);
    root.source = source.to_string();
    root.end_index = source.len();
    let mut stack = vec![root];
    let mut escaping = false;
    let mut char_class = false;

    for (index, &b) in bytes.iter().enumerate() {
        match b {
            b'[' if !escaping => char_class = true,
            b']' if !escaping => char_class = false,
            b'(' if !escaping && !char_class => {
                let group = match classify(bytes, index) {
                    GroupKind::Capturing => GroupBuilder::open(index, true, 0),
                    GroupKind::NonCapturing => GroupBuilder::open(index, false, 0),
                    GroupKind::Named { name, prefix_len } => {
                        if policy == NamedGroupPolicy::Reject {
                            return Err(CucumberExpressionError::NamedCaptureGroup {
                                name,
                                pattern: source.to_string(),
                            });
                        }
                        GroupBuilder::open(index, true, prefix_len)
                    }
                };
                stack.push(group);
            }
            b')' if !escaping && !char_class && stack.len() > 1 => {
                if let Some(mut group) = stack.pop() {
                    group.end_index = index;
                    let inner_start = group.start_index + 1 + group.prefix_len;
                    group.source = source
                        .get(inner_start..index)
                        .map(str::to_string)
                        .unwrap_or_default();
                    if let Some(parent) = stack.last_mut() {
                        if group.capturing {
                            parent.children.push(group);
                        } else {
                            parent.children.append(&mut group.children);
                        }
                    }
                }
            }
            _ => {}
        }
        escaping = b == b'\\' && !escaping;
    }

    // Unbalanced input only arises from sources the engine would reject; fold
    // any unclosed groups back into their parents.
    while stack.len() > 1 {
        if let Some(mut group) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.children.append(&mut group.children);
            }
        }
    }
    let root = stack
        .pop()
        .unwrap_or_else(|| GroupBuilder::open(0, true, 0));
    Ok(root)
}
