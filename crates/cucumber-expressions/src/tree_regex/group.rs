//! Match results arranged as a tree of capture groups.

/// A matched capture group and the capturing groups nested inside it.
///
/// `value`, `start` and `end` are `None` when the group did not participate
/// in the match, for example an unmatched optional. Offsets are byte offsets
/// into the matched text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Group {
    /// Matched text.
    pub value: Option<String>,
    /// Byte offset where the match starts.
    pub start: Option<usize>,
    /// Byte offset where the match ends.
    pub end: Option<usize>,
    /// Nested capturing groups.
    pub children: Vec<Group>,
}

impl Group {
    /// Values handed to a transformer: the children's values, or this
    /// group's own value when it has no children.
    ///
    /// # Examples
    /// ```
    /// use cucumber_expressions::Group;
    /// let leaf = Group { value: Some("7".into()), start: Some(0), end: Some(1), children: vec![] };
    /// assert_eq!(leaf.values(), [Some("7")]);
    /// ```
    #[must_use]
    pub fn values(&self) -> Vec<Option<&str>> {
        if self.children.is_empty() {
            vec![self.value.as_deref()]
        } else {
            self.children
                .iter()
                .map(|child| child.value.as_deref())
                .collect()
        }
    }

    /// Merge several sibling groups into one synthetic parent spanning them.
    pub(crate) fn enclosing(children: Vec<Self>, text: &str) -> Self {
        let start = children.iter().filter_map(|g| g.start).min();
        let end = children.iter().filter_map(|g| g.end).max();
        let value = match (start, end) {
            (Some(start), Some(end)) => text.get(start..end).map(str::to_string),
            _ => None,
        };
        Self {
            value,
            start,
            end,
            children,
        }
    }
}
