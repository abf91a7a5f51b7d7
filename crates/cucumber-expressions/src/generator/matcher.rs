//! Whole-word searches for one parameter type regexp.

use std::cmp::Ordering;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::parameter_type::ParameterType;

static WORD_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s\p{Z}\p{P}\p{S}]$").unwrap_or_else(|_| unreachable!()));

/// A match of a parameter type regexp that covers whole words.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub(crate) parameter_type: Arc<ParameterType>,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl Candidate {
    fn len(&self) -> usize {
        self.end - self.start
    }

    fn weight(&self) -> i32 {
        self.parameter_type.weight()
    }

    /// Earlier first, then longer, then heavier.
    pub(crate) fn rank(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| other.len().cmp(&self.len()))
            .then_with(|| other.weight().cmp(&self.weight()))
    }
}

#[derive(Debug)]
pub(crate) struct ParameterTypeMatcher {
    parameter_type: Arc<ParameterType>,
    regex: Regex,
}

impl ParameterTypeMatcher {
    /// One matcher per regexp of `parameter_type`.
    pub(crate) fn for_type(parameter_type: &Arc<ParameterType>) -> Vec<Self> {
        parameter_type
            .regexps()
            .iter()
            .filter_map(|regexp| match Regex::new(regexp) {
                Ok(regex) => Some(Self {
                    parameter_type: Arc::clone(parameter_type),
                    regex,
                }),
                Err(err) => {
                    log::warn!(
                        "skipping regexp /{regexp}/ of parameter type {{{}}} for generation: {err}",
                        parameter_type.name()
                    );
                    None
                }
            })
            .collect()
    }

    /// First non-empty whole-word match starting at or after `pos`.
    pub(crate) fn find_from(&self, text: &str, pos: usize) -> Option<Candidate> {
        let mut from = pos;
        while from < text.len() {
            let found = self.regex.find_at(text, from)?;
            if !found.is_empty()
                && starts_word(text, found.start())
                && ends_word(text, found.end())
            {
                return Some(Candidate {
                    parameter_type: Arc::clone(&self.parameter_type),
                    start: found.start(),
                    end: found.end(),
                });
            }
            from = next_char_boundary(text, found.start());
        }
        None
    }
}

fn is_boundary(ch: char) -> bool {
    WORD_BOUNDARY.is_match(ch.encode_utf8(&mut [0; 4]))
}

fn starts_word(text: &str, start: usize) -> bool {
    text.get(..start)
        .and_then(|before| before.chars().next_back())
        .is_none_or(is_boundary)
}

fn ends_word(text: &str, end: usize) -> bool {
    text.get(end..)
        .and_then(|after| after.chars().next())
        .is_none_or(is_boundary)
}

fn next_char_boundary(text: &str, index: usize) -> usize {
    text.get(index..)
        .and_then(|rest| rest.chars().next())
        .map_or(text.len(), |ch| index + ch.len_utf8())
}
