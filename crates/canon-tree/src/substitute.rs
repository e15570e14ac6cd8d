//! Variable placeholder substitution.
//!
//! Each text run is scanned once, left to right, for `{{name}}` placeholders.
//! Set variables are replaced by their value; unset ones keep their literal
//! placeholder and gain a code mark so they stand out in the rendered page.
//!
//! Occurrence counters are per variable name and document-wide: the n-th
//! appearance of `{{name}}` anywhere in the tree has index n, matching the
//! indices produced by [`detect_variables`](crate::detect_variables).

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::guard::descend;
use crate::model::{Mark, Node, kinds};
use crate::types::{VariableDefinition, VariableValues};

static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z][A-Za-z0-9_]*)\s*\}\}").expect("invalid placeholder regex")
});

/// Iterate `(range, name)` for each placeholder in `text`.
pub(crate) fn placeholders(text: &str) -> impl Iterator<Item = (std::ops::Range<usize>, &str)> {
    PLACEHOLDER_PATTERN.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let name = caps.get(1)?;
        Some((whole.range(), name.as_str()))
    })
}

/// Running count of appearances per variable name.
#[derive(Debug, Default)]
pub(crate) struct OccurrenceCursor {
    seen: HashMap<String, usize>,
}

impl OccurrenceCursor {
    /// Index of the current appearance of `name`, advancing the counter.
    pub(crate) fn next(&mut self, name: &str) -> usize {
        let count = self.seen.entry(name.to_owned()).or_insert(0);
        let index = *count;
        *count += 1;
        index
    }
}

struct Substitution<'a> {
    values: &'a VariableValues,
    definitions: HashMap<&'a str, &'a VariableDefinition>,
    cursor: OccurrenceCursor,
}

impl Substitution<'_> {
    fn is_sentence_start(&self, name: &str, index: usize) -> bool {
        self.definitions
            .get(name)
            .is_some_and(|def| def.is_sentence_start(index))
    }
}

/// Replace variable placeholders throughout `node`.
///
/// `definitions` enables smart case: an appearance flagged as a sentence start
/// gets its value's first letter capitalized. A text run containing
/// placeholders is split into several runs, each keeping the original marks.
#[must_use]
pub fn substitute(
    node: &Node,
    values: &VariableValues,
    definitions: Option<&[VariableDefinition]>,
) -> Node {
    let mut state = Substitution {
        values,
        definitions: definitions
            .unwrap_or_default()
            .iter()
            .map(|def| (def.name.as_str(), def))
            .collect(),
        cursor: OccurrenceCursor::default(),
    };
    substitute_at(node, &mut state, 0)
}

fn substitute_at(node: &Node, state: &mut Substitution<'_>, depth: usize) -> Node {
    let Some(children) = &node.content else {
        return node.clone();
    };
    if !descend(&node.kind, depth) {
        return node.clone().with_content(Vec::new());
    }

    let mut out = Vec::with_capacity(children.len());
    for child in children {
        if child.is_text() {
            out.extend(substitute_text(child, state));
        } else {
            out.push(substitute_at(child, state, depth + 1));
        }
    }
    node.clone().with_content(out)
}

fn substitute_text(node: &Node, state: &mut Substitution<'_>) -> Vec<Node> {
    let Some(text) = node.text.as_deref() else {
        return vec![node.clone()];
    };

    let mut out = Vec::new();
    let mut last = 0;
    for (range, name) in placeholders(text) {
        if range.start > last {
            out.push(node.fragment(&text[last..range.start]));
        }

        let index = state.cursor.next(name);
        match state.values.get(name).filter(|v| !v.is_empty()) {
            Some(value) => {
                let value = if state.is_sentence_start(name, index) {
                    upgrade_case(value)
                } else {
                    Cow::Borrowed(value.as_str())
                };
                out.push(node.fragment(&value));
            }
            None => {
                out.push(
                    node.fragment(&format!("{{{{{name}}}}}"))
                        .with_mark(Mark::new(kinds::CODE_MARK)),
                );
            }
        }
        last = range.end;
    }

    if out.is_empty() {
        return vec![node.clone()];
    }
    if last < text.len() {
        out.push(node.fragment(&text[last..]));
    }
    out
}

/// Capitalize the first letter of `value` if it is lowercase.
///
/// Leading punctuation and whitespace are skipped; a value starting with a
/// digit or an uppercase letter is returned unchanged.
#[must_use]
pub fn upgrade_case(value: &str) -> Cow<'_, str> {
    let Some((pos, first)) = value.char_indices().find(|(_, c)| c.is_alphanumeric()) else {
        return Cow::Borrowed(value);
    };
    if !first.is_lowercase() {
        return Cow::Borrowed(value);
    }
    let mut upgraded = String::with_capacity(value.len());
    upgraded.push_str(&value[..pos]);
    upgraded.extend(first.to_uppercase());
    upgraded.push_str(&value[pos + first.len_utf8()..]);
    Cow::Owned(upgraded)
}
