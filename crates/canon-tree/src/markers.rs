//! Toggle marker syntax: `{{toggle:NAME}}` opens and `{{/toggle:NAME}}` closes.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::Node;

static MARKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(/?)toggle:([A-Za-z][A-Za-z0-9_]*)\}\}").expect("invalid marker regex")
});

/// A toggle boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Marker {
    Open(String),
    Close(String),
}

/// Piece of a text run after marker isolation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Segment {
    Marker(Marker),
    /// Non-marker text carrying the original run's marks.
    Text(Node),
}

/// Split a text node at marker boundaries.
///
/// Empty fragments between adjacent markers are not produced.
pub(crate) fn split_markers(node: &Node) -> Vec<Segment> {
    let Some(text) = node.text.as_deref() else {
        return vec![Segment::Text(node.clone())];
    };
    if !text.contains("toggle:") {
        return vec![Segment::Text(node.clone())];
    }

    let mut segments = Vec::new();
    let mut last = 0;
    for caps in MARKER_PATTERN.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Text(node.fragment(&text[last..whole.start()])));
        }
        let name = caps[2].to_owned();
        segments.push(Segment::Marker(if caps[1].is_empty() {
            Marker::Open(name)
        } else {
            Marker::Close(name)
        }));
        last = whole.end();
    }
    if last == 0 {
        return vec![Segment::Text(node.clone())];
    }
    if last < text.len() {
        segments.push(Segment::Text(node.fragment(&text[last..])));
    }
    segments
}

/// Names of every open marker in `text`, in order.
pub(crate) fn open_names(text: &str) -> impl Iterator<Item = &str> {
    MARKER_PATTERN
        .captures_iter(text)
        .filter(|caps| caps[1].is_empty())
        .filter_map(|caps| caps.get(2).map(|m| m.as_str()))
}

/// Remove every marker from `text`.
pub(crate) fn strip_markers(text: &str) -> std::borrow::Cow<'_, str> {
    MARKER_PATTERN.replace_all(text, "")
}
