//! Conditional removal of toggle sections.
//!
//! Every container is processed in two phases. Text children are split so that
//! each `{{toggle:NAME}}` / `{{/toggle:NAME}}` marker stands alone, and
//! container children are filtered first. The resulting sequence is then
//! walked with a stack of open toggles: a node is kept only while every open
//! toggle is enabled. Markers only pair up within one child list; a paragraph
//! holding nothing but a marker ends up empty and is dropped, while its
//! siblings are kept.

use crate::guard::descend;
use crate::markers::{Marker, Segment, split_markers};
use crate::model::Node;
use crate::types::ToggleStates;

/// Remove content inside disabled toggles.
///
/// Returns `None` when `node` is a container that ends up empty; the root
/// passed in here is always kept, possibly with no children.
#[must_use]
pub fn filter(node: &Node, toggle_states: &ToggleStates) -> Option<Node> {
    filter_at(node, toggle_states, 0, true)
}

enum Item {
    Marker(Marker),
    Node(Node),
}

fn filter_at(node: &Node, states: &ToggleStates, depth: usize, is_root: bool) -> Option<Node> {
    let Some(children) = &node.content else {
        return Some(node.clone());
    };
    if !descend(&node.kind, depth) {
        return is_root.then(|| node.clone().with_content(Vec::new()));
    }

    let items = isolate(children, states, depth);

    let mut stack: Vec<(String, bool)> = Vec::new();
    let mut kept = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Item::Marker(Marker::Open(name)) => {
                let enabled = states.get(&name).copied().unwrap_or(false);
                stack.push((name, enabled));
            }
            Item::Marker(Marker::Close(name)) => {
                if stack.pop().is_none() {
                    tracing::debug!(toggle = %name, "Ignoring unmatched toggle close");
                }
            }
            Item::Node(child) => {
                if stack.iter().all(|(_, enabled)| *enabled) {
                    kept.push(child);
                }
            }
        }
    }

    if kept.is_empty() && !is_root {
        return None;
    }
    Some(node.clone().with_content(kept))
}

/// Phase one: markers as separate items, container children filtered.
fn isolate(children: &[Node], states: &ToggleStates, depth: usize) -> Vec<Item> {
    let mut items = Vec::with_capacity(children.len());
    for child in children {
        if child.is_text() {
            items.extend(split_markers(child).into_iter().map(|segment| match segment {
                Segment::Marker(marker) => Item::Marker(marker),
                Segment::Text(text) => Item::Node(text),
            }));
        } else if let Some(filtered) = filter_at(child, states, depth + 1, false) {
            items.push(Item::Node(filtered));
        }
    }
    items
}
