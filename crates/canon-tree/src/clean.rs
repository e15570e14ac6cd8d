//! Tree cleanup before conversion.
//!
//! [`clean`] strips attributes the rendering host rejects, and
//! [`prune_empty`] removes content that filtering left empty.

use crate::guard::descend;
use crate::model::{Attrs, Node, kinds};

/// Identity attribute assigned by editors; meaningless outside the source document.
const LOCAL_ID_ATTR: &str = "localId";

/// Kinds whose optional attributes are rejected by the host when `null`.
const NULL_ATTR_KINDS: &[&str] = &[
    kinds::PANEL,
    kinds::TABLE,
    kinds::TABLE_CELL,
    kinds::TABLE_HEADER,
];

/// Kinds that are meaningful without any content.
const KEEP_WHEN_EMPTY: &[&str] = &[
    kinds::HARD_BREAK,
    kinds::RULE,
    kinds::INLINE_CARD,
    kinds::BLOCK_CARD,
    kinds::EMBED_CARD,
    kinds::MENTION,
    kinds::EMOJI,
    kinds::DATE,
    kinds::STATUS,
    kinds::MEDIA,
];

/// Return a copy of `node` without host-unsupported attributes.
///
/// Removes `localId` from every node, and `null` attribute values from
/// panels and tables. Attribute maps left empty are dropped.
#[must_use]
pub fn clean(node: &Node) -> Node {
    clean_at(node, 0)
}

fn clean_at(node: &Node, depth: usize) -> Node {
    let content = node.content.as_ref().map(|children| {
        if descend(&node.kind, depth) {
            children.iter().map(|c| clean_at(c, depth + 1)).collect()
        } else {
            Vec::new()
        }
    });

    Node {
        kind: node.kind.clone(),
        attrs: node.attrs.as_ref().and_then(|a| clean_attrs(&node.kind, a)),
        marks: node.marks.clone(),
        text: node.text.clone(),
        content,
    }
}

fn clean_attrs(kind: &str, attrs: &Attrs) -> Option<Attrs> {
    let drop_nulls = NULL_ATTR_KINDS.contains(&kind);
    let cleaned: Attrs = attrs
        .iter()
        .filter(|(key, value)| key.as_str() != LOCAL_ID_ATTR && !(drop_nulls && value.is_null()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Remove blank text runs and containers left without content.
///
/// Returns `None` when `node` itself should disappear from its parent.
/// Leaves without a child list and the kinds in the keep-list survive as is.
/// A whitespace run between two non-blank siblings is kept, since it separates
/// words (typically two substituted values).
#[must_use]
pub fn prune_empty(node: &Node) -> Option<Node> {
    prune_at(node, 0)
}

fn is_blank_text(node: &Node) -> bool {
    node.is_text() && node.text.as_deref().is_none_or(|t| t.trim().is_empty())
}

fn separates_words(siblings: &[Node], i: usize) -> bool {
    let has_space = siblings[i].text.as_deref().is_some_and(|t| !t.is_empty());
    has_space
        && siblings[..i].iter().any(|n| !is_blank_text(n))
        && siblings[i + 1..].iter().any(|n| !is_blank_text(n))
}

fn prune_at(node: &Node, depth: usize) -> Option<Node> {
    if KEEP_WHEN_EMPTY.contains(&node.kind.as_str()) {
        return Some(node.clone());
    }
    if node.is_text() {
        return (!is_blank_text(node)).then(|| node.clone());
    }
    let Some(children) = &node.content else {
        return Some(node.clone());
    };
    if !descend(&node.kind, depth) {
        return None;
    }

    let kept: Vec<Node> = children
        .iter()
        .enumerate()
        .filter_map(|(i, child)| {
            if is_blank_text(child) {
                return separates_words(children, i).then(|| child.clone());
            }
            prune_at(child, depth + 1)
        })
        .collect();
    if kept.is_empty() {
        return None;
    }
    Some(Node {
        content: Some(kept),
        ..node.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn node(value: serde_json::Value) -> Node {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_clean_removes_local_id_everywhere() {
        let doc = node(json!({
            "type": "doc",
            "content": [{
                "type": "paragraph",
                "attrs": {"localId": "abc"},
                "content": [{"type": "text", "text": "hi"}]
            }]
        }));
        let cleaned = clean(&doc);
        assert_eq!(cleaned.children()[0].attrs, None);
    }

    #[test]
    fn test_clean_drops_null_attrs_on_tables_and_panels() {
        let doc = node(json!({
            "type": "doc",
            "content": [
                {"type": "panel", "attrs": {"panelType": "info", "panelColor": null}, "content": []},
                {"type": "heading", "attrs": {"level": 2, "extra": null}, "content": []}
            ]
        }));
        let cleaned = clean(&doc);
        assert_eq!(
            serde_json::to_value(&cleaned.children()[0].attrs).unwrap(),
            json!({"panelType": "info"})
        );
        // Only the listed kinds lose null attributes
        assert_eq!(
            serde_json::to_value(&cleaned.children()[1].attrs).unwrap(),
            json!({"level": 2, "extra": null})
        );
    }

    #[test]
    fn test_prune_removes_blank_text_and_empty_paragraphs() {
        let doc = node(json!({
            "type": "doc",
            "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "  "}]},
                {"type": "paragraph", "content": [{"type": "text", "text": "kept"}]}
            ]
        }));
        let pruned = prune_empty(&doc).unwrap();
        assert_eq!(
            pruned,
            Node::doc(vec![Node::paragraph(vec![Node::text("kept")])])
        );
    }

    #[test]
    fn test_prune_keeps_space_between_words() {
        let para = Node::paragraph(vec![
            Node::text("John"),
            Node::text(" "),
            Node::text("Doe"),
            Node::text(" "),
        ]);
        let pruned = prune_empty(&para).unwrap();
        assert_eq!(pruned.text_content(), "John Doe");
    }

    #[test]
    fn test_prune_collapses_nested_empty_containers() {
        let doc = node(json!({
            "type": "doc",
            "content": [{
                "type": "panel",
                "content": [{"type": "paragraph", "content": []}]
            }]
        }));
        assert_eq!(prune_empty(&doc), None);
    }

    #[test]
    fn test_prune_keeps_meaningful_empty_kinds() {
        let doc = node(json!({
            "type": "doc",
            "content": [
                {"type": "rule"},
                {"type": "paragraph", "content": [{"type": "hardBreak"}]},
                {"type": "paragraph", "content": [{"type": "inlineCard", "attrs": {"url": "https://x"}}]}
            ]
        }));
        let pruned = prune_empty(&doc).unwrap();
        assert_eq!(pruned.children().len(), 3);
    }

    #[test]
    fn test_clean_truncates_beyond_depth_cap() {
        let mut deep = Node::text("leaf");
        for _ in 0..150 {
            deep = Node::new(kinds::PANEL).with_content(vec![deep]);
        }
        let cleaned = clean(&Node::doc(vec![deep]));
        assert!(!cleaned.text_content().contains("leaf"));
    }
}
