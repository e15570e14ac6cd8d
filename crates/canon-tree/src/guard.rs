//! Traversal depth cap shared by all recursive transforms.
//!
//! Trees are owned values, so a node can never be its own ancestor; the only
//! guard needed is against pathologically deep input. A subtree that starts
//! at [`MAX_DEPTH`] is dropped from its parent.

/// Maximum nesting depth visited by any transform (the root is depth 0).
pub const MAX_DEPTH: usize = 100;

/// Whether children of a node at `depth` may still be visited.
///
/// Logs the truncation when they may not.
pub(crate) fn descend(kind: &str, depth: usize) -> bool {
    if depth + 1 < MAX_DEPTH {
        return true;
    }
    tracing::debug!(kind, depth, "Depth cap reached, truncating branch");
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, kinds};
    use crate::types::{CustomInsertion, InternalNote, ToggleStates, VariableValues};
    use crate::{
        detect_toggles, detect_variables, filter, insert_custom, insert_notes, paragraph_texts,
        render_with_ghosts, substitute,
    };
    use pretty_assertions::assert_eq;

    /// Shallow paragraph, 150 nested panels around a paragraph, shallow paragraph.
    fn deep_document() -> Node {
        let mut deep = Node::paragraph(vec![Node::text(
            "{{org}} deep. {{toggle:buried}}secret{{/toggle:buried}}",
        )]);
        for _ in 0..150 {
            deep = Node::new(kinds::PANEL).with_content(vec![deep]);
        }
        Node::doc(vec![
            Node::paragraph(vec![Node::text(
                "{{org}} first.{{toggle:extra}} More.{{/toggle:extra}}",
            )]),
            deep,
            Node::paragraph(vec![Node::text("{{org}} last.")]),
        ])
    }

    fn values() -> VariableValues {
        [("org".to_owned(), "acme".to_owned())].into_iter().collect()
    }

    #[test]
    fn test_descend_below_cap() {
        assert!(descend("doc", 0));
        assert!(descend("paragraph", MAX_DEPTH - 2));
    }

    #[test]
    fn test_descend_at_cap() {
        assert!(!descend("paragraph", MAX_DEPTH - 1));
    }

    #[test]
    fn test_deep_branch_skipped_by_scans() {
        let doc = deep_document();

        let defs = detect_variables(&doc);
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].occurrences.len(), 2);
        assert_eq!(detect_toggles(&doc), vec!["extra"]);
        assert_eq!(
            paragraph_texts(&doc),
            vec![
                "{{org}} first.{{toggle:extra}} More.{{/toggle:extra}}",
                "{{org}} last."
            ]
        );
    }

    #[test]
    fn test_deep_branch_skipped_consistently_by_substitute() {
        let doc = deep_document();
        let defs = detect_variables(&doc);
        let out = substitute(&doc, &values(), Some(&defs));

        let text = out.text_content();
        assert!(text.starts_with("Acme first."));
        assert!(text.ends_with("Acme last."));
        assert!(!text.contains("deep"));
    }

    #[test]
    fn test_deep_branch_truncated_by_filter_and_ghosts() {
        let doc = deep_document();

        let filtered = filter(&doc, &ToggleStates::new()).unwrap();
        assert_eq!(filtered.text_content(), "{{org}} first.{{org}} last.");

        let ghosts = render_with_ghosts(&doc, &values(), &ToggleStates::new(), None);
        let text = ghosts.text_content();
        assert!(text.contains("acme first. More."));
        assert!(!text.contains("secret"));
    }

    #[test]
    fn test_deep_branch_does_not_consume_paragraph_ordinals() {
        let doc = deep_document();
        let insertions = vec![CustomInsertion {
            position: 1,
            text: "Added.".to_owned(),
        }];

        let inserted = insert_custom(&doc, &insertions);
        let last = inserted.children().last().unwrap();
        assert_eq!(last.text_content(), "Added.");

        let notes = vec![InternalNote {
            position: 1,
            content: "check".to_owned(),
        }];
        let annotated = insert_notes(&doc, &notes, &[], "Notes");
        let children = annotated.children();
        assert_eq!(children[2].text_content(), "{{org}} last.1");
        assert_eq!(children[3].kind, kinds::EXPAND);
    }
}
