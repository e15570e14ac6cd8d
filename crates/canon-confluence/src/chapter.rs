//! Chapter inputs and the tree published for one embed of a standard.

use canon_tree::{
    CustomInsertion, EmbedOptions, InternalNote, Node, ToggleStates, VariableValues,
    detect_variables, kinds, render_embed,
};
use serde::{Deserialize, Serialize};

/// Heading level of a chapter title.
const CHAPTER_HEADING_LEVEL: u8 = 2;

/// Lozenge color of the compliance level.
const COMPLIANCE_COLOR: &str = "blue";

/// Everything needed to publish one chapter into a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterInput {
    /// Identity of the chapter within its page.
    pub local_id: String,
    /// Identity of the standard the chapter embeds.
    pub source_id: String,
    /// Chapter title, rendered as a level-2 heading.
    #[serde(default)]
    pub heading: String,
    /// Variable values.
    #[serde(default)]
    pub variable_values: VariableValues,
    /// Toggle states; absent toggles are off.
    #[serde(default)]
    pub toggle_states: ToggleStates,
    /// Extra paragraphs added by the embedding team.
    #[serde(default)]
    pub custom_insertions: Vec<CustomInsertion>,
    /// Numbered notes attached to paragraphs.
    #[serde(default)]
    pub internal_notes: Vec<InternalNote>,
    /// Compliance level shown next to the heading (e.g. "Mandatory").
    #[serde(default)]
    pub compliance_level: Option<String>,
}

impl ChapterInput {
    /// Embed options for `source`, with smart case enabled.
    #[must_use]
    pub fn embed_options(&self, source: &Node, notes_title: &str) -> EmbedOptions {
        EmbedOptions {
            values: self.variable_values.clone(),
            definitions: Some(detect_variables(source)),
            toggles: self.toggle_states.clone(),
            insertions: self.custom_insertions.clone(),
            notes: self.internal_notes.clone(),
            notes_title: notes_title.to_owned(),
        }
    }

    /// Render the chapter tree: the customized standard under its heading.
    #[must_use]
    pub fn render(&self, source: &Node, notes_title: &str) -> Node {
        let mut doc = render_embed(source, &self.embed_options(source, notes_title));
        if let Some(heading) = self.heading_node() {
            doc.content.get_or_insert_with(Vec::new).insert(0, heading);
        }
        doc
    }

    fn heading_node(&self) -> Option<Node> {
        let level = self
            .compliance_level
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty());
        if self.heading.trim().is_empty() && level.is_none() {
            return None;
        }

        let mut content = Vec::new();
        if !self.heading.trim().is_empty() {
            content.push(Node::text(self.heading.trim()));
        }
        if let Some(level) = level {
            if !content.is_empty() {
                content.push(Node::text(" "));
            }
            content.push(
                Node::new(kinds::STATUS)
                    .with_attr("text", level.to_uppercase())
                    .with_attr("color", COMPLIANCE_COLOR),
            );
        }
        Some(
            Node::new(kinds::HEADING)
                .with_attr("level", CHAPTER_HEADING_LEVEL)
                .with_content(content),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canon_tree::DEFAULT_NOTES_TITLE;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn input() -> ChapterInput {
        serde_json::from_value(json!({
            "local_id": "c1",
            "source_id": "std-7",
            "heading": "Access Control",
            "variable_values": {"company": "acme"},
            "compliance_level": "mandatory"
        }))
        .unwrap()
    }

    fn source() -> Node {
        Node::doc(vec![Node::paragraph(vec![Node::text("{{company}} reviews access.")])])
    }

    #[test]
    fn test_render_prepends_heading_with_level() {
        let doc = input().render(&source(), DEFAULT_NOTES_TITLE);
        let heading = &doc.children()[0];
        assert_eq!(heading.kind, kinds::HEADING);
        assert_eq!(heading.attrs.as_ref().unwrap()["level"], json!(2));
        assert_eq!(heading.text_content(), "Access Control ");

        let lozenge = heading.children().last().unwrap();
        assert_eq!(lozenge.kind, kinds::STATUS);
        assert_eq!(lozenge.attr_str("text"), Some("MANDATORY"));
    }

    #[test]
    fn test_render_applies_smart_case() {
        let doc = input().render(&source(), DEFAULT_NOTES_TITLE);
        assert_eq!(doc.children()[1].text_content(), "Acme reviews access.");
    }

    #[test]
    fn test_no_heading_when_both_missing() {
        let mut chapter = input();
        chapter.heading = String::new();
        chapter.compliance_level = None;
        let doc = chapter.render(&source(), DEFAULT_NOTES_TITLE);
        assert_eq!(doc.children().len(), 1);
        assert!(doc.children()[0].is_paragraph());
    }

    #[test]
    fn test_minimal_input_deserializes() {
        let chapter: ChapterInput =
            serde_json::from_value(json!({"local_id": "a", "source_id": "s"})).unwrap();
        assert!(chapter.toggle_states.is_empty());
        assert_eq!(chapter.compliance_level, None);
    }
}
