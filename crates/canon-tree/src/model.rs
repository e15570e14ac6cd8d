//! Document tree model.
//!
//! [`Node`] mirrors the JSON shape of the host's rich-document format: every
//! node has a `type`, and optionally `attrs`, `marks`, `text` and `content`.
//! Text nodes carry `text`; every other node kind carries `content` (or nothing
//! for leaves such as hard breaks and media).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TreeError;

/// Attribute map of a node or mark.
pub type Attrs = Map<String, Value>;

/// Node and mark kind names used by the transforms.
pub mod kinds {
    pub const DOC: &str = "doc";
    pub const PARAGRAPH: &str = "paragraph";
    pub const TEXT: &str = "text";
    pub const HEADING: &str = "heading";
    pub const HARD_BREAK: &str = "hardBreak";
    pub const RULE: &str = "rule";
    pub const PANEL: &str = "panel";
    pub const TABLE: &str = "table";
    pub const TABLE_CELL: &str = "tableCell";
    pub const TABLE_HEADER: &str = "tableHeader";
    pub const EXPAND: &str = "expand";
    pub const STATUS: &str = "status";
    pub const MEDIA: &str = "media";
    pub const INLINE_CARD: &str = "inlineCard";
    pub const BLOCK_CARD: &str = "blockCard";
    pub const EMBED_CARD: &str = "embedCard";
    pub const MENTION: &str = "mention";
    pub const EMOJI: &str = "emoji";
    pub const DATE: &str = "date";

    /// Preview-only container wrapping the content of one toggle section.
    pub const GHOST_TOGGLE: &str = "toggle";

    pub const CODE_MARK: &str = "code";
    pub const SUBSUP_MARK: &str = "subsup";
}

/// Inline formatting applied to a text node (bold, code, superscript, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    /// Mark kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Mark attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
}

impl Mark {
    /// Create a mark without attributes.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attrs: None,
        }
    }

    /// Superscript mark.
    #[must_use]
    pub fn superscript() -> Self {
        let mut attrs = Attrs::new();
        attrs.insert("type".to_owned(), Value::from("sup"));
        Self {
            kind: kinds::SUBSUP_MARK.to_owned(),
            attrs: Some(attrs),
        }
    }
}

/// One node of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Node attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
    /// Marks on a text node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<Mark>>,
    /// Text of a text node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Children in reading order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,
}

impl Node {
    /// Create an empty node of the given kind.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attrs: None,
            marks: None,
            text: None,
            content: None,
        }
    }

    /// Create a document root.
    #[must_use]
    pub fn doc(content: Vec<Node>) -> Self {
        Self::new(kinds::DOC).with_content(content)
    }

    /// Create a paragraph.
    #[must_use]
    pub fn paragraph(content: Vec<Node>) -> Self {
        Self::new(kinds::PARAGRAPH).with_content(content)
    }

    /// Create a plain text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(kinds::TEXT)
        }
    }

    /// Replace the children of this node.
    #[must_use]
    pub fn with_content(mut self, content: Vec<Node>) -> Self {
        self.content = Some(content);
        self
    }

    /// Set one attribute, creating the attribute map when absent.
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attrs
            .get_or_insert_with(Attrs::new)
            .insert(key.to_owned(), value.into());
        self
    }

    /// Replace the marks of this node.
    #[must_use]
    pub fn with_marks(mut self, marks: Option<Vec<Mark>>) -> Self {
        self.marks = marks;
        self
    }

    /// Add a mark unless one of the same kind is already present.
    #[must_use]
    pub fn with_mark(mut self, mark: Mark) -> Self {
        let marks = self.marks.get_or_insert_with(Vec::new);
        if !marks.iter().any(|m| m.kind == mark.kind) {
            marks.push(mark);
        }
        self
    }

    /// Text node holding `text` with the same marks as this node.
    #[must_use]
    pub fn fragment(&self, text: &str) -> Self {
        Self::text(text).with_marks(self.marks.clone())
    }

    /// Whether this node is a text run.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.kind == kinds::TEXT
    }

    /// Whether this node is a paragraph.
    #[must_use]
    pub fn is_paragraph(&self) -> bool {
        self.kind == kinds::PARAGRAPH
    }

    /// Whether this node has a (possibly empty) child list.
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.content.is_some()
    }

    /// Children of this node, empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        self.content.as_deref().unwrap_or_default()
    }

    /// Whether a mark of `kind` is present.
    #[must_use]
    pub fn has_mark(&self, kind: &str) -> bool {
        self.marks
            .as_ref()
            .is_some_and(|marks| marks.iter().any(|m| m.kind == kind))
    }

    /// String attribute value, if present.
    #[must_use]
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.as_ref()?.get(key)?.as_str()
    }

    /// Concatenated text of this node and all its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    if let Some(text) = &node.text {
        out.push_str(text);
    }
    for child in node.children() {
        collect_text(child, out);
    }
}

/// Decode a document from its JSON text.
///
/// Accepts either the document object itself or a JSON string whose value is
/// the serialized document (as stored by some callers). The root must be a
/// `doc` node.
///
/// # Errors
///
/// Returns [`TreeError::Json`] for malformed JSON and
/// [`TreeError::NotADocument`] when the root is not a `doc` node.
pub fn decode_document(input: &str) -> Result<Node, TreeError> {
    let value: Value = serde_json::from_str(input)?;
    decode_value(value)
}

/// Decode a document from an already-parsed JSON value.
///
/// A string value is parsed once more as JSON; any other shape must be the
/// document object.
///
/// # Errors
///
/// Returns [`TreeError::Json`] when the value does not have the node shape and
/// [`TreeError::NotADocument`] when the root is not a `doc` node.
pub fn decode_value(value: Value) -> Result<Node, TreeError> {
    let value = match value {
        Value::String(inner) => serde_json::from_str(&inner)?,
        other => other,
    };
    let node: Node = serde_json::from_value(value)?;
    if node.kind != kinds::DOC {
        return Err(TreeError::NotADocument { found: node.kind });
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_object() {
        let doc = decode_document(
            r#"{"type":"doc","content":[{"type":"paragraph","content":[{"type":"text","text":"hi"}]}]}"#,
        )
        .unwrap();
        assert_eq!(doc, Node::doc(vec![Node::paragraph(vec![Node::text("hi")])]));
    }

    #[test]
    fn test_decode_string_wrapped_document() {
        let inner = r#"{"type":"doc","content":[]}"#;
        let wrapped = serde_json::to_string(inner).unwrap();
        let doc = decode_document(&wrapped).unwrap();
        assert_eq!(doc, Node::doc(Vec::new()));
    }

    #[test]
    fn test_decode_rejects_non_document_root() {
        let err = decode_value(json!({"type": "paragraph"})).unwrap_err();
        assert!(matches!(err, TreeError::NotADocument { ref found } if found == "paragraph"));
    }

    #[test]
    fn test_serialize_omits_absent_fields() {
        let node = Node::text("x");
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({"type": "text", "text": "x"})
        );
    }

    #[test]
    fn test_with_mark_skips_duplicate_kind() {
        let node = Node::text("x")
            .with_mark(Mark::new(kinds::CODE_MARK))
            .with_mark(Mark::new(kinds::CODE_MARK));
        assert_eq!(node.marks.unwrap().len(), 1);
    }

    #[test]
    fn test_text_content_spans_descendants() {
        let node = Node::paragraph(vec![Node::text("a"), Node::new(kinds::HARD_BREAK), Node::text("b")]);
        assert_eq!(node.text_content(), "ab");
    }
}
