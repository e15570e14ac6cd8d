//! Per-embed customization inputs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Toggle name to enabled flag. Absent names are disabled.
pub type ToggleStates = HashMap<String, bool>;

/// Variable name to value. Absent or empty values are unset.
pub type VariableValues = HashMap<String, String>;

/// One appearance of a variable in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// 0-based ordinal of this appearance among all appearances of the variable.
    pub index: usize,
    /// Whether the placeholder begins a sentence.
    pub is_at_sentence_start: bool,
}

/// Variable with its occurrence metadata, used for smart case upgrading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDefinition {
    /// Variable name.
    pub name: String,
    /// Every appearance, in document order.
    #[serde(default)]
    pub occurrences: Vec<Occurrence>,
}

impl VariableDefinition {
    /// Whether appearance `index` begins a sentence.
    #[must_use]
    pub fn is_sentence_start(&self, index: usize) -> bool {
        self.occurrences
            .iter()
            .any(|o| o.index == index && o.is_at_sentence_start)
    }
}

/// Custom paragraph added after an existing paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomInsertion {
    /// Ordinal of the paragraph the new one follows, in the original tree.
    pub position: usize,
    /// Paragraph text; newlines become hard breaks.
    pub text: String,
}

/// Numbered annotation attached to an existing paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalNote {
    /// Ordinal of the annotated paragraph, before any custom insertion.
    pub position: usize,
    /// Note text.
    pub content: String,
}
