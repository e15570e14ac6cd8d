//! Embed pipeline: the fixed order of transforms producing final content.
//!
//! Substitution, custom insertion, notes, toggle filtering, cleanup. The order
//! matters because note positions refer to the tree before custom insertion
//! and both refer to the tree before toggles remove anything.

use serde::{Deserialize, Serialize};

use crate::clean::{clean, prune_empty};
use crate::ghost::render_with_ghosts;
use crate::insert::{DEFAULT_NOTES_TITLE, insert_custom, insert_notes};
use crate::model::Node;
use crate::substitute::substitute;
use crate::toggle::filter;
use crate::types::{CustomInsertion, InternalNote, ToggleStates, VariableDefinition, VariableValues};

/// Per-embed customization applied by [`render_embed`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedOptions {
    /// Variable values.
    pub values: VariableValues,
    /// Occurrence metadata for smart case; `None` disables case upgrading.
    pub definitions: Option<Vec<VariableDefinition>>,
    /// Toggle states.
    pub toggles: ToggleStates,
    /// Custom paragraphs.
    pub insertions: Vec<CustomInsertion>,
    /// Internal notes.
    pub notes: Vec<InternalNote>,
    /// Title of the notes container.
    pub notes_title: String,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            values: VariableValues::new(),
            definitions: None,
            toggles: ToggleStates::new(),
            insertions: Vec::new(),
            notes: Vec::new(),
            notes_title: DEFAULT_NOTES_TITLE.to_owned(),
        }
    }
}

/// Produce the embeddable tree for one embed of a standard.
///
/// The root is always returned, empty if every piece of content was filtered
/// away.
#[must_use]
pub fn render_embed(doc: &Node, options: &EmbedOptions) -> Node {
    let substituted = substitute(doc, &options.values, options.definitions.as_deref());
    let customized = insert_custom(&substituted, &options.insertions);
    let annotated = insert_notes(
        &customized,
        &options.notes,
        &options.insertions,
        &options.notes_title,
    );
    let filtered = filter(&annotated, &options.toggles).unwrap_or_else(|| annotated.clone());
    let cleaned = clean(&filtered);
    prune_empty(&cleaned).unwrap_or_else(|| cleaned.clone().with_content(Vec::new()))
}

/// Produce the reviewer preview: substituted, with toggle sections tagged.
#[must_use]
pub fn render_preview(doc: &Node, options: &EmbedOptions) -> Node {
    render_with_ghosts(
        doc,
        &options.values,
        &options.toggles,
        options.definitions.as_deref(),
    )
}
