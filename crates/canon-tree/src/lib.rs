//! Standard content trees and the transforms that customize them.
//!
//! A standard is a rich-text document tree (see [`Node`]) containing two
//! kinds of placeholder text:
//!
//! - `{{name}}`: a variable, replaced by [`substitute`]
//! - `{{toggle:name}}` ... `{{/toggle:name}}`: an optional section, removed
//!   by [`filter`] when the toggle is off
//!
//! Embedding a standard runs a fixed pipeline ([`render_embed`]):
//! substitution, custom paragraph insertion, internal notes, toggle
//! filtering, attribute cleanup and empty-content pruning. Reviewers see
//! [`render_preview`] instead, which keeps disabled sections and tags them.
//!
//! # Example
//!
//! ```
//! use canon_tree::{EmbedOptions, Node, render_embed};
//!
//! let doc = Node::doc(vec![Node::paragraph(vec![Node::text(
//!     "Hello {{name}}{{toggle:extra}}, welcome{{/toggle:extra}}!",
//! )])]);
//! let options = EmbedOptions {
//!     values: [("name".to_owned(), "Ada".to_owned())].into_iter().collect(),
//!     ..EmbedOptions::default()
//! };
//! let out = render_embed(&doc, &options);
//! assert_eq!(out.text_content(), "Hello Ada!");
//! ```
//!
//! All transforms take the tree by reference and return a new one. Recursion
//! is capped at [`MAX_DEPTH`] levels; deeper content is dropped.

mod clean;
mod detect;
mod error;
mod ghost;
mod guard;
mod insert;
mod markers;
mod model;
mod pipeline;
mod substitute;
mod toggle;
mod types;

pub use clean::{clean, prune_empty};
pub use detect::{detect_toggles, detect_variables, paragraph_texts};
pub use error::TreeError;
pub use ghost::render_with_ghosts;
pub use guard::MAX_DEPTH;
pub use insert::{DEFAULT_NOTES_TITLE, insert_custom, insert_notes};
pub use model::{Attrs, Mark, Node, decode_document, decode_value, kinds};
pub use pipeline::{EmbedOptions, render_embed, render_preview};
pub use substitute::{substitute, upgrade_case};
pub use toggle::filter;
pub use types::{
    CustomInsertion, InternalNote, Occurrence, ToggleStates, VariableDefinition, VariableValues,
};
