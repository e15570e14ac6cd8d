//! Positional insertion of custom paragraphs and internal notes.
//!
//! Both operations number paragraphs depth-first with one counter threaded
//! through the whole traversal (see [`paragraph_texts`](crate::paragraph_texts)),
//! so a position always names the same paragraph no matter how deeply it is
//! nested in tables, panels or layouts.

use crate::guard::descend;
use crate::model::{Mark, Node, kinds};
use crate::types::{CustomInsertion, InternalNote};

/// Default title of the collapsible notes container.
pub const DEFAULT_NOTES_TITLE: &str = "Notes";

/// Depth-first paragraph counter.
#[derive(Debug, Default)]
struct ParagraphCursor {
    next: usize,
}

impl ParagraphCursor {
    /// Ordinal of the paragraph just visited.
    fn advance(&mut self) -> usize {
        let ordinal = self.next;
        self.next += 1;
        ordinal
    }
}

/// Add custom paragraphs after the paragraphs they reference.
///
/// Each inserted paragraph lands in the same child list as the paragraph at
/// its `position`, directly after it (and after earlier insertions for the
/// same position). Positions beyond the last paragraph are ignored.
#[must_use]
pub fn insert_custom(node: &Node, insertions: &[CustomInsertion]) -> Node {
    if insertions.is_empty() {
        return node.clone();
    }
    let mut cursor = ParagraphCursor::default();
    insert_custom_at(node, insertions, &mut cursor, 0)
}

fn insert_custom_at(
    node: &Node,
    insertions: &[CustomInsertion],
    cursor: &mut ParagraphCursor,
    depth: usize,
) -> Node {
    let Some(children) = &node.content else {
        return node.clone();
    };
    if !descend(&node.kind, depth) {
        return node.clone().with_content(Vec::new());
    }

    let mut out = Vec::with_capacity(children.len());
    for child in children {
        let processed = insert_custom_at(child, insertions, cursor, depth + 1);
        let is_paragraph = processed.is_paragraph();
        out.push(processed);
        if is_paragraph {
            let ordinal = cursor.advance();
            out.extend(
                insertions
                    .iter()
                    .filter(|i| i.position == ordinal)
                    .map(|i| custom_paragraph(&i.text)),
            );
        }
    }
    node.clone().with_content(out)
}

/// Paragraph for user-supplied text; line breaks become hard breaks.
fn custom_paragraph(text: &str) -> Node {
    let mut content = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            content.push(Node::new(kinds::HARD_BREAK));
        }
        if !line.is_empty() {
            content.push(Node::text(line));
        }
    }
    Node::paragraph(content)
}

/// Attach numbered notes and append the notes container.
///
/// Notes are numbered from 1 in order of their original position. Positions
/// refer to the tree before custom insertion; each target is shifted by the
/// number of `prior_insertions` that were placed before the annotated
/// paragraph, i.e. whose position is strictly smaller. A superscript number
/// is appended to each target paragraph and a collapsible container listing
/// `"{number} | {text}"` for every note is appended to the root.
#[must_use]
pub fn insert_notes(
    node: &Node,
    notes: &[InternalNote],
    prior_insertions: &[CustomInsertion],
    title: &str,
) -> Node {
    if notes.is_empty() {
        return node.clone();
    }

    let mut ordered: Vec<&InternalNote> = notes.iter().collect();
    ordered.sort_by_key(|note| note.position);

    let targets: Vec<NoteTarget> = ordered
        .iter()
        .enumerate()
        .map(|(i, note)| NoteTarget {
            ordinal: note.position
                + prior_insertions
                    .iter()
                    .filter(|ins| ins.position < note.position)
                    .count(),
            number: i + 1,
        })
        .collect();

    let mut cursor = ParagraphCursor::default();
    let mut annotated = attach_notes_at(node, &targets, &mut cursor, 0);

    let listing = ordered
        .iter()
        .enumerate()
        .map(|(i, note)| Node::paragraph(vec![Node::text(format!("{} | {}", i + 1, note.content))]))
        .collect();
    let container = Node::new(kinds::EXPAND)
        .with_attr("title", title)
        .with_content(listing);
    annotated.content.get_or_insert_with(Vec::new).push(container);
    annotated
}

struct NoteTarget {
    ordinal: usize,
    number: usize,
}

fn attach_notes_at(
    node: &Node,
    targets: &[NoteTarget],
    cursor: &mut ParagraphCursor,
    depth: usize,
) -> Node {
    let Some(children) = &node.content else {
        return node.clone();
    };
    if !descend(&node.kind, depth) {
        return node.clone().with_content(Vec::new());
    }

    let mut out = Vec::with_capacity(children.len());
    for child in children {
        let mut processed = attach_notes_at(child, targets, cursor, depth + 1);
        if processed.is_paragraph() {
            let ordinal = cursor.advance();
            let refs = targets
                .iter()
                .filter(|t| t.ordinal == ordinal)
                .map(|t| Node::text(t.number.to_string()).with_mark(Mark::superscript()));
            processed.content.get_or_insert_with(Vec::new).extend(refs);
        }
        out.push(processed);
    }
    node.clone().with_content(out)
}
