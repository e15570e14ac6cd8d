//! Scans over a source document: variables, toggles and paragraph ordinals.

use crate::guard::descend;
use crate::markers::{open_names, strip_markers};
use crate::model::{Node, kinds};
use crate::substitute::{OccurrenceCursor, placeholders};
use crate::types::{Occurrence, VariableDefinition};

/// Characters that end a sentence.
const SENTENCE_END: &[char] = &['.', '!', '?'];

/// Find every variable placeholder with its occurrence metadata.
///
/// Variables are listed in order of first appearance. Occurrence indices
/// follow the same depth-first, left-to-right order used by
/// [`substitute`](crate::substitute), so the result can be passed straight
/// back as smart-case definitions.
///
/// A placeholder is at a sentence start when nothing but whitespace (and
/// toggle markers) precedes it in its block, or when the nearest preceding
/// character is `.`, `!` or `?`.
#[must_use]
pub fn detect_variables(node: &Node) -> Vec<VariableDefinition> {
    let mut scan = VariableScan::default();
    scan.visit(node, 0);
    scan.definitions
}

#[derive(Default)]
struct VariableScan {
    definitions: Vec<VariableDefinition>,
    cursor: OccurrenceCursor,
    at_sentence_start: bool,
}

impl VariableScan {
    fn visit(&mut self, node: &Node, depth: usize) {
        if node.is_text() {
            if let Some(text) = &node.text {
                self.scan_text(text);
            }
            return;
        }
        let Some(children) = &node.content else {
            // Inline objects (mentions, dates, ...) read as words
            if node.kind != kinds::HARD_BREAK {
                self.at_sentence_start = false;
            }
            return;
        };
        if !descend(&node.kind, depth) {
            return;
        }
        self.at_sentence_start = true;
        for child in children {
            self.visit(child, depth + 1);
        }
    }

    fn scan_text(&mut self, text: &str) {
        let mut last = 0;
        for (range, name) in placeholders(text) {
            self.advance(&text[last..range.start]);
            let index = self.cursor.next(name);
            let occurrence = Occurrence {
                index,
                is_at_sentence_start: self.at_sentence_start,
            };
            self.record(name, occurrence);
            self.at_sentence_start = false;
            last = range.end;
        }
        self.advance(&text[last..]);
    }

    fn advance(&mut self, text: &str) {
        let stripped = strip_markers(text);
        if let Some(c) = stripped.chars().rev().find(|c| !c.is_whitespace()) {
            self.at_sentence_start = SENTENCE_END.contains(&c);
        }
    }

    fn record(&mut self, name: &str, occurrence: Occurrence) {
        if let Some(def) = self.definitions.iter_mut().find(|d| d.name == name) {
            def.occurrences.push(occurrence);
        } else {
            self.definitions.push(VariableDefinition {
                name: name.to_owned(),
                occurrences: vec![occurrence],
            });
        }
    }
}

/// Distinct toggle names, in order of their first opening marker.
#[must_use]
pub fn detect_toggles(node: &Node) -> Vec<String> {
    let mut names = Vec::new();
    collect_toggles(node, &mut names, 0);
    names
}

fn collect_toggles(node: &Node, names: &mut Vec<String>, depth: usize) {
    if let Some(text) = &node.text {
        for name in open_names(text) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_owned());
            }
        }
    }
    if node.is_container() && descend(&node.kind, depth) {
        for child in node.children() {
            collect_toggles(child, names, depth + 1);
        }
    }
}

/// Plain text of every paragraph, indexed by paragraph ordinal.
///
/// Ordinals are assigned depth-first across the whole tree, including
/// paragraphs inside tables, panels and layout columns. This is the numbering
/// that custom insertions and internal notes refer to.
#[must_use]
pub fn paragraph_texts(node: &Node) -> Vec<String> {
    let mut texts = Vec::new();
    collect_paragraphs(node, &mut texts, 0);
    texts
}

fn collect_paragraphs(node: &Node, texts: &mut Vec<String>, depth: usize) {
    if !node.is_container() || !descend(&node.kind, depth) {
        return;
    }
    for child in node.children() {
        collect_paragraphs(child, texts, depth + 1);
        if child.is_paragraph() {
            texts.push(child.text_content());
        }
    }
}
