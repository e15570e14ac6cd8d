//! Preview rendering that keeps disabled sections visible.
//!
//! Instead of removing toggle sections, each one is wrapped in a
//! [`GHOST_TOGGLE`](crate::kinds::GHOST_TOGGLE) container tagged with
//! `toggle_name` and `disabled` so a reviewer UI can style it. A section is
//! disabled when its own toggle is off or when it sits inside a disabled one,
//! which is exactly the content [`filter`](crate::filter) would remove.

use crate::guard::descend;
use crate::markers::{Marker, Segment, split_markers};
use crate::model::{Node, kinds};
use crate::substitute::substitute;
use crate::types::{ToggleStates, VariableDefinition, VariableValues};

/// Substitute variables and tag toggle sections without removing them.
#[must_use]
pub fn render_with_ghosts(
    node: &Node,
    values: &VariableValues,
    toggle_states: &ToggleStates,
    definitions: Option<&[VariableDefinition]>,
) -> Node {
    let substituted = substitute(node, values, definitions);
    ghost_at(&substituted, toggle_states, false, 0)
}

struct Section {
    name: String,
    disabled: bool,
    content: Vec<Node>,
}

impl Section {
    fn into_node(self) -> Node {
        Node::new(kinds::GHOST_TOGGLE)
            .with_attr("toggle_name", self.name)
            .with_attr("disabled", self.disabled)
            .with_content(self.content)
    }
}

/// Builds one child list, nesting nodes into the currently open sections.
struct Grouper<'a> {
    states: &'a ToggleStates,
    inherited_disabled: bool,
    open: Vec<Section>,
    base: Vec<Node>,
}

impl Grouper<'_> {
    fn disabled(&self) -> bool {
        self.open
            .last()
            .map_or(self.inherited_disabled, |section| section.disabled)
    }

    fn push(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(section) => section.content.push(node),
            None => self.base.push(node),
        }
    }

    fn marker(&mut self, marker: Marker) {
        match marker {
            Marker::Open(name) => {
                let enabled = self.states.get(&name).copied().unwrap_or(false);
                let disabled = self.disabled() || !enabled;
                self.open.push(Section {
                    name,
                    disabled,
                    content: Vec::new(),
                });
            }
            Marker::Close(_) => self.close(),
        }
    }

    fn close(&mut self) {
        if let Some(section) = self.open.pop()
            && !section.content.is_empty()
        {
            self.push(section.into_node());
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.open.is_empty() {
            self.close();
        }
        self.base
    }
}

fn ghost_at(node: &Node, states: &ToggleStates, inherited_disabled: bool, depth: usize) -> Node {
    let Some(children) = &node.content else {
        return node.clone();
    };
    if !descend(&node.kind, depth) {
        return node.clone().with_content(Vec::new());
    }

    let mut grouper = Grouper {
        states,
        inherited_disabled,
        open: Vec::new(),
        base: Vec::with_capacity(children.len()),
    };
    for child in children {
        if child.is_text() {
            for segment in split_markers(child) {
                match segment {
                    Segment::Marker(marker) => grouper.marker(marker),
                    Segment::Text(text) => grouper.push(text),
                }
            }
        } else {
            let disabled = grouper.disabled();
            grouper.push(ghost_at(child, states, disabled, depth + 1));
        }
    }
    node.clone().with_content(grouper.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn states(pairs: &[(&str, bool)]) -> ToggleStates {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()
    }

    fn section_flags(node: &Node, out: &mut Vec<(String, bool)>) {
        if node.kind == kinds::GHOST_TOGGLE {
            let attrs = node.attrs.as_ref().unwrap();
            out.push((
                attrs["toggle_name"].as_str().unwrap().to_owned(),
                attrs["disabled"].as_bool().unwrap(),
            ));
        }
        for child in node.children() {
            section_flags(child, out);
        }
    }

    #[test]
    fn test_disabled_content_kept_and_tagged() {
        let para = Node::paragraph(vec![Node::text("Price: {{toggle:promo}}{{price}} off!{{/toggle:promo}}")]);
        let values: VariableValues = [("price".to_owned(), "$10".to_owned())].into_iter().collect();
        let out = render_with_ghosts(&para, &values, &states(&[("promo", false)]), None);

        assert_eq!(out.text_content(), "Price: $10 off!");
        let mut flags = Vec::new();
        section_flags(&out, &mut flags);
        assert_eq!(flags, vec![("promo".to_owned(), true)]);
    }

    #[test]
    fn test_nested_inside_disabled_is_disabled() {
        let doc = Node::doc(vec![Node::paragraph(vec![Node::text(
            "{{toggle:outer}}a{{toggle:inner}}b{{/toggle:inner}}{{/toggle:outer}}",
        )])]);
        let out = render_with_ghosts(
            &doc,
            &VariableValues::new(),
            &states(&[("outer", false), ("inner", true)]),
            None,
        );
        let mut flags = Vec::new();
        section_flags(&out, &mut flags);
        assert_eq!(
            flags,
            vec![("outer".to_owned(), true), ("inner".to_owned(), true)]
        );
    }

    #[test]
    fn test_enabled_section_not_disabled() {
        let para = Node::paragraph(vec![Node::text("{{toggle:x}}shown")]);
        let out = render_with_ghosts(&para, &VariableValues::new(), &states(&[("x", true)]), None);
        let mut flags = Vec::new();
        section_flags(&out, &mut flags);
        // Unclosed sections close at the end of their list
        assert_eq!(flags, vec![("x".to_owned(), false)]);
        assert_eq!(out.text_content(), "shown");
    }
}
