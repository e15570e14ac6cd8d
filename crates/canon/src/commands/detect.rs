//! `canon detect` command implementation.

use std::path::PathBuf;

use canon_tree::{VariableDefinition, detect_toggles, detect_variables};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

use super::read_source;

/// Arguments for the detect command.
#[derive(Args)]
pub(crate) struct DetectArgs {
    /// Path to the standard's ADF JSON document.
    source: PathBuf,
}

impl DetectArgs {
    /// Execute the detect command.
    ///
    /// # Errors
    ///
    /// Returns an error if the standard cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let source = read_source(&self.source)?;

        let variables = detect_variables(&source);
        if variables.is_empty() {
            output.info("No variables.");
        } else {
            output.highlight(&format!("Variables ({}):", variables.len()));
            for def in &variables {
                output.info(&format!("  {}", describe_variable(def)));
            }
        }

        let toggles = detect_toggles(&source);
        if toggles.is_empty() {
            output.info("No toggles.");
        } else {
            output.highlight(&format!("Toggles ({}):", toggles.len()));
            for name in &toggles {
                output.info(&format!("  {name}"));
            }
        }
        Ok(())
    }
}

fn describe_variable(def: &VariableDefinition) -> String {
    let count = def.occurrences.len();
    let starts = def
        .occurrences
        .iter()
        .filter(|o| o.is_at_sentence_start)
        .count();
    let plural = if count == 1 { "" } else { "s" };
    if starts == 0 {
        format!("{} ({count} occurrence{plural})", def.name)
    } else {
        format!(
            "{} ({count} occurrence{plural}, {starts} at sentence start)",
            def.name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canon_tree::Node;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_describe_variable_counts_sentence_starts() {
        let doc = Node::doc(vec![Node::paragraph(vec![Node::text(
            "{{org}} owns this. Ask {{org}}.",
        )])]);
        let defs = detect_variables(&doc);
        assert_eq!(
            describe_variable(&defs[0]),
            "org (2 occurrences, 1 at sentence start)"
        );
    }
}
