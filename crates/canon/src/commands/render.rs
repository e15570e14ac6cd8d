//! `canon render` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use canon_config::Config;
use canon_confluence::ChapterInput;
use canon_tree::{EmbedOptions, Node, detect_variables, render_embed, render_preview};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

use super::{read_embed, read_source, with_path};

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Path to the standard's ADF JSON document.
    source: PathBuf,

    /// Embed file with variable values, toggles, insertions and notes.
    #[arg(short, long)]
    embed: Option<PathBuf>,

    /// Render the reviewer preview (disabled sections kept and tagged).
    #[arg(long)]
    preview: bool,

    /// Write the result to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover canon.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if an input cannot be read or the output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let notes_title = config.publish.notes_title.as_str();

        let source = read_source(&self.source)?;
        let chapter = self.embed.as_deref().map(read_embed).transpose()?;

        let rendered = render(&source, chapter.as_ref(), notes_title, self.preview);
        write_json(&rendered, self.output.as_deref())?;

        if let Some(path) = &self.output {
            Output::new().success(&format!("Rendered to {}", path.display()));
        }
        Ok(())
    }
}

fn render(source: &Node, chapter: Option<&ChapterInput>, notes_title: &str, preview: bool) -> Node {
    match (chapter, preview) {
        (Some(chapter), false) => chapter.render(source, notes_title),
        (Some(chapter), true) => render_preview(source, &chapter.embed_options(source, notes_title)),
        (None, preview) => {
            let options = EmbedOptions {
                definitions: Some(detect_variables(source)),
                notes_title: notes_title.to_owned(),
                ..EmbedOptions::default()
            };
            if preview {
                render_preview(source, &options)
            } else {
                render_embed(source, &options)
            }
        }
    }
}

fn write_json(node: &Node, path: Option<&Path>) -> Result<(), CliError> {
    let mut json = serde_json::to_string_pretty(node)?;
    json.push('\n');
    match path {
        Some(path) => std::fs::write(path, json).map_err(|e| with_path(path, e)),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canon_tree::kinds;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn source() -> Node {
        serde_json::from_value(json!({
            "type": "doc",
            "content": [{
                "type": "paragraph",
                "content": [{"type": "text", "text": "Owned by {{team}}.{{toggle:audit}} Audited yearly.{{/toggle:audit}}"}]
            }]
        }))
        .unwrap()
    }

    fn chapter() -> ChapterInput {
        serde_json::from_value(json!({
            "local_id": "c1",
            "source_id": "std-1",
            "heading": "Ownership",
            "variable_values": {"team": "platform"}
        }))
        .unwrap()
    }

    #[test]
    fn test_render_with_embed_adds_heading() {
        let out = render(&source(), Some(&chapter()), "Notes", false);
        assert_eq!(out.children()[0].kind, kinds::HEADING);
        assert_eq!(out.children()[1].text_content(), "Owned by platform.");
    }

    #[test]
    fn test_render_preview_keeps_disabled_sections() {
        let out = render(&source(), Some(&chapter()), "Notes", true);
        assert!(out.text_content().contains("Audited yearly."));
    }

    #[test]
    fn test_render_without_embed_leaves_variables_unset() {
        let out = render(&source(), None, "Notes", false);
        assert_eq!(out.text_content(), "Owned by {{team}}.");
    }

    #[test]
    fn test_write_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&source(), Some(&path)).unwrap();

        let written = canon_tree::decode_document(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, source());
    }
}
