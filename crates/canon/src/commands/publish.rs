//! `canon publish` and `canon publish-all` command implementations.

use std::path::{Path, PathBuf};

use canon_confluence::{BulkReport, ChapterInput, DryRunResult, PublishResult};
use canon_tree::Node;
use clap::Args;
use serde::Deserialize;

use crate::error::CliError;
use crate::output::Output;

use super::{RemoteArgs, read_embed, read_source, with_path};

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Confluence page ID to publish into.
    page_id: String,

    /// Path to the standard's ADF JSON document.
    source: PathBuf,

    /// Embed file describing the chapter.
    #[arg(short, long)]
    embed: PathBuf,

    /// Preview changes without updating Confluence.
    #[arg(long)]
    dry_run: bool,

    #[command(flatten)]
    remote: RemoteArgs,
}

impl PublishArgs {
    /// Execute the publish command.
    ///
    /// # Errors
    ///
    /// Returns an error if inputs cannot be read or publishing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let session = self.remote.connect()?;
        let publisher = session.publisher();

        let source = read_source(&self.source)?;
        let chapter = read_embed(&self.embed)?;
        output.info(&format!(
            "Publishing chapter {} ({}) to page {}...",
            chapter.local_id, chapter.source_id, self.page_id
        ));

        if self.dry_run {
            let result = publisher.dry_run(&self.page_id, &source, &chapter)?;
            print_dry_run_result(&output, &result);
        } else {
            let result = publisher.publish(&self.page_id, &source, &chapter)?;
            print_publish_result(&output, &result);
        }
        Ok(())
    }
}

/// Arguments for the publish-all command.
#[derive(Args)]
pub(crate) struct PublishAllArgs {
    /// Confluence page ID to publish into.
    page_id: String,

    /// JSON array of embeds, each with a `source` path and the chapter fields.
    manifest: PathBuf,

    #[command(flatten)]
    remote: RemoteArgs,
}

/// One manifest entry: a chapter and the standard it embeds.
#[derive(Debug, Deserialize)]
struct ManifestEntry {
    /// Standard document, relative to the manifest.
    source: PathBuf,
    #[serde(flatten)]
    chapter: ChapterInput,
}

impl PublishAllArgs {
    /// Execute the publish-all command.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest or a standard cannot be read, or if
    /// any chapter failed to publish.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let chapters = load_manifest(&self.manifest)?;
        let session = self.remote.connect()?;

        output.info(&format!(
            "Publishing {} chapter(s) to page {}...",
            chapters.len(),
            self.page_id
        ));
        let report = session.publisher().publish_all(&self.page_id, &chapters);
        print_bulk_report(&output, &report);

        if report.all_succeeded() {
            Ok(())
        } else {
            Err(CliError::Validation(format!(
                "{} of {} chapters failed",
                report.items.len() - report.succeeded(),
                report.items.len()
            )))
        }
    }
}

fn load_manifest(path: &Path) -> Result<Vec<(Node, ChapterInput)>, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| with_path(path, e))?;
    let entries: Vec<ManifestEntry> = serde_json::from_str(&text).map_err(|e| with_path(path, e))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    entries
        .into_iter()
        .map(|entry| Ok((read_source(&base.join(&entry.source))?, entry.chapter)))
        .collect()
}

fn print_dry_run_result(output: &Output, result: &DryRunResult) {
    output.highlight("\n[DRY RUN] No changes made.");
    output.info(&format!(
        "Current page: \"{}\" (v{})",
        result.current_title, result.current_version
    ));
    match result.existing_scheme {
        Some(scheme) => output.info(&format!(
            "Chapter {} would be replaced ({scheme:?} markers)",
            result.local_id
        )),
        None => output.info(&format!(
            "Chapter {} would be appended",
            result.local_id
        )),
    }
    output.info(&format!(
        "Region: {} bytes, page body: {} bytes",
        result.region_html.len(),
        result.body.len()
    ));
}

fn print_publish_result(output: &Output, result: &PublishResult) {
    output.success("\nChapter published successfully!");
    output.info(&format!("Chapter: {}", result.local_id));
    output.info(&format!("Page: {} ({})", result.page.title, result.page.id));
    output.info(&format!("Version: {}", result.page.version.number));
    if result.created {
        output.info("Region: appended");
    } else {
        output.info("Region: replaced");
    }
    if result.attempts > 1 {
        output.warning(&format!(
            "Page changed concurrently; published on attempt {}",
            result.attempts
        ));
    }
}

fn print_bulk_report(output: &Output, report: &BulkReport) {
    for item in &report.items {
        match &item.result {
            Ok(result) => output.success(&format!(
                "  ok   {} (v{})",
                item.local_id, result.page.version.number
            )),
            Err(err) => output.error(&format!("  FAIL {}: {err}", item.local_id)),
        }
    }
    output.info(&format!(
        "\n{} of {} chapters published",
        report.succeeded(),
        report.items.len()
    ));
}
