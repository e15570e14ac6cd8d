//! `canon placeholder`, `remove`, `list` and `status` command implementations.

use std::path::PathBuf;

use canon_confluence::{ChapterStatus, PlaceholderOutcome, RemoveOutcome};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

use super::{RemoteArgs, read_source};

/// Arguments for the placeholder command.
#[derive(Args)]
pub(crate) struct PlaceholderArgs {
    /// Confluence page ID.
    page_id: String,

    /// Chapter local ID.
    local_id: String,

    /// Heading shown in the placeholder.
    #[arg(long, default_value = "")]
    heading: String,

    #[command(flatten)]
    remote: RemoteArgs,
}

impl PlaceholderArgs {
    /// Execute the placeholder command.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be updated.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let session = self.remote.connect()?;
        match session
            .publisher()
            .insert_placeholder(&self.page_id, &self.local_id, &self.heading)?
        {
            PlaceholderOutcome::Inserted { version } => output.success(&format!(
                "Placeholder for {} inserted (v{version})",
                self.local_id
            )),
            PlaceholderOutcome::AlreadyPresent => output.warning(&format!(
                "Chapter {} already exists on page {}",
                self.local_id, self.page_id
            )),
        }
        Ok(())
    }
}

/// Arguments for the remove command.
#[derive(Args)]
pub(crate) struct RemoveArgs {
    /// Confluence page ID.
    page_id: String,

    /// Chapter local ID.
    local_id: String,

    #[command(flatten)]
    remote: RemoteArgs,
}

impl RemoveArgs {
    /// Execute the remove command.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be updated.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let session = self.remote.connect()?;
        match session.publisher().remove(&self.page_id, &self.local_id)? {
            RemoveOutcome::Removed { version } => {
                output.success(&format!("Chapter {} removed (v{version})", self.local_id));
            }
            RemoveOutcome::AlreadyAbsent => output.info(&format!(
                "Chapter {} is not on page {}; nothing to remove",
                self.local_id, self.page_id
            )),
        }
        Ok(())
    }
}

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    /// Confluence page ID.
    page_id: String,

    #[command(flatten)]
    remote: RemoteArgs,
}

impl ListArgs {
    /// Execute the list command.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let session = self.remote.connect()?;
        let ids = session.publisher().list(&self.page_id)?;
        if ids.is_empty() {
            output.info(&format!("No chapters on page {}", self.page_id));
        } else {
            output.highlight(&format!("Chapters on page {} ({}):", self.page_id, ids.len()));
            for id in &ids {
                output.info(&format!("  {id}"));
            }
        }
        Ok(())
    }
}

/// Arguments for the status command.
#[derive(Args)]
pub(crate) struct StatusArgs {
    /// Confluence page ID.
    page_id: String,

    /// Path to the standard's current ADF JSON document.
    source: PathBuf,

    /// Chapter local ID.
    #[arg(long)]
    local_id: String,

    #[command(flatten)]
    remote: RemoteArgs,
}

impl StatusArgs {
    /// Execute the status command.
    ///
    /// # Errors
    ///
    /// Returns an error if the standard cannot be read or the page fetched.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let source = read_source(&self.source)?;
        let session = self.remote.connect()?;
        let status = session
            .publisher()
            .status(&self.page_id, &self.local_id, &source)?;

        let line = format!("{}: {}", self.local_id, describe_status(status));
        match status {
            ChapterStatus::Published { stale: false, .. } => output.success(&line),
            ChapterStatus::Published { stale: true, .. } | ChapterStatus::Untracked => {
                output.warning(&line);
            }
            ChapterStatus::Absent | ChapterStatus::Placeholder => output.info(&line),
        }
        Ok(())
    }
}

fn describe_status(status: ChapterStatus) -> String {
    match status {
        ChapterStatus::Absent => "not on page".to_owned(),
        ChapterStatus::Placeholder => "placeholder, not published yet".to_owned(),
        ChapterStatus::Untracked => "on page, no publish record".to_owned(),
        ChapterStatus::Published {
            stale: false,
            version,
        } => format!("published in v{version}, up to date"),
        ChapterStatus::Published {
            stale: true,
            version,
        } => format!("published in v{version}, source changed since"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_describe_status() {
        assert_eq!(describe_status(ChapterStatus::Absent), "not on page");
        assert_eq!(
            describe_status(ChapterStatus::Published {
                stale: true,
                version: 4
            }),
            "published in v4, source changed since"
        );
    }
}
