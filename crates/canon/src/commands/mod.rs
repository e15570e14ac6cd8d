//! CLI command implementations.

mod chapter;
mod detect;
mod publish;
mod render;

use std::path::{Path, PathBuf};

use canon_config::{CliSettings, Config};
use canon_confluence::{ChapterInput, ChapterPublisher, ConfluenceClient};
use canon_store::FileStore;
use canon_tree::Node;
use clap::Args;
use tracing::debug;

use crate::error::CliError;

pub(crate) use chapter::{ListArgs, PlaceholderArgs, RemoveArgs, StatusArgs};
pub(crate) use detect::DetectArgs;
pub(crate) use publish::{PublishAllArgs, PublishArgs};
pub(crate) use render::RenderArgs;

/// Options shared by every command that talks to Confluence.
#[derive(Args)]
pub(crate) struct RemoteArgs {
    /// Path to configuration file (default: auto-discover canon.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Confluence base URL (overrides config).
    #[arg(long, env = "CANON_BASE_URL")]
    base_url: Option<String>,

    /// Directory holding publish records (overrides config).
    #[arg(long)]
    store_dir: Option<PathBuf>,
}

impl RemoteArgs {
    /// Load config and open the client and record store.
    fn connect(&self) -> Result<Session, CliError> {
        let cli_settings = CliSettings {
            base_url: self.base_url.clone(),
            store_dir: self.store_dir.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let client = ConfluenceClient::from_config(config.require_confluence()?);
        let store = FileStore::open(&config.store_resolved.dir)?;
        debug!(store = %store.root().display(), "Opened publish record store");
        Ok(Session {
            config,
            client,
            store,
        })
    }
}

/// Loaded configuration with a ready client and store.
struct Session {
    config: Config,
    client: ConfluenceClient,
    store: FileStore,
}

impl Session {
    fn publisher(&self) -> ChapterPublisher<'_, ConfluenceClient> {
        ChapterPublisher::new(&self.client, &self.store, self.config.publish.clone())
    }
}

/// Attach the offending path to an input error.
fn with_path(path: &Path, err: impl Into<CliError>) -> CliError {
    CliError::Input {
        path: path.display().to_string(),
        source: Box::new(err.into()),
    }
}

/// Read a standard's ADF document.
fn read_source(path: &Path) -> Result<Node, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| with_path(path, e))?;
    canon_tree::decode_document(&text).map_err(|e| with_path(path, e))
}

/// Read an embed file.
fn read_embed(path: &Path) -> Result<ChapterInput, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| with_path(path, e))?;
    serde_json::from_str(&text).map_err(|e| with_path(path, e))
}
