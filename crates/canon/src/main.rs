//! Canon CLI - standard content embedding.
//!
//! Provides commands for:
//! - `render`: Render a customized standard as ADF JSON
//! - `detect`: List the variables and toggles of a standard
//! - `publish` / `publish-all`: Publish chapters into a Confluence page
//! - `placeholder`: Reserve a chapter slot on a page
//! - `remove`, `list`, `status`: Manage published chapters

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    DetectArgs, ListArgs, PlaceholderArgs, PublishAllArgs, PublishArgs, RemoveArgs, RenderArgs,
    StatusArgs,
};
use output::Output;

/// Canon - embed standards into Confluence pages.
#[derive(Parser)]
#[command(name = "canon", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a standard with an embed's customizations.
    Render(RenderArgs),
    /// List the variables and toggles a standard uses.
    Detect(DetectArgs),
    /// Publish one chapter into a page.
    Publish(PublishArgs),
    /// Publish every chapter listed in a manifest.
    PublishAll(PublishAllArgs),
    /// Insert a placeholder for a chapter that is not published yet.
    Placeholder(PlaceholderArgs),
    /// Remove a chapter from a page.
    Remove(RemoveArgs),
    /// List the chapters on a page.
    List(ListArgs),
    /// Show whether a chapter is published and up to date.
    Status(StatusArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Detect(args) => args.execute(),
        Commands::Publish(args) => args.execute(),
        Commands::PublishAll(args) => args.execute(),
        Commands::Placeholder(args) => args.execute(),
        Commands::Remove(args) => args.execute(),
        Commands::List(args) => args.execute(),
        Commands::Status(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
