//! CLI definitions for xv.
//!
//! Uses clap for argument parsing with derive macros.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// xv - local Twitter/X archive viewer
#[derive(Parser, Debug)]
#[command(name = "xv")]
#[command(version)]
#[command(about = "Ingest and browse an exported Twitter/X data archive")]
#[command(long_about = r#"
xv - a local viewer for exported Twitter/X data.

Ingests per-tweet JSON documents into SQLite, caches profile images,
and serves a small web app with timeline, profile, thread, search and
stats pages.

Quick start:
  1. Place your export under a data root with twitter-meta/ and img/
  2. Run: xv ingest /path/to/data
  3. Browse: xv serve /path/to/data
"#)]
pub struct Cli {
    /// Path to a config file (defaults to ~/.config/xv/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Be verbose (show debug info)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Be quiet (suppress non-error output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a data export into the archive database
    Ingest(IngestArgs),

    /// Serve the web viewer
    Serve(ServeArgs),

    /// Show archive statistics
    Stats(StatsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Data root holding twitter-meta/ and img/
    pub data_root: PathBuf,

    /// Delay between documents in milliseconds
    #[arg(long, env = "XV_DELAY_MS")]
    pub delay_ms: Option<u64>,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Data root holding the archive database
    pub data_root: Option<PathBuf>,

    /// Listen address
    #[arg(long, env = "XV_HOST")]
    pub host: Option<String>,

    /// Listen port
    #[arg(long, short = 'p', env = "XV_PORT")]
    pub port: Option<u16>,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Data root holding the archive database
    pub data_root: Option<PathBuf>,

    /// Number of top users to show
    #[arg(long, short = 'n', default_value = "10")]
    pub top: u32,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
