//! xv - local Twitter/X archive viewer
//!
//! Main entry point for the xv command-line tool.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use xv::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with_target(false)
        .without_time()
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from_file(path)
                .with_context(|| format!("cannot load config from {}", path.display()))?;
            config.apply_env_overrides();
            config
        }
        None => Config::load(),
    };

    match &cli.command {
        Commands::Ingest(args) => cmd_ingest(&mut config, args),
        Commands::Serve(args) => cmd_serve(&mut config, args),
        Commands::Stats(args) => cmd_stats(&config, args),
        Commands::Completions(args) => cmd_completions(args.clone()),
    }
}

/// Pick the data root: CLI argument first, then config.
fn resolve_data_root(config: &Config, arg: Option<&PathBuf>) -> Result<PathBuf> {
    arg.cloned()
        .or_else(|| config.data_root.clone())
        .context("no data root given; pass one or set XV_DATA_ROOT")
}

fn cmd_ingest(config: &mut Config, args: &cli::IngestArgs) -> Result<()> {
    if let Some(delay) = args.delay_ms {
        config.ingest.delay_ms = delay;
    }

    println!("{}", "Ingesting data export...".bold().cyan());
    println!("  Data root: {}", args.data_root.display());
    println!();

    let mut ingestor = Ingestor::new(&args.data_root, config)?;
    let report = ingestor.run()?;

    if report.succeeded > 0 {
        println!();
        println!(
            "Run {} to browse your archive.",
            format!("xv serve {}", args.data_root.display()).bold()
        );
    }
    Ok(())
}

fn cmd_serve(config: &mut Config, args: &cli::ServeArgs) -> Result<()> {
    let data_root = resolve_data_root(config, args.data_root.as_ref())?;
    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("cannot start async runtime")?;
    runtime.block_on(server::run(config, &data_root))?;
    Ok(())
}

fn cmd_stats(config: &Config, args: &cli::StatsArgs) -> Result<()> {
    let data_root = resolve_data_root(config, args.data_root.as_ref())?;
    let paths = DataPaths::new(&data_root);
    let storage = Storage::open_existing(paths.db_path())?;

    let stats = storage.stats_overview()?;
    println!("{}", "Archive Statistics".bold().cyan());
    println!("{}", "-".repeat(40));
    println!("  {:<20} {:>10}", "Tweets:", format_count(stats.total_tweets));
    println!("  {:<20} {:>10}", "Users:", format_count(stats.total_users));
    println!("  {:<20} {:>10}", "Media files:", format_count(stats.total_media));
    println!("  {:<20} {:>10}", "Retweets:", format_count(stats.total_retweets));
    println!("  {:<20} {:>10}", "Replies:", format_count(stats.total_replies));
    println!("  {:<20} {:>10}", "Quotes:", format_count(stats.total_quotes));
    println!("{}", "-".repeat(40));

    let top = storage.top_users(args.top)?;
    if !top.is_empty() {
        println!("  Most active users:");
        for entry in top {
            println!(
                "    @{:<16} {}",
                entry.user.nick.as_deref().unwrap_or("?"),
                format_count(entry.tweet_count).cyan()
            );
        }
    }
    Ok(())
}

fn cmd_completions(args: cli::CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "xv", &mut io::stdout());
    Ok(())
}
