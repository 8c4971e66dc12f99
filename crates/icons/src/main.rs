//! Icons CLI - icon pack discovery.
//!
//! Provides commands for:
//! - `packs`: List enabled icon packs
//! - `list`: List discovered icons
//! - `show`: Show one icon and its render descriptor
//! - `search`: Search icons
//! - `check`: Run every pack's extractor and report configuration errors
//! - `clear-cache`: Invalidate pack definitions, icons and search results

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, ClearCacheArgs, GlobalArgs, ListArgs, PacksArgs, SearchArgs, ShowArgs};
use output::Output;

/// Icons - icon pack discovery.
#[derive(Parser)]
#[command(name = "icons", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List enabled icon packs.
    Packs(PacksArgs),
    /// List discovered icons.
    List(ListArgs),
    /// Show one icon.
    Show(ShowArgs),
    /// Search icons by name.
    Search(SearchArgs),
    /// Check every icon pack for configuration errors.
    Check(CheckArgs),
    /// Invalidate all icon caches.
    ClearCache(ClearCacheArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Packs(args) => args.execute(&cli.global),
        Commands::List(args) => args.execute(&cli.global),
        Commands::Show(args) => args.execute(&cli.global),
        Commands::Search(args) => args.execute(&cli.global),
        Commands::Check(args) => args.execute(&cli.global),
        Commands::ClearCache(args) => args.execute(&cli.global),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
