//! Tenun CLI - catalog feed and filter tools.
//!
//! # Usage
//!
//! ```bash
//! # Print the normalized products of a feed file
//! tenun-cli catalog parse feed.xml
//!
//! # Summarize a remote feed and check product invariants
//! tenun-cli catalog stats --url https://tenun.example/feed.xml
//!
//! # Canonicalize a listing query string
//! tenun-cli filter normalize "sort=price-asc&category=ikat,Songket&inStock=true"
//! ```
//!
//! When neither a file nor `--url` is given, the catalog commands fall back
//! to `CATALOG_FEED_URL` or `CATALOG_FEED_PATH` (read from `.env` if present).
//!
//! # Commands
//!
//! - `catalog parse` - Print normalized products as JSON
//! - `catalog stats` - Category counts, stock ratio, price range
//! - `filter normalize` - Canonical query string and active filter count

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

mod commands;

use commands::catalog::FeedSource;

#[derive(Parser)]
#[command(name = "tenun-cli")]
#[command(author, version, about = "Tenun catalog CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a product feed
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Work with listing filter query strings
    Filter {
        #[command(subcommand)]
        action: FilterAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Print the normalized products as pretty JSON
    Parse(FeedArgs),
    /// Print per-category counts, stock ratio, and price range
    Stats(FeedArgs),
}

#[derive(Subcommand)]
enum FilterAction {
    /// Print the canonical form of a query string
    Normalize {
        /// Query string, with or without a leading `?`
        query: String,
    },
}

#[derive(Args)]
struct FeedArgs {
    /// RSS feed file
    #[arg(conflicts_with = "url")]
    file: Option<PathBuf>,

    /// RSS feed URL
    #[arg(long)]
    url: Option<String>,
}

impl FeedArgs {
    fn into_source(self) -> Result<FeedSource, commands::catalog::CatalogCommandError> {
        let _ = dotenvy::dotenv();
        FeedSource::resolve(
            self.file,
            self.url,
            std::env::var("CATALOG_FEED_URL").ok(),
            std::env::var("CATALOG_FEED_PATH").ok(),
        )
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tenun_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Parse(args) => commands::catalog::parse(&args.into_source()?).await?,
            CatalogAction::Stats(args) => commands::catalog::stats(&args.into_source()?).await?,
        },
        Commands::Filter { action } => match action {
            FilterAction::Normalize { query } => commands::filter::normalize(&query),
        },
    }
    Ok(())
}
