//! # backcard CLI
//!
//! Command-line interface for backcard:
//!
//! - `fetch`: extract a review and print the record as JSON
//! - `card`: render a review as a styled, self-contained HTML card
//! - `export`: render and clean a card for pasting into other surfaces
//!
//! Logging goes to stderr and is driven by `RUST_LOG`; the card output goes
//! to stdout or, with `--output`, to a file.

use anyhow::anyhow;
use backcard::export::{ExportOptions, export_fragment};
use backcard::http::HttpClient;
use backcard::pipeline::Pipeline;
use backcard::render::{RenderOptions, render_card};
use backcard::{ReviewInfo, is_review_url};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::instrument;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about = "Fetch Backloggd reviews and render them as portable HTML cards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch a review and print the extracted record as JSON
    Fetch(FetchArgs),

    /// Fetch a review and render it as an HTML card
    Card(CardArgs),

    /// Fetch, render and clean a review card for pasting elsewhere
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Review URL (https://backloggd.com/u/<user>/review/<id>)
    #[arg(required = true)]
    url: String,
}

#[derive(Args, Debug)]
struct CardArgs {
    /// Review URL (https://backloggd.com/u/<user>/review/<id>)
    #[arg(required = true)]
    url: String,

    /// Leave out the cover image
    #[arg(long)]
    no_image: bool,

    /// Leave out the attribution footer
    #[arg(long)]
    no_attribution: bool,

    /// Write the card to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Review URL (https://backloggd.com/u/<user>/review/<id>)
    #[arg(required = true)]
    url: String,

    /// Leave out the cover image
    #[arg(long)]
    no_image: bool,

    /// Leave out the attribution footer
    #[arg(long)]
    no_attribution: bool,

    /// Inline style applied to links inside the review body
    #[arg(long)]
    link_style: Option<String>,

    /// Write the cleaned card to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch(args) => fetch_command(args).await?,
        Commands::Card(args) => card_command(args).await?,
        Commands::Export(args) => export_command(args).await?,
    }

    Ok(())
}

#[instrument]
async fn fetch_command(args: FetchArgs) -> anyhow::Result<()> {
    let review = extract(&args.url).await?;
    println!("{}", serde_json::to_string_pretty(&review)?);
    Ok(())
}

#[instrument]
async fn card_command(args: CardArgs) -> anyhow::Result<()> {
    let review = extract(&args.url).await?;
    let options = RenderOptions {
        include_image: !args.no_image,
        include_attribution: !args.no_attribution,
    };

    let card = render_card(&review, &options);
    write_output(args.output, &card).await
}

#[instrument]
async fn export_command(args: ExportArgs) -> anyhow::Result<()> {
    let review = extract(&args.url).await?;
    let render_options = RenderOptions {
        include_image: !args.no_image,
        include_attribution: !args.no_attribution,
    };
    let export_options = match args.link_style {
        Some(body_link_style) => ExportOptions { body_link_style },
        None => ExportOptions::default(),
    };

    let card = render_card(&review, &render_options);
    let cleaned = export_fragment(&card, &export_options);
    write_output(args.output, &cleaned).await
}

async fn extract(url: &str) -> anyhow::Result<ReviewInfo> {
    if !is_review_url(url) {
        return Err(anyhow!("not a Backloggd review URL: {url}"));
    }

    let pipeline = Pipeline::new(Arc::new(HttpClient::new()));
    pipeline
        .submit(url)
        .await
        .ok_or_else(|| anyhow!("no review could be extracted from {url}"))
}

async fn write_output(output: Option<PathBuf>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(&path, content).await?;
            println!("Saved card to {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}
