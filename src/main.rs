use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tweetlist::twitter_parser::parse_search_results_reader;
use tweetlist::{RenderConfig, TweetRenderer};

#[derive(Parser, Debug)]
#[command(name = "tweetlist")]
#[command(about = "Render a tweet search response as HTML list items")]
struct Args {
    /// Search response JSON (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reference instant for relative times, RFC 3339 (defaults to now)
    #[arg(long)]
    now: Option<String>,

    /// Override the number of tweets rendered
    #[arg(long)]
    max_items: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tweetlist=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let mut config = RenderConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(max_items) = args.max_items {
        config.max_rendered_items = max_items;
    }

    let now: DateTime<Utc> = match &args.now {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("Invalid --now value: {}", raw))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let batch = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            parse_search_results_reader(BufReader::new(file))
        }
        None => parse_search_results_reader(io::stdin().lock()),
    }
    .context("Failed to read search results")?;

    tracing::debug!(records = batch.len(), "Loaded search results");

    let renderer = TweetRenderer::new(config);
    tracing::debug!(
        max_items = renderer.config().max_rendered_items,
        "Rendering search results"
    );
    let rendered = renderer.render_batch(&batch, &now);
    if rendered.is_partial() {
        tracing::warn!(
            rendered = rendered.rendered,
            skipped = rendered.skipped.len(),
            "Some tweets could not be rendered"
        );
    }

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", rendered.html)?;
    Ok(())
}
