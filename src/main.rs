use std::path::PathBuf;

use chrono::Local;
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use jokescrap::{info_time, JokeScraper, Result, Sink, DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE};
use tracing::{error, info_span, warn};

#[derive(Parser)]
#[command(name = "jokescrap", about = "Scrape jokes from paginated listing pages")]
struct Cli {
    /// Page numbers to scrape, in order
    pages: Vec<u64>,
    /// First page of an inclusive range to scrape after the listed pages
    #[arg(long, requires = "to")]
    from: Option<u64>,
    /// Last page of the range
    #[arg(long, requires = "from")]
    to: Option<u64>,
    /// Pages fetched before the jokes are saved
    #[arg(short = 'n', long, default_value_t = DEFAULT_BATCH_SIZE,
          value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    batch_size: usize,
    /// SQLite database to store the jokes in (instead of a JSON file)
    #[arg(long)]
    db: Option<PathBuf>,
    /// JSON file the jokes are written to
    #[arg(short, long, default_value = "jokes.json", conflicts_with = "db")]
    out: PathBuf,
    /// Write every batch to its own `<out>_<n>.json` file instead of overwriting `out`
    #[arg(long, conflicts_with = "db")]
    per_batch: bool,
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Pages of a batch requested at the same time
    #[arg(long, default_value_t = 1)]
    concurrency: usize,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let start_time = Local::now();

    let mut pages = cli.pages;
    if let (Some(from), Some(to)) = (cli.from, cli.to) {
        pages.extend(from..=to);
    }
    if pages.is_empty() {
        warn!("No pages to scrape. Pass page numbers or --from/--to.");
        return Ok(());
    }

    let sink = match cli.db {
        Some(db) => Sink::table(db)?,
        None if cli.per_batch => Sink::json_per_batch(cli.out),
        None => Sink::json(cli.out),
    };

    let mut scraper = JokeScraper::new(pages, sink)?
        .with_base_url(cli.base_url)
        .with_concurrency(cli.concurrency)
        .with_span(info_span!("scrape"));
    scraper.parse(cli.batch_size).await?;

    info_time!(start_time, "Full program time:");
    Ok(())
}
