use clap::{Parser, Subcommand};

mod dedup;
mod links;
mod persist;
mod scrape;

#[derive(Debug, Parser)]
#[command(name = "venuedb")]
#[command(about = "Wedding venue scraping and reconciliation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape venue pages into canonical JSON records.
    Scrape(scrape::ScrapeArgs),
    /// Extract venue profile links from a listing page.
    Links(links::LinksArgs),
    /// Remove duplicate records from a scraped output file.
    Dedup(dedup::DedupArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = venuedb_core::load_app_config()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape(args) => scrape::run_scrape(&config, args).await,
        Commands::Links(args) => links::run_links(&config, args).await,
        Commands::Dedup(args) => dedup::run_dedup(&config, args),
    }
}
