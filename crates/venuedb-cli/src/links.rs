//! Links command: harvest venue profile URLs from a listing page.

use std::path::PathBuf;

use venuedb_core::AppConfig;
use venuedb_scraper::fetch::{build_http_client, fetch_html};
use venuedb_scraper::links::extract_venue_links;
use venuedb_scraper::BrowserSession;

#[derive(Debug, clap::Args)]
pub(crate) struct LinksArgs {
    /// Listing page URL, e.g. a city's venue index.
    pub(crate) url: String,

    /// Fetch statically over HTTP instead of driving a browser.
    #[arg(long)]
    pub(crate) no_browser: bool,

    /// Write links to a file (one per line) instead of stdout.
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) async fn run_links(config: &AppConfig, args: LinksArgs) -> anyhow::Result<()> {
    let html = if args.no_browser {
        let client = build_http_client(config.request_timeout_secs, &config.user_agent)?;
        fetch_html(&client, &args.url).await?
    } else {
        let session = BrowserSession::connect(
            &config.webdriver_url,
            &config.user_agent,
            config.browser_headless,
            config.page_settle_secs,
        )
        .await?;
        let html = session.acquire(&args.url).await?.static_content;
        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "failed to close webdriver session");
        }
        html
    };

    let links = extract_venue_links(&html, &args.url);
    tracing::info!(url = args.url, count = links.len(), "extracted venue links");

    match args.output {
        Some(path) => {
            std::fs::write(&path, links.join("\n") + "\n")?;
            println!("wrote {} links to {}", links.len(), path.display());
        }
        None => {
            for link in &links {
                println!("{link}");
            }
        }
    }

    Ok(())
}
