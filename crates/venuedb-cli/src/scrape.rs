//! Scrape command: the per-URL run loop.
//!
//! Per-URL failures are logged and skipped rather than propagated so a
//! single bad page does not abort the full run. Records that produced
//! neither price nor capacity are flagged as thin but still persisted.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use venuedb_core::AppConfig;
use venuedb_scraper::fetch::{build_http_client, fetch_html};
use venuedb_scraper::snapshot::save_debug_html;
use venuedb_scraper::{extract_with_timeout, AcquiredPage, BrowserSession};

use crate::persist;

#[derive(Debug, clap::Args)]
pub(crate) struct ScrapeArgs {
    /// Venue page URLs to scrape.
    pub(crate) urls: Vec<String>,

    /// Plain-text file of venue URLs, one per line.
    #[arg(long)]
    pub(crate) urls_file: Option<PathBuf>,

    /// YAML targets file. When no URLs are given at all, the configured
    /// targets path is used if it exists.
    #[arg(long)]
    pub(crate) targets: Option<PathBuf>,

    /// Fetch statically over HTTP instead of driving a browser. Rendered-DOM
    /// extraction is skipped for such pages.
    #[arg(long)]
    pub(crate) no_browser: bool,

    /// Override the configured output path.
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) async fn run_scrape(config: &AppConfig, args: ScrapeArgs) -> anyhow::Result<()> {
    let urls = collect_urls(config, &args)?;
    if urls.is_empty() {
        anyhow::bail!("no URLs to scrape: pass URLs, --urls-file, or --targets");
    }

    let session = if args.no_browser {
        None
    } else {
        Some(
            BrowserSession::connect(
                &config.webdriver_url,
                &config.user_agent,
                config.browser_headless,
                config.page_settle_secs,
            )
            .await?,
        )
    };
    let http = build_http_client(config.request_timeout_secs, &config.user_agent)?;

    let field_timeout = Duration::from_millis(config.field_lookup_timeout_ms);
    let mut records = Vec::new();

    for url in &urls {
        let started = Instant::now();

        let page = if let Some(session) = &session {
            match session.acquire(url).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(url, error = %e, "failed to acquire page; skipping");
                    continue;
                }
            }
        } else {
            match fetch_html(&http, url).await {
                Ok(html) => AcquiredPage::from_static(html),
                Err(e) => {
                    tracing::warn!(url, error = %e, "failed to fetch page; skipping");
                    continue;
                }
            }
        };

        if let Some(dir) = &config.debug_html_dir {
            if let Err(e) = save_debug_html(dir, url, &page.static_content) {
                tracing::warn!(url, error = %e, "debug snapshot failed");
            }
        }

        match extract_with_timeout(&page, url, field_timeout).await {
            Ok(record) => {
                if record.price.is_none() && record.capacity.is_none() {
                    tracing::warn!(url, "record is thin: neither price nor capacity was found");
                }
                tracing::info!(
                    url,
                    name = record.name.as_deref().unwrap_or("<unnamed>"),
                    elapsed = ?started.elapsed(),
                    "venue scraped"
                );
                records.push(record);
            }
            Err(e) => tracing::warn!(url, error = %e, "extraction failed; skipping"),
        }
    }

    if let Some(session) = session {
        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "failed to close webdriver session");
        }
    }

    let output = args.output.unwrap_or_else(|| config.output_path.clone());
    persist::write_records(&output, &records)?;
    println!(
        "scraped {} of {} venues -> {}",
        records.len(),
        urls.len(),
        output.display()
    );

    Ok(())
}

/// Gather URLs from positional args, the urls file, and the targets file,
/// deduplicated in first-seen order.
fn collect_urls(config: &AppConfig, args: &ScrapeArgs) -> anyhow::Result<Vec<String>> {
    let mut urls = args.urls.clone();

    if let Some(path) = &args.urls_file {
        urls.extend(persist::read_url_lines(path)?);
    }

    if let Some(path) = &args.targets {
        let targets = venuedb_core::load_targets(path)?;
        urls.extend(targets.venues.into_iter().map(|t| t.url));
    } else if urls.is_empty() && config.targets_path.exists() {
        let targets = venuedb_core::load_targets(&config.targets_path)?;
        urls.extend(targets.venues.into_iter().map(|t| t.url));
    }

    Ok(venuedb_scraper::dedup::dedup_lines(&urls))
}

#[cfg(test)]
mod tests {
    use super::*;
    use venuedb_core::Environment;

    fn test_config() -> AppConfig {
        AppConfig {
            env: Environment::Test,
            log_level: "info".to_string(),
            webdriver_url: "http://localhost:9515".to_string(),
            browser_headless: true,
            page_settle_secs: 0,
            field_lookup_timeout_ms: 100,
            request_timeout_secs: 5,
            user_agent: "venuedb-test/0.1".to_string(),
            output_path: PathBuf::from("./out.json"),
            debug_html_dir: None,
            targets_path: PathBuf::from("/definitely/not/here.yaml"),
        }
    }

    #[test]
    fn positional_urls_are_deduped_in_order() {
        let args = ScrapeArgs {
            urls: vec![
                "https://example.com/v/1".to_string(),
                "https://example.com/v/2".to_string(),
                "https://example.com/v/1".to_string(),
            ],
            urls_file: None,
            targets: None,
            no_browser: true,
            output: None,
        };
        let urls = collect_urls(&test_config(), &args).unwrap();
        assert_eq!(urls, vec!["https://example.com/v/1", "https://example.com/v/2"]);
    }

    #[test]
    fn urls_file_lines_are_merged_and_cleaned() {
        let dir = std::env::temp_dir().join(format!("venuedb-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("urls.txt");
        std::fs::write(&file, "\"https://example.com/v/2\",\n\nhttps://example.com/v/3\n").unwrap();

        let args = ScrapeArgs {
            urls: vec!["https://example.com/v/1".to_string()],
            urls_file: Some(file),
            targets: None,
            no_browser: true,
            output: None,
        };
        let urls = collect_urls(&test_config(), &args).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://example.com/v/1",
                "https://example.com/v/2",
                "https://example.com/v/3"
            ]
        );
        std::fs::remove_dir_all(&dir).ok();
    }
}
