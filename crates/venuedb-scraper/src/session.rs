//! Browser session collaborator: WebDriver lifecycle and page acquisition.
//!
//! Connects to a running WebDriver endpoint (chromedriver by default) and
//! hands the pipeline an [`AcquiredPage`] pairing the rendered snapshot with
//! the live client handle.

use std::collections::HashMap;
use std::time::Duration;

use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use webdriver::capabilities::Capabilities;

use crate::error::ScrapeError;
use crate::types::AcquiredPage;

pub struct BrowserSession {
    client: Client,
    settle: Duration,
}

impl BrowserSession {
    /// Establish a WebDriver session with headless-Chrome capability args.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Connect`] when the WebDriver endpoint is
    /// unreachable or rejects the session.
    pub async fn connect(
        webdriver_url: &str,
        user_agent: &str,
        headless: bool,
        page_settle_secs: u64,
    ) -> Result<Self, ScrapeError> {
        let mut args = vec![
            "--disable-gpu".to_string(),
            "--window-size=1920,1080".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--no-sandbox".to_string(),
            "--disable-blink-features=AutomationControlled".to_string(),
            format!("--user-agent={user_agent}"),
        ];
        if headless {
            args.push("--headless=new".to_string());
        }

        let mut chrome_opts = HashMap::new();
        chrome_opts.insert("args".to_string(), json!(args));

        let mut caps = Capabilities::new();
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(webdriver_url)
            .await?;

        tracing::info!(webdriver_url, headless, "webdriver session established");
        Ok(Self {
            client,
            settle: Duration::from_secs(page_settle_secs),
        })
    }

    /// Navigate to `url`, let client-side rendering settle, and capture the
    /// rendered snapshot alongside the live handle.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Session`] when navigation or source capture
    /// fails.
    pub async fn acquire(&self, url: &str) -> Result<AcquiredPage<'_>, ScrapeError> {
        self.client.goto(url).await?;
        tokio::time::sleep(self.settle).await;

        let html = self.client.source().await?;
        tracing::debug!(url, bytes = html.len(), "page acquired");

        Ok(AcquiredPage {
            static_content: html,
            live: Some(&self.client),
        })
    }

    /// End the WebDriver session.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Session`] when the session refuses to close.
    pub async fn close(self) -> Result<(), ScrapeError> {
        self.client.close().await?;
        Ok(())
    }
}
