//! Static-fetch collaborator: a single-attempt HTML GET with no browser.
//!
//! The degraded acquisition path: pages fetched here carry no live handle,
//! so only the structured-data and markup extractors run against them.

use std::time::Duration;

use crate::error::ScrapeError;

/// Build the HTTP client shared across a no-browser run.
///
/// # Errors
///
/// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client` cannot
/// be constructed.
pub fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<reqwest::Client, ScrapeError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Fetch the HTML body of `url`. One attempt per page; retry policy is not
/// part of this pipeline.
///
/// # Errors
///
/// - [`ScrapeError::UnexpectedStatus`] — any non-2xx response.
/// - [`ScrapeError::Http`] — network or timeout failure.
pub async fn fetch_html(client: &reqwest::Client, url: &str) -> Result<String, ScrapeError> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ScrapeError::UnexpectedStatus {
            status: response.status().as_u16(),
            url: url.to_owned(),
        });
    }

    Ok(response.text().await?)
}
