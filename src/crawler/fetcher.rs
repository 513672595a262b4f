//! HTTP fetcher
//!
//! Builds the shared reqwest client and performs single-page fetches with
//! bounded retries. HTTP error statuses are returned as outcomes, never as
//! errors; only transport-level faults (DNS, connect, timeout) are retried
//! and, once the attempts are exhausted, surfaced as [`FetchError`].

use crate::config::CrawlerConfig;
use crate::crawler::store::FetchOutcome;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Transport-level failure after all retry attempts
#[derive(Debug, Error)]
#[error("Fetch failed for '{url}' after {attempts} attempts: {source}")]
pub struct FetchError {
    pub url: String,
    pub attempts: u32,
    #[source]
    pub source: reqwest::Error,
}

/// Builds the HTTP client shared by all workers
///
/// Redirects are followed (ranking and team paths on vlr.gg redirect to
/// their canonical slugs), and compressed responses are handled
/// transparently.
pub fn build_http_client(user_agent: &str, config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one absolute URL, retrying transport faults with exponential
/// backoff.
///
/// # Retry policy
///
/// | Condition | Action |
/// |-----------|--------|
/// | Any HTTP status (2xx-5xx) | Delivered as a `FetchOutcome` |
/// | Timeout / connect / DNS fault | Retry, backoff doubled per attempt |
/// | Attempts exhausted | `Err(FetchError)` |
pub async fn fetch_page(
    client: &Client,
    url: &str,
    attempts: u32,
    base_backoff: Duration,
) -> Result<FetchOutcome, FetchError> {
    let mut backoff = base_backoff;
    let mut last_error = None;

    for attempt in 1..=attempts {
        match client.get(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                // Body read failures are transport faults too.
                match response.text().await {
                    Ok(body) => return Ok(FetchOutcome::new(status, body)),
                    Err(e) => last_error = Some(e),
                }
            }
            Err(e) => last_error = Some(e),
        }

        if attempt < attempts {
            tracing::debug!(
                "Fetch attempt {}/{} for {} failed, retrying in {:?}",
                attempt,
                attempts,
                url,
                backoff
            );
            tokio::time::sleep(backoff).await;
            backoff *= 2;
        }
    }

    Err(FetchError {
        url: url.to_string(),
        attempts,
        // last_error is always set when every attempt failed
        source: last_error.unwrap(),
    })
}
