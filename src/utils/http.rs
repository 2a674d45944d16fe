// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use rand::Rng;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, RETRY_AFTER};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::ProviderConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ProviderConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(config.timeout())
        .build()?;
    Ok(client)
}

/// Backoff applied to rate-limited (429) responses.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_jitter: Duration,
    /// Upper bound for the delay before jitter
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
            max_jitter: Duration::from_millis(config.retry_jitter_ms),
            max_delay: Duration::from_secs(config.max_retry_after_secs),
        }
    }

    /// Retries immediately; for tests.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
            max_jitter: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (0-based).
    ///
    /// An integer `Retry-After` wins over exponential backoff. Either is
    /// capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32, retry_after: Option<&str>) -> Duration {
        let base = retry_after
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| {
                self.base_delay
                    .checked_mul(2u32.saturating_pow(attempt))
                    .unwrap_or(Duration::MAX)
            })
            .min(self.max_delay);

        let jitter_ms = self.max_jitter.as_millis() as u64;
        let jitter = if jitter_ms > 0 {
            Duration::from_millis(rand::rng().random_range(0..=jitter_ms))
        } else {
            Duration::ZERO
        };
        base.saturating_add(jitter)
    }
}

/// GET a URL and decode the JSON body, retrying on 429.
pub async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    policy: &RetryPolicy,
) -> Result<T> {
    let mut attempt = 0;
    loop {
        let response = client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS && attempt < policy.max_retries {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let delay = policy.delay_for(attempt, retry_after.as_deref());
            log::warn!(
                "Rate limited by {} (attempt {}), retrying in {:?}",
                url,
                attempt + 1,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
            continue;
        }

        if !status.is_success() {
            return Err(AppError::provider(url, format!("HTTP status {status}")));
        }

        let text = response.text().await?;
        return Ok(serde_json::from_str(&text)?);
    }
}
