// src/services/articles.rs

//! Top-article fetching.
//!
//! Two stages: one top-list query for metadata, then one detail request per
//! article for its body. A failed detail request drops that article only.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{ApiArticle, Article, ArticleSummary, ProviderConfig};
use crate::utils::endpoint;
use crate::utils::http::{RetryPolicy, create_async_client, fetch_json};

/// A provider of ranked articles.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// List the top articles over the trailing `top_days`, best first.
    async fn list_top(&self, top_days: u32, limit: usize) -> Result<Vec<ArticleSummary>>;

    /// Fetch the full article behind a listing entry.
    async fn fetch_article(&self, summary: &ArticleSummary) -> Result<Article>;
}

/// Summary of a fetch run.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Articles with bodies, in rank order
    pub articles: Vec<Article>,
    /// Entries returned by the top-list query
    pub listed: usize,
    /// Detail requests that failed and were skipped
    pub detail_failures: usize,
}

/// DEV.to REST API client.
pub struct DevToClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl DevToClient {
    /// Create a client from provider settings.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            base_url: config.base_url.clone(),
            retry: RetryPolicy::from_config(config),
        })
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl ArticleSource for DevToClient {
    async fn list_top(&self, top_days: u32, limit: usize) -> Result<Vec<ArticleSummary>> {
        let url = endpoint(
            &self.base_url,
            &["articles"],
            &[("top", top_days.to_string()), ("per_page", limit.to_string())],
        )?;
        log::debug!("Listing top articles: {}", url);

        let listing: Vec<ApiArticle> = fetch_json(&self.client, url.as_str(), &self.retry).await?;
        Ok(listing
            .into_iter()
            .take(limit)
            .map(ArticleSummary::from)
            .collect())
    }

    async fn fetch_article(&self, summary: &ArticleSummary) -> Result<Article> {
        let url = endpoint(&self.base_url, &["articles", &summary.id], &[])?;
        let detail: ApiArticle = fetch_json(&self.client, url.as_str(), &self.retry).await?;
        Ok(Article::from_detail(summary, detail))
    }
}

/// Fetch the top articles with bodies populated.
///
/// A failed or empty listing fails the whole run. Detail requests run with
/// at most `concurrency` in flight; results keep listing order.
pub async fn fetch_top_articles(
    source: &dyn ArticleSource,
    top_days: u32,
    limit: usize,
    concurrency: usize,
) -> Result<FetchOutcome> {
    let listing = source.list_top(top_days, limit).await?;
    if listing.is_empty() {
        return Err(AppError::EmptyListing);
    }
    log::info!("Listed {} top articles over {} days", listing.len(), top_days);

    let mut outcome = FetchOutcome {
        listed: listing.len(),
        ..FetchOutcome::default()
    };

    let mut detail_stream = stream::iter(listing.iter())
        .map(|summary| async move { (summary, source.fetch_article(summary).await) })
        .buffered(concurrency.max(1));

    while let Some((summary, result)) = detail_stream.next().await {
        match result {
            Ok(article) => outcome.articles.push(article),
            Err(error) => {
                outcome.detail_failures += 1;
                log::warn!(
                    "Skipping article {} ({}): {}",
                    summary.id,
                    summary.title,
                    error
                );
            }
        }
    }

    Ok(outcome)
}
