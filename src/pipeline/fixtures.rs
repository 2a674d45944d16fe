//! Scripted article source for pipeline tests.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Article, ArticleSummary, Config};
use crate::services::ArticleSource;

/// Serves a fixed article list; listings and single articles can be made to fail.
pub struct ScriptedSource {
    articles: Mutex<Vec<Article>>,
    failing_ids: Mutex<HashSet<String>>,
    failing_listings: AtomicUsize,
    list_calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            articles: Mutex::new(articles),
            failing_ids: Mutex::new(HashSet::new()),
            failing_listings: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_articles(&self, articles: Vec<Article>) {
        *self.articles.lock().unwrap() = articles;
    }

    pub fn fail_article(&self, id: &str) {
        self.failing_ids.lock().unwrap().insert(id.to_string());
    }

    pub fn fail_next_listings(&self, count: usize) {
        self.failing_listings.store(count, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArticleSource for ScriptedSource {
    async fn list_top(&self, _top_days: u32, limit: usize) -> Result<Vec<ArticleSummary>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let should_fail = self
            .failing_listings
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(AppError::provider("list_top", "scripted failure"));
        }

        Ok(self
            .articles
            .lock()
            .unwrap()
            .iter()
            .take(limit)
            .map(|a| ArticleSummary {
                id: a.id.clone(),
                title: a.title.clone(),
                url: a.url.clone(),
                description: a.summary.clone(),
                published_at: a.published_at,
                author: a.author.clone(),
            })
            .collect())
    }

    async fn fetch_article(&self, summary: &ArticleSummary) -> Result<Article> {
        if self.failing_ids.lock().unwrap().contains(&summary.id) {
            return Err(AppError::provider(&summary.id, "scripted failure"));
        }
        self.articles
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == summary.id)
            .cloned()
            .ok_or_else(|| AppError::provider(&summary.id, "not found"))
    }
}

pub fn article(id: &str, body_html: &str) -> Article {
    Article {
        id: id.to_string(),
        title: format!("Article {id}"),
        url: format!("https://dev.to/someone/{id}"),
        published_at: None,
        author: "Someone".to_string(),
        summary: String::new(),
        body_html: body_html.to_string(),
    }
}

/// Default config with both files under `dir`.
pub fn config_in(dir: &Path) -> Config {
    let mut config = Config::default();
    config.paths.output = dir.join("feed.xml");
    config.paths.state_file = dir.join("state.json");
    config.provider.max_concurrent = 2;
    config
}
