// src/models/mod.rs

//! Domain models for the feed generator.

mod article;
mod config;
mod state;

pub use article::{ApiArticle, ApiUser, Article, ArticleSummary};
pub use config::{Config, FeedConfig, PathsConfig, ProviderConfig, ScheduleConfig, ServerConfig};
pub use state::SeenState;
