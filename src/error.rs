// src/error.rs

//! Unified error handling for the feed generator.

use std::fmt;

use thiserror::Error;

/// Result type alias for feed operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Provider answered with an unusable response
    #[error("Provider error for {context}: {message}")]
    Provider { context: String, message: String },

    /// The top-list query returned nothing
    #[error("No articles returned from the provider")]
    EmptyListing,

    /// Feed serialization failed
    #[error("Feed build error: {0}")]
    Feed(String),

    /// HTTP server failed
    #[error("Server error: {0}")]
    Server(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a provider error with context.
    pub fn provider(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Provider {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a feed build error.
    pub fn feed(message: impl fmt::Display) -> Self {
        Self::Feed(message.to_string())
    }

    /// Create a server error.
    pub fn server(message: impl fmt::Display) -> Self {
        Self::Server(message.to_string())
    }
}
