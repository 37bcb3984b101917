//! Unified error types for Versecast.

use thiserror::Error;

/// Result type alias using VersecastError.
pub type Result<T> = std::result::Result<T, VersecastError>;

#[derive(Error, Debug)]
pub enum VersecastError {
    // Corpus errors
    #[error("Load error: {0}")]
    Load(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Corpus not loaded: {0}")]
    NotLoaded(String),

    // Delivery errors
    #[error("Delivery error: {0}")]
    Delivery(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl VersecastError {
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_loaded(msg: impl Into<String>) -> Self {
        Self::NotLoaded(msg.into())
    }

    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
