//! Error type shared by every stage of the speech pipeline.

use thiserror::Error;

/// Failure of a cache, fetch, or playback step. Nothing is retried; the
/// first error is handed back to the caller.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Malformed proxy URL or an HTTP client that could not be built.
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error("playback error: {0}")]
    Playback(String),
}

impl SpeechError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn playback(message: impl Into<String>) -> Self {
        Self::Playback(message.into())
    }
}
