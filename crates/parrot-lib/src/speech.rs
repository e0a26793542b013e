//! Speech service — cached download followed by playback.
//!
//! ```text
//! speak("text") → generate_name → ensure_folder → exists? ─yes─┐
//!                                                  └─no→ fetch ┴→ play
//! ```
//!
//! Every step runs once. The first error aborts the call and is returned as-is.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use parrot_core::types::SpeechConfig;

use crate::cache;
use crate::error::SpeechError;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::player::{ExternalPlayer, Player};

/// Cloneable handle holding an immutable [`SpeechConfig`].
#[derive(Clone)]
pub struct SpeechService {
    config: Arc<SpeechConfig>,
    fetcher: Arc<dyn Fetcher>,
    player: Option<Arc<dyn Player>>,
}

impl SpeechService {
    /// Service fetching from `config.endpoint` and playing with the default player.
    pub fn new(config: SpeechConfig) -> Self {
        let fetcher = HttpFetcher::new(config.endpoint.clone());
        Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
            player: None,
        }
    }

    /// Use a caller-supplied player instead of the default executable.
    pub fn with_player(mut self, player: impl Player + 'static) -> Self {
        self.player = Some(Arc::new(player));
        self
    }

    pub fn with_fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Arc::new(fetcher);
        self
    }

    pub fn config(&self) -> &SpeechConfig {
        &self.config
    }

    /// Make sure a speech file for `text` is cached and return its path.
    pub async fn create_speech_file(&self, text: &str) -> Result<PathBuf, SpeechError> {
        let path = self.config.speech_path(text);

        cache::ensure_folder(&self.config.folder).await?;

        if cache::exists(&path).await {
            debug!("speech: cache hit {}", path.display());
            return Ok(path);
        }

        info!("speech: cache miss, fetching {}", path.display());
        self.fetcher
            .fetch(
                &path,
                text,
                &self.config.language,
                self.config.proxy_url(),
            )
            .await?;

        Ok(path)
    }

    /// Play an existing speech file with the configured player.
    pub async fn play_speech_file(&self, path: &Path) -> Result<(), SpeechError> {
        match &self.player {
            Some(player) => player.play(path).await,
            None => ExternalPlayer::default().play(path).await,
        }
    }

    /// Download `text` unless cached, then play it.
    pub async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let path = self.create_speech_file(text).await?;
        self.play_speech_file(&path).await
    }
}
