//! Audio playback through an external player process.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tracing::debug;

use parrot_core::types::DEFAULT_PLAYER;

use crate::error::SpeechError;

/// Something that can play an audio file to completion.
#[async_trait]
pub trait Player: Send + Sync {
    async fn play(&self, path: &Path) -> Result<(), SpeechError>;
}

/// Runs `<program> <path>` and waits for it to exit.
#[derive(Debug, Clone)]
pub struct ExternalPlayer {
    program: String,
}

impl ExternalPlayer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for ExternalPlayer {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER)
    }
}

#[async_trait]
impl Player for ExternalPlayer {
    async fn play(&self, path: &Path) -> Result<(), SpeechError> {
        debug!("player: {} {}", self.program, path.display());

        let output = tokio::process::Command::new(&self.program)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| SpeechError::playback(format!("failed to spawn {}: {e}", self.program)))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines() {
            debug!("[{}] {line}", self.program);
        }

        if !output.status.success() {
            let last = stderr.lines().last().unwrap_or_default();
            return Err(SpeechError::playback(format!(
                "{} exited with {}: {last}",
                self.program, output.status
            )));
        }

        Ok(())
    }
}
