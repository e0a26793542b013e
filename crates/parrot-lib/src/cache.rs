//! On-disk speech cache — one file per text under the storage folder.
//!
//! There is no index. Presence is an open attempt on every call, and the
//! check and the later create are separate steps: two concurrent requests for
//! the same text can both miss and both write the same file.

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::SpeechError;

/// Create `folder` and any missing parents, owner-only, unless it can
/// already be opened.
///
/// Only a "not found" open triggers creation. Any other open failure is
/// ignored and left for the next file operation to report.
pub async fn ensure_folder(folder: &Path) -> Result<(), SpeechError> {
    match tokio::fs::File::open(folder).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("cache: creating folder {}", folder.display());
            let mut builder = tokio::fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            builder.mode(0o700);
            builder.create(folder).await?;
            Ok(())
        }
        Err(e) => {
            debug!("cache: folder {} not openable: {e}", folder.display());
            Ok(())
        }
    }
}

/// Whether a cache entry exists at `path`.
///
/// Only "not found" counts as absent; a permission error reads as present.
pub async fn exists(path: &Path) -> bool {
    match tokio::fs::File::open(path).await {
        Ok(_) => true,
        Err(e) => e.kind() != ErrorKind::NotFound,
    }
}
