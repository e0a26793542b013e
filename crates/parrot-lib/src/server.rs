//! HTTP front for parrot.
//!
//! Runs on port 9000 by default. Stateless: no handler touches the speech
//! cache. Form fields are read through [`FormValues`]; a missing field reads
//! as the empty string.

use std::path::Path;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use futures_util::{StreamExt, stream};
use tokio_util::io::ReaderStream;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use parrot_core::types::INDEX_BODY;

use crate::form::FormValues;

/// Build the axum router. Unknown paths fall through to the index handler.
pub fn router() -> Router {
    Router::new()
        .route("/", any(index))
        .route("/index", any(index))
        .route("/handle-text", any(handle_text))
        .route("/download/audio", any(download_audio))
        .fallback(index)
        .layer(TraceLayer::new_for_http())
}

async fn index() -> &'static str {
    INDEX_BODY
}

/// Accepts a `text` field and only logs it; nothing is written back.
async fn handle_text(form: FormValues) -> StatusCode {
    info!(text = %form.get("text"), "handle-text");
    StatusCode::OK
}

/// Streams the file named by the `path` field as an attachment.
///
/// The path is opened as given, with no restriction to the cache folder.
async fn download_audio(form: FormValues) -> Response {
    let path = form.get("path");

    let file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(e) => return internal_error(e.to_string()),
    };

    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let disposition = format!("attachment; filename={name}");
    let disposition = match HeaderValue::from_bytes(disposition.as_bytes()) {
        Ok(value) => value,
        Err(e) => return internal_error(format!("bad file name {name:?}: {e}")),
    };

    // The first read decides the status; opening a directory succeeds but
    // reading it does not.
    let mut chunks = ReaderStream::new(file);
    let first = match chunks.next().await {
        Some(Err(e)) => return internal_error(e.to_string()),
        first => first,
    };

    info!("download: streaming {path}");

    // Headers are sent with the first chunk, so a later read error can only
    // abort the stream.
    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(stream::iter(first).chain(chunks)),
    )
        .into_response()
}

fn internal_error(message: String) -> Response {
    warn!(error = %message, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}
