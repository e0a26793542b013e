//! Speech download from the remote synthesis endpoint.

use std::path::Path;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use parrot_core::types::synthesis_url;

use crate::error::SpeechError;

/// Writes synthesized speech for a text to a destination file.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(
        &self,
        dest: &Path,
        text: &str,
        language: &str,
        proxy: Option<&str>,
    ) -> Result<(), SpeechError>;
}

/// Fetcher backed by a plain HTTP GET against the synthesis endpoint.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    endpoint: String,
}

impl HttpFetcher {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(parrot_core::types::DEFAULT_ENDPOINT)
    }
}

/// Build the HTTP client for one request.
///
/// With a proxy, all traffic goes through it and certificate checks are
/// off so self-signed intercepting proxies work.
pub fn client(proxy: Option<&str>) -> Result<reqwest::Client, SpeechError> {
    let Some(proxy) = proxy.filter(|p| !p.is_empty()) else {
        return Ok(reqwest::Client::new());
    };

    let proxy_url = url::Url::parse(proxy)
        .map_err(|e| SpeechError::config(format!("invalid proxy url {proxy:?}: {e}")))?;
    let proxy = reqwest::Proxy::all(proxy_url)
        .map_err(|e| SpeechError::config(format!("invalid proxy: {e}")))?;

    reqwest::Client::builder()
        .proxy(proxy)
        .danger_accept_invalid_certs(true)
        .build()
        .map_err(|e| SpeechError::config(format!("failed to build http client: {e}")))
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        dest: &Path,
        text: &str,
        language: &str,
        proxy: Option<&str>,
    ) -> Result<(), SpeechError> {
        let client = client(proxy)?;
        let url = synthesis_url(&self.endpoint, text, language);

        debug!("fetch: GET {} chars (tl={language})", text.len());
        let resp = client.get(&url).send().await?;

        // The status is not checked: whatever body comes back is cached.
        if !resp.status().is_success() {
            warn!("fetch: synthesis answered {}, caching body anyway", resp.status());
        }

        // No cleanup on failure below: a broken stream leaves a partial file.
        let mut file = tokio::fs::File::create(dest).await?;
        let mut bytes_done: u64 = 0;
        let mut stream = resp.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            bytes_done += chunk.len() as u64;
        }

        file.flush().await?;

        info!("fetch: wrote {bytes_done} bytes to {}", dest.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use tempfile::tempdir;

    fn endpoint(server: &MockServer) -> String {
        format!("http://{}/translate_tts", server.address())
    }

    #[tokio::test]
    async fn writes_body_to_destination() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/translate_tts")
                .query_param("ie", "UTF-8")
                .query_param("total", "1")
                .query_param("idx", "0")
                .query_param("textlen", "32")
                .query_param("client", "tw-ob")
                .query_param("q", "pagi")
                .query_param("tl", "id");
            then.status(200).body(b"ID3fake-mp3");
        });

        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.mp3");
        HttpFetcher::new(endpoint(&server))
            .fetch(&dest, "pagi", "id", None)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(std::fs::read(&dest).unwrap(), b"ID3fake-mp3");
    }

    #[tokio::test]
    async fn truncates_existing_destination() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/translate_tts");
            then.status(200).body(b"new");
        });

        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.mp3");
        std::fs::write(&dest, b"much longer old contents").unwrap();

        HttpFetcher::new(endpoint(&server))
            .fetch(&dest, "x", "en", None)
            .await
            .unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }

    #[tokio::test]
    async fn error_status_body_is_still_written() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/translate_tts");
            then.status(503).body("unavailable");
        });

        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.mp3");
        HttpFetcher::new(endpoint(&server))
            .fetch(&dest, "x", "en", None)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"unavailable");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.mp3");
        let err = HttpFetcher::new("http://127.0.0.1:1/translate_tts")
            .fetch(&dest, "x", "en", None)
            .await
            .unwrap_err();

        assert!(matches!(err, SpeechError::Network(_)));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn malformed_proxy_is_config_error() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.mp3");
        let err = HttpFetcher::default()
            .fetch(&dest, "x", "en", Some("not a url"))
            .await
            .unwrap_err();

        assert!(matches!(err, SpeechError::Config(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn routes_through_proxy() {
        let proxy = MockServer::start_async().await;
        let mock = proxy.mock(|when, then| {
            when.method(GET)
                .path("/translate_tts")
                .query_param("ie", "UTF-8")
                .query_param("total", "1")
                .query_param("idx", "0")
                .query_param("textlen", "32")
                .query_param("client", "tw-ob")
                .query_param("q", "proksi")
                .query_param("tl", "id");
            then.status(200).body(b"ID3proxied");
        });

        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.mp3");
        let proxy_url = format!("http://{}", proxy.address());

        // The endpoint host does not resolve; only the proxy can answer.
        HttpFetcher::new("http://speech.invalid/translate_tts")
            .fetch(&dest, "proksi", "id", Some(&proxy_url))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(std::fs::read(&dest).unwrap(), b"ID3proxied");
    }

    #[test]
    fn empty_proxy_builds_direct_client() {
        assert!(client(Some("")).is_ok());
        assert!(client(None).is_ok());
        assert!(client(Some("http://127.0.0.1:3128")).is_ok());
    }
}
