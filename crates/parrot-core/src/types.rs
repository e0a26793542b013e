//! Shared types for the parrot speech downloader.
//!
//! Kept free of tokio and reqwest so callers can build a configuration
//! without pulling in the I/O engine.

use std::path::PathBuf;

// ─── Defaults ──────────────────────────────────────────────────────────────

/// Remote text-to-speech endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://translate.google.com/translate_tts";

/// Player executable invoked when no custom player is configured.
pub const DEFAULT_PLAYER: &str = "mplayer";

pub const DEFAULT_FOLDER: &str = "audio";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_PORT: u16 = 9000;

/// Body returned by the index routes.
pub const INDEX_BODY: &str = "hello";

// ─── Configuration ─────────────────────────────────────────────────────────

/// Speech service configuration. Built once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechConfig {
    /// Directory holding cached speech files.
    pub folder: PathBuf,
    /// Language code sent as `tl`.
    pub language: String,
    /// Outbound HTTP proxy. Empty or `None` means a direct request.
    pub proxy: Option<String>,
    /// Synthesis endpoint, without query string.
    pub endpoint: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from(DEFAULT_FOLDER),
            language: DEFAULT_LANGUAGE.into(),
            proxy: None,
            endpoint: DEFAULT_ENDPOINT.into(),
        }
    }
}

impl SpeechConfig {
    pub fn new(folder: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            language: language.into(),
            ..Default::default()
        }
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// The proxy URL, if one is set and non-empty.
    pub fn proxy_url(&self) -> Option<&str> {
        self.proxy.as_deref().filter(|p| !p.is_empty())
    }

    /// Full path of the cache entry for `text`.
    pub fn speech_path(&self, text: &str) -> PathBuf {
        self.folder.join(crate::name::generate_name(text))
    }
}

/// Build the GET URL for synthesizing `text` in `language`.
///
/// The text is form-escaped: spaces become `+`, `*` stays literal and `~`
/// becomes `%7E`. The language code is inserted as given.
pub fn synthesis_url(endpoint: &str, text: &str, language: &str) -> String {
    let q: String = url::form_urlencoded::byte_serialize(text.as_bytes()).collect();
    format!("{endpoint}?ie=UTF-8&total=1&idx=0&textlen=32&client=tw-ob&q={q}&tl={language}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_has_fixed_parameters() {
        let url = synthesis_url(DEFAULT_ENDPOINT, "hello", "en");
        assert_eq!(
            url,
            "http://translate.google.com/translate_tts?ie=UTF-8&total=1&idx=0&textlen=32&client=tw-ob&q=hello&tl=en"
        );
    }

    #[test]
    fn url_escapes_text() {
        let url = synthesis_url("http://x/tts", "a b&c=d", "id");
        assert!(url.contains("&q=a+b%26c%3Dd&"));
        assert!(url.ends_with("&tl=id"));
    }

    #[test]
    fn url_escape_of_star_and_tilde() {
        let url = synthesis_url("http://x/tts", "a*b~c", "en");
        assert!(url.contains("&q=a*b%7Ec&"), "{url}");
    }

    #[test]
    fn empty_proxy_is_direct() {
        let config = SpeechConfig::default().with_proxy("");
        assert_eq!(config.proxy_url(), None);

        let config = SpeechConfig::default().with_proxy("http://127.0.0.1:3128");
        assert_eq!(config.proxy_url(), Some("http://127.0.0.1:3128"));
    }

    #[test]
    fn speech_path_ignores_language() {
        let en = SpeechConfig::new("audio", "en");
        let id = SpeechConfig::new("audio", "id");
        assert_eq!(en.speech_path("halo"), id.speech_path("halo"));
        assert!(en.speech_path("halo").starts_with("audio"));
    }
}
