//! Deterministic cache filenames for synthesized speech.

use std::fmt::Write;

use sha2::{Digest, Sha256};

/// Prefix shared by every cached speech file.
pub const CACHE_PREFIX: &str = "irp-";

/// Extension of every cached speech file.
pub const CACHE_EXTENSION: &str = ".mp3";

/// Derive the cache filename for `text`: `irp-<sha256 hex>.mp3`.
///
/// Only the raw text bytes are hashed. The language code is not part of the
/// key, so the same text requested in two languages shares one cache entry.
pub fn generate_name(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut name = String::with_capacity(CACHE_PREFIX.len() + 64 + CACHE_EXTENSION.len());
    name.push_str(CACHE_PREFIX);
    for byte in digest {
        let _ = write!(name, "{byte:02x}");
    }
    name.push_str(CACHE_EXTENSION);
    name
}
