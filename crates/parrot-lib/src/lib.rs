//! parrot-lib — Speech engine.
//!
//! Cached speech download, external playback, and the HTTP front.
//! Depends on parrot-core for naming and configuration types.

pub mod cache;
pub mod error;
pub mod fetch;
pub mod form;
pub mod player;
pub mod server;
pub mod speech;

pub use error::SpeechError;
pub use speech::SpeechService;

// Re-export parrot-core for convenience
pub use parrot_core;
