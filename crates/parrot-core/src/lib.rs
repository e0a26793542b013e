//! parrot-core — Pure types and cache naming.
//!
//! No async runtime, no I/O, no platform dependencies.

pub mod name;
pub mod types;
