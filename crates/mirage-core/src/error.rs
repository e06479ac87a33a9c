//! Common error types shared across Mirage crates.

use thiserror::Error;

/// Top-level error type for the Mirage honeypot.
///
/// The turn pipeline itself is infallible by contract; these errors
/// surface only at the edges, primarily startup and serialization.
#[derive(Error, Debug)]
pub enum MirageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
