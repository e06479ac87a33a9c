//! mirage-core: Shared types, configuration, and error handling for the Mirage honeypot.
//!
//! This crate provides the foundational types used across all Mirage components:
//! - Domain types (ScamCategory, UrgencyLevel, ChatMessage, Detection)
//! - Wire types for the inbound turn contract and the final-report callback
//! - Configuration management
//! - Common error types

pub mod config;
pub mod error;
pub mod types;
pub mod wire;

pub use error::MirageError;
