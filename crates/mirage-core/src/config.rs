//! Configuration for the Mirage honeypot service.
//!
//! Loaded from `mirage.toml` `[honeypot]` section or `MIRAGE__`
//! environment variables. The tuned thresholds (detection confidence,
//! score cutoff, similarity bound) were calibrated empirically against
//! sample conversations; treat them as knobs, not constants.

use serde::Deserialize;

/// Top-level honeypot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HoneypotConfig {
    /// Address the HTTP layer binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Shared secret expected in the `x-api-key` header. Empty disables
    /// the check (all requests pass with a warning).
    #[serde(default)]
    pub api_key: String,

    /// API key for the external generation service.
    #[serde(default)]
    pub groq_api_key: String,

    /// Model identifier sent to the generation service.
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    /// Per-call timeout for generation requests, in seconds.
    #[serde(default = "default_llm_timeout")]
    pub llm_timeout_secs: u64,

    /// Token budget for free-text reply generation.
    #[serde(default = "default_max_tokens_generation")]
    pub max_tokens_generation: u32,

    /// Token budget for structured (JSON) generation.
    #[serde(default = "default_max_tokens_json")]
    pub max_tokens_json: u32,

    /// Minimum classifier confidence required to latch scam detection.
    #[serde(default = "default_detection_threshold")]
    pub detection_threshold: f64,

    /// Idle minutes after which a session is evicted.
    #[serde(default = "default_session_timeout")]
    pub session_timeout_minutes: u64,

    /// Inbound-message cap per session; reaching it completes the session.
    #[serde(default = "default_max_messages")]
    pub max_messages_per_session: u32,

    /// Ledger score at which a session is considered complete.
    #[serde(default = "default_score_threshold")]
    pub intelligence_score_threshold: f64,

    /// Endpoint for the one-shot final report. Empty disables callbacks.
    #[serde(default)]
    pub callback_url: String,

    /// Timeout for the final-report POST, in seconds.
    #[serde(default = "default_callback_timeout")]
    pub callback_timeout_secs: u64,

    /// Jaccard word-overlap above which a candidate reply is considered
    /// a repeat of a recent one and discarded.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Reply length bounds enforced by the synthesizer, in characters.
    #[serde(default = "default_reply_min_chars")]
    pub reply_min_chars: usize,

    #[serde(default = "default_reply_max_chars")]
    pub reply_max_chars: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_llm_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_llm_timeout() -> u64 {
    20
}

fn default_max_tokens_generation() -> u32 {
    300
}

fn default_max_tokens_json() -> u32 {
    200
}

fn default_detection_threshold() -> f64 {
    0.65
}

fn default_session_timeout() -> u64 {
    30
}

fn default_max_messages() -> u32 {
    10
}

fn default_score_threshold() -> f64 {
    6.0
}

fn default_callback_timeout() -> u64 {
    10
}

fn default_similarity_threshold() -> f64 {
    0.7
}

fn default_reply_min_chars() -> usize {
    5
}

fn default_reply_max_chars() -> usize {
    300
}

impl Default for HoneypotConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            api_key: String::new(),
            groq_api_key: String::new(),
            llm_model: default_llm_model(),
            llm_timeout_secs: default_llm_timeout(),
            max_tokens_generation: default_max_tokens_generation(),
            max_tokens_json: default_max_tokens_json(),
            detection_threshold: default_detection_threshold(),
            session_timeout_minutes: default_session_timeout(),
            max_messages_per_session: default_max_messages(),
            intelligence_score_threshold: default_score_threshold(),
            callback_url: String::new(),
            callback_timeout_secs: default_callback_timeout(),
            similarity_threshold: default_similarity_threshold(),
            reply_min_chars: default_reply_min_chars(),
            reply_max_chars: default_reply_max_chars(),
        }
    }
}
