//! Wire types for the honeypot's external contracts.
//!
//! The inbound turn request and outbound turn response use camelCase keys
//! as dictated by the transport; so does the one-shot final-report
//! callback payload. These shapes are shared between the HTTP layer and
//! the callback client and must not drift apart.

use serde::{Deserialize, Serialize};

use crate::types::ChatMessage;

// ── Inbound ───────────────────────────────────────────────────────

/// Optional request context forwarded by the transport.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnMetadata {
    pub channel: Option<String>,
    pub language: Option<String>,
    pub locale: Option<String>,
}

/// One inbound turn: a suspected scammer message plus optional context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    pub session_id: String,
    pub message: ChatMessage,
    /// Context mirror maintained by the caller; the session's own
    /// append-only history remains the source of truth.
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
    #[serde(default)]
    pub metadata: Option<TurnMetadata>,
}

// ── Outbound ──────────────────────────────────────────────────────

/// The artifact buckets reported to the caller, camelCase on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedIntelligence {
    pub bank_accounts: Vec<String>,
    pub upi_ids: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub phishing_links: Vec<String>,
    pub email_addresses: Vec<String>,
    pub suspicious_keywords: Vec<String>,
}

/// Session-level engagement counters reported on every turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetrics {
    pub total_messages_exchanged: u32,
    pub engagement_duration_seconds: f64,
}

/// The reply to one turn. `status` is always "success": the counterparty
/// must never see an error, only a plausible text reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub status: String,
    pub reply: String,
    pub scam_detected: bool,
    pub extracted_intelligence: ExtractedIntelligence,
    pub engagement_metrics: EngagementMetrics,
    pub agent_notes: String,
}

// ── Final report ──────────────────────────────────────────────────

/// One-shot report POSTed to the configured callback endpoint when a
/// session completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalReport {
    pub session_id: String,
    pub scam_detected: bool,
    pub total_messages_exchanged: u32,
    pub extracted_intelligence: ExtractedIntelligence,
    pub agent_notes: String,
}
