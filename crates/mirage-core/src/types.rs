//! Core domain types for the Mirage honeypot.
//!
//! These types describe a single honeypot conversation: who said what,
//! what kind of scam was detected, and how urgent the scammer is acting.
//! Shared across all Mirage crates.

use serde::{Deserialize, Serialize};

// ── Messages ──────────────────────────────────────────────────────

/// The author of a conversation message.
///
/// `User` is the synthetic victim; the honeypot never reveals itself,
/// so from the counterparty's perspective these are the only two roles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Scammer,
    User,
}

/// A single message in a conversation, as carried on the wire.
///
/// `timestamp` is Unix milliseconds, matching the transport contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub timestamp: i64,
}

// ── Classification ────────────────────────────────────────────────

/// Closed set of scam categories a session can be assigned.
///
/// Assigned once at first detection and held fixed for the session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScamCategory {
    BankFraud,
    UpiFraud,
    Phishing,
    JobScam,
    Lottery,
    Investment,
    TechSupport,
    Other,
}

impl ScamCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BankFraud => "bank_fraud",
            Self::UpiFraud => "upi_fraud",
            Self::Phishing => "phishing",
            Self::JobScam => "job_scam",
            Self::Lottery => "lottery",
            Self::Investment => "investment",
            Self::TechSupport => "tech_support",
            Self::Other => "other",
        }
    }
}

/// How hard the scammer is pushing. Drives persona selection: high
/// pressure gets met with the most exploitable-seeming profiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// The outcome of classifying one inbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub is_scam: bool,
    /// Confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    pub category: ScamCategory,
    pub urgency: UrgencyLevel,
    /// Up to five keyword indicators that drove the decision.
    pub indicators: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::Scammer).unwrap(), "\"scammer\"");
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&ScamCategory::BankFraud).unwrap();
        assert_eq!(json, "\"bank_fraud\"");

        let parsed: ScamCategory = serde_json::from_str("\"tech_support\"").unwrap();
        assert_eq!(parsed, ScamCategory::TechSupport);
    }

    #[test]
    fn urgency_ordering() {
        assert!(UrgencyLevel::Critical > UrgencyLevel::High);
        assert!(UrgencyLevel::High > UrgencyLevel::Medium);
        assert!(UrgencyLevel::Medium > UrgencyLevel::Low);
    }

    #[test]
    fn chat_message_roundtrip() {
        let msg = ChatMessage {
            sender: Sender::Scammer,
            text: "Your account is blocked".to_string(),
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sender, Sender::Scammer);
        assert_eq!(back.timestamp, msg.timestamp);
    }
}
