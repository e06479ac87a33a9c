//! Scam classification.
//!
//! The primary path asks the generation service for a JSON verdict.
//! Any failure on that path, including malformed JSON, degrades to a
//! pure lexicon classifier so a turn is never left without a verdict.
//! Detection state latching (sticky flag, max confidence, immutable
//! category) is the session pipeline's job; this module is stateless
//! and judges one message at a time.

use std::sync::Arc;

use serde::Deserialize;

use mirage_core::types::{Detection, ScamCategory, UrgencyLevel};

use crate::llm::GenerateText;

const MAX_INDICATORS: usize = 5;

// ── Fallback lexicon ──────────────────────────────────────────────

/// Single-word indicators, matched against whole tokens.
const KEYWORD_TOKENS: &[&str] = &[
    // pressure and threat
    "urgent",
    "immediately",
    "today",
    "blocked",
    "suspended",
    "deactivated",
    "expired",
    "penalty",
    "arrest",
    "police",
    // authority posture
    "bank",
    "sbi",
    "hdfc",
    "icici",
    "rbi",
    "microsoft",
    // money movement
    "upi",
    "account",
    "transfer",
    "pay",
    "payment",
    "fee",
    "refund",
    "cashback",
    // credential harvesting
    "verify",
    "kyc",
    "otp",
    "cvv",
    "pin",
    "password",
    "confirm",
    // prize bait
    "won",
    "winner",
    "prize",
    "lottery",
    "congratulations",
    "free",
    "claim",
    // investment bait
    "investment",
    "guaranteed",
    "returns",
    "double",
    "crypto",
    "profit",
    // job bait
    "selected",
    "shortlisted",
    "job",
    "salary",
    "hiring",
    "registration",
    // delivery vectors
    "click",
    "link",
    "http",
    "download",
    // tech-support framing
    "virus",
    "hacked",
    "compromised",
    "alert",
];

/// Multi-word indicators, matched as substrings of the lowered message.
const KEYWORD_PHRASES: &[&str] = &[
    "legal action",
    "customer care",
    "send money",
    "processing fee",
    "lucky draw",
    "gift card",
    "work from home",
    "tech support",
];

const HIGH_URGENCY_TOKENS: &[&str] = &["urgent", "immediately", "now", "today"];
const CRITICAL_URGENCY_TOKENS: &[&str] = &["blocked", "suspended", "arrest", "legal"];

// ── Structured verdict ────────────────────────────────────────────

fn default_urgency() -> String {
    "medium".to_string()
}

#[derive(Deserialize)]
struct LlmVerdict {
    is_scam: bool,
    confidence: f64,
    #[serde(default)]
    scam_type: String,
    #[serde(default = "default_urgency")]
    urgency_level: String,
    #[serde(default)]
    key_indicators: Vec<String>,
}

fn parse_category(raw: &str) -> ScamCategory {
    match raw.trim().to_lowercase().as_str() {
        "bank_fraud" | "bank" => ScamCategory::BankFraud,
        "upi_fraud" | "upi" => ScamCategory::UpiFraud,
        "phishing" => ScamCategory::Phishing,
        "job_scam" | "job" => ScamCategory::JobScam,
        "lottery" => ScamCategory::Lottery,
        "investment" => ScamCategory::Investment,
        "tech_support" => ScamCategory::TechSupport,
        _ => ScamCategory::Other,
    }
}

fn parse_urgency(raw: &str) -> UrgencyLevel {
    match raw.trim().to_lowercase().as_str() {
        "low" => UrgencyLevel::Low,
        "high" => UrgencyLevel::High,
        "critical" => UrgencyLevel::Critical,
        _ => UrgencyLevel::Medium,
    }
}

/// Completions often arrive wrapped in markdown fences; unwrap before
/// handing to serde.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

// ── Classifier ────────────────────────────────────────────────────

pub struct ScamClassifier {
    llm: Arc<dyn GenerateText>,
    max_tokens: u32,
}

impl ScamClassifier {
    pub fn new(llm: Arc<dyn GenerateText>, max_tokens: u32) -> Self {
        Self { llm, max_tokens }
    }

    /// Judge one inbound message. Infallible: generation trouble of any
    /// kind drops to the lexicon path.
    pub async fn classify(&self, message: &str) -> Detection {
        let prompt = build_verdict_prompt(message);

        match self.llm.generate_structured(&prompt, self.max_tokens).await {
            Ok(raw) => match serde_json::from_str::<LlmVerdict>(strip_code_fence(&raw)) {
                Ok(verdict) => {
                    let mut indicators = verdict.key_indicators;
                    indicators.truncate(MAX_INDICATORS);
                    Detection {
                        is_scam: verdict.is_scam,
                        confidence: verdict.confidence.clamp(0.0, 1.0),
                        category: parse_category(&verdict.scam_type),
                        urgency: parse_urgency(&verdict.urgency_level),
                        indicators,
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, "Unparseable verdict, using lexicon classifier");
                    fallback_classify(message)
                }
            },
            Err(error) => {
                tracing::warn!(%error, "Generation unavailable, using lexicon classifier");
                fallback_classify(message)
            }
        }
    }
}

fn build_verdict_prompt(message: &str) -> String {
    format!(
        "You are a fraud analyst. Judge whether the following message is part of a \
         scam attempt.\n\nMessage: \"{message}\"\n\n\
         Answer with a single JSON object, nothing else:\n\
         {{\"is_scam\": true|false, \"confidence\": 0.0-1.0, \
         \"scam_type\": \"bank_fraud|upi_fraud|phishing|job_scam|lottery|investment|tech_support|other\", \
         \"urgency_level\": \"low|medium|high|critical\", \
         \"key_indicators\": [\"...\"]}}"
    )
}

// ── Lexicon fallback ──────────────────────────────────────────────

/// Pure keyword classifier, used whenever structured generation is
/// unavailable. Confidence is `matches * 0.20` capped at 0.95, and two
/// or more matches flag the message as a scam.
pub fn fallback_classify(message: &str) -> Detection {
    let lower = message.to_lowercase();
    let tokens: std::collections::HashSet<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let mut indicators: Vec<String> = Vec::new();
    for kw in KEYWORD_TOKENS {
        if tokens.contains(kw) {
            indicators.push((*kw).to_string());
        }
    }
    for phrase in KEYWORD_PHRASES {
        if lower.contains(phrase) {
            indicators.push((*phrase).to_string());
        }
    }

    let matches = indicators.len();
    let confidence = ((matches as f64) * 0.20).min(0.95);
    let is_scam = matches >= 2;

    let category = categorize(&tokens, &lower);
    let urgency = judge_urgency(&tokens, matches);

    indicators.truncate(MAX_INDICATORS);

    Detection {
        is_scam,
        confidence,
        category,
        urgency,
        indicators,
    }
}

/// First matching rule wins; ordering reflects how specific the signal
/// is, with bank and UPI markers ahead of generic bait words.
fn categorize(tokens: &std::collections::HashSet<&str>, lower: &str) -> ScamCategory {
    let any = |words: &[&str]| words.iter().any(|w| tokens.contains(w));

    if any(&["bank", "kyc"]) || (tokens.contains("account") && any(&["blocked", "suspended"])) {
        ScamCategory::BankFraud
    } else if tokens.contains("upi") || lower.contains('@') {
        ScamCategory::UpiFraud
    } else if any(&["http", "link", "click"]) {
        ScamCategory::Phishing
    } else if any(&["prize", "lottery", "winner", "won"]) {
        ScamCategory::Lottery
    } else if any(&["job", "salary", "hiring", "shortlisted"]) || lower.contains("work from home") {
        ScamCategory::JobScam
    } else if any(&["investment", "returns", "double", "crypto"]) {
        ScamCategory::Investment
    } else if any(&["virus", "microsoft", "hacked"]) || lower.contains("tech support") {
        ScamCategory::TechSupport
    } else {
        ScamCategory::Other
    }
}

fn judge_urgency(tokens: &std::collections::HashSet<&str>, matches: usize) -> UrgencyLevel {
    if HIGH_URGENCY_TOKENS.iter().any(|w| tokens.contains(w)) {
        UrgencyLevel::High
    } else if CRITICAL_URGENCY_TOKENS.iter().any(|w| tokens.contains(w)) {
        UrgencyLevel::Critical
    } else if matches >= 3 {
        UrgencyLevel::Medium
    } else {
        UrgencyLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::test_support::{ScriptedClient, UnavailableClient};

    #[test]
    fn benign_message_is_not_flagged() {
        let detection = fallback_classify("hey, are we still meeting for lunch tomorrow?");
        assert!(!detection.is_scam);
        assert!(detection.confidence < 0.4);
    }

    #[test]
    fn single_keyword_is_below_threshold() {
        let detection = fallback_classify("please confirm the lunch plan");
        assert!(!detection.is_scam);
        assert_eq!(detection.confidence, 0.20);
    }

    #[test]
    fn keyword_dense_message_is_flagged() {
        let detection =
            fallback_classify("URGENT: your bank account is blocked, verify your KYC immediately");
        assert!(detection.is_scam);
        assert!(detection.confidence > 0.6);
        assert_eq!(detection.category, ScamCategory::BankFraud);
        assert_eq!(detection.urgency, UrgencyLevel::High);
    }

    #[test]
    fn confidence_caps_below_one() {
        let detection = fallback_classify(
            "urgent immediately today blocked suspended verify kyc otp pin password \
             bank account transfer pay fee",
        );
        assert_eq!(detection.confidence, 0.95);
        assert_eq!(detection.indicators.len(), MAX_INDICATORS);
    }

    #[test]
    fn category_priority_bank_over_lottery() {
        let detection = fallback_classify("you won a prize from the bank, verify your kyc");
        assert_eq!(detection.category, ScamCategory::BankFraud);
    }

    #[test]
    fn lottery_and_job_categories() {
        assert_eq!(
            fallback_classify("congratulations, you are the lucky winner of our prize draw")
                .category,
            ScamCategory::Lottery
        );
        assert_eq!(
            fallback_classify("you are shortlisted for a work from home job, pay registration")
                .category,
            ScamCategory::JobScam
        );
    }

    #[test]
    fn keyword_matching_is_token_bounded() {
        // "know" must not match "now", "scowl" must not match "owl"-ish
        // partials; token matching keeps urgency honest.
        let detection = fallback_classify("I know the account is fine");
        assert_ne!(detection.urgency, UrgencyLevel::High);
    }

    #[tokio::test]
    async fn structured_verdict_is_used_when_valid() {
        let client = ScriptedClient::new([
            r#"{"is_scam": true, "confidence": 0.92, "scam_type": "upi_fraud",
                "urgency_level": "critical", "key_indicators": ["payment demand"]}"#,
        ]);
        let classifier = ScamClassifier::new(Arc::new(client), 200);

        let detection = classifier.classify("send 5000 to fraud@ybl now").await;
        assert!(detection.is_scam);
        assert_eq!(detection.confidence, 0.92);
        assert_eq!(detection.category, ScamCategory::UpiFraud);
        assert_eq!(detection.urgency, UrgencyLevel::Critical);
    }

    #[tokio::test]
    async fn fenced_verdict_is_unwrapped() {
        let client = ScriptedClient::new([
            "```json\n{\"is_scam\": true, \"confidence\": 0.8, \"scam_type\": \"phishing\", \
             \"urgency_level\": \"high\", \"key_indicators\": []}\n```",
        ]);
        let classifier = ScamClassifier::new(Arc::new(client), 200);

        let detection = classifier.classify("click this link").await;
        assert_eq!(detection.category, ScamCategory::Phishing);
    }

    #[tokio::test]
    async fn malformed_verdict_falls_back_to_lexicon() {
        let client = ScriptedClient::new(["this is not json at all"]);
        let classifier = ScamClassifier::new(Arc::new(client), 200);

        let detection = classifier
            .classify("urgent: your account is blocked, verify kyc")
            .await;
        assert!(detection.is_scam);
        assert_eq!(detection.category, ScamCategory::BankFraud);
    }

    #[tokio::test]
    async fn unavailable_service_falls_back_to_lexicon() {
        let classifier = ScamClassifier::new(Arc::new(UnavailableClient), 200);

        let detection = classifier.classify("you won a lottery prize, claim now").await;
        assert!(detection.is_scam);
        assert_eq!(detection.category, ScamCategory::Lottery);
    }

    #[tokio::test]
    async fn out_of_range_confidence_is_clamped() {
        let client = ScriptedClient::new([
            r#"{"is_scam": true, "confidence": 3.5, "scam_type": "other",
                "urgency_level": "low", "key_indicators": []}"#,
        ]);
        let classifier = ScamClassifier::new(Arc::new(client), 200);

        let detection = classifier.classify("anything").await;
        assert_eq!(detection.confidence, 1.0);
    }
}
