//! The per-turn pipeline.
//!
//! Every inbound message runs the same sequence: record it, classify
//! it, harvest artifacts, produce a reply, then check whether the
//! session is complete and worth reporting. The pipeline is infallible
//! from the transport's view; the counterparty only ever sees a
//! plausible text reply.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use mirage_core::config::HoneypotConfig;
use mirage_core::types::{ChatMessage, Sender};
use mirage_core::wire::{
    EngagementMetrics, ExtractedIntelligence, FinalReport, TurnRequest, TurnResponse,
};
use mirage_engage::stage::determine_stage;
use mirage_engage::synth::{SynthesizerOptions, TurnContext};
use mirage_engage::{persona, GenerateText, PersonaId, ResponseSynthesizer, ScamClassifier};
use mirage_intel::{extract, IntelligenceLedger};

use crate::callback::CallbackClient;
use crate::metrics::Metrics;
use crate::session::{Session, SessionStore};

/// Rotated while a session has not yet latched detection: neutral
/// curiosity that neither engages nor tips the honeypot's hand.
const NEUTRAL_PROBES: &[&str] = &[
    "Sorry, who is this? I don't have this number saved.",
    "I'm not sure I follow. Can you tell me more about what this is regarding?",
    "Where did you get my number from?",
    "Okay, but what exactly is this about?",
];

pub struct Orchestrator {
    config: HoneypotConfig,
    classifier: ScamClassifier,
    synthesizer: ResponseSynthesizer,
    pub store: SessionStore,
    callback: CallbackClient,
    pub metrics: Metrics,
}

impl Orchestrator {
    pub fn new(config: HoneypotConfig, llm: Arc<dyn GenerateText>) -> Self {
        let classifier = ScamClassifier::new(llm.clone(), config.max_tokens_json);
        let synthesizer = ResponseSynthesizer::new(
            llm,
            SynthesizerOptions {
                min_chars: config.reply_min_chars,
                max_chars: config.reply_max_chars,
                similarity_threshold: config.similarity_threshold,
                max_tokens: config.max_tokens_generation,
            },
        );
        let store = SessionStore::new(config.session_timeout_minutes);
        let callback = CallbackClient::new(&config.callback_url, config.callback_timeout_secs);

        Self {
            config,
            classifier,
            synthesizer,
            store,
            callback,
            metrics: Metrics::default(),
        }
    }

    /// Run one inbound message through the pipeline.
    pub async fn handle_turn(&self, request: TurnRequest) -> TurnResponse {
        let session_id = if request.session_id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            request.session_id.clone()
        };

        let (mut session, created) = self.store.checkout(&session_id);
        if created {
            self.metrics.incr_sessions();
        }

        session.history.push(request.message.clone());
        session.message_count += 1;
        session.last_activity = Utc::now();
        self.metrics.incr_messages();

        self.classify_turn(&mut session, &request.message.text).await;
        self.harvest(&mut session, &request.message.text);

        let reply = self.produce_reply(&session, &request.message.text).await;
        session.history.push(ChatMessage {
            sender: Sender::User,
            text: reply.clone(),
            timestamp: Utc::now().timestamp_millis(),
        });

        let score = session.intelligence.score();
        let complete = session.message_count >= self.config.max_messages_per_session
            || score >= self.config.intelligence_score_threshold;
        if complete && session.scam_detected && !session.callback_sent {
            let report = self.build_report(&session);
            if self.callback.send(&report).await {
                session.callback_sent = true;
            }
        }

        let response = TurnResponse {
            status: "success".to_string(),
            reply,
            scam_detected: session.scam_detected,
            extracted_intelligence: ledger_to_wire(&session.intelligence),
            engagement_metrics: EngagementMetrics {
                total_messages_exchanged: session.message_count,
                engagement_duration_seconds: session.engagement_duration_seconds(),
            },
            agent_notes: agent_notes(&session, score),
        };

        self.store.commit(session);
        response
    }

    /// Classify and apply the latch rules: detection is sticky, category
    /// and persona are assigned exactly once, confidence only ratchets.
    async fn classify_turn(&self, session: &mut Session, text: &str) {
        let detection = self.classifier.classify(text).await;

        if session.scam_detected {
            session.scam_confidence = session.scam_confidence.max(detection.confidence);
            return;
        }

        if detection.is_scam && detection.confidence >= self.config.detection_threshold {
            session.scam_detected = true;
            session.scam_confidence = detection.confidence;
            session.scam_category = Some(detection.category);
            session.persona = Some(persona::select(detection.category, detection.urgency));
            self.metrics.incr_scams();

            tracing::info!(
                session_id = %session.id,
                category = detection.category.as_str(),
                confidence = detection.confidence,
                "Scam detected, persona engaged"
            );
        }
    }

    fn harvest(&self, session: &mut Session, text: &str) {
        let extraction = extract(text);
        let before = session.intelligence.total_items();
        session.intelligence.merge(&extraction);
        let gained = session.intelligence.total_items() - before;

        if gained > 0 {
            self.metrics.add_artifacts(gained as u64);
            tracing::info!(
                session_id = %session.id,
                new_artifacts = gained,
                score = session.intelligence.score(),
                "Intelligence captured"
            );
        }
    }

    async fn produce_reply(&self, session: &Session, scammer_message: &str) -> String {
        if !session.scam_detected {
            let index = session.message_count as usize % NEUTRAL_PROBES.len();
            return NEUTRAL_PROBES[index].to_string();
        }

        let persona_id = session.persona.unwrap_or(PersonaId::TechNaiveParent);
        let stage = determine_stage(
            session.message_count,
            session.intelligence.has_hard_artifacts(),
        );
        let ctx = TurnContext {
            persona: persona::get(persona_id),
            stage,
            scammer_message,
            history: &session.history,
            ledger: &session.intelligence,
            message_count: session.message_count,
        };

        self.synthesizer.synthesize(&ctx).await
    }

    fn build_report(&self, session: &Session) -> FinalReport {
        FinalReport {
            session_id: session.id.clone(),
            scam_detected: session.scam_detected,
            total_messages_exchanged: session.message_count,
            extracted_intelligence: ledger_to_wire(&session.intelligence),
            agent_notes: agent_notes(session, session.intelligence.score()),
        }
    }
}

/// Flatten the ledger's sets into the camelCase wire shape shared by
/// turn responses, final reports, and the session-intelligence route.
pub fn ledger_to_wire(ledger: &IntelligenceLedger) -> ExtractedIntelligence {
    ExtractedIntelligence {
        bank_accounts: ledger.bank_accounts.iter().cloned().collect(),
        upi_ids: ledger.upi_ids.iter().cloned().collect(),
        phone_numbers: ledger.phone_numbers.iter().cloned().collect(),
        phishing_links: ledger.phishing_links.iter().cloned().collect(),
        email_addresses: ledger.email_addresses.iter().cloned().collect(),
        suspicious_keywords: ledger.suspicious_keywords.iter().cloned().collect(),
    }
}

fn agent_notes(session: &Session, score: f64) -> String {
    if !session.scam_detected {
        return "No scam detected yet; probing for intent.".to_string();
    }

    let category = session
        .scam_category
        .map(|c| c.as_str())
        .unwrap_or("other");
    let persona = session.persona.map(|p| p.as_str()).unwrap_or("none");
    format!(
        "Scam type: {category}. Persona: {persona}. Detection confidence: {:.2}. \
         Intelligence score: {score:.2}.",
        session.scam_confidence
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mirage_core::types::Sender;
    use mirage_engage::LlmError;

    /// Generation double: structured calls replay `verdicts` in order
    /// (repeating the last), free-text calls return `reply`.
    struct StubLlm {
        verdicts: std::sync::Mutex<Vec<String>>,
        reply: Option<String>,
    }

    impl StubLlm {
        fn new(verdicts: Vec<String>, reply: Option<String>) -> Self {
            Self {
                verdicts: std::sync::Mutex::new(verdicts),
                reply,
            }
        }
    }

    #[async_trait]
    impl GenerateText for StubLlm {
        async fn generate(&self, _: &str, _: f32, _: u32) -> Result<String, LlmError> {
            self.reply.clone().ok_or(LlmError::EmptyCompletion)
        }

        async fn generate_structured(&self, _: &str, _: u32) -> Result<String, LlmError> {
            let mut verdicts = self.verdicts.lock().unwrap();
            match verdicts.len() {
                0 => Err(LlmError::EmptyCompletion),
                1 => Ok(verdicts[0].clone()),
                _ => Ok(verdicts.remove(0)),
            }
        }
    }

    fn scam_verdict(confidence: f64) -> String {
        format!(
            r#"{{"is_scam": true, "confidence": {confidence}, "scam_type": "bank_fraud",
                "urgency_level": "high", "key_indicators": ["account threat"]}}"#
        )
    }

    fn benign_verdict() -> String {
        r#"{"is_scam": false, "confidence": 0.1, "scam_type": "other",
            "urgency_level": "low", "key_indicators": []}"#
            .to_string()
    }

    fn orchestrator(verdicts: Vec<String>, reply: Option<String>) -> Orchestrator {
        Orchestrator::new(HoneypotConfig::default(), Arc::new(StubLlm::new(verdicts, reply)))
    }

    fn turn(session_id: &str, text: &str) -> TurnRequest {
        TurnRequest {
            session_id: session_id.to_string(),
            message: ChatMessage {
                sender: Sender::Scammer,
                text: text.to_string(),
                timestamp: Utc::now().timestamp_millis(),
            },
            conversation_history: Vec::new(),
            metadata: None,
        }
    }

    #[tokio::test]
    async fn benign_turn_gets_neutral_probe() {
        let orch = orchestrator(vec![benign_verdict()], None);

        let response = orch.handle_turn(turn("s1", "hi, long time no see!")).await;
        assert_eq!(response.status, "success");
        assert!(!response.scam_detected);
        assert!(NEUTRAL_PROBES.contains(&response.reply.as_str()));
        assert_eq!(response.engagement_metrics.total_messages_exchanged, 1);
    }

    #[tokio::test]
    async fn scam_turn_latches_and_engages_persona() {
        let orch = orchestrator(
            vec![scam_verdict(0.9)],
            Some("Oh no, which account do you mean? Please explain.".to_string()),
        );

        let response = orch
            .handle_turn(turn("s1", "Your bank account will be blocked today"))
            .await;
        assert!(response.scam_detected);
        assert!(response.agent_notes.contains("bank_fraud"));
        assert!(response.agent_notes.contains("elderly_confused"));
        assert_eq!(
            response.reply,
            "Oh no, which account do you mean? Please explain."
        );
    }

    #[tokio::test]
    async fn detection_below_threshold_does_not_latch() {
        let orch = orchestrator(vec![scam_verdict(0.5)], None);

        let response = orch.handle_turn(turn("s1", "suspicious but weak")).await;
        assert!(!response.scam_detected);
    }

    #[tokio::test]
    async fn detection_is_sticky_across_turns() {
        // First verdict latches; the second, benign one must not unlatch.
        let orch = orchestrator(
            vec![scam_verdict(0.9), benign_verdict()],
            Some("Which number should I call back?".to_string()),
        );

        let first = orch.handle_turn(turn("s1", "account blocked, pay now")).await;
        assert!(first.scam_detected);

        let second = orch.handle_turn(turn("s1", "ok thanks")).await;
        assert!(second.scam_detected);
        assert_eq!(second.engagement_metrics.total_messages_exchanged, 2);
    }

    #[tokio::test]
    async fn confidence_only_ratchets_upward() {
        let orch = orchestrator(
            vec![scam_verdict(0.9), scam_verdict(0.7), scam_verdict(0.95)],
            Some("Tell me once more where to send it.".to_string()),
        );

        let first = orch.handle_turn(turn("s1", "account blocked")).await;
        assert!(first.agent_notes.contains("0.90"));

        let second = orch.handle_turn(turn("s1", "pay the fee")).await;
        assert!(second.agent_notes.contains("0.90"), "{}", second.agent_notes);

        let third = orch.handle_turn(turn("s1", "pay now or arrest")).await;
        assert!(third.agent_notes.contains("0.95"), "{}", third.agent_notes);
    }

    #[tokio::test]
    async fn intelligence_accumulates_across_turns() {
        let orch = orchestrator(
            vec![scam_verdict(0.9)],
            Some("Okay, and is there a number I can call you on?".to_string()),
        );

        let first = orch
            .handle_turn(turn("s1", "pay the fee to fraud@okaxis immediately"))
            .await;
        assert_eq!(first.extracted_intelligence.upi_ids, vec!["fraud@okaxis"]);

        let second = orch
            .handle_turn(turn("s1", "or call 9876543210 for help"))
            .await;
        assert_eq!(second.extracted_intelligence.upi_ids, vec!["fraud@okaxis"]);
        assert_eq!(
            second.extracted_intelligence.phone_numbers,
            vec!["9876543210"]
        );
    }

    #[tokio::test]
    async fn empty_session_id_gets_generated_one() {
        let orch = orchestrator(vec![benign_verdict()], None);

        let response = orch.handle_turn(turn("", "hello there, friend")).await;
        assert_eq!(response.status, "success");
        assert_eq!(orch.store.active_count(), 1);
    }

    #[tokio::test]
    async fn generation_outage_still_yields_reply() {
        // Both generation paths fail: lexicon classifier plus canned
        // persona replies carry the turn.
        let orch = orchestrator(Vec::new(), None);

        let response = orch
            .handle_turn(turn(
                "s1",
                "URGENT: your bank account is blocked, verify kyc immediately",
            ))
            .await;
        assert!(response.scam_detected);
        assert!(!response.reply.is_empty());
    }

    #[tokio::test]
    async fn metrics_track_sessions_and_scams() {
        let orch = orchestrator(
            vec![scam_verdict(0.9)],
            Some("Please tell me what to do next here.".to_string()),
        );

        let _ = orch.handle_turn(turn("s1", "account blocked, pay fee")).await;
        let _ = orch.handle_turn(turn("s2", "account blocked, pay fee")).await;

        let snap = orch.metrics.snapshot();
        assert_eq!(snap.total_sessions, 2);
        assert_eq!(snap.scams_detected, 2);
        assert_eq!(snap.total_messages, 2);
    }
}
