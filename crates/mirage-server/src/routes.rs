//! HTTP surface.
//!
//! The chat endpoint never returns a client-visible error for bad
//! payloads: whoever is on the other end is likely the scammer, so a
//! malformed body gets a confused-human reply with a success status
//! instead of a 400. The only hard rejection is a failed API-key check.

use std::sync::Arc;

use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use chrono::{DateTime, Utc};

use mirage_core::config::HoneypotConfig;
use mirage_core::wire::{EngagementMetrics, ExtractedIntelligence, TurnRequest, TurnResponse};
use mirage_engage::GenerateText;

use crate::orchestrator::{ledger_to_wire, Orchestrator};

const API_KEY_HEADER: &str = "x-api-key";

/// What the counterparty sees when their payload makes no sense.
const CLARIFICATION_REPLY: &str = "I'm sorry, I didn't understand that. Can you explain again?";

pub struct AppState {
    pub orchestrator: Orchestrator,
    api_key: String,
    started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: HoneypotConfig, llm: Arc<dyn GenerateText>) -> Self {
        if config.api_key.is_empty() {
            tracing::warn!("No API key configured; chat endpoint is open");
        }
        let api_key = config.api_key.clone();
        Self {
            orchestrator: Orchestrator::new(config, llm),
            api_key,
            started_at: Utc::now(),
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(chat)
        .service(session_intelligence)
        .service(health)
        .service(metrics);
}

fn clarification_response() -> TurnResponse {
    TurnResponse {
        status: "success".to_string(),
        reply: CLARIFICATION_REPLY.to_string(),
        scam_detected: false,
        extracted_intelligence: ExtractedIntelligence::default(),
        engagement_metrics: EngagementMetrics {
            total_messages_exchanged: 0,
            engagement_duration_seconds: 0.0,
        },
        agent_notes: "Unparseable request body.".to_string(),
    }
}

#[post("/api/chat")]
async fn chat(state: web::Data<AppState>, req: HttpRequest, body: web::Bytes) -> impl Responder {
    if !state.api_key.is_empty() {
        let provided = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if provided != state.api_key {
            tracing::warn!("Chat request rejected: bad api key");
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "status": "error",
                "message": "invalid or missing api key"
            }));
        }
    }

    let request: TurnRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => {
            tracing::warn!(%error, "Unparseable chat payload, replying in character");
            return HttpResponse::Ok().json(clarification_response());
        }
    };

    let response = state.orchestrator.handle_turn(request).await;
    HttpResponse::Ok().json(response)
}

#[get("/api/sessions/{id}/intelligence")]
async fn session_intelligence(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    match state.orchestrator.store.snapshot(&id) {
        Some(session) => HttpResponse::Ok().json(serde_json::json!({
            "sessionId": session.id,
            "scamDetected": session.scam_detected,
            "scamCategory": session.scam_category.map(|c| c.as_str()),
            "intelligenceScore": session.intelligence.score(),
            "extractedIntelligence": ledger_to_wire(&session.intelligence),
        })),
        None => HttpResponse::NotFound().json(serde_json::json!({
            "status": "error",
            "message": "unknown session"
        })),
    }
}

#[get("/health")]
async fn health(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "activeSessions": state.orchestrator.store.active_count(),
        "uptimeSeconds": (Utc::now() - state.started_at).num_seconds(),
    }))
}

#[get("/metrics")]
async fn metrics(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.orchestrator.metrics.snapshot())
}
