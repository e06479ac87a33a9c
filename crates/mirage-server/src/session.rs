//! In-memory session state.
//!
//! One [`Session`] per conversation, keyed by the caller's session id.
//! The store hands out clones and writes them back, so the lock is held
//! only for map access and never across a turn's async work. Detection
//! state is latched: once a session flips to detected, category and
//! persona are fixed and confidence only ratchets upward.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use mirage_core::types::{ChatMessage, ScamCategory};
use mirage_engage::PersonaId;
use mirage_intel::IntelligenceLedger;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    /// Append-only transcript, both directions.
    pub history: Vec<ChatMessage>,
    /// Inbound (scammer) messages only.
    pub message_count: u32,
    pub scam_detected: bool,
    /// Highest classifier confidence seen; never decreases.
    pub scam_confidence: f64,
    pub scam_category: Option<ScamCategory>,
    pub persona: Option<PersonaId>,
    pub intelligence: IntelligenceLedger,
    pub callback_sent: bool,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(id: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            history: Vec::new(),
            message_count: 0,
            scam_detected: false,
            scam_confidence: 0.0,
            scam_category: None,
            persona: None,
            intelligence: IntelligenceLedger::default(),
            callback_sent: false,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn engagement_duration_seconds(&self) -> f64 {
        (Utc::now() - self.created_at).num_milliseconds() as f64 / 1000.0
    }

    fn is_idle(&self, timeout: Duration) -> bool {
        Utc::now() - self.last_activity > timeout
    }
}

/// Mutex-guarded session map with lazy idle eviction.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout_minutes: u64) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout: Duration::minutes(idle_timeout_minutes as i64),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Clone out the session for a turn, creating a fresh one if the id
    /// is unknown or the existing session has gone idle. Returns the
    /// session and whether it was newly created.
    ///
    /// Every checkout sweeps the whole map, so abandoned sessions under
    /// other ids are evicted by ordinary traffic rather than lingering
    /// until someone polls the health endpoint.
    pub fn checkout(&self, id: &str) -> (Session, bool) {
        let mut map = self.lock();
        let before = map.len();
        map.retain(|_, s| !s.is_idle(self.idle_timeout));
        if map.len() < before {
            tracing::info!(evicted = before - map.len(), "Idle sessions swept");
        }

        match map.get(id) {
            Some(existing) => (existing.clone(), false),
            None => (Session::new(id.to_string()), true),
        }
    }

    /// Write a turn's updated session back. Last writer wins.
    pub fn commit(&self, session: Session) {
        self.lock().insert(session.id.clone(), session);
    }

    pub fn snapshot(&self, id: &str) -> Option<Session> {
        let map = self.lock();
        map.get(id)
            .filter(|s| !s.is_idle(self.idle_timeout))
            .cloned()
    }

    /// Count of live sessions, evicting idle ones on the way.
    pub fn active_count(&self) -> usize {
        let mut map = self.lock();
        map.retain(|_, s| !s.is_idle(self.idle_timeout));
        map.len()
    }

    /// Raw map size, no eviction.
    #[cfg(test)]
    fn stored_count(&self) -> usize {
        self.lock().len()
    }
}
