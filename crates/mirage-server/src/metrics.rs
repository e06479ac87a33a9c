//! Process-lifetime counters exposed on `/metrics`.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct Metrics {
    pub total_sessions: AtomicU64,
    pub scams_detected: AtomicU64,
    pub total_messages: AtomicU64,
    pub artifacts_captured: AtomicU64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_sessions: u64,
    pub scams_detected: u64,
    pub total_messages: u64,
    pub artifacts_captured: u64,
}

impl Metrics {
    pub fn incr_sessions(&self) {
        self.total_sessions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_scams(&self) {
        self.scams_detected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_messages(&self) {
        self.total_messages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_artifacts(&self, count: u64) {
        self.artifacts_captured.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_sessions: self.total_sessions.load(Ordering::Relaxed),
            scams_detected: self.scams_detected.load(Ordering::Relaxed),
            total_messages: self.total_messages.load(Ordering::Relaxed),
            artifacts_captured: self.artifacts_captured.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = Metrics::default();
        metrics.incr_sessions();
        metrics.incr_messages();
        metrics.incr_messages();
        metrics.add_artifacts(3);

        let snap = metrics.snapshot();
        assert_eq!(snap.total_sessions, 1);
        assert_eq!(snap.total_messages, 2);
        assert_eq!(snap.artifacts_captured, 3);
        assert_eq!(snap.scams_detected, 0);
    }
}
