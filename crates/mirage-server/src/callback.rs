//! Final-report callback client.
//!
//! Best effort by contract: a failed or slow callback must never stall
//! or fail the turn that triggered it, so every outcome collapses to a
//! logged boolean. The caller latches `callback_sent` only on success,
//! which gives an unreachable endpoint a retry on the next completing
//! turn.

use std::time::Duration;

use mirage_core::wire::FinalReport;

pub struct CallbackClient {
    http: reqwest::Client,
    url: String,
}

impl CallbackClient {
    /// An empty `url` disables callbacks entirely.
    pub fn new(url: &str, timeout_secs: u64) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            url: url.to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.url.is_empty()
    }

    /// POST the report. Returns true only on a 2xx response.
    pub async fn send(&self, report: &FinalReport) -> bool {
        if !self.is_enabled() {
            tracing::debug!(session_id = %report.session_id, "Callback disabled, report dropped");
            return false;
        }

        match self.http.post(&self.url).json(report).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!(
                    session_id = %report.session_id,
                    status = response.status().as_u16(),
                    "Final report delivered"
                );
                true
            }
            Ok(response) => {
                tracing::warn!(
                    session_id = %report.session_id,
                    status = response.status().as_u16(),
                    "Callback endpoint rejected report"
                );
                false
            }
            Err(error) => {
                tracing::warn!(session_id = %report.session_id, %error, "Callback delivery failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirage_core::wire::ExtractedIntelligence;

    #[tokio::test]
    async fn disabled_client_drops_report() {
        let client = CallbackClient::new("", 10);
        assert!(!client.is_enabled());

        let report = FinalReport {
            session_id: "s1".to_string(),
            scam_detected: true,
            total_messages_exchanged: 4,
            extracted_intelligence: ExtractedIntelligence::default(),
            agent_notes: String::new(),
        };
        assert!(!client.send(&report).await);
    }
}
