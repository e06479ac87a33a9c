//! Text-generation client.
//!
//! The engagement engine only needs two capabilities: free-text
//! generation for victim replies and JSON-constrained generation for
//! classification. Both sit behind [`GenerateText`] so the pipeline can
//! be driven by a scripted double in tests.
//!
//! The production implementation, [`GroqClient`], speaks the
//! OpenAI-compatible chat-completions dialect with a hard per-request
//! timeout. Callers treat every error as "no reply available" and fall
//! back; nothing here is allowed to surface to the counterparty.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

// ── Errors ────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("generation service returned HTTP {0}")]
    Status(u16),

    #[error("generation service returned an empty completion")]
    EmptyCompletion,
}

// ── Trait ─────────────────────────────────────────────────────────

/// Capability to turn a prompt into text.
#[async_trait]
pub trait GenerateText: Send + Sync {
    /// Free-text generation for victim replies.
    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError>;

    /// JSON-constrained generation for classification verdicts. The
    /// returned string is expected to parse as a single JSON object.
    async fn generate_structured(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError>;
}

// ── Wire shapes ───────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatTurn<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatTurn<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

// ── Production client ─────────────────────────────────────────────

/// Chat-completions client for the Groq API.
pub struct GroqClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GroqClient {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
        json_mode: bool,
    ) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatTurn {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens,
            response_format: json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let response = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Generation service error");
            return Err(LlmError::Status(status.as_u16()));
        }

        let completion: ChatCompletion = response.json().await?;
        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LlmError::EmptyCompletion);
        }
        Ok(text)
    }
}

#[async_trait]
impl GenerateText for GroqClient {
    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        self.complete(prompt, temperature, max_tokens, false).await
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        // Low temperature: the verdict schema matters more than variety.
        self.complete(prompt, 0.1, max_tokens, true).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Scripted doubles shared by the classifier and synthesizer tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Replays a fixed sequence of completions, then errors out.
    pub struct ScriptedClient {
        responses: Mutex<VecDeque<String>>,
    }

    impl ScriptedClient {
        pub fn new<I, S>(responses: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            }
        }

        fn next(&self) -> Result<String, LlmError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or(LlmError::EmptyCompletion)
        }
    }

    #[async_trait]
    impl GenerateText for ScriptedClient {
        async fn generate(&self, _: &str, _: f32, _: u32) -> Result<String, LlmError> {
            self.next()
        }

        async fn generate_structured(&self, _: &str, _: u32) -> Result<String, LlmError> {
            self.next()
        }
    }

    /// Always fails, simulating an unreachable generation service.
    pub struct UnavailableClient;

    #[async_trait]
    impl GenerateText for UnavailableClient {
        async fn generate(&self, _: &str, _: f32, _: u32) -> Result<String, LlmError> {
            Err(LlmError::EmptyCompletion)
        }

        async fn generate_structured(&self, _: &str, _: u32) -> Result<String, LlmError> {
            Err(LlmError::EmptyCompletion)
        }
    }
}
