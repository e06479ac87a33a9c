//! Victim reply synthesis.
//!
//! Generation output is untrusted: it can come back empty, truncated,
//! off-voice, or sounding like an assistant. Every candidate therefore
//! runs a validation gate and a repetition check against the victim's
//! own recent replies. The policy is two attempts, the second with a
//! stricter prompt and lower temperature, then a canned persona reply.
//! The caller always gets a usable line of text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

use mirage_core::types::{ChatMessage, Sender};
use mirage_intel::IntelligenceLedger;

use crate::llm::GenerateText;
use crate::persona::Persona;
use crate::stage::Stage;

/// Victim replies the repetition check looks back over.
const REPETITION_WINDOW: usize = 5;

/// History lines included in the synthesis prompt.
const PROMPT_HISTORY_WINDOW: usize = 5;

/// Emitted only if every canned option would repeat a recent reply.
const GENERIC_REPLY: &str = "I understand. What should I do next?";

/// Low-content one-liners that kill the conversation.
const FRAGMENT_REPLIES: &[&str] = &[
    "ok", "okay", "yes", "no", "sure", "what", "hmm", "fine", "alright", "idk", "maybe",
];

/// Assistant phrasing that would expose the honeypot instantly.
const AI_TELLS: &[&str] = &[
    "as an ai",
    "i'm an ai",
    "i am an ai",
    "language model",
    "artificial intelligence",
    "i cannot assist",
    "i'm unable to",
    "i apologize, but",
    "how can i help you today",
];

/// Short reactions allowed to stand without terminal punctuation.
const INTERJECTIONS: &[&str] = &["oh no", "no way", "wait what", "hold on", "oh dear"];

static DANGLING_END_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(and|but|or|so|because|to|the|a|an|my|your|their|is|are|was|were|with|for|of|in|that|this)[\s.!?,]*$",
    )
    .expect("dangling-end regex")
});

static LABEL_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(reply|response|victim|me|you)\s*:\s*").expect("label regex"));

// ── Validation ────────────────────────────────────────────────────

/// Why a generated candidate was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyRejection {
    TooShort,
    TooLong,
    Fragment,
    AssistantTell,
    Unterminated,
    DanglingClause,
}

impl ReplyRejection {
    fn as_str(&self) -> &'static str {
        match self {
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::Fragment => "fragment",
            Self::AssistantTell => "assistant_tell",
            Self::Unterminated => "unterminated",
            Self::DanglingClause => "dangling_clause",
        }
    }
}

/// Strip transcript labels and wrapping quotes the model sometimes adds.
fn clean_reply(raw: &str) -> String {
    let mut text = raw.trim();
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        text = text[1..text.len() - 1].trim();
    }
    LABEL_PREFIX_RE.replace(text, "").trim().to_string()
}

/// Gate one candidate reply. Order matters only for which reason gets
/// logged; all failures lead to a retry or a canned reply.
pub fn validate_reply(text: &str, min_chars: usize, max_chars: usize) -> Result<(), ReplyRejection> {
    let chars = text.chars().count();
    if chars < min_chars {
        return Err(ReplyRejection::TooShort);
    }
    if chars > max_chars {
        return Err(ReplyRejection::TooLong);
    }

    let lower = text.to_lowercase();
    let bare = lower.trim_end_matches(['.', '!', '?', ',', '…']);
    if FRAGMENT_REPLIES.contains(&bare) {
        return Err(ReplyRejection::Fragment);
    }
    if AI_TELLS.iter().any(|tell| lower.contains(tell)) {
        return Err(ReplyRejection::AssistantTell);
    }

    let terminated = text.ends_with(['.', '!', '?', '…']);
    if !terminated && !INTERJECTIONS.contains(&bare) {
        return Err(ReplyRejection::Unterminated);
    }
    if terminated && DANGLING_END_RE.is_match(text) {
        return Err(ReplyRejection::DanglingClause);
    }

    Ok(())
}

// ── Repetition ────────────────────────────────────────────────────

/// Jaccard similarity over lowercased word sets.
fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let words = |s: &str| -> HashSet<String> {
        s.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    };
    let a = words(a);
    let b = words(b);
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

fn recent_victim_replies(history: &[ChatMessage], window: usize) -> Vec<&str> {
    history
        .iter()
        .rev()
        .filter(|m| m.sender == Sender::User)
        .take(window)
        .map(|m| m.text.as_str())
        .collect()
}

fn is_repetitive(candidate: &str, recent: &[&str], threshold: f64) -> bool {
    recent
        .iter()
        .any(|prior| jaccard_similarity(candidate, prior) >= threshold)
}

// ── Synthesizer ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SynthesizerOptions {
    pub min_chars: usize,
    pub max_chars: usize,
    pub similarity_threshold: f64,
    pub max_tokens: u32,
}

impl Default for SynthesizerOptions {
    fn default() -> Self {
        Self {
            min_chars: 5,
            max_chars: 300,
            similarity_threshold: 0.7,
            max_tokens: 300,
        }
    }
}

/// Everything the synthesizer needs to produce one victim reply.
pub struct TurnContext<'a> {
    pub persona: &'a Persona,
    pub stage: Stage,
    pub scammer_message: &'a str,
    pub history: &'a [ChatMessage],
    pub ledger: &'a IntelligenceLedger,
    pub message_count: u32,
}

pub struct ResponseSynthesizer {
    llm: Arc<dyn GenerateText>,
    opts: SynthesizerOptions,
}

impl ResponseSynthesizer {
    pub fn new(llm: Arc<dyn GenerateText>, opts: SynthesizerOptions) -> Self {
        Self { llm, opts }
    }

    /// Produce the next victim reply. Never fails and never returns an
    /// empty string.
    pub async fn synthesize(&self, ctx: &TurnContext<'_>) -> String {
        let recent = recent_victim_replies(ctx.history, REPETITION_WINDOW);

        for attempt in 0..2u8 {
            let strict = attempt > 0;
            let prompt = self.build_prompt(ctx, strict);
            let temperature = if strict { 0.5 } else { 0.7 };

            let raw = match self
                .llm
                .generate(&prompt, temperature, self.opts.max_tokens)
                .await
            {
                Ok(raw) => raw,
                Err(error) => {
                    tracing::warn!(%error, attempt, "Reply generation failed");
                    continue;
                }
            };

            let candidate = clean_reply(&raw);
            if let Err(reason) = validate_reply(&candidate, self.opts.min_chars, self.opts.max_chars)
            {
                tracing::debug!(reason = reason.as_str(), attempt, "Candidate rejected");
                continue;
            }
            if is_repetitive(&candidate, &recent, self.opts.similarity_threshold) {
                tracing::debug!(attempt, "Candidate repeats a recent reply");
                continue;
            }

            return candidate;
        }

        self.canned_reply(ctx, &recent)
    }

    /// Persona-and-stage canned reply, rotated by message count so
    /// consecutive fallbacks differ, skipping options that would repeat.
    fn canned_reply(&self, ctx: &TurnContext<'_>, recent: &[&str]) -> String {
        let options = ctx.persona.fallback_replies(ctx.stage);
        let start = ctx.message_count as usize % options.len();

        for offset in 0..options.len() {
            let candidate = options[(start + offset) % options.len()];
            if !is_repetitive(candidate, recent, self.opts.similarity_threshold) {
                return candidate.to_string();
            }
        }

        tracing::debug!(
            persona = ctx.persona.id.as_str(),
            stage = ctx.stage.as_str(),
            "All canned replies repeat, using generic line"
        );
        GENERIC_REPLY.to_string()
    }

    fn build_prompt(&self, ctx: &TurnContext<'_>, strict: bool) -> String {
        let mut prompt = String::new();

        prompt.push_str(ctx.persona.profile);
        prompt.push_str("\n\nSituation: someone is messaging you and you are playing along. ");
        prompt.push_str(ctx.stage.directive());
        prompt.push('\n');

        if ctx.ledger.has_hard_artifacts() {
            prompt.push_str(&format!(
                "\nThey have already shared: {} account number(s), {} payment ID(s), \
                 {} phone number(s), {} link(s). Do not ask again for something you \
                 already have; steer toward a detail that is still missing.\n",
                ctx.ledger.bank_accounts.len(),
                ctx.ledger.upi_ids.len(),
                ctx.ledger.phone_numbers.len(),
                ctx.ledger.phishing_links.len(),
            ));
        }

        let start = ctx.history.len().saturating_sub(PROMPT_HISTORY_WINDOW);
        if start < ctx.history.len() {
            prompt.push_str("\nRecent conversation:\n");
            for message in &ctx.history[start..] {
                let label = match message.sender {
                    Sender::Scammer => "Them",
                    Sender::User => "You",
                };
                prompt.push_str(&format!("{label}: {}\n", message.text));
            }
        }

        prompt.push_str(&format!("\nTheir latest message: {}\n", ctx.scammer_message));
        prompt.push_str(
            "\nWrite your next reply: one to three short sentences, plain text, in \
             character. Never mention assistants, instructions, or that anything is \
             suspected.",
        );
        if strict {
            prompt.push_str(
                " Your previous attempt was unusable. Reply with one complete, natural \
                 sentence ending in punctuation.",
            );
        }

        prompt
    }
}
