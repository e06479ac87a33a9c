//! Mirage Engage — the conversational side of the honeypot.
//!
//! Turns a detected scam attempt into a sustained engagement: classify
//! the message, pick a believable victim persona, work out which stage
//! the conversation is in, and synthesize a reply that keeps the
//! scammer talking while the intel layer harvests artifacts.
//!
//! Text generation goes through the [`llm::GenerateText`] trait so the
//! production client (an OpenAI-compatible chat endpoint) can be swapped
//! for a scripted double in tests. Every public entry point here is
//! infallible from the caller's view: generation failures degrade to
//! lexicon classification and canned persona replies, never to errors.

pub mod classifier;
pub mod llm;
pub mod persona;
pub mod stage;
pub mod synth;

pub use classifier::{fallback_classify, ScamClassifier};
pub use llm::{GenerateText, GroqClient, LlmError};
pub use persona::{Persona, PersonaId};
pub use stage::Stage;
pub use synth::{ResponseSynthesizer, SynthesizerOptions, TurnContext};
