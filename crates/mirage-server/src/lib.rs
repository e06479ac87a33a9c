//! Mirage Server — HTTP transport and per-turn orchestration.
//!
//! Wires the classifier, persona engine, synthesizer, and intel ledger
//! into a session pipeline behind an actix-web surface.

pub mod callback;
pub mod metrics;
pub mod orchestrator;
pub mod routes;
pub mod session;

pub use orchestrator::Orchestrator;
pub use routes::AppState;
pub use session::{Session, SessionStore};
