//! # iq-gate
//!
//! The validation gate: rejects incoherent or incomplete queries before any
//! expensive processing.
//!
//! ```text
//! query ─▶ CoherenceCheck ──fail──▶ RejectedIncoherent
//!               │pass
//!               ▼
//!          CompletenessCheck ─fail─▶ RejectedIncomplete
//!               │pass
//!               ▼
//!            Accepted
//! ```
//!
//! Both stages are swappable. Deterministic implementations
//! ([`LexicalCoherence`], [`HeuristicCompleteness`]) need no network;
//! [`ModelCoherence`] and [`ModelCompleteness`] ask the language model.

mod check;
mod coherence;
mod completeness;
mod error;
mod gate;
pub mod lexicon;
mod model;

pub use check::{CoherenceCheck, CompletenessCheck, StageOutcome};
pub use coherence::{DEFAULT_MIN_RECOGNIZED_RATIO, LexicalCoherence};
pub use completeness::HeuristicCompleteness;
pub use error::{GateError, Stage};
pub use gate::ValidationGate;
pub use model::{ModelCoherence, ModelCompleteness};
