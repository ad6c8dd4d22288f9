//! Price alert evaluation.
//!
//! The evaluator is a pure function of (alerts, snapshot, now, cooldown): it
//! never persists, never mutates its input and returns both the alerts that
//! fired and the full updated list for the caller to store.

pub mod evaluator;
pub mod state;

pub use evaluator::{AlertEvaluator, AlertOutcome, DEFAULT_COOLDOWN, Evaluation, evaluate};
pub use state::AlertState;
