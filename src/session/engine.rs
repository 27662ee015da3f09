//! Logic engine contract
//!
//! The engine itself (Tau Prolog in the browser) lives outside this crate.
//! `LogicEngine` is the seam: consult a program, submit a goal, pull its
//! answers one at a time, format an answer for display.

use thiserror::Error;

/// Error reported by the engine (already rendered to text)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// A single-session logic engine.
///
/// Calls are strictly sequential: `query` starts a new answer stream and
/// `next_answer` pulls from the most recent one. `None` from `next_answer`
/// is the engine's "no more answers" (`false`) signal.
#[allow(async_fn_in_trait)]
pub trait LogicEngine {
    /// Engine-native answer value
    type Answer;

    /// Load a program into the session
    async fn consult(&mut self, program: &str) -> Result<(), EngineError>;

    /// Submit a goal; answers are pulled with `next_answer`
    async fn query(&mut self, goal: &str) -> Result<(), EngineError>;

    /// Next answer of the current goal, `None` once exhausted
    async fn next_answer(&mut self) -> Option<Self::Answer>;

    /// Render an answer; `None` renders the "no more answers" signal
    fn format_answer(&self, answer: Option<&Self::Answer>) -> String;

    /// Whether the goal stops after this answer is shown (e.g. a step limit)
    fn ends_stream(&self, _answer: &Self::Answer) -> bool {
        false
    }
}
