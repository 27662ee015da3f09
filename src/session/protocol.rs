//! QuerySession: the one live engine session
//!
//! # Design
//! 1. State machine: Idle → Draining → Idle. Loads and new goals are
//!    refused while a goal's answers are still being pulled.
//! 2. Answers are pulled one at a time (`pull`, or `AnswerStream`), so a
//!    caller can stop early; an infinite goal is bounded by `max_answers`.
//! 3. The response buffer only changes once a goal is accepted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::engine::{EngineError, LogicEngine};
use super::response::ResponseBuffer;
use crate::config::{Messages, SessionConfig};
use crate::console;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The program could not be consulted
    #[error("consultation failed: {0}")]
    Consultation(#[source] EngineError),

    /// The goal was rejected before producing answers
    #[error("query rejected: {0}")]
    Query(#[source] EngineError),

    /// An answer was an uncaught engine exception
    #[error("engine exception: {message}")]
    EngineRuntime { message: String },

    /// A goal's answers are still being drained
    #[error("session is busy draining answers")]
    Busy,
}

// =============================================================================
// Types
// =============================================================================

/// Summary of one drained goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStats {
    /// Answers appended to the response buffer
    pub answers: usize,
    /// Draining stopped before "no more answers" (cap, cancel, step limit
    /// or exception)
    pub truncated: bool,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    Draining {
        received: usize,
        started: instant::Instant,
    },
}

// =============================================================================
// QuerySession
// =============================================================================

/// Owns the engine handle and the response buffer
pub struct QuerySession<E: LogicEngine> {
    engine: E,
    config: SessionConfig,
    error_line: String,
    state: State,
    consulted: Option<String>,
    response: ResponseBuffer,
    last_stats: Option<QueryStats>,
}

impl<E: LogicEngine> QuerySession<E> {
    pub fn new(engine: E, config: SessionConfig, messages: &Messages) -> Self {
        let response = ResponseBuffer::new(config.answer_separator.clone());
        Self {
            engine,
            config,
            error_line: messages.query_failed.clone(),
            state: State::Idle,
            consulted: None,
            response,
            last_stats: None,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn is_busy(&self) -> bool {
        self.state != State::Idle
    }

    /// Text of the last successful consultation
    pub fn consulted(&self) -> Option<&str> {
        self.consulted.as_deref()
    }

    pub fn response(&self) -> &ResponseBuffer {
        &self.response
    }

    pub fn clear_response(&mut self) {
        self.response.clear();
    }

    pub fn last_stats(&self) -> Option<&QueryStats> {
        self.last_stats.as_ref()
    }

    /// Consult a document into the session
    pub async fn load(&mut self, program: &str) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }

        self.engine.consult(program).await.map_err(|err| {
            console::error(&format!("[QuerySession] Consult failed: {}", err));
            SessionError::Consultation(err)
        })?;

        self.consulted = Some(program.to_string());
        Ok(())
    }

    /// Submit a goal and leave the session draining its answers.
    ///
    /// On rejection the previous response buffer is kept.
    pub async fn begin_query(&mut self, goal: &str) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }

        self.engine.query(goal).await.map_err(|err| {
            console::error(&format!("[QuerySession] Query rejected: {}", err));
            SessionError::Query(err)
        })?;

        self.response.clear();
        self.state = State::Draining {
            received: 0,
            started: instant::Instant::now(),
        };
        Ok(())
    }

    /// Pull the next answer of the current goal.
    ///
    /// Returns the formatted line that was appended, `None` once the goal
    /// is exhausted (or nothing is draining), or the runtime error that
    /// replaced the buffer.
    pub async fn pull(&mut self) -> Option<Result<String, SessionError>> {
        let State::Draining { received, .. } = self.state else {
            return None;
        };

        if received >= self.config.max_answers {
            console::warn(&format!(
                "[QuerySession] Stopped after {} answers",
                self.config.max_answers
            ));
            self.finish(true);
            return None;
        }

        let Some(answer) = self.engine.next_answer().await else {
            // An empty buffer shows the engine's own "no answers" text
            if self.response.is_empty() {
                let formatted = self.strip(&self.engine.format_answer(None));
                self.response.push(&formatted);
            }
            self.finish(false);
            return None;
        };

        let raw = self.engine.format_answer(Some(&answer));
        if raw.starts_with(self.config.exception_prefix.as_str()) {
            console::error(&format!("[QuerySession] {}", raw));
            self.response.replace(&self.error_line);
            self.finish(true);
            return Some(Err(SessionError::EngineRuntime { message: raw }));
        }

        let formatted = self.strip(&raw);
        self.response.push(&formatted);
        if let State::Draining { received, .. } = &mut self.state {
            *received += 1;
        }

        if self.engine.ends_stream(&answer) {
            console::warn(&format!("[QuerySession] Goal stopped: {}", raw));
            self.finish(true);
        }
        Some(Ok(formatted))
    }

    /// Stop draining the current goal
    pub fn cancel(&mut self) {
        if self.is_busy() {
            self.finish(true);
        }
    }

    /// Borrow the current goal's answers as a stream; dropping it cancels
    pub fn answers(&mut self) -> AnswerStream<'_, E> {
        AnswerStream { session: self }
    }

    /// Submit a goal and drain all of its answers into the response buffer
    pub async fn query(&mut self, goal: &str) -> Result<QueryStats, SessionError> {
        self.begin_query(goal).await?;

        let mut answers = self.answers();
        while let Some(item) = answers.next().await {
            item?;
        }
        drop(answers);

        Ok(self.last_stats.clone().unwrap_or(QueryStats {
            answers: 0,
            truncated: false,
            elapsed_ms: 0.0,
        }))
    }

    fn strip(&self, formatted: &str) -> String {
        if self.config.strip_chars.is_empty() {
            return formatted.to_string();
        }
        formatted
            .chars()
            .filter(|c| !self.config.strip_chars.contains(*c))
            .collect()
    }

    fn finish(&mut self, truncated: bool) {
        if let State::Draining { received, started } = self.state {
            self.last_stats = Some(QueryStats {
                answers: received,
                truncated,
                elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
            });
        }
        self.state = State::Idle;
    }
}

// =============================================================================
// AnswerStream
// =============================================================================

/// Pull-based view over the answers of the current goal.
///
/// Not restartable; dropping it before exhaustion cancels the goal.
pub struct AnswerStream<'a, E: LogicEngine> {
    session: &'a mut QuerySession<E>,
}

impl<E: LogicEngine> AnswerStream<'_, E> {
    pub async fn next(&mut self) -> Option<Result<String, SessionError>> {
        self.session.pull().await
    }
}

impl<E: LogicEngine> Drop for AnswerStream<'_, E> {
    fn drop(&mut self) {
        self.session.cancel();
    }
}
