//! Configuration types and defaults for KinLog
//!
//! Every field has a default, so a partial object coming from TypeScript
//! (`{ session: { maxAnswers: 10 } }`) deserializes cleanly.

use serde::{Deserialize, Serialize};

// =============================================================================
// Document Format
// =============================================================================

/// What happens to `%` comment lines when a document is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum CommentPolicy {
    /// Comments are discarded on load (they do not survive a save)
    #[default]
    Drop,

    /// Comments are kept and written back on save
    Retain,
}

/// What happens when a line before the sentinel is not a valid fact line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum MalformedLinePolicy {
    /// The whole load fails on the first bad line
    #[default]
    Abort,

    /// Bad lines are skipped and reported back to the caller
    SkipAndWarn,
}

/// Layout of the persisted `.pl` document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentFormat {
    /// Line separating fact lines from rule text. Default: `rules.`
    pub sentinel: String,
    /// Lines starting with this are comments. Default: `%`
    pub comment_marker: String,
    /// Line terminator used when writing. Default: CRLF
    pub line_terminator: String,
    pub comment_policy: CommentPolicy,
    pub malformed_lines: MalformedLinePolicy,
}

impl Default for DocumentFormat {
    fn default() -> Self {
        Self {
            sentinel: "rules.".to_string(),
            comment_marker: "%".to_string(),
            line_terminator: "\r\n".to_string(),
            comment_policy: CommentPolicy::default(),
            malformed_lines: MalformedLinePolicy::default(),
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// Query session parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Upper bound on answers pulled per query. Default: 100
    pub max_answers: usize,
    /// Characters removed from every formatted answer. Default: `,`
    pub strip_chars: String,
    /// Formatted answers starting with this are engine exceptions
    pub exception_prefix: String,
    /// Separator between answers in the response buffer. Default: CRLF
    pub answer_separator: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_answers: 100,
            strip_chars: ",".to_string(),
            exception_prefix: "uncaught exception".to_string(),
            answer_separator: "\r\n".to_string(),
        }
    }
}

// =============================================================================
// Messages
// =============================================================================

/// Localized notification texts shown by the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Messages {
    pub record_added: String,
    pub consult_failed: String,
    pub query_rejected: String,
    pub query_failed: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            record_added: "Запись добавлена".to_string(),
            consult_failed: "Не удалось инициализировать сессию Prolog".to_string(),
            query_rejected: "Некорректный запрос Prolog".to_string(),
            query_failed: "Произошла ошибка при запросе".to_string(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KinlogConfig {
    pub document: DocumentFormat,
    pub session: SessionConfig,
    pub messages: Messages,
    /// File extension accepted by the open dialog. Default: `.pl`
    pub accepted_extension: String,
}

impl Default for KinlogConfig {
    fn default() -> Self {
        Self {
            document: DocumentFormat::default(),
            session: SessionConfig::default(),
            messages: Messages::default(),
            accepted_extension: ".pl".to_string(),
        }
    }
}
