//! Workbench: the application flow
//!
//! Ties the relatives table to the query session the way the form uses
//! them: open a `.pl` file, edit rows, save (which re-consults), query,
//! clear the response area. Engine failures become error notifications;
//! the workbench stays usable after every one of them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{KinlogConfig, Messages};
use crate::console;
use crate::relatives::{DocumentError, FieldEdit, RecordDraft, RecordId, RelativeRecord, SkippedLine};
use crate::session::{LogicEngine, QuerySession, QueryStats, SessionError};
use crate::table::{Notification, RelativesTable};

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkbenchError {
    #[error("{file_name:?} is not a {expected} file")]
    UnsupportedFile { file_name: String, expected: String },

    #[error("no file is open")]
    NoOpenFile,

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Outcome of opening a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub file_name: String,
    pub records: usize,
    /// False when the engine refused the program (rows are still loaded)
    pub consulted: bool,
    pub skipped: Vec<SkippedLine>,
}

/// A document ready to be downloaded by the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFile {
    pub file_name: String,
    pub content: String,
    pub mime_type: String,
    pub consulted: bool,
}

pub const SAVED_MIME_TYPE: &str = "text/plain;charset=utf-8";

// =============================================================================
// Workbench
// =============================================================================

pub struct Workbench<E: LogicEngine> {
    table: RelativesTable,
    session: QuerySession<E>,
    file_name: Option<String>,
    accepted_extension: String,
    messages: Messages,
}

impl<E: LogicEngine> Workbench<E> {
    /// Create a workbench around a fresh engine session
    pub fn new(engine: E, config: KinlogConfig) -> Self {
        let KinlogConfig {
            document,
            session,
            messages,
            accepted_extension,
        } = config;

        Self {
            table: RelativesTable::new(document, &messages),
            session: QuerySession::new(engine, session, &messages),
            file_name: None,
            accepted_extension,
            messages,
        }
    }

    pub fn table(&self) -> &RelativesTable {
        &self.table
    }

    pub fn session(&self) -> &QuerySession<E> {
        &self.session
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Saving needs an open file name
    pub fn can_save(&self) -> bool {
        self.file_name.is_some()
    }

    pub fn records(&self) -> &[RelativeRecord] {
        self.table.records()
    }

    pub fn response_text(&self) -> &str {
        self.session.response().text()
    }

    // -------------------------------------------------------------------------
    // File menu
    // -------------------------------------------------------------------------

    /// Load a document picked by the user.
    ///
    /// The table is replaced only when the document parses; a consult
    /// failure is reported but does not stop the rows from loading.
    pub async fn open_file(&mut self, file_name: &str, text: &str) -> Result<LoadReport, WorkbenchError> {
        let extension = self.accepted_extension.to_lowercase();
        if !file_name.to_lowercase().ends_with(extension.as_str()) {
            return Err(WorkbenchError::UnsupportedFile {
                file_name: file_name.to_string(),
                expected: self.accepted_extension.clone(),
            });
        }

        let parsed = self.table.parse_document(text).inspect_err(|err| {
            console::error(&format!("[Workbench] Failed to parse {}: {}", file_name, err));
        })?;
        let consulted = self.consult(text).await?;

        let report = LoadReport {
            file_name: file_name.to_string(),
            records: parsed.records.len(),
            consulted,
            skipped: parsed.skipped.clone(),
        };
        self.table.replace_contents(parsed);
        self.file_name = Some(file_name.to_string());

        console::log(&format!(
            "[Workbench] Opened {} ({} rows, {} skipped)",
            file_name,
            report.records,
            report.skipped.len()
        ));
        Ok(report)
    }

    /// Assemble the document, re-consult it and hand it back for download
    pub async fn save_file(&mut self) -> Result<SavedFile, WorkbenchError> {
        let file_name = self.file_name.clone().ok_or(WorkbenchError::NoOpenFile)?;
        let content = self.table.build_document();
        let consulted = self.consult(&content).await?;

        Ok(SavedFile {
            file_name,
            content,
            mime_type: SAVED_MIME_TYPE.to_string(),
            consulted,
        })
    }

    /// Forget the open file; rows stay in the table
    pub fn remove_file(&mut self) {
        self.file_name = None;
    }

    // -------------------------------------------------------------------------
    // Table
    // -------------------------------------------------------------------------

    pub fn add_record(&mut self, draft: RecordDraft) -> RecordId {
        self.table.add_record(draft)
    }

    pub fn update_field(&mut self, id: RecordId, edit: FieldEdit) -> bool {
        self.table.update_field(id, edit)
    }

    pub fn remove_records(&mut self, ids: &[RecordId]) -> usize {
        self.table.remove_records(ids)
    }

    pub fn append_rules(&mut self, text: &str) {
        self.table.append_rules(text)
    }

    pub fn build_document(&self) -> String {
        self.table.build_document()
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.table.take_notifications()
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Run a goal and fill the response area
    pub async fn send_query(&mut self, goal: &str) -> Result<QueryStats, WorkbenchError> {
        match self.session.query(goal).await {
            Ok(stats) => Ok(stats),
            Err(err) => {
                let message = match &err {
                    SessionError::Query(_) => Some(&self.messages.query_rejected),
                    SessionError::EngineRuntime { .. } => Some(&self.messages.query_failed),
                    _ => None,
                };
                if let Some(message) = message {
                    self.table.notify(Notification::error(message.clone()));
                }
                Err(err.into())
            }
        }
    }

    pub fn clear_responses(&mut self) {
        self.session.clear_response();
    }

    /// Consult `program`; a refused program becomes an error notification
    async fn consult(&mut self, program: &str) -> Result<bool, WorkbenchError> {
        match self.session.load(program).await {
            Ok(()) => Ok(true),
            Err(SessionError::Consultation(_)) => {
                self.table.notify(Notification::error(self.messages.consult_failed.clone()));
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
