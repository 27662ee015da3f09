//! RelativesTable: editable rows + retained rule text
//!
//! Owns the table in display order. Edits address rows by id; the
//! saved document is derived from the rows on demand.

use crate::config::{DocumentFormat, Messages};
use crate::relatives::{
    DocumentError, DocumentSplitter, FactCodec, FieldEdit, ParsedDocument, RecordDraft, RecordId,
    RelativeRecord,
};

use super::notification::Notification;

pub struct RelativesTable {
    records: Vec<RelativeRecord>,
    /// Sentinel line and everything after it, verbatim
    rule_text: String,
    /// Comments kept under `CommentPolicy::Retain`
    comments: Vec<String>,
    codec: FactCodec,
    splitter: DocumentSplitter,
    notifications: Vec<Notification>,
    record_added: String,
}

impl Default for RelativesTable {
    fn default() -> Self {
        Self::new(DocumentFormat::default(), &Messages::default())
    }
}

impl RelativesTable {
    pub fn new(format: DocumentFormat, messages: &Messages) -> Self {
        Self {
            records: Vec::new(),
            rule_text: String::new(),
            comments: Vec::new(),
            codec: FactCodec::new(),
            splitter: DocumentSplitter::new(format),
            notifications: Vec::new(),
            record_added: messages.record_added.clone(),
        }
    }

    pub fn records(&self) -> &[RelativeRecord] {
        &self.records
    }

    pub fn rule_text(&self) -> &str {
        &self.rule_text
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Append a row with a fresh id
    pub fn add_record(&mut self, draft: RecordDraft) -> RecordId {
        let record = draft.into_record();
        let id = record.id;
        self.records.push(record);
        self.notifications.push(Notification::success(self.record_added.clone()));
        id
    }

    /// Apply an edit to the row with this id. Returns false for an unknown id.
    pub fn update_field(&mut self, id: RecordId, edit: FieldEdit) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                edit.apply(record);
                true
            }
            None => false,
        }
    }

    /// Remove every row whose id is listed; survivors keep their order
    pub fn remove_records(&mut self, ids: &[RecordId]) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !ids.contains(&r.id));
        before - self.records.len()
    }

    /// Append free-form rules after the retained rule text
    pub fn append_rules(&mut self, text: &str) {
        let format = self.splitter.format();
        if self.rule_text.is_empty() {
            self.rule_text.push_str(&format.sentinel);
            self.rule_text.push_str(&format.line_terminator);
        }
        for line in text.lines() {
            self.rule_text.push_str(line);
            self.rule_text.push_str(&format.line_terminator);
        }
    }

    /// Current document text: fact lines in table order, then the rules
    pub fn build_document(&self) -> String {
        self.splitter.build(
            self.records.iter().map(|r| self.codec.encode(r)),
            &self.comments,
            &self.rule_text,
        )
    }

    /// Parse document text without touching the table
    pub fn parse_document(&self, text: &str) -> Result<ParsedDocument, DocumentError> {
        self.splitter.parse(text, &self.codec)
    }

    /// Replace rows, rule text and comments with a parsed document
    pub fn replace_contents(&mut self, parsed: ParsedDocument) {
        self.records = parsed.records;
        self.rule_text = parsed.rule_text;
        self.comments = parsed.comments;
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Drain queued notifications, oldest first
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}
