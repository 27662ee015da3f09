//! DocumentSplitter: `.pl` document <-> (fact lines, rule text)
//!
//! A saved document is the fact lines (one per table row), an empty line,
//! then the rule text. The rule text starts at the sentinel line and is
//! kept verbatim; the application never interprets it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::codec::{DecodeError, FactCodec};
use super::record::RelativeRecord;
use crate::config::{CommentPolicy, DocumentFormat, MalformedLinePolicy};
use crate::console;

// =============================================================================
// Types
// =============================================================================

/// A kept line and its 1-based position in the source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLine {
    pub number: usize,
    pub text: String,
}

/// Result of splitting a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitDocument {
    /// Lines before the first sentinel
    pub record_lines: Vec<SourceLine>,
    /// Sentinel line and everything after it, each line terminated
    pub rule_text: String,
    /// Comment lines seen before the sentinel (only with `CommentPolicy::Retain`)
    pub comments: Vec<String>,
}

impl SplitDocument {
    pub fn record_texts(&self) -> Vec<&str> {
        self.record_lines.iter().map(|l| l.text.as_str()).collect()
    }
}

/// A record line that was skipped under `MalformedLinePolicy::SkipAndWarn`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedLine {
    pub line_number: usize,
    pub line: String,
    pub reason: String,
}

/// A fully decoded document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub records: Vec<RelativeRecord>,
    pub rule_text: String,
    pub comments: Vec<String>,
    pub skipped: Vec<SkippedLine>,
}

/// Load failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("line {line_number}: {source}")]
    Line {
        line_number: usize,
        #[source]
        source: DecodeError,
    },
}

// =============================================================================
// DocumentSplitter
// =============================================================================

/// Splits, parses and assembles documents in a given `DocumentFormat`
#[derive(Debug, Clone, Default)]
pub struct DocumentSplitter {
    format: DocumentFormat,
}

impl DocumentSplitter {
    pub fn new(format: DocumentFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &DocumentFormat {
        &self.format
    }

    /// Split a document into record lines and rule text.
    ///
    /// Blank lines are dropped everywhere. Comment lines are dropped, or
    /// kept when the format retains comments. The first line equal to the
    /// sentinel switches to rule mode; later sentinels are plain rule text.
    pub fn split(&self, text: &str) -> SplitDocument {
        let terminator = &self.format.line_terminator;
        let retain = self.format.comment_policy == CommentPolicy::Retain;
        let mut result = SplitDocument::default();
        let mut in_rules = false;

        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let marker = self.format.comment_marker.as_str();
            let is_comment = !marker.is_empty() && line.starts_with(marker);
            if is_comment && !retain {
                continue;
            }

            if !in_rules && line == self.format.sentinel {
                in_rules = true;
            }

            if in_rules {
                result.rule_text.push_str(line);
                result.rule_text.push_str(terminator);
            } else if is_comment {
                result.comments.push(line.to_string());
            } else {
                result.record_lines.push(SourceLine {
                    number: index + 1,
                    text: line.to_string(),
                });
            }
        }

        result
    }

    /// Split and decode a document, honouring the malformed-line policy
    pub fn parse(&self, text: &str, codec: &FactCodec) -> Result<ParsedDocument, DocumentError> {
        let split = self.split(text);
        let mut records = Vec::with_capacity(split.record_lines.len());
        let mut skipped = Vec::new();

        for line in split.record_lines {
            match codec.decode(&line.text) {
                Ok(record) => records.push(record),
                Err(err) => match self.format.malformed_lines {
                    MalformedLinePolicy::Abort => {
                        return Err(DocumentError::Line {
                            line_number: line.number,
                            source: err,
                        });
                    }
                    MalformedLinePolicy::SkipAndWarn => {
                        console::warn(&format!(
                            "[DocumentSplitter] Skipping line {}: {}",
                            line.number, err
                        ));
                        skipped.push(SkippedLine {
                            line_number: line.number,
                            line: line.text,
                            reason: err.to_string(),
                        });
                    }
                },
            }
        }

        Ok(ParsedDocument {
            records,
            rule_text: split.rule_text,
            comments: split.comments,
            skipped,
        })
    }

    /// Assemble document text: fact lines, retained comments, an empty
    /// line, then the rule text verbatim
    pub fn build<I, S>(&self, fact_lines: I, comments: &[String], rule_text: &str) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terminator = &self.format.line_terminator;
        let mut out = String::new();

        for line in fact_lines {
            out.push_str(line.as_ref());
            out.push_str(terminator);
        }
        for comment in comments {
            out.push_str(comment);
            out.push_str(terminator);
        }
        out.push_str(terminator);
        out.push_str(rule_text);

        out
    }
}

// =============================================================================
// Tests
// =============================================================================
