//! Response area contents

use serde::{Deserialize, Serialize};

/// Accumulated answer text shown in the response area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBuffer {
    text: String,
    separator: String,
}

impl Default for ResponseBuffer {
    fn default() -> Self {
        Self::new("\r\n")
    }
}

impl ResponseBuffer {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            separator: separator.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append one answer, separated from the previous one
    pub fn push(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push_str(&self.separator);
        }
        self.text.push_str(line);
    }

    /// Replace everything with a single line
    pub fn replace(&mut self, line: &str) {
        self.text.clear();
        self.text.push_str(line);
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}
