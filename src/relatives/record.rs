//! Table rows
//!
//! A `RelativeRecord` is one row of the relatives table. Its id is a
//! presentation-layer key: it never appears in the saved document.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::relation::Relation;

/// Opaque row identifier, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generate a fresh id (UUID v4)
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// One relationship row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeRecord {
    pub id: RecordId,
    /// The subject person
    pub name: String,
    /// The related person
    pub relative_name: String,
    pub relation: Relation,
}

impl RelativeRecord {
    /// Create a row with a freshly generated id
    pub fn new(name: impl Into<String>, relative_name: impl Into<String>, relation: Relation) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
            relative_name: relative_name.into(),
            relation,
        }
    }

    /// Field equality, ignoring the id
    pub fn same_fact(&self, other: &RelativeRecord) -> bool {
        self.name == other.name
            && self.relative_name == other.relative_name
            && self.relation == other.relation
    }
}

/// Row contents submitted by the "add item" form (no id yet)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordDraft {
    pub name: String,
    pub relative_name: String,
    pub relation: Relation,
}

impl RecordDraft {
    /// Turn the draft into a row with a new id
    pub fn into_record(self) -> RelativeRecord {
        RelativeRecord::new(self.name, self.relative_name, self.relation)
    }
}

/// A single-field edit coming from the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldEdit {
    Name(String),
    RelativeName(String),
    Relation(Relation),
}

impl FieldEdit {
    /// Apply the edit to a row in place
    pub fn apply(self, record: &mut RelativeRecord) {
        match self {
            FieldEdit::Name(name) => record.name = name,
            FieldEdit::RelativeName(relative_name) => record.relative_name = relative_name,
            FieldEdit::Relation(relation) => record.relation = relation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_records_get_distinct_ids() {
        let a = RelativeRecord::new("anna", "boris", Relation::Mother);
        let b = RelativeRecord::new("anna", "boris", Relation::Mother);
        assert_ne!(a.id, b.id);
        assert!(a.same_fact(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_field_edit_keeps_id() {
        let mut record = RelativeRecord::new("anna", "boris", Relation::Mother);
        let id = record.id;

        FieldEdit::Name("vera".into()).apply(&mut record);
        FieldEdit::RelativeName("gleb".into()).apply(&mut record);
        FieldEdit::Relation(Relation::Sister).apply(&mut record);

        assert_eq!(record.id, id);
        assert_eq!(record.name, "vera");
        assert_eq!(record.relative_name, "gleb");
        assert_eq!(record.relation, Relation::Sister);
    }

    #[test]
    fn test_field_edit_json_shape() {
        let edit: FieldEdit =
            serde_json::from_str(r#"{ "field": "relativeName", "value": "boris" }"#).unwrap();
        assert_eq!(edit, FieldEdit::RelativeName("boris".into()));

        let edit: FieldEdit =
            serde_json::from_str(r#"{ "field": "relation", "value": "father" }"#).unwrap();
        assert_eq!(edit, FieldEdit::Relation(Relation::Father));
    }

    #[test]
    fn test_record_json_uses_camel_case() {
        let record = RelativeRecord::new("anna", "boris", Relation::Mother);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["relativeName"], "boris");
        assert_eq!(value["relation"], "mother");
        assert_eq!(value["id"], record.id.to_string());
    }

    #[test]
    fn test_id_parses_from_display() {
        let id = RecordId::new();
        assert_eq!(id.to_string().parse::<RecordId>().unwrap(), id);
        assert!("not-an-id".parse::<RecordId>().is_err());
    }
}
