//! FactCodec: table row <-> fact line
//!
//! A row is stored as `relative(<name>, <relative name>, <relation>).`
//! Names that are not plain lowercase atoms are written as quoted atoms
//! (`'Anna Maria'`, embedded quotes doubled; backslash, tab and line breaks
//! escaped) so the engine reads them as constants rather than variables and
//! every fact stays on one line.

use regex::Regex;
use thiserror::Error;

use super::record::RelativeRecord;
use super::relation::{Relation, UnknownRelation};

/// Functor of every fact line
pub const FACT_FUNCTOR: &str = "relative";

// =============================================================================
// Errors
// =============================================================================

/// Why a line could not be decoded into a row
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Wrong functor, argument count or terminator
    #[error("not a relative/3 fact: {line:?}")]
    Malformed { line: String },

    /// Third argument is outside the relation vocabulary
    #[error("unknown relation {relation:?}")]
    UnknownRelation { relation: String },
}

// =============================================================================
// FactCodec
// =============================================================================

/// Encoder/decoder for `relative/3` fact lines
#[derive(Debug, Clone)]
pub struct FactCodec {
    fact_regex: Regex,
}

impl Default for FactCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl FactCodec {
    pub fn new() -> Self {
        // relative( ARG , ARG , atom ).
        // ARG is a quoted atom ('' or \x escapes) or a run without
        // separators, quotes, parentheses or whitespace
        let fact_regex = Regex::new(
            r"^\s*relative\(\s*('(?:[^'\\]|''|\\.)*'|[^,'()\s]+)\s*,\s*('(?:[^'\\]|''|\\.)*'|[^,'()\s]+)\s*,\s*([a-z][A-Za-z0-9_]*)\s*\)\.\s*$",
        )
        .expect("Fact regex should compile");

        Self { fact_regex }
    }

    /// Encode a row as one fact line (no terminator)
    pub fn encode(&self, record: &RelativeRecord) -> String {
        format!(
            "{}({}, {}, {}).",
            FACT_FUNCTOR,
            quote_atom(&record.name),
            quote_atom(&record.relative_name),
            record.relation.predicate()
        )
    }

    /// Decode one fact line into a row with a fresh id
    pub fn decode(&self, line: &str) -> Result<RelativeRecord, DecodeError> {
        let caps = self
            .fact_regex
            .captures(line)
            .ok_or_else(|| DecodeError::Malformed { line: line.to_string() })?;

        let name = unquote_atom(&caps[1]);
        let relative_name = unquote_atom(&caps[2]);
        let relation = caps[3]
            .parse::<Relation>()
            .map_err(|UnknownRelation(relation)| DecodeError::UnknownRelation { relation })?;

        Ok(RelativeRecord::new(name, relative_name, relation))
    }
}

/// Lowercase letter followed by letters, digits or underscores
fn is_plain_atom(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn quote_atom(text: &str) -> String {
    if is_plain_atom(text) {
        return text.to_string();
    }

    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for c in text.chars() {
        match c {
            '\'' => quoted.push_str("''"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

fn unquote_atom(text: &str) -> String {
    let Some(inner) = text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) else {
        return text.to_string();
    };

    let mut atom = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            // '' inside a quoted atom
            '\'' => {
                chars.next();
                atom.push('\'');
            }
            '\\' => match chars.next() {
                Some('n') => atom.push('\n'),
                Some('r') => atom.push('\r'),
                Some('t') => atom.push('\t'),
                Some(other) => atom.push(other),
                None => {}
            },
            c => atom.push(c),
        }
    }
    atom
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Encoding
    // -------------------------------------------------------------------------
    #[test]
    fn test_encode_plain_atoms() {
        let codec = FactCodec::new();
        let record = RelativeRecord::new("anna", "boris", Relation::Mother);
        assert_eq!(codec.encode(&record), "relative(anna, boris, mother).");
    }

    #[test]
    fn test_encode_quotes_non_atoms() {
        let codec = FactCodec::new();
        let record = RelativeRecord::new("Anna Maria", "o'neil", Relation::Wife);
        assert_eq!(
            codec.encode(&record),
            "relative('Anna Maria', 'o''neil', wife)."
        );
    }

    #[test]
    fn test_encode_escapes_backslash_and_line_breaks() {
        let codec = FactCodec::new();
        let record = RelativeRecord::new("a\\", "anna\r\nmaria\tx", Relation::Sister);
        assert_eq!(
            codec.encode(&record),
            r"relative('a\\', 'anna\r\nmaria\tx', sister)."
        );
    }

    #[test]
    fn test_encode_empty_name() {
        let codec = FactCodec::new();
        let record = RelativeRecord::new("", "boris", Relation::Son);
        assert_eq!(codec.encode(&record), "relative('', boris, son).");
    }

    // -------------------------------------------------------------------------
    // Decoding
    // -------------------------------------------------------------------------
    #[test]
    fn test_decode_fields() {
        let codec = FactCodec::new();
        let record = codec.decode("relative(anna, boris, mother).").unwrap();
        assert_eq!(record.name, "anna");
        assert_eq!(record.relative_name, "boris");
        assert_eq!(record.relation, Relation::Mother);
    }

    #[test]
    fn test_decode_tolerates_whitespace() {
        let codec = FactCodec::new();
        // Space before the final dot is not a fact terminator
        let err = codec.decode("  relative( anna ,boris,  father ) . ").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { .. }));

        let record = codec.decode("  relative( anna ,boris,  father ). ").unwrap();
        assert_eq!(record.name, "anna");
        assert_eq!(record.relation, Relation::Father);
    }

    #[test]
    fn test_decode_quoted_atoms() {
        let codec = FactCodec::new();
        let record = codec.decode("relative('Anna, Maria', 'o''neil', sister).").unwrap();
        assert_eq!(record.name, "Anna, Maria");
        assert_eq!(record.relative_name, "o'neil");
        assert_eq!(record.relation, Relation::Sister);
    }

    #[test]
    fn test_decode_escapes() {
        let codec = FactCodec::new();
        let record = codec
            .decode(r"relative('a\\', 'it\'s\nhere', brother).")
            .unwrap();
        assert_eq!(record.name, "a\\");
        assert_eq!(record.relative_name, "it's\nhere");
    }

    #[test]
    fn test_decode_assigns_fresh_ids() {
        let codec = FactCodec::new();
        let a = codec.decode("relative(anna, boris, mother).").unwrap();
        let b = codec.decode("relative(anna, boris, mother).").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        let codec = FactCodec::new();
        for line in [
            "relative(anna, boris).",
            "relative(anna, boris, mother, extra).",
            "relative(anna, boris, mother)",
            "parent(anna, boris, mother).",
            "father(X,Y):-relative(X,Y,father).",
            "",
        ] {
            assert!(
                matches!(codec.decode(line), Err(DecodeError::Malformed { .. })),
                "expected malformed: {line:?}"
            );
        }
    }

    #[test]
    fn test_decode_rejects_unknown_relation() {
        let codec = FactCodec::new();
        assert_eq!(
            codec.decode("relative(anna, boris, cousin)."),
            Err(DecodeError::UnknownRelation { relation: "cousin".into() })
        );
    }

    // -------------------------------------------------------------------------
    // Round trip
    // -------------------------------------------------------------------------
    #[test]
    fn test_decode_encode_preserves_fields() {
        let codec = FactCodec::new();
        let names = [
            "anna",
            "Boris",
            "anna maria",
            "o'neil",
            "",
            "d'artagnan, jr",
            "ёлка",
            "back\\slash\\",
            "two\r\nlines",
            "\\'",
        ];

        for (i, &name) in names.iter().enumerate() {
            let relative_name = names[(i + 1) % names.len()];
            let relation = Relation::ALL[i % Relation::ALL.len()];
            let original = RelativeRecord::new(name, relative_name, relation);

            let decoded = codec.decode(&codec.encode(&original)).unwrap();
            assert!(decoded.same_fact(&original), "lost fields for {name:?}");
        }
    }

    #[test]
    fn test_encode_decode_reproduces_line() {
        let codec = FactCodec::new();
        for line in [
            "relative(anna, boris, mother).",
            "relative('Anna Maria', 'o''neil', wife).",
            "relative('', '', grandson).",
        ] {
            let record = codec.decode(line).unwrap();
            assert_eq!(codec.encode(&record), line);
        }
    }
}
