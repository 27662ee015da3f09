//! Relation vocabulary
//!
//! The closed set of family relations a table row can carry. Each relation
//! has a predicate atom (written into fact lines) and a UI label (shown in
//! the relation select box).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A family relation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    #[default]
    Mother,
    Father,
    Son,
    Daughter,
    Brother,
    Sister,
    Husband,
    Wife,
    Grandmother,
    Grandfather,
    Grandson,
    Granddaughter,
}

impl Relation {
    /// Every relation, in select-box order
    pub const ALL: [Relation; 12] = [
        Relation::Mother,
        Relation::Father,
        Relation::Son,
        Relation::Daughter,
        Relation::Brother,
        Relation::Sister,
        Relation::Husband,
        Relation::Wife,
        Relation::Grandmother,
        Relation::Grandfather,
        Relation::Grandson,
        Relation::Granddaughter,
    ];

    /// Atom used in fact lines
    pub fn predicate(&self) -> &'static str {
        match self {
            Self::Mother => "mother",
            Self::Father => "father",
            Self::Son => "son",
            Self::Daughter => "daughter",
            Self::Brother => "brother",
            Self::Sister => "sister",
            Self::Husband => "husband",
            Self::Wife => "wife",
            Self::Grandmother => "grandmother",
            Self::Grandfather => "grandfather",
            Self::Grandson => "grandson",
            Self::Granddaughter => "granddaughter",
        }
    }

    /// Human-readable label for the select box
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mother => "Мать",
            Self::Father => "Отец",
            Self::Son => "Сын",
            Self::Daughter => "Дочь",
            Self::Brother => "Брат",
            Self::Sister => "Сестра",
            Self::Husband => "Муж",
            Self::Wife => "Жена",
            Self::Grandmother => "Бабушка",
            Self::Grandfather => "Дедушка",
            Self::Grandson => "Внук",
            Self::Granddaughter => "Внучка",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.predicate())
    }
}

/// Returned when an atom is not part of the vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown relation {0:?}")]
pub struct UnknownRelation(pub String);

impl FromStr for Relation {
    type Err = UnknownRelation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Relation::ALL
            .iter()
            .copied()
            .find(|relation| relation.predicate() == s)
            .ok_or_else(|| UnknownRelation(s.to_string()))
    }
}

/// One `{ value, label }` entry for the relation select box
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationOption {
    pub value: Relation,
    pub label: String,
}

/// Select-box options for every relation
pub fn relation_options() -> Vec<RelationOption> {
    Relation::ALL
        .iter()
        .map(|&value| RelationOption {
            value,
            label: value.label().to_string(),
        })
        .collect()
}
