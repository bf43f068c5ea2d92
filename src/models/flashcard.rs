//! Flashcard is a pair <term, definition>. Both sides are required and are
//! validated once, when a card enters the system.
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub term: String,
    pub definition: String,
}

impl Flashcard {
    /// Builds a card from user or file input, trimming both sides.
    pub fn new(term: &str, definition: &str) -> Result<Self> {
        let term = term.trim();
        let definition = definition.trim();

        if term.is_empty() {
            return Err(Error::InvalidCard("term is empty".to_string()));
        }
        if definition.is_empty() {
            return Err(Error::InvalidCard(format!(
                "definition of '{}' is empty",
                term
            )));
        }

        Ok(Self {
            term: term.to_string(),
            definition: definition.to_string(),
        })
    }

    /// Re-runs ingestion validation on a card built elsewhere (e.g. deserialized).
    pub fn validated(self) -> Result<Self> {
        Self::new(&self.term, &self.definition)
    }
}
