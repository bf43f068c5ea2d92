//! Deck is a named set of flashcards
use super::Flashcard;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub flashcards: Vec<Flashcard>,
}

impl Default for Deck {
    fn default() -> Self {
        Self {
            name: "My Words".to_string(),
            flashcards: Vec::new(),
        }
    }
}

impl Deck {
    /// Checks the deck name and every card, as done for anything read from disk.
    pub fn validated(self) -> Result<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::InvalidCard("deck name is empty".to_string()));
        }

        let flashcards = self
            .flashcards
            .into_iter()
            .map(Flashcard::validated)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { name, flashcards })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_trims_name() {
        let deck = Deck {
            name: "  GRE words ".to_string(),
            flashcards: vec![Flashcard::new("laconic", "using few words").unwrap()],
        };

        let deck = deck.validated().unwrap();
        assert_eq!(deck.name, "GRE words");
        assert_eq!(deck.flashcards.len(), 1);
    }

    #[test]
    fn test_validated_rejects_blank_card() {
        let deck = Deck {
            name: "GRE words".to_string(),
            flashcards: vec![Flashcard {
                term: "".to_string(),
                definition: "nothing".to_string(),
            }],
        };

        assert!(deck.validated().is_err());
    }
}
