//! JSON import/export module for vocabulary decks.
//! Provides functionality to save and load Deck structures to/from JSON files.

use crate::error::Result;
use crate::models::Deck;
use std::fs;
use std::path::Path;

/// Exports a deck to a JSON file at the specified path.
/// Returns an error if file creation or writing fails.
pub fn export_json_to_path(deck: &Deck, path: &Path) -> Result<()> {
    let json_string = serde_json::to_string_pretty(deck)?;
    fs::write(path, json_string)?;
    tracing::info!(deck = %deck.name, path = %path.display(), "deck exported");
    Ok(())
}

/// Imports a deck from a JSON file.
/// Every card goes through the same validation as cards typed in by hand.
/// Returns an error if the file doesn't exist, contains invalid JSON or blank cards.
pub fn import_json(path: &Path) -> Result<Deck> {
    let contents = fs::read_to_string(path)?;

    let deck: Deck = serde_json::from_str(&contents)?;
    let deck = deck.validated()?;

    tracing::info!(deck = %deck.name, path = %path.display(), cards = deck.flashcards.len(), "deck imported");
    Ok(deck)
}
