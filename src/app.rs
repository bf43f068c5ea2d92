//! Terminal front end: deck management and the interactive study loop.
//! Handles every `vocab` subcommand against one open database.

use chrono::{DateTime, Local, Utc};
use rusqlite::Connection;
use std::cell::Cell;
use std::io::{BufRead, Write};
use std::path::Path;
use std::rc::Rc;
use vocab_mastery::config::StudyConfig;
use vocab_mastery::database::db;
use vocab_mastery::export::json::{export_json_to_path, import_json};
use vocab_mastery::models::{LearningCard, LearningSession, SessionEvent, Verdict};
use vocab_mastery::{Error, Flashcard, Result};

/// Formats a stored instant as a local YYYY-MM-DD string
fn format_date(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

/// Application state: the open database plus study preferences
pub struct App {
    conn: Connection,
    study: StudyConfig,
}

enum Prompt {
    Line(String),
    Quit,
}

/// Reads one trimmed line; end of input counts as quitting.
fn read_prompt<R: BufRead>(input: &mut R) -> Result<Prompt> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Prompt::Quit);
    }

    let line = line.trim().to_lowercase();
    if line == "q" {
        Ok(Prompt::Quit)
    } else {
        Ok(Prompt::Line(line))
    }
}

impl App {
    pub fn new(conn: Connection, study: StudyConfig) -> Self {
        Self { conn, study }
    }

    fn now(&self) -> Result<DateTime<Local>> {
        db::current_time(&self.conn)
    }

    pub fn list_decks<W: Write>(&self, out: &mut W) -> Result<()> {
        let deck_set = db::load_all_decks(&self.conn)?;
        if deck_set.decks.is_empty() {
            writeln!(out, "No decks yet. Create one with `vocab new-deck <name>`.")?;
            return Ok(());
        }

        for deck in &deck_set.decks {
            writeln!(out, "{} ({} cards)", deck.name, deck.flashcards.len())?;
        }
        Ok(())
    }

    pub fn new_deck<W: Write>(&self, name: &str, out: &mut W) -> Result<()> {
        db::new_deck(name, &self.conn)?;
        writeln!(out, "Deck '{}' created.", name.trim())?;
        Ok(())
    }

    pub fn delete_deck<W: Write>(&self, name: &str, out: &mut W) -> Result<()> {
        db::delete_deck(name, &self.conn)?;
        writeln!(out, "Deck '{}' deleted.", name)?;
        Ok(())
    }

    pub fn add_card<W: Write>(&self, deck: &str, term: &str, definition: &str, out: &mut W) -> Result<()> {
        let flashcard = Flashcard::new(term, definition)?;
        let now = self.now()?.with_timezone(&Utc);
        db::add_flashcard(deck, &flashcard, now, &self.conn)?;
        writeln!(out, "Added '{}' to '{}'.", flashcard.term, deck)?;
        Ok(())
    }

    pub fn delete_card<W: Write>(&self, id: i64, out: &mut W) -> Result<()> {
        if db::delete_flashcard(id, &self.conn)? {
            writeln!(out, "Card {} deleted.", id)?;
        } else {
            writeln!(out, "No card with id {}.", id)?;
        }
        Ok(())
    }

    /// Prints every card with its tier and next review date, then the tier summary
    pub fn list_cards<W: Write>(&self, deck: &str, out: &mut W) -> Result<()> {
        let summary = db::mastery_summary(deck, &self.conn)?;

        for (id, flashcard) in db::get_flashcards_for_deck(deck, &self.conn)? {
            let Some(review) = db::get_review_data(id, &self.conn)? else {
                continue;
            };
            writeln!(
                out,
                "[{:>3}] {:<24} {:<40} {:>4}  next: {}",
                id,
                flashcard.term,
                flashcard.definition,
                review.mastery_tier,
                format_date(review.next_review_date)
            )?;
        }

        let tiers: Vec<String> = summary
            .iter()
            .map(|(tier, count)| format!("{}: {}", tier, count))
            .collect();
        writeln!(out, "Mastery: {}", tiers.join(", "))?;
        Ok(())
    }

    pub fn upcoming<W: Write>(&self, deck: &str, out: &mut W) -> Result<()> {
        let cards = db::get_upcoming_cards(deck, &self.now()?, &self.conn)?;
        if cards.is_empty() {
            writeln!(out, "Nothing scheduled for later days.")?;
        }
        for card in &cards {
            writeln!(
                out,
                "{} - {} ({})",
                format_date(card.review.next_review_date),
                card.flashcard.term,
                card.review.mastery_tier
            )?;
        }
        Ok(())
    }

    pub fn reset<W: Write>(&self, deck: &str, out: &mut W) -> Result<()> {
        let count = db::reset_learning_data(deck, &self.now()?, &self.conn)?;
        writeln!(out, "Reset learning data of {} cards in '{}'.", count, deck)?;
        Ok(())
    }

    pub fn advance_day<W: Write>(&self, out: &mut W) -> Result<()> {
        db::advance_day(&self.conn)?;
        writeln!(out, "Current date: {}", self.now()?.format("%Y-%m-%d"))?;
        Ok(())
    }

    pub fn export<W: Write>(&self, deck: &str, path: &Path, out: &mut W) -> Result<()> {
        let deck_set = db::load_all_decks(&self.conn)?;
        let deck = deck_set
            .find(deck)
            .ok_or_else(|| Error::DeckNotFound(deck.to_string()))?;

        export_json_to_path(deck, path)?;
        writeln!(out, "Deck '{}' exported to {}.", deck.name, path.display())?;
        Ok(())
    }

    /// Imports a deck file as a new deck; an existing deck with the same name is an error
    pub fn import<W: Write>(&self, path: &Path, out: &mut W) -> Result<()> {
        let deck = import_json(path)?;
        let now = self.now()?.with_timezone(&Utc);

        let tx = self.conn.unchecked_transaction()?;
        db::new_deck(&deck.name, &tx)?;
        for flashcard in &deck.flashcards {
            db::add_flashcard(&deck.name, flashcard, now, &tx)?;
        }
        tx.commit()?;

        writeln!(
            out,
            "Deck '{}' imported with {} cards.",
            deck.name,
            deck.flashcards.len()
        )?;
        Ok(())
    }

    fn start_session(&self, deck: &str, cards: Vec<LearningCard>) -> LearningSession {
        if self.study.shuffle {
            LearningSession::new_from_due_cards(deck.to_string(), cards, &mut rand::rng())
        } else {
            LearningSession::new_in_order(deck.to_string(), cards)
        }
    }

    /// Runs a study session over the due cards of `deck`.
    ///
    /// For each card: show the term, wait for Enter, show the definition,
    /// then read `e` (easy) or `h` (hard). `q` or end of input stops early;
    /// every answer given so far is already saved.
    pub fn study<R: BufRead, W: Write>(&mut self, deck: &str, input: &mut R, out: &mut W) -> Result<()> {
        let due = db::get_due_cards(deck, &self.now()?, &self.conn)?;
        let mut session = self.start_session(deck, due);

        if session.is_completed() {
            writeln!(out, "No cards due in '{}'.", deck)?;
            return Ok(());
        }

        let retries = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&retries);
        session.subscribe(move |event| match event {
            SessionEvent::Requeued { .. } => counter.set(counter.get() + 1),
            SessionEvent::Finished => tracing::debug!("study session complete"),
            SessionEvent::Answered { .. } => {}
        });

        'cards: while let Some(card) = session.current_card() {
            let term = card.flashcard.term.clone();
            let definition = card.flashcard.definition.clone();

            writeln!(out, "{}", session.phase_message())?;
            writeln!(out, "  {}", term)?;
            write!(out, "[Enter] show definition, [q] quit: ")?;
            out.flush()?;
            if let Prompt::Quit = read_prompt(input)? {
                break;
            }

            session.toggle_definition();
            writeln!(out, "  = {}", definition)?;

            let verdict = loop {
                write!(out, "[e] easy, [h] hard, [q] quit: ")?;
                out.flush()?;
                match read_prompt(input)? {
                    Prompt::Quit => break 'cards,
                    Prompt::Line(line) if line == "e" => break Verdict::Easy,
                    Prompt::Line(line) if line == "h" => break Verdict::Hard,
                    Prompt::Line(_) => continue,
                }
            };

            let now = self.now()?;
            session.answer(verdict, &now, &mut self.conn)?;
        }

        writeln!(
            out,
            "{} of {} cards done, {} retries.",
            session.learned_count(),
            session.total_count(),
            retries.get()
        )?;

        if session.is_completed() && self.study.show_upcoming {
            self.upcoming(deck, out)?;
        }
        Ok(())
    }
}
