//! Database operations for the vocabulary app
//!
//! Handles SQLite database initialization, CRUD operations for decks and flashcards,
//! and the mastery/review-date data the progression engine works on.

use crate::error::{Error, Result};
use crate::models::progression;
use crate::models::{Deck, DeckSet, Flashcard, LearningCard, MasteryTier, ReviewData};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS decks (
        name TEXT PRIMARY KEY
    );

    CREATE TABLE IF NOT EXISTS flashcards (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        deck_name TEXT NOT NULL,
        term TEXT NOT NULL,
        definition TEXT NOT NULL,
        FOREIGN KEY (deck_name) REFERENCES decks(name) ON DELETE CASCADE,
        UNIQUE(deck_name, term)
    );

    CREATE TABLE IF NOT EXISTS review_data (
        flashcard_id INTEGER PRIMARY KEY,
        mastery_tier INTEGER NOT NULL DEFAULT 0,
        last_hard_date INTEGER,
        next_review_date INTEGER NOT NULL,
        FOREIGN KEY (flashcard_id) REFERENCES flashcards(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS app_state (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    INSERT OR IGNORE INTO app_state (key, value) VALUES ('day_offset', '0');
";

const CARD_COLUMNS: &str = "f.id, f.term, f.definition, r.mastery_tier, r.last_hard_date, r.next_review_date";

/// Opens (or creates) the SQLite database at `path` and ensures all tables exist.
pub fn init_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    create_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database opened");
    Ok(conn)
}

/// In-memory database with the full schema, used by tests and dry runs.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

fn from_timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// Simulated days added on top of the wall clock (for stepping through reviews).
pub fn get_day_offset(conn: &Connection) -> Result<i64> {
    let value: String = conn.query_row(
        "SELECT value FROM app_state WHERE key = 'day_offset'",
        [],
        |row| row.get(0),
    )?;

    Ok(value.parse::<i64>().unwrap_or(0))
}

/// Advances the simulated date by one day
pub fn advance_day(conn: &Connection) -> Result<i64> {
    let offset = get_day_offset(conn)? + 1;
    conn.execute(
        "UPDATE app_state SET value = ?1 WHERE key = 'day_offset'",
        params![offset.to_string()],
    )?;

    tracing::info!(day_offset = offset, "advanced simulated date");
    Ok(offset)
}

/// Current moment in the user's local calendar, including the simulated offset.
pub fn current_time(conn: &Connection) -> Result<DateTime<Local>> {
    Ok(Local::now() + Duration::days(get_day_offset(conn)?))
}

fn deck_exists(name: &str, conn: &Connection) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM decks WHERE name = ?1", params![name], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

fn require_deck(name: &str, conn: &Connection) -> Result<()> {
    if deck_exists(name, conn)? {
        Ok(())
    } else {
        Err(Error::DeckNotFound(name.to_string()))
    }
}

/// Creates a new deck in the database
pub fn new_deck(name: &str, conn: &Connection) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidCard("deck name is empty".to_string()));
    }
    if deck_exists(name, conn)? {
        return Err(Error::DeckExists(name.to_string()));
    }

    conn.execute("INSERT INTO decks (name) VALUES (?1)", params![name])?;
    tracing::info!(deck = name, "deck created");
    Ok(())
}

/// Deletes a deck together with its flashcards and their review data
pub fn delete_deck(name: &str, conn: &Connection) -> Result<()> {
    let removed = conn.execute("DELETE FROM decks WHERE name = ?1", params![name])?;
    if removed == 0 {
        return Err(Error::DeckNotFound(name.to_string()));
    }

    tracing::info!(deck = name, "deck deleted");
    Ok(())
}

/// Adds a flashcard to a deck and initializes its review data
///
/// Returns the flashcard ID. If the flashcard already exists (same deck + term),
/// the existing card and its progress are kept.
pub fn add_flashcard(
    deck_name: &str,
    flashcard: &Flashcard,
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<i64> {
    require_deck(deck_name, conn)?;

    conn.execute(
        "INSERT OR IGNORE INTO flashcards (deck_name, term, definition) VALUES (?1, ?2, ?3)",
        params![deck_name, flashcard.term, flashcard.definition],
    )?;

    let flashcard_id: i64 = conn.query_row(
        "SELECT id FROM flashcards WHERE deck_name = ?1 AND term = ?2",
        params![deck_name, flashcard.term],
        |row| row.get(0),
    )?;

    // New cards start at tier 0 and are due right away
    let review = ReviewData::new(flashcard_id, now);
    conn.execute(
        "INSERT OR IGNORE INTO review_data (flashcard_id, mastery_tier, last_hard_date, next_review_date)
         VALUES (?1, ?2, NULL, ?3)",
        params![
            flashcard_id,
            review.mastery_tier.as_percent(),
            review.next_review_date.timestamp()
        ],
    )?;

    tracing::debug!(deck = deck_name, term = %flashcard.term, flashcard_id, "flashcard added");
    Ok(flashcard_id)
}

/// Removes a single flashcard and its review data
pub fn delete_flashcard(flashcard_id: i64, conn: &Connection) -> Result<bool> {
    let removed = conn.execute("DELETE FROM flashcards WHERE id = ?1", params![flashcard_id])?;
    Ok(removed > 0)
}

/// Retrieves all flashcards for a given deck
///
/// Returns vector of (flashcard_id, Flashcard) tuples
pub fn get_flashcards_for_deck(deck_name: &str, conn: &Connection) -> Result<Vec<(i64, Flashcard)>> {
    let mut stmt =
        conn.prepare("SELECT id, term, definition FROM flashcards WHERE deck_name = ?1 ORDER BY id")?;

    let flashcards = stmt
        .query_map(params![deck_name], |row| {
            Ok((
                row.get(0)?,
                Flashcard {
                    term: row.get(1)?,
                    definition: row.get(2)?,
                },
            ))
        })?
        .collect::<rusqlite::Result<Vec<(i64, Flashcard)>>>()?;

    Ok(flashcards)
}

fn review_from_row(id: i64, row: &Row<'_>, offset: usize) -> rusqlite::Result<ReviewData> {
    Ok(ReviewData {
        flashcard_id: id,
        mastery_tier: MasteryTier::from_percent(row.get(offset)?),
        last_hard_date: row.get::<_, Option<i64>>(offset + 1)?.map(from_timestamp),
        next_review_date: from_timestamp(row.get(offset + 2)?),
    })
}

fn learning_card_from_row(row: &Row<'_>) -> rusqlite::Result<LearningCard> {
    let id: i64 = row.get(0)?;
    Ok(LearningCard::new(
        Flashcard {
            term: row.get(1)?,
            definition: row.get(2)?,
        },
        review_from_row(id, row, 3)?,
    ))
}

/// Loads the review data of a single flashcard
pub fn get_review_data(flashcard_id: i64, conn: &Connection) -> Result<Option<ReviewData>> {
    let review = conn
        .query_row(
            "SELECT mastery_tier, last_hard_date, next_review_date FROM review_data WHERE flashcard_id = ?1",
            params![flashcard_id],
            |row| review_from_row(flashcard_id, row, 0),
        )
        .optional()?;

    Ok(review)
}

/// Writes the review data produced by one answer
pub fn update_review_data(review_data: &ReviewData, conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE review_data
         SET mastery_tier = ?1, last_hard_date = ?2, next_review_date = ?3
         WHERE flashcard_id = ?4",
        params![
            review_data.mastery_tier.as_percent(),
            review_data.last_hard_date.map(|d| d.timestamp()),
            review_data.next_review_date.timestamp(),
            review_data.flashcard_id
        ],
    )?;

    Ok(())
}

/// First instant of the day after `now`, in `now`'s calendar.
fn start_of_tomorrow<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    now.date_naive()
        .succ_opt()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .and_then(|midnight| now.timezone().from_local_datetime(&midnight).earliest())
        .map(|start| start.timestamp())
        .unwrap_or_else(|| now.timestamp() + 24 * 60 * 60)
}

fn query_cards(sql: &str, deck_name: &str, boundary: i64, conn: &Connection) -> Result<Vec<LearningCard>> {
    let mut stmt = conn.prepare(sql)?;
    let cards = stmt
        .query_map(params![deck_name, boundary], learning_card_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(cards)
}

/// Retrieves flashcards due for review in a deck
///
/// Due means `next_review_date` falls today or earlier in `now`'s calendar.
/// Mastered cards (tier 100) never come back into the queue.
pub fn get_due_cards<Tz: TimeZone>(
    deck_name: &str,
    now: &DateTime<Tz>,
    conn: &Connection,
) -> Result<Vec<LearningCard>> {
    require_deck(deck_name, conn)?;
    let sql = format!(
        "SELECT {CARD_COLUMNS}
         FROM flashcards f
         JOIN review_data r ON f.id = r.flashcard_id
         WHERE f.deck_name = ?1 AND r.next_review_date < ?2 AND r.mastery_tier < 100
         ORDER BY r.next_review_date ASC, f.id ASC"
    );
    query_cards(&sql, deck_name, start_of_tomorrow(now), conn)
}

/// Retrieves cards scheduled after today, soonest first
pub fn get_upcoming_cards<Tz: TimeZone>(
    deck_name: &str,
    now: &DateTime<Tz>,
    conn: &Connection,
) -> Result<Vec<LearningCard>> {
    require_deck(deck_name, conn)?;
    let sql = format!(
        "SELECT {CARD_COLUMNS}
         FROM flashcards f
         JOIN review_data r ON f.id = r.flashcard_id
         WHERE f.deck_name = ?1 AND r.next_review_date >= ?2 AND r.mastery_tier < 100
         ORDER BY r.next_review_date ASC, f.id ASC"
    );
    query_cards(&sql, deck_name, start_of_tomorrow(now), conn)
}

/// "Reset Learning Data": every card in the deck goes back to tier 0 and is due now
///
/// Returns the number of cards reset.
pub fn reset_learning_data<Tz: TimeZone>(
    deck_name: &str,
    now: &DateTime<Tz>,
    conn: &Connection,
) -> Result<usize> {
    require_deck(deck_name, conn)?;

    let tx = conn.unchecked_transaction()?;
    let reviews = {
        let mut stmt = tx.prepare(
            "SELECT r.flashcard_id, r.mastery_tier, r.last_hard_date, r.next_review_date
             FROM review_data r
             JOIN flashcards f ON f.id = r.flashcard_id
             WHERE f.deck_name = ?1",
        )?;
        stmt.query_map(params![deck_name], |row| review_from_row(row.get(0)?, row, 1))?
            .collect::<rusqlite::Result<Vec<_>>>()?
    };

    for review in &reviews {
        update_review_data(&progression::reset(review, now), &tx)?;
    }
    tx.commit()?;

    tracing::info!(deck = deck_name, cards = reviews.len(), "learning data reset");
    Ok(reviews.len())
}

/// Number of cards per mastery tier, in tier order
pub fn mastery_summary(deck_name: &str, conn: &Connection) -> Result<Vec<(MasteryTier, usize)>> {
    require_deck(deck_name, conn)?;

    let mut stmt = conn.prepare(
        "SELECT r.mastery_tier
         FROM review_data r
         JOIN flashcards f ON f.id = r.flashcard_id
         WHERE f.deck_name = ?1",
    )?;
    let tiers = stmt
        .query_map(params![deck_name], |row| row.get::<_, i64>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let summary = MasteryTier::ALL
        .iter()
        .map(|&tier| {
            let count = tiers
                .iter()
                .filter(|&&stored| MasteryTier::from_percent(stored) == tier)
                .count();
            (tier, count)
        })
        .collect();

    Ok(summary)
}

/// Retrieves all deck names from database
pub fn get_all_decks(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM decks ORDER BY name")?;
    let decks = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(decks)
}

/// Loads all decks with their flashcards into memory
///
/// Does not load review data - that's fetched separately when starting a learning session.
pub fn load_all_decks(conn: &Connection) -> Result<DeckSet> {
    let mut decks = Vec::new();

    for deck_name in get_all_decks(conn)? {
        let flashcards = get_flashcards_for_deck(&deck_name, conn)?
            .into_iter()
            .map(|(_, fc)| fc)
            .collect();

        decks.push(Deck {
            name: deck_name,
            flashcards,
        });
    }

    Ok(DeckSet { decks })
}
