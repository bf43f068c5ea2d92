use super::MasteryTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted scheduling state of a single flashcard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewData {
    pub flashcard_id: i64,
    pub mastery_tier: MasteryTier,
    pub last_hard_date: Option<DateTime<Utc>>,
    pub next_review_date: DateTime<Utc>,
}

impl ReviewData {
    /// Scheduling state of a freshly added card: tier 0, due immediately.
    pub fn new(flashcard_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            flashcard_id,
            mastery_tier: MasteryTier::New,
            last_hard_date: None,
            next_review_date: now,
        }
    }
}
