//! Wrapper for flashcards that tracks progress within one study session.
use super::{Flashcard, ReviewData};

/// Where a card stands in the current pass over the session queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CardStatus {
    /// Not judged yet in this pass.
    #[default]
    Pending,
    /// Answered "hard" and waiting at the tail for another attempt.
    Requeued,
    /// Answered "easy"; the card is finished for this session.
    Done,
}

#[derive(Clone, Debug)]
pub struct LearningCard {
    pub flashcard: Flashcard,
    pub review: ReviewData,
    pub status: CardStatus,
}

impl LearningCard {
    pub fn new(flashcard: Flashcard, review: ReviewData) -> Self {
        Self {
            flashcard,
            review,
            status: CardStatus::Pending,
        }
    }

    pub fn id(&self) -> i64 {
        self.review.flashcard_id
    }

    /// True while the card is still being drilled in this session's retry loop.
    pub fn is_learning(&self) -> bool {
        self.status == CardStatus::Requeued
    }

    pub fn is_done(&self) -> bool {
        self.status == CardStatus::Done
    }
}
