//! Study session over a queue of due cards.
//!
//! The queue is shuffled once when the session starts. A card answered "hard"
//! is moved to the tail and retried later; a card answered "easy" is done and
//! the cursor moves on. The session finishes once the cursor steps past the
//! last card, i.e. when every card has been answered "easy" in its final pass.

use super::progression::{answer_easy, answer_hard};
use super::{CardStatus, LearningCard, MasteryTier};
use crate::database::ReviewStore;
use crate::error::Result;
use chrono::{DateTime, TimeZone};
use rand::Rng;
use rand::seq::SliceRandom;

/// User judgment for the current card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Hard,
    Easy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Active { index: usize },
    Finished,
}

/// Result of applying one answer to a queue.
#[derive(Clone, Debug)]
pub struct Transition {
    pub queue: Vec<LearningCard>,
    pub state: SessionState,
    /// Position of the answered card in the new queue, `None` if nothing was answered.
    pub answered: Option<usize>,
}

/// Applies `verdict` to the card at `current_index` and reorders the queue.
///
/// An index past the end (including any index into an empty queue) is the
/// `Finished` state and leaves the queue untouched.
pub fn reorder_queue<Tz: TimeZone>(
    mut queue: Vec<LearningCard>,
    current_index: usize,
    verdict: Verdict,
    now: &DateTime<Tz>,
) -> Transition {
    if current_index >= queue.len() {
        return Transition {
            queue,
            state: SessionState::Finished,
            answered: None,
        };
    }

    match verdict {
        Verdict::Hard => {
            let mut card = queue.remove(current_index);
            card.review = answer_hard(&card.review, now);
            card.status = CardStatus::Requeued;
            queue.push(card);

            // The next card slid into `current_index`; a single-card queue
            // simply shows the same card again.
            let answered = queue.len() - 1;
            Transition {
                queue,
                state: SessionState::Active {
                    index: current_index,
                },
                answered: Some(answered),
            }
        }
        Verdict::Easy => {
            let card = &mut queue[current_index];
            card.review = answer_easy(&card.review, now);
            card.status = CardStatus::Done;

            let state = if current_index + 1 == queue.len() {
                SessionState::Finished
            } else {
                SessionState::Active {
                    index: current_index + 1,
                }
            };
            Transition {
                queue,
                state,
                answered: Some(current_index),
            }
        }
    }
}

/// Notifications emitted by a session as answers come in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Answered {
        flashcard_id: i64,
        verdict: Verdict,
        tier: MasteryTier,
    },
    Requeued {
        flashcard_id: i64,
    },
    Finished,
}

type Observer = Box<dyn FnMut(&SessionEvent)>;

/// Manages one study session: queue, cursor, reveal toggle and observers.
pub struct LearningSession {
    pub deck_name: String,
    pub show_definition: bool,
    queue: Vec<LearningCard>,
    state: SessionState,
    observers: Vec<Observer>,
}

impl LearningSession {
    /// Creates a session from due cards, shuffling them once.
    pub fn new_from_due_cards<R: Rng + ?Sized>(
        deck_name: String,
        mut cards: Vec<LearningCard>,
        rng: &mut R,
    ) -> Self {
        cards.shuffle(rng);
        Self::new_in_order(deck_name, cards)
    }

    /// Creates a session that keeps the given order.
    pub fn new_in_order(deck_name: String, cards: Vec<LearningCard>) -> Self {
        let state = if cards.is_empty() {
            SessionState::Finished
        } else {
            SessionState::Active { index: 0 }
        };

        tracing::debug!(deck = %deck_name, cards = cards.len(), "learning session started");

        Self {
            deck_name,
            show_definition: false,
            queue: cards,
            state,
            observers: Vec::new(),
        }
    }

    /// Registers a callback invoked for every session event.
    pub fn subscribe(&mut self, observer: impl FnMut(&SessionEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn queue(&self) -> &[LearningCard] {
        &self.queue
    }

    pub fn current_card(&self) -> Option<&LearningCard> {
        match self.state {
            SessionState::Active { index } => self.queue.get(index),
            SessionState::Finished => None,
        }
    }

    pub fn toggle_definition(&mut self) {
        self.show_definition = !self.show_definition;
    }

    /// Answers the current card and persists its new review data through `store`.
    ///
    /// The session only advances once the store accepted the update, so a
    /// failed write can be retried with the same card. Answering a finished
    /// session is a no-op.
    pub fn answer<Tz, S>(&mut self, verdict: Verdict, now: &DateTime<Tz>, store: &mut S) -> Result<()>
    where
        Tz: TimeZone,
        S: ReviewStore + ?Sized,
    {
        let SessionState::Active { index } = self.state else {
            return Ok(());
        };

        let transition = reorder_queue(self.queue.clone(), index, verdict, now);
        let Some(position) = transition.answered else {
            self.state = transition.state;
            return Ok(());
        };

        let answered = &transition.queue[position];
        store.save_review(&answered.review)?;

        let flashcard_id = answered.id();
        let tier = answered.review.mastery_tier;
        tracing::debug!(flashcard_id, ?verdict, %tier, "card answered");

        self.queue = transition.queue;
        self.state = transition.state;
        self.show_definition = false;

        self.emit(SessionEvent::Answered {
            flashcard_id,
            verdict,
            tier,
        });
        if verdict == Verdict::Hard {
            self.emit(SessionEvent::Requeued { flashcard_id });
        }
        if self.is_completed() {
            tracing::info!(deck = %self.deck_name, cards = self.queue.len(), "learning session finished");
            self.emit(SessionEvent::Finished);
        }

        Ok(())
    }

    fn emit(&mut self, event: SessionEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    pub fn learned_count(&self) -> usize {
        self.queue.iter().filter(|card| card.is_done()).count()
    }

    pub fn learning_count(&self) -> usize {
        self.queue.iter().filter(|card| card.is_learning()).count()
    }

    pub fn total_count(&self) -> usize {
        self.queue.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count() - self.learned_count()
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Finished
    }

    pub fn phase_message(&self) -> String {
        match self.current_card() {
            Some(card) if card.is_learning() => format!(
                "Retry: {} of {} cards left ({} in retry)",
                self.remaining_count(),
                self.total_count(),
                self.learning_count()
            ),
            Some(_) => format!(
                "{} of {} cards left",
                self.remaining_count(),
                self.total_count()
            ),
            None => format!("Session complete: {} cards", self.total_count()),
        }
    }
}
