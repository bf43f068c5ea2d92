pub mod deck;
pub mod deck_set;
pub mod flashcard;
pub mod learning_card;
pub mod learning_session;
pub mod mastery;
pub mod progression;
pub mod review_data;

pub use deck::Deck;
pub use deck_set::DeckSet;
pub use flashcard::Flashcard;
pub use learning_card::{CardStatus, LearningCard};
pub use learning_session::{LearningSession, SessionEvent, SessionState, Verdict};
pub use mastery::MasteryTier;
pub use review_data::ReviewData;
