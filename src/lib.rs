pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;

pub use config::Config;
pub use database::ReviewStore;
pub use error::{Error, Result};
pub use models::{
    Deck, DeckSet, Flashcard, LearningCard, LearningSession, MasteryTier, ReviewData, SessionEvent,
    SessionState, Verdict,
};
