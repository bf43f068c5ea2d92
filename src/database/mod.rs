pub mod db;

use crate::error::Result;
use crate::models::ReviewData;
use rusqlite::Connection;

/// Persistence port the study session writes through after every answer.
pub trait ReviewStore {
    fn save_review(&mut self, review: &ReviewData) -> Result<()>;
}

impl ReviewStore for Connection {
    fn save_review(&mut self, review: &ReviewData) -> Result<()> {
        db::update_review_data(review, self)
    }
}
