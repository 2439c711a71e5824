//! Persistence seam for the board.
//!
//! A [`BoardStore`] holds every user's columns and tasks, hands out live
//! [`Subscription`]s that receive a full snapshot after each change, and
//! applies record-level writes either one at a time or as an atomic batch.

pub mod sqlite;
pub mod subscription;
pub mod write;

pub use sqlite::SqliteStore;
pub use subscription::{Subscribers, Subscription};
pub use write::{Write, WriteBatch};

use crate::error::KanbanError;
use crate::models::Snapshot;

pub trait BoardStore {
    /// Current columns and tasks owned by `owner_id`.
    fn snapshot(&self, owner_id: &str) -> Result<Snapshot, KanbanError>;

    /// Start listening for changes to `owner_id`'s board. The current snapshot
    /// is delivered immediately.
    fn subscribe(&self, owner_id: &str) -> Result<Subscription, KanbanError>;

    /// Apply all writes or none of them.
    fn commit(&self, owner_id: &str, batch: WriteBatch) -> Result<(), KanbanError>;

    fn apply(&self, owner_id: &str, write: Write) -> Result<(), KanbanError> {
        self.commit(owner_id, WriteBatch::from(write))
    }
}
