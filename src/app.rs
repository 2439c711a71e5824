use crate::board::{Board, ReconcileOptions};
use crate::db::connection;
use crate::error::KanbanError;
use crate::identity::{IdentityService, LocalIdentity};
use crate::store::SqliteStore;

/// Everything a command needs, built once at startup and dropped at exit.
pub struct AppContext {
    pub identity: LocalIdentity,
}

impl AppContext {
    pub fn open() -> Result<Self, KanbanError> {
        let identity = LocalIdentity::open(connection::open_db()?, connection::config_path()?)?;
        Ok(Self { identity })
    }

    /// Open the signed-in user's board on its own store connection.
    pub fn board(&self) -> Result<Board<SqliteStore>, KanbanError> {
        let store = SqliteStore::new(connection::open_db()?);
        let options = ReconcileOptions {
            compact_source: self.identity.config().compact_source_on_move,
        };
        Board::open(store, self.identity.current_user(), options)
    }
}
