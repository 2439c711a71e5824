use rusqlite::Connection;

use crate::db::{status_repo, task_repo};
use crate::error::KanbanError;
use crate::models::Snapshot;

use super::{BoardStore, Subscribers, Subscription, Write, WriteBatch};

/// [`BoardStore`] backed by the local SQLite database.
pub struct SqliteStore {
    conn: Connection,
    subscribers: Subscribers,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            subscribers: Subscribers::new(),
        }
    }

    fn apply_write(&self, owner_id: &str, write: &Write) -> Result<(), KanbanError> {
        match write {
            Write::CreateTask(task) => {
                if task.owner_id != owner_id {
                    return Err(KanbanError::validation("Task belongs to another owner"));
                }
                task_repo::insert_task(&self.conn, task)
            }
            Write::UpdateTask { id, patch } => task_repo::update_task(&self.conn, owner_id, id, patch),
            Write::DeleteTask { id } => task_repo::delete_task(&self.conn, owner_id, id),
            Write::CreateColumn(column) => {
                if column.owner_id != owner_id {
                    return Err(KanbanError::validation("Status belongs to another owner"));
                }
                status_repo::insert_status(&self.conn, column)
            }
            Write::UpdateColumn { name, patch } => {
                status_repo::update_status(&self.conn, owner_id, name, patch)
            }
            Write::DeleteColumn { name } => status_repo::delete_status(&self.conn, owner_id, name),
        }
    }
}

impl BoardStore for SqliteStore {
    fn snapshot(&self, owner_id: &str) -> Result<Snapshot, KanbanError> {
        Ok(Snapshot {
            columns: status_repo::list_statuses(&self.conn, owner_id)?,
            tasks: task_repo::list_tasks(&self.conn, owner_id)?,
        })
    }

    fn subscribe(&self, owner_id: &str) -> Result<Subscription, KanbanError> {
        let subscription = self.subscribers.subscribe(owner_id);
        self.subscribers.publish(owner_id, &self.snapshot(owner_id)?);
        Ok(subscription)
    }

    fn commit(&self, owner_id: &str, batch: WriteBatch) -> Result<(), KanbanError> {
        if batch.is_empty() {
            return Ok(());
        }
        let count = batch.len();

        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        let result = (|| -> Result<(), KanbanError> {
            for write in batch.iter() {
                self.apply_write(owner_id, write)?;
            }
            Ok(())
        })();

        match result {
            Ok(()) => self.conn.execute_batch("COMMIT")?,
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                tracing::warn!(owner = owner_id, writes = count, error = %e.message, "batch rolled back");
                return Err(e);
            }
        }
        tracing::info!(owner = owner_id, writes = count, "batch committed");

        if self.subscribers.has_listeners(owner_id) {
            self.subscribers.publish(owner_id, &self.snapshot(owner_id)?);
        }
        Ok(())
    }
}
