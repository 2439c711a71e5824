use rusqlite::Connection;

use crate::error::KanbanError;

pub fn run_migrations(conn: &Connection) -> Result<(), KanbanError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            display_name TEXT NOT NULL,
            password_salt TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS statuses (
            owner_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            order_index INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (owner_id, name)
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            content TEXT NOT NULL,
            status TEXT NOT NULL,
            order_index INTEGER NOT NULL DEFAULT 0,
            description TEXT,
            activities TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            updated_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_owner_status ON tasks(owner_id, status, order_index);
        CREATE INDEX IF NOT EXISTS idx_statuses_owner ON statuses(owner_id, order_index);
        ",
    )?;
    Ok(())
}
