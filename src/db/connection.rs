use std::env;
use std::fs;
use std::path::PathBuf;

use rusqlite::Connection;

use crate::error::KanbanError;

use super::migrations;

pub const HOME_DIR: &str = ".kanban";
pub const HOME_ENV: &str = "KANBAN_HOME";

/// Find the board home: `$KANBAN_HOME`, else the nearest `.kanban` directory walking up from cwd.
pub fn find_home() -> Result<PathBuf, KanbanError> {
    if let Some(home) = env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    let mut dir = env::current_dir()?;
    loop {
        let candidate = dir.join(HOME_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        if !dir.pop() {
            return Err(KanbanError::not_initialized());
        }
    }
}

/// Where `kanban init` puts the board home.
pub fn init_home() -> Result<PathBuf, KanbanError> {
    if let Some(home) = env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    Ok(env::current_dir()?.join(HOME_DIR))
}

/// Get the path to the kanban database.
pub fn db_path() -> Result<PathBuf, KanbanError> {
    Ok(find_home()?.join("kanban.db"))
}

/// Get the config file path.
pub fn config_path() -> Result<PathBuf, KanbanError> {
    Ok(find_home()?.join("config.json"))
}

/// Open a connection to the database. Returns error if not initialized.
pub fn open_db() -> Result<Connection, KanbanError> {
    let path = db_path()?;
    if !path.exists() {
        return Err(KanbanError::not_initialized());
    }
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// Initialize the database: create the home directory, database, and run migrations.
pub fn init_db() -> Result<PathBuf, KanbanError> {
    let home = init_home()?;
    fs::create_dir_all(&home)?;
    let path = home.join("kanban.db");
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(path)
}

/// Fresh migrated in-memory database, used by unit tests across the crate.
pub fn open_in_memory() -> Result<Connection, KanbanError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> Result<(), KanbanError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}
