use rusqlite::{params, Connection, OptionalExtension};

use crate::error::KanbanError;
use crate::models::User;

/// Stored credentials alongside the public user record.
pub struct Credentials {
    pub user: User,
    pub salt: String,
    pub hash: String,
}

pub fn insert_user(conn: &Connection, user: &User, salt: &str, hash: &str) -> Result<(), KanbanError> {
    if find_by_email(conn, &user.email)?.is_some() {
        return Err(KanbanError::email_taken(&user.email));
    }
    conn.execute(
        "INSERT INTO users (id, email, display_name, password_salt, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![user.id, user.email, user.display_name, salt, hash, user.created_at],
    )?;
    Ok(())
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<Credentials>, KanbanError> {
    let creds = conn
        .query_row(
            "SELECT id, email, display_name, created_at, password_salt, password_hash
             FROM users WHERE email = ?1",
            params![email],
            |row| {
                Ok(Credentials {
                    user: User {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        display_name: row.get(2)?,
                        created_at: row.get(3)?,
                    },
                    salt: row.get(4)?,
                    hash: row.get(5)?,
                })
            },
        )
        .optional()?;
    Ok(creds)
}

pub fn get_user(conn: &Connection, id: &str) -> Result<Option<User>, KanbanError> {
    let user = conn
        .query_row(
            "SELECT id, email, display_name, created_at FROM users WHERE id = ?1",
            params![id],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    display_name: row.get(2)?,
                    created_at: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}
