use rusqlite::{params, Connection};

use crate::error::KanbanError;
use crate::models::{Column, ColumnPatch, StatusKey};

pub fn insert_status(conn: &Connection, column: &Column) -> Result<(), KanbanError> {
    conn.execute(
        "INSERT INTO statuses (owner_id, name, order_index) VALUES (?1, ?2, ?3)",
        params![column.owner_id, column.name.as_str(), column.order_index],
    )
    .map_err(name_conflict)?;
    Ok(())
}

fn name_conflict(e: rusqlite::Error) -> KanbanError {
    match e {
        rusqlite::Error::SqliteFailure(ref err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            KanbanError::status_name_conflict()
        }
        _ => KanbanError::from(e),
    }
}

pub fn list_statuses(conn: &Connection, owner_id: &str) -> Result<Vec<Column>, KanbanError> {
    let mut stmt = conn.prepare(
        "SELECT owner_id, name, order_index FROM statuses WHERE owner_id = ?1
         ORDER BY order_index ASC, name ASC",
    )?;
    let columns = stmt
        .query_map(params![owner_id], |row| {
            Ok(Column {
                owner_id: row.get(0)?,
                name: StatusKey::from_stored(&row.get::<_, String>(1)?),
                order_index: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Rename and/or reposition a column. A rename also moves every task of the column.
pub fn update_status(
    conn: &Connection,
    owner_id: &str,
    name: &str,
    patch: &ColumnPatch,
) -> Result<(), KanbanError> {
    if let Some(order_index) = patch.order_index {
        let changed = conn.execute(
            "UPDATE statuses SET order_index = ?1 WHERE owner_id = ?2 AND name = ?3",
            params![order_index, owner_id, name],
        )?;
        if changed == 0 {
            return Err(KanbanError::status_not_found(name));
        }
    }
    if let Some(ref new_name) = patch.name {
        let changed = conn.execute(
            "UPDATE statuses SET name = ?1 WHERE owner_id = ?2 AND name = ?3",
            params![new_name.as_str(), owner_id, name],
        )
        .map_err(name_conflict)?;
        if changed == 0 {
            return Err(KanbanError::status_not_found(name));
        }
        conn.execute(
            "UPDATE tasks SET status = ?1 WHERE owner_id = ?2 AND status = ?3",
            params![new_name.as_str(), owner_id, name],
        )?;
    }
    Ok(())
}

pub fn delete_status(conn: &Connection, owner_id: &str, name: &str) -> Result<(), KanbanError> {
    let changed = conn.execute(
        "DELETE FROM statuses WHERE owner_id = ?1 AND name = ?2",
        params![owner_id, name],
    )?;
    if changed == 0 {
        return Err(KanbanError::status_not_found(name));
    }
    Ok(())
}
