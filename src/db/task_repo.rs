use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

use crate::error::KanbanError;
use crate::models::{StatusKey, Task, TaskPatch};

const TASK_COLUMNS: &str =
    "id, owner_id, content, status, order_index, description, activities, created_at, updated_at";

pub fn insert_task(conn: &Connection, task: &Task) -> Result<(), KanbanError> {
    let activities = serde_json::to_string(&task.activities)?;
    conn.execute(
        "INSERT INTO tasks (id, owner_id, content, status, order_index, description, activities, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            task.id,
            task.owner_id,
            task.content,
            task.status.as_str(),
            task.order_index,
            task.description,
            activities,
            task.created_at,
            task.updated_at
        ],
    )?;
    Ok(())
}

pub fn list_tasks(conn: &Connection, owner_id: &str) -> Result<Vec<Task>, KanbanError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = ?1
         ORDER BY status ASC, order_index ASC, created_at ASC, id ASC"
    ))?;
    let tasks = stmt
        .query_map(params![owner_id], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Update the named fields of a task. Content-bearing changes stamp `updated_at`;
/// pure reindexing does not.
pub fn update_task(
    conn: &Connection,
    owner_id: &str,
    id: &str,
    patch: &TaskPatch,
) -> Result<(), KanbanError> {
    if patch.is_empty() {
        return Ok(());
    }

    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();
    if let Some(ref content) = patch.content {
        sets.push("content = ?");
        values.push(Value::Text(content.clone()));
    }
    if let Some(ref status) = patch.status {
        sets.push("status = ?");
        values.push(Value::Text(status.as_str().to_string()));
    }
    if let Some(order_index) = patch.order_index {
        sets.push("order_index = ?");
        values.push(Value::Integer(order_index));
    }
    if let Some(ref description) = patch.description {
        sets.push("description = ?");
        values.push(Value::Text(description.clone()));
    }
    if let Some(ref activities) = patch.activities {
        sets.push("activities = ?");
        values.push(Value::Text(serde_json::to_string(activities)?));
    }
    if patch.order_index.is_none() || sets.len() > 1 {
        sets.push("updated_at = ?");
        values.push(Value::Text(now()));
    }
    values.push(Value::Text(owner_id.to_string()));
    values.push(Value::Text(id.to_string()));

    let sql = format!(
        "UPDATE tasks SET {} WHERE owner_id = ? AND id = ?",
        sets.join(", ")
    );
    let changed = conn.execute(&sql, params_from_iter(values))?;
    if changed == 0 {
        return Err(KanbanError::task_not_found(id));
    }
    Ok(())
}

pub fn delete_task(conn: &Connection, owner_id: &str, id: &str) -> Result<(), KanbanError> {
    let changed = conn.execute(
        "DELETE FROM tasks WHERE owner_id = ?1 AND id = ?2",
        params![owner_id, id],
    )?;
    if changed == 0 {
        return Err(KanbanError::task_not_found(id));
    }
    Ok(())
}

pub fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let raw: String = row.get(6)?;
    let activities = serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Task {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        content: row.get(2)?,
        status: StatusKey::from_stored(&row.get::<_, String>(3)?),
        order_index: row.get(4)?,
        description: row.get(5)?,
        activities,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
