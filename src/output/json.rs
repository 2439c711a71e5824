use serde_json::{json, Value};

use crate::board::{DropReport, Notice};
use crate::error::KanbanError;
use crate::models::{Column, Snapshot, Task, User};

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

/// Success envelope that also carries the notices raised by the command.
/// A failed write flips `success` to false.
pub fn success_with_notices(data: Value, notices: &[Notice]) -> Value {
    let failed = notices
        .iter()
        .any(|n| n.level == crate::board::NoticeLevel::Error);
    json!({
        "success": !failed,
        "notices": notices,
        "data": data
    })
}

pub fn error(err: &KanbanError) -> Value {
    let mut error = json!({
        "code": err.code.as_str(),
        "message": err.message
    });
    if !err.fields.is_empty() {
        error["fields"] = json!(err.fields);
    }
    json!({
        "success": false,
        "error": error
    })
}

pub fn user_json(u: &User) -> Value {
    json!({
        "id": u.id,
        "email": u.email,
        "display_name": u.display_name,
        "initials": u.initials(),
        "created_at": u.created_at
    })
}

pub fn task_summary(t: &Task) -> Value {
    json!({
        "id": t.id,
        "content": t.content,
        "status": t.status.as_str(),
        "order_index": t.order_index
    })
}

pub fn task_detail(t: &Task) -> Value {
    json!({
        "id": t.id,
        "content": t.content,
        "status": t.status.as_str(),
        "order_index": t.order_index,
        "description": t.description,
        "activities": t.activities,
        "created_at": t.created_at,
        "updated_at": t.updated_at
    })
}

pub fn column_json(c: &Column, task_count: usize) -> Value {
    json!({
        "name": c.name.as_str(),
        "order_index": c.order_index,
        "default": c.name.is_default(),
        "task_count": task_count
    })
}

pub fn board_json(snapshot: &Snapshot) -> Value {
    let columns: Vec<Value> = snapshot
        .ordered_columns()
        .into_iter()
        .map(|c| {
            let tasks: Vec<Value> = snapshot.tasks_in(&c.name).into_iter().map(task_summary).collect();
            let mut v = column_json(c, tasks.len());
            v["tasks"] = json!(tasks);
            v
        })
        .collect();
    json!({ "columns": columns })
}

pub fn drop_json(report: &DropReport) -> Value {
    json!({
        "outcome": report.outcome,
        "persisted": report.persisted
    })
}
