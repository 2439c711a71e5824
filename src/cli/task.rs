use serde_json::json;

use crate::app::AppContext;
use crate::cli::{emit_json, fail, finish, TaskCommands};
use crate::error::KanbanError;
use crate::models::StatusKey;
use crate::output;

pub fn run(cmd: TaskCommands, json_output: bool) -> i32 {
    match run_inner(cmd, json_output) {
        Ok(code) => code,
        Err(e) => fail(&e, json_output),
    }
}

fn run_inner(cmd: TaskCommands, json_output: bool) -> Result<i32, KanbanError> {
    let ctx = AppContext::open()?;
    let mut board = ctx.board()?;

    let code = match cmd {
        TaskCommands::Add { content, status } => {
            let status = StatusKey::parse(&status)?;
            let task = board.add_task(&content, &status)?;
            let data = json!({ "task": output::json::task_summary(&task) });
            finish(&mut board, json_output, data, || {
                println!("Added task: {} ({})", task.content, task.id);
                println!("  Status: {}  Order: {}", task.status, task.order_index);
            })
        }
        TaskCommands::List { status } => {
            let tasks = match status {
                Some(s) => {
                    let key = StatusKey::parse(&s)?;
                    if !board.snapshot().has_column(key.as_str()) {
                        return Err(KanbanError::status_not_found(key.as_str()));
                    }
                    board.tasks_in(&key)
                }
                None => board
                    .columns()
                    .into_iter()
                    .flat_map(|c| board.tasks_in(&c.name))
                    .collect(),
            };
            if json_output {
                let items: Vec<_> = tasks.iter().map(|t| output::json::task_summary(t)).collect();
                emit_json(&output::json::success(json!({ "tasks": items })));
            } else {
                output::text::print_task_list(&tasks);
            }
            0
        }
        TaskCommands::Show { id } => {
            let task = board.task(&id)?;
            if json_output {
                emit_json(&output::json::success(json!({ "task": output::json::task_detail(task) })));
            } else {
                output::text::print_task(task);
            }
            0
        }
        TaskCommands::Edit { id, content } => {
            let task = board.update_task_content(&id, &content)?;
            let data = json!({ "task": output::json::task_detail(&task) });
            finish(&mut board, json_output, data, || {})
        }
        TaskCommands::Describe { id, text } => {
            let task = board.set_description(&id, &text)?;
            let data = json!({ "task": output::json::task_detail(&task) });
            finish(&mut board, json_output, data, || {})
        }
        TaskCommands::Comment { id, text } => {
            let task = board.add_activity(&id, &text)?;
            let data = json!({ "task": output::json::task_detail(&task) });
            finish(&mut board, json_output, data, || {})
        }
        TaskCommands::Delete { id } => {
            let task = board.delete_task(&id)?;
            let data = json!({ "deleted": task.id });
            finish(&mut board, json_output, data, || {})
        }
    };

    board.close();
    Ok(code)
}
