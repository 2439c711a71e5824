use serde_json::json;

use crate::app::AppContext;
use crate::cli::{emit_json, fail, finish, ColumnCommands};
use crate::error::KanbanError;
use crate::output;

pub fn run(cmd: ColumnCommands, json_output: bool) -> i32 {
    match run_inner(cmd, json_output) {
        Ok(code) => code,
        Err(e) => fail(&e, json_output),
    }
}

fn run_inner(cmd: ColumnCommands, json_output: bool) -> Result<i32, KanbanError> {
    let ctx = AppContext::open()?;
    let mut board = ctx.board()?;

    let code = match cmd {
        ColumnCommands::Add { name } => {
            let column = board.add_column(&name)?;
            let data = json!({ "column": output::json::column_json(&column, 0) });
            finish(&mut board, json_output, data, || {
                println!("Added column: {} (position {})", column.name, column.order_index);
            })
        }
        ColumnCommands::List => {
            let columns = board.columns();
            if json_output {
                let items: Vec<_> = columns
                    .iter()
                    .map(|c| output::json::column_json(c, board.snapshot().count_in(&c.name)))
                    .collect();
                emit_json(&output::json::success(json!({ "columns": items })));
            } else {
                output::text::print_columns(&columns);
            }
            0
        }
        ColumnCommands::Rename { name, new_name } => {
            let column = board.rename_column(&name, &new_name)?;
            let count = board.snapshot().count_in(&column.name);
            let data = json!({ "column": output::json::column_json(&column, count) });
            finish(&mut board, json_output, data, || {})
        }
        ColumnCommands::Delete { name } => {
            let removed = board.delete_column(&name)?;
            let data = json!({ "deleted": name.trim(), "tasks_removed": removed });
            finish(&mut board, json_output, data, || {
                if removed > 0 {
                    println!("Removed {removed} task(s)");
                }
            })
        }
    };

    board.close();
    Ok(code)
}
