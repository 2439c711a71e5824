use crate::app::AppContext;
use crate::cli::{fail, finish};
use crate::error::KanbanError;
use crate::output;

pub fn run(active: &str, over: Option<&str>, json_output: bool) -> i32 {
    match run_inner(active, over, json_output) {
        Ok(code) => code,
        Err(e) => fail(&e, json_output),
    }
}

fn run_inner(active: &str, over: Option<&str>, json_output: bool) -> Result<i32, KanbanError> {
    let ctx = AppContext::open()?;
    let mut board = ctx.board()?;

    // Task ids may be given as prefixes; column names are matched as typed.
    let active_id = resolve_id(&board, active);
    let over_id = over.map(|o| resolve_id(&board, o));

    let report = board.drop_item(&active_id, over_id.as_deref());
    let data = output::json::drop_json(&report);
    let code = finish(&mut board, json_output, data, || output::text::print_drop(&report));

    board.close();
    Ok(code)
}

fn resolve_id<S: crate::store::BoardStore>(board: &crate::board::Board<S>, reference: &str) -> String {
    if board.snapshot().has_column(reference.trim()) {
        return reference.trim().to_string();
    }
    match board.task(reference) {
        Ok(task) => task.id.clone(),
        Err(_) => reference.to_string(),
    }
}
