use crate::app::AppContext;
use crate::cli::{emit_json, fail};
use crate::error::KanbanError;
use crate::output;

pub fn run(json_output: bool) -> i32 {
    match run_inner(json_output) {
        Ok(code) => code,
        Err(e) => fail(&e, json_output),
    }
}

fn run_inner(json_output: bool) -> Result<i32, KanbanError> {
    let ctx = AppContext::open()?;
    let board = ctx.board()?;
    if json_output {
        emit_json(&output::json::success(output::json::board_json(board.snapshot())));
    } else {
        output::text::print_board(board.snapshot());
    }
    board.close();
    Ok(0)
}
