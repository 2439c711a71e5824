pub mod commands;
pub mod init;
pub mod auth;
pub mod board;
pub mod task;
pub mod column;
pub mod drag;
pub mod config;

pub use commands::*;

use serde_json::Value;

use crate::board::{Board, NoticeLevel};
use crate::error::KanbanError;
use crate::output;
use crate::store::BoardStore;

pub(crate) fn emit_json(value: &Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Report a command error and return the exit code.
pub(crate) fn fail(e: &KanbanError, json_output: bool) -> i32 {
    if json_output {
        emit_json(&output::json::error(e));
    } else {
        eprintln!("Error: {}", e.message);
        for f in &e.fields {
            eprintln!("  {}: {}", f.field, f.message);
        }
    }
    1
}

/// Print the result of a board mutation along with its notices. A failed
/// write turns the exit code to 1.
pub(crate) fn finish<S: BoardStore>(
    board: &mut Board<S>,
    json_output: bool,
    data: Value,
    text: impl FnOnce(),
) -> i32 {
    let notices = board.take_notices();
    let failed = notices.iter().any(|n| n.level == NoticeLevel::Error);
    if json_output {
        emit_json(&output::json::success_with_notices(data, &notices));
    } else {
        if !failed {
            text();
        }
        output::text::print_notices(&notices);
    }
    if failed {
        1
    } else {
        0
    }
}
