use serde_json::json;

use crate::cli::{emit_json, fail};
use crate::db::connection;
use crate::output;

pub fn run(json_output: bool) -> i32 {
    match connection::init_db() {
        Ok(path) => {
            tracing::info!(path = %path.display(), "board home initialized");
            if json_output {
                emit_json(&output::json::success(json!({ "path": path.to_string_lossy() })));
            } else {
                println!("Initialized kanban at {}", path.display());
            }
            0
        }
        Err(e) => fail(&e, json_output),
    }
}
