use serde_json::json;

use crate::cli::{emit_json, fail, ConfigCommands, ConfigOption};
use crate::config::Config;
use crate::db::connection;
use crate::error::KanbanError;
use crate::output;

pub fn run(cmd: ConfigCommands, json_output: bool) -> i32 {
    match run_inner(cmd, json_output) {
        Ok(code) => code,
        Err(e) => fail(&e, json_output),
    }
}

fn run_inner(cmd: ConfigCommands, json_output: bool) -> Result<i32, KanbanError> {
    let path = connection::config_path()?;
    let mut config = Config::load(&path)?;

    if let ConfigCommands::Set { option } = cmd {
        match option {
            ConfigOption::CompactSourceOnMove { enabled } => {
                config.compact_source_on_move = enabled;
            }
        }
        config.save(&path)?;
        tracing::info!(compact_source_on_move = config.compact_source_on_move, "config updated");
    }

    if json_output {
        emit_json(&output::json::success(json!({
            "compact_source_on_move": config.compact_source_on_move,
            "signed_in": config.session_user_id.is_some()
        })));
    } else {
        println!("compact-source-on-move: {}", config.compact_source_on_move);
    }
    Ok(0)
}
