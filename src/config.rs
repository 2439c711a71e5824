use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::KanbanError;

/// Contents of `.kanban/config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// User id of the signed-in session, if any.
    #[serde(default)]
    pub session_user_id: Option<String>,

    /// Renumber the source column when a task moves to another column.
    #[serde(default)]
    pub compact_source_on_move: bool,
}

impl Config {
    /// Load the config, treating a missing file as defaults.
    pub fn load(path: &Path) -> Result<Self, KanbanError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| KanbanError::validation(format!("Invalid config {}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<(), KanbanError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
