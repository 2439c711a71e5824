use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::KanbanError;

const MAX_STATUS_NAME_LEN: usize = 40;

/// The three columns every user owns. They can be reordered but never deleted or renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultStatus {
    ToDo,
    Doing,
    Done,
}

impl DefaultStatus {
    pub const ALL: [DefaultStatus; 3] = [Self::ToDo, Self::Doing, Self::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToDo => "to-do",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "to-do" => Some(Self::ToDo),
            "doing" => Some(Self::Doing),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// Column identifier. The column name doubles as its key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum StatusKey {
    Default(DefaultStatus),
    Custom(String),
}

impl StatusKey {
    /// Validate user input into a key. Surrounding whitespace is dropped.
    pub fn parse(name: &str) -> Result<Self, KanbanError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(KanbanError::validation("Status name is required"));
        }
        if name.chars().count() > MAX_STATUS_NAME_LEN {
            return Err(KanbanError::validation(format!(
                "Status name must be at most {MAX_STATUS_NAME_LEN} characters"
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(KanbanError::validation(
                "Status name must not contain control characters",
            ));
        }
        Ok(Self::from_stored(name))
    }

    /// Build a key from a name already persisted, without validation.
    pub fn from_stored(name: &str) -> Self {
        match DefaultStatus::from_str(name) {
            Some(d) => Self::Default(d),
            None => Self::Custom(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Default(d) => d.as_str(),
            Self::Custom(name) => name,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default(_))
    }
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<StatusKey> for String {
    fn from(key: StatusKey) -> Self {
        key.as_str().to_string()
    }
}

impl From<String> for StatusKey {
    fn from(s: String) -> Self {
        Self::from_stored(&s)
    }
}

impl From<DefaultStatus> for StatusKey {
    fn from(d: DefaultStatus) -> Self {
        Self::Default(d)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: StatusKey,
    pub order_index: i64,
    pub owner_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPatch {
    pub name: Option<StatusKey>,
    pub order_index: Option<i64>,
}
