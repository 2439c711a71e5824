use serde::{Deserialize, Serialize};

use super::StatusKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub owner_id: String,
    pub content: String,
    pub status: StatusKey,
    pub order_index: i64,
    pub description: Option<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Named fields to change on a task record. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub content: Option<String>,
    pub status: Option<StatusKey>,
    pub order_index: Option<i64>,
    pub description: Option<String>,
    pub activities: Option<Vec<String>>,
}

impl TaskPatch {
    pub fn order_index(order_index: i64) -> Self {
        Self {
            order_index: Some(order_index),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to an in-memory copy, mirroring what the store does.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(ref content) = self.content {
            task.content = content.clone();
        }
        if let Some(ref status) = self.status {
            task.status = status.clone();
        }
        if let Some(order_index) = self.order_index {
            task.order_index = order_index;
        }
        if let Some(ref description) = self.description {
            task.description = Some(description.clone());
        }
        if let Some(ref activities) = self.activities {
            task.activities = activities.clone();
        }
    }
}
