use serde::Serialize;

use crate::models::{Snapshot, StatusKey};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DragItem {
    Task(String),
    Column(StatusKey),
}

impl DragItem {
    /// Classify a dragged identifier. Column names win over task ids.
    pub fn resolve(snapshot: &Snapshot, id: &str) -> Option<Self> {
        if let Some(column) = snapshot.column(id) {
            return Some(Self::Column(column.name.clone()));
        }
        snapshot.task(id).map(|t| Self::Task(t.id.clone()))
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Task(id) => id,
            Self::Column(name) => name.as_str(),
        }
    }
}

/// idle → dragging → (idle | reconciling → idle)
#[derive(Debug, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// `base` is the board as it was when the drag began; hover previews only
    /// touch the visible snapshot.
    Dragging { item: DragItem, base: Snapshot },
    Reconciling { item: DragItem },
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn item(&self) -> Option<&DragItem> {
        match self {
            Self::Idle => None,
            Self::Dragging { item, .. } | Self::Reconciling { item } => Some(item),
        }
    }
}
