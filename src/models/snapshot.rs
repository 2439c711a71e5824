use serde::Serialize;

use super::{Column, StatusKey, Task};

/// Full view of one owner's board as delivered by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub columns: Vec<Column>,
    pub tasks: Vec<Task>,
}

impl Snapshot {
    /// Columns ordered left to right.
    pub fn ordered_columns(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.order_index);
        columns
    }

    /// Tasks of one column ordered top to bottom. Ties (stale or duplicate
    /// indices) fall back to creation time, then id.
    pub fn tasks_in(&self, status: &StatusKey) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.iter().filter(|t| &t.status == status).collect();
        tasks.sort_by(|a, b| {
            a.order_index
                .cmp(&b.order_index)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        tasks
    }

    pub fn count_in(&self, status: &StatusKey) -> usize {
        self.tasks.iter().filter(|t| &t.status == status).count()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.as_str() == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}
