use crate::models::{Column, ColumnPatch, Snapshot, Task, TaskPatch};

/// One record-level write against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    CreateTask(Task),
    UpdateTask { id: String, patch: TaskPatch },
    DeleteTask { id: String },
    CreateColumn(Column),
    UpdateColumn { name: String, patch: ColumnPatch },
    DeleteColumn { name: String },
}

impl Write {
    /// Mirror the write on a local snapshot. Used for optimistic updates before
    /// the store confirms; unknown targets are ignored.
    pub fn apply_to(&self, snapshot: &mut Snapshot) {
        match self {
            Self::CreateTask(task) => snapshot.tasks.push(task.clone()),
            Self::UpdateTask { id, patch } => {
                if let Some(task) = snapshot.task_mut(id) {
                    patch.apply_to(task);
                }
            }
            Self::DeleteTask { id } => snapshot.tasks.retain(|t| &t.id != id),
            Self::CreateColumn(column) => snapshot.columns.push(column.clone()),
            Self::UpdateColumn { name, patch } => {
                if let Some(column) = snapshot.columns.iter_mut().find(|c| c.name.as_str() == name) {
                    if let Some(order_index) = patch.order_index {
                        column.order_index = order_index;
                    }
                    if let Some(ref new_name) = patch.name {
                        column.name = new_name.clone();
                    }
                }
                if let Some(ref new_name) = patch.name {
                    for task in snapshot.tasks.iter_mut().filter(|t| t.status.as_str() == name) {
                        task.status = new_name.clone();
                    }
                }
            }
            Self::DeleteColumn { name } => snapshot.columns.retain(|c| c.name.as_str() != name),
        }
    }
}

/// Ordered group of writes committed all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: Vec<Write>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, write: Write) {
        self.writes.push(write);
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Write> {
        self.writes.iter()
    }

    /// Unwrap a batch holding exactly one write.
    pub fn into_single(mut self) -> Result<Write, WriteBatch> {
        if self.writes.len() == 1 {
            if let Some(write) = self.writes.pop() {
                return Ok(write);
            }
        }
        Err(self)
    }

    pub fn apply_to(&self, snapshot: &mut Snapshot) {
        for write in &self.writes {
            write.apply_to(snapshot);
        }
    }
}

impl From<Vec<Write>> for WriteBatch {
    fn from(writes: Vec<Write>) -> Self {
        Self { writes }
    }
}

impl From<Write> for WriteBatch {
    fn from(write: Write) -> Self {
        Self { writes: vec![write] }
    }
}

impl IntoIterator for WriteBatch {
    type Item = Write;
    type IntoIter = std::vec::IntoIter<Write>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}
