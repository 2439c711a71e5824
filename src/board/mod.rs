//! The signed-in user's board.
//!
//! [`Board`] keeps an in-memory snapshot that is mutated optimistically before
//! each write reaches the store. Confirmed state arrives through the store
//! subscription and replaces the local copy; when a write fails the local copy
//! is reloaded from the store, so optimistic guesses never outlive a failure.

pub mod drag;
pub mod notice;
pub mod reconcile;

pub use drag::{DragItem, DragState};
pub use notice::{Notice, NoticeLevel, Notices};
pub use reconcile::{DropOutcome, NoOpReason, ReconcileOptions, Reconciliation};

use serde::Serialize;

use crate::db::task_repo;
use crate::error::KanbanError;
use crate::models::{Column, ColumnPatch, DefaultStatus, Snapshot, StatusKey, Task, TaskPatch, User};
use crate::store::{BoardStore, Subscription, Write, WriteBatch};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropReport {
    pub outcome: DropOutcome,
    /// False when the store rejected the resulting writes.
    pub persisted: bool,
}

pub struct Board<S: BoardStore> {
    store: S,
    owner: User,
    options: ReconcileOptions,
    snapshot: Snapshot,
    subscription: Subscription,
    notices: Notices,
    drag: DragState,
}

impl<S: BoardStore> Board<S> {
    /// Open the board for the signed-in user, creating any missing default column.
    pub fn open(store: S, user: Option<&User>, options: ReconcileOptions) -> Result<Self, KanbanError> {
        let owner = user.cloned().ok_or_else(KanbanError::not_authenticated)?;

        let current = store.snapshot(&owner.id)?;
        let defaults = missing_default_columns(&current, &owner.id);
        if !defaults.is_empty() {
            tracing::info!(owner = %owner.id, created = defaults.len(), "seeding default columns");
            store.commit(&owner.id, defaults)?;
        }

        let subscription = store.subscribe(&owner.id)?;
        let snapshot = match subscription.latest() {
            Some(snapshot) => snapshot,
            None => store.snapshot(&owner.id)?,
        };

        Ok(Self {
            store,
            owner,
            options,
            snapshot,
            subscription,
            notices: Notices::default(),
            drag: DragState::Idle,
        })
    }

    /// Tear down the live subscription.
    pub fn close(self) {
        tracing::debug!(owner = %self.owner.id, subscription = self.subscription.id(), "board closed");
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    pub fn columns(&self) -> Vec<&Column> {
        self.snapshot.ordered_columns()
    }

    pub fn tasks_in(&self, status: &StatusKey) -> Vec<&Task> {
        self.snapshot.tasks_in(status)
    }

    /// Look a task up by exact id, then by unique id prefix.
    pub fn task(&self, reference: &str) -> Result<&Task, KanbanError> {
        if let Some(task) = self.snapshot.task(reference) {
            return Ok(task);
        }
        let matches: Vec<&Task> = self
            .snapshot
            .tasks
            .iter()
            .filter(|t| t.id.starts_with(reference))
            .collect();
        match matches.as_slice() {
            [] => Err(KanbanError::task_not_found(reference)),
            [task] => Ok(task),
            _ => {
                let candidates: Vec<String> =
                    matches.iter().map(|t| format!("{} ({})", t.content, t.id)).collect();
                Err(KanbanError::ambiguous_ref(reference, &candidates))
            }
        }
    }

    /// Apply the most recent snapshot from the subscription, if one arrived.
    pub fn sync(&mut self) -> bool {
        match self.subscription.latest() {
            Some(snapshot) => {
                self.snapshot = snapshot;
                true
            }
            None => false,
        }
    }

    pub fn reload(&mut self) -> Result<(), KanbanError> {
        self.snapshot = self.store.snapshot(&self.owner.id)?;
        Ok(())
    }

    // --- tasks ---

    pub fn add_task(&mut self, content: &str, status: &StatusKey) -> Result<Task, KanbanError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(KanbanError::validation("Task content is required"));
        }
        if !self.snapshot.has_column(status.as_str()) {
            return Err(KanbanError::status_not_found(status.as_str()));
        }

        let (order_index, repairs) = reconcile::append_position(&self.snapshot, status);
        let task = Task {
            id: ulid::Ulid::new().to_string(),
            owner_id: self.owner.id.clone(),
            content: content.to_string(),
            status: status.clone(),
            order_index,
            description: None,
            activities: Vec::new(),
            created_at: task_repo::now(),
            updated_at: None,
        };
        let mut writes = WriteBatch::from(repairs);
        writes.push(Write::CreateTask(task.clone()));
        self.persist(writes, "Error adding task");
        Ok(task)
    }

    pub fn update_task_content(&mut self, reference: &str, content: &str) -> Result<Task, KanbanError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(KanbanError::validation("Task content is required"));
        }
        let patch = TaskPatch {
            content: Some(content.to_string()),
            ..TaskPatch::default()
        };
        self.patch_task(reference, patch)
    }

    pub fn set_description(&mut self, reference: &str, description: &str) -> Result<Task, KanbanError> {
        let patch = TaskPatch {
            description: Some(description.trim().to_string()),
            ..TaskPatch::default()
        };
        self.patch_task(reference, patch)
    }

    /// Append a comment to the task's activity list.
    pub fn add_activity(&mut self, reference: &str, text: &str) -> Result<Task, KanbanError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(KanbanError::validation("Comment is required"));
        }
        let mut activities = self.task(reference)?.activities.clone();
        activities.push(text.to_string());
        let patch = TaskPatch {
            activities: Some(activities),
            ..TaskPatch::default()
        };
        self.patch_task(reference, patch)
    }

    fn patch_task(&mut self, reference: &str, patch: TaskPatch) -> Result<Task, KanbanError> {
        let id = self.task(reference)?.id.clone();
        if self.persist(Write::UpdateTask { id: id.clone(), patch }.into(), "Error updating task") {
            self.notices.success("Task updated successfully");
        }
        self.task(&id).cloned()
    }

    pub fn delete_task(&mut self, reference: &str) -> Result<Task, KanbanError> {
        let task = self.task(reference)?.clone();
        if self.persist(Write::DeleteTask { id: task.id.clone() }.into(), "Error deleting task") {
            self.notices.success("Task deleted successfully");
        }
        Ok(task)
    }

    // --- columns ---

    pub fn add_column(&mut self, name: &str) -> Result<Column, KanbanError> {
        let key = StatusKey::parse(name)?;
        if self.snapshot.has_column(key.as_str()) {
            return Err(KanbanError::status_name_conflict());
        }
        let column = Column {
            name: key,
            order_index: next_column_index(&self.snapshot),
            owner_id: self.owner.id.clone(),
        };
        self.persist(Write::CreateColumn(column.clone()).into(), "Error adding status");
        Ok(column)
    }

    /// Rename a user-created column; its tasks follow in the same write.
    pub fn rename_column(&mut self, name: &str, new_name: &str) -> Result<Column, KanbanError> {
        let column = self
            .snapshot
            .column(name)
            .cloned()
            .ok_or_else(|| KanbanError::status_not_found(name))?;
        if column.name.is_default() {
            return Err(KanbanError::default_status_rename());
        }
        let new_key = StatusKey::parse(new_name)?;
        if new_key == column.name {
            return Ok(column);
        }
        if self.snapshot.has_column(new_key.as_str()) {
            return Err(KanbanError::status_name_conflict());
        }

        let write = Write::UpdateColumn {
            name: column.name.as_str().to_string(),
            patch: ColumnPatch {
                name: Some(new_key.clone()),
                ..ColumnPatch::default()
            },
        };
        if self.persist(write.into(), "Error renaming status") {
            self.notices.success("Status renamed successfully!");
        }
        Ok(Column {
            name: new_key,
            ..column
        })
    }

    /// Delete a user-created column together with every task in it.
    /// Returns the number of tasks removed.
    pub fn delete_column(&mut self, name: &str) -> Result<usize, KanbanError> {
        let column = self
            .snapshot
            .column(name)
            .ok_or_else(|| KanbanError::status_not_found(name))?;
        if column.name.is_default() {
            return Err(KanbanError::default_status_protected());
        }

        let mut writes = WriteBatch::new();
        for task in self.snapshot.tasks_in(&column.name) {
            writes.push(Write::DeleteTask { id: task.id.clone() });
        }
        let removed = writes.len();
        writes.push(Write::DeleteColumn {
            name: column.name.as_str().to_string(),
        });

        if self.persist(writes, "Error deleting status") {
            self.notices.success("Status deleted successfully!");
        }
        Ok(removed)
    }

    // --- drag and drop ---

    /// Begin dragging a task or column. Unknown ids leave the board idle.
    pub fn drag_start(&mut self, id: &str) -> Option<DragItem> {
        if !self.drag.is_idle() {
            self.drag_cancel();
        }
        let item = DragItem::resolve(&self.snapshot, id)?;
        self.drag = DragState::Dragging {
            item: item.clone(),
            base: self.snapshot.clone(),
        };
        Some(item)
    }

    /// Live preview while hovering: a task held over another column is shown
    /// at the bottom of that column. Nothing is written. Returns whether the
    /// visible board changed.
    pub fn drag_over(&mut self, over_id: &str) -> bool {
        let DragState::Dragging { item: DragItem::Task(ref task_id), .. } = self.drag else {
            return false;
        };
        let dest = match self.snapshot.task(over_id) {
            Some(over) => over.status.clone(),
            None => match self.snapshot.column(over_id) {
                Some(column) => column.name.clone(),
                None => return false,
            },
        };
        let order_index = self.snapshot.count_in(&dest) as i64;
        match self.snapshot.task_mut(task_id) {
            Some(task) if task.status != dest => {
                task.status = dest;
                task.order_index = order_index;
                true
            }
            _ => false,
        }
    }

    /// Finish the drag. The drop is reconciled against the board as it was at
    /// drag start, applied locally, then persisted. The board is idle afterwards
    /// whatever the outcome.
    pub fn drag_end(&mut self, over_id: Option<&str>) -> DropReport {
        let (item, base) = match std::mem::take(&mut self.drag) {
            DragState::Dragging { item, base } => (item, base),
            _ => {
                return DropReport {
                    outcome: DropOutcome::NoOp {
                        reason: NoOpReason::UnknownItem,
                    },
                    persisted: true,
                }
            }
        };
        self.drag = DragState::Reconciling { item: item.clone() };

        let reconciliation = reconcile::reconcile_drop(&base, item.id(), over_id, self.options);
        self.snapshot = base;
        let persisted = self.persist(reconciliation.writes, "Error during drag and drop");

        self.drag = DragState::Idle;
        DropReport {
            outcome: reconciliation.outcome,
            persisted,
        }
    }

    /// Abandon the drag and discard any hover preview.
    pub fn drag_cancel(&mut self) {
        if let DragState::Dragging { base, .. } = std::mem::take(&mut self.drag) {
            self.snapshot = base;
        }
    }

    /// Start and finish a drag in one step.
    pub fn drop_item(&mut self, active_id: &str, over_id: Option<&str>) -> DropReport {
        if self.drag_start(active_id).is_none() {
            return DropReport {
                outcome: DropOutcome::NoOp {
                    reason: NoOpReason::UnknownItem,
                },
                persisted: true,
            };
        }
        self.drag_end(over_id)
    }

    /// Apply writes locally, then send them to the store: a lone write as a
    /// single-record update, several as one atomic batch. On failure the error
    /// is logged, surfaced as a notice, and the local snapshot is reloaded.
    fn persist(&mut self, writes: WriteBatch, failure: &str) -> bool {
        if writes.is_empty() {
            return true;
        }
        writes.apply_to(&mut self.snapshot);

        let owner_id = self.owner.id.clone();
        let result = match writes.into_single() {
            Ok(write) => self.store.apply(&owner_id, write),
            Err(batch) => self.store.commit(&owner_id, batch),
        };

        match result {
            Ok(()) => {
                self.sync();
                true
            }
            Err(e) => {
                tracing::error!(owner = %owner_id, error = %e.message, "{failure}");
                self.notices.error(failure);
                self.sync();
                if let Err(reload) = self.reload() {
                    tracing::warn!(error = %reload.message, "could not reload board after failed write");
                }
                false
            }
        }
    }
}

/// One past the highest column index, so a new column always lands rightmost
/// even after deletions leave holes.
fn next_column_index(snapshot: &Snapshot) -> i64 {
    snapshot
        .columns
        .iter()
        .map(|c| c.order_index + 1)
        .max()
        .unwrap_or(0)
}

fn missing_default_columns(snapshot: &Snapshot, owner_id: &str) -> WriteBatch {
    let mut next_index = next_column_index(snapshot);
    let mut writes = WriteBatch::new();
    for default in DefaultStatus::ALL {
        if snapshot.has_column(default.as_str()) {
            continue;
        }
        writes.push(Write::CreateColumn(Column {
            name: default.into(),
            order_index: next_index,
            owner_id: owner_id.to_string(),
        }));
        next_index += 1;
    }
    writes
}
