//! Drop reconciliation.
//!
//! Given the board as it stood when a drag began and the drop target, work out
//! where the dragged task or column ends up and which records must be written.
//! Nothing here touches the store; [`Reconciliation::writes`] is applied by the
//! caller, optimistically on the local snapshot and then against the store.

use serde::Serialize;

use crate::models::{ColumnPatch, Snapshot, StatusKey, Task, TaskPatch};
use crate::store::{Write, WriteBatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpReason {
    /// Dropped outside any target.
    NoTarget,
    UnknownItem,
    UnknownTarget,
    SamePosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DropOutcome {
    NoOp {
        reason: NoOpReason,
    },
    MovedAcross {
        task_id: String,
        from: StatusKey,
        to: StatusKey,
        order_index: i64,
    },
    Reordered {
        status: StatusKey,
        order: Vec<String>,
    },
    ColumnsReordered {
        order: Vec<StatusKey>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub outcome: DropOutcome,
    pub writes: WriteBatch,
}

impl Reconciliation {
    fn noop(reason: NoOpReason) -> Self {
        Self {
            outcome: DropOutcome::NoOp { reason },
            writes: WriteBatch::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Renumber the source column after a cross-column move instead of leaving a gap.
    pub compact_source: bool,
}

/// Dispatch on what is being dragged: a known column name takes the column path,
/// anything else the task path.
pub fn reconcile_drop(
    snapshot: &Snapshot,
    active_id: &str,
    over_id: Option<&str>,
    options: ReconcileOptions,
) -> Reconciliation {
    if snapshot.has_column(active_id) {
        reconcile_column_drop(snapshot, active_id, over_id)
    } else {
        reconcile_task_drop(snapshot, active_id, over_id, options)
    }
}

pub fn reconcile_task_drop(
    snapshot: &Snapshot,
    active_id: &str,
    over_id: Option<&str>,
    options: ReconcileOptions,
) -> Reconciliation {
    let Some(active) = snapshot.task(active_id) else {
        return Reconciliation::noop(NoOpReason::UnknownItem);
    };
    let Some(over_id) = over_id else {
        return Reconciliation::noop(NoOpReason::NoTarget);
    };
    if over_id == active.id {
        return Reconciliation::noop(NoOpReason::SamePosition);
    }

    if let Some(over) = snapshot.task(over_id) {
        if over.status != active.status {
            return move_across(snapshot, active, &over.status, options);
        }
        let column = snapshot.tasks_in(&active.status);
        let to = column.iter().position(|t| t.id == over.id).unwrap_or(column.len());
        return reorder_within(snapshot, active, to);
    }

    if let Some(column) = snapshot.column(over_id) {
        if column.name != active.status {
            return move_across(snapshot, active, &column.name, options);
        }
        // Dropped on its own column's container: send it to the bottom.
        let last = snapshot.count_in(&active.status).saturating_sub(1);
        return reorder_within(snapshot, active, last);
    }

    Reconciliation::noop(NoOpReason::UnknownTarget)
}

fn move_across(
    snapshot: &Snapshot,
    active: &Task,
    dest: &StatusKey,
    options: ReconcileOptions,
) -> Reconciliation {
    let (order_index, repairs) = append_position(snapshot, dest);
    let mut writes = WriteBatch::from(repairs);
    writes.push(Write::UpdateTask {
        id: active.id.clone(),
        patch: TaskPatch {
            status: Some(dest.clone()),
            order_index: Some(order_index),
            ..TaskPatch::default()
        },
    });

    let remaining: Vec<&Task> = snapshot
        .tasks_in(&active.status)
        .into_iter()
        .filter(|t| t.id != active.id)
        .collect();
    if options.compact_source {
        for write in renumber_tasks(&remaining) {
            writes.push(write);
        }
    } else if has_gaps(&remaining) {
        tracing::debug!(column = %active.status, "source column left with a gap");
    }

    tracing::debug!(task = %active.id, from = %active.status, to = %dest, order_index, "cross-column move");
    Reconciliation {
        outcome: DropOutcome::MovedAcross {
            task_id: active.id.clone(),
            from: active.status.clone(),
            to: dest.clone(),
            order_index,
        },
        writes,
    }
}

fn reorder_within(snapshot: &Snapshot, active: &Task, to: usize) -> Reconciliation {
    let mut column = snapshot.tasks_in(&active.status);
    let Some(from) = column.iter().position(|t| t.id == active.id) else {
        return Reconciliation::noop(NoOpReason::UnknownItem);
    };
    let moved = column.remove(from);
    column.insert(to.min(column.len()), moved);

    let writes = WriteBatch::from(renumber_tasks(&column));
    if writes.is_empty() {
        return Reconciliation::noop(NoOpReason::SamePosition);
    }

    tracing::debug!(task = %active.id, column = %active.status, from, to, changed = writes.len(), "same-column reorder");
    Reconciliation {
        outcome: DropOutcome::Reordered {
            status: active.status.clone(),
            order: column.iter().map(|t| t.id.clone()).collect(),
        },
        writes,
    }
}

/// Index every task by its position, emitting writes only for changed indices.
fn renumber_tasks(tasks: &[&Task]) -> Vec<Write> {
    tasks
        .iter()
        .enumerate()
        .filter(|(i, t)| t.order_index != *i as i64)
        .map(|(i, t)| Write::UpdateTask {
            id: t.id.clone(),
            patch: TaskPatch::order_index(i as i64),
        })
        .collect()
}

/// Position for a task appended to `dest`: the column's task count. A column
/// left with gaps or duplicate indices is renumbered first so the count is
/// past every index in use.
pub(crate) fn append_position(snapshot: &Snapshot, dest: &StatusKey) -> (i64, Vec<Write>) {
    let column = snapshot.tasks_in(dest);
    let repairs = renumber_tasks(&column);
    if !repairs.is_empty() {
        tracing::debug!(column = %dest, changed = repairs.len(), "renumbering destination column");
    }
    (column.len() as i64, repairs)
}

fn has_gaps(tasks: &[&Task]) -> bool {
    tasks.iter().enumerate().any(|(i, t)| t.order_index != i as i64)
}

/// Move a column to the target's position. A task target stands for the column it sits in.
pub fn reconcile_column_drop(
    snapshot: &Snapshot,
    active_name: &str,
    over_id: Option<&str>,
) -> Reconciliation {
    let columns = snapshot.ordered_columns();
    let Some(from) = columns.iter().position(|c| c.name.as_str() == active_name) else {
        return Reconciliation::noop(NoOpReason::UnknownItem);
    };
    let Some(over_id) = over_id else {
        return Reconciliation::noop(NoOpReason::NoTarget);
    };

    let target = if snapshot.has_column(over_id) {
        over_id
    } else if let Some(task) = snapshot.task(over_id) {
        task.status.as_str()
    } else {
        return Reconciliation::noop(NoOpReason::UnknownTarget);
    };
    let Some(to) = columns.iter().position(|c| c.name.as_str() == target) else {
        return Reconciliation::noop(NoOpReason::UnknownTarget);
    };
    if from == to {
        return Reconciliation::noop(NoOpReason::SamePosition);
    }

    let mut order = columns;
    let moved = order.remove(from);
    order.insert(to, moved);

    let mut writes = WriteBatch::new();
    for (i, column) in order.iter().enumerate() {
        if column.order_index != i as i64 {
            writes.push(Write::UpdateColumn {
                name: column.name.as_str().to_string(),
                patch: ColumnPatch {
                    order_index: Some(i as i64),
                    ..ColumnPatch::default()
                },
            });
        }
    }

    tracing::debug!(column = active_name, from, to, changed = writes.len(), "column reorder");
    Reconciliation {
        outcome: DropOutcome::ColumnsReordered {
            order: order.iter().map(|c| c.name.clone()).collect(),
        },
        writes,
    }
}
