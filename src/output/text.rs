use crate::board::{DropOutcome, DropReport, Notice, NoticeLevel};
use crate::models::{Column, Snapshot, Task, User};

pub fn print_user(u: &User) {
    println!("{} <{}> [{}]", u.display_name, u.email, u.initials());
    println!("  ID: {}", u.id);
}

pub fn print_task(t: &Task) {
    println!("Task: {} ({})", t.content, t.id);
    println!("  Status: {}", t.status);
    println!("  Order: {}", t.order_index);
    if let Some(ref desc) = t.description {
        println!("  Description: {desc}");
    }
    println!("  Created: {}", t.created_at);
    if let Some(ref updated) = t.updated_at {
        println!("  Updated: {updated}");
    }
    if !t.activities.is_empty() {
        println!("  Activity:");
        for a in &t.activities {
            println!("    - {a}");
        }
    }
}

pub fn print_task_list(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("  (empty)");
        return;
    }
    for t in tasks {
        println!(
            "  {}. {} ({})",
            t.order_index,
            t.content,
            &t.id[..std::cmp::min(8, t.id.len())]
        );
    }
}

pub fn print_columns(columns: &[&Column]) {
    for c in columns {
        let marker = if c.name.is_default() { " (default)" } else { "" };
        println!("  {} {}{}", c.order_index, c.name, marker);
    }
}

pub fn print_board(snapshot: &Snapshot) {
    for c in snapshot.ordered_columns() {
        let tasks = snapshot.tasks_in(&c.name);
        println!("[{}] {}", c.name, tasks.len());
        print_task_list(&tasks);
    }
}

pub fn print_drop(report: &DropReport) {
    match &report.outcome {
        DropOutcome::NoOp { reason } => println!("Nothing to do ({reason:?})"),
        DropOutcome::MovedAcross { task_id, from, to, order_index } => {
            println!("Moved {task_id}: {from} → {to} at position {order_index}")
        }
        DropOutcome::Reordered { status, order } => {
            println!("Reordered {status}: {}", order.join(", "))
        }
        DropOutcome::ColumnsReordered { order } => {
            let names: Vec<&str> = order.iter().map(|s| s.as_str()).collect();
            println!("Columns: {}", names.join(", "))
        }
    }
}

/// Success notices go to stdout, errors to stderr.
pub fn print_notices(notices: &[Notice]) {
    for n in notices {
        match n.level {
            NoticeLevel::Success => println!("{}", n.message),
            NoticeLevel::Error => eprintln!("Error: {}", n.message),
        }
    }
}
