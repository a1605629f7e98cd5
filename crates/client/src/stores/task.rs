use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::{
    model::{NewTask, Task, TaskPatch, TaskStatus},
    store::Store,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub review: usize,
    pub done: usize,
}

impl StatusCounts {
    pub fn tally<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut counts = Self::default();
        for task in tasks {
            *counts.slot(task.status) += 1;
        }
        counts
    }

    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Review => self.review,
            TaskStatus::Done => self.done,
        }
    }

    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.review + self.done
    }

    fn slot(&mut self, status: TaskStatus) -> &mut usize {
        match status {
            TaskStatus::Todo => &mut self.todo,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Review => &mut self.review,
            TaskStatus::Done => &mut self.done,
        }
    }
}

/// Ordered task list backing the board and dashboard.
#[derive(Debug, Default)]
pub struct TaskStore {
    state: Store<Vec<Task>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.snapshot()
    }

    pub fn get(&self, id: Uuid) -> Option<Task> {
        self.state.read(|tasks| tasks.iter().find(|t| t.id == id).cloned())
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Task>> {
        self.state.subscribe()
    }

    pub fn add_task(&self, input: NewTask) -> Uuid {
        let id = Uuid::new_v4();
        self.state.update(|tasks| {
            tasks.push(Task {
                id,
                title: input.title,
                description: input.description,
                status: input.status,
                priority: input.priority,
                assignee_id: input.assignee_id,
                due_date: input.due_date,
            });
            true
        });
        debug!(task_id = %id, "Task added");
        id
    }

    /// Drops a task into another column.
    pub fn move_task(&self, id: Uuid, status: TaskStatus) -> bool {
        self.state.update(|tasks| match tasks.iter_mut().find(|t| t.id == id) {
            Some(task) if task.status != status => {
                task.status = status;
                true
            }
            _ => false,
        })
    }

    pub fn update_task(&self, id: Uuid, patch: TaskPatch) -> bool {
        self.state.update(|tasks| match tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => patch.apply(task),
            None => false,
        })
    }

    pub fn remove_task(&self, id: Uuid) -> bool {
        self.state.update(|tasks| {
            let before = tasks.len();
            tasks.retain(|t| t.id != id);
            tasks.len() != before
        })
    }

    pub fn count_by_status(&self, status: TaskStatus) -> usize {
        self.state
            .read(|tasks| tasks.iter().filter(|t| t.status == status).count())
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.state.read(|tasks| StatusCounts::tally(tasks))
    }

    /// Tasks at `high` or `critical` priority.
    pub fn high_priority_count(&self) -> usize {
        self.state
            .read(|tasks| tasks.iter().filter(|t| t.priority.is_high()).count())
    }

    pub fn assigned_to(&self, user_id: Uuid) -> Vec<Task> {
        self.state.read(|tasks| {
            tasks
                .iter()
                .filter(|t| t.assignee_id == Some(user_id))
                .cloned()
                .collect()
        })
    }
}
