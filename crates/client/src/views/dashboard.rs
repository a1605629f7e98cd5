use strum::IntoEnumIterator;
use uuid::Uuid;

use crate::{
    model::{Task, TaskStatus},
    stores::StatusCounts,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DashboardTab {
    Overview,
    #[default]
    Board,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatPanel {
    #[default]
    Hidden,
    Shown,
}

impl ChatPanel {
    pub fn toggled(self) -> Self {
        match self {
            ChatPanel::Hidden => ChatPanel::Shown,
            ChatPanel::Shown => ChatPanel::Hidden,
        }
    }
}

/// Local UI state of the dashboard page. Not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardState {
    pub tab: DashboardTab,
    pub chat: ChatPanel,
}

impl DashboardState {
    pub fn select_tab(&mut self, tab: DashboardTab) {
        self.tab = tab;
    }

    pub fn toggle_chat(&mut self) {
        self.chat = self.chat.toggled();
    }

    pub fn close_chat(&mut self) {
        self.chat = ChatPanel::Hidden;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total: usize,
    pub counts: StatusCounts,
    pub high_priority: usize,
    pub my_tasks: Vec<Task>,
    pub my_completed: usize,
}

impl DashboardStats {
    pub fn derive(tasks: &[Task], user_id: Uuid) -> Self {
        let my_tasks: Vec<Task> = tasks
            .iter()
            .filter(|t| t.assignee_id == Some(user_id))
            .cloned()
            .collect();
        let my_completed = my_tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Done)
            .count();

        Self {
            total: tasks.len(),
            counts: StatusCounts::tally(tasks),
            high_priority: tasks.iter().filter(|t| t.priority.is_high()).count(),
            my_tasks,
            my_completed,
        }
    }

    /// Share of my tasks that are done, in `0.0..=1.0`. Zero when I have none.
    pub fn my_progress(&self) -> f64 {
        if self.my_tasks.is_empty() {
            return 0.0;
        }
        self.my_completed as f64 / self.my_tasks.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardColumn {
    pub status: TaskStatus,
    pub title: &'static str,
    pub tasks: Vec<Task>,
}

/// One column per status, in board order; tasks keep their list order.
pub fn board_columns(tasks: &[Task]) -> Vec<BoardColumn> {
    TaskStatus::iter()
        .map(|status| BoardColumn {
            status,
            title: status.label(),
            tasks: tasks.iter().filter(|t| t.status == status).cloned().collect(),
        })
        .collect()
}
