//! Kanban task management.

use db::models::{
    task::{CreateTask, Task, TaskFilter, TaskPriority, TaskStatus},
    user::User,
};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TaskServiceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Validation(String),
    #[error("task not found")]
    NotFound,
    #[error("assignee not found")]
    AssigneeNotFound,
}

pub struct TaskService;

impl TaskService {
    pub async fn create(pool: &SqlitePool, mut data: CreateTask) -> Result<Task, TaskServiceError> {
        data.title = required_title(&data.title)?;
        Self::check_assignee(pool, data.assignee_id).await?;

        let task = Task::create(pool, &data, Uuid::new_v4()).await?;
        info!(
            task_id = %task.id,
            status = %task.status,
            priority = %task.priority,
            "Task created"
        );
        Ok(task)
    }

    pub async fn list(pool: &SqlitePool, filter: &TaskFilter) -> Result<Vec<Task>, TaskServiceError> {
        Ok(Task::find_all(pool, filter).await?)
    }

    pub async fn get(pool: &SqlitePool, task_id: Uuid) -> Result<Task, TaskServiceError> {
        Task::find_by_id(pool, task_id)
            .await?
            .ok_or(TaskServiceError::NotFound)
    }

    pub async fn update_status(
        pool: &SqlitePool,
        task_id: Uuid,
        status: TaskStatus,
    ) -> Result<Task, TaskServiceError> {
        let task = Task::update_status(pool, task_id, status)
            .await?
            .ok_or(TaskServiceError::NotFound)?;
        debug!(task_id = %task_id, status = %status, "Task moved");
        Ok(task)
    }

    pub async fn update_assignee(
        pool: &SqlitePool,
        task_id: Uuid,
        assignee_id: Option<Uuid>,
    ) -> Result<Task, TaskServiceError> {
        Self::check_assignee(pool, assignee_id).await?;
        Task::update_assignee(pool, task_id, assignee_id)
            .await?
            .ok_or(TaskServiceError::NotFound)
    }

    pub async fn update_priority(
        pool: &SqlitePool,
        task_id: Uuid,
        priority: TaskPriority,
    ) -> Result<Task, TaskServiceError> {
        Task::update_priority(pool, task_id, priority)
            .await?
            .ok_or(TaskServiceError::NotFound)
    }

    pub async fn update_title(
        pool: &SqlitePool,
        task_id: Uuid,
        title: &str,
    ) -> Result<Task, TaskServiceError> {
        let title = required_title(title)?;
        Task::update_title(pool, task_id, &title)
            .await?
            .ok_or(TaskServiceError::NotFound)
    }

    pub async fn update_description(
        pool: &SqlitePool,
        task_id: Uuid,
        description: Option<&str>,
    ) -> Result<Task, TaskServiceError> {
        Task::update_description(pool, task_id, description)
            .await?
            .ok_or(TaskServiceError::NotFound)
    }

    pub async fn delete(pool: &SqlitePool, task_id: Uuid) -> Result<(), TaskServiceError> {
        if Task::delete(pool, task_id).await? == 0 {
            return Err(TaskServiceError::NotFound);
        }
        info!(task_id = %task_id, "Task deleted");
        Ok(())
    }

    async fn check_assignee(
        pool: &SqlitePool,
        assignee_id: Option<Uuid>,
    ) -> Result<(), TaskServiceError> {
        if let Some(id) = assignee_id
            && !User::exists(pool, id).await?
        {
            return Err(TaskServiceError::AssigneeNotFound);
        }
        Ok(())
    }
}

fn required_title(title: &str) -> Result<String, TaskServiceError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskServiceError::Validation("task title is required".to_string()));
    }
    Ok(title.to_string())
}
