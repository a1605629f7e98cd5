use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, QueryBuilder, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Kanban column a task sits in.
#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, Hash, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "task_status", rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
}

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, Hash, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee_id: Option<Uuid>, // Foreign key to User
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateTask {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

impl CreateTask {
    pub fn from_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: Some(TaskStatus::Todo),
            priority: None,
            assignee_id: None,
            due_date: None,
        }
    }
}

/// Optional list filters; unset fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct TaskFilter {
    pub assignee_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct UpdateTaskStatus {
    pub status: TaskStatus,
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct UpdateTaskAssignee {
    pub assignee_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct UpdateTaskPriority {
    pub priority: TaskPriority,
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct UpdateTaskTitle {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct UpdateTaskDescription {
    pub description: Option<String>,
}

const TASK_COLUMNS: &str =
    "id, title, description, status, priority, assignee_id, due_date, created_at, updated_at";

impl Task {
    pub async fn find_all(pool: &SqlitePool, filter: &TaskFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {TASK_COLUMNS} FROM tasks WHERE 1 = 1"));
        if let Some(assignee_id) = filter.assignee_id {
            query.push(" AND assignee_id = ").push_bind(assignee_id);
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(priority) = filter.priority {
            query.push(" AND priority = ").push_bind(priority);
        }
        query.push(" ORDER BY created_at ASC, rowid ASC");

        query.build_query_as::<Task>().fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateTask,
        task_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, Task>(&format!(
            r#"INSERT INTO tasks (id, title, description, status, priority, assignee_id, due_date, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
               RETURNING {TASK_COLUMNS}"#
        ))
        .bind(task_id)
        .bind(&data.title)
        .bind(data.description.as_deref())
        .bind(data.status.unwrap_or_default())
        .bind(data.priority.unwrap_or_default())
        .bind(data.assignee_id)
        .bind(data.due_date)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    pub async fn update_status(
        pool: &SqlitePool,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await
    }

    pub async fn update_priority(
        pool: &SqlitePool,
        id: Uuid,
        priority: TaskPriority,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET priority = $2, updated_at = $3 WHERE id = $1 RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(priority)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await
    }

    /// `None` unassigns the task.
    pub async fn update_assignee(
        pool: &SqlitePool,
        id: Uuid,
        assignee_id: Option<Uuid>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET assignee_id = $2, updated_at = $3 WHERE id = $1 RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(assignee_id)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await
    }

    pub async fn update_title(
        pool: &SqlitePool,
        id: Uuid,
        title: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET title = $2, updated_at = $3 WHERE id = $1 RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(title)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await
    }

    pub async fn update_description(
        pool: &SqlitePool,
        id: Uuid,
        description: Option<&str>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET description = $2, updated_at = $3 WHERE id = $1 RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(description)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
