use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    /// User ids, in the order they joined. Loaded from `project_members`.
    #[sqlx(skip)]
    pub members: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct ProjectMember {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateProject {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct AddProjectMember {
    pub user_id: Uuid,
}

const PROJECT_COLUMNS: &str = "id, name, description, owner_id, created_at, updated_at";

impl Project {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let mut projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(pool)
        .await?;

        let memberships = sqlx::query_as::<_, ProjectMember>(
            "SELECT project_id, user_id, added_at FROM project_members ORDER BY added_at ASC, rowid ASC",
        )
        .fetch_all(pool)
        .await?;

        let mut by_project: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for membership in memberships {
            by_project
                .entry(membership.project_id)
                .or_default()
                .push(membership.user_id);
        }
        for project in &mut projects {
            project.members = by_project.remove(&project.id).unwrap_or_default();
        }

        Ok(projects)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        match project {
            Some(mut project) => {
                project.members = ProjectMember::user_ids(pool, id).await?;
                Ok(Some(project))
            }
            None => Ok(None),
        }
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateProject,
        project_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, Project>(&format!(
            r#"INSERT INTO projects (id, name, description, owner_id, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $5)
               RETURNING {PROJECT_COLUMNS}"#
        ))
        .bind(project_id)
        .bind(&data.name)
        .bind(data.description.as_deref())
        .bind(owner_id)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// Applies the fields present in `data`. Returns `None` when no such project exists.
    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(&format!(
            r#"UPDATE projects
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   updated_at = $4
               WHERE id = $1
               RETURNING {PROJECT_COLUMNS}"#
        ))
        .bind(id)
        .bind(data.name.as_deref())
        .bind(data.description.as_deref())
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        match project {
            Some(mut project) => {
                project.members = ProjectMember::user_ids(pool, id).await?;
                Ok(Some(project))
            }
            None => Ok(None),
        }
    }

    pub async fn count_owned_by(pool: &SqlitePool, owner_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Membership rows go with the project through `ON DELETE CASCADE`.
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

impl ProjectMember {
    pub async fn user_ids(pool: &SqlitePool, project_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"SELECT user_id
               FROM project_members
               WHERE project_id = $1
               ORDER BY added_at ASC, rowid ASC"#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Returns `false` when the user was already a member; nothing is written in that case.
    pub async fn add(pool: &SqlitePool, project_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"INSERT INTO project_members (project_id, user_id, added_at)
               VALUES ($1, $2, $3)
               ON CONFLICT(project_id, user_id) DO NOTHING"#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn remove<'e, E>(executor: E, project_id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
