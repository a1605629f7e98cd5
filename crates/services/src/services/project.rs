//! Project CRUD and membership management.

use db::models::{
    project::{CreateProject, Project, ProjectMember, UpdateProject},
    user::User,
};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProjectServiceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Validation(String),
    #[error("project not found")]
    ProjectNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("user is not a member of this project")]
    MemberNotFound,
    #[error("user is already a member of this project")]
    AlreadyMember,
}

pub struct ProjectService;

impl ProjectService {
    pub async fn create(
        pool: &SqlitePool,
        owner_id: Uuid,
        mut data: CreateProject,
    ) -> Result<Project, ProjectServiceError> {
        data.name = required_name(Some(&data.name))?;

        let project = Project::create(pool, &data, Uuid::new_v4(), owner_id).await?;
        info!(project_id = %project.id, owner_id = %owner_id, "Project created");
        Ok(project)
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Project>, ProjectServiceError> {
        Ok(Project::find_all(pool).await?)
    }

    pub async fn get(pool: &SqlitePool, project_id: Uuid) -> Result<Project, ProjectServiceError> {
        Project::find_by_id(pool, project_id)
            .await?
            .ok_or(ProjectServiceError::ProjectNotFound)
    }

    pub async fn update(
        pool: &SqlitePool,
        project_id: Uuid,
        mut patch: UpdateProject,
    ) -> Result<Project, ProjectServiceError> {
        if patch.name.is_some() {
            patch.name = Some(required_name(patch.name.as_deref())?);
        }

        let project = Project::update(pool, project_id, &patch)
            .await?
            .ok_or(ProjectServiceError::ProjectNotFound)?;
        debug!(project_id = %project_id, "Project updated");
        Ok(project)
    }

    /// A second delete of the same id reports `ProjectNotFound`.
    pub async fn delete(pool: &SqlitePool, project_id: Uuid) -> Result<(), ProjectServiceError> {
        let rows = Project::delete(pool, project_id).await?;
        if rows == 0 {
            return Err(ProjectServiceError::ProjectNotFound);
        }
        info!(project_id = %project_id, "Project deleted");
        Ok(())
    }

    /// Duplicate adds fail with `AlreadyMember` and leave the member list untouched.
    pub async fn add_member(
        pool: &SqlitePool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Project, ProjectServiceError> {
        Self::get(pool, project_id).await?;
        if !User::exists(pool, user_id).await? {
            return Err(ProjectServiceError::UserNotFound);
        }

        if !ProjectMember::add(pool, project_id, user_id).await? {
            return Err(ProjectServiceError::AlreadyMember);
        }
        info!(project_id = %project_id, user_id = %user_id, "Project member added");

        Self::get(pool, project_id).await
    }

    /// Callers are expected to have passed the project-management policy check.
    pub async fn remove_member(
        pool: &SqlitePool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Project, ProjectServiceError> {
        Self::get(pool, project_id).await?;

        if ProjectMember::remove(pool, project_id, user_id).await? == 0 {
            return Err(ProjectServiceError::MemberNotFound);
        }
        info!(project_id = %project_id, user_id = %user_id, "Project member removed");

        Self::get(pool, project_id).await
    }
}

fn required_name(name: Option<&str>) -> Result<String, ProjectServiceError> {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(ProjectServiceError::Validation(
            "project name is required".to_string(),
        )),
    }
}
