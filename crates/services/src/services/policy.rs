//! Server-side access policy.
//!
//! Decisions are made from the stored user record only; nothing the client
//! holds (such as a locally toggled role) is consulted.

use db::models::{
    project::Project,
    user::{UpdateUser, User, UserRole},
};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("missing caller identity")]
    MissingIdentity,
    #[error("malformed caller identity: {0}")]
    InvalidIdentity(String),
    #[error("unknown caller")]
    UnknownCaller,
    #[error("{0}")]
    Forbidden(String),
}

pub struct AccessPolicy;

impl AccessPolicy {
    /// Resolve the user a request acts as.
    ///
    /// `claimed` is the raw identity presented by the caller. When it is
    /// absent, `fallback` (the demo user, if enabled) is used instead.
    pub async fn resolve_caller(
        pool: &SqlitePool,
        claimed: Option<&str>,
        fallback: Option<Uuid>,
    ) -> Result<User, PolicyError> {
        let user_id = match claimed.map(str::trim) {
            Some(raw) => Uuid::parse_str(raw)
                .map_err(|_| PolicyError::InvalidIdentity(raw.to_string()))?,
            None => fallback.ok_or(PolicyError::MissingIdentity)?,
        };

        User::find_by_id(pool, user_id).await?.ok_or_else(|| {
            warn!(user_id = %user_id, "Rejected request from unknown caller");
            PolicyError::UnknownCaller
        })
    }

    /// Owners manage their own projects; leads manage any project.
    pub fn can_manage_project(caller: &User, project: &Project) -> bool {
        caller.id == project.owner_id || caller.role == UserRole::Lead
    }

    /// Guards project updates, deletion and membership changes.
    pub fn authorize_project_management(caller: &User, project: &Project) -> Result<(), PolicyError> {
        if Self::can_manage_project(caller, project) {
            return Ok(());
        }
        warn!(
            user_id = %caller.id,
            project_id = %project.id,
            "Project management denied"
        );
        Err(PolicyError::Forbidden(
            "only the project owner or a lead may manage this project".to_string(),
        ))
    }

    /// Creating and deleting users is reserved for leads.
    pub fn authorize_user_admin(caller: &User) -> Result<(), PolicyError> {
        if caller.role == UserRole::Lead {
            return Ok(());
        }
        warn!(user_id = %caller.id, "User administration denied");
        Err(PolicyError::Forbidden(
            "only a lead may manage users".to_string(),
        ))
    }

    /// Users may edit their own profile but not their own role; leads may edit anyone.
    pub fn authorize_user_update(
        caller: &User,
        target_id: Uuid,
        patch: &UpdateUser,
    ) -> Result<(), PolicyError> {
        if caller.role == UserRole::Lead {
            return Ok(());
        }
        if caller.id != target_id {
            return Err(PolicyError::Forbidden(
                "only a lead may edit other users".to_string(),
            ));
        }
        match patch.role {
            Some(role) if role != caller.role => Err(PolicyError::Forbidden(
                "only a lead may change roles".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
