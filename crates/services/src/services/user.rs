//! User directory. A fixed demo user stands in for a real identity provider.

use chrono::Utc;
use db::models::{
    project::Project,
    user::{CreateUser, UpdateUser, User, UserRole},
};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

pub const DEMO_USER_ID: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440000);
pub const DEMO_USER_NAME: &str = "Demo User";
pub const DEMO_USER_EMAIL: &str = "demo@example.com";

#[derive(Debug, Error)]
pub enum UserServiceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Validation(String),
    #[error("user not found")]
    NotFound,
    #[error("user with this email already exists")]
    EmailTaken,
    #[error("user still owns {0} project(s)")]
    OwnsProjects(i64),
}

pub struct UserService;

impl UserService {
    /// Seed the demo user (role `lead`) if it is not there yet.
    pub async fn ensure_demo_user(pool: &SqlitePool) -> Result<User, UserServiceError> {
        let now = Utc::now();
        let demo = User {
            id: DEMO_USER_ID,
            username: DEMO_USER_NAME.to_string(),
            email: DEMO_USER_EMAIL.to_string(),
            role: UserRole::Lead,
            created_at: now,
            updated_at: now,
        };
        User::ensure_exists(pool, &demo).await?;
        Self::get(pool, DEMO_USER_ID).await
    }

    pub async fn create(pool: &SqlitePool, mut data: CreateUser) -> Result<User, UserServiceError> {
        data.username = required(&data.username, "username")?;
        data.email = valid_email(&data.email)?;

        if User::find_by_email(pool, &data.email).await?.is_some() {
            return Err(UserServiceError::EmailTaken);
        }

        let user = User::create(pool, &data, Uuid::new_v4())
            .await
            .map_err(unique_violation_as_email_taken)?;
        info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<User>, UserServiceError> {
        Ok(User::find_all(pool).await?)
    }

    pub async fn get(pool: &SqlitePool, user_id: Uuid) -> Result<User, UserServiceError> {
        User::find_by_id(pool, user_id)
            .await?
            .ok_or(UserServiceError::NotFound)
    }

    pub async fn update(
        pool: &SqlitePool,
        user_id: Uuid,
        mut patch: UpdateUser,
    ) -> Result<User, UserServiceError> {
        if let Some(username) = patch.username.as_deref() {
            patch.username = Some(required(username, "username")?);
        }
        if let Some(email) = patch.email.as_deref() {
            let email = valid_email(email)?;
            if let Some(existing) = User::find_by_email(pool, &email).await?
                && existing.id != user_id
            {
                return Err(UserServiceError::EmailTaken);
            }
            patch.email = Some(email);
        }

        User::update(pool, user_id, &patch)
            .await
            .map_err(unique_violation_as_email_taken)?
            .ok_or(UserServiceError::NotFound)
    }

    pub async fn delete(pool: &SqlitePool, user_id: Uuid) -> Result<(), UserServiceError> {
        if user_id == DEMO_USER_ID {
            return Err(UserServiceError::Validation(
                "the demo user cannot be deleted".to_string(),
            ));
        }
        let owned = Project::count_owned_by(pool, user_id).await?;
        if owned > 0 {
            return Err(UserServiceError::OwnsProjects(owned));
        }
        let rows = User::delete(pool, user_id)
            .await
            .map_err(|err| match err.as_database_error() {
                // A project was created for this user after the count above.
                Some(db_err) if db_err.is_foreign_key_violation() => {
                    UserServiceError::OwnsProjects(1)
                }
                _ => UserServiceError::Database(err),
            })?;
        if rows == 0 {
            return Err(UserServiceError::NotFound);
        }
        info!(user_id = %user_id, "User deleted");
        Ok(())
    }
}

fn required(value: &str, field: &str) -> Result<String, UserServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(UserServiceError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn valid_email(email: &str) -> Result<String, UserServiceError> {
    let email = required(email, "email")?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(UserServiceError::Validation(format!(
            "'{email}' is not a valid email address"
        ))),
    }
}

// Two concurrent creates can both pass the lookup; the unique index settles it.
fn unique_violation_as_email_taken(err: sqlx::Error) -> UserServiceError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => UserServiceError::EmailTaken,
        _ => UserServiceError::Database(err),
    }
}
