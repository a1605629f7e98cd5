use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Access level of a user. Leads may manage membership of projects they do not own.
#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserRole {
    #[default]
    Member,
    Lead,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

const USER_COLUMNS: &str = "id, username, email, role, created_at, updated_at";

impl User {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, rowid ASC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateUser,
        user_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO users (id, username, email, role, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $5)
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(user_id)
        .bind(&data.username)
        .bind(&data.email)
        .bind(data.role.unwrap_or_default())
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// Insert `user` unless a row with the same id already exists.
    pub async fn ensure_exists(pool: &SqlitePool, user: &User) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO users (id, username, email, role, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6)
               ON CONFLICT(id) DO NOTHING"#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Applies the fields present in `data`. Returns `None` when no such user exists.
    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"UPDATE users
               SET username = COALESCE($2, username),
                   email = COALESCE($3, email),
                   role = COALESCE($4, role),
                   updated_at = $5
               WHERE id = $1
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(id)
        .bind(data.username.as_deref())
        .bind(data.email.as_deref())
        .bind(data.role)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DBService;

    fn ann() -> CreateUser {
        CreateUser {
            username: "ann".to_string(),
            email: "ann@example.com".to_string(),
            role: None,
        }
    }

    #[tokio::test]
    async fn create_defaults_role_to_member() {
        let db = DBService::new_in_memory().await.unwrap();
        let user = User::create(&db.pool, &ann(), Uuid::new_v4()).await.unwrap();

        assert_eq!(user.role, UserRole::Member);
        let found = User::find_by_email(&db.pool, "ann@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn duplicate_email_violates_unique_constraint() {
        let db = DBService::new_in_memory().await.unwrap();
        User::create(&db.pool, &ann(), Uuid::new_v4()).await.unwrap();

        let err = User::create(&db.pool, &ann(), Uuid::new_v4()).await.unwrap_err();
        let unique = err
            .as_database_error()
            .map(|e| e.is_unique_violation())
            .unwrap_or(false);
        assert!(unique, "unexpected error: {err}");
    }

    #[tokio::test]
    async fn update_only_touches_given_fields() {
        let db = DBService::new_in_memory().await.unwrap();
        let user = User::create(&db.pool, &ann(), Uuid::new_v4()).await.unwrap();

        let patch = UpdateUser {
            role: Some(UserRole::Lead),
            ..Default::default()
        };
        let updated = User::update(&db.pool, user.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.role, UserRole::Lead);
        assert_eq!(updated.username, "ann");
        assert_eq!(updated.email, "ann@example.com");

        assert!(User::update(&db.pool, Uuid::new_v4(), &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ensure_exists_is_idempotent() {
        let db = DBService::new_in_memory().await.unwrap();
        let now = Utc::now();
        let demo = User {
            id: Uuid::new_v4(),
            username: "Demo User".to_string(),
            email: "demo@example.com".to_string(),
            role: UserRole::Lead,
            created_at: now,
            updated_at: now,
        };

        User::ensure_exists(&db.pool, &demo).await.unwrap();
        User::ensure_exists(&db.pool, &demo).await.unwrap();

        assert_eq!(User::find_all(&db.pool).await.unwrap().len(), 1);
    }
}
