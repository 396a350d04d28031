//! PostgreSQL implementation of the user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewUser, Role, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

const USER_COLUMNS: &str =
    "id, username, full_name, email, password_hash, role, post_ids, external_id, created_at";

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    full_name: String,
    email: String,
    password_hash: String,
    role: String,
    post_ids: Vec<i64>,
    external_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let role = r.role.parse::<Role>().map_err(AppError::persistence)?;
        Ok(User {
            id: r.id,
            username: r.username,
            full_name: r.full_name,
            email: r.email,
            password_hash: r.password_hash,
            role,
            post_ids: r.post_ids,
            external_id: r.external_id,
            created_at: r.created_at,
        })
    }
}

/// PostgreSQL repository for users.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let row: UserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (username, full_name, email, password_hash, role, external_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.username)
        .bind(&new_user.full_name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.role.as_str())
        .bind(&new_user.external_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(self.pool.as_ref())
                .await?;

        row.map(User::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(self.pool.as_ref())
                .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update_credentials(
        &self,
        id: i64,
        password_hash: String,
        role: Role,
    ) -> Result<User, AppError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "UPDATE users SET password_hash = $2, role = $3 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))?
            .try_into()
    }
}
