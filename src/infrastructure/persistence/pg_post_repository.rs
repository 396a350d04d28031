//! PostgreSQL implementation of the post repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewPost, Post, PostPatch, PostQuery};
use crate::domain::repositories::PostRepository;
use crate::error::AppError;

const POST_COLUMNS: &str = "id, title, author_name, author_id, image_link, images, categories, \
                            description, is_featured, created_at";

#[derive(Debug, FromRow)]
struct PostRow {
    id: i64,
    title: String,
    author_name: String,
    author_id: i64,
    image_link: String,
    images: Vec<String>,
    categories: Vec<String>,
    description: String,
    is_featured: bool,
    created_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(r: PostRow) -> Self {
        Post {
            id: r.id,
            title: r.title,
            author_name: r.author_name,
            author_id: r.author_id,
            image_link: r.image_link,
            images: r.images,
            categories: r.categories,
            description: r.description,
            is_featured: r.is_featured,
            created_at: r.created_at,
        }
    }
}

/// PostgreSQL repository for posts.
///
/// Post inserts and deletes run in a transaction together with the matching
/// `users.post_ids` update.
pub struct PgPostRepository {
    pool: Arc<PgPool>,
}

impl PgPostRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock the author row so a concurrent delete cannot orphan the post.
        let author: Option<i64> =
            sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
                .bind(new_post.author_id)
                .fetch_optional(&mut *tx)
                .await?;

        if author.is_none() {
            return Err(AppError::not_found(
                "User not found",
                json!({ "author_id": new_post.author_id }),
            ));
        }

        let row: PostRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO posts
                (title, author_name, author_id, image_link, images, categories, description, is_featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(&new_post.title)
        .bind(&new_post.author_name)
        .bind(new_post.author_id)
        .bind(&new_post.image_link)
        .bind(&new_post.images)
        .bind(&new_post.categories)
        .bind(&new_post.description)
        .bind(new_post.is_featured)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET post_ids = array_append(post_ids, $1) WHERE id = $2")
            .bind(row.id)
            .bind(row.author_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError> {
        let row: Option<PostRow> =
            sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(row.map(Post::from))
    }

    async fn list(&self, query: PostQuery) -> Result<Vec<Post>, AppError> {
        let rows: Vec<PostRow> = match query {
            PostQuery::All => {
                sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts ORDER BY id"))
                    .fetch_all(self.pool.as_ref())
                    .await?
            }
            PostQuery::Featured => {
                sqlx::query_as(&format!(
                    "SELECT {POST_COLUMNS} FROM posts WHERE is_featured ORDER BY id"
                ))
                .fetch_all(self.pool.as_ref())
                .await?
            }
            PostQuery::Latest => {
                sqlx::query_as(&format!(
                    "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC"
                ))
                .fetch_all(self.pool.as_ref())
                .await?
            }
            PostQuery::Category(category) => {
                sqlx::query_as(&format!(
                    "SELECT {POST_COLUMNS} FROM posts WHERE $1 = ANY(categories) ORDER BY id"
                ))
                .bind(category)
                .fetch_all(self.pool.as_ref())
                .await?
            }
            PostQuery::AnyCategory(categories) => {
                sqlx::query_as(&format!(
                    "SELECT {POST_COLUMNS} FROM posts WHERE categories && $1::text[] ORDER BY id"
                ))
                .bind(categories)
                .fetch_all(self.pool.as_ref())
                .await?
            }
        };

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn update(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, AppError> {
        let row: Option<PostRow> = sqlx::query_as(&format!(
            r#"
            UPDATE posts SET
                title       = COALESCE($2, title),
                author_name = COALESCE($3, author_name),
                description = COALESCE($4, description),
                categories  = COALESCE($5, categories),
                is_featured = COALESCE($6, is_featured),
                images      = COALESCE($7, images),
                image_link  = COALESCE($8, image_link)
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.author_name)
        .bind(patch.description)
        .bind(patch.categories)
        .bind(patch.is_featured)
        .bind(patch.images)
        .bind(patch.image_link)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Post::from))
    }

    async fn delete(&self, id: i64) -> Result<Option<Post>, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<PostRow> = sqlx::query_as(&format!(
            "DELETE FROM posts WHERE id = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query("UPDATE users SET post_ids = array_remove(post_ids, $1) WHERE id = $2")
            .bind(row.id)
            .bind(row.author_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(row.into()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
