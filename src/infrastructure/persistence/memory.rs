//! In-process storage backend.
//!
//! Selected with `STORAGE_BACKEND=memory` for local development, and used by
//! the handler tests. Posts and users share one lock, so the two-record writes
//! are atomic just like the PostgreSQL transactions.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::entities::{NewPost, NewUser, Post, PostPatch, PostQuery, Role, User};
use crate::domain::repositories::{PostRepository, UserRepository};
use crate::error::AppError;

#[derive(Default)]
struct Tables {
    posts: BTreeMap<i64, Post>,
    users: BTreeMap<i64, User>,
    next_post_id: i64,
    next_user_id: i64,
    last_created_at: Option<DateTime<Utc>>,
}

impl Tables {
    /// Creation timestamps strictly increase, even within one clock tick.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_created_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created_at = Some(ts);
        ts
    }
}

/// Posts and users held in memory. Implements both repository traits.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, new_post: NewPost) -> Result<Post, AppError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&new_post.author_id) {
            return Err(AppError::not_found(
                "User not found",
                json!({ "author_id": new_post.author_id }),
            ));
        }

        tables.next_post_id += 1;
        let post = Post {
            id: tables.next_post_id,
            title: new_post.title,
            author_name: new_post.author_name,
            author_id: new_post.author_id,
            image_link: new_post.image_link,
            images: new_post.images,
            categories: new_post.categories,
            description: new_post.description,
            is_featured: new_post.is_featured,
            created_at: tables.next_timestamp(),
        };

        if let Some(author) = tables.users.get_mut(&post.author_id) {
            author.post_ids.push(post.id);
        }
        tables.posts.insert(post.id, post.clone());

        Ok(post)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn list(&self, query: PostQuery) -> Result<Vec<Post>, AppError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();

        if query == PostQuery::Latest {
            posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        }

        Ok(posts)
    }

    async fn update(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.posts.get_mut(&id).map(|post| {
            patch.apply_to(post);
            post.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<Option<Post>, AppError> {
        let mut tables = self.tables.write().await;

        let Some(post) = tables.posts.remove(&id) else {
            return Ok(None);
        };

        if let Some(author) = tables.users.get_mut(&post.author_id) {
            author.post_ids.retain(|p| *p != id);
        }

        Ok(Some(post))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;

        let taken = tables.users.values().any(|u| {
            u.email == new_user.email
                || (new_user.external_id.is_some() && u.external_id == new_user.external_id)
        });
        if taken {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "email": new_user.email }),
            ));
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            username: new_user.username,
            full_name: new_user.full_name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            post_ids: Vec::new(),
            external_id: new_user.external_id,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn update_credentials(
        &self,
        id: i64,
        password_hash: String,
        role: Role,
    ) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))?;

        user.password_hash = password_hash;
        user.role = role;
        Ok(user.clone())
    }
}
