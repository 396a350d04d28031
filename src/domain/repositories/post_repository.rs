//! Repository trait for post data access.

use crate::domain::entities::{NewPost, Post, PostPatch, PostQuery};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for blog posts.
///
/// Writes that touch both a post and its owner (`create`, `delete`) must be
/// atomic: either the post row and the owner's `post_ids` change together or
/// neither does.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgPostRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - in-process storage
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Inserts a post and appends its id to the author's `post_ids`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if `new_post.author_id` matches no user;
    /// nothing is written in that case.
    /// Returns [`AppError::Persistence`] on database errors.
    async fn create(&self, new_post: NewPost) -> Result<Post, AppError>;

    /// Finds a post by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError>;

    /// Runs one of the list queries.
    ///
    /// [`PostQuery::Latest`] is ordered by creation time, newest first; every
    /// other query is ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database errors.
    async fn list(&self, query: PostQuery) -> Result<Vec<Post>, AppError>;

    /// Applies a partial update.
    ///
    /// Returns `Ok(None)` if no post has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database errors.
    async fn update(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, AppError>;

    /// Removes a post and prunes its id from the owner's `post_ids`.
    ///
    /// Returns the removed post, or `Ok(None)` if no post has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database errors.
    async fn delete(&self, id: i64) -> Result<Option<Post>, AppError>;

    /// Checks that the backing store answers.
    async fn ping(&self) -> Result<(), AppError>;
}
