//! Repository trait for user data access.

use crate::domain::entities::{NewUser, Role, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for users.
///
/// `post_ids` is never written through this trait; it is maintained by
/// [`crate::domain::repositories::PostRepository`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Registers a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email or external id is taken.
    /// Returns [`AppError::Persistence`] on database errors.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Finds a user by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Finds a user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Lists all users ordered by id.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Replaces the password hash and role of an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no user has this id.
    async fn update_credentials(
        &self,
        id: i64,
        password_hash: String,
        role: Role,
    ) -> Result<User, AppError>;
}
