//! Repository trait definitions for the domain layer.
//!
//! Traits define the data access contract; implementations live in
//! [`crate::infrastructure::persistence`] (PostgreSQL and in-memory). Mock
//! implementations are generated with `mockall` for unit tests.

pub mod post_repository;
pub mod user_repository;

pub use post_repository::PostRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use post_repository::MockPostRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
