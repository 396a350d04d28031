//! Repository implementations.
//!
//! - [`PgPostRepository`] - Post storage with transactional owner bookkeeping
//! - [`PgUserRepository`] - User storage
//! - [`InMemoryStore`] - Both traits over in-process maps (development and tests)

pub mod memory;
pub mod pg_post_repository;
pub mod pg_user_repository;

pub use memory::InMemoryStore;
pub use pg_post_repository::PgPostRepository;
pub use pg_user_repository::PgUserRepository;
