//! Application layer services implementing business logic.
//!
//! Services consume repository and cache traits and give HTTP handlers and
//! the admin CLI one place to enforce validation and invalidation rules.
//!
//! # Available Services
//!
//! - [`services::post_service::PostService`] - Post CRUD and listing cache
//! - [`services::user_service::UserService`] - User registration and credentials
//! - [`services::session_service::SessionService`] - Signed session tokens

pub mod services;
