//! Domain layer containing business entities and rules.
//!
//! Nothing in here depends on the database, the cache or HTTP. Infrastructure
//! implements the repository traits, and the application layer orchestrates
//! them (see [`crate::application::services`]).
//!
//! - [`entities`] - Posts, users, roles and the fixed category set
//! - [`repositories`] - Data access trait definitions
//! - [`form_value`] - Normalization of loosely typed form fields

pub mod entities;
pub mod form_value;
pub mod repositories;
