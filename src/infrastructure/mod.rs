//! Infrastructure layer for external integrations.
//!
//! Concrete implementations of the interfaces the domain and application
//! layers consume.
//!
//! # Modules
//!
//! - [`cache`] - Listing cache (Redis and no-op implementations)
//! - [`media`] - Storage for uploaded images
//! - [`persistence`] - PostgreSQL and in-memory repositories

pub mod cache;
pub mod media;
pub mod persistence;
