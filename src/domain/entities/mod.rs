//! Core domain entities.
//!
//! Entities follow the same split everywhere: a full record (`Post`, `User`)
//! returned by repositories, a `New*` input for inserts and, for posts, a
//! [`PostPatch`] for partial updates.

pub mod category;
pub mod post;
pub mod user;

pub use category::{Category, MAX_CATEGORIES};
pub use post::{NewPost, Post, PostPatch, PostQuery};
pub use user::{NewUser, Role, User};
