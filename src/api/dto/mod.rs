//! Data Transfer Objects for API requests and responses.
//!
//! Posts themselves are serialized straight from
//! [`crate::domain::entities::Post`]; these types cover everything else.

pub mod health;
pub mod message;
pub mod related;
