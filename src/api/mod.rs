//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into post service calls and formats
//! responses according to API contracts.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`extract`] - Multipart post form extraction and upload handling
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Session, ownership and request processing middleware
//! - [`routes`] - Route configuration and composition

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
