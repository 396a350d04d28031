//! HTTP middleware for request processing and protection.
//!
//! Provides session resolution, ownership guards, rate limiting, and
//! observability middleware.

pub mod ownership;
pub mod rate_limit;
pub mod session;
pub mod tracing;
