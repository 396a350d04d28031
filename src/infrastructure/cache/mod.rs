//! Advisory cache for post listings.
//!
//! Provides a [`CacheService`] trait with two implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`NullCache`] - No-op implementation when Redis is not configured
//!
//! The named slots and the invalidation helper live in [`slots`].

mod null_cache;
mod redis_cache;
mod service;
pub mod slots;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
#[cfg(test)]
pub use service::MockCacheService;
pub use service::{CacheError, CacheResult, CacheService};
pub use slots::CacheSlot;
