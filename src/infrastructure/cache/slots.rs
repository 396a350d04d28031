//! Named cache slots and the helpers that read and write them.
//!
//! Each slot holds the JSON body of one listing endpoint. Slots are deleted,
//! never patched, whenever a post changes; the next listing request rebuilds
//! them from storage.

use serde::Serialize;

use super::service::{CacheResult, CacheService};

/// One of the listing snapshots kept in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSlot {
    AllPosts,
    FeaturedPosts,
    LatestPosts,
}

impl CacheSlot {
    pub const ALL: [CacheSlot; 3] = [
        CacheSlot::AllPosts,
        CacheSlot::FeaturedPosts,
        CacheSlot::LatestPosts,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CacheSlot::AllPosts => "posts:all",
            CacheSlot::FeaturedPosts => "posts:featured",
            CacheSlot::LatestPosts => "posts:latest",
        }
    }

    /// Parses the short name used on the admin command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "all" => Some(CacheSlot::AllPosts),
            "featured" => Some(CacheSlot::FeaturedPosts),
            "latest" => Some(CacheSlot::LatestPosts),
            _ => None,
        }
    }
}

/// Deletes each slot, best effort.
///
/// A failed delete is logged and counted, then the next slot is attempted.
/// Nothing is returned: a stale slot is overwritten by the next listing
/// request, so callers never fail because of the cache.
pub async fn invalidate(cache: &dyn CacheService, slots: &[CacheSlot]) {
    for slot in slots {
        if let Err(e) = cache.delete(slot.key()).await {
            metrics::counter!("cache_invalidation_failures_total").increment(1);
            tracing::warn!(error = %e, key = slot.key(), "Failed to invalidate cache slot");
        }
    }
}

/// Deletes every listing slot. Called after each successful post mutation.
pub async fn invalidate_all(cache: &dyn CacheService) {
    invalidate(cache, &CacheSlot::ALL).await;
}

/// Serializes `value` and writes it into `slot` with the cache's default TTL.
pub async fn store<T: Serialize + ?Sized>(
    cache: &dyn CacheService,
    slot: CacheSlot,
    value: &T,
) -> CacheResult<()> {
    let body = serde_json::to_string(value)?;
    cache.set(slot.key(), &body, None).await
}
