//! Rate limiting middleware using token bucket algorithm.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Token bucket parameters for one group of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub per_second: u64,
    pub burst: u32,
}

/// Public reads: 2 requests per second, bursts of 100.
pub const PUBLIC: Limits = Limits {
    per_second: 2,
    burst: 100,
};

/// Post mutations and uploads: 1 request per second, bursts of 10.
pub const MUTATING: Limits = Limits {
    per_second: 1,
    burst: 10,
};

type RateLimitLayer<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn layer<K: KeyExtractor>(extractor: K, limits: Limits) -> RateLimitLayer<K> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(limits.per_second)
            .burst_size(limits.burst)
            .key_extractor(extractor)
            .finish()
            .expect("rate limits are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Applies a per-client-IP rate limit to `router`.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// - `behind_proxy = false`: the socket peer address; the server must be
///   started with `into_make_service_with_connect_info`
/// - `behind_proxy = true`: `X-Forwarded-For`, `X-Real-IP` or `Forwarded`,
///   falling back to the peer address; enable only behind a trusted proxy
pub fn apply<S>(router: Router<S>, limits: Limits, behind_proxy: bool) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if behind_proxy {
        router.layer(layer(SmartIpKeyExtractor, limits))
    } else {
        router.layer(layer(PeerIpKeyExtractor, limits))
    }
}
