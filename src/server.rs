//! HTTP server initialization and runtime setup.
//!
//! Handles storage and cache connections, media setup, and the Axum server
//! lifecycle. The admin CLI reuses [`connect_storage`] and [`connect_cache`].

use crate::application::services::{PostService, SessionService};
use crate::config::{Config, StorageBackend};
use crate::domain::repositories::{PostRepository, UserRepository};
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::media::LocalMediaStore;
use crate::infrastructure::persistence::{InMemoryStore, PgPostRepository, PgUserRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Post and user repositories over one storage backend.
#[derive(Clone)]
pub struct Storage {
    pub posts: Arc<dyn PostRepository>,
    pub users: Arc<dyn UserRepository>,
}

/// Opens the configured storage backend.
///
/// For PostgreSQL this creates the pool and applies pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn connect_storage(config: &Config) -> Result<Storage> {
    match (config.storage_backend, &config.database_url) {
        (StorageBackend::Postgres, Some(database_url)) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Duration::from_secs(config.db_idle_timeout))
                .max_lifetime(Duration::from_secs(config.db_max_lifetime))
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to migrate")?;

            let pool = Arc::new(pool);
            Ok(Storage {
                posts: Arc::new(PgPostRepository::new(pool.clone())),
                users: Arc::new(PgUserRepository::new(pool)),
            })
        }
        (StorageBackend::Postgres, None) => {
            anyhow::bail!("DATABASE_URL is required for the postgres backend")
        }
        (StorageBackend::Memory, _) => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            let store = Arc::new(InMemoryStore::new());
            Ok(Storage {
                posts: store.clone(),
                users: store,
            })
        }
    }
}

/// Connects to Redis when configured, otherwise falls back to [`NullCache`].
///
/// An unreachable Redis is not fatal: the cache is advisory.
pub async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

/// Wires services into the shared handler state.
///
/// # Errors
///
/// Returns an error if the upload directory cannot be created.
pub async fn build_state(
    config: &Config,
    storage: &Storage,
    cache: Arc<dyn CacheService>,
) -> Result<AppState> {
    let media = LocalMediaStore::new(&config.upload_dir, &config.public_base_url)
        .await
        .with_context(|| format!("Failed to create upload directory '{}'", config.upload_dir))?;

    Ok(AppState {
        post_service: Arc::new(PostService::new(storage.posts.clone(), cache.clone())),
        session_service: Arc::new(SessionService::new(
            config.session_secret.clone(),
            config.session_ttl_seconds,
        )),
        media: Arc::new(media),
        cache,
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Storage cannot be opened
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let storage = connect_storage(&config).await?;
    let cache = connect_cache(&config).await;
    let state = build_state(&config, &storage, cache).await?;

    let app = app_router(state, &config);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
