#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use axum_test::TestServer;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use travelgo::api::handlers::health_handler;
use travelgo::api::routes::post_routes;
use travelgo::application::services::{PostService, SessionService};
use travelgo::domain::entities::{NewUser, Role, User};
use travelgo::domain::repositories::UserRepository;
use travelgo::infrastructure::cache::{CacheError, CacheResult, CacheService};
use travelgo::infrastructure::media::LocalMediaStore;
use travelgo::infrastructure::persistence::InMemoryStore;
use travelgo::state::AppState;

pub const PUBLIC_BASE_URL: &str = "http://localhost:3000";

/// Cache that keeps values in memory and records every delete.
#[derive(Default)]
pub struct RecordingCache {
    values: Mutex<HashMap<String, String>>,
    deleted: Mutex<Vec<String>>,
    failing: Mutex<bool>,
}

impl RecordingCache {
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    /// Makes every later operation fail.
    pub fn fail(&self) {
        *self.failing.lock().unwrap() = true;
    }

    fn check(&self) -> CacheResult<()> {
        if *self.failing.lock().unwrap() {
            Err(CacheError::OperationError("cache is down".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheService for RecordingCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.check()?;
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str, _ttl_seconds: Option<u64>) -> CacheResult<()> {
        self.check()?;
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.deleted.lock().unwrap().push(key.to_string());
        self.check()?;
        self.values.lock().unwrap().remove(key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.check().is_ok()
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
    pub cache: Arc<RecordingCache>,
    pub sessions: Arc<SessionService>,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let upload_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryStore::new());
        let cache = Arc::new(RecordingCache::default());
        let sessions = Arc::new(SessionService::new("test-signing-secret".to_string(), 3600));
        let media = LocalMediaStore::new(upload_dir.path(), PUBLIC_BASE_URL)
            .await
            .unwrap();

        let state = AppState {
            post_service: Arc::new(PostService::new(store.clone(), cache.clone())),
            session_service: sessions.clone(),
            media: Arc::new(media),
            cache: cache.clone(),
        };

        let app = Router::new()
            .route("/health", get(health_handler))
            .nest("/api", post_routes(state.clone()))
            .with_state(state);

        Self {
            server: TestServer::new(app).unwrap(),
            store,
            cache,
            sessions,
            upload_dir,
        }
    }

    /// Registers a user and returns it with a valid bearer token.
    pub async fn user(&self, email: &str, role: Role) -> (User, String) {
        let user = UserRepository::create(
            self.store.as_ref(),
            NewUser {
                username: email.split('@').next().unwrap().to_string(),
                full_name: "Test User".to_string(),
                email: email.to_string(),
                password_hash: "unused".to_string(),
                role,
                external_id: None,
            },
        )
        .await
        .unwrap();

        let token = self.sessions.issue(&user);
        (user, token)
    }

    pub async fn find_user(&self, id: i64) -> User {
        UserRepository::find_by_id(self.store.as_ref(), id)
            .await
            .unwrap()
            .unwrap()
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
