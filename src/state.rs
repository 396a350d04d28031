//! Shared state handed to every handler.

use std::sync::Arc;

use crate::application::services::{PostService, SessionService};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::media::MediaStore;

#[derive(Clone)]
pub struct AppState {
    pub post_service: Arc<PostService>,
    pub session_service: Arc<SessionService>,
    pub media: Arc<dyn MediaStore>,
    /// The same cache the post service writes to; read by the health check.
    pub cache: Arc<dyn CacheService>,
}
