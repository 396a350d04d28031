//! HTTP request handlers for API endpoints.

pub mod health;
pub mod posts;

pub use health::health_handler;
pub use posts::{
    category_posts_handler, create_post_handler, delete_post_handler, featured_posts_handler,
    get_post_handler, latest_posts_handler, list_posts_handler, related_posts_handler,
    update_post_handler,
};
