//! API route configuration.
//!
//! Reads are public. Mutations go through [`session::layer`], then the
//! ownership guard for their route.

use crate::api::handlers::{
    category_posts_handler, create_post_handler, delete_post_handler, featured_posts_handler,
    get_post_handler, latest_posts_handler, list_posts_handler, related_posts_handler,
    update_post_handler,
};
use crate::api::middleware::{ownership, session};
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

/// Public read routes.
///
/// # Endpoints
///
/// - `GET /posts`                      - All posts
/// - `GET /posts/featured`             - Featured posts
/// - `GET /posts/latest`               - Newest first
/// - `GET /posts/related`              - Posts sharing any of `categories`
/// - `GET /posts/category/{category}`  - Posts in one category
/// - `GET /posts/{id}`                 - One post
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts_handler))
        .route("/posts/featured", get(featured_posts_handler))
        .route("/posts/latest", get(latest_posts_handler))
        .route("/posts/related", get(related_posts_handler))
        .route("/posts/category/{category}", get(category_posts_handler))
        .route("/posts/{id}", get(get_post_handler))
}

/// Mutating routes, all requiring a session.
///
/// # Endpoints
///
/// - `POST   /posts`             - Create (any user)
/// - `PATCH  /posts/{id}`        - Update (owner or admin)
/// - `DELETE /posts/{id}`        - Delete (owner or admin)
/// - `PATCH  /posts/admin/{id}`  - Update (admin only)
pub fn protected_routes(state: AppState) -> Router<AppState> {
    let owned = Router::new()
        .route(
            "/posts/{id}",
            patch(update_post_handler).delete(delete_post_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            ownership::owner_or_admin,
        ));

    let admin = Router::new()
        .route("/posts/admin/{id}", patch(update_post_handler))
        .route_layer(middleware::from_fn(ownership::admin_only));

    Router::new()
        .route("/posts", post(create_post_handler))
        .merge(owned)
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state, session::layer))
}

/// Every post route without rate limiting, ready to nest under `/api`.
pub fn post_routes(state: AppState) -> Router<AppState> {
    public_routes().merge(protected_routes(state))
}
