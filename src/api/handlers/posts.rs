//! Handlers for the post endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde_json::json;

use crate::api::dto::message::MessageResponse;
use crate::api::dto::related::RelatedQuery;
use crate::api::extract::PostForm;
use crate::application::services::Requester;
use crate::domain::entities::Post;
use crate::error::AppError;
use crate::state::AppState;

/// Parses a post id from the path.
///
/// Ids that are not integers cannot name a post, so they are reported as
/// `404 Not Found` rather than a validation error.
pub fn parse_post_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::not_found("Post not found", json!({ "id": raw })))
}

/// Creates a post owned by the requester.
///
/// # Endpoint
///
/// `POST /api/posts` (multipart)
///
/// # Form Fields
///
/// - `title`, `authorName`, `description` - required
/// - `categories` - required; repeated, a JSON array or a single label
/// - `images` - image files, or `imageLink` when no file is sent
/// - `isFeaturedPost` - optional flag
///
/// # Errors
///
/// - `400` for invalid input
/// - `401` without a valid session
/// - `404` if the requester's user record is gone
pub async fn create_post_handler(
    State(state): State<AppState>,
    Extension(requester): Extension<Requester>,
    form: PostForm,
) -> Result<Json<Post>, AppError> {
    let input = form.into_create_input()?;
    let post = state
        .post_service
        .create_post(input, requester.user_id)
        .await?;

    Ok(Json(post))
}

/// Lists all posts in insertion order.
///
/// `GET /api/posts`
pub async fn list_posts_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(state.post_service.list_all().await?))
}

/// Lists featured posts.
///
/// `GET /api/posts/featured`
pub async fn featured_posts_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(state.post_service.list_featured().await?))
}

/// Lists posts newest first.
///
/// `GET /api/posts/latest`
pub async fn latest_posts_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(state.post_service.list_latest().await?))
}

/// Lists posts in one category.
///
/// `GET /api/posts/category/{category}`
///
/// # Errors
///
/// Returns `400` if `category` is not one of the known categories.
pub async fn category_posts_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(state.post_service.list_by_category(&category).await?))
}

/// Lists posts sharing any of the given categories.
///
/// `GET /api/posts/related?categories=Travel&categories=City`
///
/// # Errors
///
/// Returns `404` with "Invalid category" when no category is given.
pub async fn related_posts_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Post>>, AppError> {
    let query = RelatedQuery::from_pairs(pairs);
    Ok(Json(state.post_service.list_related(query.categories).await?))
}

/// Retrieves one post.
///
/// `GET /api/posts/{id}`
pub async fn get_post_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, AppError> {
    let id = parse_post_id(&id)?;
    Ok(Json(state.post_service.get_by_id(id).await?))
}

/// Partially updates a post.
///
/// # Endpoint
///
/// - `PATCH /api/posts/{id}` - owner or admin
/// - `PATCH /api/posts/admin/{id}` - admin only
///
/// # Images
///
/// `existingImages` lists the stored images to keep, in order; files under
/// `images` are appended. Send `existingImages=[]` to drop every stored image.
pub async fn update_post_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: PostForm,
) -> Result<Json<Post>, AppError> {
    let id = parse_post_id(&id)?;
    let input = form.into_update_input()?;

    Ok(Json(state.post_service.update_post(id, input).await?))
}

/// Deletes a post.
///
/// `DELETE /api/posts/{id}`
///
/// # Response
///
/// ```json
/// { "message": "Post deleted successfully" }
/// ```
pub async fn delete_post_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_post_id(&id)?;
    state.post_service.delete_post(id).await?;

    Ok(Json(MessageResponse::new("Post deleted successfully")))
}
