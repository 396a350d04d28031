//! Authorization guards for post mutations.
//!
//! Both guards expect [`super::session::layer`] to have run first.

use axum::{
    Extension,
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::api::handlers::posts::parse_post_id;
use crate::application::services::Requester;
use crate::{error::AppError, state::AppState};

/// Lets the request through when the requester owns the post or is an admin.
///
/// # Errors
///
/// - `404 Not Found` if the post does not exist
/// - `403 Forbidden` if the requester is neither owner nor admin
pub async fn owner_or_admin(
    State(st): State<AppState>,
    Path(id): Path<String>,
    Extension(requester): Extension<Requester>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let post = st.post_service.get_by_id(parse_post_id(&id)?).await?;

    if !requester.can_modify(&post) {
        return Err(AppError::forbidden(
            "You can only modify your own posts",
            json!({ "post_id": post.id }),
        ));
    }

    Ok(next.run(req).await)
}

/// Lets the request through only for admins.
///
/// # Errors
///
/// Returns `403 Forbidden` for non-admin requesters.
pub async fn admin_only(
    Extension(requester): Extension<Requester>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !requester.is_admin() {
        return Err(AppError::forbidden("Admin access required", json!({})));
    }

    Ok(next.run(req).await)
}
