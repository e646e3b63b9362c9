use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde_json::json;

use crate::{
    cache::CacheKey, error::Result, middleware::auth::Claims, AppState,
};

#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let notifications = state.notification_service.list(user_id).await?;
    Ok(Json(notifications))
}

/// Badge count. Served from the cache; the entry is dropped by the
/// change-event listener whenever this user's notifications move.
#[axum::debug_handler]
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let count = state
        .cache
        .get_or_fetch(CacheKey::unread_notifications(user_id), || async {
            state.notification_service.unread_count(user_id).await
        })
        .await?;
    Ok(Json(json!({ "unread_count": count })))
}

#[axum::debug_handler]
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let updated = state.notification_service.mark_all_read(user_id).await?;
    Ok(Json(json!({ "marked_read": updated })))
}
