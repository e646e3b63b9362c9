use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    cache::CacheKey,
    dto::message_dto::SendMessagePayload,
    error::Result,
    middleware::auth::Claims,
    models::message::CreateMessage,
    AppState,
};

/// Pure read of the thread with the counterpart. Unread flags stay as
/// they are until the client acknowledges.
#[axum::debug_handler]
pub async fn get_thread(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(counterpart_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let self_id = claims.user_id()?;
    let messages = state
        .cache
        .get_or_fetch(CacheKey::thread(self_id, counterpart_id), || async {
            state
                .message_service
                .list_thread(self_id, counterpart_id)
                .await
        })
        .await?;
    Ok(Json(messages))
}

#[axum::debug_handler]
pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SendMessagePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let self_id = claims.user_id()?;

    let message = state
        .message_service
        .send(CreateMessage {
            content: payload.content,
            sender_id: self_id,
            sender_role: claims.role.clone(),
            receiver_id: payload.receiver_id,
            receiver_role: payload.receiver_role,
        })
        .await?;

    // Only the thread key is invalidated here. The receiver's badge
    // refreshes through the notification change events, not the cache.
    state
        .cache
        .invalidate(CacheKey::thread(self_id, payload.receiver_id));
    state
        .notification_service
        .notify_message(payload.receiver_id, &claims.email)
        .await;

    Ok((StatusCode::CREATED, Json(message)))
}

/// Explicit read acknowledgement: flips unread messages from the
/// counterpart addressed to the caller.
#[axum::debug_handler]
pub async fn acknowledge_read(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(counterpart_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let self_id = claims.user_id()?;
    let updated = state
        .message_service
        .acknowledge_read(self_id, counterpart_id)
        .await?;
    if updated > 0 {
        state
            .cache
            .invalidate(CacheKey::thread(self_id, counterpart_id));
    }
    Ok(Json(json!({ "acknowledged": updated })))
}

#[axum::debug_handler]
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let self_id = claims.user_id()?;
    let count = state.message_service.unread_count(self_id).await?;
    Ok(Json(json!({ "unread_count": count })))
}
