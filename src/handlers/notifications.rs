use axum::{
    extract::{Path, State},
    Json,
};

use crate::entities::notification;
use crate::error::AppResult;
use crate::store;
use crate::store::notification::NewNotification;
use crate::AppState;

/// List notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<notification::Model>>> {
    Ok(Json(store::notification::list(&state.db).await?))
}

/// Post a notification (admin)
pub async fn create_notification(
    State(state): State<AppState>,
    Json(payload): Json<NewNotification>,
) -> AppResult<Json<notification::Model>> {
    Ok(Json(store::notification::insert(&state.db, payload).await?))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    Path(notification_id): Path<i32>,
) -> AppResult<Json<serde_json::Value>> {
    store::notification::delete(&state.db, notification_id).await?;
    Ok(Json(serde_json::json!({ "message": "Notification deleted" })))
}
