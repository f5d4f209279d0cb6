use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::entities::{feedback, incident, lost_found};
use crate::error::AppResult;
use crate::store;
use crate::store::report::{NewFeedback, NewIncident, NewLostFound};
use crate::AppState;

// ============ Feedback ============

#[derive(Debug, Serialize)]
pub struct FeedbackListResponse {
    pub service_id: i32,
    pub average_rating: Option<f64>,
    pub entries: Vec<feedback::Model>,
}

pub async fn list_feedback(
    State(state): State<AppState>,
    Path(service_id): Path<i32>,
) -> AppResult<Json<FeedbackListResponse>> {
    store::service::find(&state.db, service_id).await?;
    let entries = store::report::list_feedback(&state.db, service_id).await?;

    Ok(Json(FeedbackListResponse {
        service_id,
        average_rating: store::report::average_rating(&entries),
        entries,
    }))
}

/// Rate a service (1 to 5)
pub async fn create_feedback(
    State(state): State<AppState>,
    Path(service_id): Path<i32>,
    Json(payload): Json<NewFeedback>,
) -> AppResult<Json<feedback::Model>> {
    Ok(Json(
        store::report::insert_feedback(&state.db, service_id, payload).await?,
    ))
}

pub async fn delete_feedback(
    State(state): State<AppState>,
    Path(feedback_id): Path<i32>,
) -> AppResult<Json<serde_json::Value>> {
    store::report::delete_feedback(&state.db, feedback_id).await?;
    Ok(Json(serde_json::json!({ "message": "Feedback deleted" })))
}

// ============ Incidents ============

#[derive(Debug, Deserialize)]
pub struct IncidentStatusRequest {
    pub status: String,
}

pub async fn list_incidents(
    State(state): State<AppState>,
    Path(service_id): Path<i32>,
) -> AppResult<Json<Vec<incident::Model>>> {
    store::service::find(&state.db, service_id).await?;
    Ok(Json(
        store::report::list_incidents(&state.db, service_id).await?,
    ))
}

pub async fn report_incident(
    State(state): State<AppState>,
    Path(service_id): Path<i32>,
    Json(payload): Json<NewIncident>,
) -> AppResult<Json<incident::Model>> {
    Ok(Json(
        store::report::insert_incident(&state.db, service_id, payload).await?,
    ))
}

/// Move an incident to a new status (admin)
pub async fn update_incident_status(
    State(state): State<AppState>,
    Path(incident_id): Path<i32>,
    Json(payload): Json<IncidentStatusRequest>,
) -> AppResult<Json<incident::Model>> {
    Ok(Json(
        store::report::update_incident_status(&state.db, incident_id, &payload.status).await?,
    ))
}

pub async fn delete_incident(
    State(state): State<AppState>,
    Path(incident_id): Path<i32>,
) -> AppResult<Json<serde_json::Value>> {
    store::report::delete_incident(&state.db, incident_id).await?;
    Ok(Json(serde_json::json!({ "message": "Incident deleted" })))
}

// ============ Lost & Found ============

pub async fn list_lost_found(
    State(state): State<AppState>,
    Path(service_id): Path<i32>,
) -> AppResult<Json<Vec<lost_found::Model>>> {
    store::service::find(&state.db, service_id).await?;
    Ok(Json(
        store::report::list_lost_found(&state.db, service_id).await?,
    ))
}

pub async fn report_lost_found(
    State(state): State<AppState>,
    Path(service_id): Path<i32>,
    Json(payload): Json<NewLostFound>,
) -> AppResult<Json<lost_found::Model>> {
    Ok(Json(
        store::report::insert_lost_found(&state.db, service_id, payload).await?,
    ))
}

pub async fn mark_found(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> AppResult<Json<lost_found::Model>> {
    Ok(Json(store::report::mark_found(&state.db, item_id).await?))
}

pub async fn delete_lost_found(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> AppResult<Json<serde_json::Value>> {
    store::report::delete_lost_found(&state.db, item_id).await?;
    Ok(Json(serde_json::json!({ "message": "Item deleted" })))
}
