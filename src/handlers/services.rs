use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::entities::{driver, service};
use crate::error::AppResult;
use crate::handlers::users::DeletionResponse;
use crate::store;
use crate::store::driver::{DriverChanges, NewDriver};
use crate::store::service::{NewService, ServiceChanges};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ServiceDetail {
    #[serde(flatten)]
    pub service: service::Model,
    pub drivers: Vec<driver::Model>,
    pub average_rating: Option<f64>,
    pub feedback_count: usize,
}

/// List all services
pub async fn list_services(State(state): State<AppState>) -> AppResult<Json<Vec<service::Model>>> {
    Ok(Json(store::service::list(&state.db).await?))
}

/// Service details with its drivers and rating
pub async fn get_service(
    State(state): State<AppState>,
    Path(service_id): Path<i32>,
) -> AppResult<Json<ServiceDetail>> {
    let service = store::service::find(&state.db, service_id).await?;
    let drivers = store::driver::list_for_service(&state.db, service_id).await?;
    let feedback = store::report::list_feedback(&state.db, service_id).await?;

    Ok(Json(ServiceDetail {
        service,
        drivers,
        average_rating: store::report::average_rating(&feedback),
        feedback_count: feedback.len(),
    }))
}

/// Create a service (admin)
pub async fn create_service(
    State(state): State<AppState>,
    Json(payload): Json<NewService>,
) -> AppResult<Json<service::Model>> {
    Ok(Json(store::service::insert(&state.db, payload).await?))
}

/// Update a service (admin)
pub async fn update_service(
    State(state): State<AppState>,
    Path(service_id): Path<i32>,
    Json(payload): Json<ServiceChanges>,
) -> AppResult<Json<service::Model>> {
    Ok(Json(
        store::service::update(&state.db, service_id, payload).await?,
    ))
}

/// Delete a service and all rows depending on it (admin)
pub async fn delete_service(
    State(state): State<AppState>,
    Path(service_id): Path<i32>,
) -> AppResult<Json<DeletionResponse>> {
    let removed = store::service::delete(&state.db, service_id).await?;
    Ok(Json(DeletionResponse {
        message: "Service deleted".to_string(),
        removed,
    }))
}

// ============ Drivers ============

pub async fn list_drivers(
    State(state): State<AppState>,
    Path(service_id): Path<i32>,
) -> AppResult<Json<Vec<driver::Model>>> {
    store::service::find(&state.db, service_id).await?;
    Ok(Json(
        store::driver::list_for_service(&state.db, service_id).await?,
    ))
}

/// Register a driver on a service (admin)
pub async fn create_driver(
    State(state): State<AppState>,
    Json(payload): Json<NewDriver>,
) -> AppResult<Json<driver::Model>> {
    Ok(Json(store::driver::insert(&state.db, payload).await?))
}

pub async fn update_driver(
    State(state): State<AppState>,
    Path(license_no): Path<String>,
    Json(payload): Json<DriverChanges>,
) -> AppResult<Json<driver::Model>> {
    Ok(Json(
        store::driver::update(&state.db, &license_no, payload).await?,
    ))
}

pub async fn delete_driver(
    State(state): State<AppState>,
    Path(license_no): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    store::driver::delete(&state.db, &license_no).await?;
    Ok(Json(serde_json::json!({ "message": "Driver deleted" })))
}
