use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::entities::otp::OtpStatus;
use crate::entities::{booking, otp, takes};
use crate::error::AppResult;
use crate::handlers::users::DeletionResponse;
use crate::middleware::auth::ensure_owner_or_admin;
use crate::session::Identity;
use crate::store;
use crate::store::booking::{BookingChanges, NewBooking};
use crate::store::takes::NewTakes;
use crate::AppState;

// ============ Takes ============

#[derive(Debug, Deserialize)]
pub struct TakeServiceRequest {
    pub service_id: i32,
    pub date_taken: Option<NaiveDate>,
    pub time_taken: Option<NaiveTime>,
}

/// Services the current user takes
pub async fn list_takes(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<Vec<takes::Model>>> {
    Ok(Json(
        store::takes::list_for_user(&state.db, &identity.user_id).await?,
    ))
}

/// Subscribe the current user to a service
pub async fn take_service(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<TakeServiceRequest>,
) -> AppResult<Json<takes::Model>> {
    let model = store::takes::insert(
        &state.db,
        NewTakes {
            user_id: identity.user_id,
            service_id: payload.service_id,
            date_taken: payload.date_taken,
            time_taken: payload.time_taken,
        },
    )
    .await?;
    Ok(Json(model))
}

pub async fn leave_service(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(service_id): Path<i32>,
) -> AppResult<Json<serde_json::Value>> {
    store::takes::delete(&state.db, &identity.user_id, service_id).await?;
    Ok(Json(serde_json::json!({ "message": "Service subscription removed" })))
}

// ============ Bookings ============

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub service_id: i32,
    pub route_id: i32,
    pub seat_no: String,
    /// Passenger name; defaults to the account name
    pub name: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub seat_availability: Option<String>,
}

/// Book a seat for the current user
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<Json<booking::Model>> {
    let model = store::booking::insert(
        &state.db,
        NewBooking {
            user_id: identity.user_id,
            service_id: payload.service_id,
            route_id: payload.route_id,
            seat_no: payload.seat_no,
            name: payload.name.unwrap_or(identity.name),
            date: payload.date,
            time: payload.time,
            seat_availability: payload
                .seat_availability
                .unwrap_or_else(|| "Booked".to_string()),
        },
    )
    .await?;
    Ok(Json(model))
}

/// List the current user's bookings
pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<Vec<booking::Model>>> {
    Ok(Json(
        store::booking::list_for_user(&state.db, &identity.user_id).await?,
    ))
}

/// List all bookings (admin)
pub async fn list_all_bookings(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<booking::Model>>> {
    Ok(Json(store::booking::list(&state.db).await?))
}

pub async fn update_booking(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(booking_id): Path<i32>,
    Json(payload): Json<BookingChanges>,
) -> AppResult<Json<booking::Model>> {
    let existing = store::booking::find(&state.db, booking_id).await?;
    ensure_owner_or_admin(&identity, &existing.user_id)?;

    Ok(Json(
        store::booking::update(&state.db, booking_id, payload).await?,
    ))
}

/// Cancel a booking along with its OTPs
pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(booking_id): Path<i32>,
) -> AppResult<Json<DeletionResponse>> {
    let existing = store::booking::find(&state.db, booking_id).await?;
    ensure_owner_or_admin(&identity, &existing.user_id)?;

    let removed = store::booking::delete(&state.db, booking_id).await?;
    Ok(Json(DeletionResponse {
        message: "Booking cancelled".to_string(),
        removed,
    }))
}

// ============ OTP ============

#[derive(Debug, Serialize)]
pub struct IssuedOtpResponse {
    pub otp_id: i32,
    pub booking_id: i32,
    pub code: String,
    pub status: OtpStatus,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub code: String,
}

/// Issue a new OTP for a booking; the code is returned only here
pub async fn issue_otp(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(booking_id): Path<i32>,
) -> AppResult<Json<IssuedOtpResponse>> {
    let existing = store::booking::find(&state.db, booking_id).await?;
    ensure_owner_or_admin(&identity, &existing.user_id)?;

    let issued = store::otp::issue(&state.db, booking_id).await?;
    Ok(Json(IssuedOtpResponse {
        otp_id: issued.otp.otp_id,
        booking_id: issued.otp.booking_id,
        code: issued.code,
        status: issued.otp.status,
    }))
}

pub async fn list_otps(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(booking_id): Path<i32>,
) -> AppResult<Json<Vec<otp::Model>>> {
    let existing = store::booking::find(&state.db, booking_id).await?;
    ensure_owner_or_admin(&identity, &existing.user_id)?;

    Ok(Json(
        store::otp::list_for_booking(&state.db, booking_id).await?,
    ))
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(booking_id): Path<i32>,
    Json(payload): Json<VerifyOtpRequest>,
) -> AppResult<Json<otp::Model>> {
    let existing = store::booking::find(&state.db, booking_id).await?;
    ensure_owner_or_admin(&identity, &existing.user_id)?;

    Ok(Json(
        store::otp::verify(&state.db, booking_id, &payload.code).await?,
    ))
}
