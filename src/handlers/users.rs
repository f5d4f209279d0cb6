use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::user;
use crate::error::{AppError, AppResult};
use crate::session::{self, Identity, SessionContext};
use crate::store;
use crate::store::user::UserChanges;
use crate::store::DeletionSummary;
use crate::utils::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::AppState;

/// Fields a user may change on their own profile
#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub street: Option<String>,
    pub area: Option<String>,
    pub city: Option<String>,
}

impl From<ProfileUpdate> for UserChanges {
    fn from(p: ProfileUpdate) -> Self {
        Self {
            name: p.name,
            phone: p.phone,
            date_of_birth: p.date_of_birth,
            email: p.email,
            gender: p.gender,
            street: p.street,
            area: p.area,
            city: p.city,
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct DeletionResponse {
    pub message: String,
    pub removed: DeletionSummary,
}

/// Current user's profile
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<user::Model>> {
    Ok(Json(store::user::find(&state.db, &identity.user_id).await?))
}

/// Update the current user's profile
pub async fn update_me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<ProfileUpdate>,
) -> AppResult<Json<user::Model>> {
    let updated = store::user::update(&state.db, &identity.user_id, payload.into()).await?;
    Ok(Json(updated))
}

/// Change the current user's password and sign out their other sessions
pub async fn change_password(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let identity = &ctx.identity;
    let user = store::user::find(&state.db, &identity.user_id).await?;

    if !verify_password(&payload.current_password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }
    if payload.new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let password_hash = hash_password(&payload.new_password)?;
    store::user::set_password_hash(&state.db, &identity.user_id, password_hash).await?;
    let ended = session::end_other_sessions(&state.db, &identity.user_id, ctx.session_id).await?;

    Ok(Json(serde_json::json!({
        "message": "Password changed",
        "sessions_ended": ended
    })))
}

// ============ User Management (admin) ============

pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<user::Model>>> {
    Ok(Json(store::user::list(&state.db).await?))
}

/// Admins may also change `is_admin` and `verification_status`
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<UserChanges>,
) -> AppResult<Json<user::Model>> {
    let updated = store::user::update(&state.db, &user_id, payload).await?;
    Ok(Json(updated))
}

/// Delete a user and everything they own
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<DeletionResponse>> {
    let removed = store::user::delete(&state.db, &user_id).await?;
    Ok(Json(DeletionResponse {
        message: "User deleted".to_string(),
        removed,
    }))
}
