use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    extract::cookie::CookieJar,
    headers::{authorization::Bearer, Authorization, HeaderMapExt},
};

use crate::error::{AppError, AppResult};
use crate::session::{self, Identity, SessionState};
use crate::AppState;

pub const SESSION_COOKIE: &str = "session";

/// Session token from the `session` cookie, falling back to a bearer header
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

impl FromRequestParts<AppState> for SessionState {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> AppResult<Self> {
        let token = session_token(&parts.headers);
        session::current_session(&state.db, &state.config, token.as_deref()).await
    }
}

/// Require a live session; stale tokens fail with `SessionExpired`
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let token = session_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let ctx = session::resolve(&state.db, &state.config, &token).await?;
    request.extensions_mut().insert(ctx.identity.clone());
    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

/// Require `is_admin` on the authenticated user
pub async fn require_admin(request: Request, next: Next) -> AppResult<Response> {
    let identity = request
        .extensions()
        .get::<Identity>()
        .ok_or_else(|| AppError::Unauthorized("No authentication found".to_string()))?;

    if !identity.is_admin {
        tracing::warn!(user_id = %identity.user_id, uri = %request.uri(), "Admin access denied");
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(request).await)
}

/// Owners may touch their own rows; admins may touch any
pub fn ensure_owner_or_admin(identity: &Identity, owner_id: &str) -> AppResult<()> {
    if identity.is_admin || identity.user_id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You can only access your own records".to_string(),
        ))
    }
}
