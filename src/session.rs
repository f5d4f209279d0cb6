//! Session & identity layer.
//!
//! A request is either `Anonymous` or `Authenticated`. Logging in passes
//! through authentication (credential check) and then `establish_session`,
//! which writes a session row and signs a token naming it. `end_session`
//! deletes the row, after which the token resolves to `SessionExpired`.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::entities::{session, user};
use crate::error::{AppError, AppResult};
use crate::utils::jwt::{create_token, expiry_from, verify_token};
use crate::utils::password::{verify_dummy, verify_password};

/// Who a request acts as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<user::Model> for Identity {
    fn from(user: user::Model) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

/// A live session bound to an identity, valid for the current request.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub identity: Identity,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum SessionState {
    Anonymous,
    Authenticated(SessionContext),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(ctx) => Some(&ctx.identity),
        }
    }
}

/// A freshly signed session token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Check a credential pair. The identifier is an email when it contains
/// `@` and a user id otherwise; user ids never contain `@`.
///
/// Unknown identifiers and wrong secrets fail identically and cost one
/// Argon2 verification each.
pub async fn authenticate(
    db: &DatabaseConnection,
    identifier: &str,
    secret: &str,
) -> AppResult<Identity> {
    let identifier = identifier.trim();

    let lookup = if identifier.contains('@') {
        user::Column::Email.eq(identifier.to_lowercase())
    } else {
        user::Column::UserId.eq(identifier)
    };
    let found = user::Entity::find().filter(lookup).one(db).await?;

    match found {
        Some(user) if verify_password(secret, &user.password_hash) => Ok(user.into()),
        Some(_) => Err(AppError::InvalidCredentials),
        None => {
            verify_dummy(secret);
            Err(AppError::InvalidCredentials)
        }
    }
}

/// Bind a new session to an identity and sign its token
pub async fn establish_session(
    db: &DatabaseConnection,
    config: &Config,
    identity: &Identity,
) -> AppResult<IssuedSession> {
    purge_expired(db).await?;

    let now = Utc::now();
    let expires_at = expiry_from(now, config.session_ttl_hours);
    let session_id = Uuid::new_v4();

    session::ActiveModel {
        id: Set(session_id),
        user_id: Set(identity.user_id.clone()),
        created_at: Set(now.into()),
        expires_at: Set(expires_at.into()),
    }
    .insert(db)
    .await?;

    let token = create_token(
        &identity.user_id,
        session_id,
        now,
        expires_at,
        &config.session_secret,
    )?;

    tracing::info!(user_id = %identity.user_id, %session_id, "Session established");

    Ok(IssuedSession {
        session_id,
        token,
        expires_at,
    })
}

/// Resolve a token to its live session.
///
/// Fails with `SessionExpired` when the token is past its expiry or its
/// session has been ended, and `Unauthorized` when the token is not ours.
pub async fn resolve(
    db: &DatabaseConnection,
    config: &Config,
    token: &str,
) -> AppResult<SessionContext> {
    let claims = verify_token(token, &config.session_secret)?;

    let row = session::Entity::find_by_id(claims.sid)
        .one(db)
        .await?
        .ok_or(AppError::SessionExpired)?;

    let expires_at = row.expires_at.with_timezone(&Utc);
    if row.user_id != claims.sub || expires_at <= Utc::now() {
        return Err(AppError::SessionExpired);
    }

    let user = user::Entity::find_by_id(row.user_id)
        .one(db)
        .await?
        .ok_or(AppError::SessionExpired)?;

    Ok(SessionContext {
        session_id: row.id,
        identity: user.into(),
        expires_at,
    })
}

/// The session state a request presents. Stale or foreign tokens read as anonymous.
pub async fn current_session(
    db: &DatabaseConnection,
    config: &Config,
    token: Option<&str>,
) -> AppResult<SessionState> {
    let Some(token) = token else {
        return Ok(SessionState::Anonymous);
    };

    match resolve(db, config, token).await {
        Ok(ctx) => Ok(SessionState::Authenticated(ctx)),
        Err(AppError::SessionExpired) | Err(AppError::Unauthorized(_)) => {
            Ok(SessionState::Anonymous)
        }
        Err(e) => Err(e),
    }
}

/// Invalidate a session. Ending an already-ended session is a no-op.
pub async fn end_session(db: &DatabaseConnection, session_id: Uuid) -> AppResult<()> {
    let result = session::Entity::delete_by_id(session_id).exec(db).await?;
    tracing::info!(%session_id, ended = result.rows_affected > 0, "Session ended");
    Ok(())
}

/// End every session of a user except `keep`. Returns how many were ended.
pub async fn end_other_sessions(
    db: &DatabaseConnection,
    user_id: &str,
    keep: Uuid,
) -> AppResult<u64> {
    let result = session::Entity::delete_many()
        .filter(session::Column::UserId.eq(user_id))
        .filter(session::Column::Id.ne(keep))
        .exec(db)
        .await?;

    tracing::info!(user_id, ended = result.rows_affected, "Other sessions ended");
    Ok(result.rows_affected)
}

pub async fn purge_expired(db: &DatabaseConnection) -> AppResult<u64> {
    let now: DateTime<Utc> = Utc::now();
    let result = session::Entity::delete_many()
        .filter(session::Column::ExpiresAt.lte(now))
        .exec(db)
        .await?;

    if result.rows_affected > 0 {
        tracing::debug!(purged = result.rows_affected, "Expired sessions purged");
    }
    Ok(result.rows_affected)
}
