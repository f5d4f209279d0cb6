use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// A write rejected by the schema layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    #[error("{field} '{value}' is already taken")]
    Unique { field: &'static str, value: String },

    #[error("{field} must be one of {allowed:?}, got '{value}'")]
    Choice {
        field: &'static str,
        value: String,
        allowed: Vec<String>,
    },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("{entity} '{key}' does not exist")]
    MissingReference { entity: &'static str, key: String },

    #[error("storage rejected the write: {0}")]
    Storage(String),
}

impl ConstraintViolation {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unique { .. } | Self::MissingReference { .. } | Self::Storage(_) => {
                StatusCode::CONFLICT
            }
            Self::Choice { .. }
            | Self::OutOfRange { .. }
            | Self::TooLong { .. }
            | Self::Empty { .. }
            | Self::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    ConstraintViolation(#[from] ConstraintViolation),

    #[error("Login failed. Please check your username/password.")]
    InvalidCredentials,

    #[error("Your session has expired. Please log in again.")]
    SessionExpired,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    TooManyRequests(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg))
            | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                AppError::ConstraintViolation(ConstraintViolation::Storage(msg))
            }
            _ => AppError::Database(err),
        }
    }
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::SessionExpired => "SESSION_EXPIRED",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::TooManyRequests(_) => "TOO_MANY_REQUESTS",
            AppError::Config(_) | AppError::Internal(_) | AppError::Database(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ConstraintViolation(violation) => violation.status(),
            AppError::InvalidCredentials
            | AppError::SessionExpired
            | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Config(_) | AppError::Internal(_) | AppError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed with internal error");
            "An internal server error occurred.".to_string()
        } else {
            self.to_string()
        };

        let body = ApiErrorResponse {
            error: ApiErrorBody {
                code: self.code(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}
