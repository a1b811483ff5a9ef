use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use keycard_user::UserError;
use serde_json::json;
use thiserror::Error;

/// Startup errors, fatal to process initialisation
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("JWT secret is missing or empty (set JWT_SECRET)")]
    MissingJwtSecret,

    #[error("JWT expiration must be between 1 and 3650 days, got {0}")]
    InvalidExpiration(i64),

    #[error("Database max_connections must be at least 1")]
    InvalidMaxConnections,

    #[error("Server port must be greater than 0")]
    InvalidPort,

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Failures of the auth gate, each one mapped to a fixed status and message
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Unauthorized- No token provided")]
    MissingToken,

    #[error("Unauthorized- Invalid token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Internal sever error")]
    Internal(#[source] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        // 400 rather than 401 for both token failures, clients rely on it
        match self {
            AuthError::MissingToken | AuthError::InvalidToken => StatusCode::BAD_REQUEST,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        AuthError::Internal(err.into())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(e) = &self {
            tracing::error!(error = ?e, "Error in auth gate");
        }

        (self.status(), Json(json!({ "message": self.to_string() }))).into_response()
    }
}

/// Errors of the public auth routes (login, logout)
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Internal sever error")]
    InternalError(#[source] anyhow::Error),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        AppError::InternalError(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidCredentials | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InternalError(e) => {
                tracing::error!(error = ?e, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
