//! Viewer extraction errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failure to establish who the viewer is.
///
/// Whether an established viewer may proceed is decided separately by
/// [`crate::permissions::AuthzError`].
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Access token is invalid")]
    InvalidToken,

    #[error("Access token has expired")]
    TokenExpired,

    /// Route needs a viewer and the request carried no credentials.
    #[error("Authentication required")]
    MissingAuthHeader,

    /// `Authorization` is present but not a Bearer token.
    #[error("Authorization header must be a Bearer token")]
    InvalidAuthHeader,

    /// Server-side misconfiguration, e.g. an unreadable verification key.
    /// The detail is logged, never returned.
    #[error("Internal server error")]
    Internal(String),
}

impl AuthError {
    const fn code(&self) -> &'static str {
        match self {
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::MissingAuthHeader => "MISSING_AUTH",
            Self::InvalidAuthHeader => "INVALID_AUTH_HEADER",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// JSON body shared by every auth and authorization rejection.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Stable code clients branch on.
    pub error: String,
    pub message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(detail = %detail, "viewer extraction failed internally");
        }

        let body = Json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
