//! Authentication Middleware

use std::convert::Infallible;

use axum::{
    extract::{OptionalFromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use ipm_common::Role;

use crate::api::AppState;

use super::error::{AuthError, AuthResult};
use super::jwt::validate_access_token;

/// Identity making the current request, injected into request extensions.
///
/// Built fresh per request from a verified access token and dropped with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    /// Account ID.
    pub id: String,
    /// Account role, `None` when the token carried no recognised role.
    pub role: Option<Role>,
}

impl Viewer {
    /// Create a viewer with a role.
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role: Some(role),
        }
    }

    /// Whether this viewer sees the identity behind anonymous investors.
    #[must_use]
    pub fn is_admin_tier(&self) -> bool {
        self.role.is_some_and(|role| role.is_admin_tier())
    }
}

/// Extract the viewer from a Bearer token, if one was sent.
///
/// No header means an anonymous request; a header that is present but does
/// not verify is an error.
fn viewer_from_headers(headers: &HeaderMap, public_key: &str) -> AuthResult<Option<Viewer>> {
    let Some(auth_header) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let token = auth_header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AuthError::InvalidAuthHeader)?;

    let claims = validate_access_token(token, public_key)?;
    Ok(Some(claims.into_viewer()))
}

/// Middleware that attaches a `Viewer` when the request is authenticated.
///
/// Requests without an Authorization header continue anonymously; responses
/// to them are not privacy-masked.
#[tracing::instrument(skip(state, request, next))]
pub async fn attach_viewer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if let Some(viewer) = viewer_from_headers(request.headers(), &state.config.jwt_public_key)? {
        tracing::debug!(viewer_id = %viewer.id, role = ?viewer.role, "viewer attached");
        request.extensions_mut().insert(viewer);
    }

    Ok(next.run(request).await)
}

/// Middleware to require authentication.
///
/// Rejects the request unless a verified `Viewer` is available, either from an
/// outer [`attach_viewer`] layer or from the request's own Bearer token.
///
/// # Usage
///
/// ```ignore
/// Router::new()
///     .route("/me/permissions", get(handler))
///     .layer(axum::middleware::from_fn_with_state(state, require_auth))
/// ```
#[tracing::instrument(skip(state, request, next))]
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if request.extensions().get::<Viewer>().is_none() {
        let viewer = viewer_from_headers(request.headers(), &state.config.jwt_public_key)?
            .ok_or(AuthError::MissingAuthHeader)?;
        request.extensions_mut().insert(viewer);
    }

    Ok(next.run(request).await)
}

/// Extractor for the authenticated viewer in handlers.
///
/// ```ignore
/// async fn protected_handler(viewer: Viewer) -> impl IntoResponse {
///     format!("Hello, {}!", viewer.id)
/// }
/// ```
impl<S> axum::extract::FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(AuthError::MissingAuthHeader)
    }
}

/// `Option<Viewer>` for routes that also serve anonymous callers.
impl<S> OptionalFromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned())
    }
}
