//! Route authorization gates.
//!
//! Every route may declare a [`RouteRequirement`] when it is registered. The
//! [`enforce`] middleware evaluates it before the handler runs: the role gate
//! first, then the permission gate. Either gate short-circuits with a 403.

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    Json, Router,
};
use ipm_common::{Permission, Role};
use thiserror::Error;

use super::resolver::has_any_permission;
use crate::auth::{ErrorResponse, Viewer};

/// Roles and permissions a route declares. Empty lists leave that axis open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRequirement {
    pub required_roles: Vec<Role>,
    pub required_permissions: Vec<Permission>,
}

impl RouteRequirement {
    /// A requirement that restricts nothing.
    #[must_use]
    pub fn open() -> Self {
        Self::default()
    }

    /// Start an empty requirement; chain [`roles`](Self::roles) and
    /// [`permissions`](Self::permissions).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept any of these roles.
    #[must_use]
    pub fn roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.required_roles.extend(roles);
        self
    }

    /// Accept any of these permissions.
    #[must_use]
    pub fn permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.required_permissions.extend(permissions);
        self
    }

    /// Whether neither axis is restricted.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.required_roles.is_empty() && self.required_permissions.is_empty()
    }
}

/// Authorization failure. Always rendered as 403; the message tells a role
/// failure apart from a permission failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    /// The viewer is absent or carries no recognised role.
    #[error("User role not found")]
    MissingRole,

    /// The viewer's role is not among the route's roles.
    #[error("Insufficient role: requires one of [{}]", Listed(.required.as_slice()))]
    InsufficientRole { required: Vec<Role> },

    /// The viewer's permissions do not intersect the route's permissions.
    #[error("Insufficient permissions: requires one of [{}]", Listed(.required.as_slice()))]
    InsufficientPermissions { required: Vec<Permission> },
}

impl AuthzError {
    const fn code(&self) -> &'static str {
        match self {
            Self::MissingRole => "ROLE_MISSING",
            Self::InsufficientRole { .. } => "INSUFFICIENT_ROLE",
            Self::InsufficientPermissions { .. } => "INSUFFICIENT_PERMISSIONS",
        }
    }
}

impl IntoResponse for AuthzError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        });

        (StatusCode::FORBIDDEN, body).into_response()
    }
}

/// Comma-separated rendering of a role or permission list.
struct Listed<'a, T>(&'a [T]);

impl<T: fmt::Display> fmt::Display for Listed<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Whether `held` satisfies the required role token.
///
/// The `admin` token is also met by `project_admin`.
const fn role_satisfies(held: Role, required: Role) -> bool {
    match required {
        Role::Admin => matches!(held, Role::Admin | Role::ProjectAdmin),
        Role::Guest => matches!(held, Role::Guest),
        Role::Investor => matches!(held, Role::Investor),
        Role::ProjectAdmin => matches!(held, Role::ProjectAdmin),
        Role::SuperAdmin => matches!(held, Role::SuperAdmin),
    }
}

/// Role gate.
///
/// 1. No required roles: allow
/// 2. Viewer without a role: deny
/// 3. `super_admin`: allow
/// 4. Allow if any required role is satisfied by the viewer's role
pub fn authorize_role(viewer: Option<&Viewer>, required: &[Role]) -> Result<(), AuthzError> {
    if required.is_empty() {
        return Ok(());
    }

    let role = viewer.and_then(|v| v.role).ok_or(AuthzError::MissingRole)?;

    if role == Role::SuperAdmin {
        return Ok(());
    }

    if required.iter().any(|req| role_satisfies(role, *req)) {
        Ok(())
    } else {
        Err(AuthzError::InsufficientRole {
            required: required.to_vec(),
        })
    }
}

/// Permission gate.
///
/// 1. No required permissions: allow
/// 2. Viewer without a role: deny
/// 3. `super_admin`: allow without resolving the catalog
/// 4. Allow if the resolved set holds any required permission
pub fn authorize_permission(
    viewer: Option<&Viewer>,
    required: &[Permission],
) -> Result<(), AuthzError> {
    if required.is_empty() {
        return Ok(());
    }

    let role = viewer.and_then(|v| v.role).ok_or(AuthzError::MissingRole)?;

    if role == Role::SuperAdmin || has_any_permission(role, required) {
        Ok(())
    } else {
        Err(AuthzError::InsufficientPermissions {
            required: required.to_vec(),
        })
    }
}

/// Run both gates in pipeline order.
pub fn authorize(viewer: Option<&Viewer>, requirement: &RouteRequirement) -> Result<(), AuthzError> {
    authorize_role(viewer, &requirement.required_roles)?;
    authorize_permission(viewer, &requirement.required_permissions)
}

/// Middleware that enforces a route's requirement before its handler runs.
#[tracing::instrument(skip(requirement, request, next))]
pub async fn enforce(
    State(requirement): State<Arc<RouteRequirement>>,
    viewer: Option<Viewer>,
    request: Request,
    next: Next,
) -> Result<Response, AuthzError> {
    if let Err(e) = authorize(viewer.as_ref(), &requirement) {
        tracing::debug!(
            path = %request.uri().path(),
            error = %e,
            "request rejected by route requirement"
        );
        return Err(e);
    }

    Ok(next.run(request).await)
}

/// Attach a requirement to every route already registered on `router`.
///
/// Applied as a `route_layer`, so unmatched paths still fall through to 404.
/// `router` must have at least one route.
pub fn guarded<S>(router: Router<S>, requirement: RouteRequirement) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if requirement.is_open() {
        return router;
    }
    router.route_layer(from_fn_with_state(Arc::new(requirement), enforce))
}
