//! Permission Catalog API
//!
//! Read-only views of the catalog for clients that mirror it for display.
//! Clients must not treat these as authoritative.

use std::collections::HashSet;

use axum::Json;
use ipm_common::{direct_permissions, Permission, Role};
use serde::Serialize;

use crate::auth::Viewer;
use crate::permissions::resolve_permissions;

/// One catalog entry.
#[derive(Debug, Serialize)]
pub struct PermissionEntry {
    pub name: Permission,
    pub description: &'static str,
}

/// Direct grants and parents of a role.
#[derive(Debug, Serialize)]
pub struct RoleEntry {
    pub role: Role,
    pub inherits: &'static [Role],
    pub direct: &'static [Permission],
}

/// Public catalog response.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub permissions: Vec<PermissionEntry>,
    pub roles: Vec<RoleEntry>,
}

/// Effective permissions of one role.
#[derive(Debug, Serialize)]
pub struct ResolvedRole {
    pub role: Role,
    pub permissions: Vec<Permission>,
}

/// Role table response.
#[derive(Debug, Serialize)]
pub struct RoleTableResponse {
    pub roles: Vec<ResolvedRole>,
}

/// The caller's own effective permissions.
#[derive(Debug, Serialize)]
pub struct MyPermissionsResponse {
    pub id: String,
    pub role: Option<Role>,
    pub permissions: Vec<Permission>,
}

/// Catalog order, so responses are stable.
fn in_catalog_order(set: &HashSet<Permission>) -> Vec<Permission> {
    Permission::all()
        .iter()
        .copied()
        .filter(|perm| set.contains(perm))
        .collect()
}

/// Get the permission catalog (public endpoint).
///
/// GET /api/permissions
pub async fn get_catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        permissions: Permission::all()
            .iter()
            .map(|perm| PermissionEntry {
                name: *perm,
                description: perm.description(),
            })
            .collect(),
        roles: Role::all()
            .iter()
            .map(|role| RoleEntry {
                role: *role,
                inherits: role.inherits_from(),
                direct: direct_permissions(*role),
            })
            .collect(),
    })
}

/// Get the resolved permissions of every role (admin tier).
///
/// GET /api/roles
pub async fn get_role_table() -> Json<RoleTableResponse> {
    Json(RoleTableResponse {
        roles: Role::all()
            .iter()
            .map(|role| ResolvedRole {
                role: *role,
                permissions: in_catalog_order(&resolve_permissions(*role)),
            })
            .collect(),
    })
}

/// Get the caller's effective permissions.
///
/// GET /api/me/permissions
#[tracing::instrument(skip_all, fields(viewer_id = %viewer.id))]
pub async fn get_my_permissions(viewer: Viewer) -> Json<MyPermissionsResponse> {
    let permissions = viewer
        .role
        .map(|role| in_catalog_order(&resolve_permissions(role)))
        .unwrap_or_default();

    Json(MyPermissionsResponse {
        id: viewer.id,
        role: viewer.role,
        permissions,
    })
}
