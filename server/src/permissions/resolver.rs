//! Permission resolution logic.
//!
//! Computes the effective permission set of a role from the catalog's direct
//! grants and the role inheritance chain.

use std::collections::HashSet;

use ipm_common::{direct_permissions, Permission, Role};

/// Compute the effective permissions for a role.
///
/// Resolution order:
/// 1. `super_admin` holds the whole catalog, without a table lookup
/// 2. Start with the role's direct grants
/// 3. Add the direct grants of every role it inherits from
pub fn resolve_permissions(role: Role) -> HashSet<Permission> {
    if role == Role::SuperAdmin {
        return Permission::all().iter().copied().collect();
    }

    let mut perms: HashSet<Permission> = direct_permissions(role).iter().copied().collect();

    for inherited in role.inherits_from() {
        perms.extend(direct_permissions(*inherited).iter().copied());
    }

    perms
}

/// Compute the effective permissions for a role given by name.
///
/// Unknown role names resolve to the empty set.
pub fn resolve_role_name(name: &str) -> HashSet<Permission> {
    name.parse::<Role>()
        .map(resolve_permissions)
        .unwrap_or_default()
}

/// Whether the role holds at least one of `required`.
pub fn has_any_permission(role: Role, required: &[Permission]) -> bool {
    if role == Role::SuperAdmin {
        return true;
    }

    let held = resolve_permissions(role);
    required.iter().any(|perm| held.contains(perm))
}
