//! Permission system.
//!
//! - Resolution: effective permission sets from the shared catalog
//! - Gates: per-route role and permission checks run before handlers

pub mod guard;
pub mod resolver;

pub use guard::{
    authorize, authorize_permission, authorize_role, enforce, guarded, AuthzError,
    RouteRequirement,
};
pub use ipm_common::{Permission, Role};
pub use resolver::{has_any_permission, resolve_permissions, resolve_role_name};
