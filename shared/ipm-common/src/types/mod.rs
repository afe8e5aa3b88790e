//! Shared Types

pub mod permission;
pub mod role;

pub use permission::{direct_permissions, Permission};
pub use role::Role;
