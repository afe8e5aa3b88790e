//! Common Error Types

use thiserror::Error;

/// Errors produced while parsing shared identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Role name is not part of the closed role enumeration.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Permission name is not part of the catalog.
    #[error("Unknown permission: {0}")]
    UnknownPermission(String),
}

/// Result alias for common operations.
pub type Result<T> = std::result::Result<T, Error>;
