//! IPM Common Library
//!
//! Roles and the permission catalog shared by the server and any client that
//! mirrors them for display. Only the server treats this data as authoritative.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
