//! Authentication
//!
//! Establishes the `Viewer` for a request from a Bearer access token. Token
//! issuance and sessions live outside this service.

mod error;
pub mod jwt;
mod middleware;

pub use error::{AuthError, AuthResult, ErrorResponse};
pub use middleware::{attach_viewer, require_auth, Viewer};
