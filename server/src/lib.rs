//! IPM Server
//!
//! Authorization and privacy masking for investment project management:
//! per-route role and permission gates ahead of handlers, and per-viewer
//! redaction of investor records in every JSON response.

pub mod api;
pub mod approvals;
pub mod auth;
pub mod config;
pub mod observability;
pub mod permissions;
pub mod privacy;
