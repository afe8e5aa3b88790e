//! Privacy masking.
//!
//! Responses are walked after the handler runs and every investor-shaped
//! node is redacted according to the viewer's relationship to it:
//! - self: full record
//! - admin tier: full record plus the anonymity flag
//! - peer of an anonymous investor: narrow projection
//! - peer of a visible investor: full record
//!
//! Masking fails open. On an internal error the unmasked body is returned
//! and the failure is logged, so a bug in this module cannot take responses
//! down with it. Revisit this if the threat model changes.

mod engine;
mod error;
pub mod layer;
mod plain;
pub mod visibility;

pub use engine::{MaskContext, PrivacyMasker, MAX_MASK_DEPTH};
pub use error::MaskError;
pub use layer::mask_response;
pub use plain::Plainable;
pub use visibility::{
    is_investor_record, visibility_for, InvestorVisibility, PrivacySetting, VisibilityLevel,
    VisibilityRule,
};
