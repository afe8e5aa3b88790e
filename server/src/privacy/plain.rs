//! Normalization of storage values to plain JSON.

use serde::Serialize;
use serde_json::Value;

use super::error::MaskError;

/// Conversion of a storage-layer value into plain data before masking.
///
/// Implemented for every `Serialize` type; document wrappers control their
/// plain shape through their `Serialize` impl. Timestamps and binary payloads
/// come out as JSON scalars or byte arrays and are never treated as records.
pub trait Plainable {
    fn to_plain(&self) -> Result<Value, MaskError>;
}

impl<T: Serialize + ?Sized> Plainable for T {
    fn to_plain(&self) -> Result<Value, MaskError> {
        Ok(serde_json::to_value(self)?)
    }
}
