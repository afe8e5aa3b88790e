//! Response tree traversal.

use serde_json::{Map, Value};

use super::error::MaskError;
use super::plain::Plainable;
use super::visibility::{InvestorVisibility, VisibilityRule};
use crate::auth::Viewer;

/// Deepest level the masker descends to. Nodes below it are returned as-is.
///
/// Stands in for cycle detection on graphs that serialize without bound.
pub const MAX_MASK_DEPTH: usize = 10;

/// Who is looking, and from which project.
#[derive(Debug, Clone, Copy)]
pub struct MaskContext<'a> {
    pub viewer: &'a Viewer,
    pub project_id: Option<&'a str>,
}

/// Keys holding storage-layer internals (`$`-operators, `__v`, `_doc`).
/// Copied through, never traversed.
fn is_internal_key(key: &str) -> bool {
    key.starts_with('$') || key.starts_with("__") || key == "_doc"
}

/// Walks response bodies and applies a [`VisibilityRule`] to every object.
pub struct PrivacyMasker {
    rule: Box<dyn VisibilityRule>,
}

impl Default for PrivacyMasker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PrivacyMasker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivacyMasker").finish_non_exhaustive()
    }
}

impl PrivacyMasker {
    /// Masker applying the investor visibility rule.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rule(InvestorVisibility)
    }

    /// Masker applying a custom rule.
    #[must_use]
    pub fn with_rule(rule: impl VisibilityRule + 'static) -> Self {
        Self {
            rule: Box::new(rule),
        }
    }

    /// Mask `body` for `viewer`, failing open.
    ///
    /// Without a viewer the body is returned untouched. If masking fails the
    /// error is logged and the original, unmasked body is returned.
    pub fn mask(&self, body: Value, viewer: Option<&Viewer>, project_id: Option<&str>) -> Value {
        let Some(viewer) = viewer else {
            return body;
        };

        let ctx = MaskContext { viewer, project_id };
        match self.try_mask(body.clone(), &ctx) {
            Ok(masked) => masked,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    viewer_id = %viewer.id,
                    project_id = ?project_id,
                    "privacy masking failed, returning unmasked body"
                );
                body
            }
        }
    }

    /// Mask `body`, propagating the first error.
    pub fn try_mask(&self, body: Value, ctx: &MaskContext<'_>) -> Result<Value, MaskError> {
        self.mask_node(body, ctx, 0)
    }

    /// Normalize a storage value to plain data, then mask it failing open.
    ///
    /// Only the conversion can fail; masking errors fall back to the
    /// converted, unmasked value.
    pub fn mask_plain<T: Plainable + ?Sized>(
        &self,
        doc: &T,
        viewer: Option<&Viewer>,
        project_id: Option<&str>,
    ) -> Result<Value, MaskError> {
        let plain = doc.to_plain()?;
        Ok(self.mask(plain, viewer, project_id))
    }

    fn mask_node(&self, node: Value, ctx: &MaskContext<'_>, depth: usize) -> Result<Value, MaskError> {
        if depth > MAX_MASK_DEPTH {
            return Ok(node);
        }

        match node {
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.mask_node(item, ctx, depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => {
                let map = self.rule.apply(map, ctx)?;
                self.mask_members(map, ctx, depth).map(Value::Object)
            }
            scalar => Ok(scalar),
        }
    }

    fn mask_members(
        &self,
        map: Map<String, Value>,
        ctx: &MaskContext<'_>,
        depth: usize,
    ) -> Result<Map<String, Value>, MaskError> {
        let mut out = Map::with_capacity(map.len());
        for (key, value) in map {
            let value = if !is_internal_key(&key) && (value.is_array() || value.is_object()) {
                self.mask_node(value, ctx, depth + 1)?
            } else {
                value
            };
            out.insert(key, value);
        }
        Ok(out)
    }
}
