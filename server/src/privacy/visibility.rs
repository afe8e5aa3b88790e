//! Investor visibility rule.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::engine::MaskContext;
use super::error::MaskError;
use crate::auth::Viewer;

/// `role` value that marks a response node as an investor entry.
pub const INVESTOR_TAG: &str = "investor";

/// Name shown for anonymous investors without a display name.
pub const ANONYMOUS_DISPLAY_NAME: &str = "Anonymous Investor";

/// E-mail placeholder shown for anonymous investors.
pub const MASKED_EMAIL: &str = "hidden@anonymous.investor";

/// Redaction tier applied to one investor record for one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityLevel {
    /// Self, or a peer who chose to be visible.
    Full,
    /// Admin-tier viewer; full data plus the anonymity flag.
    Admin,
    /// Non-admin peer viewing an anonymous investor.
    Anonymous,
}

impl VisibilityLevel {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Admin => "admin",
            Self::Anonymous => "anonymous",
        }
    }
}

/// Per-project privacy configuration of an investor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySetting {
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub show_investment_amount: Option<bool>,
}

/// Whether a response node is an investor entry subject to masking.
///
/// Response trees are untyped, so the record kind is inferred from shape: a
/// `role` of `"investor"` and a non-empty `privacySettings` object. Every
/// masking decision goes through this one predicate.
pub fn is_investor_record(node: &Map<String, Value>) -> bool {
    node.get("role").and_then(Value::as_str) == Some(INVESTOR_TAG)
        && node
            .get("privacySettings")
            .and_then(Value::as_object)
            .is_some_and(|settings| !settings.is_empty())
}

fn record_id(record: &Map<String, Value>) -> Option<&Value> {
    record.get("id").or_else(|| record.get("_id"))
}

fn id_matches(id: &Value, viewer_id: &str) -> bool {
    match id {
        Value::String(s) => s == viewer_id,
        Value::Number(n) => n.to_string() == viewer_id,
        _ => false,
    }
}

fn privacy_setting(
    record: &Map<String, Value>,
    project_id: Option<&str>,
) -> Result<PrivacySetting, MaskError> {
    let Some(project_id) = project_id else {
        return Ok(PrivacySetting::default());
    };

    let entry = record
        .get("privacySettings")
        .and_then(Value::as_object)
        .and_then(|settings| settings.get(project_id));

    match entry {
        None | Some(Value::Null) => Ok(PrivacySetting::default()),
        Some(value @ Value::Object(_)) => {
            PrivacySetting::deserialize(value).map_err(|e| MaskError::MalformedPrivacySettings {
                project_id: project_id.to_string(),
                reason: e.to_string(),
            })
        }
        Some(other) => Err(MaskError::MalformedPrivacySettings {
            project_id: project_id.to_string(),
            reason: format!("expected an object, found {other}"),
        }),
    }
}

fn annotate(
    mut record: Map<String, Value>,
    is_anonymous: bool,
    is_self: bool,
    level: VisibilityLevel,
) -> Map<String, Value> {
    record.insert("isAnonymous".into(), Value::Bool(is_anonymous));
    record.insert("isSelf".into(), Value::Bool(is_self));
    record.insert("visibilityLevel".into(), Value::from(level.as_str()));
    record
}

/// Narrow projection shown to peers of an anonymous investor.
///
/// Built from scratch so unlisted fields of the record cannot leak.
fn anonymous_projection(record: &Map<String, Value>, setting: &PrivacySetting) -> Map<String, Value> {
    let name = setting
        .display_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(ANONYMOUS_DISPLAY_NAME);

    let total_invested = if setting.show_investment_amount == Some(true) {
        record.get("totalInvested").cloned().unwrap_or(Value::Null)
    } else {
        Value::Null
    };

    let mut projection = Map::new();
    projection.insert("id".into(), record_id(record).cloned().unwrap_or(Value::Null));
    projection.insert("name".into(), Value::from(name));
    projection.insert("email".into(), Value::from(MASKED_EMAIL));
    projection.insert("avatar".into(), Value::Null);
    projection.insert("totalInvested".into(), total_invested);
    annotate(projection, true, false, VisibilityLevel::Anonymous)
}

/// Redact one investor record for one viewer.
///
/// - self: `full`, never anonymous
/// - admin tier: `admin`, full data with the anonymity flag
/// - peer of an anonymous investor: `anonymous` projection
/// - peer of a visible investor: `full`
///
/// The anonymity flag comes from `privacySettings[project_id]`; with no
/// project in context, or no entry for it, the investor is visible.
pub fn visibility_for(
    record: Map<String, Value>,
    project_id: Option<&str>,
    viewer: &Viewer,
    is_viewer_admin_tier: bool,
) -> Result<Map<String, Value>, MaskError> {
    if record_id(&record).is_some_and(|id| id_matches(id, &viewer.id)) {
        return Ok(annotate(record, false, true, VisibilityLevel::Full));
    }

    let setting = privacy_setting(&record, project_id)?;

    if is_viewer_admin_tier {
        return Ok(annotate(
            record,
            setting.is_anonymous,
            false,
            VisibilityLevel::Admin,
        ));
    }

    if setting.is_anonymous {
        Ok(anonymous_projection(&record, &setting))
    } else {
        Ok(annotate(record, false, false, VisibilityLevel::Full))
    }
}

/// Rule applied by the masker to every object node.
///
/// Implementations return the node unchanged when it is not theirs to mask.
pub trait VisibilityRule: Send + Sync {
    fn apply(
        &self,
        node: Map<String, Value>,
        ctx: &MaskContext<'_>,
    ) -> Result<Map<String, Value>, MaskError>;
}

/// The investor visibility rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvestorVisibility;

impl VisibilityRule for InvestorVisibility {
    fn apply(
        &self,
        node: Map<String, Value>,
        ctx: &MaskContext<'_>,
    ) -> Result<Map<String, Value>, MaskError> {
        if !is_investor_record(&node) {
            return Ok(node);
        }
        visibility_for(node, ctx.project_id, ctx.viewer, ctx.viewer.is_admin_tier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipm_common::Role;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn stealth_investor() -> Map<String, Value> {
        object(json!({
            "id": "u3",
            "role": "investor",
            "name": "Real Name",
            "email": "real@example.com",
            "avatar": "https://cdn.example.com/u3.png",
            "phone": "+1 555 0100",
            "totalInvested": 2500,
            "privacySettings": {
                "p1": {
                    "isAnonymous": true,
                    "displayName": "Stealth",
                    "showInvestmentAmount": false
                }
            }
        }))
    }

    #[test]
    fn test_investor_predicate() {
        assert!(is_investor_record(&stealth_investor()));
        assert!(!is_investor_record(&object(json!({
            "role": "investor",
            "privacySettings": {}
        }))));
        assert!(!is_investor_record(&object(json!({
            "role": "admin",
            "privacySettings": { "p1": { "isAnonymous": true } }
        }))));
        assert!(!is_investor_record(&object(json!({ "role": "investor" }))));
    }

    #[test]
    fn test_self_sees_full_record_even_when_anonymous() {
        let record = object(json!({
            "id": "u1",
            "role": "investor",
            "email": "me@example.com",
            "privacySettings": { "p1": { "isAnonymous": true } }
        }));
        let viewer = Viewer::new("u1", Role::Investor);

        let out = visibility_for(record, Some("p1"), &viewer, false).unwrap();

        assert_eq!(out["isSelf"], json!(true));
        assert_eq!(out["isAnonymous"], json!(false));
        assert_eq!(out["visibilityLevel"], json!("full"));
        assert_eq!(out["email"], json!("me@example.com"));
    }

    #[test]
    fn test_anonymous_peer_gets_projection() {
        let viewer = Viewer::new("other", Role::Investor);

        let out = visibility_for(stealth_investor(), Some("p1"), &viewer, false).unwrap();

        assert_eq!(
            Value::Object(out),
            json!({
                "id": "u3",
                "name": "Stealth",
                "email": MASKED_EMAIL,
                "avatar": null,
                "totalInvested": null,
                "isAnonymous": true,
                "isSelf": false,
                "visibilityLevel": "anonymous"
            })
        );
    }

    #[test]
    fn test_anonymous_peer_sees_amount_when_allowed() {
        let record = object(json!({
            "_id": "u4",
            "role": "investor",
            "totalInvested": 900,
            "privacySettings": {
                "p1": { "isAnonymous": true, "showInvestmentAmount": true }
            }
        }));
        let viewer = Viewer::new("other", Role::Investor);

        let out = visibility_for(record, Some("p1"), &viewer, false).unwrap();

        assert_eq!(out["id"], json!("u4"));
        assert_eq!(out["name"], json!(ANONYMOUS_DISPLAY_NAME));
        assert_eq!(out["totalInvested"], json!(900));
        assert!(!out.contains_key("_id"));
        assert!(!out.contains_key("privacySettings"));
    }

    #[test]
    fn test_admin_sees_identity_of_anonymous_investor() {
        let viewer = Viewer::new("boss", Role::Admin);

        let out = visibility_for(stealth_investor(), Some("p1"), &viewer, true).unwrap();

        assert_eq!(out["visibilityLevel"], json!("admin"));
        assert_eq!(out["isAnonymous"], json!(true));
        assert_eq!(out["isSelf"], json!(false));
        assert_eq!(out["name"], json!("Real Name"));
        assert_eq!(out["email"], json!("real@example.com"));
        assert_eq!(out["totalInvested"], json!(2500));
    }

    #[test]
    fn test_visible_peer_gets_full_record() {
        let viewer = Viewer::new("other", Role::Investor);

        let out = visibility_for(stealth_investor(), Some("p2"), &viewer, false).unwrap();

        assert_eq!(out["visibilityLevel"], json!("full"));
        assert_eq!(out["isAnonymous"], json!(false));
        assert_eq!(out["email"], json!("real@example.com"));
    }

    #[test]
    fn test_no_project_context_is_visible() {
        let viewer = Viewer::new("other", Role::Investor);
        let out = visibility_for(stealth_investor(), None, &viewer, false).unwrap();
        assert_eq!(out["visibilityLevel"], json!("full"));
    }

    #[test]
    fn test_numeric_id_self_match() {
        let record = object(json!({
            "id": 42,
            "role": "investor",
            "privacySettings": { "p1": { "isAnonymous": true } }
        }));
        let viewer = Viewer::new("42", Role::Investor);
        let out = visibility_for(record, Some("p1"), &viewer, false).unwrap();
        assert_eq!(out["isSelf"], json!(true));
    }

    #[test]
    fn test_malformed_entry_is_error() {
        let record = object(json!({
            "id": "u5",
            "role": "investor",
            "privacySettings": { "p1": "yes" }
        }));
        let viewer = Viewer::new("other", Role::Investor);

        let err = visibility_for(record, Some("p1"), &viewer, false).unwrap_err();
        assert!(matches!(err, MaskError::MalformedPrivacySettings { .. }));
    }

    #[test]
    fn test_rule_ignores_non_investor_nodes() {
        let node = object(json!({ "id": "p1", "title": "Solar farm" }));
        let viewer = Viewer::new("other", Role::Investor);
        let ctx = MaskContext {
            viewer: &viewer,
            project_id: Some("p1"),
        };

        let out = InvestorVisibility.apply(node.clone(), &ctx).unwrap();
        assert_eq!(out, node);
    }

    #[test]
    fn test_rule_uses_viewer_admin_tier() {
        let viewer = Viewer::new("pa", Role::ProjectAdmin);
        let ctx = MaskContext {
            viewer: &viewer,
            project_id: Some("p1"),
        };

        let out = InvestorVisibility.apply(stealth_investor(), &ctx).unwrap();
        assert_eq!(out["visibilityLevel"], json!("admin"));
    }
}
