//! Response masking middleware.

use std::collections::HashMap;

use axum::{
    body::{to_bytes, Body},
    extract::{Query, RawPathParams, Request, State},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::api::AppState;
use crate::auth::Viewer;

/// Path parameter naming the project a response is viewed from.
pub const PROJECT_PATH_PARAM: &str = "project_id";

/// Query parameter fallback for routes without a project path segment.
pub const PROJECT_QUERY_PARAM: &str = "projectId";

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

fn project_from(
    path: Option<&RawPathParams>,
    query: Option<&HashMap<String, String>>,
) -> Option<String> {
    path.and_then(|params| {
        params
            .iter()
            .find(|(key, _)| *key == PROJECT_PATH_PARAM)
            .map(|(_, value)| value.to_string())
    })
    .or_else(|| query.and_then(|q| q.get(PROJECT_QUERY_PARAM).cloned()))
}

/// Middleware that privacy-masks JSON responses for the current viewer.
///
/// Must run after routing (`route_layer`) so path parameters are available,
/// and inside [`attach_viewer`](crate::auth::attach_viewer). Every JSON body
/// sent to a viewer is masked, whatever its status or size. Only anonymous
/// requests and non-JSON bodies pass through untouched.
#[tracing::instrument(skip_all)]
pub async fn mask_response(
    State(state): State<AppState>,
    viewer: Option<Viewer>,
    path: Result<RawPathParams, axum::extract::rejection::RawPathParamsRejection>,
    query: Result<Query<HashMap<String, String>>, axum::extract::rejection::QueryRejection>,
    request: Request,
    next: Next,
) -> Response {
    let project_id = project_from(path.as_ref().ok(), query.as_ref().ok().map(|q| &q.0));

    let response = next.run(request).await;

    let Some(viewer) = viewer else {
        return response;
    };

    if !is_json(response.headers()) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    // No size cap. Only a failing handler stream errors here.
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "response body failed while buffering for masking");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let body: Value = match serde_json::from_slice(&bytes) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(error = %e, "JSON response did not parse, sending unmasked");
            return Response::from_parts(parts, Body::from(bytes));
        }
    };

    let masked = state
        .masker
        .mask(body, Some(&viewer), project_id.as_deref());

    match serde_json::to_vec(&masked) {
        Ok(out) => {
            parts.headers.remove(CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(out))
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to encode masked response, sending unmasked");
            Response::from_parts(parts, Body::from(bytes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_json_content_type_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(is_json(&headers));

        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(is_json(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!is_json(&headers));
    }

    #[test]
    fn test_project_from_query_fallback() {
        let query: HashMap<String, String> =
            [(PROJECT_QUERY_PARAM.to_string(), "p9".to_string())].into();
        assert_eq!(project_from(None, Some(&query)), Some("p9".into()));
        assert_eq!(project_from(None, None), None);
    }
}
