use axum::{
    Extension,
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, HeaderName, Method, header},
    response::{IntoResponse, Response},
};

use crate::{
    error::{ApiError, Result},
    models::session::Session,
    services::request::{ApiVersion, RequestOptions, api_request, cookie_header_value},
    state::AppState,
};

/// Prefix marking the caller headers that should be forwarded upstream.
/// Everything else on the inbound request (the token header, hop-by-hop
/// noise) stays on this side.
const FORWARD_HEADER_PREFIX: &str = "raw-";

/// Handles the raw passthrough.
///
/// Forwards the caller's method, path, query, marked headers and body to
/// the backend with the session cookies attached, and relays whatever
/// comes back, byte for byte, status and all. No retries: the caller sees
/// exactly one upstream exchange. Only paths under the backend's API
/// prefix are reachable; this is an API escape hatch, not an open proxy.
#[axum::debug_handler]
pub async fn passthrough(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    method: Method,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let mut target = format!("/{path}");
    if let Some(query) = query {
        target.push('?');
        target.push_str(&query);
    }

    if !target.starts_with("/learn/api") {
        return Err(ApiError::BadRequest(
            "Raw requests must target a /learn/api path.".to_string(),
        ));
    }

    let mut forward = HeaderMap::new();
    for (name, value) in headers.iter() {
        if let Some(stripped) = name.as_str().strip_prefix(FORWARD_HEADER_PREFIX) {
            if let Ok(name) = HeaderName::from_bytes(stripped.as_bytes()) {
                forward.insert(name, value.clone());
            }
        }
    }
    forward.insert(header::COOKIE, cookie_header_value(&session)?);

    tracing::debug!("🔀 Relaying {} {}", method, target);

    let options = RequestOptions {
        method,
        headers: forward,
        body: if body.is_empty() { None } else { Some(body) },
        retries: 0,
        ..RequestOptions::default()
    };
    let response = api_request(&state, ApiVersion::Raw, &target, options).await?;

    let status = response.status();
    let bytes = response.bytes().await?;
    Ok((status, bytes).into_response())
}
