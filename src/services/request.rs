use crate::error::{ApiError, Result};
use crate::models::session::Session;
use crate::state::AppState;
use bytes::Bytes;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, Response, StatusCode};
use std::future::Future;
use std::time::Duration;

/// How often a failed request is re-attempted on top of the initial try.
pub const DEFAULT_RETRIES: u32 = 3;
/// Pause between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(2500);

/// Which slice of the backend's HTTP surface a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// The private JSON API the web UI itself runs on.
    V1Private,
    /// The documented public JSON API.
    V1Public,
    /// No prefix at all; the caller provides the full path. Used for the
    /// legacy HTML pages and the raw passthrough.
    Raw,
}

impl ApiVersion {
    /// The path prefix mounted in front of the request path.
    pub fn path_prefix(self) -> &'static str {
        match self {
            ApiVersion::V1Private => "/learn/api/v1",
            ApiVersion::V1Public => "/learn/api/public/v1",
            ApiVersion::Raw => "",
        }
    }
}

/// Per-request knobs for [`api_request`].
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Caller headers. These win over the defaults the executor adds.
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RequestOptions {
    /// Options carrying a session's cookies, the shape every authenticated
    /// extractor starts from.
    pub fn authenticated(session: &Session) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, cookie_header_value(session)?);
        Ok(Self {
            headers,
            ..Self::default()
        })
    }
}

/// Renders a session as a `Cookie` header value.
pub fn cookie_header_value(session: &Session) -> Result<HeaderValue> {
    HeaderValue::from_str(&session.cookie_header())
        .map_err(|_| ApiError::ServerError("session cookies do not form a valid header".to_string()))
}

/// Runs `attempt` until it succeeds, the error is final, or the retry
/// budget is spent. The closure is invoked at most `retries + 1` times.
pub async fn with_retries<T, F, Fut>(retries: u32, delay: Duration, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut remaining = retries;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_retryable() && remaining > 0 => {
                remaining -= 1;
                tracing::warn!(
                    "Attempt failed ({}), retrying in {:?} ({} retries left)",
                    error,
                    delay,
                    remaining
                );
                tokio::time::sleep(delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}

/// Sends a request to the Blackboard backend.
///
/// Default `pragma`/`cache-control`/`content-type` headers are merged in
/// under the caller's, transport failures are retried per the options, and
/// the two definitive rejections are lifted into errors: `401` means the
/// session is dead and `404` means the resource does not exist, and neither
/// gets better by asking again. Every other status is handed back as-is so
/// callers can interpret (or relay) the response themselves.
///
/// # Arguments
///
/// * `state` - The application's state.
/// * `api` - Which API surface the path lives under.
/// * `path` - Path below the surface's prefix, including any query string.
/// * `options` - Method, headers, body and retry policy.
///
/// # Returns
///
/// A `Result` containing the backend's response.
pub async fn api_request(
    state: &AppState,
    api: ApiVersion,
    path: &str,
    options: RequestOptions,
) -> Result<Response> {
    let RequestOptions {
        method,
        headers,
        body,
        retries,
        retry_delay,
    } = options;

    let url = format!("{}{}{}", state.config.base_url, api.path_prefix(), path);

    let mut merged = HeaderMap::new();
    merged.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    merged.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    merged.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    for (name, value) in headers.iter() {
        merged.insert(name, value.clone());
    }

    let client = state.http.clone();
    with_retries(retries, retry_delay, || {
        let mut request = client
            .request(method.clone(), url.as_str())
            .headers(merged.clone());
        if let Some(body) = &body {
            request = request.body(body.clone());
        }
        async move {
            let response = request.send().await?;
            match response.status() {
                StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
                StatusCode::NOT_FOUND => Err(ApiError::NotFound),
                _ => Ok(response),
            }
        }
    })
    .await
}

/// Fetches a path and parses the body as JSON.
///
/// Extractors never trust the backend's `content-type`; the body either
/// parses or the whole call is an upstream fault.
pub async fn fetch_json(
    state: &AppState,
    session: &Session,
    api: ApiVersion,
    path: &str,
) -> Result<sonic_rs::Value> {
    let options = RequestOptions::authenticated(session)?;
    let response = api_request(state, api, path, options).await?;
    let body = response.text().await?;
    sonic_rs::from_str(&body).map_err(|e| {
        ApiError::ServerError(format!("backend sent invalid JSON for {path}: {e}"))
    })
}
