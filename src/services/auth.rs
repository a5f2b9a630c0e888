use crate::error::{ApiError, Result};
use crate::models::session::{ROUTER_COOKIE, RouterProperties, Session, SessionLifetime};
use crate::services::request::{self, ApiVersion, RequestOptions};
use crate::state::{AppState, USER_AGENT};
use reqwest::Method;
use reqwest::cookie::CookieStore;
use reqwest::header::{self, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use url::Url;
use zeroize::Zeroizing;

/// How many redirect hops a login round may take. The SSO handshake needs
/// four (portal, SSO frontend, credential check, portal again); anything
/// beyond five is a loop.
const LOGIN_REDIRECT_LIMIT: usize = 5;

/// A flat cookie jar for the login handshake.
///
/// The SSO flow bounces between the portal and the identity provider, and
/// cookies set on either host must be readable afterwards. The stock jar
/// keeps its contents private, so this one records every cookie it sees,
/// ignoring host and path scoping on purpose.
#[derive(Debug, Default)]
struct LoginCookieJar {
    cookies: Mutex<BTreeMap<String, String>>,
}

impl LoginCookieJar {
    fn new() -> Self {
        Self::default()
    }

    /// Copies out everything collected during the handshake.
    fn snapshot(&self) -> BTreeMap<String, String> {
        self.cookies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl CookieStore for LoginCookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, _url: &Url) {
        let mut store = self
            .cookies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for raw in cookie_headers {
            let Ok(raw) = raw.to_str() else { continue };
            if let Ok(parsed) = cookie::Cookie::parse(raw) {
                store.insert(parsed.name().to_string(), parsed.value().to_string());
            }
        }
    }

    fn cookies(&self, _url: &Url) -> Option<HeaderValue> {
        let store = self
            .cookies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if store.is_empty() {
            return None;
        }
        let joined = store
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        HeaderValue::from_str(&joined).ok()
    }
}

/// The part of the username before the `@`, lowercased. The SSO backend
/// wants the bare account name alongside the full address.
fn normalized_username(username: &str) -> String {
    username
        .split('@')
        .next()
        .unwrap_or(username)
        .to_lowercase()
}

/// Authenticates a user against the SSO frontend.
///
/// Walks the real browser flow: load the portal (which redirects to the
/// identity provider and seeds the handshake cookies), submit the
/// credential form to the provider's origin, and follow the redirects
/// back. Landing under the portal's own URL means the credentials were
/// accepted; landing anywhere else means they were not.
///
/// # Arguments
///
/// * `state` - The application's state.
/// * `username` - The full institutional address the user typed.
/// * `password` - The password. Wiped from memory when this returns.
///
/// # Returns
///
/// A `Result` containing the new `Session`, or `None` when the backend
/// turned the credentials down.
pub async fn authenticate(
    state: &AppState,
    username: &str,
    password: String,
) -> Result<Option<Session>> {
    let password = Zeroizing::new(password);
    tracing::debug!("🔐 Authenticating {} against {}", username, state.config.base_url);

    // A throwaway client per login: redirects on, cookie jar empty.
    let jar = Arc::new(LoginCookieJar::new());
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(LOGIN_REDIRECT_LIMIT))
        .cookie_provider(Arc::clone(&jar))
        .user_agent(USER_AGENT)
        .build()?;

    // The portal's root redirects to whatever SSO frontend is live today;
    // its origin is where the credential form must be posted.
    let login_page = client.get(state.config.base_url.as_str()).send().await?;
    let sso_origin = login_page.url().origin().ascii_serialization();

    let local_part = normalized_username(username);
    let response = client
        .post(format!("{sso_origin}/oam/server/auth_cred_submit"))
        .form(&[
            ("usernameH", username),
            ("username", local_part.as_str()),
            ("password", password.as_str()),
            ("submit", ""),
        ])
        .send()
        .await?;

    if !response.url().as_str().starts_with(&state.config.base_url) {
        tracing::info!(
            "❌ Login rejected for {} (landed on {})",
            username,
            response.url().origin().ascii_serialization()
        );
        return Ok(None);
    }

    let mut session = Session::new();
    for (name, value) in jar.snapshot() {
        session.insert(&name, &value);
    }

    // Accepted credentials with no identity cookies would produce a token
    // that fails on first use. Call that a rejection here instead.
    if session.is_empty() {
        tracing::warn!("❌ Login for {} landed correctly but set no session cookies", username);
        return Ok(None);
    }

    tracing::info!("✅ Authenticated {} ({} session cookies)", username, session.len());
    Ok(Some(session))
}

/// Refreshes a session's cookies, extending its lifetime.
///
/// Pokes the backend's inactivity probe, which both resets the idle timer
/// and rotates cookies close to expiry. The rotated cookies are merged
/// over the old ones; a cookie the backend did not re-send stays valid and
/// stays put.
///
/// # Arguments
///
/// * `state` - The application's state.
/// * `session` - The session to refresh. Left untouched.
///
/// # Returns
///
/// A `Result` containing the refreshed `Session` and its new lifetime, or
/// `None` when the backend answered without a usable router cookie.
pub async fn refresh(
    state: &AppState,
    session: &Session,
) -> Result<Option<(Session, SessionLifetime)>> {
    // The probe rejects anything without a matching anti-forgery token, so
    // a session that cannot produce one is already dead.
    let router = session.get(ROUTER_COOKIE).ok_or(ApiError::Unauthorized)?;
    let xsrf = RouterProperties::parse(router)
        .xsrf()
        .map(str::to_owned)
        .ok_or(ApiError::Unauthorized)?;

    let mut options = RequestOptions::authenticated(session)?;
    options.method = Method::POST;
    options.headers.insert(
        HeaderName::from_static("x-blackboard-xsrf"),
        HeaderValue::from_str(&xsrf).map_err(|_| ApiError::Unauthorized)?,
    );

    let response =
        request::api_request(state, ApiVersion::V1Private, "/utilities/timeUntilInactive", options)
            .await?;

    let set_cookies: Vec<String> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok().map(str::to_owned))
        .collect();

    // The probe answers a tiny JSON document. Anything else (an HTML error
    // page, an empty body) means we are not talking to the API anymore.
    let body = response.text().await?;
    sonic_rs::from_str::<sonic_rs::Value>(&body).map_err(|_| {
        ApiError::ServerError("session probe answered with a non-JSON body".to_string())
    })?;

    let refreshed = session.merged_with_set_cookies(set_cookies.iter().map(String::as_str));
    let Some(lifetime) = refreshed.lifetime() else {
        tracing::warn!("❌ Refresh left no usable router cookie");
        return Ok(None);
    };

    tracing::debug!("✅ Session refreshed (expires at {})", lifetime.expires_at);
    Ok(Some((refreshed, lifetime)))
}
