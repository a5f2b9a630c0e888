use std::collections::BTreeMap;

/// Cookie names the backend actually checks when authorizing a request.
/// Everything else it sets (load balancer affinity, analytics beacons) is
/// dead weight and never crosses the gateway boundary.
pub const SIGNIFICANT_COOKIES: [&str; 3] = [
    "JSESSIONID",
    "BbRouter",
    "OAMAuthnCookie_bbhosted.cuny.edu_443",
];

/// The router cookie doubles as a property bag describing the session
/// itself (expiry, inactivity window, XSRF token).
pub const ROUTER_COOKIE: &str = "BbRouter";

/// An authenticated Blackboard session, held as the small set of cookies
/// that prove the user's identity to the backend.
///
/// A `Session` is never mutated once handed out; refreshing produces a new
/// value with the backend's replacement cookies merged in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    cookies: BTreeMap<String, String>,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the backend cares about a cookie with this name.
    pub fn is_significant(name: &str) -> bool {
        SIGNIFICANT_COOKIES.contains(&name)
    }

    /// Stores a cookie. Names outside the significant set are dropped, so a
    /// session can never accumulate cookies the backend ignores.
    pub fn insert(&mut self, name: &str, value: &str) {
        if Self::is_significant(name) {
            self.cookies.insert(name.to_string(), value.to_string());
        }
    }

    /// Returns the value of a cookie, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Renders the session as a `Cookie` request header value.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Produces a new session with `Set-Cookie` values from a backend
    /// response merged in. Cookies the backend did not re-send survive
    /// unchanged; a merge only ever adds or replaces.
    pub fn merged_with_set_cookies<'a>(&self, headers: impl Iterator<Item = &'a str>) -> Session {
        let mut merged = self.clone();
        for raw in headers {
            if let Ok(parsed) = cookie::Cookie::parse(raw) {
                merged.insert(parsed.name(), parsed.value());
            }
        }
        merged
    }

    /// Reads the session lifetime out of the router cookie, if the backend
    /// supplied one in a usable form.
    pub fn lifetime(&self) -> Option<SessionLifetime> {
        self.get(ROUTER_COOKIE)
            .and_then(|value| RouterProperties::parse(value).lifetime())
    }
}

/// How long a session will stay alive, in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLifetime {
    /// Inactivity window before the backend drops the session.
    pub age: i64,
    /// Absolute expiry of the session.
    pub expires_at: i64,
}

/// The property bag embedded in the router cookie.
///
/// The value is a comma-separated list of `key:value` entries, e.g.
/// `expires:1700000000,id:xyz,timeout:10800,xsrf:4f2a...`. Values may
/// themselves contain colons, so each entry splits on the first one only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterProperties {
    properties: BTreeMap<String, String>,
}

impl RouterProperties {
    /// Parses a raw router cookie value.
    pub fn parse(value: &str) -> Self {
        let mut properties = BTreeMap::new();
        for entry in value.split(',') {
            if let Some((key, value)) = entry.trim().split_once(':') {
                properties.insert(key.to_string(), value.to_string());
            }
        }
        Self { properties }
    }

    /// Returns a property value, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// The anti-forgery token the backend expects echoed on state-changing
    /// calls.
    pub fn xsrf(&self) -> Option<&str> {
        self.get("xsrf")
    }

    /// Derives the session lifetime from the `expires` and `timeout`
    /// properties. Both are seconds on the wire; both must be present and
    /// numeric for the lifetime to count as usable.
    pub fn lifetime(&self) -> Option<SessionLifetime> {
        let expires: i64 = self.get("expires")?.parse().ok()?;
        let timeout: i64 = self.get("timeout")?.parse().ok()?;
        Some(SessionLifetime {
            age: timeout * 1000,
            expires_at: expires * 1000,
        })
    }
}
