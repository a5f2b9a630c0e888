use crate::config::Config;
use crate::error::Result;

/// Browser identity presented to the backend. The SSO frontend serves a
/// different login flow to clients it does not recognize.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/105.0.0.0 Safari/537.36";

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// Shared HTTP client for talking to the backend.
    pub http: reqwest::Client,
    /// The application's configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: &Config) -> Result<Self> {
        // Redirects are never followed implicitly: a redirect from the
        // backend means the session died, and that has to stay visible to
        // the caller instead of being silently resolved.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(USER_AGENT)
            .build()?;
        tracing::info!("✅ HTTP client initialized (redirects disabled)");

        Ok(AppState {
            http,
            config: config.clone(),
        })
    }
}
