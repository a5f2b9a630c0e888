use anyhow::{Context, Result};
use std::env;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// Root URL of the Blackboard deployment, without a trailing slash.
    pub base_url: String,
    /// Port the gateway listens on.
    pub port: u16,
    /// Name of the request header carrying the session token.
    pub token_header: String,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("BLACKBOARD_BASE_URL")
            .unwrap_or_else(|_| "https://bbhosted.cuny.edu".to_string());

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            port: env::var("WEBSERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("Invalid WEBSERVER_PORT")?,
            // Header names are matched lowercase by the HTTP layer.
            token_header: env::var("TOKEN_HEADER_NAME")
                .unwrap_or_else(|_| "token".to_string())
                .to_lowercase(),
        })
    }
}
