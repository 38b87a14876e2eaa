use doodlesync_transport::TransportConfig;

use crate::SessionError;

/// Environment variable overriding [`SessionConfig::api_base_url`].
pub const API_URL_ENV: &str = "DOODLESYNC_API_URL";
/// Environment variable overriding [`SessionConfig::ws_base_url`].
pub const WS_URL_ENV: &str = "DOODLESYNC_WS_URL";

/// Where the game server lives and how to talk to it.
///
/// Defaults target a server on `localhost:8000`:
///
/// ```rust
/// use doodlesync_session::SessionConfig;
///
/// let config = SessionConfig::default();
/// assert_eq!(config.api_base_url, "http://localhost:8000");
/// assert_eq!(config.ws_base_url, "ws://localhost:8000");
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the request/response API.
    pub api_base_url: String,
    /// Base URL of the persistent connection (`/ws/...` is appended).
    pub ws_base_url: String,
    pub transport: TransportConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            ws_base_url: "ws://localhost:8000".to_string(),
            transport: TransportConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Defaults, overridden by `DOODLESYNC_API_URL` / `DOODLESYNC_WS_URL`
    /// when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.api_base_url = url;
        }
        if let Ok(url) = std::env::var(WS_URL_ENV) {
            config.ws_base_url = url;
        }
        config
    }

    /// Trims whitespace and trailing slashes and checks both URLs have a
    /// plausible scheme.
    ///
    /// # Errors
    /// Returns `SessionError::Config` naming the offending URL.
    pub fn validated(mut self) -> Result<Self, SessionError> {
        self.api_base_url = normalize(&self.api_base_url);
        self.ws_base_url = normalize(&self.ws_base_url);

        if !has_scheme(&self.api_base_url, &["http://", "https://"]) {
            return Err(SessionError::Config(format!(
                "api base URL must be http(s): {:?}",
                self.api_base_url
            )));
        }
        if !has_scheme(&self.ws_base_url, &["ws://", "wss://"]) {
            return Err(SessionError::Config(format!(
                "ws base URL must be ws(s): {:?}",
                self.ws_base_url
            )));
        }
        Ok(self)
    }
}

fn normalize(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn has_scheme(url: &str, schemes: &[&str]) -> bool {
    schemes
        .iter()
        .any(|s| url.len() > s.len() && url.starts_with(s))
}
