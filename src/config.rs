//! Client credentials and connection settings.

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

/// Production API host.
pub const DEFAULT_API_URL: &str = "https://dnsimple.com";

/// Timeout applied to each HTTP exchange unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Account credentials sent with every request (HTTP Basic auth).
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let password = password.into();

        if username.is_empty() {
            return Err(Error::Configuration("username must not be empty".into()));
        }
        if password.is_empty() {
            return Err(Error::Configuration("password must not be empty".into()));
        }

        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"*********")
            .finish()
    }
}

/// Connection settings fixed at client construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Points the client at another API host (sandbox, local mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let trimmed = base_url.trim_end_matches('/');

        if trimmed.is_empty() {
            return Err(Error::Configuration("API URL must not be empty".into()));
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(Error::Configuration(format!(
                "API URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        self.base_url = trimmed.to_string();
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(Error::Configuration("timeout must be greater than zero".into()));
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Headers attached to every request.
    pub fn default_headers(&self) -> Vec<(String, String)> {
        vec![("Accept".to_string(), "application/json".to_string())]
    }
}

fn default_user_agent() -> String {
    format!("dnsimple-client/{}", env!("DNSIMPLE_CLIENT_VERSION"))
}
