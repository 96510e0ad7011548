use crate::error::{Result, TeamCityError};
use std::env;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How the client identifies itself to the server
///
/// Credentials are passed through as-is; the client never negotiates them.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// Anonymous access through the `guestAuth` entry point
    #[default]
    Guest,
    /// HTTP basic authentication
    Basic { username: String, password: String },
    /// Access token sent as a bearer token
    Token(String),
}

impl Credentials {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }

    /// Path of the REST root relative to the server URL
    pub(crate) fn rest_prefix(&self) -> &'static str {
        match self {
            Self::Guest => "guestAuth/app/rest/",
            Self::Basic { .. } | Self::Token(_) => "app/rest/",
        }
    }
}

// Secrets stay out of logs and panic messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Guest => f.write_str("Guest"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::Token(_) => f.debug_tuple("Token").field(&"***").finish(),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server URL, e.g. `https://ci.example.com` or `http://host:8111/teamcity`
    pub base_url: String,
    pub credentials: Credentials,
    /// Request timeout applied when the crate builds its own HTTP client
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            credentials: Credentials::Guest,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read configuration from the process environment
    ///
    /// * `TEAMCITY_URL` - server URL (required)
    /// * `TEAMCITY_TOKEN` - access token; takes precedence over basic auth
    /// * `TEAMCITY_USERNAME` / `TEAMCITY_PASSWORD` - basic auth
    /// * `TEAMCITY_TIMEOUT_SECS` - request timeout, defaults to 30
    ///
    /// Without a token or username the client connects as guest.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("TEAMCITY_URL")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| TeamCityError::Config("TEAMCITY_URL is not set".to_string()))?;

        let credentials = match (
            lookup("TEAMCITY_TOKEN").filter(|v| !v.is_empty()),
            lookup("TEAMCITY_USERNAME").filter(|v| !v.is_empty()),
        ) {
            (Some(token), _) => Credentials::Token(token),
            (None, Some(username)) => {
                let password = lookup("TEAMCITY_PASSWORD").ok_or_else(|| {
                    TeamCityError::Config(
                        "TEAMCITY_PASSWORD is required when TEAMCITY_USERNAME is set".to_string(),
                    )
                })?;
                Credentials::Basic { username, password }
            }
            (None, None) => Credentials::Guest,
        };

        let timeout = match lookup("TEAMCITY_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map(Duration::from_secs).map_err(|_| {
                TeamCityError::Config(format!("TEAMCITY_TIMEOUT_SECS is not a number: {raw}"))
            })?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            base_url,
            credentials,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_env_requires_url() {
        let result = ClientConfig::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(TeamCityError::Config(_))));
    }

    #[test]
    fn test_from_env_guest_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[("TEAMCITY_URL", "http://ci")])).unwrap();
        assert_eq!(config.base_url, "http://ci");
        assert_eq!(config.credentials, Credentials::Guest);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_from_env_token_wins_over_basic() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("TEAMCITY_URL", "http://ci"),
            ("TEAMCITY_TOKEN", "abc"),
            ("TEAMCITY_USERNAME", "admin"),
            ("TEAMCITY_PASSWORD", "secret"),
            ("TEAMCITY_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.credentials, Credentials::token("abc"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_env_basic_needs_password() {
        let result = ClientConfig::from_lookup(lookup(&[
            ("TEAMCITY_URL", "http://ci"),
            ("TEAMCITY_USERNAME", "admin"),
        ]));
        assert!(result.is_err());

        let config = ClientConfig::from_lookup(lookup(&[
            ("TEAMCITY_URL", "http://ci"),
            ("TEAMCITY_USERNAME", "admin"),
            ("TEAMCITY_PASSWORD", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.credentials, Credentials::basic("admin", "secret"));
    }

    #[test]
    fn test_from_env_rejects_bad_timeout() {
        let result = ClientConfig::from_lookup(lookup(&[
            ("TEAMCITY_URL", "http://ci"),
            ("TEAMCITY_TIMEOUT_SECS", "soon"),
        ]));
        assert!(matches!(result, Err(TeamCityError::Config(_))));
    }

    #[test]
    fn test_credentials_debug_hides_secrets() {
        let rendered = format!("{:?}", Credentials::basic("admin", "hunter2"));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
        assert_eq!(format!("{:?}", Credentials::token("tok")), r#"Token("***")"#);
    }
}
