use thiserror::Error;

/// Result type for TeamCity client operations
pub type Result<T> = std::result::Result<T, TeamCityError>;

/// Errors that can occur when talking to the TeamCity REST API
#[derive(Error, Debug)]
pub enum TeamCityError {
    /// Server answered with a non-success status
    #[error("Error '{status}' when performing '{operation}': {body}")]
    Request {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// Request or response body was not valid JSON for the expected type
    #[error("Failed to (de)serialize JSON for '{operation}': {source}")]
    Serialization {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// HTTP transport failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL provided or derived
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Missing or malformed configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TeamCityError {
    pub(crate) fn request(operation: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self::Request {
            operation,
            status,
            body: body.into(),
        }
    }

    pub(crate) fn serialization(operation: &'static str, source: serde_json::Error) -> Self {
        Self::Serialization { operation, source }
    }

    /// Name of the operation the error is tagged with, if any
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Request { operation, .. } | Self::Serialization { operation, .. } => {
                Some(*operation)
            }
            _ => None,
        }
    }

    /// HTTP status of a rejected request
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if error is a 404 Not Found
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Request { status: 404, .. })
    }

    /// Check if error is authentication related
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Request { status: 401 | 403, .. })
    }
}
