use thiserror::Error;

/// Errors surfaced by the SquaredUp API client.
///
/// SECURITY: Error messages must NEVER contain the API key.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Region is neither a known token nor an explicit https URL
    #[error("unsupported region or URL scheme: {region}")]
    InvalidRegion { region: String },

    /// No API key in configuration or environment
    #[error("missing API key: set api_key or SQUAREDUP_API_KEY")]
    MissingApiKey,

    /// Credential probe at construction time failed
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// Network-level error (connection failed, timeout, TLS, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API answered with a status outside 200/201/204
    #[error("status: {status}, body: {body}")]
    Status { status: u16, body: String },

    /// Retrying lookup returned nothing within its attempt budget
    #[error("no nodes found for {criteria}. attempted to search for it {attempts} times")]
    NotFound { criteria: String, attempts: u32 },

    /// Client-side display name filter matched nothing
    #[error("no {kind} found with display name: {name}")]
    NoMatch { kind: &'static str, name: String },

    /// Mutually exclusive or missing fields, reported before any request
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Response body was not the expected JSON
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidRegion { .. } | Self::MissingApiKey)
    }

    /// Transport and HTTP status failures; the node lookup retries these.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
