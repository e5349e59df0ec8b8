//! Error types for the catalog client

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur inside the catalog client
///
/// Rendering and listing operations never surface these to the page: they
/// log them and fall back to an empty value. They are returned by the
/// lower-level and configuration APIs, and mapped to HTTP statuses by the
/// REST layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration error (from avoconfig/anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// Upstream answered with a non-success status
    #[error("API returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// The upstream payload lacks an expected key
    #[error("Missing field in API response: {0}")]
    MissingField(String),

    /// A proxied URL does not point at the configured catalog API
    #[error("URL is not served by the catalog API: {0}")]
    UntrustedUrl(String),

    /// Recording not found
    #[error("Recording not found: {0}")]
    NotFound(String),

    /// The catalog is disabled in configuration
    #[error("Catalog is disabled in configuration")]
    Disabled,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a missing-field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }
}
