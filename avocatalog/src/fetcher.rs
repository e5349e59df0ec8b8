//! Authenticated JSON GET against the upstream APIs
//!
//! One request per call, no retry and no caching at this layer.
//! [`Fetcher::fetch`] never fails: network errors, non-2xx statuses and
//! undecodable bodies are logged and turned into `None`.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;
use std::time::Duration;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = concat!("AVOCatalog/", env!("CARGO_PKG_VERSION"));

/// Authorization scheme of a request
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    None,
    /// `Authorization: Bearer {token}` (catalog API)
    Bearer(String),
    /// `Authorization: Basic base64(user:password)` (legacy API)
    Basic { user: String, password: String },
}

impl Auth {
    pub fn bearer(token: impl Into<String>) -> Self {
        Auth::Bearer(token.into())
    }

    pub fn basic(user: impl Into<String>, password: impl Into<String>) -> Self {
        Auth::Basic {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Value of the `Authorization` header, if any
    pub fn header_value(&self) -> Option<String> {
        match self {
            Auth::None => None,
            Auth::Bearer(token) => Some(format!("Bearer {}", token)),
            Auth::Basic { user, password } => Some(format!(
                "Basic {}",
                STANDARD.encode(format!("{}:{}", user, password))
            )),
        }
    }
}

// Les secrets ne doivent pas finir dans les logs
impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Auth::None => write!(f, "None"),
            Auth::Bearer(_) => write!(f, "Bearer(***)"),
            Auth::Basic { user, .. } => write!(f, "Basic({}:***)", user),
        }
    }
}

/// Thin wrapper over a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    /// Create a fetcher with its own connection pool
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    /// Create a fetcher sharing an existing `reqwest::Client`
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Get the internal HTTP client
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// GET `url` and decode the JSON body
    pub async fn try_fetch(&self, url: &str, auth: &Auth) -> Result<Value> {
        tracing::debug!(url = %url, auth = ?auth, "Fetching");

        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .timeout(self.timeout);
        if let Some(value) = auth.header_value() {
            request = request.header(AUTHORIZATION, value);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// GET `url`, `None` on any failure
    pub async fn fetch(&self, url: &str, auth: &Auth) -> Option<Value> {
        match self.try_fetch(url, auth).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(url = %url, "Upstream request failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        assert_eq!(
            Auth::bearer("abc").header_value().as_deref(),
            Some("Bearer abc")
        );
        assert_eq!(Auth::None.header_value(), None);
    }

    #[test]
    fn test_basic_header() {
        // base64("user:pass")
        assert_eq!(
            Auth::basic("user", "pass").header_value().as_deref(),
            Some("Basic dXNlcjpwYXNz")
        );
    }

    #[test]
    fn test_debug_hides_secrets() {
        let shown = format!("{:?}", Auth::basic("user", "hunter2"));
        assert!(!shown.contains("hunter2"));
        assert!(!format!("{:?}", Auth::bearer("token")).contains("token"));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_none() {
        let fetcher = Fetcher::new(Duration::from_millis(500)).unwrap();
        assert!(
            fetcher
                .fetch("http://127.0.0.1:9/never", &Auth::None)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_fetch_invalid_url_is_none() {
        let fetcher = Fetcher::new(Duration::from_secs(1)).unwrap();
        assert!(fetcher.fetch("not a url", &Auth::None).await.is_none());
    }
}
