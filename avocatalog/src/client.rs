//! Paginated catalog queries
//!
//! Builds the list URL from the configured base, site and filter, fetches it
//! with the bearer token and formats the result.
//!
//! # Example
//!
//! ```no_run
//! use avocatalog::{CatalogClient, settings::ApiSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = ApiSettings {
//!         base_url: "https://api.example.org/sites/".to_string(),
//!         token: "secret".to_string(),
//!         site: "12".to_string(),
//!         ..Default::default()
//!     };
//!     let client = CatalogClient::new(&settings)?;
//!
//!     let page = client.list_by_tags(Some("faith,hope")).await;
//!     for recording in &page.data {
//!         println!("{} ({})", recording.recording.title, recording.duration_formatted);
//!     }
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::fetcher::{Auth, Fetcher};
use crate::format::format_recordings;
use crate::models::{CatalogPage, RecordingPage};
use crate::settings::ApiSettings;
use url::{Url, form_urlencoded};

/// Catalog API client
///
/// Listing never fails: an unreachable or malformed upstream yields an empty
/// page without next link.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    fetcher: Fetcher,
    base_url: String,
    site: String,
    items_per_page: u32,
    auth: Auth,
}

impl CatalogClient {
    /// Create a client with its own HTTP connection pool
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        Ok(Self::with_fetcher(Fetcher::new(settings.timeout())?, settings))
    }

    /// Create a client sharing an existing fetcher
    pub fn with_fetcher(fetcher: Fetcher, settings: &ApiSettings) -> Self {
        Self {
            fetcher,
            base_url: settings.base_url.clone(),
            site: settings.site.clone(),
            items_per_page: settings.items_per_page,
            auth: Auth::bearer(&settings.token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    // ========================================================================
    // URL building
    // ========================================================================

    /// Query string selecting recordings by tag
    ///
    /// `"a,b"` gives `?tags[0]=a&tags[0]=b`: upstream expects the index to
    /// stay `0` for every tag. Blank tags are ignored; no tag gives `""`.
    pub fn tag_filter(tags: &str) -> String {
        let encoded: Vec<String> = tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(|tag| {
                let value: String = form_urlencoded::byte_serialize(tag.as_bytes()).collect();
                format!("tags[0]={}", value)
            })
            .collect();

        if encoded.is_empty() {
            String::new()
        } else {
            format!("?{}", encoded.join("&"))
        }
    }

    /// Appends `per_page` to a filter, with `&` if it already has a query
    pub fn with_per_page(params: &str, per_page: u32) -> String {
        let separator = match params.split_once('?') {
            Some((_, query)) if !query.is_empty() => "&",
            Some(_) => "",
            None => "?",
        };
        format!("{}{}per_page={}", params, separator, per_page)
    }

    /// Full list URL: `{base}{site}{params}{?|&}per_page={n}`
    pub fn list_url(&self, params: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url,
            self.site,
            Self::with_per_page(params, self.items_per_page)
        )
    }

    // ========================================================================
    // Listing
    // ========================================================================

    /// Lists recordings matching a raw filter (e.g. `?tags[0]=a`)
    pub async fn list_recordings(&self, params: &str) -> RecordingPage {
        let url = self.list_url(params);
        self.fetch_formatted(&url).await
    }

    /// Lists recordings, optionally filtered by comma-separated tags
    pub async fn list_by_tags(&self, tags: Option<&str>) -> RecordingPage {
        let params = tags.map(Self::tag_filter).unwrap_or_default();
        self.list_recordings(&params).await
    }

    /// Fetches a page by its opaque URL (the `next` link of a previous page)
    ///
    /// The bearer token is only ever sent to the configured API: any other
    /// URL is rejected with [`Error::UntrustedUrl`].
    pub async fn fetch_page(&self, url: &str) -> Result<RecordingPage> {
        if !self.is_trusted(url)? {
            tracing::warn!(url = %url, "Refusing to proxy a foreign URL");
            return Err(Error::UntrustedUrl(url.to_string()));
        }
        Ok(self.fetch_formatted(url).await)
    }

    /// True when `url` points below the configured API base URL
    pub fn is_trusted(&self, url: &str) -> Result<bool> {
        if self.base_url.trim().is_empty() {
            return Ok(false);
        }

        let base = Url::parse(&self.base_url)?;
        let candidate = Url::parse(url)?;

        Ok(candidate.scheme() == base.scheme()
            && candidate.host_str() == base.host_str()
            && candidate.port_or_known_default() == base.port_or_known_default()
            && is_below(candidate.path(), base.path()))
    }

    async fn fetch_formatted(&self, url: &str) -> RecordingPage {
        let Some(value) = self.fetcher.fetch(url, &self.auth).await else {
            return RecordingPage::empty();
        };

        match CatalogPage::from_json(value) {
            Some(page) => {
                tracing::debug!(url = %url, count = page.data.len(), "Catalog page received");
                format_recordings(page)
            }
            None => {
                tracing::warn!(url = %url, "Catalog response has no 'data' array");
                RecordingPage::empty()
            }
        }
    }
}

// Comparaison par segments : `/sites` couvre `/sites/12` mais pas `/sites-admin`
fn is_below(path: &str, base: &str) -> bool {
    match path.strip_prefix(base) {
        Some(rest) => base.ends_with('/') || rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
