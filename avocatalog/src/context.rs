//! Request context handed to the render adapters
//!
//! Everything a fragment needs to know about the incoming page request,
//! decoded from query parameters by the REST layer.

use crate::settings::SiteSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(
    feature = "server",
    derive(utoipa::IntoParams),
    into_params(parameter_in = Query)
)]
#[serde(default)]
pub struct RequestContext {
    /// Recording shown on the detail page
    pub recording_id: Option<String>,
    /// Identifier of the page being rendered
    pub page_id: Option<String>,
    /// Title of the page being rendered
    #[serde(rename = "title")]
    pub page_title: Option<String>,
    /// `Host` of the page request
    pub host: Option<String>,
    /// Path and query of the page request
    #[serde(rename = "uri")]
    pub request_uri: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl RequestContext {
    pub fn for_recording(id: impl Into<String>) -> Self {
        Self {
            recording_id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn with_page(mut self, page_id: impl Into<String>) -> Self {
        self.page_id = Some(page_id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.page_title = Some(title.into());
        self
    }

    pub fn with_location(mut self, host: impl Into<String>, uri: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self.request_uri = Some(uri.into());
        self
    }

    /// Requested recording, `None` when absent or blank
    pub fn recording_id(&self) -> Option<&str> {
        non_blank(&self.recording_id)
    }

    pub fn page_id(&self) -> Option<&str> {
        non_blank(&self.page_id)
    }

    pub fn page_title(&self) -> &str {
        self.page_title.as_deref().unwrap_or_default()
    }

    /// True on the configured detail page with a recording requested
    pub fn is_detail_view(&self, site: &SiteSettings) -> bool {
        self.recording_id().is_some() && site.is_detail_page(self.page_id())
    }

    /// Absolute URL of the page request, `http://{host}{uri}`
    pub fn page_url(&self) -> String {
        let host = non_blank(&self.host).unwrap_or_default();
        let uri = self.request_uri.as_deref().unwrap_or_default();
        if uri.is_empty() || uri.starts_with('/') {
            format!("http://{}{}", host, uri)
        } else {
            format!("http://{}/{}", host, uri)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteSettings {
        SiteSettings {
            detail_page_id: "42".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_blank_recording_id() {
        assert_eq!(RequestContext::default().recording_id(), None);
        assert_eq!(RequestContext::for_recording("  ").recording_id(), None);
        assert_eq!(RequestContext::for_recording(" 7 ").recording_id(), Some("7"));
    }

    #[test]
    fn test_is_detail_view() {
        assert!(RequestContext::for_recording("7").with_page("42").is_detail_view(&site()));
        assert!(!RequestContext::for_recording("7").with_page("1").is_detail_view(&site()));
        assert!(!RequestContext::for_recording("7").is_detail_view(&site()));
        assert!(!RequestContext::default().with_page("42").is_detail_view(&site()));
    }

    #[test]
    fn test_page_url() {
        let ctx = RequestContext::default().with_location("example.org", "/watch?recording_id=7");
        assert_eq!(ctx.page_url(), "http://example.org/watch?recording_id=7");

        let ctx = RequestContext::default().with_location("example.org", "watch");
        assert_eq!(ctx.page_url(), "http://example.org/watch");
    }

    #[test]
    fn test_query_names() {
        let ctx: RequestContext = serde_json::from_value(serde_json::json!({
            "recording_id": "7",
            "page_id": "42",
            "title": "Watch",
            "host": "example.org",
            "uri": "/watch"
        }))
        .unwrap();
        assert_eq!(ctx.page_title(), "Watch");
        assert_eq!(ctx.request_uri.as_deref(), Some("/watch"));
    }
}
