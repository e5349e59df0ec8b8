//! Explicit settings handed to each catalog component at construction
//!
//! These mirror the `catalog` section of the configuration file. Every
//! field has a default so partially filled configurations still load.

use crate::cache::CachePolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of recordings per page
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 12;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default lifetime of a cached recording (5 minutes)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Default maximum number of cached recordings
pub const DEFAULT_CACHE_CAPACITY: u64 = 1000;

/// All catalog settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogSettings {
    pub api: ApiSettings,
    pub legacy: LegacySettings,
    pub site: SiteSettings,
    pub player: PlayerSettings,
    pub cache: CacheSettings,
}

/// Paginated catalog API (bearer token)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL, concatenated as-is with `site` (e.g. "https://api.example.org/sites/")
    pub base_url: String,
    pub token: String,
    /// Site identifier appended to `base_url`
    #[serde(deserialize_with = "crate::models::lenient_string")]
    pub site: String,
    pub items_per_page: u32,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: String::new(),
            site: String::new(),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Legacy single-recording API (basic auth)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LegacySettings {
    /// Base URL ending with a slash; `recordings/{id}` is appended
    pub base_url: String,
    pub user: String,
    pub password: String,
}

/// Host site information used by links and Open Graph tags
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteSettings {
    /// Identifier of the page showing a single recording
    #[serde(deserialize_with = "crate::models::lenient_string")]
    pub detail_page_id: String,
    /// Permalink of that page
    pub detail_page_url: String,
    pub name: String,
    pub description: String,
    pub logo_url: String,
}

impl SiteSettings {
    /// True when `page_id` designates the configured detail page
    pub fn is_detail_page(&self, page_id: Option<&str>) -> bool {
        match page_id {
            Some(id) => !self.detail_page_id.is_empty() && id.trim() == self.detail_page_id,
            None => false,
        }
    }
}

/// Media player bootstrap
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerSettings {
    pub license: String,
    pub library_url: String,
}

/// Single-recording cache bounds; 0 disables a bound
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheSettings {
    pub time_to_live_secs: u64,
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            time_to_live_secs: DEFAULT_CACHE_TTL_SECS,
            max_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl CacheSettings {
    pub fn policy(&self) -> CachePolicy {
        CachePolicy {
            max_capacity: (self.max_capacity > 0).then_some(self.max_capacity),
            time_to_live: (self.time_to_live_secs > 0)
                .then(|| Duration::from_secs(self.time_to_live_secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let settings: CatalogSettings =
            serde_yaml::from_str("api:\n  token: t\n  site: 7\nsite:\n  detail_page_id: 42\n").unwrap();

        assert_eq!(settings.api.token, "t");
        assert_eq!(settings.api.site, "7");
        assert_eq!(settings.api.items_per_page, DEFAULT_ITEMS_PER_PAGE);
        assert_eq!(settings.cache.max_capacity, DEFAULT_CACHE_CAPACITY);
        assert!(settings.site.is_detail_page(Some("42")));
        assert!(!settings.site.is_detail_page(Some("7")));
        assert!(!settings.site.is_detail_page(None));
    }

    #[test]
    fn test_detail_page_requires_configuration() {
        let site = SiteSettings::default();
        assert!(!site.is_detail_page(Some("")));
    }

    #[test]
    fn test_cache_policy_zero_means_unbounded() {
        let unbounded = CacheSettings {
            time_to_live_secs: 0,
            max_capacity: 0,
        }
        .policy();
        assert_eq!(unbounded, CachePolicy::unbounded());

        let bounded = CacheSettings::default().policy();
        assert_eq!(bounded.max_capacity, Some(DEFAULT_CACHE_CAPACITY));
        assert_eq!(
            bounded.time_to_live,
            Some(Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
        );
    }
}
