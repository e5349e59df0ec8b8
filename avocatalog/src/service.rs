//! Catalog facade used by the REST layer and by embedders
//!
//! Wires one [`Fetcher`] into the [`CatalogClient`] and the
//! [`RecordingLookup`], and pairs each render adapter with the lookup it
//! needs. Every call runs one sequential control flow; the recording cache
//! is the only state shared between calls.

use crate::cache::{CacheStats, RecordingCache};
use crate::client::CatalogClient;
use crate::context::RequestContext;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::lookup::RecordingLookup;
use crate::models::{DetailedRecording, RecordingPage};
use crate::render::{self, DetailFragments};
use crate::settings::CatalogSettings;
use std::sync::Arc;

#[derive(Clone)]
pub struct CatalogService {
    settings: Arc<CatalogSettings>,
    client: CatalogClient,
    lookup: RecordingLookup,
}

impl CatalogService {
    /// Builds the service and its cache from explicit settings
    pub fn new(settings: CatalogSettings) -> Result<Self> {
        let fetcher = Fetcher::new(settings.api.timeout())?;
        let cache = RecordingCache::new(settings.cache.policy());
        Ok(Self::with_parts(settings, fetcher, cache))
    }

    /// Builds the service around an existing fetcher and cache
    pub fn with_parts(settings: CatalogSettings, fetcher: Fetcher, cache: RecordingCache) -> Self {
        let client = CatalogClient::with_fetcher(fetcher.clone(), &settings.api);
        let lookup = RecordingLookup::new(fetcher, &settings.legacy, cache);

        tracing::info!(
            site = %settings.api.site,
            per_page = settings.api.items_per_page,
            "Catalog service ready"
        );

        Self {
            settings: Arc::new(settings),
            client,
            lookup,
        }
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    pub fn lookup(&self) -> &RecordingLookup {
        &self.lookup
    }

    // ========================================================================
    // Data
    // ========================================================================

    /// Formatted page of recordings, optionally filtered by tags
    pub async fn list(&self, tags: Option<&str>) -> RecordingPage {
        self.client.list_by_tags(tags).await
    }

    /// Formatted page behind a `next` link
    pub async fn proxy(&self, url: &str) -> Result<RecordingPage> {
        self.client.fetch_page(url).await
    }

    /// One recording from the legacy API, through the cache
    pub async fn recording(&self, id: &str) -> Option<Arc<DetailedRecording>> {
        self.lookup.get_recording(id).await
    }

    async fn requested_recording(&self, ctx: &RequestContext) -> Option<Arc<DetailedRecording>> {
        match ctx.recording_id() {
            Some(id) => self.recording(id).await,
            None => None,
        }
    }

    // Pas d'appel au legacy API hors de la page de détail
    async fn detail_view_recording(&self, ctx: &RequestContext) -> Option<Arc<DetailedRecording>> {
        if ctx.is_detail_view(&self.settings.site) {
            self.requested_recording(ctx).await
        } else {
            None
        }
    }

    // ========================================================================
    // Fragments
    // ========================================================================

    pub async fn render_list(&self, tags: Option<&str>) -> String {
        let page = self.list(tags).await;
        render::render_grid(&page, &self.settings.site)
    }

    pub async fn render_media(&self, ctx: &RequestContext) -> String {
        let recording = self.requested_recording(ctx).await;
        render::render_media(ctx, recording.as_deref(), &self.settings.player)
    }

    pub async fn render_title(&self, ctx: &RequestContext) -> String {
        let recording = self.requested_recording(ctx).await;
        render::render_title(ctx, recording.as_deref())
    }

    pub async fn render_description(&self, ctx: &RequestContext) -> String {
        let recording = self.requested_recording(ctx).await;
        render::render_description(ctx, recording.as_deref())
    }

    pub async fn render_speaker(&self, ctx: &RequestContext) -> String {
        let recording = self.requested_recording(ctx).await;
        render::render_speaker(ctx, recording.as_deref())
    }

    /// Title, description, speaker and media from a single lookup
    pub async fn render_detail(&self, ctx: &RequestContext) -> DetailFragments {
        let recording = self.requested_recording(ctx).await;
        render::render_detail(ctx, recording.as_deref(), &self.settings.player)
    }

    // ========================================================================
    // Head
    // ========================================================================

    pub async fn document_title(&self, ctx: &RequestContext) -> String {
        let recording = self.detail_view_recording(ctx).await;
        render::document_title(ctx, &self.settings.site, recording.as_deref())
    }

    pub async fn render_head(&self, ctx: &RequestContext) -> String {
        let recording = self.detail_view_recording(ctx).await;
        render::render_head(ctx, &self.settings.site, recording.as_deref())
    }

    pub fn language_attributes(&self, attributes: &str) -> String {
        render::language_attributes(attributes)
    }

    // ========================================================================
    // Cache
    // ========================================================================

    pub async fn cache_stats(&self) -> CacheStats {
        self.lookup.cache().stats().await
    }

    pub async fn clear_cache(&self) {
        self.lookup.cache().clear().await;
        tracing::info!("Recording cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NO_RECORDING_ID;
    use crate::settings::{ApiSettings, LegacySettings, SiteSettings};

    fn offline_service() -> CatalogService {
        CatalogService::new(CatalogSettings {
            api: ApiSettings {
                base_url: "http://127.0.0.1:9/".to_string(),
                timeout_secs: 1,
                ..Default::default()
            },
            legacy: LegacySettings {
                base_url: "http://127.0.0.1:9/".to_string(),
                ..Default::default()
            },
            site: SiteSettings {
                detail_page_id: "42".to_string(),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_offline_service_degrades() {
        let service = offline_service();

        let page = service.list(Some("a,b")).await;
        assert!(page.data.is_empty());
        assert!(page.next_link().is_none());

        let ctx = RequestContext::for_recording("7").with_page("42").with_title("Watch");
        assert_eq!(service.render_title(&ctx).await, "");
        assert_eq!(service.document_title(&ctx).await, "Watch");
        assert_eq!(service.cache_stats().await.entry_count, 0);
    }

    #[tokio::test]
    async fn test_no_recording_id_sentinels() {
        let service = offline_service();
        let ctx = RequestContext::default();
        let fragments = service.render_detail(&ctx).await;
        assert_eq!(fragments.title, NO_RECORDING_ID);
        assert_eq!(fragments.media, NO_RECORDING_ID);
    }
}
