//! Single-recording lookup against the legacy API
//!
//! `GET {legacy_base}recordings/{id}` with basic auth; the recording sits at
//! `result[0].recordings` in the response. Successful lookups are kept in a
//! [`RecordingCache`] so that several fragments of one page share one call.

use crate::cache::RecordingCache;
use crate::error::{Error, Result};
use crate::fetcher::{Auth, Fetcher};
use crate::models::DetailedRecording;
use crate::settings::LegacySettings;
use serde_json::Value;
use std::sync::Arc;
use url::form_urlencoded;

/// JSON pointer of the recording inside a legacy response
const RECORDING_POINTER: &str = "/result/0/recordings";

#[derive(Clone)]
pub struct RecordingLookup {
    fetcher: Fetcher,
    base_url: String,
    auth: Auth,
    cache: RecordingCache,
}

impl RecordingLookup {
    pub fn new(fetcher: Fetcher, settings: &LegacySettings, cache: RecordingCache) -> Self {
        Self {
            fetcher,
            base_url: settings.base_url.clone(),
            auth: Auth::basic(&settings.user, &settings.password),
            cache,
        }
    }

    pub fn cache(&self) -> &RecordingCache {
        &self.cache
    }

    /// URL of one recording on the legacy API
    pub fn recording_url(&self, id: &str) -> String {
        let id: String = form_urlencoded::byte_serialize(id.trim().as_bytes()).collect();
        format!("{}recordings/{}", self.base_url, id)
    }

    /// Looks a recording up, from the cache when possible
    ///
    /// Returns `None` when the id is blank, the upstream is unreachable or
    /// the payload has no recording. Only found recordings are cached.
    pub async fn get_recording(&self, id: &str) -> Option<Arc<DetailedRecording>> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }

        if let Some(recording) = self.cache.get(id).await {
            tracing::debug!(recording_id = %id, "Recording served from cache");
            return Some(recording);
        }

        match self.fetch_recording(id).await {
            Ok(recording) => {
                let recording = Arc::new(recording);
                self.cache.insert(id.to_string(), recording.clone()).await;
                Some(recording)
            }
            Err(e) => {
                tracing::warn!(recording_id = %id, "Recording lookup failed: {}", e);
                None
            }
        }
    }

    async fn fetch_recording(&self, id: &str) -> Result<DetailedRecording> {
        let url = self.recording_url(id);
        let Some(payload) = self.fetcher.fetch(&url, &self.auth).await else {
            return Err(Error::NotFound(id.to_string()));
        };
        extract_recording(payload)
    }
}

/// Pulls `result[0].recordings` out of a legacy response
///
/// Some deployments wrap the recording in a one-element array.
pub fn extract_recording(mut payload: Value) -> Result<DetailedRecording> {
    let value = payload
        .pointer_mut(RECORDING_POINTER)
        .map(Value::take)
        .ok_or_else(|| Error::missing_field("result[0].recordings"))?;

    let value = match value {
        Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
        Value::Object(_) => value,
        _ => return Err(Error::missing_field("result[0].recordings")),
    };

    Ok(serde_json::from_value(value)?)
}
