//! Data models for the catalog API responses
//!
//! The paginated catalog API and the legacy single-recording API return the
//! same concept with two incompatible presenter shapes. Both are decoded into
//! [`RawRecording`], parameterised by the presenter container, and resolved
//! to [`Presenter`] values at the formatter boundary.
//!
//! Unknown keys are kept in `extra` maps so that the JSON served back to
//! clients carries everything the upstream sent.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Désérialiseur flexible pour les IDs qui peuvent être des strings ou des integers
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        _ => Err(Error::custom("expected a string or a number")),
    }
}

/// Durée en secondes, tolère les flottants, les chaînes et `null`
fn lenient_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let seconds = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| *f > 0.0)
            .map(|f| f as u64)
            .unwrap_or(0),
        _ => 0,
    };
    Ok(seconds)
}

/// `null` est traité comme une valeur absente
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Presenters
// ============================================================================

/// Presenter as returned by the paginated catalog API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListPresenter {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wrapper used by the catalog API: `"presenters": {"data": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PresenterList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<ListPresenter>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Presenter as returned by the legacy API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DetailPresenter {
    #[serde(rename = "givenName", default, deserialize_with = "lenient_string")]
    pub given_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub surname: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A person credited on a recording, whichever endpoint described it
#[derive(Debug, Clone, PartialEq)]
pub enum Presenter {
    Listed(ListPresenter),
    Detailed(DetailPresenter),
}

impl Presenter {
    /// Name shown to visitors
    ///
    /// The legacy shape joins the given name and the surname with a space.
    pub fn display_name(&self) -> String {
        match self {
            Presenter::Listed(p) => p.name.trim().to_string(),
            Presenter::Detailed(p) => format!("{} {}", p.given_name.trim(), p.surname.trim())
                .trim()
                .to_string(),
        }
    }
}

/// Container of presenters, one implementation per upstream shape
pub trait PresenterSet {
    fn presenters(&self) -> Vec<Presenter>;
}

impl PresenterSet for PresenterList {
    fn presenters(&self) -> Vec<Presenter> {
        self.data.iter().cloned().map(Presenter::Listed).collect()
    }
}

impl PresenterSet for Vec<DetailPresenter> {
    fn presenters(&self) -> Vec<Presenter> {
        self.iter().cloned().map(Presenter::Detailed).collect()
    }
}

// ============================================================================
// Recordings
// ============================================================================

/// Image attached to a recording on a given site
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SiteImage {
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub file: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SiteImage {
    /// URL of the 800x500 rendition
    pub fn sized_url(&self) -> String {
        format!("{}800/500/{}", self.url, self.file)
    }
}

/// A playable file of a recording
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MediaFile {
    #[serde(rename = "streamURL", default, deserialize_with = "lenient_string")]
    pub stream_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A recording as decoded from either upstream API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(bound(
    serialize = "P: Serialize",
    deserialize = "P: Deserialize<'de> + Default"
))]
pub struct RawRecording<P> {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    /// Durée en secondes
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub duration: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub presenters: P,
    #[serde(rename = "mediaFiles", default, deserialize_with = "null_as_default")]
    pub media_files: Vec<MediaFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_image: Option<SiteImage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Recording from the paginated catalog API
pub type ListedRecording = RawRecording<PresenterList>;

/// Recording from the legacy single-recording API
pub type DetailedRecording = RawRecording<Vec<DetailPresenter>>;

impl<P: PresenterSet> RawRecording<P> {
    /// Presenters resolved to the common [`Presenter`] type
    pub fn presenters(&self) -> Vec<Presenter> {
        self.presenters.presenters()
    }
}

impl<P> RawRecording<P> {
    /// The file to play: upstream lists the preferred rendition last
    pub fn best_media_file(&self) -> Option<&MediaFile> {
        self.media_files.last()
    }

    /// Stream URL of [`best_media_file`](Self::best_media_file), or empty
    pub fn stream_url(&self) -> &str {
        self.best_media_file()
            .map(|f| f.stream_url.as_str())
            .unwrap_or_default()
    }

    /// 800x500 image URL, or empty when the recording has no site image
    pub fn image_url(&self) -> String {
        self.site_image
            .as_ref()
            .map(SiteImage::sized_url)
            .unwrap_or_default()
    }
}

/// A catalog recording enriched with display fields
///
/// The derived fields are recomputed on every format pass and serialized
/// next to the upstream keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedRecording {
    #[serde(flatten)]
    pub recording: ListedRecording,
    /// `H:MM:SS` or `MM:SS`
    pub duration_formatted: String,
    pub speaker_name: String,
    /// URL-safe slug of the title
    pub sanitized_title: String,
}

// ============================================================================
// Pagination
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaginationLinks {
    /// Opaque URL of the next page, `null` at the end of the collection
    #[serde(default)]
    pub next: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Pagination {
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: PaginationLinks,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageMeta {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pagination: Pagination,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of the catalog: `{"data": [...], "meta": {"pagination": ...}}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: Deserialize<'de>"
))]
pub struct Page<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_vec")]
    pub data: Vec<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: PageMeta,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw page as returned by the catalog API
pub type CatalogPage = Page<ListedRecording>;

/// Page of recordings ready for display
pub type RecordingPage = Page<FormattedRecording>;

impl<T> Page<T> {
    /// Page with no recording and no next link
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            meta: PageMeta::default(),
            extra: Map::new(),
        }
    }

    /// Next-page URL, `None` at the end of the collection
    pub fn next_link(&self) -> Option<&str> {
        self.meta
            .pagination
            .links
            .next
            .as_deref()
            .filter(|next| !next.trim().is_empty())
    }

    /// Transforms every record, keeping the pagination metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
            extra: self.extra,
        }
    }
}

impl CatalogPage {
    /// Decodes a catalog payload record by record
    ///
    /// A record that does not decode is skipped with a warning instead of
    /// discarding the whole page. A payload without `data` yields `None`.
    pub fn from_json(mut value: Value) -> Option<Self> {
        let object = value.as_object_mut()?;
        let data = match object.remove("data")? {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => {
                tracing::warn!("Catalog payload has a non-array 'data': {}", other);
                return None;
            }
        };

        let mut page: CatalogPage = match serde_json::from_value(value) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Invalid catalog page metadata: {}", e);
                CatalogPage::empty()
            }
        };

        page.data = data
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<ListedRecording>(item) {
                Ok(recording) => Some(recording),
                Err(e) => {
                    tracing::warn!("Skipping undecodable recording: {}", e);
                    None
                }
            })
            .collect();

        Some(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listed_recording_decoding() {
        let recording: ListedRecording = serde_json::from_value(json!({
            "id": 1234,
            "title": "Hope in Hard Times",
            "description": "A sermon",
            "duration": "3661.4",
            "presenters": {"data": [{"name": "John Doe"}]},
            "mediaFiles": [{"streamURL": "low.mp3"}, {"streamURL": "high.mp3"}],
            "site_image": {"url": "https://img.example.org/", "file": "cover.jpg"},
            "lang": "en"
        }))
        .unwrap();

        assert_eq!(recording.id, "1234");
        assert_eq!(recording.duration, 3661);
        assert_eq!(recording.stream_url(), "high.mp3");
        assert_eq!(
            recording.image_url(),
            "https://img.example.org/800/500/cover.jpg"
        );
        assert_eq!(recording.extra.get("lang"), Some(&json!("en")));

        let presenters = recording.presenters();
        assert_eq!(presenters.len(), 1);
        assert_eq!(presenters[0].display_name(), "John Doe");
    }

    #[test]
    fn test_detailed_recording_decoding() {
        let recording: DetailedRecording = serde_json::from_value(json!({
            "id": "77",
            "title": "Title",
            "presenters": [{"givenName": "Jane", "surname": "Smith"}],
            "mediaFiles": null,
            "duration": null
        }))
        .unwrap();

        assert_eq!(recording.duration, 0);
        assert!(recording.best_media_file().is_none());
        assert_eq!(recording.stream_url(), "");
        assert_eq!(recording.image_url(), "");
        assert_eq!(recording.presenters()[0].display_name(), "Jane Smith");
    }

    #[test]
    fn test_detail_presenter_partial_name() {
        let presenter = Presenter::Detailed(DetailPresenter {
            given_name: String::new(),
            surname: "Smith".to_string(),
            extra: Map::new(),
        });
        assert_eq!(presenter.display_name(), "Smith");
    }

    #[test]
    fn test_page_next_link() {
        let page: CatalogPage = serde_json::from_value(json!({
            "data": [],
            "meta": {"pagination": {"total": 40, "links": {"next": "https://api.example.org/next"}}}
        }))
        .unwrap();
        assert_eq!(page.next_link(), Some("https://api.example.org/next"));

        let last: CatalogPage = serde_json::from_value(json!({
            "data": [],
            "meta": {"pagination": {"links": {"next": null}}}
        }))
        .unwrap();
        assert_eq!(last.next_link(), None);

        assert_eq!(CatalogPage::empty().next_link(), None);
    }

    #[test]
    fn test_empty_page_serializes_null_next() {
        let value = serde_json::to_value(RecordingPage::empty()).unwrap();
        assert_eq!(value["data"], json!([]));
        assert_eq!(value["meta"]["pagination"]["links"]["next"], Value::Null);
    }

    #[test]
    fn test_from_json_skips_bad_records() {
        let page = CatalogPage::from_json(json!({
            "data": [
                {"id": 1, "title": "Good"},
                {"id": 2, "title": {"nested": true}}
            ],
            "meta": {"pagination": {"links": {"next": "n"}}}
        }))
        .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].title, "Good");
        assert_eq!(page.next_link(), Some("n"));
    }

    #[test]
    fn test_null_site_image_fields_keep_the_record() {
        let page = CatalogPage::from_json(json!({
            "data": [
                {"id": 1, "title": "Partial", "site_image": {"url": "https://img/", "file": null}},
                {"id": 2, "title": "Plain"}
            ]
        }))
        .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].image_url(), "https://img/800/500/");

        let recording: DetailedRecording = serde_json::from_value(json!({
            "id": "3",
            "title": "Legacy",
            "site_image": {"url": null, "file": "3.jpg"}
        }))
        .unwrap();
        assert_eq!(recording.title, "Legacy");
        assert_eq!(recording.site_image.unwrap().url, "");
    }

    #[test]
    fn test_from_json_requires_data() {
        assert!(CatalogPage::from_json(json!({"error": "unauthorized"})).is_none());
        assert!(CatalogPage::from_json(json!([1, 2])).is_none());
    }
}
