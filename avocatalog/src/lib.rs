//! Media catalog client for AVOCatalog
//!
//! This crate proxies a remote media-catalog API to web pages: it lists and
//! formats recordings, looks single recordings up on the legacy API, and
//! renders HTML fragments, page titles and Open Graph tags from them.
//!
//! # Components
//!
//! - **Fetcher**: one authenticated JSON GET, `None` on any failure
//! - **Formatter**: duration string, speaker name and title slug
//! - **Client**: paginated, tag-filtered catalog queries (bearer token)
//! - **Lookup**: single recording by id (basic auth), cached with a TTL/LRU policy
//! - **Render**: grid, media player, title/description/speaker, head tags
//! - **REST API** (`server` feature): the triggers above as HTTP routes
//!
//! Listing and rendering degrade instead of failing: an unreachable API
//! gives an empty grid, a missing recording gives empty fragments and a
//! request without `recording_id` gives the `"No recording id"` sentinel.
//!
//! # Example
//!
//! ```no_run
//! use avocatalog::{CatalogService, RequestContext, settings::CatalogSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = CatalogService::new(CatalogSettings::default())?;
//!
//!     let grid = service.render_list(Some("faith,hope")).await;
//!     println!("{}", grid);
//!
//!     let ctx = RequestContext::for_recording("1234").with_page("42");
//!     println!("{}", service.render_title(&ctx).await);
//!     Ok(())
//! }
//! ```
//!
//! # Server
//!
//! With the default `server` feature, [`CatalogServerExt`] mounts the API on
//! an `avoserver::Server` under `/api/catalog`, configured from the
//! `catalog` section read by [`CatalogConfigExt`].

pub mod cache;
pub mod client;
pub mod config_ext;
pub mod context;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod lookup;
pub mod models;
pub mod render;
pub mod service;
pub mod settings;

#[cfg(feature = "server")]
pub mod api_rest;

#[cfg(feature = "server")]
pub mod server_ext;

// Re-exports
pub use cache::{CachePolicy, CacheStats, RecordingCache};
pub use client::CatalogClient;
pub use config_ext::CatalogConfigExt;
pub use context::RequestContext;
pub use error::{Error, Result};
pub use fetcher::{Auth, Fetcher};
pub use format::{format_duration, format_recording, format_recordings, sanitize_title, speaker_name};
pub use lookup::RecordingLookup;
pub use models::{
    CatalogPage, DetailPresenter, DetailedRecording, FormattedRecording, ListPresenter,
    ListedRecording, MediaFile, Page, Presenter, RecordingPage, SiteImage,
};
pub use render::{DetailFragments, NO_RECORDING_ID};
pub use service::CatalogService;
pub use settings::CatalogSettings;

#[cfg(feature = "server")]
pub use api_rest::{CatalogApiDoc, CatalogState};

#[cfg(feature = "server")]
pub use server_ext::CatalogServerExt;
