//! HTML fragments and head tags built from formatted recordings
//!
//! Every function here is pure: recordings are looked up beforehand and
//! passed in, along with the settings and the [`RequestContext`]. Text and
//! attribute values are HTML-escaped.

use crate::context::RequestContext;
use crate::format::{ANONYMOUS_PRESENTER, speaker_name};
use crate::models::{DetailedRecording, RecordingPage};
use crate::settings::{PlayerSettings, SiteSettings};
use htmlescape::encode_minimal as escape;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use url::form_urlencoded;

/// Returned by the single-recording fragments when no recording is requested
pub const NO_RECORDING_ID: &str = "No recording id";

/// Attributes declaring the Open Graph and Facebook namespaces
pub const OPENGRAPH_NAMESPACES: &str =
    r#"xmlns:og="http://opengraphprotocol.org/schema/" xmlns:fb="http://www.facebook.com/2008/fbml""#;

/// Id of the element the media player mounts into
pub const PLAYER_ELEMENT_ID: &str = "mediaplayer";

// ============================================================================
// Grid
// ============================================================================

/// Link to the detail page of a recording
///
/// `{permalink}?{slug}&recording_id={id}`, or `&{slug}` when the permalink
/// already carries a query.
pub fn detail_link(permalink: &str, slug: &str, id: &str) -> String {
    let separator = if permalink.contains('?') { '&' } else { '?' };
    let id: String = form_urlencoded::byte_serialize(id.as_bytes()).collect();
    format!("{}{}{}&recording_id={}", permalink, separator, slug, id)
}

/// One cell per recording followed by the "show more" control
pub fn render_grid(page: &RecordingPage, site: &SiteSettings) -> String {
    let mut html = String::from(r#"<div class="grid" id="avgrid">"#);

    for formatted in &page.data {
        let recording = &formatted.recording;
        let link = detail_link(
            &site.detail_page_url,
            &formatted.sanitized_title,
            &recording.id,
        );

        let _ = write!(
            html,
            concat!(
                r#"<div class="cell"><a href="{link}">"#,
                r#"<img src="{image}" class="responsive-image">"#,
                r#"<div class="backdrop">"#,
                r#"<div class="duration"><span class="play-icon"></span>{duration}</div>"#,
                r#"<div class="inner-content">"#,
                r#"<div class="title">{title}</div>"#,
                r#"<div class="subtitle">{speaker}</div>"#,
                r#"</div></div>"#,
                r#"<div class="overlay"><div class="text">{description}</div></div>"#,
                r#"</a></div>"#
            ),
            link = escape(&link),
            image = escape(&recording.image_url()),
            duration = escape(&formatted.duration_formatted),
            title = escape(&recording.title),
            speaker = escape(&formatted.speaker_name),
            description = escape(&recording.description),
        );
    }

    html.push_str("</div>");
    html.push_str(&render_show_more(page.next_link(), &site.detail_page_url));
    html
}

/// Control loading the next page through the proxy route
pub fn render_show_more(next: Option<&str>, detail_permalink: &str) -> String {
    format!(
        concat!(
            r#"<div class="show-more">"#,
            r#"<a href="javascript:void(0)" id="more" onclick="getRecordings(this)" "#,
            r#"data-next="{}" data-detail-permalink="{}">Show more</a>"#,
            r#"</div>"#
        ),
        escape(next.unwrap_or_default()),
        escape(detail_permalink)
    )
}

// ============================================================================
// Media
// ============================================================================

/// Options passed to the player's `setup()` call
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlayerSetup {
    pub primary: &'static str,
    pub file: String,
    pub image: String,
    pub width: &'static str,
    pub aspectratio: &'static str,
    pub stretching: &'static str,
}

impl PlayerSetup {
    pub fn for_recording(recording: Option<&DetailedRecording>) -> Self {
        Self {
            primary: "html5",
            file: recording
                .map(|r| r.stream_url().to_string())
                .unwrap_or_default(),
            image: recording.map(|r| r.image_url()).unwrap_or_default(),
            width: "100%",
            aspectratio: "16:9",
            stretching: "fill",
        }
    }
}

// `</` fermerait la balise script
fn script_safe(json: String) -> String {
    json.replace("</", "<\\/")
}

/// Player container plus the scripts that load and configure the player
pub fn render_media(
    ctx: &RequestContext,
    recording: Option<&DetailedRecording>,
    player: &PlayerSettings,
) -> String {
    if ctx.recording_id().is_none() {
        return NO_RECORDING_ID.to_string();
    }

    let mut html = format!(
        concat!(
            r#"<div class="video-container"><div class="video-wrapper">"#,
            r#"<div class="embed-responsive embed-responsive-16by9">"#,
            r#"<div id="{}">Loading the player...</div>"#,
            r#"</div></div></div>"#
        ),
        PLAYER_ELEMENT_ID
    );

    if !player.library_url.is_empty() {
        let _ = write!(
            html,
            r#"<script src="{}"></script>"#,
            escape(&player.library_url)
        );
    }

    let key = serde_json::to_string(&player.license).unwrap_or_else(|_| "\"\"".to_string());
    let setup = serde_json::to_string(&PlayerSetup::for_recording(recording))
        .unwrap_or_else(|_| "{}".to_string());
    let _ = write!(
        html,
        r#"<script>jwplayer.key={};jwplayer("{}").setup({});</script>"#,
        script_safe(key),
        PLAYER_ELEMENT_ID,
        script_safe(setup)
    );

    html
}

// ============================================================================
// Single fields
// ============================================================================

/// `<h1>` with the recording title
pub fn render_title(ctx: &RequestContext, recording: Option<&DetailedRecording>) -> String {
    if ctx.recording_id().is_none() {
        return NO_RECORDING_ID.to_string();
    }
    recording
        .map(|r| format!("<h1>{}</h1>", escape(&r.title)))
        .unwrap_or_default()
}

pub fn render_description(ctx: &RequestContext, recording: Option<&DetailedRecording>) -> String {
    if ctx.recording_id().is_none() {
        return NO_RECORDING_ID.to_string();
    }
    recording.map(|r| escape(&r.description)).unwrap_or_default()
}

pub fn render_speaker(ctx: &RequestContext, recording: Option<&DetailedRecording>) -> String {
    if ctx.recording_id().is_none() {
        return NO_RECORDING_ID.to_string();
    }
    match recording {
        Some(r) => escape(&speaker_name(&r.presenters())),
        None => ANONYMOUS_PRESENTER.to_string(),
    }
}

/// All detail-page fragments rendered from one lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct DetailFragments {
    pub title: String,
    pub description: String,
    pub speaker: String,
    pub media: String,
}

pub fn render_detail(
    ctx: &RequestContext,
    recording: Option<&DetailedRecording>,
    player: &PlayerSettings,
) -> DetailFragments {
    DetailFragments {
        title: render_title(ctx, recording),
        description: render_description(ctx, recording),
        speaker: render_speaker(ctx, recording),
        media: render_media(ctx, recording, player),
    }
}

// ============================================================================
// Head
// ============================================================================

/// Page title, replaced by the recording title on the detail page
pub fn document_title(
    ctx: &RequestContext,
    site: &SiteSettings,
    recording: Option<&DetailedRecording>,
) -> String {
    match recording {
        Some(r) if ctx.is_detail_view(site) && !r.title.is_empty() => r.title.clone(),
        _ => ctx.page_title().to_string(),
    }
}

/// `<html>` attributes with the Open Graph namespaces appended
pub fn language_attributes(attributes: &str) -> String {
    let attributes = attributes.trim();
    if attributes.is_empty() {
        OPENGRAPH_NAMESPACES.to_string()
    } else {
        format!("{} {}", attributes, OPENGRAPH_NAMESPACES)
    }
}

fn meta(html: &mut String, property: &str, content: &str) {
    let _ = write!(
        html,
        r#"<meta property="{}" content="{}"/>"#,
        property,
        escape(content)
    );
}

/// Open Graph meta tags
///
/// On the detail page the description and image describe the recording,
/// elsewhere they describe the site.
pub fn render_open_graph(
    ctx: &RequestContext,
    site: &SiteSettings,
    recording: Option<&DetailedRecording>,
) -> String {
    let mut html = String::new();
    meta(&mut html, "og:title", &document_title(ctx, site, recording));
    meta(&mut html, "og:type", "article");
    meta(&mut html, "og:url", &ctx.page_url());
    meta(&mut html, "og:site_name", &site.name);

    match recording {
        Some(r) if ctx.is_detail_view(site) => {
            meta(&mut html, "og:description", &r.description);
            meta(&mut html, "og:image", &r.image_url());
        }
        _ => {
            meta(&mut html, "og:description", &site.description);
            meta(&mut html, "og:image", &site.logo_url);
        }
    }

    html
}

/// `<link rel="canonical">` pointing at the requested URL
pub fn render_canonical_link(ctx: &RequestContext) -> String {
    format!(r#"<link rel="canonical" href="{}"/>"#, escape(&ctx.page_url()))
}

/// Everything to insert in `<head>`
pub fn render_head(
    ctx: &RequestContext,
    site: &SiteSettings,
    recording: Option<&DetailedRecording>,
) -> String {
    let mut html = render_open_graph(ctx, site, recording);
    html.push_str(&render_canonical_link(ctx));
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_recordings;
    use crate::models::CatalogPage;
    use serde_json::json;

    fn site() -> SiteSettings {
        SiteSettings {
            detail_page_id: "42".to_string(),
            detail_page_url: "https://example.org/watch/".to_string(),
            name: "Example".to_string(),
            description: "Sermons & more".to_string(),
            logo_url: "https://example.org/logo.png".to_string(),
        }
    }

    fn detailed() -> DetailedRecording {
        serde_json::from_value(json!({
            "id": "7",
            "title": "Faith <b>now</b>",
            "description": "About \"faith\"",
            "presenters": [{"givenName": "Jane", "surname": "Smith"}],
            "mediaFiles": [{"streamURL": "https://cdn.example.org/low.mp4"},
                           {"streamURL": "https://cdn.example.org/high.mp4"}],
            "site_image": {"url": "https://img.example.org/", "file": "7.jpg"}
        }))
        .unwrap()
    }

    #[test]
    fn test_detail_link() {
        assert_eq!(
            detail_link("https://example.org/watch/", "faith-now", "7"),
            "https://example.org/watch/?faith-now&recording_id=7"
        );
        assert_eq!(
            detail_link("https://example.org/?page_id=42", "faith-now", "7"),
            "https://example.org/?page_id=42&faith-now&recording_id=7"
        );
    }

    #[test]
    fn test_render_grid() {
        let page = format_recordings(
            CatalogPage::from_json(json!({
                "data": [{
                    "id": 7,
                    "title": "Faith & Hope",
                    "description": "desc",
                    "duration": 3661,
                    "presenters": {"data": [{"name": "John Doe"}]},
                    "site_image": {"url": "https://img.example.org/", "file": "7.jpg"}
                }],
                "meta": {"pagination": {"links": {"next": "https://api.example.org/sites/12?page=2"}}}
            }))
            .unwrap(),
        );

        let html = render_grid(&page, &site());
        assert!(html.starts_with(r#"<div class="grid" id="avgrid">"#));
        assert!(html.contains(r#"href="https://example.org/watch/?faith-hope&amp;recording_id=7""#));
        assert!(html.contains(r#"<img src="https://img.example.org/800/500/7.jpg""#));
        assert!(html.contains("</span>1:01:01</div>"));
        assert!(html.contains(r#"<div class="title">Faith &amp; Hope</div>"#));
        assert!(html.contains(r#"<div class="subtitle">John Doe</div>"#));
        assert!(html.contains(r#"data-next="https://api.example.org/sites/12?page=2""#));
        assert!(html.contains(r#"data-detail-permalink="https://example.org/watch/""#));
    }

    #[test]
    fn test_render_grid_empty_page() {
        let html = render_grid(&RecordingPage::empty(), &site());
        assert!(html.starts_with(r#"<div class="grid" id="avgrid"></div>"#));
        assert!(html.contains(r#"data-next="""#));
    }

    #[test]
    fn test_sentinel_without_recording_id() {
        let ctx = RequestContext::default();
        let player = PlayerSettings::default();
        assert_eq!(render_media(&ctx, None, &player), NO_RECORDING_ID);
        assert_eq!(render_title(&ctx, None), NO_RECORDING_ID);
        assert_eq!(render_description(&ctx, None), NO_RECORDING_ID);
        assert_eq!(render_speaker(&ctx, None), NO_RECORDING_ID);
    }

    #[test]
    fn test_single_fields() {
        let ctx = RequestContext::for_recording("7");
        let recording = detailed();
        assert_eq!(
            render_title(&ctx, Some(&recording)),
            "<h1>Faith &lt;b&gt;now&lt;/b&gt;</h1>"
        );
        assert_eq!(
            render_description(&ctx, Some(&recording)),
            "About &quot;faith&quot;"
        );
        assert_eq!(render_speaker(&ctx, Some(&recording)), "Jane Smith");

        assert_eq!(render_title(&ctx, None), "");
        assert_eq!(render_speaker(&ctx, None), ANONYMOUS_PRESENTER);
    }

    #[test]
    fn test_render_media() {
        let ctx = RequestContext::for_recording("7");
        let player = PlayerSettings {
            license: "KEY</script>".to_string(),
            library_url: "https://cdn.example.org/player.js".to_string(),
        };

        let html = render_media(&ctx, Some(&detailed()), &player);
        assert!(html.contains(r#"<div id="mediaplayer">Loading the player...</div>"#));
        assert!(html.contains(r#"<script src="https://cdn.example.org/player.js"></script>"#));
        assert!(html.contains(r#"jwplayer.key="KEY<\/script>";"#));
        assert!(html.contains(r#""file":"https://cdn.example.org/high.mp4""#));
        assert!(html.contains(r#""image":"https://img.example.org/800/500/7.jpg""#));
        assert!(html.contains(r#""aspectratio":"16:9""#));
    }

    #[test]
    fn test_render_detail_shares_recording() {
        let ctx = RequestContext::for_recording("7");
        let fragments = render_detail(&ctx, Some(&detailed()), &PlayerSettings::default());
        assert!(fragments.title.starts_with("<h1>"));
        assert_eq!(fragments.speaker, "Jane Smith");
        assert!(fragments.media.contains("high.mp4"));
        assert!(!fragments.media.contains("<script src="));
    }

    #[test]
    fn test_document_title() {
        let recording = detailed();
        let on_detail = RequestContext::for_recording("7")
            .with_page("42")
            .with_title("Watch");
        assert_eq!(
            document_title(&on_detail, &site(), Some(&recording)),
            "Faith <b>now</b>"
        );

        let elsewhere = RequestContext::for_recording("7")
            .with_page("1")
            .with_title("Home");
        assert_eq!(document_title(&elsewhere, &site(), Some(&recording)), "Home");
        assert_eq!(document_title(&on_detail, &site(), None), "Watch");
    }

    #[test]
    fn test_language_attributes() {
        assert_eq!(
            language_attributes(r#"lang="en-US""#),
            format!(r#"lang="en-US" {}"#, OPENGRAPH_NAMESPACES)
        );
        assert_eq!(language_attributes(""), OPENGRAPH_NAMESPACES);
    }

    #[test]
    fn test_open_graph_on_detail_page() {
        let ctx = RequestContext::for_recording("7")
            .with_page("42")
            .with_title("Watch")
            .with_location("example.org", "/watch/?faith&recording_id=7");
        let html = render_head(&ctx, &site(), Some(&detailed()));

        assert!(html.contains(r#"<meta property="og:title" content="Faith &lt;b&gt;now&lt;/b&gt;"/>"#));
        assert!(html.contains(r#"<meta property="og:type" content="article"/>"#));
        assert!(html.contains(
            r#"<meta property="og:url" content="http://example.org/watch/?faith&amp;recording_id=7"/>"#
        ));
        assert!(html.contains(r#"<meta property="og:site_name" content="Example"/>"#));
        assert!(html.contains(r#"<meta property="og:description" content="About &quot;faith&quot;"/>"#));
        assert!(html.contains(
            r#"<meta property="og:image" content="https://img.example.org/800/500/7.jpg"/>"#
        ));
        assert!(html.ends_with(
            r#"<link rel="canonical" href="http://example.org/watch/?faith&amp;recording_id=7"/>"#
        ));
    }

    #[test]
    fn test_open_graph_elsewhere() {
        let ctx = RequestContext::default()
            .with_page("1")
            .with_title("Home")
            .with_location("example.org", "/");
        let html = render_open_graph(&ctx, &site(), None);

        assert!(html.contains(r#"<meta property="og:title" content="Home"/>"#));
        assert!(html.contains(r#"<meta property="og:description" content="Sermons &amp; more"/>"#));
        assert!(html.contains(r#"<meta property="og:image" content="https://example.org/logo.png"/>"#));
    }
}
