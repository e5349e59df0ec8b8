//! Endpoints API REST du catalogue
//!
//! Ce module définit les handlers HTTP qui remplacent les déclencheurs de
//! page (shortcodes, filtres de titre, balises `<head>`) et la route proxy
//! du paginateur. Monté sous `/api/catalog`.

use crate::cache::CacheStats;
use crate::context::RequestContext;
use crate::error::Error;
use crate::models::{DetailedRecording, RecordingPage};
use crate::render::DetailFragments;
use crate::service::CatalogService;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};

/// État partagé des handlers
#[derive(Clone)]
pub struct CatalogState {
    pub service: Arc<CatalogService>,
}

impl CatalogState {
    pub fn new(service: Arc<CatalogService>) -> Self {
        Self { service }
    }
}

/// Paramètres de la route proxy
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProxyQuery {
    /// Lien `next` d'une page précédente
    pub url: String,
}

/// Filtre par tags
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct TagsQuery {
    /// Tags séparés par des virgules
    pub tags: Option<String>,
}

/// Attributs de la balise `<html>`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct LanguageAttributesQuery {
    /// Attributs existants (ex: `lang="en-US"`)
    pub attributes: Option<String>,
}

/// Crée le router Axum avec tous les endpoints du catalogue
pub fn create_router(state: CatalogState) -> Router {
    Router::new()
        // Données
        .route("/tags", get(proxy_page))
        .route("/recordings", get(list_recordings))
        .route("/recordings/{id}", get(get_recording))
        // Fragments
        .route("/render/list", get(render_list))
        .route("/render/media", get(render_media))
        .route("/render/title", get(render_title))
        .route("/render/description", get(render_description))
        .route("/render/speaker", get(render_speaker))
        .route("/render/detail", get(render_detail))
        // Head
        .route("/render/head", get(render_head))
        .route("/render/document-title", get(document_title))
        .route("/render/language-attributes", get(language_attributes))
        // Cache
        .route("/cache/stats", get(cache_stats))
        .route("/cache/clear", post(clear_cache))
        .with_state(state)
}

// ============ Données ============

/// Page suivante du catalogue, sans exposer le token au navigateur
#[utoipa::path(
    get,
    path = "/tags",
    params(ProxyQuery),
    responses(
        (status = 200, description = "Page formatée", body = Object),
        (status = 400, description = "URL hors de l'API du catalogue")
    ),
    tag = "Catalog"
)]
async fn proxy_page(
    State(state): State<CatalogState>,
    Query(params): Query<ProxyQuery>,
) -> Result<Json<RecordingPage>, AppError> {
    let page = state.service.proxy(&params.url).await?;
    Ok(Json(page))
}

/// Première page du catalogue, filtrée par tags
#[utoipa::path(
    get,
    path = "/recordings",
    params(TagsQuery),
    responses(
        (status = 200, description = "Page formatée (vide si l'API est injoignable)", body = Object)
    ),
    tag = "Catalog"
)]
async fn list_recordings(
    State(state): State<CatalogState>,
    Query(params): Query<TagsQuery>,
) -> Json<RecordingPage> {
    Json(state.service.list(params.tags.as_deref()).await)
}

/// Un enregistrement du legacy API
#[utoipa::path(
    get,
    path = "/recordings/{id}",
    params(("id" = String, Path, description = "Identifiant de l'enregistrement")),
    responses(
        (status = 200, description = "Enregistrement", body = Object),
        (status = 404, description = "Enregistrement introuvable")
    ),
    tag = "Catalog"
)]
async fn get_recording(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> Result<Json<DetailedRecording>, AppError> {
    let recording = state
        .service
        .recording(&id)
        .await
        .ok_or_else(|| Error::NotFound(id.clone()))?;
    Ok(Json(recording.as_ref().clone()))
}

// ============ Fragments ============

/// Grille des enregistrements et bouton « Show more »
#[utoipa::path(
    get,
    path = "/render/list",
    params(TagsQuery),
    responses((status = 200, description = "Fragment HTML", body = String, content_type = "text/html")),
    tag = "Render"
)]
async fn render_list(
    State(state): State<CatalogState>,
    Query(params): Query<TagsQuery>,
) -> Html<String> {
    Html(state.service.render_list(params.tags.as_deref()).await)
}

/// Lecteur média de l'enregistrement demandé
#[utoipa::path(
    get,
    path = "/render/media",
    params(RequestContext),
    responses((status = 200, description = "Fragment HTML ou « No recording id »", body = String, content_type = "text/html")),
    tag = "Render"
)]
async fn render_media(
    State(state): State<CatalogState>,
    Query(ctx): Query<RequestContext>,
) -> Html<String> {
    Html(state.service.render_media(&ctx).await)
}

#[utoipa::path(
    get,
    path = "/render/title",
    params(RequestContext),
    responses((status = 200, description = "Titre `<h1>` ou « No recording id »", body = String, content_type = "text/html")),
    tag = "Render"
)]
async fn render_title(
    State(state): State<CatalogState>,
    Query(ctx): Query<RequestContext>,
) -> Html<String> {
    Html(state.service.render_title(&ctx).await)
}

#[utoipa::path(
    get,
    path = "/render/description",
    params(RequestContext),
    responses((status = 200, description = "Description ou « No recording id »", body = String, content_type = "text/html")),
    tag = "Render"
)]
async fn render_description(
    State(state): State<CatalogState>,
    Query(ctx): Query<RequestContext>,
) -> Html<String> {
    Html(state.service.render_description(&ctx).await)
}

#[utoipa::path(
    get,
    path = "/render/speaker",
    params(RequestContext),
    responses((status = 200, description = "Intervenant ou « No recording id »", body = String, content_type = "text/html")),
    tag = "Render"
)]
async fn render_speaker(
    State(state): State<CatalogState>,
    Query(ctx): Query<RequestContext>,
) -> Html<String> {
    Html(state.service.render_speaker(&ctx).await)
}

/// Tous les fragments de la page de détail, en une seule recherche
#[utoipa::path(
    get,
    path = "/render/detail",
    params(RequestContext),
    responses((status = 200, description = "Fragments de la page de détail", body = DetailFragments)),
    tag = "Render"
)]
async fn render_detail(
    State(state): State<CatalogState>,
    Query(ctx): Query<RequestContext>,
) -> Json<DetailFragments> {
    Json(state.service.render_detail(&ctx).await)
}

// ============ Head ============

/// Balises Open Graph et lien canonique
#[utoipa::path(
    get,
    path = "/render/head",
    params(RequestContext),
    responses((status = 200, description = "Balises à insérer dans `<head>`", body = String, content_type = "text/html")),
    tag = "Render"
)]
async fn render_head(
    State(state): State<CatalogState>,
    Query(ctx): Query<RequestContext>,
) -> Html<String> {
    Html(state.service.render_head(&ctx).await)
}

/// Titre de la page, remplacé par celui de l'enregistrement sur la page de détail
#[utoipa::path(
    get,
    path = "/render/document-title",
    params(RequestContext),
    responses((status = 200, description = "Titre filtré", body = String, content_type = "text/plain")),
    tag = "Render"
)]
async fn document_title(
    State(state): State<CatalogState>,
    Query(ctx): Query<RequestContext>,
) -> String {
    state.service.document_title(&ctx).await
}

/// Attributs `<html>` complétés par les namespaces Open Graph
#[utoipa::path(
    get,
    path = "/render/language-attributes",
    params(LanguageAttributesQuery),
    responses((status = 200, description = "Attributs complétés", body = String, content_type = "text/plain")),
    tag = "Render"
)]
async fn language_attributes(
    State(state): State<CatalogState>,
    Query(params): Query<LanguageAttributesQuery>,
) -> String {
    state
        .service
        .language_attributes(params.attributes.as_deref().unwrap_or_default())
}

// ============ Cache ============

#[utoipa::path(
    get,
    path = "/cache/stats",
    responses((status = 200, description = "Statistiques du cache", body = CacheStats)),
    tag = "Cache"
)]
async fn cache_stats(State(state): State<CatalogState>) -> Json<CacheStats> {
    Json(state.service.cache_stats().await)
}

#[utoipa::path(
    post,
    path = "/cache/clear",
    responses((status = 200, description = "Cache vidé", body = CacheStats)),
    tag = "Cache"
)]
async fn clear_cache(State(state): State<CatalogState>) -> Json<CacheStats> {
    state.service.clear_cache().await;
    Json(state.service.cache_stats().await)
}

// ============ Gestion des erreurs ============

/// Wrapper pour convertir les erreurs en réponses HTTP
pub struct AppError(Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            Error::UntrustedUrl(_) | Error::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Disabled => StatusCode::SERVICE_UNAVAILABLE,
            Error::Http(_) | Error::Status { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(serde_json::json!({
            "error": self.0.to_string()
        }));

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Documentation OpenAPI pour l'API du catalogue
#[derive(OpenApi)]
#[openapi(
    info(
        title = "AVOCatalog API",
        version = "1.0.0",
        description = "Proxy du catalogue de médias : pages formatées, fragments HTML et balises Open Graph"
    ),
    paths(
        proxy_page,
        list_recordings,
        get_recording,
        render_list,
        render_media,
        render_title,
        render_description,
        render_speaker,
        render_detail,
        render_head,
        document_title,
        language_attributes,
        cache_stats,
        clear_cache
    ),
    components(schemas(DetailFragments, CacheStats)),
    tags(
        (name = "Catalog", description = "Pages et enregistrements du catalogue"),
        (name = "Render", description = "Fragments HTML et balises de tête"),
        (name = "Cache", description = "Cache des enregistrements")
    )
)]
pub struct CatalogApiDoc;
