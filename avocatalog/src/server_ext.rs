//! Extension avoserver pour le catalogue
//!
//! Ce module fournit un trait d'extension qui ajoute l'API du catalogue à un
//! `avoserver::Server`, sans que avoserver dépende de avocatalog.

use crate::CatalogConfigExt;
use crate::api_rest::{CatalogApiDoc, CatalogState, create_router};
use crate::error::Error;
use crate::service::CatalogService;
use crate::settings::CatalogSettings;
use anyhow::Result;
use avoconfig::get_config;
use std::sync::Arc;
use utoipa::OpenApi;

/// Trait pour étendre avoserver avec le catalogue
///
/// # Exemple
///
/// ```rust,no_run
/// use avocatalog::CatalogServerExt;
/// use avoserver::ServerBuilder;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let mut server = ServerBuilder::new_configured().build();
///
///     server.init_catalog().await?;
///
///     server.start().await?;
///     server.wait().await?;
///     Ok(())
/// }
/// ```
pub trait CatalogServerExt {
    /// Initialise le catalogue depuis la configuration et enregistre les routes
    ///
    /// # Routes enregistrées
    ///
    /// - `GET /api/catalog/tags?url=` - Proxy du lien `next`
    /// - `GET /api/catalog/recordings` - Page formatée
    /// - `GET /api/catalog/recordings/{id}` - Un enregistrement
    /// - `GET /api/catalog/render/*` - Fragments HTML et balises de tête
    /// - `GET /api/catalog/cache/stats`, `POST /api/catalog/cache/clear`
    ///
    /// Échoue si `catalog.enabled` vaut `false`.
    async fn init_catalog(&mut self) -> Result<CatalogState>;

    /// Initialise le catalogue avec des settings explicites
    async fn init_catalog_with(&mut self, settings: CatalogSettings) -> Result<CatalogState>;
}

impl CatalogServerExt for avoserver::Server {
    async fn init_catalog(&mut self) -> Result<CatalogState> {
        let config = get_config();
        if !config.get_catalog_enabled()? {
            return Err(Error::Disabled.into());
        }

        let settings = config.get_catalog_settings()?;
        self.init_catalog_with(settings).await
    }

    async fn init_catalog_with(&mut self, settings: CatalogSettings) -> Result<CatalogState> {
        let service = CatalogService::new(settings)
            .map_err(|e| anyhow::anyhow!("Failed to create catalog service: {}", e))?;
        let state = CatalogState::new(Arc::new(service));

        self.add_openapi(create_router(state.clone()), CatalogApiDoc::openapi(), "catalog")
            .await;
        tracing::info!("Catalog API registered under /api/catalog");

        Ok(state)
    }
}
