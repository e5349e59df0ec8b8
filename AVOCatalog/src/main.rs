use avocatalog::{CatalogConfigExt, CatalogServerExt};
use avoconfig::get_config;
use avoserver::{LoggingOptions, ServerBuilder};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ========== PHASE 1 : Infrastructure ==========

    let config = get_config();
    let mut server = ServerBuilder::new_configured().name("AVOCatalog").build();

    server.init_logging(LoggingOptions::from_config(&config)).await;
    info!("📁 Configuration loaded from {}", config.directory());

    server
        .add_route("/info", || async {
            serde_json::json!({
                "name": "AVOCatalog",
                "version": env!("CARGO_PKG_VERSION"),
            })
        })
        .await;

    // ========== PHASE 2 : Catalogue ==========

    if config.get_catalog_enabled()? {
        info!("📚 Initializing catalog API...");
        server.init_catalog().await?;
        info!("✅ Catalog API ready under /api/catalog");
    } else {
        tracing::warn!("⚠️ Catalog is disabled in configuration, only logs and /info are served");
    }

    // ========== PHASE 3 : Démarrage du serveur ==========

    info!("🌐 Starting HTTP server...");
    server.start().await?;

    info!("✅ AVOCatalog is ready!");
    info!("Press Ctrl+C to stop...");
    server.wait().await?;

    Ok(())
}
