//! # Module Server - API de haut niveau pour Axum
//!
//! Le serveur accumule un `Router` derrière un `RwLock` : les extensions
//! métier y greffent leurs routes avant l'appel à [`Server::start`].
//!
//! - Routes JSON simples avec `add_route()`
//! - Handlers avec état avec `add_handler_with_state()`
//! - Sous-routers avec `add_router()`
//! - API documentées (OpenAPI + Swagger UI) avec `add_openapi()`
//! - Arrêt gracieux sur Ctrl+C

use anyhow::Context;
use crate::logs::{LogState, LoggingOptions, LogsApiDoc, create_logs_router, init_logging, log_dump, log_sse};
use avoconfig::get_config;
use axum::handler::Handler;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{signal, sync::RwLock, task::JoinHandle};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const DEFAULT_SERVER_NAME: &str = "AVOCatalog-Server";

/// Info serveur sérialisable
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ServerInfo {
    pub name: String,
    pub base_url: String,
    pub http_port: u16,
}

/// Serveur principal
pub struct Server {
    name: String,
    base_url: String,
    http_port: u16,
    router: Arc<RwLock<Router>>,
    join_handle: Option<JoinHandle<anyhow::Result<()>>>,
    log_state: Option<LogState>,
}

impl Server {
    /// Crée une nouvelle instance de serveur
    ///
    /// # Arguments
    ///
    /// * `name` - Nom du serveur (pour les logs)
    /// * `base_url` - Nom d'hôte public (ex: "localhost")
    /// * `http_port` - Port HTTP à écouter
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
            router: Arc::new(RwLock::new(Router::new())),
            join_handle: None,
            log_state: None,
        }
    }

    /// Crée un serveur à partir de la section `host` de la configuration
    pub fn new_configured() -> Self {
        ServerBuilder::new_configured().build()
    }

    async fn mount(&mut self, path: &str, route: Router) {
        let mut r = self.router.write().await;
        *r = if path == "/" {
            std::mem::take(&mut *r).merge(route)
        } else {
            let normalized = format!("/{}", path.trim_start_matches('/'));
            std::mem::take(&mut *r).nest(&normalized, route)
        };
    }

    /// Ajoute une route JSON dynamique
    ///
    /// La closure est appelée à chaque requête GET sur `path`.
    ///
    /// ```rust,no_run
    /// # use avoserver::Server;
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let mut server = Server::new("Test", "localhost", 3000);
    /// server.add_route("/info", || async {
    ///     serde_json::json!({"version": "1.0.0"})
    /// }).await;
    /// # }
    /// ```
    pub async fn add_route<F, Fut, T>(&mut self, path: &str, f: F)
    where
        F: Fn() -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let handler = move || {
            let f = f.clone();
            async move { Json(f().await) }
        };
        self.mount(path, Router::new().route("/", get(handler))).await;
    }

    /// Ajoute un handler GET avec état
    pub async fn add_handler_with_state<H, T, S>(&mut self, path: &str, handler: H, state: S)
    where
        H: Handler<T, S> + Clone + 'static,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        let route = Router::new().route("/", get(handler)).with_state(state);
        self.mount(path, route).await;
    }

    /// Ajoute un sous-router au serveur
    ///
    /// - Si `path` est "/", merge directement au router principal
    /// - Sinon, nest le router sous le chemin donné
    pub async fn add_router(&mut self, path: &str, sub_router: Router) {
        self.mount(path, sub_router).await;
    }

    /// Ajoute une API documentée avec OpenAPI et Swagger UI
    ///
    /// - les routes sont montées sous `/api/{name}`
    /// - la documentation interactive est servie sur `/swagger-ui/{name}`
    /// - la spécification JSON est servie sur `/api-docs/{name}.json`
    pub async fn add_openapi(
        &mut self,
        api_router: Router,
        openapi: utoipa::openapi::OpenApi,
        name: &str,
    ) {
        let swagger = SwaggerUi::new(format!("/swagger-ui/{}", name))
            .url(format!("/api-docs/{}.json", name), openapi);

        let nested_router = Router::new().nest(&format!("/api/{}", name), api_router);

        let mut r = self.router.write().await;
        *r = std::mem::take(&mut *r).merge(nested_router).merge(swagger);
    }

    /// Snapshot du router courant (utile pour les tests avec `oneshot`)
    pub async fn router(&self) -> Router {
        self.router.read().await.clone()
    }

    /// Démarre le serveur HTTP
    ///
    /// Le port est réservé avant de rendre la main : un port déjà occupé
    /// est une erreur. Le serveur tourne ensuite dans une tâche séparée
    /// jusqu'à Ctrl+C.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!(
            "Server {} running at http://{}:{}",
            self.name, self.base_url, self.http_port
        );

        let r = self.router.read().await.clone();
        let server_task = tokio::spawn(async move {
            axum::serve(listener, r.into_make_service())
                .await
                .context("HTTP server stopped")
        });

        let shutdown_task = tokio::spawn(async move {
            signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl+C")?;
            info!("Ctrl+C reçu, arrêt gracieux");
            Ok::<(), anyhow::Error>(())
        });

        self.join_handle = Some(tokio::spawn(async move {
            let outcome = tokio::select! {
                served = server_task => served,
                stopped = shutdown_task => stopped,
            };
            outcome.context("Server task panicked")?
        }));
        Ok(())
    }

    /// Attend la fin du serveur
    pub async fn wait(&mut self) -> anyhow::Result<()> {
        match self.join_handle.take() {
            Some(h) => h.await.context("Server task panicked")?,
            None => Ok(()),
        }
    }

    /// Récupère les infos du serveur
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            name: self.name.clone(),
            base_url: self.base_url.clone(),
            http_port: self.http_port,
        }
    }

    pub fn log_state(&self) -> Option<&LogState> {
        self.log_state.as_ref()
    }

    /// Initialise le logging et enregistre les routes associées
    ///
    /// Routes : `/log-sse`, `/log-dump`, `/api/logs/log_setup`
    pub async fn init_logging(&mut self, options: LoggingOptions) -> LogState {
        let log_state = init_logging(options);

        self.add_handler_with_state("/log-sse", log_sse, log_state.clone())
            .await;
        self.add_handler_with_state("/log-dump", log_dump, log_state.clone())
            .await;
        self.add_openapi(
            create_logs_router(log_state.clone()),
            LogsApiDoc::openapi(),
            "logs",
        )
        .await;

        self.log_state = Some(log_state.clone());
        log_state
    }
}

/// Builder pattern
pub struct ServerBuilder {
    name: String,
    base_url: String,
    http_port: u16,
}

impl ServerBuilder {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
        }
    }

    pub fn new_configured() -> Self {
        let config = get_config();
        Self {
            name: DEFAULT_SERVER_NAME.to_string(),
            base_url: config.get_base_url(),
            http_port: config.get_http_port(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn http_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }

    /// Construit le serveur
    pub fn build(self) -> Server {
        Server::new(self.name, self.base_url, self.http_port)
    }
}
