//! # avoserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit une abstraction simple pour créer le serveur HTTP
//! d'AVOCatalog : routes JSON, sous-routers documentés par OpenAPI,
//! système de logs consultable à chaud et arrêt gracieux sur Ctrl+C.
//!
//! ## Architecture
//!
//! - [`server`] : le serveur principal et son builder
//! - [`logs`] : buffer de logs en mémoire, flux SSE et réglage du niveau
//!
//! Les crates métier (comme `avocatalog`) étendent [`Server`] via leurs
//! propres traits d'extension, sans que `avoserver` les connaisse.
//!
//! ## Exemple
//!
//! ```rust,no_run
//! use avoserver::ServerBuilder;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut server = ServerBuilder::new("MyServer", "localhost", 8080).build();
//!
//!     server.add_route("/api/status", || async {
//!         serde_json::json!({"status": "ok"})
//!     }).await;
//!
//!     server.start().await?;
//!     server.wait().await?;
//!     Ok(())
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{LogState, LoggingOptions, SseLayer, log_dump, log_sse};
pub use server::{Server, ServerBuilder, ServerInfo};
