use crate::api::{self, AppState};
use crate::config::Config;
use crate::db::SqliteStorage;
use crate::error::Result;
use crate::notify::{Notifier, OutboxNotifier};
use crate::storage::{InMemoryStorage, Storage};
use axum::http::{header, Method};
use axum::Router;
use hyper::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the HTTP server with all routes and static uploads.
pub fn create_server(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);
    let uploads = ServeDir::new(&state.config.site.uploads_dir);

    api::router()
        .nest_service("/uploads", uploads)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// SQLite at `database.path` unless `in_memory` is set.
pub fn open_storage(config: &Config, in_memory: bool) -> Result<Arc<dyn Storage>> {
    if in_memory {
        info!("Using in-memory storage; data is lost on exit");
        Ok(Arc::new(InMemoryStorage::new()))
    } else {
        info!("Opening database at {}", config.database.path);
        Ok(Arc::new(SqliteStorage::open(&config.database.path)?))
    }
}

pub fn build_state(config: Config, storage: Arc<dyn Storage>) -> AppState {
    let notifier: Arc<dyn Notifier> = Arc::new(OutboxNotifier::new(&config.mail.outbox_dir));
    AppState::new(storage, notifier, config)
}

/// Start the HTTP server on the configured host and port.
pub async fn start_server(config: Config, storage: Arc<dyn Storage>) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_server(build_state(config, storage));

    info!("HTTP server running on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    Server::bind(&addr).serve(app.into_make_service()).await?;
    Ok(())
}
