//! HTTP server assembly: shared state, routes, static file services.

use crate::config::{Config, DataPaths, ViewConfig};
use crate::error::{Result, XvError};
use crate::handlers;
use crate::html;
use crate::render::Formatter;
use crate::storage::Storage;
use crate::translate::{build_translator, Translator};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppContext {
    pub storage: Arc<Storage>,
    pub formatter: Formatter,
    pub translator: Arc<dyn Translator>,
    pub view: ViewConfig,
}

impl IntoResponse for XvError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound { item_type, id } => (
                StatusCode::NOT_FOUND,
                Html(html::not_found_page(&format!("No {item_type} with id {id}."))),
            )
                .into_response(),
            other => {
                error!("Request failed: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(html::not_found_page("Something went wrong serving this page.")),
                )
                    .into_response()
            }
        }
    }
}

/// Build the application router.
pub fn router(ctx: AppContext, paths: &DataPaths) -> Router {
    Router::new()
        .route("/", get(handlers::timeline))
        .route("/user/:user_id", get(handlers::profile))
        .route("/tweet/:tweet_id", get(handlers::tweet_detail))
        .route("/search", get(handlers::search))
        .route("/stats", get(handlers::stats))
        .route("/api/translate", post(handlers::translate))
        .route("/api/detect", post(handlers::detect))
        .route("/api/languages", get(handlers::languages))
        .route("/api/user/:user_id/media", get(handlers::user_media))
        .nest_service("/avatar", ServeDir::new(paths.avatar_dir()))
        .nest_service("/img", ServeDir::new(paths.media_dir()))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Serve the archive at the configured address until interrupted.
///
/// # Errors
///
/// Returns an error when the database is missing or the listener cannot
/// bind.
pub async fn run(config: &Config, data_root: &Path) -> Result<()> {
    let paths = DataPaths::new(data_root);
    let storage = Storage::open_existing(paths.db_path())?;

    let ctx = AppContext {
        storage: Arc::new(storage),
        formatter: Formatter::new(paths.avatar_dir()),
        translator: build_translator(&config.translation),
        view: config.view.clone(),
    };
    let app = router(ctx, &paths);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .map_err(|e| XvError::Server(format!("cannot bind {addr}: {e}")))?;
    info!("Serving archive at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| XvError::Server(e.to_string()))?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Cannot listen for shutdown signal: {e}");
    } else {
        info!("Shutting down");
    }
}
