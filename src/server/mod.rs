use crate::config::Config;
use crate::tmdb::TmdbClient;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod error;
pub mod params;
pub mod request_id;
pub mod response;
pub mod routes_enhanced;
pub mod routes_media;
pub mod routes_people;
pub mod routes_playlist;

pub use error::ApiError;
pub use params::{validate_required, QueryParams};
pub use response::{ProxyResponse, SUCCESS_CACHE_CONTROL};

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub tmdb: Arc<TmdbClient>,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        let tmdb = TmdbClient::new(&config.tmdb);
        Self {
            config: Arc::new(config),
            tmdb: Arc::new(tmdb),
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let static_dir = ctx.config.server.static_dir.clone();

    let mut app = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // SPA fallback: unknown paths get index.html
    if let Some(dir) = static_dir {
        app = with_static_files(app, &dir);
    }

    app
}

fn api_routes() -> Router<AppContext> {
    routes_media::media_routes()
        .merge(routes_enhanced::enhanced_routes())
        .merge(routes_people::people_routes())
        .merge(routes_playlist::playlist_routes())
}

fn with_static_files(app: Router, dir: &Path) -> Router {
    if !dir.exists() {
        tracing::warn!("Static directory does not exist: {:?}", dir);
        return app;
    }

    tracing::info!("Serving static files from {:?}", dir);
    let index_path = dir.join("index.html");
    app.fallback_service(
        ServeDir::new(dir)
            .append_index_html_on_directories(true)
            .not_found_service(ServeFile::new(index_path)),
    )
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let ctx = AppContext::new(config);
    if !ctx.tmdb.is_configured() {
        tracing::warn!("TMDB credential missing; proxy endpoints will answer 500");
    }

    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
