use axum::{
    http::{header, HeaderValue, Method},
    routing::post,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{info, warn};

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    /// Single allowed CORS origin; permissive CORS when unset.
    pub frontend_url: Option<String>,
    /// Directory served for every path that is not an API route.
    pub static_dir: Option<PathBuf>,
}

fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let Some(origin) = frontend_url else {
        return CorsLayer::permissive();
    };
    match HeaderValue::from_str(origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        Err(e) => {
            warn!("⚠️ Ignoring invalid frontend origin '{}': {}", origin, e);
            CorsLayer::permissive()
        }
    }
}

pub fn create_app(state: AppState, options: &ServerOptions) -> Router {
    let mut router = Router::new()
        .route("/api/analyze-news", post(handlers::analyze_news))
        .route("/api/create-custom-philosophy", post(handlers::create_custom_philosophy))
        .route("/api/gpt", post(handlers::proxy_chat_completion));

    if let Some(dir) = &options.static_dir {
        info!("📁 Serving static files from {}", dir.display());
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(cors_layer(options.frontend_url.as_deref()))
        .with_state(Arc::new(state))
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 Relay listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("👋 Shutting down");
        })
        .await?;
    Ok(())
}

pub mod prelude {
    pub use pn_core::{AnalysisResponse, CustomLensResult, Error, Result};
    pub use crate::{create_app, AppState, ServerOptions};
}
