use axum::{
    http::Uri,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    controllers::{dashboard::DashboardController, health},
    domain::refresh::RefreshService,
    error::AppError,
    infrastructure::{config::Config, middleware::request_id_middleware},
};

/// Build the application router with all routes and layers
pub fn create_router(
    dashboard_controller: Arc<DashboardController>,
    refresh_service: Arc<RefreshService>,
) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(refresh_service);

    let dashboard_routes = Router::new()
        .route("/api/dashboard", get(DashboardController::get_dashboard))
        .route("/api/dashboard/refresh", post(DashboardController::refresh))
        .with_state(dashboard_controller);

    Router::new()
        .merge(health_routes)
        .merge(dashboard_routes)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Start the HTTP server
pub async fn start_http_server(config: &Config, app: Router) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
