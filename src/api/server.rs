//! HTTP server implementation for the graph API

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{HeaderName, ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::get,
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use crate::constants::{GRAPH_ENDPOINT, HEADER_TOTAL_COUNT};
use crate::core::AppState;
use crate::graph::GraphManager;
use crate::log_info;

/// Creates the main application router with all routes and middleware
pub fn create_router<M: GraphManager>(app_state: Arc<AppState<M>>) -> Router {
    // CORS configuration - permissive, clients read the total count header
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, ACCESS_CONTROL_ALLOW_ORIGIN])
        .expose_headers([HeaderName::from_static(HEADER_TOTAL_COUNT)])
        .allow_origin(Any)
        .allow_credentials(false);

    let body_limit = app_state.config.graph.max_body_bytes;

    Router::new()
        // Graph routes
        .route(
            GRAPH_ENDPOINT,
            get(handlers::get_graph_root::<M>)
                .put(handlers::mutate_graph_root::<M>)
                .post(handlers::mutate_graph_root::<M>)
                .delete(handlers::mutate_graph_root::<M>),
        )
        .route(
            &format!("{}/{{*path}}", GRAPH_ENDPOINT),
            get(handlers::get_graph::<M>)
                .put(handlers::mutate_graph::<M>)
                .post(handlers::mutate_graph::<M>)
                .delete(handlers::mutate_graph::<M>),
        )

        // System routes
        .route("/health", get(handlers::health_check))
        .route("/info", get(handlers::system_info::<M>))

        // Apply middleware to ALL routes
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(app_state)
}

/// Resolves once Ctrl+C is received
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        log_info!("Shutdown signal received");
    }
}

/// Start the HTTP server and serve until Ctrl+C
pub async fn start_api_server<M: GraphManager>(
    app_state: AppState<M>,
) -> Result<(), Box<dyn std::error::Error>> {
    let http_addr: SocketAddr = app_state.config.server.http_addr;
    let app = create_router(Arc::new(app_state));

    let listener = tokio::net::TcpListener::bind(http_addr).await?;

    log_info!("Server listening on http://{}", http_addr);
    log_info!("Graph endpoint available at http://{}{}", http_addr, GRAPH_ENDPOINT);
    log_info!("Health check available at http://{}/health", http_addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    log_info!("Server stopped");
    Ok(())
}
