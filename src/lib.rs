use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;

use error::ApiError;
use middleware::basic_auth_middleware;
use state::AppState;

/// Full route table plus global middleware.
pub fn app(state: AppState) -> Router {
    let api = &state.config.api;

    let mut router = Router::new()
        // Public
        .merge(public_routes())
        // Protected (Basic auth)
        .merge(protected_routes(state.clone()))
        .merge(admin_page_routes(state.clone()))
        // Anything else is a static asset
        .fallback_service(ServeDir::new(&state.config.server.static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(DefaultBodyLimit::max(api.max_request_size_bytes)),
        );

    if state.config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public;

    Router::new()
        .route("/health", get(public::health))
        .route("/api/meta", get(public::meta_get))
        .route("/api/team", get(public::team_get))
        .route("/api/items", get(public::items_get))
        .route("/api/items/:id", get(public::item_get))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use axum::routing::{post, put};
    use handlers::protected;

    // Same paths as the public reads; route_layer guards only the methods registered here.
    Router::new()
        .route("/api/items", post(protected::items_post))
        .route("/api/items/:id", put(protected::item_put).delete(protected::item_delete))
        .route_layer(from_fn_with_state(state, basic_auth_middleware))
}

fn admin_page_routes(state: AppState) -> Router<AppState> {
    let page = state.config.server.static_dir.join("admin.html");

    Router::new()
        .route_service("/admin.html", ServeFile::new(page))
        .route_layer(from_fn_with_state(state, basic_auth_middleware))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!("Handler panicked: {}", detail);
    ApiError::internal_server_error().into_response()
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
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
}
