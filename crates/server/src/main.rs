//! formhub server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use formhub_api::{AppState, auth_middleware, router as api_router};
use formhub_common::Config;
use formhub_core::{FormService, PassageService, ResultsService, UserService};
use formhub_db::repositories::{
    FormRepository, FormResultRepository, PassageRepository, SessionRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formhub=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting formhub server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = formhub_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    formhub_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let session_repo = SessionRepository::new(Arc::clone(&db));
    let form_repo = FormRepository::new(Arc::clone(&db));
    let passage_repo = PassageRepository::new(Arc::clone(&db));
    let result_repo = FormResultRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(user_repo, session_repo, &config);
    let form_service = FormService::new(form_repo.clone());
    let passage_service = PassageService::new(form_repo, passage_repo);
    let results_service = ResultsService::new(result_repo);

    // Create app state
    let state = AppState {
        user_service,
        form_service,
        passage_service,
        results_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api/v1", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
