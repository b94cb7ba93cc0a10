use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lawiki_api::config::ServerConfig;
use lawiki_api::router::build_app_router;
use lawiki_api::state::AppState;
use lawiki_clients::{Collaborators, GatewayClient};
use lawiki_db::{PgVersionStore, VersionStore};
use lawiki_events::{EmailConfig, EmailDelivery, EmailSender, NotificationDispatcher};
use lawiki_pipeline::{CascadeOrchestrator, TranslationEngine};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "lawiki_api=debug,lawiki_pipeline=debug,lawiki_events=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        gateway = %config.services.gateway_url,
        "Loaded server configuration",
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = lawiki_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    lawiki_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    lawiki_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let store: Arc<dyn VersionStore> = Arc::new(PgVersionStore::new(pool));

    // --- Collaborators ---
    let gateway = Arc::new(GatewayClient::new(config.services.clone()));
    let collaborators = Collaborators::from_gateway(gateway);

    // --- Notification dispatcher ---
    let email: Option<Arc<dyn EmailSender>> = match EmailConfig::from_env() {
        Some(email_config) => {
            tracing::info!(smtp_host = %email_config.smtp_host, "Email delivery enabled");
            Some(Arc::new(EmailDelivery::new(email_config)))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, email notifications fall back to in-app");
            None
        }
    };

    let dispatcher_cancel = CancellationToken::new();
    let (notifications, dispatcher_handle) = NotificationDispatcher::new(
        collaborators.entries.clone(),
        collaborators.users.clone(),
        email,
    )
    .spawn(dispatcher_cancel.clone());

    // --- App state ---
    let state = AppState {
        store: Arc::clone(&store),
        orchestrator: CascadeOrchestrator::new(
            Arc::clone(&store),
            collaborators.media.clone(),
            collaborators.comments.clone(),
            notifications,
        ),
        translator: TranslationEngine::new(Arc::clone(&store), collaborators.translation.clone()),
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    // The router (and every queue handle it held) is gone, so the
    // dispatcher drains its backlog and exits on its own.
    tracing::info!("Server stopped accepting connections, draining notifications");
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(drain, dispatcher_handle).await.is_err() {
        tracing::warn!("Notification backlog not drained in time, cancelling");
        dispatcher_cancel.cancel();
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM (on Unix) to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
