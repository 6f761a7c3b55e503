use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vocab_portal::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    repository::{MongoRepository, RepositoryState},
};

/// main
///
/// Initialises configuration, logging, the document store and the HTTP server,
/// then serves until Ctrl-C or SIGTERM.
#[tokio::main]
async fn main() {
    // 1. Configuration: .env first, then the process environment with fallbacks.
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise sensible local defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vocab_portal=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);
    if config.env == Env::Production && config.uses_default_secret() {
        tracing::warn!("SECRET_KEY is not set; sessions are signed with the development key");
    }

    // 3. Document store: one client for the whole process.
    let mongo = MongoRepository::connect(&config.mongodb_uri, &config.mongodb_database)
        .await
        .expect("FATAL: Invalid MongoDB configuration. Check MONGODB_URI.");
    mongo
        .ensure_indexes()
        .await
        .expect("FATAL: Failed to reach MongoDB or create indexes.");
    tracing::info!("Connected to MongoDB database {}", config.mongodb_database);

    let repo = Arc::new(mongo) as RepositoryState;

    // 4. Application context and router.
    let bind_address = config.bind_address.clone();
    let app = create_router(AppState { repo, config });

    let listener = TcpListener::bind(&bind_address)
        .await
        .expect("FATAL: Failed to bind the HTTP listener. Check BIND_ADDRESS.");
    tracing::info!("Listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("FATAL: HTTP server error");

    tracing::info!("Server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
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
