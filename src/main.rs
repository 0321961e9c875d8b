use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use task_api::{
    api,
    config::{self, Config, EnvFile, LogFormat},
    db::{self, queries::TaskStore},
    service::TaskServiceImpl,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = config::load_env_file();
    let config = Config::from_env()?;

    init_tracing(&config);

    tracing::info!("Starting Task API...");
    match env_file {
        EnvFile::Loaded(path) => tracing::info!("Read config file {}", path.display()),
        EnvFile::Absent => tracing::info!("No config file found. Reading environment only."),
        EnvFile::Unreadable { path, error } => tracing::warn!(
            %error,
            "Failed to read config file {}. Reading environment only.",
            path
        ),
    }
    tracing::debug!(?config, "Loaded configuration");

    let pool = db::init_pool(&config.database).await?;

    tracing::info!("Database connection pool established.");

    if config.database.run_migrations {
        db::migrate(&pool).await?;
        tracing::info!("Migrations applied successfully.");
    } else {
        tracing::info!("DATABASE_MIGRATE is off. Skipping migrations.");
    }

    let cancel_token = CancellationToken::new();

    let service =
        TaskServiceImpl::with_deadline(TaskStore::new(pool.clone()), config.service_timeout);
    tracing::info!(deadline = ?config.service_timeout, "Task service initialized.");

    if config.enable_api_docs {
        tracing::info!("API docs enabled at {}", api::API_DOCS_PATH);
    }

    let app = api::router(Arc::new(service), config.enable_api_docs);
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("API Server listening on {}", addr);

    tokio::spawn(shutdown_signal(cancel_token.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel_token.cancelled_owned())
        .await?;

    pool.close().await;
    tracing::info!("Application shut down gracefully.");

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::new(&config.rust_log);
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

/// Listens for shutdown signals (Ctrl+C or termination) and triggers cancellation.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received.");
    token.cancel();
}
