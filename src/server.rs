//! HTTP server initialization and runtime setup.
//!
//! Selects the link store, wires the link service and runs the Axum server
//! until a shutdown signal arrives.

use crate::application::services::LinkService;
use crate::config::{Config, StorageBackend};
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::persistence::{MemoryLinkRepository, PgLinkRepository};
use crate::routes::{RESERVED_ALIASES, app_service};
use crate::state::AppState;
use crate::utils::alias_generator::RandomAliasGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Upper bound between two migration attempts after a failed startup.
const MIGRATION_RETRY_MAX_DELAY: Duration = Duration::from_secs(30);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The link store selected by `STORAGE_BACKEND`
/// - The link service with a random alias generator
/// - Axum HTTP server with graceful shutdown
///
/// An unreachable database does not abort startup: the server listens anyway
/// and requests fail with a storage error until the database comes back.
///
/// # Errors
///
/// Returns an error if:
/// - The database URL cannot be parsed
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let link_repository: Arc<dyn LinkRepository> = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = connect_postgres(&config).await?;
            Arc::new(PgLinkRepository::with_timeout(
                Arc::new(pool),
                config.storage_timeout(),
            ))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, links are lost on restart");
            Arc::new(MemoryLinkRepository::new())
        }
    };

    let link_service = LinkService::new(
        link_repository,
        Arc::new(RandomAliasGenerator::new(config.alias_length)),
        config.alias_max_attempts,
    )
    .with_reserved_aliases(RESERVED_ALIASES);

    let state = AppState::new(
        Arc::new(link_service),
        config.public_base_url.clone(),
        config.listing_size,
    );

    let app = app_service(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Connects to PostgreSQL and applies pending migrations.
///
/// When the database cannot be reached the failure is logged and a lazily
/// connecting pool is returned instead. Migrations are then retried in the
/// background until they succeed.
async fn connect_postgres(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres storage backend")?;

    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout)))
        .max_lifetime(Some(Duration::from_secs(config.db_max_lifetime)));

    match options.clone().connect(database_url).await {
        Ok(pool) => {
            tracing::info!("Connected to database");
            match MIGRATOR.run(&pool).await {
                Ok(()) => tracing::info!("Database migrations applied"),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to apply database migrations");
                    spawn_migration_retry(pool.clone());
                }
            }
            Ok(pool)
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to connect to database, starting without storage"
            );
            let pool = options
                .connect_lazy(database_url)
                .context("Invalid database URL")?;
            spawn_migration_retry(pool.clone());
            Ok(pool)
        }
    }
}

/// Retries migrations with exponential backoff until the database answers.
fn spawn_migration_retry(pool: PgPool) {
    tokio::spawn(async move {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(500)
            .max_delay(MIGRATION_RETRY_MAX_DELAY)
            .map(jitter);

        match Retry::spawn(strategy, || MIGRATOR.run(&pool)).await {
            Ok(()) => tracing::info!("Database reachable, migrations applied"),
            Err(e) => tracing::error!(error = %e, "Giving up on database migrations"),
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
