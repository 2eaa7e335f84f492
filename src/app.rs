//! Process lifecycle for the HTTP server.
//!
//! Startup is strictly sequential: connect, migrate, bind, serve. Any
//! failure before serving aborts startup. On SIGINT/SIGTERM the server
//! stops accepting connections, gives in-flight requests a bounded grace
//! period, and only then closes the connection pool.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPool;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::config::{PostgresConfig, ServerConfig};
use crate::db::{self, PgSongStorage};
use crate::error::{Result, ResultExt};
use crate::http::{self, AppState};
use crate::service::SongService;

/// Longest wait for in-flight requests after a shutdown signal.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Connect to the database and bring its schema up to date.
pub async fn prepare_database(config: &PostgresConfig) -> Result<PgPool> {
    let pool = db::init_db(config)
        .await
        .with_context("connecting to PostgreSQL")?;
    db::run_migrations(&pool, &config.migration_source)
        .await
        .with_context("applying migrations")?;
    Ok(pool)
}

/// Build the service layer over an open pool.
pub fn song_service(pool: PgPool, server: &ServerConfig) -> SongService {
    SongService::new(
        Arc::new(PgSongStorage::new(pool)),
        server.request_timeout(),
    )
}

/// Run the server until a shutdown signal arrives.
pub async fn serve(server: &ServerConfig, database: &PostgresConfig) -> Result<()> {
    tracing::debug!("Service startup");

    let pool = prepare_database(database).await?;
    let app = http::router(AppState::new(song_service(pool.clone(), server)));

    let address = server.bind_address()?;
    let listener = TcpListener::bind(address)
        .await
        .with_context(format!("binding {address}"))?;
    tracing::info!(%address, "Starting HTTP server");

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut running = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        joined = &mut running => {
            // The server stopped without being asked to.
            pool.close().await;
            return match joined {
                Ok(result) => result.with_context("HTTP server failed"),
                Err(e) => Err(std::io::Error::other(e).into()),
            };
        }
        _ = shutdown_signal() => {}
    }

    tracing::info!("Stopping HTTP server");
    let _ = stop_tx.send(());
    match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut running).await {
        Ok(Ok(result)) => result.with_context("HTTP server shutdown failed")?,
        Ok(Err(e)) => return Err(std::io::Error::other(e).into()),
        Err(_) => {
            tracing::warn!(
                timeout = ?SHUTDOWN_TIMEOUT,
                "In-flight requests did not finish in time, aborting them"
            );
            running.abort();
        }
    }
    tracing::info!("HTTP server shutdown complete");

    pool.close().await;
    tracing::info!("PostgreSQL connection pool closed");
    Ok(())
}

/// Resolve when the process is asked to stop.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received interrupt"),
        _ = terminate => tracing::info!("Received terminate"),
    }
}
