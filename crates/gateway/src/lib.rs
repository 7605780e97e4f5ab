//! HTTP gateway for the product keeper.
//!
//! Wires the auth and products services to PostgreSQL and the statistics
//! stream, and exposes them over a REST API.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod infra;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as TokenTtl;
use tracing::info;

use auth_service_lib::{Argon2Hasher, AuthStore, Authenticator, JwtIssuer};
use domain::SystemClock;
use products_service_lib::{ProductManager, ProductStore, RedisStatisticsSink};

use crate::config::GatewayConfig;
use crate::infra::Database;
use crate::routes::{create_router, with_http_layers};
use crate::state::AppState;

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Build the services and serve HTTP until a shutdown signal arrives.
pub async fn run_server(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    let db = Database::connect(&config.database).await?;
    let statistics = RedisStatisticsSink::connect(&config.statistics.redis_url, config.statistics.stream.clone()).await?;

    let clock = Arc::new(SystemClock);
    let tokens = Arc::new(JwtIssuer::new(
        config.jwt.secret.as_bytes(),
        TokenTtl::minutes(config.jwt.ttl_minutes),
        clock.clone(),
    ));

    let auth_service = Arc::new(Authenticator::new(
        Arc::new(AuthStore::new()),
        Arc::new(Argon2Hasher::new()),
        tokens.clone(),
    ));
    let products_service = Arc::new(ProductManager::new(
        Arc::new(ProductStore::new()),
        Arc::new(statistics),
        clock,
    ));

    let state = AppState::new(db, auth_service, products_service, tokens);
    let app = with_http_layers(
        create_router(state),
        Duration::from_secs(config.server.request_timeout_secs),
    );

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("{} listening on {}", config.server.service_name, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(config: GatewayConfig, action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Resetting database and running all migrations");
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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

    info!("Shutdown signal received");
}
