// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Daemon HTTP server implementation

use anyhow::{Context, Result};
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use hive_core::{
    domain::{
        hive_config::{HiveConfig, HiveConfigManifest},
        repository::StorageBackend,
        session::SessionProvider,
    },
    infrastructure::{
        db::Database,
        session::{DenyAllSessionProvider, JwtSessionProvider},
    },
    presentation::api::health_routes,
};
use hive_swarm::{
    application::{
        repository_factory::create_swarm_repository, StandardRegisterSwarmUseCase,
        SwarmReconciler,
    },
    domain::SwarmStatusFetcher,
    infrastructure::HttpSwarmStatusFetcher,
    presentation::{swarm_routes, SwarmApiState},
};

/// Bind overrides from the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default)]
pub struct ServeOptions {
    pub config_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

pub async fn start_daemon(options: ServeOptions) -> Result<()> {
    let manifest = HiveConfigManifest::load_or_default(options.config_path)
        .context("Failed to load configuration")?;

    manifest
        .validate()
        .context("Configuration validation failed")?;

    info!("Configuration loaded: {}", manifest.metadata.name);
    let config = manifest.spec;

    if let Some(port) = config.observability.metrics_port {
        install_metrics_exporter(port)?;
    }

    let database = Database::from_config(&config.database)
        .await
        .context("Failed to initialise database")?;

    let app = build_app(&config, database).await?;

    let host = options.host.unwrap_or_else(|| config.server.bind_address.clone());
    let port = options.port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Daemon listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Daemon shutting down");

    Ok(())
}

/// Wire repositories, the status fetcher and the session provider into the router
pub async fn build_app(config: &HiveConfig, database: Option<Database>) -> Result<Router> {
    let backend = config.storage_backend();
    match &backend {
        StorageBackend::InMemory => {
            warn!("No database configured; swarm records are kept in memory only")
        }
        StorageBackend::PostgreSQL(_) => info!("Using PostgreSQL storage backend"),
    }

    let repository = create_swarm_repository(&backend, database.map(|db| db.get_pool().clone()))?;

    let fetcher: Arc<dyn SwarmStatusFetcher> = Arc::new(
        HttpSwarmStatusFetcher::from_config(&config.swarm_api)
            .context("Failed to initialise swarm API client")?,
    );

    let sessions: Arc<dyn SessionProvider> = match JwtSessionProvider::from_config(&config.auth) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            warn!("{}; authenticated routes will reject every request", e);
            Arc::new(DenyAllSessionProvider)
        }
    };

    let state = SwarmApiState {
        reconciler: Arc::new(SwarmReconciler::new(repository.clone(), fetcher)),
        register: Arc::new(StandardRegisterSwarmUseCase::new(repository)),
        sessions,
    };

    Ok(health_routes()
        .merge(swarm_routes(state))
        .layer(TraceLayer::new_for_http()))
}

fn install_metrics_exporter(port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {e}"))?;

    info!("Prometheus metrics exporter listening on {}", addr);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use hive_core::domain::hive_config::SwarmApiConfig;
    use tower::ServiceExt;

    fn test_config() -> HiveConfig {
        HiveConfig {
            swarm_api: SwarmApiConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                super_admin_key: Some("super".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_app_serves_health_and_swarm_routes() {
        let app = build_app(&test_config(), None).await.unwrap();

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // No session secret configured: the read poll is closed
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/swarm/poll?id=swarm42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_app_requires_swarm_api_key() {
        let mut config = test_config();
        config.swarm_api.super_admin_key = None;
        assert!(build_app(&config, None).await.is_err());
    }
}
