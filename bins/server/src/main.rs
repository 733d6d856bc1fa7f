//! Tealeaf API server.
//!
//! Loads configuration, connects the pool and serves the HTTP API.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tealeaf_api::{AppState, LocationHub, create_router};
use tealeaf_core::settlement::SettlementPolicy;
use tealeaf_db::connect_with;
use tealeaf_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tealeaf=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    info!(environment = ?config.app.environment, "Configuration loaded");

    let db = connect_with(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let jwt_service = JwtService::new(JwtConfig::from_settings(&config.jwt));

    let settlement_policy = SettlementPolicy::new(config.settlement.transport_charge)
        .context("Invalid settlement configuration")?;
    info!(
        transport_charge = %settlement_policy.transport_charge,
        "Settlement policy configured"
    );

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        settlement_policy,
        expose_error_details: config.app.expose_error_details(),
        locations: LocationHub::new(),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
