// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::Mutex;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::config::{chart_definitions, load_charts_config, load_dashboard_config};
use crate::infrastructure::data_bridge::DataBridge;
use crate::infrastructure::snapshot_engine::SnapshotEngine;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    clear_selection, get_dashboard, get_filters, health_check, select_value,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let dashboard_config = load_dashboard_config()?;
    let charts = chart_definitions(load_charts_config()?)?;
    let settings = dashboard_config.dashboard;

    // Create the data bridge and render target (infrastructure layer)
    let bridge = Arc::new(DataBridge::new(settings.request_timeout_ms, settings.scan_rows));
    let engine = Arc::new(SnapshotEngine::new());

    // Create the coordinator (application layer) and do the one-time load.
    // A failed load propagates out; nothing renders an error indicator.
    let mut dashboard = DashboardService::new(bridge, engine.clone(), charts);
    dashboard.draw(&settings.data_url).await?;

    // Create application state
    let state = Arc::new(AppState {
        dashboard: Mutex::new(dashboard),
        engine,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/filters", get(get_filters))
        .route(
            "/charts/:container_id/selection",
            post(select_value).delete(clear_selection),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = settings
        .bind_address
        .parse()
        .context("invalid bind_address")?;
    println!("Starting crossfilter-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
