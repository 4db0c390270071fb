// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::snapshot_engine::SnapshotEngine;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct AppState {
    /// Selection events mutate the coordinator, so it sits behind a mutex;
    /// overlapping selections resolve in lock order, last writer wins
    pub dashboard: Mutex<DashboardService>,
    pub engine: Arc<SnapshotEngine>,
}
