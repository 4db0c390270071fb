// In-memory render target - Latest chart payloads for a polling host page
use crate::application::render_engine::{RenderEngine, RenderRequest};
use crate::domain::chart::ChartKind;
use crate::domain::view::DataView;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

/// What the host page receives for one chart container.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSnapshot {
    pub container_id: String,
    pub kind: ChartKind,
    pub title: Option<String>,
    pub options: serde_json::Map<String, serde_json::Value>,
    pub view: DataView,
    pub rendered_at: DateTime<Utc>,
}

/// Render adapter that keeps the latest payload per container, in
/// first-render order.
#[derive(Debug, Default)]
pub struct SnapshotEngine {
    snapshots: RwLock<Vec<ChartSnapshot>>,
}

impl SnapshotEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshots(&self) -> Vec<ChartSnapshot> {
        self.snapshots.read().await.clone()
    }
}

#[async_trait]
impl RenderEngine for SnapshotEngine {
    async fn ready(&self) -> anyhow::Result<()> {
        // No asynchronous package load for a native target
        Ok(())
    }

    async fn render(&self, request: RenderRequest) -> anyhow::Result<()> {
        tracing::debug!(
            "snapshotting chart '{}' ({} rows)",
            request.container_id,
            request.view.rows.len()
        );
        let snapshot = ChartSnapshot {
            container_id: request.container_id,
            kind: request.kind,
            title: request.title,
            options: request.options,
            view: request.view,
            rendered_at: Utc::now(),
        };

        let mut snapshots = self.snapshots.write().await;
        match snapshots
            .iter_mut()
            .find(|s| s.container_id == snapshot.container_id)
        {
            Some(slot) => *slot = snapshot,
            None => snapshots.push(snapshot),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::{Cell, Column, ColumnType};

    fn request(container_id: &str, rows: usize) -> RenderRequest {
        RenderRequest {
            container_id: container_id.to_string(),
            kind: ChartKind::Table,
            title: None,
            options: serde_json::Map::new(),
            view: DataView {
                columns: vec![Column::new(
                    "State".to_string(),
                    "State".to_string(),
                    ColumnType::String,
                )],
                rows: (0..rows).map(|_| vec![Cell::Text("CA".to_string())]).collect(),
            },
        }
    }

    #[tokio::test]
    async fn test_render_replaces_existing_snapshot() {
        let engine = SnapshotEngine::new();
        engine.render(request("loan_table", 5)).await.unwrap();
        engine.render(request("state_chart", 2)).await.unwrap();
        engine.render(request("loan_table", 3)).await.unwrap();

        let snapshots = engine.snapshots().await;
        assert_eq!(snapshots.len(), 2);
        // First-render order is stable across redraws
        assert_eq!(snapshots[0].container_id, "loan_table");
        assert_eq!(snapshots[0].view.rows.len(), 3);
        assert_eq!(snapshots[1].container_id, "state_chart");
    }
}
