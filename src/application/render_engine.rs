// Port for the chart rendering backend
use crate::domain::chart::ChartKind;
use crate::domain::view::DataView;
use async_trait::async_trait;

/// Everything the rendering backend needs to draw one chart.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub container_id: String,
    pub kind: ChartKind,
    pub title: Option<String>,
    pub options: serde_json::Map<String, serde_json::Value>,
    pub view: DataView,
}

#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Resolves once the backend is loaded and able to draw
    async fn ready(&self) -> anyhow::Result<()>;

    /// Draw (or redraw) the chart for `request.container_id`
    async fn render(&self, request: RenderRequest) -> anyhow::Result<()>;
}
