// Dashboard coordinator - Linked charts over one shared table
use crate::application::render_engine::{RenderEngine, RenderRequest};
use crate::application::table_source::TableSource;
use crate::domain::chart::ChartDefinition;
use crate::domain::table::{Cell, DataTable};
use crate::domain::view::DataView;
use anyhow::bail;
use std::collections::HashMap;
use std::sync::Arc;

/// Owns the chart list, the shared table and the cross-chart filter state.
/// Selection events mutate the filter map and redraw the listening charts.
pub struct DashboardService {
    source: Arc<dyn TableSource>,
    engine: Arc<dyn RenderEngine>,
    charts: Vec<ChartDefinition>,
    table: DataTable,
    /// Column id -> index, recomputed whenever the table is replaced
    columns: HashMap<String, usize>,
    filters: HashMap<String, Cell>,
    /// Last rendered view per container, for resolving selection rows
    rendered: HashMap<String, DataView>,
}

impl DashboardService {
    pub fn new(
        source: Arc<dyn TableSource>,
        engine: Arc<dyn RenderEngine>,
        charts: Vec<ChartDefinition>,
    ) -> Self {
        let mut service = Self {
            source,
            engine,
            charts: Vec::new(),
            table: DataTable::empty(),
            columns: HashMap::new(),
            filters: HashMap::new(),
            rendered: HashMap::new(),
        };
        for chart in charts {
            service.add_chart(chart);
        }
        service
    }

    /// Append a chart to the dashboard's ordered chart list.
    /// Container existence is not checked here; the engine owns that.
    pub fn add_chart(&mut self, chart: ChartDefinition) {
        self.charts.push(chart);
    }

    pub fn set_table(&mut self, table: DataTable) {
        self.columns = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();
        self.table = table;
    }

    pub fn filters(&self) -> &HashMap<String, Cell> {
        &self.filters
    }

    /// The view a chart renders from: either its custom mapping, or the
    /// shared table restricted by every active filter the chart listens to.
    /// Custom-mapped views deliberately bypass the filter map.
    pub fn get_view(&self, chart: &ChartDefinition) -> DataView {
        if let Some(map) = &chart.view_map {
            return (map.0)(&self.table);
        }
        let mut view = DataView::of(&self.table);
        let mut constraints = Vec::new();
        for filter in &chart.filters {
            if let (Some(&index), Some(value)) =
                (self.columns.get(filter), self.filters.get(filter))
            {
                constraints.push((index, value.clone()));
            }
        }
        if !constraints.is_empty() {
            view.retain_matching(&constraints);
        }
        view
    }

    async fn render_chart(&mut self, index: usize) -> anyhow::Result<()> {
        let chart = self.charts[index].clone();
        let dimension_index = match (chart.dimension_index, &chart.dimension) {
            (Some(i), _) => Some(i),
            (None, Some(name)) => self.columns.get(name).copied(),
            (None, None) => None,
        };

        let master = self.get_view(&chart);
        let view = match dimension_index {
            Some(i) => {
                if i >= master.columns.len() {
                    bail!(
                        "dimension index {} out of range for chart '{}'",
                        i,
                        chart.container_id
                    );
                }
                master.grouped(i, chart.aggregation)
            }
            None => master,
        };

        tracing::debug!(
            "rendering chart '{}' with {} rows",
            chart.container_id,
            view.rows.len()
        );
        self.engine
            .render(RenderRequest {
                container_id: chart.container_id.clone(),
                kind: chart.kind,
                title: chart.title.clone(),
                options: chart.options.clone(),
                view: view.clone(),
            })
            .await?;
        self.rendered.insert(chart.container_id, view);
        Ok(())
    }

    /// Render every chart once, in registration order.
    pub async fn render(&mut self) -> anyhow::Result<()> {
        for index in 0..self.charts.len() {
            self.render_chart(index).await?;
        }
        Ok(())
    }

    /// Re-render the charts listening to `filter_column`. Each one's own
    /// dimension entry is dropped from the filter map first so a chart about
    /// to be re-rendered cannot keep a stale downstream filter alive.
    /// Charts without the dependency are left untouched.
    pub async fn redraw(&mut self, filter_column: &str) -> anyhow::Result<()> {
        let affected: Vec<usize> = self
            .charts
            .iter()
            .enumerate()
            .filter(|(_, c)| c.filters.iter().any(|f| f == filter_column))
            .map(|(i, _)| i)
            .collect();
        for index in affected {
            if let Some(dimension) = self.charts[index].dimension.clone() {
                self.filters.remove(&dimension);
            }
            self.render_chart(index).await?;
        }
        Ok(())
    }

    /// One-time load: wait for the engine, load the table, render everything.
    pub async fn draw(&mut self, url: &str) -> anyhow::Result<()> {
        self.engine.ready().await?;
        let table = self.source.load_table(url).await?;
        self.set_table(table);
        self.render().await
    }

    /// A chart raised a selection: filter on the selected value of its first
    /// rendered column, then redraw the listening charts.
    pub async fn select(&mut self, container_id: &str, row: usize) -> anyhow::Result<()> {
        let Some(view) = self.rendered.get(container_id) else {
            bail!("no rendered chart for container '{}'", container_id);
        };
        let Some(column) = view.columns.first().map(|c| c.id.clone()) else {
            return Ok(());
        };
        let Some(value) = view.rows.get(row).and_then(|r| r.first()).cloned() else {
            bail!(
                "selection row {} out of range for container '{}'",
                row,
                container_id
            );
        };
        self.filters.insert(column.clone(), value);
        self.redraw(&column).await
    }

    /// A chart's selection was cleared: drop its filter and redraw listeners.
    pub async fn deselect(&mut self, container_id: &str) -> anyhow::Result<()> {
        let Some(view) = self.rendered.get(container_id) else {
            bail!("no rendered chart for container '{}'", container_id);
        };
        let Some(column) = view.columns.first().map(|c| c.id.clone()) else {
            return Ok(());
        };
        self.filters.remove(&column);
        self.redraw(&column).await
    }
}
