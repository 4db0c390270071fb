use crate::domain::chart::{Aggregation, ChartDefinition, ChartKind};
use anyhow::bail;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    /// Where the shared data table is fetched from
    pub data_url: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Leading rows sampled for column-type inference (0 means all)
    #[serde(default = "default_scan_rows")]
    pub scan_rows: usize,
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_scan_rows() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartsConfig {
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    pub container_id: String,
    pub kind: String,
    pub title: Option<String>,
    pub dimension: Option<String>,
    pub dimension_index: Option<usize>,
    #[serde(default)]
    pub filters: Vec<String>,
    pub aggregation: Option<String>,
    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl ChartConfig {
    /// Validate and convert into a chart definition, merging the defaults
    /// the config file left out.
    pub fn into_definition(self) -> anyhow::Result<ChartDefinition> {
        let kind = ChartKind::parse(&self.kind)?;
        let mut definition = ChartDefinition::new(kind, self.container_id);
        definition.title = self.title;
        definition.dimension = self.dimension;
        definition.dimension_index = self.dimension_index;
        definition.filters = self.filters;
        if let Some(name) = &self.aggregation {
            definition.aggregation = Aggregation::parse(name)?;
        }
        definition.options = self.options;
        Ok(definition)
    }
}

/// Convert every configured chart, rejecting duplicate container ids.
pub fn chart_definitions(config: ChartsConfig) -> anyhow::Result<Vec<ChartDefinition>> {
    let mut seen = HashSet::new();
    let mut definitions = Vec::with_capacity(config.charts.len());
    for chart in config.charts {
        if !seen.insert(chart.container_id.clone()) {
            bail!("duplicate chart container id '{}'", chart.container_id);
        }
        definitions.push(chart.into_definition()?);
    }
    Ok(definitions)
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_charts_config() -> anyhow::Result<ChartsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/charts"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
