// Chart definition domain model
use super::table::{Cell, DataTable};
use super::view::DataView;
use anyhow::bail;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Table,
}

impl ChartKind {
    pub fn parse(kind: &str) -> anyhow::Result<Self> {
        match kind {
            "pie" => Ok(ChartKind::Pie),
            "table" => Ok(ChartKind::Table),
            other => bail!("unknown chart kind '{}'", other),
        }
    }
}

/// How a grouped chart folds the view's first column per dimension value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Count,
    Sum,
    Average,
    Min,
    Max,
}

impl Aggregation {
    pub fn parse(name: &str) -> anyhow::Result<Self> {
        match name {
            "count" => Ok(Aggregation::Count),
            "sum" => Ok(Aggregation::Sum),
            "average" => Ok(Aggregation::Average),
            "min" => Ok(Aggregation::Min),
            "max" => Ok(Aggregation::Max),
            other => bail!("unknown aggregation '{}'", other),
        }
    }

    /// Column id of the synthetic aggregate column in grouped output.
    pub fn label(&self) -> &'static str {
        match self {
            Aggregation::Count => "count",
            Aggregation::Sum => "sum",
            Aggregation::Average => "average",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
        }
    }

    pub fn apply(&self, values: &[Cell]) -> f64 {
        if *self == Aggregation::Count {
            return values.len() as f64;
        }
        let numbers: Vec<f64> = values.iter().filter_map(Cell::as_number).collect();
        if numbers.is_empty() {
            return 0.0;
        }
        match self {
            Aggregation::Sum => numbers.iter().sum(),
            Aggregation::Average => numbers.iter().sum::<f64>() / numbers.len() as f64,
            Aggregation::Min => numbers.iter().cloned().fold(f64::INFINITY, f64::min),
            Aggregation::Max => numbers.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            Aggregation::Count => unreachable!(),
        }
    }
}

/// Custom view-mapping function: replaces the default full-table view.
#[derive(Clone)]
pub struct ViewMap(pub Arc<dyn Fn(&DataTable) -> DataView + Send + Sync>);

impl fmt::Debug for ViewMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ViewMap(..)")
    }
}

/// One chart in the dashboard. Built once at setup, immutable afterwards.
#[derive(Debug, Clone)]
pub struct ChartDefinition {
    pub kind: ChartKind,
    pub container_id: String,
    pub title: Option<String>,
    /// Column the chart groups by, if any
    pub dimension: Option<String>,
    /// Overrides the name lookup of `dimension` when set
    pub dimension_index: Option<usize>,
    /// Columns this chart listens to in the filter map
    pub filters: Vec<String>,
    pub aggregation: Aggregation,
    /// Opaque rendering options handed through to the engine
    pub options: serde_json::Map<String, serde_json::Value>,
    pub view_map: Option<ViewMap>,
}

impl ChartDefinition {
    pub fn new(kind: ChartKind, container_id: String) -> Self {
        Self {
            kind,
            container_id,
            title: None,
            dimension: None,
            dimension_index: None,
            filters: Vec::new(),
            aggregation: Aggregation::Count,
            options: serde_json::Map::new(),
            view_map: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(ChartKind::parse("pie").unwrap(), ChartKind::Pie);
        assert_eq!(ChartKind::parse("table").unwrap(), ChartKind::Table);
        assert!(ChartKind::parse("gauge").is_err());
    }

    #[test]
    fn test_parse_aggregation() {
        assert_eq!(Aggregation::parse("count").unwrap(), Aggregation::Count);
        assert_eq!(Aggregation::parse("average").unwrap(), Aggregation::Average);
        assert!(Aggregation::parse("median").is_err());
    }

    #[test]
    fn test_apply_aggregations() {
        let values = vec![
            Cell::Number(4.0),
            Cell::Text("2".to_string()),
            Cell::Text("n/a".to_string()),
        ];
        assert_eq!(Aggregation::Count.apply(&values), 3.0);
        assert_eq!(Aggregation::Sum.apply(&values), 6.0);
        assert_eq!(Aggregation::Average.apply(&values), 3.0);
        assert_eq!(Aggregation::Min.apply(&values), 2.0);
        assert_eq!(Aggregation::Max.apply(&values), 4.0);
    }

    #[test]
    fn test_apply_sum_without_numbers() {
        let values = vec![Cell::Text("x".to_string()), Cell::Null];
        assert_eq!(Aggregation::Sum.apply(&values), 0.0);
    }

    #[test]
    fn test_new_applies_defaults() {
        let chart = ChartDefinition::new(ChartKind::Pie, "state_chart".to_string());
        assert!(chart.filters.is_empty());
        assert_eq!(chart.aggregation, Aggregation::Count);
        assert!(chart.options.is_empty());
        assert!(chart.view_map.is_none());
    }
}
