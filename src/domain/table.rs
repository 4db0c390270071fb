// Tabular data domain model
use anyhow::bail;
use serde::Serialize;
use std::cmp::Ordering;

/// A single scalar value in a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Cell::Null,
            serde_json::Value::Number(n) => Cell::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => Cell::Text(s.clone()),
            serde_json::Value::Bool(b) => Cell::Text(b.to_string()),
            // Nested values flatten to their JSON text
            other => Cell::Text(other.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            Cell::Null => None,
        }
    }

    /// Total ordering for deterministic group output: Null < Number < Text
    pub fn compare(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Cell::Null, Cell::Null) => Ordering::Equal,
            (Cell::Null, _) => Ordering::Less,
            (_, Cell::Null) => Ordering::Greater,
            (Cell::Number(a), Cell::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Cell::Number(_), Cell::Text(_)) => Ordering::Less,
            (Cell::Text(_), Cell::Number(_)) => Ordering::Greater,
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Number,
    String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub id: String,
    pub label: String,
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(id: String, label: String, column_type: ColumnType) -> Self {
        Self {
            id,
            label,
            column_type,
        }
    }
}

/// The shared table all charts of one dashboard render from.
/// Every row holds exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

impl DataTable {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Cell>>) -> anyhow::Result<Self> {
        let width = columns.len();
        if !rows.iter().all(|row| row.len() == width) {
            bail!("all rows must have exactly {} cells", width);
        }
        Ok(Self { columns, rows })
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }
}
