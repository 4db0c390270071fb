// HTTP data source adapter - Fetch JSON and normalize it into a table
use crate::application::table_source::TableSource;
use crate::domain::table::{Cell, Column, ColumnType, DataTable};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("response was not valid JSON: {0}")]
    Parse(#[source] reqwest::Error),

    #[error("no record array found in response")]
    NoRecordArray,
}

/// Fetches a serialized record set over HTTP and turns the first array found
/// in the response envelope into a schema-tagged `DataTable`.
#[derive(Debug, Clone)]
pub struct DataBridge {
    client: reqwest::Client,
    scan_rows: usize,
}

impl DataBridge {
    pub fn new(request_timeout_ms: u64, scan_rows: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(request_timeout_ms))
            .build()
            .expect("failed to build HTTP client");
        Self { client, scan_rows }
    }

    async fn send(
        &self,
        method: reqwest::Method,
        url: &str,
        accept: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, BridgeError> {
        let mut request = self.client.request(method, url).header("Accept", accept);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("request to {} failed: {}", url, e);
            BridgeError::Network(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string();
            tracing::error!("request to {} returned {}", url, status);
            return Err(BridgeError::Http {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    pub async fn get_json(&self, url: &str) -> Result<Value, BridgeError> {
        let response = self
            .send(reqwest::Method::GET, url, "application/json", None)
            .await?;
        response.json().await.map_err(|e| {
            tracing::error!("response from {} was not valid JSON: {}", url, e);
            BridgeError::Parse(e)
        })
    }

    #[allow(dead_code)]
    pub async fn post_json(&self, url: &str, body: &Value) -> Result<Value, BridgeError> {
        let response = self
            .send(reqwest::Method::POST, url, "application/json", Some(body))
            .await?;
        response.json().await.map_err(|e| {
            tracing::error!("response from {} was not valid JSON: {}", url, e);
            BridgeError::Parse(e)
        })
    }

    #[allow(dead_code)]
    pub async fn get_text(&self, url: &str) -> Result<String, BridgeError> {
        let response = self
            .send(reqwest::Method::GET, url, "text/plain", None)
            .await?;
        response.text().await.map_err(BridgeError::Network)
    }

    /// Normalize a fetched response body into a table.
    fn table_from_json(&self, json: &Value) -> anyhow::Result<DataTable> {
        let Some(records) = find_record_array(json) else {
            tracing::error!("no record array found in response");
            return Err(BridgeError::NoRecordArray.into());
        };
        let columns = infer_columns(records, self.scan_rows);
        let rows = rows_to_table(records, &columns);
        DataTable::new(columns, rows)
    }
}

#[async_trait]
impl TableSource for DataBridge {
    async fn load_table(&self, url: &str) -> anyhow::Result<DataTable> {
        let json = self.get_json(url).await?;
        self.table_from_json(&json)
    }
}

/// Depth-first descent through the response envelope, returning the first
/// array encountered in document property order.
fn find_record_array(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.values().find_map(find_record_array),
        _ => None,
    }
}

/// Infer the column schema from up to `scan_rows` leading records (0 means
/// all). A column is numeric iff every sampled value for its key is absent,
/// null, empty text, or parses as a number. Keys are collected across the
/// sample in first-seen order.
fn infer_columns(records: &[Value], scan_rows: usize) -> Vec<Column> {
    let scan = if scan_rows == 0 || scan_rows > records.len() {
        records.len()
    } else {
        scan_rows
    };
    let sample = &records[..scan];

    let mut columns: Vec<Column> = Vec::new();
    for record in sample {
        let Value::Object(fields) = record else {
            continue;
        };
        for key in fields.keys() {
            if columns.iter().any(|c| c.id == *key) {
                continue;
            }
            let numeric = sample.iter().all(|r| match r.get(key) {
                None | Some(Value::Null) => true,
                Some(Value::Number(_)) => true,
                Some(Value::String(s)) if s.trim().is_empty() => true,
                Some(Value::String(s)) => s.trim().parse::<f64>().is_ok(),
                Some(_) => false,
            });
            let column_type = if numeric {
                ColumnType::Number
            } else {
                ColumnType::String
            };
            columns.push(Column::new(key.clone(), key.clone(), column_type));
        }
    }
    columns
}

/// Materialize every record against the column order. Missing keys become
/// null cells; keys outside the schema are dropped.
fn rows_to_table(records: &[Value], columns: &[Column]) -> Vec<Vec<Cell>> {
    records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| {
                    record
                        .get(&column.id)
                        .map(Cell::from_json)
                        .unwrap_or(Cell::Null)
                })
                .collect()
        })
        .collect()
}
