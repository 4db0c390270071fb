// Port for loading the shared data table
use crate::domain::table::DataTable;
use async_trait::async_trait;

#[async_trait]
pub trait TableSource: Send + Sync {
    /// Fetch and normalize the record set behind `url` into a table
    async fn load_table(&self, url: &str) -> anyhow::Result<DataTable>;
}
