use async_trait::async_trait;

use crate::types::ReportSummary;
use crate::{FetchError, Result};

#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Human readable location, used in logs
    fn describe(&self) -> String;

    /// Path of the index file relative to this source
    fn index_path(&self) -> &str;

    /// Fetch a file as text
    async fn fetch_text(&self, path: &str) -> Result<String>;

    /// Fetch and decode the report index
    async fn fetch_index(&self) -> Result<Vec<ReportSummary>> {
        let path = self.index_path().to_string();
        let body = self.fetch_text(&path).await?;
        let reports = serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            resource: path,
            message: e.to_string(),
        })?;
        Ok(reports)
    }

    /// Fetch the raw Markdown of one report
    async fn fetch_report(&self, file: &str) -> Result<String> {
        self.fetch_text(file).await
    }
}
