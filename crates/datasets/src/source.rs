use async_trait::async_trait;
use tracing::info;

use crate::{normalize, DatasetError, DatasetRecord, Example, Result};

/// Anything that can list the examples of a named dataset.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn list_examples(&self, dataset_name: &str) -> Result<Vec<Example>>;
}

/// Fetch and normalize every example of `dataset_name`.
///
/// All failures come back as [`DatasetError::Read`] carrying the original
/// message.
pub async fn fetch_dataset<S: DatasetSource + ?Sized>(
    source: &S,
    dataset_name: &str,
) -> Result<Vec<DatasetRecord>> {
    if dataset_name.trim().is_empty() {
        return Err(DatasetError::read("dataset name must not be empty"));
    }

    let examples = source
        .list_examples(dataset_name)
        .await
        .map_err(DatasetError::read)?;

    let records: Vec<DatasetRecord> = examples.iter().map(normalize).collect();
    info!(dataset = %dataset_name, records = records.len(), "dataset fetched");
    Ok(records)
}
