use std::collections::HashMap;

use tracing::debug;

use crate::{fetch_dataset, DatasetRecord, DatasetSource, Result};

/// Session-scoped memo of normalized datasets, keyed by dataset name.
/// Failed fetches are not remembered.
#[derive(Debug, Default)]
pub struct RecordCache {
    entries: HashMap<String, Vec<DatasetRecord>>,
}

impl RecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fetch<S: DatasetSource + ?Sized>(
        &mut self,
        source: &S,
        dataset_name: &str,
    ) -> Result<Vec<DatasetRecord>> {
        if let Some(hit) = self.entries.get(dataset_name) {
            debug!(dataset = %dataset_name, "dataset cache hit");
            return Ok(hit.clone());
        }

        let records = fetch_dataset(source, dataset_name).await?;
        self.entries.insert(dataset_name.to_string(), records.clone());
        Ok(records)
    }
}
