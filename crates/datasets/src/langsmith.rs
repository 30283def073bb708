//! HTTP client for the LangSmith dataset API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::{DatasetError, DatasetSource, Example, Result};

pub const DEFAULT_ENDPOINT: &str = "https://api.smith.langchain.com";
pub const PAGE_LIMIT: usize = 100;

const API_KEY_HEADER: &str = "x-api-key";
const USER_AGENT_VALUE: &str = concat!("annotator-datasets/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct DatasetSummary {
    id: Uuid,
    name: String,
}

#[derive(Debug, Clone)]
pub struct LangSmithClient {
    base_url: String,
    client: reqwest::Client,
}

impl LangSmithClient {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let mut key = HeaderValue::from_str(api_key).map_err(|e| DatasetError::Network {
            message: format!("invalid API key header: {e}"),
        })?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let client = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| DatasetError::Network {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            base_url: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn resolve_dataset_id(&self, name: &str) -> Result<Uuid> {
        let url = format!("{}/api/v1/datasets", self.base_url);
        debug!(url = %url, dataset = %name, "resolving dataset id");

        let resp = self
            .client
            .get(&url)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(network)?;

        let found: Vec<DatasetSummary> = decode(resp).await?;
        found
            .into_iter()
            .find(|d| d.name == name)
            .map(|d| d.id)
            .ok_or_else(|| DatasetError::NotFound { name: name.to_string() })
    }

    async fn list_page(&self, dataset_id: Uuid, offset: usize) -> Result<Vec<Example>> {
        let url = format!("{}/api/v1/examples", self.base_url);
        debug!(url = %url, dataset_id = %dataset_id, offset, "listing examples");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("dataset", dataset_id.to_string()),
                ("offset", offset.to_string()),
                ("limit", PAGE_LIMIT.to_string()),
            ])
            .send()
            .await
            .map_err(network)?;

        decode(resp).await
    }
}

#[async_trait]
impl DatasetSource for LangSmithClient {
    async fn list_examples(&self, dataset_name: &str) -> Result<Vec<Example>> {
        let dataset_id = self.resolve_dataset_id(dataset_name).await?;

        // Stops on a short or empty page. A server that ignores `offset`
        // hands back the same page again, which is an error rather than a
        // reason to keep going.
        let mut out = Vec::new();
        let mut previous_first: Option<Uuid> = None;
        loop {
            let page = self.list_page(dataset_id, out.len()).await?;
            let Some(first) = page.first().map(|e| e.id) else {
                break;
            };
            if previous_first == Some(first) {
                return Err(DatasetError::InvalidResponse {
                    message: format!("server repeated page at offset {}", out.len()),
                });
            }
            previous_first = Some(first);

            let short = page.len() < PAGE_LIMIT;
            out.extend(page);
            if short {
                break;
            }
        }
        Ok(out)
    }
}

fn network(e: reqwest::Error) -> DatasetError {
    DatasetError::Network { message: e.to_string() }
}

async fn decode<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(DatasetError::Http { status: status.as_u16(), body });
    }

    resp.json().await.map_err(|e| DatasetError::InvalidResponse {
        message: e.to_string(),
    })
}
