use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub const DEFAULT_LOG_LEVEL: &str = "INFO";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";

#[derive(Clone)]
pub struct AppConfig {
    pub langchain_project: Option<String>,
    pub langchain_api_key: String,
    pub langchain_tracing: bool,
    pub langchain_endpoint: String,

    pub log_level: String,
    pub log_use_basic_format: bool,

    pub bind_addr: String,
    pub output_dir: PathBuf,
    pub allowed_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let langchain_api_key = var("LANGCHAIN_API_KEY")
            .filter(|v| !v.is_empty())
            .context("Missing required env var: LANGCHAIN_API_KEY")?;
        let langchain_project = var("LANGCHAIN_PROJECT");
        let langchain_tracing = var("LANGCHAIN_TRACING").is_some_and(|v| to_boolean(&v));
        let langchain_endpoint =
            var("LANGCHAIN_ENDPOINT").unwrap_or_else(|| datasets::DEFAULT_ENDPOINT.to_string());

        let log_level = var("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let log_use_basic_format = var("LOG_USE_BASIC_FORMAT").is_some_and(|v| to_boolean(&v));

        let bind_addr = var("ANNOTATOR_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let output_dir = var("ANNOTATOR_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let allowed_origin = var("ANNOTATOR_ALLOWED_ORIGIN").filter(|v| !v.is_empty());

        if !langchain_endpoint.starts_with("http://") && !langchain_endpoint.starts_with("https://") {
            bail!("LANGCHAIN_ENDPOINT must start with http:// or https://");
        }
        if let Some(origin) = &allowed_origin {
            if !origin.starts_with("http://") && !origin.starts_with("https://") {
                bail!("ANNOTATOR_ALLOWED_ORIGIN must start with http:// or https://");
            }
        }

        Ok(Self {
            langchain_project,
            langchain_api_key,
            langchain_tracing,
            langchain_endpoint,
            log_level,
            log_use_basic_format,
            bind_addr,
            output_dir,
            allowed_origin,
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("langchain_project", &self.langchain_project)
            .field("langchain_api_key", &"<redacted>")
            .field("langchain_tracing", &self.langchain_tracing)
            .field("langchain_endpoint", &self.langchain_endpoint)
            .field("log_level", &self.log_level)
            .field("log_use_basic_format", &self.log_use_basic_format)
            .field("bind_addr", &self.bind_addr)
            .field("output_dir", &self.output_dir)
            .field("allowed_origin", &self.allowed_origin)
            .finish()
    }
}

/// `yes`, `true`, `y` and `1` (any case) are true; everything else is false.
pub fn to_boolean(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "yes" | "true" | "y" | "1")
}
