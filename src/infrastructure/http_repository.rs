// HTTP repository implementation for static per-metro JSON files
use crate::application::metro_repository::MetroRepository;
use crate::domain::pipeline::{Analytics, MetroConfig, Project};
use crate::infrastructure::config::prepare_template;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpMetroRepository {
    client: reqwest::Client,
    base_url: String,
    path_template: String,
}

impl HttpMetroRepository {
    pub fn new(base_url: String, path_template: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            path_template,
        })
    }

    fn build_url(&self, metro_id: &str, resource: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("metro".to_string(), urlencoding::encode(metro_id).into_owned());
        vars.insert("resource".to_string(), resource.to_string());

        let path = prepare_template(&self.path_template, &vars);
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, metro_id: &str, resource: &str) -> Result<T> {
        let url = self.build_url(metro_id, resource);
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("{} returned status {}", url, response.status());
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse {} response from {}", resource, url))
    }
}

#[async_trait]
impl MetroRepository for HttpMetroRepository {
    async fn fetch_projects(&self, metro_id: &str) -> Result<Vec<Project>> {
        self.fetch_json(metro_id, "projects").await
    }

    async fn fetch_analytics(&self, metro_id: &str) -> Result<Analytics> {
        self.fetch_json(metro_id, "analytics").await
    }

    async fn fetch_config(&self, metro_id: &str) -> Result<MetroConfig> {
        self.fetch_json(metro_id, "config").await
    }
}
