// Repository trait for per-metro pipeline data
use crate::domain::pipeline::{Analytics, MetroConfig, Project};
use async_trait::async_trait;

#[async_trait]
pub trait MetroRepository: Send + Sync {
    /// All tracked projects for a metro
    async fn fetch_projects(&self, metro_id: &str) -> anyhow::Result<Vec<Project>>;

    /// Pre-aggregated pipeline analytics for a metro
    async fn fetch_analytics(&self, metro_id: &str) -> anyhow::Result<Analytics>;

    async fn fetch_config(&self, metro_id: &str) -> anyhow::Result<MetroConfig>;
}
