// Metro data loader - Use case for loading one metro's data set
use crate::application::metro_repository::MetroRepository;
use crate::domain::metro::Metro;
use crate::domain::pipeline::MetroData;
use std::sync::Arc;

/// A load failed. Which resource failed is only logged, never surfaced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Failed to load data for {metro}. Please try again.")]
pub struct LoadError {
    pub metro: String,
}

#[derive(Clone)]
pub struct MetroDataLoader {
    repository: Arc<dyn MetroRepository>,
}

impl MetroDataLoader {
    pub fn new(repository: Arc<dyn MetroRepository>) -> Self {
        Self { repository }
    }

    /// Fetch projects, analytics and config concurrently. All three are
    /// awaited; the load succeeds only if every one of them did.
    pub async fn load(&self, metro: &Metro) -> Result<MetroData, LoadError> {
        let (projects, analytics, config) = futures::join!(
            self.repository.fetch_projects(&metro.id),
            self.repository.fetch_analytics(&metro.id),
            self.repository.fetch_config(&metro.id),
        );

        let failures = [
            ("projects", projects.as_ref().err()),
            ("analytics", analytics.as_ref().err()),
            ("config", config.as_ref().err()),
        ];
        for (resource, error) in failures {
            if let Some(e) = error {
                tracing::warn!("Error fetching {} for {}: {:#}", resource, metro.id, e);
            }
        }

        match (projects, analytics, config) {
            (Ok(projects), Ok(analytics), Ok(config)) => {
                tracing::info!(
                    "Loaded {} projects for {} (last updated {})",
                    projects.len(),
                    metro.id,
                    config.last_updated
                );
                Ok(MetroData {
                    projects,
                    analytics,
                    config,
                })
            }
            _ => Err(LoadError {
                metro: metro.display.clone(),
            }),
        }
    }
}
