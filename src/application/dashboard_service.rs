// Dashboard service - Owns the dashboard state and drives load cycles
use crate::application::metro_loader::MetroDataLoader;
use crate::application::pdf_export::{export_to_pdf, ExportError, PdfExport};
use crate::domain::dashboard::{DashboardEvent, DashboardState, RequestId};
use crate::domain::metro::{Metro, MetroCatalog};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DashboardError {
    #[error("unknown metro '{0}'")]
    UnknownMetro(String),
}

#[derive(Clone)]
pub struct DashboardService {
    catalog: Arc<MetroCatalog>,
    loader: MetroDataLoader,
    state: Arc<RwLock<DashboardState>>,
}

impl DashboardService {
    pub fn new(catalog: Arc<MetroCatalog>, loader: MetroDataLoader, initial: Metro) -> Self {
        Self {
            catalog,
            loader,
            state: Arc::new(RwLock::new(DashboardState::new(initial))),
        }
    }

    pub fn catalog(&self) -> &MetroCatalog {
        &self.catalog
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// Kick off the load cycle for the initial metro
    pub async fn start(&self) -> JoinHandle<()> {
        let (metro, request) = {
            let state = self.state.read().await;
            (state.selected.clone(), state.request)
        };
        self.spawn_load(metro, request)
    }

    /// Switch metros. The state is `Loading` by the time this returns; the
    /// handle resolves once the new load has been applied. Selecting the
    /// current metro does nothing.
    pub async fn select_metro(&self, metro_id: &str) -> Result<Option<JoinHandle<()>>, DashboardError> {
        let metro = self
            .catalog
            .get(metro_id)
            .cloned()
            .ok_or_else(|| DashboardError::UnknownMetro(metro_id.to_string()))?;

        let (metro, request) = {
            let mut state = self.state.write().await;
            let before = state.request;
            *state = state.clone().reduce(DashboardEvent::MetroSelected(metro));
            if state.request == before {
                return Ok(None);
            }
            (state.selected.clone(), state.request)
        };

        tracing::info!("Selected metro {} (request {})", metro.id, request);
        Ok(Some(self.spawn_load(metro, request)))
    }

    /// Rebuild the selected metro's state from scratch
    pub async fn retry(&self) -> JoinHandle<()> {
        let (metro, request) = {
            let mut state = self.state.write().await;
            *state = state.clone().reduce(DashboardEvent::RetryRequested);
            (state.selected.clone(), state.request)
        };

        tracing::info!("Retrying load for {} (request {})", metro.id, request);
        self.spawn_load(metro, request)
    }

    /// Export the loaded project table for the selected metro
    pub async fn export(&self, date: NaiveDate) -> Result<Option<PdfExport>, ExportError> {
        let state = self.snapshot().await;
        let projects = state.data().map(|data| data.projects.as_slice());
        export_to_pdf(projects, &state.selected.display, date)
    }

    fn spawn_load(&self, metro: Metro, request: RequestId) -> JoinHandle<()> {
        let loader = self.loader.clone();
        let state = self.state.clone();

        tokio::spawn(async move {
            let event = match loader.load(&metro).await {
                Ok(data) => DashboardEvent::LoadSucceeded {
                    request,
                    data: Arc::new(data),
                },
                Err(e) => DashboardEvent::LoadFailed {
                    request,
                    message: e.to_string(),
                },
            };

            let mut state = state.write().await;
            if state.request != request {
                tracing::warn!(
                    "Discarding stale load for {} (request {}, current {})",
                    metro.id,
                    request,
                    state.request
                );
                return;
            }
            *state = state.clone().reduce(event);
        })
    }
}
