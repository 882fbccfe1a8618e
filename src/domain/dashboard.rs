// Dashboard state container and its transitions
use super::metro::Metro;
use super::pipeline::MetroData;
use std::sync::Arc;

/// Monotonically increasing tag for each load cycle
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loading,
    Failed(String),
    Loaded(Arc<MetroData>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    MetroSelected(Metro),
    RetryRequested,
    LoadSucceeded {
        request: RequestId,
        data: Arc<MetroData>,
    },
    LoadFailed {
        request: RequestId,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub selected: Metro,
    pub request: RequestId,
    pub status: LoadStatus,
}

impl DashboardState {
    pub fn new(selected: Metro) -> Self {
        Self {
            selected,
            request: 0,
            status: LoadStatus::Loading,
        }
    }

    /// Apply one event. Selecting a new metro or retrying starts a fresh load
    /// cycle with the next request id; results for any other request id are
    /// ignored.
    pub fn reduce(self, event: DashboardEvent) -> Self {
        match event {
            DashboardEvent::MetroSelected(metro) => {
                if metro.id == self.selected.id {
                    return self;
                }
                Self {
                    selected: metro,
                    request: self.request + 1,
                    status: LoadStatus::Loading,
                }
            }
            DashboardEvent::RetryRequested => Self {
                request: self.request + 1,
                status: LoadStatus::Loading,
                ..self
            },
            DashboardEvent::LoadSucceeded { request, data } if request == self.request => Self {
                status: LoadStatus::Loaded(data),
                ..self
            },
            DashboardEvent::LoadFailed { request, message } if request == self.request => Self {
                status: LoadStatus::Failed(message),
                ..self
            },
            DashboardEvent::LoadSucceeded { .. } | DashboardEvent::LoadFailed { .. } => self,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, LoadStatus::Loading)
    }

    pub fn data(&self) -> Option<&Arc<MetroData>> {
        match &self.status {
            LoadStatus::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}
