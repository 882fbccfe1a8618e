// Metro domain model
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metro {
    pub id: String,
    pub name: String,
    pub display: String,
}

impl Metro {
    pub fn new(id: impl Into<String>, name: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            display: display.into(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error("metro catalog is empty")]
    Empty,
    #[error("metro id '{0}' is listed more than once")]
    DuplicateId(String),
}

/// The closed set of metros the dashboard can switch between.
#[derive(Debug, Clone)]
pub struct MetroCatalog {
    metros: Vec<Metro>,
}

impl MetroCatalog {
    pub fn new(metros: Vec<Metro>) -> Result<Self, CatalogError> {
        if metros.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for metro in &metros {
            if !seen.insert(metro.id.as_str()) {
                return Err(CatalogError::DuplicateId(metro.id.clone()));
            }
        }

        Ok(Self { metros })
    }

    pub fn get(&self, id: &str) -> Option<&Metro> {
        self.metros.iter().find(|m| m.id == id)
    }

    pub fn all(&self) -> &[Metro] {
        &self.metros
    }

    /// First configured metro, used when no default is configured
    pub fn first(&self) -> &Metro {
        &self.metros[0]
    }
}
