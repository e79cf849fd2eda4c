//! Application state
//!
//! Holds the capability catalog and the server configuration. Both are
//! read-only after startup, so handlers share them through an `Arc` with no
//! locking.

use crate::catalog::Catalog;
use crate::config::ServerConfig;
use crate::error::Result;
use crate::plan::{plan_streams, StreamOptimization};

#[derive(Debug)]
pub struct AppState {
    /// Engine capability catalog
    pub catalog: Catalog,
    /// Server configuration
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig, catalog: Catalog) -> Self {
        Self { catalog, config }
    }

    /// Build state, loading the configured catalog or the built-in one.
    pub fn from_config(config: ServerConfig) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_file(path)?,
            None => {
                tracing::info!("No catalog configured, using the built-in catalog");
                Catalog::builtin()?
            }
        };
        Ok(Self::new(config, catalog))
    }

    /// Plan streams against the shared catalog.
    pub fn plan<S: AsRef<str>>(&self, subscriptions: &[S]) -> StreamOptimization {
        plan_streams(&self.catalog, subscriptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;
    use std::path::PathBuf;

    #[test]
    fn test_from_config_builtin() {
        let state = AppState::from_config(ServerConfig::default()).unwrap();
        assert!(state.catalog.is_supported("en"));
        let plan = state.plan(&["transcription:en"]);
        assert_eq!(plan.streams.len(), 1);
    }

    #[test]
    fn test_from_config_missing_catalog() {
        let config = ServerConfig {
            catalog_path: Some(PathBuf::from("/nonexistent/catalog.json")),
            ..Default::default()
        };
        assert!(matches!(
            AppState::from_config(config),
            Err(PlannerError::Catalog(_))
        ));
    }
}
