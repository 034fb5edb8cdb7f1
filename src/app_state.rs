//! Application State Management
//!
//! This module provides the application state that contains all services
//! and their dependencies, following the dependency injection pattern.
//! The object store client is constructed once here and shared by every
//! request.

use std::sync::Arc;
use actix_web::web;
use log::info;

use crate::config::AppConfig;
use crate::service::ActionService;
use crate::storage::{ObjectStore, StoreError, mock_store::MockObjectStore};

/// Application state containing all services and their dependencies
#[derive(Clone)]
pub struct AppState {
    pub action_service: Arc<ActionService>,
    pub config: AppConfig,
}

impl AppState {
    /// Create application state from configuration
    pub async fn from_config(config: AppConfig) -> Result<Self, StoreError> {
        info!("Initializing application state with configuration");

        let store = config.storage.create_store().await?;
        let state = Self::with_store(config, store);

        info!("Application state initialized successfully");
        Ok(state)
    }

    /// Create application state around an already constructed store
    pub fn with_store(config: AppConfig, store: Arc<dyn ObjectStore>) -> Self {
        let action_service = Arc::new(ActionService::new(store, &config.storage, config.actions.clone()));
        Self {
            action_service,
            config,
        }
    }

    /// Create application state for testing with a mock backend
    pub fn new_for_testing() -> Self {
        Self::with_store(AppConfig::default(), Arc::new(MockObjectStore::new()))
    }
}

/// Helper function to extract app state from Actix-web data
pub fn extract_app_state(data: &web::Data<AppState>) -> &AppState {
    data.as_ref()
}
