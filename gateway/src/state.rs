//! Application state for the sharing gateway.

use std::sync::Arc;

use common::config::AppConfig;
use sharing_client::DeltaSharingClient;

use crate::client::SharingClient;

/// Application state shared across handlers.
///
/// Holds nothing request-specific: profiles live only inside the request
/// that supplied them.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub sharing: Arc<dyn SharingClient>,
}

impl AppState {
    /// Creates a new application state backed by the Delta Sharing REST client.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let client = DeltaSharingClient::new(config.sharing_timeout)?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Creates a state around an arbitrary sharing client.
    pub fn with_client(config: AppConfig, sharing: Arc<dyn SharingClient>) -> Self {
        Self { config, sharing }
    }
}
