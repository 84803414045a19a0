//! API handlers and the state they share.

pub mod integration;
pub mod oauth;
pub mod tree;

pub use integration::*;
pub use oauth::*;
pub use tree::*;

use std::sync::Arc;

use reqwest::Client;

use crate::auth::{OAuthClient, SessionStore};
use crate::config::Config;
use crate::platform::{
    http::build_client, BoxClient, DataManagementClient, HttpBoxClient,
    HttpDataManagementClient, HttpStorageTransfer, StorageTransferClient,
};
use crate::transfer::{OrphanHandler, TransferOrchestrator};
use crate::Result;

/// OAuth clients of both platforms.
#[derive(Debug, Clone)]
pub struct OAuthClients {
    /// Data-management client (internal scope).
    pub data_management: OAuthClient,
    /// Box client.
    pub box_platform: OAuthClient,
    /// Scope of the browser-facing data-management token.
    pub public_scope: Vec<String>,
}

impl OAuthClients {
    /// Build both clients from configuration.
    pub fn from_config(http: Client, config: &Config) -> Self {
        Self {
            data_management: OAuthClient::data_management(http.clone(), &config.data_management),
            box_platform: OAuthClient::box_platform(http, &config.box_platform),
            public_scope: config.data_management.scope_public.clone(),
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Browser sessions.
    pub sessions: SessionStore,
    /// Transfer pipeline.
    pub orchestrator: TransferOrchestrator,
    /// Data-management client, for tree listings and the profile.
    pub dm: Arc<dyn DataManagementClient>,
    /// Box client, for tree listings.
    pub boxes: Arc<dyn BoxClient>,
    /// OAuth clients.
    pub oauth: OAuthClients,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        sessions: SessionStore,
        dm: Arc<dyn DataManagementClient>,
        boxes: Arc<dyn BoxClient>,
        storage: Arc<dyn StorageTransferClient>,
        oauth: OAuthClients,
    ) -> Self {
        let orchestrator = TransferOrchestrator::new(dm.clone(), boxes.clone(), storage);
        Self {
            sessions,
            orchestrator,
            dm,
            boxes,
            oauth,
        }
    }

    /// Replace the handler notified about orphaned storage slots.
    pub fn with_orphan_handler(mut self, orphans: Arc<dyn OrphanHandler>) -> Self {
        self.orchestrator = self.orchestrator.with_orphan_handler(orphans);
        self
    }

    /// Build the production state: HTTPS clients for both platforms.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = build_client(&config.http)?;
        let dm_base = &config.data_management.base_url;

        let dm = Arc::new(HttpDataManagementClient::new(http.clone(), dm_base));
        let boxes = Arc::new(HttpBoxClient::new(
            http.clone(),
            &config.box_platform.api_base_url,
        ));
        let storage = Arc::new(HttpStorageTransfer::new(
            http.clone(),
            dm_base,
            &config.box_platform.upload_base_url,
        ));

        Ok(Self::new(
            SessionStore::new(config.server.session_ttl_secs),
            dm,
            boxes,
            storage,
            OAuthClients::from_config(http, config),
        ))
    }
}
