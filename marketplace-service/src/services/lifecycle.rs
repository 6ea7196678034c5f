//! Create/read/update/delete surface consumed by declarative callers.

use reqwest::Client;
use service_core::retry::{RetryConfig, Sleeper, TokioSleeper};
use std::path::Path;
use std::sync::Arc;

use super::assets::{AssetTransport, HttpAssetTransport};
use super::drafts::DraftBuilder;
use super::publisher::PublishOrchestrator;
use super::reader::{ModuleReader, content_hash};
use super::version::{version_for_create, version_for_update};
use crate::catalog::{CatalogClient, CatalogGateway, GraphqlGateway};
use crate::config::Settings;
use crate::error::{MarketplaceError, Result};
use crate::models::{ModuleDeclaration, ModuleState};

#[derive(Clone)]
pub struct ModuleLifecycle {
    catalog: CatalogClient,
    publisher: PublishOrchestrator,
    reader: ModuleReader,
}

impl ModuleLifecycle {
    pub fn new(
        gateway: Arc<dyn CatalogGateway>,
        assets: Arc<dyn AssetTransport>,
        retry: RetryConfig,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let catalog = CatalogClient::new(gateway);
        let drafts = DraftBuilder::new(catalog.clone(), assets.clone());

        Self {
            publisher: PublishOrchestrator::new(drafts, catalog.clone()),
            reader: ModuleReader::new(catalog.clone(), assets, retry, sleeper),
            catalog,
        }
    }

    /// Wire the HTTP gateway and asset transport over one shared client.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.catalog.request_timeout())
            .build()?;

        let gateway = GraphqlGateway::with_client(client.clone(), settings.catalog.clone())?;
        tracing::info!(endpoint = %gateway.endpoint(), "Catalog gateway configured");

        Ok(Self::new(
            Arc::new(gateway),
            Arc::new(HttpAssetTransport::new(client)),
            settings.reader.retry_config(),
            Arc::new(TokioSleeper),
        ))
    }

    /// Publish a new module and read it back.
    ///
    /// Without a declared version, auto_version is required and `0.0.0` is used.
    pub async fn create(&self, declaration: &ModuleDeclaration) -> Result<ModuleState> {
        let version =
            version_for_create(declaration.version.as_deref(), declaration.auto_version)?;
        let request = declaration.to_draft_request(&version, None)?;

        let published = self.publisher.publish(&request).await?;
        self.reader
            .read_state(&published.id, declaration.account.as_deref())
            .await
    }

    pub async fn read(&self, module_id: &str, account: Option<&str>) -> Result<ModuleState> {
        self.reader.read_state(module_id, account).await
    }

    /// Publish a new version superseding `module_id` and return that version.
    ///
    /// With auto_version the patch of `current_version` (the version last
    /// recorded for the module) is bumped; otherwise the declared version is
    /// published unchanged.
    pub async fn update(
        &self,
        module_id: &str,
        declaration: &ModuleDeclaration,
        current_version: Option<&str>,
    ) -> Result<String> {
        let version = if declaration.auto_version {
            version_for_update(current_version.or(declaration.version.as_deref()), true)?
        } else {
            version_for_update(declaration.version.as_deref(), false)?
        };
        let request = declaration.to_draft_request(&version, Some(module_id))?;

        let published = self.publisher.publish(&request).await?;
        Ok(published.version)
    }

    pub async fn delete(&self, module_id: &str, account: Option<&str>) -> Result<()> {
        self.catalog.delete_module(module_id, account).await?;
        tracing::info!(module_id = %module_id, "Module deleted");
        Ok(())
    }

    /// Declared fields that differ from the module currently in the catalog.
    pub async fn plan(
        &self,
        module_id: &str,
        declaration: &ModuleDeclaration,
    ) -> Result<Vec<&'static str>> {
        let state = self.read(module_id, declaration.account.as_deref()).await?;
        let local_hash = match &declaration.image {
            Some(path) => Some(local_image_hash(path).await?),
            None => None,
        };

        Ok(state.drift(declaration, local_hash.as_deref()))
    }
}

/// MD5 of a local image, in the same form as [`ModuleState::image_hash`].
pub async fn local_image_hash(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        MarketplaceError::Upload(format!("failed to read '{}': {}", path.display(), e))
    })?;
    Ok(content_hash(&bytes))
}
