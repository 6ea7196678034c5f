//! Typed catalog operations on top of a [`CatalogGateway`].

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

use super::gateway::{CatalogGateway, CatalogRequest};
use super::operations::CatalogOperation;
use crate::error::{MarketplaceError, Result};
use crate::models::{AssetType, PublishedModule, Scope, UploadSession};

pub const APP_TILE_CATEGORY: &str = "APP_TILE";

#[derive(Deserialize)]
struct IdPayload {
    id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleIdPayload {
    module_id: String,
}

#[derive(Deserialize)]
struct PublishedPayload {
    id: String,
    version: VersionPayload,
}

#[derive(Deserialize)]
struct VersionPayload {
    version: String,
}

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedVersion {
    pub id: String,
    pub version: String,
}

/// Fields of a new draft module.
#[derive(Debug, Clone)]
pub struct NewDraft<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub parent_module_id: Option<&'a str>,
    pub scope: Scope,
}

#[derive(Clone)]
pub struct CatalogClient {
    gateway: Arc<dyn CatalogGateway>,
}

impl CatalogClient {
    pub fn new(gateway: Arc<dyn CatalogGateway>) -> Self {
        Self { gateway }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: CatalogOperation,
        variables: Value,
        account: Option<&str>,
    ) -> Result<Option<T>> {
        let data = self
            .gateway
            .execute(CatalogRequest::new(operation, variables).with_account(account))
            .await?;

        // A null field means "absent"; a missing one is a malformed response.
        match data.get(operation.response_field()) {
            None => Err(MarketplaceError::Remote(format!(
                "{} response missing {}",
                operation,
                operation.response_field()
            ))),
            Some(Value::Null) => Ok(None),
            Some(payload) => serde_json::from_value(payload.clone()).map(Some).map_err(|e| {
                MarketplaceError::Remote(format!("failed to decode {} response: {}", operation, e))
            }),
        }
    }

    async fn call_required<T: DeserializeOwned>(
        &self,
        operation: CatalogOperation,
        variables: Value,
        account: Option<&str>,
    ) -> Result<T> {
        self.call(operation, variables, account)
            .await?
            .ok_or_else(|| MarketplaceError::Remote(format!("{} returned no result", operation)))
    }

    /// Fetch a published module; `None` when the catalog does not know it (yet).
    ///
    /// A missing `version` selects the latest published version.
    pub async fn get_published_module(
        &self,
        module_id: &str,
        version: Option<&str>,
        account: Option<&str>,
    ) -> Result<Option<PublishedModule>> {
        self.call(
            CatalogOperation::GetPublishedModule,
            json!({ "id": module_id, "version": version }),
            account,
        )
        .await
    }

    pub async fn create_draft_module(
        &self,
        draft: &NewDraft<'_>,
        account: Option<&str>,
    ) -> Result<String> {
        let payload: IdPayload = self
            .call_required(
                CatalogOperation::CreateDraftModule,
                json!({
                    "input": {
                        "title": draft.title,
                        "description": draft.description,
                        "parentModuleId": draft.parent_module_id,
                        "category": APP_TILE_CATEGORY,
                        "scope": draft.scope,
                    }
                }),
                account,
            )
            .await?;

        if payload.id.is_empty() {
            return Err(MarketplaceError::Remote(
                "CreateDraftModule returned an empty module id".to_string(),
            ));
        }

        Ok(payload.id)
    }

    pub async fn set_app_tile_source(
        &self,
        module_id: &str,
        app_tile_id: &str,
        account: Option<&str>,
    ) -> Result<String> {
        let payload: ModuleIdPayload = self
            .call_required(
                CatalogOperation::SetAppTile,
                json!({
                    "input": {
                        "moduleId": module_id,
                        "sourceInfo": { "id": app_tile_id },
                    }
                }),
                account,
            )
            .await?;

        Ok(payload.module_id)
    }

    pub async fn set_org_app_tile_source(
        &self,
        module_id: &str,
        url: &str,
        account: Option<&str>,
    ) -> Result<String> {
        let payload: ModuleIdPayload = self
            .call_required(
                CatalogOperation::SetOrgAppTile,
                json!({
                    "input": {
                        "moduleId": module_id,
                        "sourceInfo": { "url": url },
                    }
                }),
                account,
            )
            .await?;

        Ok(payload.module_id)
    }

    pub async fn start_upload(
        &self,
        file_name: &str,
        account: Option<&str>,
    ) -> Result<UploadSession> {
        self.call_required(
            CatalogOperation::StartUpload,
            json!({ "input": { "fileName": file_name } }),
            account,
        )
        .await
    }

    pub async fn finalize_upload(
        &self,
        upload_id: &str,
        module_id: &str,
        asset_type: AssetType,
        account: Option<&str>,
    ) -> Result<String> {
        let payload: ModuleIdPayload = self
            .call_required(
                CatalogOperation::FinalizeUpload,
                json!({
                    "input": {
                        "id": upload_id,
                        "moduleId": module_id,
                        "type": asset_type,
                    }
                }),
                account,
            )
            .await?;

        Ok(payload.module_id)
    }

    pub async fn publish_draft_module(
        &self,
        module_id: &str,
        version: &str,
        account: Option<&str>,
    ) -> Result<PublishedVersion> {
        let payload: PublishedPayload = self
            .call_required(
                CatalogOperation::PublishDraftModule,
                json!({
                    "input": {
                        "moduleId": module_id,
                        "version": { "version": version },
                    }
                }),
                account,
            )
            .await?;

        Ok(PublishedVersion {
            id: payload.id,
            version: payload.version.version,
        })
    }

    pub async fn delete_module(&self, module_id: &str, account: Option<&str>) -> Result<()> {
        self.gateway
            .execute(
                CatalogRequest::new(
                    CatalogOperation::DeleteModule,
                    json!({ "input": { "moduleId": module_id } }),
                )
                .with_account(account),
            )
            .await?;

        Ok(())
    }
}
