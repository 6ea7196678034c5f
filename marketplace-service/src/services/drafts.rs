//! Draft module construction: create, attach source, attach icon.

use std::path::Path;
use std::sync::Arc;

use super::assets::{AssetTransport, asset_file_name};
use crate::catalog::{CatalogClient, NewDraft};
use crate::error::Result;
use crate::models::{AssetType, ModuleDraftRequest, SourceReference};

#[derive(Clone)]
pub struct DraftBuilder {
    catalog: CatalogClient,
    assets: Arc<dyn AssetTransport>,
}

impl DraftBuilder {
    pub fn new(catalog: CatalogClient, assets: Arc<dyn AssetTransport>) -> Self {
        Self { catalog, assets }
    }

    /// Create a draft module ready to be published and return its id.
    ///
    /// Validation happens before any remote call. A failure after the draft
    /// exists leaves it allocated in the catalog.
    pub async fn create_draft(&self, request: &ModuleDraftRequest) -> Result<String> {
        request.validate()?;
        let account = request.account.as_deref();

        let module_id = self
            .catalog
            .create_draft_module(
                &NewDraft {
                    title: &request.name,
                    description: &request.description,
                    parent_module_id: request.parent_module_id.as_deref(),
                    scope: request.scope,
                },
                account,
            )
            .await?;

        tracing::info!(
            module_id = %module_id,
            parent_module_id = ?request.parent_module_id,
            scope = ?request.scope,
            "Draft module created"
        );

        match &request.source {
            SourceReference::AppTile(app_tile_id) => {
                self.catalog
                    .set_app_tile_source(&module_id, app_tile_id, account)
                    .await?;
            }
            SourceReference::Url(url) => {
                self.catalog
                    .set_org_app_tile_source(&module_id, url, account)
                    .await?;
            }
        }

        if let Some(asset_path) = &request.asset_path {
            self.attach_icon(&module_id, asset_path, account)
                .await
                .inspect_err(|e| {
                    tracing::warn!(
                        module_id = %module_id,
                        error = %e,
                        "Icon attach failed, draft module left in place"
                    );
                })?;
        }

        Ok(module_id)
    }

    async fn attach_icon(
        &self,
        module_id: &str,
        asset_path: &Path,
        account: Option<&str>,
    ) -> Result<()> {
        let file_name = asset_file_name(asset_path)?;
        let session = self.catalog.start_upload(&file_name, account).await?;

        self.assets
            .upload(&session.url, asset_path, &session.fields)
            .await?;

        self.catalog
            .finalize_upload(&session.id, module_id, AssetType::Icon, account)
            .await?;

        tracing::debug!(module_id = %module_id, upload_id = %session.id, "Icon attached");
        Ok(())
    }
}
