use super::drafts::DraftBuilder;
use crate::catalog::{CatalogClient, PublishedVersion};
use crate::error::{MarketplaceError, Result};
use crate::models::ModuleDraftRequest;

/// Drives a draft through to a published module version.
#[derive(Clone)]
pub struct PublishOrchestrator {
    drafts: DraftBuilder,
    catalog: CatalogClient,
}

impl PublishOrchestrator {
    pub fn new(drafts: DraftBuilder, catalog: CatalogClient) -> Self {
        Self { drafts, catalog }
    }

    /// Publish `request` as a new module version and return the published id.
    pub async fn publish(&self, request: &ModuleDraftRequest) -> Result<PublishedVersion> {
        let result = self.publish_inner(request).await;

        let outcome = match &result {
            Ok(_) => "published",
            Err(e) if e.is_invalid_input() => "rejected",
            Err(_) => "failed",
        };
        metrics::counter!("marketplace_publish_total", "outcome" => outcome).increment(1);

        result
    }

    async fn publish_inner(&self, request: &ModuleDraftRequest) -> Result<PublishedVersion> {
        let version = request.version.as_deref().ok_or(MarketplaceError::MissingVersion)?;
        let draft_id = self.drafts.create_draft(request).await?;

        let published = self
            .catalog
            .publish_draft_module(&draft_id, version, request.account.as_deref())
            .await
            .inspect_err(|e| {
                // No compensation: the unpublished draft stays in the catalog.
                tracing::warn!(
                    draft_id = %draft_id,
                    error = %e,
                    "Publishing failed, draft module orphaned"
                );
            })?;

        tracing::info!(
            module_id = %published.id,
            version = %published.version,
            "Module published"
        );

        Ok(published)
    }
}
