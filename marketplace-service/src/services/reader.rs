//! Read side: fetch the latest published module and map it back onto the
//! declared fields, tolerating read-after-write lag in the catalog.

use md5::{Digest, Md5};
use service_core::retry::{RetryConfig, Sleeper, poll_until_present};
use std::sync::Arc;

use super::assets::AssetTransport;
use crate::catalog::CatalogClient;
use crate::error::{MarketplaceError, Result};
use crate::models::{ModuleState, PublishedModule, Scope};

/// Hex-encoded MD5 of an asset, comparable with `filemd5` of the local file.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Md5::digest(bytes))
}

#[derive(Clone)]
pub struct ModuleReader {
    catalog: CatalogClient,
    assets: Arc<dyn AssetTransport>,
    retry: RetryConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl ModuleReader {
    pub fn new(
        catalog: CatalogClient,
        assets: Arc<dyn AssetTransport>,
        retry: RetryConfig,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            catalog,
            assets,
            retry,
            sleeper,
        }
    }

    /// Latest published version of `module_id`.
    ///
    /// "Not found" answers are retried per the retry config; transport and
    /// protocol errors are returned as soon as they happen.
    pub async fn fetch_current(
        &self,
        module_id: &str,
        account: Option<&str>,
    ) -> Result<PublishedModule> {
        let module = poll_until_present(
            &self.retry,
            self.sleeper.as_ref(),
            "get_published_module",
            || self.catalog.get_published_module(module_id, None, account),
        )
        .await?;

        module.ok_or_else(|| MarketplaceError::NotFound(format!("no module found for {}", module_id)))
    }

    /// Current module mapped onto the declared fields.
    pub async fn read_state(&self, module_id: &str, account: Option<&str>) -> Result<ModuleState> {
        let module = self.fetch_current(module_id, account).await?;

        let image_hash = match &module.icon {
            Some(icon) => {
                let bytes = self.assets.fetch(&icon.url).await?;
                Some(content_hash(&bytes))
            }
            None => None,
        };

        let resolved_account = match module.scope {
            Scope::Organization => module
                .organization_id()
                .map(str::to_string)
                .or_else(|| account.map(str::to_string)),
            Scope::Public | Scope::Licensed => account.map(str::to_string),
        };

        Ok(ModuleState {
            // The catalog answers with the latest version's id; the lifecycle
            // keeps tracking the module by the id it was asked for.
            id: module_id.to_string(),
            name: module.title.clone(),
            description: module.description.clone(),
            version: module.version.clone(),
            app_tile_id: module.app_tile_id().map(str::to_string),
            url: module.source_url().map(str::to_string),
            image_hash,
            account: resolved_account,
            scope: module.scope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_matches_md5() {
        assert_eq!(content_hash(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(content_hash(b"hello"), "5d41402abc4b2a76b9719d911017c592");
    }
}
