//! Icon asset transport: presigned multipart upload and plain download.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use service_core::observability::TracedClientExt;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{MarketplaceError, Result};

#[async_trait]
pub trait AssetTransport: Send + Sync {
    /// POST `file_path` to a presigned `destination` along with `fields`.
    ///
    /// Not idempotent: every call creates a new remote object.
    async fn upload(
        &self,
        destination: &str,
        file_path: &Path,
        fields: &HashMap<String, String>,
    ) -> Result<()>;

    /// Download the bytes stored at `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Base name of an asset path, as sent to the catalog and the upload form.
pub fn asset_file_name(file_path: &Path) -> Result<String> {
    file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            MarketplaceError::Upload(format!("'{}' is not a file path", file_path.display()))
        })
}

#[derive(Clone)]
pub struct HttpAssetTransport {
    client: Client,
}

impl HttpAssetTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssetTransport for HttpAssetTransport {
    async fn upload(
        &self,
        destination: &str,
        file_path: &Path,
        fields: &HashMap<String, String>,
    ) -> Result<()> {
        let file_name = asset_file_name(file_path)?;
        let bytes = tokio::fs::read(file_path).await.map_err(|e| {
            MarketplaceError::Upload(format!("failed to read '{}': {}", file_path.display(), e))
        })?;
        let size = bytes.len();

        let mut form = Form::new();
        for (key, value) in fields {
            form = form.text(key.clone(), value.clone());
        }
        // The presigned policy expects the file after every other field.
        form = form.part("file", Part::bytes(bytes).file_name(file_name.clone()));

        let response = self
            .client
            .traced_post(destination)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MarketplaceError::Upload(format!("upload of '{}' failed: {}", file_name, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                file_name = %file_name,
                status = %status,
                body = %body,
                "Asset upload rejected"
            );
            return Err(MarketplaceError::Upload(format!(
                "upload of '{}' returned status {}",
                file_name, status
            )));
        }

        tracing::info!(file_name = %file_name, size, "Asset uploaded");
        Ok(())
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .traced_get(url)
            .send()
            .await
            .map_err(|e| MarketplaceError::Remote(format!("failed to fetch asset: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketplaceError::Remote(format!(
                "fetching asset returned status {}",
                status
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
