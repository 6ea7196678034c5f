use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Presigned destination returned by `startUpload`.
///
/// Lives for exactly one attach: consumed by the upload and the finalize call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadSession {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

/// Role of an uploaded asset once it is bound to a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Icon,
}
