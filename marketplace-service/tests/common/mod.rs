//! In-memory catalog and asset transport used by the workflow tests.

#![allow(dead_code)]

use async_trait::async_trait;
use marketplace_service::catalog::{CatalogGateway, CatalogOperation, CatalogRequest};
use marketplace_service::error::{MarketplaceError, Result};
use marketplace_service::models::{ModuleDeclaration, Scope};
use marketplace_service::services::{AssetTransport, ModuleLifecycle};
use serde_json::{Value, json};
use service_core::retry::{RetryConfig, Sleeper};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ASSET_HOST: &str = "https://assets.test";
pub const UPLOAD_HOST: &str = "https://uploads.test";

#[derive(Debug, Clone)]
struct Draft {
    title: String,
    description: String,
    scope: Value,
    parent_module_id: Option<String>,
    source: Option<Value>,
    icon_file: Option<String>,
}

#[derive(Default)]
struct CatalogState {
    next_id: u32,
    calls: Vec<CatalogRequest>,
    drafts: HashMap<String, Draft>,
    published: HashMap<String, Value>,
    uploads: HashMap<String, String>,
    hidden_reads: u32,
    fail_on: Option<CatalogOperation>,
}

/// Catalog double that keeps drafts and published modules in memory.
#[derive(Default)]
pub struct FakeCatalog {
    state: Mutex<CatalogState>,
}

impl FakeCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer the next `count` reads with "not found".
    pub fn hide_next_reads(&self, count: u32) {
        self.state.lock().unwrap().hidden_reads = count;
    }

    /// Fail every call of `operation` with a remote error.
    pub fn fail_on(&self, operation: CatalogOperation) {
        self.state.lock().unwrap().fail_on = Some(operation);
    }

    pub fn calls(&self) -> Vec<CatalogRequest> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn operations(&self) -> Vec<CatalogOperation> {
        self.calls().into_iter().map(|call| call.operation).collect()
    }

    pub fn draft_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.state.lock().unwrap().drafts.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn is_published(&self, module_id: &str) -> bool {
        self.state.lock().unwrap().published.contains_key(module_id)
    }

    /// Seed a published module as the catalog would return it.
    pub fn insert_published(&self, module_id: &str, module: Value) {
        self.state
            .lock()
            .unwrap()
            .published
            .insert(module_id.to_string(), module);
    }

    fn next_id(state: &mut CatalogState, prefix: &str) -> String {
        state.next_id += 1;
        format!("{}-{}", prefix, state.next_id)
    }

    fn handle(state: &mut CatalogState, request: &CatalogRequest) -> Result<Value> {
        let input = &request.variables["input"];
        let str_field = |value: &Value, key: &str| value[key].as_str().map(str::to_string);

        match request.operation {
            CatalogOperation::GetPublishedModule => {
                if state.hidden_reads > 0 {
                    state.hidden_reads -= 1;
                    return Ok(Value::Null);
                }
                let id = request.variables["id"].as_str().unwrap_or_default();
                Ok(state.published.get(id).cloned().unwrap_or(Value::Null))
            }
            CatalogOperation::CreateDraftModule => {
                assert_eq!(input["category"], "APP_TILE");
                let id = Self::next_id(state, "draft");
                state.drafts.insert(
                    id.clone(),
                    Draft {
                        title: str_field(input, "title").unwrap_or_default(),
                        description: str_field(input, "description").unwrap_or_default(),
                        scope: input["scope"].clone(),
                        parent_module_id: str_field(input, "parentModuleId"),
                        source: None,
                        icon_file: None,
                    },
                );
                Ok(json!({ "id": id }))
            }
            CatalogOperation::SetAppTile | CatalogOperation::SetOrgAppTile => {
                let module_id = str_field(input, "moduleId").unwrap_or_default();
                let source = if request.operation == CatalogOperation::SetAppTile {
                    json!({ "__typename": "AppTile", "id": input["sourceInfo"]["id"] })
                } else {
                    json!({ "__typename": "OrgAppTile", "url": input["sourceInfo"]["url"] })
                };
                let draft = state
                    .drafts
                    .get_mut(&module_id)
                    .ok_or_else(|| MarketplaceError::Remote("unknown draft".to_string()))?;
                draft.source = Some(source);
                Ok(json!({ "moduleId": module_id }))
            }
            CatalogOperation::StartUpload => {
                let file_name = str_field(input, "fileName").unwrap_or_default();
                let id = Self::next_id(state, "upload");
                state.uploads.insert(id.clone(), file_name);
                Ok(json!({
                    "id": id,
                    "url": format!("{}/{}", UPLOAD_HOST, id),
                    "fields": { "key": format!("icons/{}", id), "policy": "signed" },
                }))
            }
            CatalogOperation::FinalizeUpload => {
                assert_eq!(input["type"], "ICON");
                let upload_id = str_field(input, "id").unwrap_or_default();
                let module_id = str_field(input, "moduleId").unwrap_or_default();
                let file_name = state
                    .uploads
                    .remove(&upload_id)
                    .ok_or_else(|| MarketplaceError::Remote("unknown upload".to_string()))?;
                let draft = state
                    .drafts
                    .get_mut(&module_id)
                    .ok_or_else(|| MarketplaceError::Remote("unknown draft".to_string()))?;
                draft.icon_file = Some(file_name);
                Ok(json!({ "moduleId": module_id }))
            }
            CatalogOperation::PublishDraftModule => {
                let module_id = str_field(input, "moduleId").unwrap_or_default();
                let version = str_field(&input["version"], "version");
                let draft = state
                    .drafts
                    .get(&module_id)
                    .cloned()
                    .ok_or_else(|| MarketplaceError::Remote("unknown draft".to_string()))?;

                let icon = draft.icon_file.as_ref().map(|file_name| {
                    json!({
                        "url": format!("{}/{}", ASSET_HOST, file_name),
                        "fileName": file_name,
                        "fileExtension": Path::new(file_name)
                            .extension()
                            .map(|ext| ext.to_string_lossy().into_owned())
                            .unwrap_or_default(),
                    })
                });
                let module = json!({
                    "id": module_id,
                    "title": draft.title,
                    "description": draft.description,
                    "version": version,
                    "scope": draft.scope,
                    "source": draft.source,
                    "iconV2": icon,
                    "organization": if draft.scope == "ORGANIZATION" {
                        json!({ "id": request.account.clone().unwrap_or_else(|| "org-default".to_string()) })
                    } else {
                        Value::Null
                    },
                });

                state.published.insert(module_id.clone(), module.clone());
                // Reading the superseded id yields its latest version.
                if let Some(parent) = &draft.parent_module_id {
                    state.published.insert(parent.clone(), module);
                }
                Ok(json!({ "id": module_id, "version": { "version": version } }))
            }
            CatalogOperation::DeleteModule => {
                let module_id = str_field(input, "moduleId").unwrap_or_default();
                state
                    .published
                    .remove(&module_id)
                    .map(|_| json!(true))
                    .ok_or_else(|| MarketplaceError::Remote("module not found".to_string()))
            }
        }
    }
}

#[async_trait]
impl CatalogGateway for FakeCatalog {
    async fn execute(&self, request: CatalogRequest) -> Result<Value> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(request.clone());

        if state.fail_on == Some(request.operation) {
            return Err(MarketplaceError::Remote(format!(
                "{} failed: injected failure",
                request.operation
            )));
        }

        let payload = Self::handle(&mut state, &request)?;
        Ok(json!({ request.operation.response_field(): payload }))
    }
}

#[derive(Default)]
struct AssetState {
    stored: HashMap<String, Vec<u8>>,
    uploads: Vec<(String, HashMap<String, String>)>,
    fail_uploads: bool,
}

/// Asset transport double: uploads are stored by file name and served back
/// from `ASSET_HOST`.
#[derive(Default)]
pub struct FakeAssets {
    state: Mutex<AssetState>,
}

impl FakeAssets {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_uploads(&self) {
        self.state.lock().unwrap().fail_uploads = true;
    }

    /// Destinations and form fields of every upload, in order.
    pub fn uploads(&self) -> Vec<(String, HashMap<String, String>)> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn serve(&self, file_name: &str, bytes: &[u8]) {
        self.state
            .lock()
            .unwrap()
            .stored
            .insert(file_name.to_string(), bytes.to_vec());
    }
}

#[async_trait]
impl AssetTransport for FakeAssets {
    async fn upload(
        &self,
        destination: &str,
        file_path: &Path,
        fields: &HashMap<String, String>,
    ) -> Result<()> {
        let bytes = std::fs::read(file_path)
            .map_err(|e| MarketplaceError::Upload(format!("failed to read file: {}", e)))?;

        let mut state = self.state.lock().unwrap();
        if state.fail_uploads {
            return Err(MarketplaceError::Upload("connection reset".to_string()));
        }

        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        state.stored.insert(file_name, bytes);
        state.uploads.push((destination.to_string(), fields.clone()));
        Ok(())
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let file_name = url.rsplit('/').next().unwrap_or_default();
        self.state
            .lock()
            .unwrap()
            .stored
            .get(file_name)
            .cloned()
            .ok_or_else(|| MarketplaceError::Remote(format!("no asset at {}", url)))
    }
}

/// Sleeper that records requested delays instead of waiting.
#[derive(Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

pub struct TestContext {
    pub catalog: Arc<FakeCatalog>,
    pub assets: Arc<FakeAssets>,
    pub sleeper: Arc<RecordingSleeper>,
    pub lifecycle: ModuleLifecycle,
}

impl TestContext {
    pub fn new() -> Self {
        let catalog = FakeCatalog::new();
        let assets = FakeAssets::new();
        let sleeper = RecordingSleeper::new();

        let lifecycle = ModuleLifecycle::new(
            catalog.clone(),
            assets.clone(),
            RetryConfig::default(),
            sleeper.clone(),
        );

        Self {
            catalog,
            assets,
            sleeper,
            lifecycle,
        }
    }
}

pub fn public_declaration(name: &str) -> ModuleDeclaration {
    ModuleDeclaration {
        name: name.to_string(),
        description: "D".to_string(),
        version: Some("1.0.0".to_string()),
        scope: Scope::Public,
        app_tile_id: Some("A".to_string()),
        ..Default::default()
    }
}

/// Write `bytes` to a fresh file named `file_name` inside `dir`.
pub fn write_image(dir: &Path, file_name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(file_name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(bytes).unwrap();
    path
}
