use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::module::{ModuleDraftRequest, Scope, SourceReference};
use crate::error::Result;

/// Desired state of a module, as declared by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub auto_version: bool,
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub app_tile_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Local path of the icon to upload.
    #[serde(default)]
    pub image: Option<PathBuf>,
    #[serde(default)]
    pub account: Option<String>,
}

impl ModuleDeclaration {
    /// Build the publish input for `version`, superseding `parent_module_id` when set.
    pub fn to_draft_request(
        &self,
        version: &str,
        parent_module_id: Option<&str>,
    ) -> Result<ModuleDraftRequest> {
        let source = SourceReference::for_scope(
            self.scope,
            self.app_tile_id.as_deref(),
            self.url.as_deref(),
        )?;

        Ok(ModuleDraftRequest {
            name: self.name.clone(),
            description: self.description.clone(),
            version: Some(version.to_string()),
            scope: self.scope,
            source,
            parent_module_id: parent_module_id.map(str::to_string),
            asset_path: self.image.clone(),
            account: self.account.clone(),
        })
    }
}

/// Declared fields as observed in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleState {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: Option<String>,
    pub app_tile_id: Option<String>,
    pub url: Option<String>,
    /// MD5 of the icon currently attached to the module.
    pub image_hash: Option<String>,
    pub account: Option<String>,
    pub scope: Scope,
}

impl ModuleState {
    /// Names of the declared fields that differ from this state.
    ///
    /// `local_image_hash` is the hash of the declared image, if any.
    pub fn drift(
        &self,
        declaration: &ModuleDeclaration,
        local_image_hash: Option<&str>,
    ) -> Vec<&'static str> {
        let mut changed = Vec::new();

        if self.name != declaration.name {
            changed.push("name");
        }
        if self.description != declaration.description {
            changed.push("description");
        }
        if declaration.version.is_some() && self.version != declaration.version {
            changed.push("version");
        }
        if self.scope != declaration.scope {
            changed.push("scope");
        }
        if declaration.scope.requires_url() {
            if self.url != declaration.url {
                changed.push("url");
            }
        } else if self.app_tile_id != declaration.app_tile_id {
            changed.push("app_tile_id");
        }
        if declaration.account.is_some() && self.account != declaration.account {
            changed.push("account");
        }
        if declaration.image.is_some() && self.image_hash.as_deref() != local_image_hash {
            changed.push("image");
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declaration() -> ModuleDeclaration {
        ModuleDeclaration {
            name: "N".to_string(),
            description: "D".to_string(),
            version: Some("1.0.0".to_string()),
            app_tile_id: Some("A".to_string()),
            ..Default::default()
        }
    }

    fn state() -> ModuleState {
        ModuleState {
            id: "m-1".to_string(),
            name: "N".to_string(),
            description: "D".to_string(),
            version: Some("1.0.0".to_string()),
            app_tile_id: Some("A".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_to_draft_request() {
        let request = declaration().to_draft_request("1.0.1", Some("m-1")).unwrap();
        assert_eq!(request.version.as_deref(), Some("1.0.1"));
        assert_eq!(request.parent_module_id.as_deref(), Some("m-1"));
        assert_eq!(request.source, SourceReference::AppTile("A".to_string()));
        assert_eq!(request.scope, Scope::Public);
    }

    #[test]
    fn test_manifest_defaults() {
        let declaration: ModuleDeclaration = serde_json::from_str(
            r#"{"name": "N", "description": "D", "app_tile_id": "A"}"#,
        )
        .unwrap();
        assert_eq!(declaration.scope, Scope::Public);
        assert!(!declaration.auto_version);
        assert!(declaration.version.is_none());
    }

    #[test]
    fn test_no_drift() {
        assert!(state().drift(&declaration(), None).is_empty());
    }

    #[test]
    fn test_drift_reports_changed_fields() {
        let mut declared = declaration();
        declared.description = "new".to_string();
        declared.image = Some(PathBuf::from("icon.png"));

        let mut observed = state();
        observed.image_hash = Some("aaa".to_string());

        assert_eq!(observed.drift(&declared, Some("bbb")), vec!["description", "image"]);
        assert_eq!(observed.drift(&declared, Some("aaa")), vec!["description"]);
    }

    #[test]
    fn test_auto_version_ignores_version_drift() {
        let mut declared = declaration();
        declared.version = None;
        declared.auto_version = true;

        let mut observed = state();
        observed.version = Some("0.0.7".to_string());

        assert!(observed.drift(&declared, None).is_empty());
    }
}
