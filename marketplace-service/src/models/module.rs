use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{MarketplaceError, Result};

/// Visibility and ownership class of a module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    #[default]
    Public,
    Organization,
    Licensed,
}

impl Scope {
    /// Organization-scoped modules are sourced by URL, the others by app tile.
    pub fn requires_url(self) -> bool {
        matches!(self, Scope::Organization)
    }
}

/// Content a module tile points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceReference {
    AppTile(String),
    Url(String),
}

impl SourceReference {
    /// Pick the source matching `scope` out of the two declared fields.
    ///
    /// The field the scope does not use must be absent.
    pub fn for_scope(
        scope: Scope,
        app_tile_id: Option<&str>,
        url: Option<&str>,
    ) -> Result<Self> {
        if scope.requires_url() {
            if app_tile_id.is_some_and(|id| !id.is_empty()) {
                return Err(MarketplaceError::InvalidInput(
                    "app_tile_id cannot be set on an ORGANIZATION scoped module".to_string(),
                ));
            }
            Ok(SourceReference::Url(url.unwrap_or_default().to_string()))
        } else {
            if url.is_some_and(|u| !u.is_empty()) {
                return Err(MarketplaceError::InvalidInput(format!(
                    "url can only be set on an ORGANIZATION scoped module, not {:?}",
                    scope
                )));
            }
            Ok(SourceReference::AppTile(
                app_tile_id.unwrap_or_default().to_string(),
            ))
        }
    }
}

/// Input of one publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDraftRequest {
    pub name: String,
    pub description: String,
    pub version: Option<String>,
    pub scope: Scope,
    pub source: SourceReference,
    /// Prior published module this draft supersedes. Only set on update.
    pub parent_module_id: Option<String>,
    pub asset_path: Option<PathBuf>,
    pub account: Option<String>,
}

impl ModuleDraftRequest {
    /// Check the scope/source invariant.
    pub fn validate(&self) -> Result<()> {
        match (&self.source, self.scope) {
            (SourceReference::Url(url), Scope::Organization) => {
                if url.is_empty() {
                    return Err(MarketplaceError::InvalidInput(
                        "an ORGANIZATION scoped module requires a non-empty url".to_string(),
                    ));
                }
            }
            (SourceReference::AppTile(id), Scope::Public | Scope::Licensed) => {
                if id.is_empty() {
                    return Err(MarketplaceError::InvalidInput(format!(
                        "a {:?} scoped module requires a non-empty app_tile_id",
                        self.scope
                    )));
                }
            }
            (SourceReference::Url(_), scope) => {
                return Err(MarketplaceError::InvalidInput(format!(
                    "a {:?} scoped module must reference an app tile, not a url",
                    scope
                )));
            }
            (SourceReference::AppTile(_), _) => {
                return Err(MarketplaceError::InvalidInput(
                    "an ORGANIZATION scoped module must reference a url, not an app tile"
                        .to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Source of a published module as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "__typename")]
pub enum ModuleSource {
    AppTile {
        id: String,
    },
    OrgAppTile {
        url: String,
    },
    /// Source kinds this publisher does not manage.
    #[serde(other)]
    Other,
}

/// Icon attached to a published module.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconAsset {
    pub url: String,
    pub file_name: String,
    pub file_extension: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrganizationRef {
    pub id: String,
}

/// The durable, read-visible module.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedModule {
    pub id: String,
    pub title: String,
    pub description: String,
    pub version: Option<String>,
    pub source: Option<ModuleSource>,
    #[serde(rename = "iconV2")]
    pub icon: Option<IconAsset>,
    pub organization: Option<OrganizationRef>,
    #[serde(default)]
    pub scope: Scope,
}

impl PublishedModule {
    pub fn app_tile_id(&self) -> Option<&str> {
        match &self.source {
            Some(ModuleSource::AppTile { id }) => Some(id),
            Some(ModuleSource::OrgAppTile { .. }) | Some(ModuleSource::Other) | None => None,
        }
    }

    pub fn source_url(&self) -> Option<&str> {
        match &self.source {
            Some(ModuleSource::OrgAppTile { url }) => Some(url),
            Some(ModuleSource::AppTile { .. }) | Some(ModuleSource::Other) | None => None,
        }
    }

    pub fn organization_id(&self) -> Option<&str> {
        self.organization.as_ref().map(|org| org.id.as_str())
    }
}
