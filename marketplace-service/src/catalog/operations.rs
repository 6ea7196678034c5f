//! Named catalog operations and their GraphQL documents.

/// Every remote operation the publisher issues against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogOperation {
    GetPublishedModule,
    CreateDraftModule,
    SetAppTile,
    SetOrgAppTile,
    StartUpload,
    FinalizeUpload,
    PublishDraftModule,
    DeleteModule,
}

impl CatalogOperation {
    pub fn name(self) -> &'static str {
        match self {
            CatalogOperation::GetPublishedModule => "GetPublishedModule",
            CatalogOperation::CreateDraftModule => "CreateDraftModule",
            CatalogOperation::SetAppTile => "SetAppTile",
            CatalogOperation::SetOrgAppTile => "SetOrgAppTile",
            CatalogOperation::StartUpload => "StartUpload",
            CatalogOperation::FinalizeUpload => "FinalizeUpload",
            CatalogOperation::PublishDraftModule => "PublishDraftModule",
            CatalogOperation::DeleteModule => "DeleteModule",
        }
    }

    /// Top-level field of `data` holding the operation result.
    pub fn response_field(self) -> &'static str {
        match self {
            CatalogOperation::GetPublishedModule => "myModule",
            CatalogOperation::CreateDraftModule => "createDraftModule",
            CatalogOperation::SetAppTile => "setPublicAppTileDraftModuleSource",
            CatalogOperation::SetOrgAppTile => "setOrgAppTileDraftModuleSource",
            CatalogOperation::StartUpload => "startUpload",
            CatalogOperation::FinalizeUpload => "finalizeUpload",
            CatalogOperation::PublishDraftModule => "publishDraftModule",
            CatalogOperation::DeleteModule => "deleteModule",
        }
    }

    pub fn document(self) -> &'static str {
        match self {
            CatalogOperation::GetPublishedModule => GET_PUBLISHED_MODULE,
            CatalogOperation::CreateDraftModule => CREATE_DRAFT_MODULE,
            CatalogOperation::SetAppTile => SET_APP_TILE,
            CatalogOperation::SetOrgAppTile => SET_ORG_APP_TILE,
            CatalogOperation::StartUpload => START_UPLOAD,
            CatalogOperation::FinalizeUpload => FINALIZE_UPLOAD,
            CatalogOperation::PublishDraftModule => PUBLISH_DRAFT_MODULE,
            CatalogOperation::DeleteModule => DELETE_MODULE,
        }
    }
}

impl std::fmt::Display for CatalogOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

const GET_PUBLISHED_MODULE: &str = r#"
query GetPublishedModule($id: ID!, $version: String) {
  myModule(moduleId: $id, version: $version) {
    id
    title
    description
    version
    scope
    source {
      __typename
      ... on AppTile {
        id
      }
      ... on OrgAppTile {
        url
      }
    }
    iconV2 {
      url
      fileName
      fileExtension
    }
    organization {
      id
    }
  }
}
"#;

const CREATE_DRAFT_MODULE: &str = r#"
mutation CreateDraftModule($input: CreateDraftModuleInput!) {
  createDraftModule(input: $input) {
    id
  }
}
"#;

const SET_APP_TILE: &str = r#"
mutation SetAppTile($input: SetPublicAppTileDraftModuleSourceInput!) {
  setPublicAppTileDraftModuleSource(input: $input) {
    moduleId
  }
}
"#;

const SET_ORG_APP_TILE: &str = r#"
mutation SetOrgAppTile($input: SetOrgAppTileDraftModuleSourceInput!) {
  setOrgAppTileDraftModuleSource(input: $input) {
    moduleId
  }
}
"#;

const START_UPLOAD: &str = r#"
mutation StartUpload($input: StartUploadInput!) {
  startUpload(input: $input) {
    id
    url
    fields
  }
}
"#;

const FINALIZE_UPLOAD: &str = r#"
mutation FinalizeUpload($input: FinalizeUploadInput!) {
  finalizeUpload(input: $input) {
    moduleId
  }
}
"#;

const PUBLISH_DRAFT_MODULE: &str = r#"
mutation PublishDraftModule($input: PublishDraftModuleInputV2!) {
  publishDraftModule(input: $input) {
    id
    version {
      version
    }
  }
}
"#;

const DELETE_MODULE: &str = r#"
mutation DeleteModule($input: DeleteModuleInput!) {
  deleteModule(input: $input)
}
"#;
