pub mod module;
pub mod state;
pub mod upload;

pub use module::{
    IconAsset, ModuleDraftRequest, ModuleSource, OrganizationRef, PublishedModule, Scope,
    SourceReference,
};
pub use state::{ModuleDeclaration, ModuleState};
pub use upload::{AssetType, UploadSession};
