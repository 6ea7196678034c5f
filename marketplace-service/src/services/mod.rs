pub mod assets;
pub mod drafts;
pub mod lifecycle;
pub mod publisher;
pub mod reader;
pub mod version;

pub use assets::{AssetTransport, HttpAssetTransport};
pub use drafts::DraftBuilder;
pub use lifecycle::{ModuleLifecycle, local_image_hash};
pub use publisher::PublishOrchestrator;
pub use reader::{ModuleReader, content_hash};
pub use version::{INITIAL_VERSION, next_patch, version_for_create, version_for_update};
