use thiserror::Error;

pub type Result<T, E = MarketplaceError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum MarketplaceError {
    /// A scope/source/version precondition was violated. Never retried.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("if you don't specify a version, you must use auto_version")]
    MissingVersion,

    /// Transport or protocol failure reported by the catalog service.
    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Invalid version format '{version}': {source}")]
    VersionFormat {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MarketplaceError {
    /// True for every precondition failure, including a missing version.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            MarketplaceError::InvalidInput(_) | MarketplaceError::MissingVersion
        )
    }
}

impl From<config::ConfigError> for MarketplaceError {
    fn from(err: config::ConfigError) -> Self {
        MarketplaceError::Config(err.to_string())
    }
}

impl From<reqwest::Error> for MarketplaceError {
    fn from(err: reqwest::Error) -> Self {
        MarketplaceError::Remote(err.to_string())
    }
}
