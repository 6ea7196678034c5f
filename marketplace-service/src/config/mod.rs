use secrecy::Secret;
use serde::Deserialize;
use service_core::config::{TelemetryConfig, configuration_directory, load_settings};
use service_core::retry::RetryConfig;
use std::time::Duration;

use crate::error::Result;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub reader: ReaderSettings,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CatalogSettings {
    /// Base URL of the catalog service (e.g. https://api.example.com).
    pub url: String,
    #[serde(default = "default_graphql_path")]
    pub graphql_path: String,
    /// Account every call is scoped to unless a module declares its own.
    pub account: String,
    /// Identity reported to the catalog in the user header.
    #[serde(default = "default_user")]
    pub user: String,
    /// Policy rules granted on every call.
    #[serde(default = "default_policy_rules")]
    pub policy_rules: Vec<String>,
    /// Bearer token, when the catalog sits behind token auth.
    #[serde(default)]
    pub api_token: Option<Secret<String>>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl CatalogSettings {
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.url.trim_end_matches('/'),
            self.graphql_path
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_graphql_path() -> String {
    "/v1/marketplace/authenticated/graphql".to_string()
}

fn default_user() -> String {
    "marketplace-publisher".to_string()
}

fn default_policy_rules() -> Vec<String> {
    vec!["publishContent".to_string()]
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Read-after-write tolerance for the reconciling reader.
#[derive(Deserialize, Clone, Debug)]
pub struct ReaderSettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

impl ReaderSettings {
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new(self.max_attempts, Duration::from_secs(self.retry_delay_secs))
    }
}

fn default_max_attempts() -> u32 {
    2
}

fn default_retry_delay_secs() -> u64 {
    5
}

/// Load settings from `marketplace-service/config/base.yaml` and `APP_*` env.
pub fn get_configuration() -> Result<Settings> {
    let directory = configuration_directory("marketplace-service");
    Ok(load_settings::<Settings>(&directory)?)
}
