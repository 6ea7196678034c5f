//! Remote catalog gateway.
//!
//! A pure request/response boundary: one named operation in, the `data`
//! payload (or a `Remote` error) out. Retry policy belongs to callers.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service_core::observability::TracedClientExt;
use std::collections::BTreeMap;
use std::time::Instant;

use super::operations::CatalogOperation;
use crate::config::CatalogSettings;
use crate::error::{MarketplaceError, Result};

pub const ACCOUNT_HEADER: &str = "LifeOmic-Account";
pub const USER_HEADER: &str = "LifeOmic-User";
pub const POLICY_HEADER: &str = "LifeOmic-Policy";

/// One call against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRequest {
    pub operation: CatalogOperation,
    pub variables: Value,
    /// Overrides the configured account for this call.
    pub account: Option<String>,
}

impl CatalogRequest {
    pub fn new(operation: CatalogOperation, variables: Value) -> Self {
        Self {
            operation,
            variables,
            account: None,
        }
    }

    pub fn with_account(mut self, account: Option<&str>) -> Self {
        self.account = account.map(str::to_string);
        self
    }
}

/// Executes named operations against the catalog service.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Returns the `data` object of the response.
    async fn execute(&self, request: CatalogRequest) -> Result<Value>;
}

#[derive(Serialize)]
struct GraphqlBody<'a> {
    query: &'a str,
    #[serde(rename = "operationName")]
    operation_name: &'a str,
    variables: &'a Value,
}

#[derive(Deserialize)]
struct GraphqlEnvelope {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Serialize)]
struct Policy<'a> {
    rules: BTreeMap<&'a str, bool>,
}

/// GraphQL-over-HTTP gateway.
pub struct GraphqlGateway {
    client: Client,
    settings: CatalogSettings,
    endpoint: String,
    policy_header: String,
}

impl GraphqlGateway {
    /// Build on an existing client so connections are shared with the asset
    /// transport.
    pub fn with_client(client: Client, settings: CatalogSettings) -> Result<Self> {
        let policy = Policy {
            rules: settings
                .policy_rules
                .iter()
                .map(|rule| (rule.as_str(), true))
                .collect(),
        };
        let policy_header = serde_json::to_string(&policy)
            .map_err(|e| MarketplaceError::Config(format!("invalid policy rules: {}", e)))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint(),
            settings,
            policy_header,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, request: &CatalogRequest) -> Result<Value> {
        let operation = request.operation;
        let account = request
            .account
            .as_deref()
            .unwrap_or(&self.settings.account);

        let body = GraphqlBody {
            query: operation.document(),
            operation_name: operation.name(),
            variables: &request.variables,
        };

        let mut builder = self
            .client
            .traced_post(&self.endpoint)
            .header(ACCOUNT_HEADER, account)
            .header(USER_HEADER, &self.settings.user)
            .header(POLICY_HEADER, &self.policy_header)
            .json(&body);

        if let Some(token) = &self.settings.api_token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(operation = %operation, error = %e, "Catalog request failed");
            MarketplaceError::Remote(format!("{} request failed: {}", operation, e))
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                operation = %operation,
                status = %status,
                body = %text,
                "Catalog returned an error status"
            );
            return Err(MarketplaceError::Remote(format!(
                "{} returned status {}: {}",
                operation, status, text
            )));
        }

        let envelope: GraphqlEnvelope = serde_json::from_str(&text).map_err(|e| {
            MarketplaceError::Remote(format!("{} returned a malformed response: {}", operation, e))
        })?;

        if !envelope.errors.is_empty() {
            let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
            return Err(MarketplaceError::Remote(format!(
                "{} failed: {}",
                operation,
                messages.join("; ")
            )));
        }

        envelope
            .data
            .filter(|data| !data.is_null())
            .ok_or_else(|| MarketplaceError::Remote(format!("{} returned no data", operation)))
    }
}

#[async_trait]
impl CatalogGateway for GraphqlGateway {
    async fn execute(&self, request: CatalogRequest) -> Result<Value> {
        let start = Instant::now();
        let operation = request.operation.name();

        tracing::debug!(
            operation,
            account = request.account.as_deref().unwrap_or(&self.settings.account),
            "Sending catalog request"
        );

        let result = self.send(&request).await;

        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(
            "marketplace_catalog_requests_total",
            "operation" => operation,
            "outcome" => outcome
        )
        .increment(1);
        metrics::histogram!(
            "marketplace_catalog_request_duration_seconds",
            "operation" => operation
        )
        .record(start.elapsed().as_secs_f64());

        result
    }
}
