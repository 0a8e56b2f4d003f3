//! Per-tenant connector configuration
//!
//! The scoring-service API key lives in an externally-owned configuration
//! store, keyed by tenant domain. This module defines the store seam, the
//! resolved configuration shape, and the connector property metadata exposed
//! to governance tooling. Resolution is a single lookup per call; caching,
//! if any, belongs to the store.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::{FraudError, FraudResult};

/// Registered name of this connector in the host's governance configuration.
pub const CONNECTOR_NAME: &str = "login-fraud-detection";

/// Property name under which the tenant's scoring-service API key is stored.
pub const API_KEY_PROPERTY: &str = "api_key";

/// Descriptor of one connector configuration property.
///
/// Consumed by governance UIs when rendering the connector's settings form;
/// no UI concerns live in this crate.
#[derive(Debug, Clone)]
pub struct ConnectorProperty {
    /// Storage name of the property.
    pub name: &'static str,
    /// Human-readable display name.
    pub display_name: &'static str,
    /// Help text shown alongside the property.
    pub description: &'static str,
    /// Whether the value is secret and must be masked at rest and in logs.
    pub confidential: bool,
    /// Default value for newly configured tenants.
    pub default_value: &'static str,
}

/// Properties this connector expects in a tenant's configuration.
pub fn connector_properties() -> Vec<ConnectorProperty> {
    vec![ConnectorProperty {
        name: API_KEY_PROPERTY,
        display_name: "API Key",
        description: "API key used to authenticate against the risk-scoring service.",
        confidential: true,
        default_value: "",
    }]
}

/// Resolved fraud-detection configuration for one tenant.
#[derive(Debug, Clone, Default)]
pub struct TenantFraudConfig {
    properties: HashMap<String, String>,
}

impl TenantFraudConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property value.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Look up a property value.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// The scoring-service API key, if configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.property(API_KEY_PROPERTY)
            .filter(|key| !key.trim().is_empty())
    }
}

/// Seam to the externally-owned per-tenant configuration store.
#[async_trait]
pub trait TenantConfigStore: Send + Sync {
    /// Fetch the fraud-detection connector configuration for a tenant.
    ///
    /// Fails with a configuration error if the tenant has no connector
    /// configuration or the store cannot be reached.
    async fn connector_config(&self, tenant_domain: &str) -> FraudResult<TenantFraudConfig>;
}

/// Resolve the scoring-service API key for a tenant.
///
/// Fails if the tenant is unconfigured or the configuration lacks a usable
/// key. No retries; one store lookup per call.
pub async fn resolve_api_key(
    store: &dyn TenantConfigStore,
    tenant_domain: &str,
) -> FraudResult<String> {
    let config = store.connector_config(tenant_domain).await?;

    config
        .api_key()
        .map(str::to_string)
        .ok_or_else(|| FraudError::configuration(tenant_domain, "API key not found"))
}

/// Configuration store backed by an in-process map.
///
/// Backs tests and embedders that manage tenant configuration themselves.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigStore {
    configs: HashMap<String, TenantFraudConfig>,
}

impl InMemoryConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tenant's configuration.
    pub fn with_tenant(
        mut self,
        tenant_domain: impl Into<String>,
        config: TenantFraudConfig,
    ) -> Self {
        self.configs.insert(tenant_domain.into(), config);
        self
    }
}

#[async_trait]
impl TenantConfigStore for InMemoryConfigStore {
    async fn connector_config(&self, tenant_domain: &str) -> FraudResult<TenantFraudConfig> {
        self.configs.get(tenant_domain).cloned().ok_or_else(|| {
            FraudError::configuration(tenant_domain, "connector configuration not found")
        })
    }
}
