//! # Login Fraud-Detection Core
//!
//! Core logic for scoring the fraud risk of login attempts against an
//! external risk-scoring service: the login event model, payload
//! construction with override precedence rules, logging-safe masking, and
//! per-tenant configuration resolution.
//!
//! The HTTP side lives in the companion `sentria-fraud-client` crate; this
//! crate is transport-agnostic.
//!
//! ## Example
//!
//! ```ignore
//! use sentria_fraud::prelude::*;
//!
//! let store = InMemoryConfigStore::new().with_tenant(
//!     "acme.example",
//!     TenantFraudConfig::new().with_property(API_KEY_PROPERTY, "secret"),
//! );
//!
//! let event = LoginEvent::new("acme.example")
//!     .with_user_id("user123")
//!     .with_session_id("session123");
//!
//! let payload = PayloadBuilder::new(&store)
//!     .build(&event, LoginStatus::Success, None)
//!     .await?;
//! tracing::info!(payload = %payload.masked(), "login event payload");
//! ```
//!
//! ## Crate Organization
//!
//! - [`event`] - Login event snapshot and status mapping
//! - [`fields`] - Wire-level field names
//! - [`overrides`] - Caller override splitting (reserved vs. passthrough)
//! - [`payload`] - Payload construction, default and selective modes
//! - [`mask`] - Logging-safe payload rendering
//! - [`config`] - Per-tenant configuration store seam
//! - [`error`] - Error taxonomy with recoverable/fatal classification

pub mod config;
pub mod error;
pub mod event;
pub mod fields;
pub mod mask;
pub mod overrides;
pub mod payload;

/// Prelude module for convenient imports.
///
/// ```
/// use sentria_fraud::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{
        connector_properties, resolve_api_key, ConnectorProperty, InMemoryConfigStore,
        TenantConfigStore, TenantFraudConfig, API_KEY_PROPERTY, CONNECTOR_NAME,
    };
    pub use crate::error::{FraudError, FraudResult};
    pub use crate::event::{LoginEvent, LoginStatus, RequestInfo};
    pub use crate::overrides::{
        logging_enabled, split_overrides, strip_logging_flag, FieldOverride, OverrideMap,
        SplitOverrides,
    };
    pub use crate::payload::{hash_identifier, ContextField, EventPayload, PayloadBuilder};
}

// Re-export async_trait for store implementors
pub use async_trait::async_trait;
