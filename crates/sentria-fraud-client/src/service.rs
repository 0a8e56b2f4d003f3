//! High-level fraud-detection operations
//!
//! Assembles the full pipeline for the three host-facing operations:
//! parse the login status, split the overrides, build the payload against
//! the tenant's configuration, post it, and interpret the answer. This is
//! the surface a host authentication flow calls.

use tracing::info;

use sentria_fraud::error::FraudResult;
use sentria_fraud::event::{LoginEvent, LoginStatus};
use sentria_fraud::overrides::{logging_enabled, OverrideMap};
use sentria_fraud::payload::{ContextField, EventPayload, PayloadBuilder};
use sentria_fraud::config::TenantConfigStore;

use crate::client::FraudScoreClient;

/// Fraud-detection operations bound to a tenant configuration store and a
/// scoring client.
///
/// Stateless across calls; the only shared resource is the client's
/// connection pool.
#[derive(Debug)]
pub struct FraudDetectionService<S> {
    store: S,
    client: FraudScoreClient,
}

impl<S: TenantConfigStore> FraudDetectionService<S> {
    /// Create a service from its two collaborators.
    pub fn new(store: S, client: FraudScoreClient) -> Self {
        Self { store, client }
    }

    /// Publish a login event without requesting an evaluation.
    ///
    /// Fails on configuration, argument or context errors, and on transport
    /// failures; service-side rejections are logged and swallowed.
    pub async fn publish_login_event(
        &self,
        event: &LoginEvent,
        login_status: &str,
        overrides: Option<&OverrideMap>,
    ) -> FraudResult<()> {
        let (payload, log_payload) = self.build_default(event, login_status, overrides).await?;

        if log_payload {
            info!(
                tenant = %event.tenant_domain(),
                payload = %payload.masked(),
                "publishing login event to the scoring service"
            );
        }

        self.client.publish_login(&payload).await
    }

    /// Evaluate the account-takeover risk score for a login attempt.
    ///
    /// With `selected` fields the payload is built in selective mode (raw
    /// values, no override post-processing); otherwise in default mode.
    /// Scoring failures degrade to the maximum-risk sentinel, so an `Err`
    /// here always predates the network call.
    pub async fn login_risk_score(
        &self,
        event: &LoginEvent,
        login_status: &str,
        selected: Option<&[ContextField]>,
        overrides: Option<&OverrideMap>,
    ) -> FraudResult<f64> {
        let status = LoginStatus::parse(login_status)?;
        let log_payload = overrides.map(logging_enabled).transpose()?.unwrap_or(false);

        let builder = PayloadBuilder::new(&self.store);
        let payload = match selected {
            Some(fields) => {
                builder
                    .build_selected(event, status, fields, overrides)
                    .await?
            }
            None => builder.build(event, status, overrides).await?,
        };

        if log_payload {
            info!(
                tenant = %event.tenant_domain(),
                payload = %payload.masked(),
                "requesting login risk score"
            );
        }

        let score = self.client.risk_score(&payload).await;

        if log_payload {
            info!(tenant = %event.tenant_domain(), score, "login risk score evaluated");
        }

        Ok(score)
    }

    /// Fetch the workflow decision for a login attempt.
    ///
    /// `Ok(None)` covers both "no decision configured" and a degraded
    /// lookup; an `Err` always predates the network call.
    pub async fn login_workflow_decision(
        &self,
        event: &LoginEvent,
        login_status: &str,
        overrides: Option<&OverrideMap>,
    ) -> FraudResult<Option<String>> {
        let (payload, log_payload) = self.build_default(event, login_status, overrides).await?;

        if log_payload {
            info!(
                tenant = %event.tenant_domain(),
                payload = %payload.masked(),
                "requesting login workflow decision"
            );
        }

        let decision = self.client.workflow_decision(&payload).await;

        if log_payload {
            info!(
                tenant = %event.tenant_domain(),
                decision = decision.as_deref(),
                "login workflow decision evaluated"
            );
        }

        Ok(decision)
    }

    async fn build_default(
        &self,
        event: &LoginEvent,
        login_status: &str,
        overrides: Option<&OverrideMap>,
    ) -> FraudResult<(EventPayload, bool)> {
        let status = LoginStatus::parse(login_status)?;
        let log_payload = overrides.map(logging_enabled).transpose()?.unwrap_or(false);

        let payload = PayloadBuilder::new(&self.store)
            .build(event, status, overrides)
            .await?;

        Ok((payload, log_payload))
    }
}
