//! Scoring-service HTTP client
//!
//! One POST per operation, JSON body, no retries; connection pooling and
//! TLS belong to the underlying `reqwest::Client`. Transport and service
//! failures are classified per operation: score lookups degrade to the
//! maximum-risk sentinel and decision lookups to "no decision" so a scoring
//! outage never blocks a login flow, while publishing surfaces transport
//! failures to the caller.

use reqwest::StatusCode;
use tracing::{debug, error};

use sentria_fraud::error::{FraudError, FraudResult};
use sentria_fraud::payload::EventPayload;

use crate::config::ClientConfig;
use crate::response::EventResponse;

/// Sentinel returned when a risk score cannot be obtained.
pub const MAX_RISK_SCORE: f64 = 1.0;

/// Query parameter selecting a score response.
const RETURN_SCORE: (&str, &str) = ("return_score", "true");

/// Query parameter selecting a workflow-status response.
const RETURN_WORKFLOW: (&str, &str) = ("return_workflow_status", "true");

/// HTTP client for the scoring service's event endpoint.
pub struct FraudScoreClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl FraudScoreClient {
    /// Create a client with its own connection pool.
    pub fn new(config: ClientConfig) -> FraudResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| FraudError::InvalidConfiguration {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { config, http })
    }

    /// Create a client on top of a shared `reqwest::Client`.
    ///
    /// The embedder keeps ownership of the pool; timeouts configured on the
    /// shared client apply as-is.
    pub fn with_client(config: ClientConfig, http: reqwest::Client) -> FraudResult<Self> {
        config.validate()?;
        Ok(Self { config, http })
    }

    /// Endpoint this client posts events to.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Publish a login event without requesting an evaluation.
    ///
    /// Transport failures propagate to the caller. A non-200 answer or a
    /// service-level failure status is logged and swallowed; publishing is
    /// best-effort beyond the transport boundary.
    pub async fn publish_login(&self, payload: &EventPayload) -> FraudResult<()> {
        let response = self.post_event(payload, None).await?;

        let status = response.status();
        if status != StatusCode::OK {
            error!(
                http_status = %status,
                "failed to publish login event to the scoring service"
            );
            return Ok(());
        }

        match decode_envelope(response)
            .await
            .and_then(|envelope| envelope.require_ok())
        {
            Ok(()) => {
                debug!("login event published to the scoring service");
            }
            Err(err) => {
                error!(
                    code = err.error_code(),
                    error = %err,
                    "scoring service did not accept the published login event"
                );
            }
        }

        Ok(())
    }

    /// Fetch the account-takeover risk score for a login event.
    ///
    /// Never fails: any transport, status or interpretation problem is
    /// logged and replaced by [`MAX_RISK_SCORE`].
    pub async fn risk_score(&self, payload: &EventPayload) -> f64 {
        match self.try_risk_score(payload).await {
            Ok(score) => {
                debug!(score, "risk score received from the scoring service");
                score
            }
            Err(err) => {
                error!(
                    code = err.error_code(),
                    error = %err,
                    "risk score lookup failed, returning maximum-risk sentinel"
                );
                MAX_RISK_SCORE
            }
        }
    }

    async fn try_risk_score(&self, payload: &EventPayload) -> FraudResult<f64> {
        let response = self.post_event(payload, Some(RETURN_SCORE)).await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FraudError::UnexpectedHttpStatus {
                status: status.as_u16(),
            });
        }

        let envelope = decode_envelope(response).await?;
        envelope.require_ok()?;

        envelope.account_takeover_score().ok_or_else(|| {
            FraudError::malformed_response("account takeover score missing from response")
        })
    }

    /// Fetch the workflow decision for a login event.
    ///
    /// `None` means "no decision", whether because no workflow matched or
    /// because the lookup failed; failures are logged, never propagated.
    pub async fn workflow_decision(&self, payload: &EventPayload) -> Option<String> {
        match self.try_workflow_decision(payload).await {
            Ok(decision) => decision,
            Err(err) => {
                error!(
                    code = err.error_code(),
                    error = %err,
                    "workflow decision lookup failed"
                );
                None
            }
        }
    }

    async fn try_workflow_decision(&self, payload: &EventPayload) -> FraudResult<Option<String>> {
        let response = self.post_event(payload, Some(RETURN_WORKFLOW)).await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FraudError::UnexpectedHttpStatus {
                status: status.as_u16(),
            });
        }

        let envelope = decode_envelope(response).await?;
        envelope.require_ok()?;

        Ok(envelope
            .session_takeover_decision()
            .map(str::to_string))
    }

    async fn post_event(
        &self,
        payload: &EventPayload,
        mode: Option<(&str, &str)>,
    ) -> FraudResult<reqwest::Response> {
        let mut request = self.http.post(&self.config.base_url).json(payload);
        if let Some(param) = mode {
            request = request.query(&[param]);
        }

        debug!(url = %self.config.base_url, mode = ?mode.map(|(k, _)| k), "posting login event");

        request.send().await.map_err(|e| {
            FraudError::transport_with_source("failed to reach the scoring service", e)
        })
    }
}

impl std::fmt::Debug for FraudScoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FraudScoreClient")
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

async fn decode_envelope(response: reqwest::Response) -> FraudResult<EventResponse> {
    response.json::<EventResponse>().await.map_err(|e| {
        FraudError::malformed_response(format!("failed to decode scoring service response: {e}"))
    })
}
