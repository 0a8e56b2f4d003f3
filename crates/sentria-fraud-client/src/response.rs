//! Typed scoring-service response decoding
//!
//! The service answers every event POST with the same envelope; a score
//! query and a workflow query differ only in which parts of
//! `score_response` are populated. Decoding is typed, with every nesting
//! level optional: an absent level reads as "no score" / "no decision"
//! rather than a decode error, and only an unparsable body fails.

use serde::Deserialize;

use sentria_fraud::error::{FraudError, FraudResult};

/// Service-level status code reported for a successful request.
pub const STATUS_OK: i64 = 0;

/// Abuse-type label this connector filters scores and decisions on.
pub const ABUSE_TYPE_ACCOUNT_TAKEOVER: &str = "account_takeover";

/// Entity type a workflow-status record must target to be eligible.
pub const ENTITY_TYPE_SESSION: &str = "session";

/// History application label marking a decision entry.
pub const HISTORY_APP_DECISION: &str = "decision";

/// Top-level response envelope for all three event operations.
#[derive(Debug, Deserialize)]
pub struct EventResponse {
    /// Service-level status; `0` means ok, anything else a service error.
    pub status: Option<i64>,

    /// Present for score and workflow queries.
    #[serde(default)]
    pub score_response: Option<ScoreResponse>,
}

impl EventResponse {
    /// Check that the service reported an ok status.
    ///
    /// A missing status is treated as malformed, not as success.
    pub fn require_ok(&self) -> FraudResult<()> {
        match self.status {
            Some(STATUS_OK) => Ok(()),
            Some(status) => Err(FraudError::ServiceStatus { status }),
            None => Err(FraudError::malformed_response(
                "service status missing from response",
            )),
        }
    }

    /// Dig out the account-takeover risk score, if every level is present.
    pub fn account_takeover_score(&self) -> Option<f64> {
        self.score_response
            .as_ref()?
            .scores
            .as_ref()?
            .account_takeover
            .as_ref()?
            .score
    }

    /// Extract the workflow decision for this login session, if any.
    ///
    /// Scans the workflow-status records in order and picks the first one
    /// that both targets account takeover and describes a session entity.
    /// First match wins: if that record's history carries no decision, the
    /// result is `None` even when a later record would have matched.
    pub fn session_takeover_decision(&self) -> Option<&str> {
        self.score_response
            .as_ref()?
            .workflow_statuses
            .iter()
            .find(|status| status.targets_account_takeover() && status.is_session_entity())
            .and_then(WorkflowStatus::decision_id)
    }
}

/// Score and workflow payload nested in the envelope.
#[derive(Debug, Deserialize)]
pub struct ScoreResponse {
    /// Scores by abuse type.
    #[serde(default)]
    pub scores: Option<AbuseScores>,

    /// Workflow runs triggered by the event, in service order.
    #[serde(default)]
    pub workflow_statuses: Vec<WorkflowStatus>,
}

/// Per-abuse-type scores; only account takeover is consumed here.
#[derive(Debug, Deserialize)]
pub struct AbuseScores {
    #[serde(default)]
    pub account_takeover: Option<AbuseScore>,
}

/// Score for one abuse type.
#[derive(Debug, Deserialize)]
pub struct AbuseScore {
    #[serde(default)]
    pub score: Option<f64>,
}

/// One workflow run, with the abuse types it covers, the entity it ran
/// against, and its application history.
#[derive(Debug, Deserialize)]
pub struct WorkflowStatus {
    #[serde(default)]
    pub abuse_types: Vec<String>,

    #[serde(default)]
    pub entity: Option<WorkflowEntity>,

    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl WorkflowStatus {
    fn targets_account_takeover(&self) -> bool {
        self.abuse_types
            .iter()
            .any(|abuse_type| abuse_type == ABUSE_TYPE_ACCOUNT_TAKEOVER)
    }

    fn is_session_entity(&self) -> bool {
        self.entity
            .as_ref()
            .is_some_and(|entity| entity.entity_type.as_deref() == Some(ENTITY_TYPE_SESSION))
    }

    /// Decision id from the first decision-application history entry that
    /// carries one.
    fn decision_id(&self) -> Option<&str> {
        self.history
            .iter()
            .filter(|entry| entry.app.as_deref() == Some(HISTORY_APP_DECISION))
            .find_map(|entry| entry.config.as_ref()?.decision_id.as_deref())
    }
}

/// Entity a workflow run was evaluated against.
#[derive(Debug, Deserialize)]
pub struct WorkflowEntity {
    #[serde(rename = "type")]
    pub entity_type: Option<String>,

    #[serde(default)]
    pub id: Option<String>,
}

/// One entry in a workflow run's application history.
#[derive(Debug, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub app: Option<String>,

    #[serde(default)]
    pub config: Option<HistoryConfig>,
}

/// Configuration attached to a history entry.
#[derive(Debug, Deserialize)]
pub struct HistoryConfig {
    #[serde(default)]
    pub decision_id: Option<String>,
}
