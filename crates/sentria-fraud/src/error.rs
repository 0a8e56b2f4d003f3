//! Fraud-detection error types
//!
//! Error definitions with a recoverable/fatal classification: transport and
//! service failures degrade to operation-specific sentinels at the call
//! boundary, everything else surfaces to the caller.

use thiserror::Error;

/// Error that can occur while building or submitting a login event.
#[derive(Debug, Error)]
pub enum FraudError {
    // Configuration errors (fatal, surfaced to the caller)
    /// Tenant has no usable scoring-service configuration.
    #[error("fraud-detection configuration error for tenant '{tenant}': {message}")]
    Configuration { tenant: String, message: String },

    // Invalid-argument errors (fatal, rejected before any network call)
    /// Caller-supplied login status does not map to a known status.
    #[error("invalid login status: '{status}'")]
    InvalidLoginStatus { status: String },

    /// Override map entry has an unusable shape for a reserved key.
    #[error("invalid override for '{key}': {message}")]
    InvalidOverride { key: String, message: String },

    /// Scoring client configuration is invalid.
    #[error("invalid client configuration: {message}")]
    InvalidConfiguration { message: String },

    /// A mandatory field could not be resolved from the authentication context.
    #[error("missing authentication context: {field}")]
    MissingContext { field: &'static str },

    // Recoverable errors (logged and converted to sentinels at the boundary)
    /// Network/IO failure while talking to the scoring service.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Scoring service answered with an unexpected HTTP status.
    #[error("scoring service returned HTTP {status}")]
    UnexpectedHttpStatus { status: u16 },

    /// Scoring service reported a service-level failure status in the body.
    #[error("scoring service reported failure status {status}")]
    ServiceStatus { status: i64 },

    /// Response body was missing, unparsable, or lacked an expected field.
    #[error("malformed scoring service response: {message}")]
    MalformedResponse { message: String },
}

impl FraudError {
    /// Check if this error is recoverable at the operation boundary.
    ///
    /// Recoverable errors are logged and replaced by an operation-specific
    /// sentinel (maximum-risk score, or "no decision") so that a scoring
    /// outage never blocks a login flow. Fatal errors surface to the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FraudError::Transport { .. }
                | FraudError::UnexpectedHttpStatus { .. }
                | FraudError::ServiceStatus { .. }
                | FraudError::MalformedResponse { .. }
        )
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            FraudError::Configuration { .. } => "CONFIGURATION_ERROR",
            FraudError::InvalidLoginStatus { .. } => "INVALID_LOGIN_STATUS",
            FraudError::InvalidOverride { .. } => "INVALID_OVERRIDE",
            FraudError::InvalidConfiguration { .. } => "INVALID_CLIENT_CONFIG",
            FraudError::MissingContext { .. } => "MISSING_CONTEXT",
            FraudError::Transport { .. } => "TRANSPORT_ERROR",
            FraudError::UnexpectedHttpStatus { .. } => "UNEXPECTED_HTTP_STATUS",
            FraudError::ServiceStatus { .. } => "SERVICE_STATUS_ERROR",
            FraudError::MalformedResponse { .. } => "MALFORMED_RESPONSE",
        }
    }

    // Convenience constructors

    /// Create a configuration error.
    pub fn configuration(tenant: impl Into<String>, message: impl Into<String>) -> Self {
        FraudError::Configuration {
            tenant: tenant.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-override error.
    pub fn invalid_override(key: impl Into<String>, message: impl Into<String>) -> Self {
        FraudError::InvalidOverride {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        FraudError::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error with source.
    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        FraudError::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a malformed-response error.
    pub fn malformed_response(message: impl Into<String>) -> Self {
        FraudError::MalformedResponse {
            message: message.into(),
        }
    }
}

/// Result type for fraud-detection operations.
pub type FraudResult<T> = Result<T, FraudError>;
