//! Login event model
//!
//! A [`LoginEvent`] is the read-only snapshot of one authentication attempt,
//! assembled by the host runtime and handed to the payload builder. Any
//! context attribute may be absent; the builder decides which absences are
//! fatal.

use crate::error::{FraudError, FraudResult};

/// Outcome of a login attempt.
///
/// Callers supply a free-form status string which must map onto exactly one
/// of these two values; anything else is rejected before a network call is
/// attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStatus {
    /// The login attempt succeeded.
    Success,
    /// The login attempt failed.
    Failed,
}

impl LoginStatus {
    /// Map a caller-supplied status string onto a known status.
    ///
    /// Matching is case-insensitive against `LOGIN_SUCCESS` / `LOGIN_FAILED`.
    pub fn parse(status: &str) -> FraudResult<Self> {
        if status.eq_ignore_ascii_case("LOGIN_SUCCESS") {
            Ok(LoginStatus::Success)
        } else if status.eq_ignore_ascii_case("LOGIN_FAILED") {
            Ok(LoginStatus::Failed)
        } else {
            Err(FraudError::InvalidLoginStatus {
                status: status.to_string(),
            })
        }
    }

    /// The value sent to the scoring service for this status.
    pub fn wire_value(&self) -> &'static str {
        match self {
            LoginStatus::Success => "$success",
            LoginStatus::Failed => "$failure",
        }
    }

    /// The caller-facing name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginStatus::Success => "LOGIN_SUCCESS",
            LoginStatus::Failed => "LOGIN_FAILED",
        }
    }
}

impl std::fmt::Display for LoginStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes of the inbound HTTP request, as far as the host resolved them.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    /// Client IP address the request originated from.
    pub client_ip: Option<String>,

    /// Value of the request's `User-Agent` header.
    pub user_agent: Option<String>,
}

impl RequestInfo {
    /// Create empty request info.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the client IP address.
    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    /// Set the user-agent header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// One authentication attempt as seen by the host runtime.
///
/// Supplied fresh per call and never mutated by this crate. The user
/// identifier is the raw value from the identity store; it is hashed before
/// it leaves the process.
#[derive(Debug, Clone)]
pub struct LoginEvent {
    tenant_domain: String,
    user_id: Option<String>,
    session_id: Option<String>,
    request: Option<RequestInfo>,
}

impl LoginEvent {
    /// Create an event for the given tenant with no resolved context.
    pub fn new(tenant_domain: impl Into<String>) -> Self {
        Self {
            tenant_domain: tenant_domain.into(),
            user_id: None,
            session_id: None,
            request: None,
        }
    }

    /// Set the resolved user identifier.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the authentication session identifier.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Attach inbound request attributes.
    pub fn with_request(mut self, request: RequestInfo) -> Self {
        self.request = Some(request);
        self
    }

    /// Tenant this attempt belongs to.
    pub fn tenant_domain(&self) -> &str {
        &self.tenant_domain
    }

    /// Raw user identifier, if identity resolution succeeded.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Session identifier, if present.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Client IP, if the inbound request was available.
    pub fn client_ip(&self) -> Option<&str> {
        self.request.as_ref()?.client_ip.as_deref()
    }

    /// User-agent header, if the inbound request was available.
    pub fn user_agent(&self) -> Option<&str> {
        self.request.as_ref()?.user_agent.as_deref()
    }
}
