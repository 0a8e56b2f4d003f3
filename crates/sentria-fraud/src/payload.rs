//! Scoring payload construction
//!
//! Turns a [`LoginEvent`] plus caller overrides into the ordered JSON payload
//! the scoring service expects. All precedence and removal rules live here.
//!
//! Two build modes exist. The default mode resolves every context field and
//! hashes the user and session identifiers so raw identifiers never leave
//! the process; callers can then replace or delete individual defaults
//! through the override map. The selective mode populates only an explicit
//! field list, with raw values and no override post-processing.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::{resolve_api_key, TenantConfigStore};
use crate::error::{FraudError, FraudResult};
use crate::event::{LoginEvent, LoginStatus};
use crate::fields;
use crate::mask;
use crate::overrides::{split_overrides, strip_logging_flag, FieldOverride, OverrideMap};

/// Hash an identifier with SHA-256, hex-encoded.
///
/// Applied to user and session identifiers before they are placed in a
/// payload, so the scoring service only ever sees one-way values.
pub fn hash_identifier(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Context-derived fields a selective-mode build may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextField {
    /// Raw user identifier.
    UserId,
    /// Raw session identifier.
    SessionId,
    /// Client IP address.
    Ip,
    /// User-agent header, nested under `$browser`.
    UserAgent,
}

impl ContextField {
    /// The payload key this field populates.
    pub fn wire_key(&self) -> &'static str {
        match self {
            ContextField::UserId => fields::USER_ID,
            ContextField::SessionId => fields::SESSION_ID,
            ContextField::Ip => fields::IP,
            ContextField::UserAgent => fields::USER_AGENT,
        }
    }

    /// Parse a wire key back into a field selector.
    pub fn from_wire_key(key: &str) -> Option<Self> {
        match key {
            fields::USER_ID => Some(ContextField::UserId),
            fields::SESSION_ID => Some(ContextField::SessionId),
            fields::IP => Some(ContextField::Ip),
            fields::USER_AGENT => Some(ContextField::UserAgent),
            _ => None,
        }
    }
}

/// Ordered field-name → value mapping sent to the scoring service.
///
/// Always contains `$type`, `$api_key` and `$login_status`; everything else
/// is conditional. `Debug` renders through the masker so the API key cannot
/// leak into logs by accident.
#[derive(Clone, Serialize, Default)]
#[serde(transparent)]
pub struct EventPayload(serde_json::Map<String, Value>);

impl EventPayload {
    fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub(crate) fn remove(&mut self, key: &str) {
        self.0.remove(key);
    }

    /// Look up a field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Check whether a field is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over fields in payload order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Serialize the payload to the JSON request body.
    pub fn to_body(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_default()
    }

    /// Logging-safe JSON rendering with the API key partially masked.
    pub fn masked(&self) -> String {
        mask::masked_json(self)
    }
}

impl std::fmt::Debug for EventPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.masked())
    }
}

fn browser_object(user_agent: &str) -> Value {
    let mut browser = serde_json::Map::new();
    browser.insert(fields::USER_AGENT.to_string(), Value::from(user_agent));
    Value::Object(browser)
}

/// Builds scoring payloads against a tenant configuration store.
pub struct PayloadBuilder<'a> {
    store: &'a dyn TenantConfigStore,
}

impl<'a> PayloadBuilder<'a> {
    /// Create a builder backed by the given store.
    pub fn new(store: &'a dyn TenantConfigStore) -> Self {
        Self { store }
    }

    /// Build a payload in default mode.
    ///
    /// Populates the hashed user id, user agent, client IP and hashed
    /// session id from the event, then applies override post-processing:
    /// a non-blank override replaces the default, a blank override deletes
    /// the field (except `$user_id`, which is mandatory and never deleted).
    /// Remaining override entries merge in as passthrough extras.
    ///
    /// A missing session identifier is fatal here since the session hash
    /// cannot be computed. An unresolvable user identity is not: the
    /// `$user_id` field is simply omitted.
    pub async fn build(
        &self,
        event: &LoginEvent,
        status: LoginStatus,
        overrides: Option<&OverrideMap>,
    ) -> FraudResult<EventPayload> {
        let split = match overrides {
            Some(map) => split_overrides(map)?,
            None => Default::default(),
        };

        let mut payload = self.base_payload(event, status).await?;

        match event.user_id() {
            Some(user_id) => payload.insert(fields::USER_ID, hash_identifier(user_id)),
            None => debug!(
                tenant = %event.tenant_domain(),
                "user id could not be resolved from the authentication context"
            ),
        }

        if let Some(user_agent) = event.user_agent() {
            payload.insert(fields::BROWSER, browser_object(user_agent));
        }

        if let Some(ip) = event.client_ip() {
            payload.insert(fields::IP, ip);
        }

        let session_id = event.session_id().ok_or(FraudError::MissingContext {
            field: fields::SESSION_ID,
        })?;
        payload.insert(fields::SESSION_ID, hash_identifier(session_id));

        apply_override(&mut payload, fields::IP, &split.ip);
        apply_override(&mut payload, fields::SESSION_ID, &split.session_id);

        match &split.user_agent {
            FieldOverride::Unset => {}
            FieldOverride::Clear => payload.remove(fields::BROWSER),
            FieldOverride::Replace(user_agent) => {
                payload.insert(fields::BROWSER, browser_object(user_agent));
            }
        }

        // The user id is mandatory: replace on a non-blank override, but a
        // blank override never deletes it.
        if let FieldOverride::Replace(user_id) = &split.user_id {
            payload.insert(fields::USER_ID, user_id.as_str());
        }

        for (key, value) in split.passthrough {
            payload.insert(key, value);
        }

        Ok(payload)
    }

    /// Build a payload in selective mode.
    ///
    /// Only the fields named in `selected` are populated, with raw
    /// (unhashed) values. Override post-processing does not apply; every
    /// override entry other than the logging flag merges into the payload
    /// verbatim after the selected defaults.
    pub async fn build_selected(
        &self,
        event: &LoginEvent,
        status: LoginStatus,
        selected: &[ContextField],
        overrides: Option<&OverrideMap>,
    ) -> FraudResult<EventPayload> {
        let passthrough = match overrides {
            Some(map) => strip_logging_flag(map)?.1,
            None => OverrideMap::new(),
        };

        let mut payload = self.base_payload(event, status).await?;

        for field in selected {
            match field {
                ContextField::UserId => {
                    if let Some(user_id) = event.user_id() {
                        payload.insert(fields::USER_ID, user_id);
                    }
                }
                ContextField::SessionId => {
                    if let Some(session_id) = event.session_id() {
                        payload.insert(fields::SESSION_ID, session_id);
                    }
                }
                ContextField::Ip => {
                    if let Some(ip) = event.client_ip() {
                        payload.insert(fields::IP, ip);
                    }
                }
                ContextField::UserAgent => {
                    if let Some(user_agent) = event.user_agent() {
                        payload.insert(fields::BROWSER, browser_object(user_agent));
                    }
                }
            }
        }

        for (key, value) in passthrough {
            payload.insert(key, value);
        }

        Ok(payload)
    }

    async fn base_payload(
        &self,
        event: &LoginEvent,
        status: LoginStatus,
    ) -> FraudResult<EventPayload> {
        let api_key = resolve_api_key(self.store, event.tenant_domain()).await?;

        let mut payload = EventPayload::new();
        payload.insert(fields::TYPE, fields::LOGIN_TYPE);
        payload.insert(fields::API_KEY, api_key);
        payload.insert(fields::LOGIN_STATUS, status.wire_value());
        Ok(payload)
    }
}

fn apply_override(payload: &mut EventPayload, key: &str, field_override: &FieldOverride) {
    match field_override {
        FieldOverride::Unset => {}
        FieldOverride::Clear => payload.remove(key),
        FieldOverride::Replace(value) => payload.insert(key, value.as_str()),
    }
}
