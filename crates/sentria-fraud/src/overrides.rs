//! Caller-supplied payload overrides
//!
//! Callers may pass a map of field-name → value alongside an event. A few
//! keys are reserved: the four default-field keys (`$user_id`,
//! `$session_id`, `$ip`, `$user_agent`) adjust values the builder resolved
//! from the context, and `logging_enabled` opts the call into payload
//! logging. Everything else passes through to the outgoing payload verbatim.
//!
//! The split is a pure read: the caller's map is borrowed, never mutated, so
//! a map instance can safely be reused across calls. Consumed reserved keys
//! are still guaranteed not to reach the payload as passthrough extras.

use serde_json::Value;

use crate::error::{FraudError, FraudResult};
use crate::fields;

/// Caller-supplied override map.
pub type OverrideMap = serde_json::Map<String, Value>;

/// Effect of a caller override on one default payload field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldOverride {
    /// Key absent from the override map: keep the default value.
    #[default]
    Unset,
    /// Blank value: remove the field from the payload entirely.
    Clear,
    /// Non-blank value: replace the default value.
    Replace(String),
}

impl FieldOverride {
    fn from_value(key: &str, value: &Value) -> FraudResult<Self> {
        let s = value.as_str().ok_or_else(|| {
            FraudError::invalid_override(key, "expected a string value")
        })?;
        if s.trim().is_empty() {
            Ok(FieldOverride::Clear)
        } else {
            Ok(FieldOverride::Replace(s.to_string()))
        }
    }
}

/// Result of splitting an override map into reserved and passthrough parts.
#[derive(Debug, Clone, Default)]
pub struct SplitOverrides {
    /// Whether the caller opted this call into payload logging.
    pub logging_enabled: bool,

    /// Override for the `$user_id` field. `Clear` is ignored by the builder;
    /// the user id is mandatory and never deleted.
    pub user_id: FieldOverride,

    /// Override for the `$session_id` field.
    pub session_id: FieldOverride,

    /// Override for the `$ip` field.
    pub ip: FieldOverride,

    /// Override for the `$user_agent` field (nested under `$browser`).
    pub user_agent: FieldOverride,

    /// All remaining entries, forwarded to the payload verbatim.
    pub passthrough: OverrideMap,
}

/// Split an override map into consumed reserved values and passthrough extras.
///
/// Reserved default-field keys must hold string values; the logging flag must
/// hold a boolean. Anything else is a malformed override map.
pub fn split_overrides(overrides: &OverrideMap) -> FraudResult<SplitOverrides> {
    let mut split = SplitOverrides::default();

    for (key, value) in overrides {
        match key.as_str() {
            fields::LOGGING_ENABLED => {
                split.logging_enabled = logging_flag(value)?;
            }
            fields::USER_ID => split.user_id = FieldOverride::from_value(key, value)?,
            fields::SESSION_ID => split.session_id = FieldOverride::from_value(key, value)?,
            fields::IP => split.ip = FieldOverride::from_value(key, value)?,
            fields::USER_AGENT => split.user_agent = FieldOverride::from_value(key, value)?,
            _ => {
                split.passthrough.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(split)
}

/// Extract only the logging flag, keeping every other entry verbatim.
///
/// Used by selective-mode builds, where default-field overrides are not
/// post-processed and merge into the payload like any other entry.
pub fn strip_logging_flag(overrides: &OverrideMap) -> FraudResult<(bool, OverrideMap)> {
    let mut remaining = OverrideMap::new();
    let mut enabled = false;

    for (key, value) in overrides {
        if key == fields::LOGGING_ENABLED {
            enabled = logging_flag(value)?;
        } else {
            remaining.insert(key.clone(), value.clone());
        }
    }

    Ok((enabled, remaining))
}

/// Check whether the caller opted into payload logging, without splitting.
pub fn logging_enabled(overrides: &OverrideMap) -> FraudResult<bool> {
    match overrides.get(fields::LOGGING_ENABLED) {
        Some(value) => logging_flag(value),
        None => Ok(false),
    }
}

fn logging_flag(value: &Value) -> FraudResult<bool> {
    value.as_bool().ok_or_else(|| {
        FraudError::invalid_override(fields::LOGGING_ENABLED, "expected a boolean value")
    })
}
