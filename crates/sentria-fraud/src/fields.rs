//! Wire-level field names for the scoring service's login event API.
//!
//! The service namespaces its own fields with a `$` prefix; caller-supplied
//! passthrough fields carry whatever name the caller chose.

/// Event type discriminator field.
pub const TYPE: &str = "$type";

/// Event type value for login events.
pub const LOGIN_TYPE: &str = "$login";

/// Per-tenant secret used to authenticate against the scoring service.
pub const API_KEY: &str = "$api_key";

/// Outcome of the login attempt (`$success` or `$failure` on the wire).
pub const LOGIN_STATUS: &str = "$login_status";

/// One-way hash of the authenticated user's identifier.
pub const USER_ID: &str = "$user_id";

/// One-way hash of the authentication session identifier.
pub const SESSION_ID: &str = "$session_id";

/// Client IP address of the inbound request.
pub const IP: &str = "$ip";

/// Nested object carrying browser attributes.
pub const BROWSER: &str = "$browser";

/// User-agent header value, nested under [`BROWSER`].
pub const USER_AGENT: &str = "$user_agent";

/// Reserved override key that opts a single call into payload logging.
///
/// Consumed during override processing and never forwarded to the service.
pub const LOGGING_ENABLED: &str = "logging_enabled";
