//! Logging-safe payload rendering
//!
//! Produces a JSON string identical to a payload except that the secret
//! `$api_key` value has its second half replaced character-for-character
//! with `*`; the first half (rounding down) stays intact so operators can
//! still correlate keys. The payload used for the actual request is never
//! altered.

use serde_json::Value;

use crate::fields;
use crate::payload::EventPayload;

const MASK_CHAR: char = '*';

/// Render a payload as JSON with the API key partially masked.
pub fn masked_json(payload: &EventPayload) -> String {
    let mut masked = payload.clone();
    if let Some(Value::String(api_key)) = payload.get(fields::API_KEY) {
        masked.insert(fields::API_KEY, mask_secret(api_key));
    }
    masked.to_body()
}

fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let intact = chars.len() / 2;

    let mut masked: String = chars[..intact].iter().collect();
    masked.extend(std::iter::repeat(MASK_CHAR).take(chars.len() - intact));
    masked
}
