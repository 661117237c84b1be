//! Inbound frame classification.
//!
//! The stream multiplexes several producer versions, so a new-token
//! announcement arrives in one of four wire shapes. Each shape is tried
//! in a fixed priority order and mapped to the same normalized event.
//! Anything else is normal background traffic (trade events, acks,
//! heartbeats) and classifies to `None` without a log line.

use serde_json::Value;

/// Normalized new-token announcement.
///
/// Only the metadata URI matters downstream; the rest of the payload is
/// dropped at classification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCreationEvent {
    pub metadata_uri: Option<String>,
}

/// Classify a decoded frame against the known new-token shapes.
///
/// Recognized variants, in priority order:
/// 1. RPC notification: `{"method":"newToken","params":{..}}`
/// 2. type-tagged object: `{"type":"newToken", ..}`
/// 3. event envelope: `{"event":"token_created","data":{..}}`
/// 4. flat create record: `{"mint": .., "txType":"create", ..}`
pub fn classify(frame: &Value) -> Option<TokenCreationEvent> {
    if frame.get("method").and_then(|v| v.as_str()) == Some("newToken") {
        let payload = frame.get("params")?.as_object()?;
        return Some(event_from_payload(payload));
    }

    if frame.get("type").and_then(|v| v.as_str()) == Some("newToken") {
        let payload = frame.as_object()?;
        return Some(event_from_payload(payload));
    }

    if frame.get("event").and_then(|v| v.as_str()) == Some("token_created") {
        let payload = frame.get("data")?.as_object()?;
        return Some(event_from_payload(payload));
    }

    if frame.get("mint").is_some() && frame.get("txType").and_then(|v| v.as_str()) == Some("create")
    {
        let payload = frame.as_object()?;
        return Some(event_from_payload(payload));
    }

    None
}

fn event_from_payload(payload: &serde_json::Map<String, Value>) -> TokenCreationEvent {
    // Producers disagree on the field name for the metadata URI
    let metadata_uri = payload
        .get("uri")
        .or_else(|| payload.get("metadataUri"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    TokenCreationEvent { metadata_uri }
}
