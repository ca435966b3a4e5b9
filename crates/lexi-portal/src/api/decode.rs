// Response decoding for the portal endpoints.
//
// The backend proxies an upstream service and passes its bodies through
// unchanged, so shapes vary: lists may be wrapped in `{data: [...]}` or not,
// and individual entries may be malformed. Each endpoint gets exactly one
// decode step here.

use reqwest::StatusCode;
use serde_json::Value;
use tracing::warn;

use crate::model::{CommissionAddress, Descriptor};

/// Return the `data` member of an envelope object, if any.
fn envelope_data(body: &Value) -> Option<&Value> {
    body.as_object().and_then(|obj| obj.get("data"))
}

/// Decode a `{data: [...]}` descriptor list.
///
/// A missing or non-array `data` yields an empty list. Entries that fail to
/// decode are skipped.
pub fn descriptor_list(body: &Value) -> Vec<Descriptor> {
    let Some(entries) = envelope_data(body).and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value::<Descriptor>(entry.clone()) {
            Ok(d) => Some(d),
            Err(e) => {
                warn!("Skipping malformed descriptor {}: {}", entry, e);
                None
            }
        })
        .collect()
}

/// Normalize a commission address body to one optional record.
///
/// Accepts a bare array or `{data: [...]}`; only the first element is used.
/// Anything else, an empty list, or a non-object first element gives `None`.
pub fn commission_address(body: &Value) -> Option<CommissionAddress> {
    let list = match body {
        Value::Array(items) => items,
        other => envelope_data(other)?.as_array()?,
    };
    let first = list.first()?;
    if !first.is_object() {
        return None;
    }
    match serde_json::from_value(first.clone()) {
        Ok(addr) => Some(addr),
        Err(e) => {
            warn!("Malformed commission address: {}", e);
            None
        }
    }
}

/// Extract search result rows.
///
/// `data` is coerced to an array (empty when not array-shaped); an absent
/// or null `data` also yields an empty list. Rows are passed through
/// untouched for the view regions to decode.
pub fn search_rows(body: &Value) -> Vec<Value> {
    match envelope_data(body) {
        Some(Value::Array(rows)) => rows.clone(),
        _ => Vec::new(),
    }
}

/// Longest raw body text carried into an error message.
pub const MAX_DETAIL_CHARS: usize = 160;

/// Pull a readable message out of an error body.
///
/// Understands FastAPI's `{"detail": ...}` and `{"message": ...}`. Other
/// plain text is kept up to `MAX_DETAIL_CHARS`; empty bodies and markup
/// (an HTML error page from a proxy) fall back to the status reason.
pub fn error_detail(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let field = parsed.as_ref().and_then(|v| {
        ["detail", "message"]
            .iter()
            .find_map(|key| v.get(*key))
            .map(|d| match d {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    });
    if let Some(detail) = field {
        return truncate(&detail);
    }
    let text = body.trim();
    if text.is_empty() || text.starts_with('<') {
        return status
            .canonical_reason()
            .unwrap_or("unexpected response")
            .to_string();
    }
    truncate(text)
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_DETAIL_CHARS {
        return text.to_string();
    }
    let head: String = text.chars().take(MAX_DETAIL_CHARS).collect();
    format!("{head}...")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
