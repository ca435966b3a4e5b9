// Domain types for the case search portal.
//
// Everything here is transient and UI-scoped: descriptors for the two-tier
// state/commission hierarchy, the commission address record, the search
// form and the request built from it, and the loosely-typed case rows with
// their derived status labels and counts.

pub mod case;
pub mod commission;
pub mod search;

pub use case::{
    decode_rows, status_badge, BadgeStyle, CaseRow, RowError, StatusBadge, StatusCounts,
};
pub use commission::{CommissionAddress, Descriptor};
pub use search::{results_view, ResultsView, SearchBy, SearchForm, SearchRequest, ValidationError};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Render a loosely-typed JSON value as display text.
///
/// Strings and numbers are shown as-is; empty strings, nulls, booleans and
/// nested values count as absent so the caller falls back to a placeholder.
pub fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Serde adapter for optional text fields the backend may send as strings,
/// numbers, nulls, or not at all.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(display_value))
}
